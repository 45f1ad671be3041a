//! Double-buffered frame assembly.
//!
//! Each paint cycle records into the back buffer and swaps it to the front
//! only once complete, so a host reading [`FrameCompositor::front`] never
//! sees a half-built frame.

use crate::{
    core::{
        constants::{
            CROSSHAIR_HALF_LENGTH, SCALE_DISTANCES, SCALE_METERS_PER_PIXEL, SCALE_REFERENCE_ZOOM,
        },
        geo::Point,
        projection::MapAdapter,
        viewport::{Projector, Viewport},
    },
    layers::manager::LayerManager,
    rendering::context::{Color, RenderContext, StrokeStyle},
};

/// Everything a paint cycle reads; borrowed for the duration of `compose`
pub struct FrameInputs<'a> {
    pub viewport: &'a Viewport,
    pub layers: &'a LayerManager,
    pub adapter: Option<&'a dyn MapAdapter>,
    pub show_scale: bool,
    pub show_crosshairs: bool,
    /// Press origin and current pointer of a live drag selection
    pub selection: Option<(Point, Point)>,
}

/// Scale bar geometry for one zoom level
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBar {
    /// Right end of the bar in screen pixels
    pub end_x: f64,
    pub label: String,
}

pub struct FrameCompositor {
    front: RenderContext,
    back: RenderContext,
    scale_distances: [f64; 19],
    reallocations: u64,
    frames: u64,
}

impl FrameCompositor {
    pub fn new(size: Point) -> Self {
        let (width, height) = Self::pixel_size(&size);
        Self {
            front: RenderContext::new(width, height),
            back: RenderContext::new(width, height),
            scale_distances: SCALE_DISTANCES,
            reallocations: 0,
            frames: 0,
        }
    }

    fn pixel_size(size: &Point) -> (u32, u32) {
        (size.x.max(0.0).round() as u32, size.y.max(0.0).round() as u32)
    }

    /// Last completed frame
    pub fn front(&self) -> &RenderContext {
        &self.front
    }

    /// Number of times the buffers were reallocated for a new size
    pub fn reallocations(&self) -> u64 {
        self.reallocations
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether the buffers match `size`
    pub fn matches_size(&self, size: &Point) -> bool {
        let (width, height) = Self::pixel_size(size);
        self.back.width == width && self.back.height == height
    }

    fn ensure_size(&mut self, size: &Point) {
        if self.matches_size(size) {
            return;
        }
        let (width, height) = Self::pixel_size(size);
        log::debug!("reallocating frame buffers to {}x{}", width, height);
        self.back = RenderContext::new(width, height);
        self.front = RenderContext::new(width, height);
        self.reallocations += 1;
    }

    pub fn scale_bar(&self, zoom: u8) -> Option<ScaleBar> {
        let distance = *self.scale_distances.get(zoom as usize)?;
        let end_x = distance
            / 2_f64.powi(SCALE_REFERENCE_ZOOM - zoom as i32)
            / SCALE_METERS_PER_PIXEL;
        let label = if distance >= 1000.0 {
            format!("{} km", distance / 1000.0)
        } else {
            format!("{} m", distance)
        };
        Some(ScaleBar { end_x, label })
    }

    /// Builds a complete frame in the back buffer, then presents it
    pub fn compose(&mut self, inputs: &FrameInputs) -> &RenderContext {
        self.ensure_size(&inputs.viewport.size);
        self.back.begin_frame();

        let size = inputs.viewport.size;
        let black = StrokeStyle::new(Color::BLACK, 1.0);

        if let Some(adapter) = inputs.adapter {
            let projector = Projector::new(inputs.viewport, adapter);

            if let Some(image) = inputs.layers.zoom_image() {
                let middle = inputs.viewport.screen_middle();
                let half = Point::new(size.x * image.scale / 2.0, size.y * image.scale / 2.0);
                self.back
                    .render_placeholder(image.from_zoom, (middle.subtract(&half), middle.add(&half)));
            }

            inputs.layers.draw_image(&mut self.back, &projector);
            inputs.layers.draw_geometries(&mut self.back, &projector);
        }

        // no scale without a map layer to measure against
        if inputs.show_scale && inputs.adapter.is_some() {
            if let Some(bar) = self.scale_bar(inputs.viewport.zoom) {
                let y = size.y - 20.0;
                self.back
                    .render_segment(Point::new(10.0, y), Point::new(bar.end_x, y), black);
                self.back.render_segment(
                    Point::new(10.0, size.y - 15.0),
                    Point::new(10.0, size.y - 25.0),
                    black,
                );
                self.back.render_segment(
                    Point::new(bar.end_x, size.y - 15.0),
                    Point::new(bar.end_x, size.y - 25.0),
                    black,
                );
                self.back.render_text(
                    Point::new(bar.end_x + 10.0, size.y - 15.0),
                    bar.label,
                    Color::BLACK,
                    12.0,
                );
            }
        }

        if inputs.show_crosshairs {
            let middle = inputs.viewport.screen_middle();
            let arm = CROSSHAIR_HALF_LENGTH;
            self.back.render_segment(
                Point::new(middle.x, middle.y - arm),
                Point::new(middle.x, middle.y + arm),
                black,
            );
            self.back.render_segment(
                Point::new(middle.x - arm, middle.y),
                Point::new(middle.x + arm, middle.y),
                black,
            );
        }

        self.back.render_rect(Point::new(0.0, 0.0), size, black);

        if let Some((origin, current)) = inputs.selection {
            self.back.render_rect(origin, current, black);
        }

        std::mem::swap(&mut self.front, &mut self.back);
        self.frames += 1;
        &self.front
    }
}
