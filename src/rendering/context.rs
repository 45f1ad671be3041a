use crate::core::geo::{Point, TileCoord};
use serde::{Deserialize, Serialize};

/// RGBA color that survives serde round-trips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(mut self, a: u8) -> Self {
        self.a = a;
        self
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

/// Stroke used by outlines, segments and lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(Color::BLACK, 1.0)
    }
}

/// Commands recorded into a frame. Rasterizing them is up to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Imagery tile covering a screen rectangle (min, max)
    Tile {
        coord: TileCoord,
        bounds: (Point, Point),
        opacity: f32,
    },
    /// Scaled frame of the previous zoom level, shown until imagery arrives
    Placeholder { from_zoom: u8, bounds: (Point, Point) },
    Point {
        position: Point,
        radius: f32,
        fill: Color,
        stroke: StrokeStyle,
    },
    Line { points: Vec<Point>, stroke: StrokeStyle },
    Segment { from: Point, to: Point, stroke: StrokeStyle },
    /// Rectangle outline
    Rect { min: Point, max: Point, stroke: StrokeStyle },
    Text {
        position: Point,
        text: String,
        color: Color,
        size: f32,
    },
}

/// One frame worth of drawing commands
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    pub drawing_queue: Vec<DrawCommand>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
        }
    }

    /// Start a new frame, keeping the allocation
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    pub fn size(&self) -> Point {
        Point::new(self.width as f64, self.height as f64)
    }

    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    pub fn is_empty(&self) -> bool {
        self.drawing_queue.is_empty()
    }

    pub fn render_tile(&mut self, coord: TileCoord, bounds: (Point, Point), opacity: f32) {
        self.drawing_queue.push(DrawCommand::Tile {
            coord,
            bounds,
            opacity: opacity.clamp(0.0, 1.0),
        });
    }

    pub fn render_placeholder(&mut self, from_zoom: u8, bounds: (Point, Point)) {
        self.drawing_queue
            .push(DrawCommand::Placeholder { from_zoom, bounds });
    }

    pub fn render_point(&mut self, position: Point, radius: f32, fill: Color, stroke: StrokeStyle) {
        self.drawing_queue.push(DrawCommand::Point {
            position,
            radius,
            fill,
            stroke,
        });
    }

    pub fn render_line(&mut self, points: &[Point], stroke: StrokeStyle) {
        if points.len() < 2 {
            return;
        }
        self.drawing_queue.push(DrawCommand::Line {
            points: points.to_vec(),
            stroke,
        });
    }

    pub fn render_segment(&mut self, from: Point, to: Point, stroke: StrokeStyle) {
        self.drawing_queue
            .push(DrawCommand::Segment { from, to, stroke });
    }

    /// Outline of the rectangle spanned by two arbitrary corners
    pub fn render_rect(&mut self, a: Point, b: Point, stroke: StrokeStyle) {
        let min = Point::new(a.x.min(b.x), a.y.min(b.y));
        let max = Point::new(a.x.max(b.x), a.y.max(b.y));
        self.drawing_queue.push(DrawCommand::Rect { min, max, stroke });
    }

    pub fn render_text(&mut self, position: Point, text: impl Into<String>, color: Color, size: f32) {
        self.drawing_queue.push(DrawCommand::Text {
            position,
            text: text.into(),
            color,
            size,
        });
    }
}
