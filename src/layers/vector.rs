use crate::{
    core::{
        constants::HIT_TOLERANCE,
        geo::{LatLng, LatLngBounds, Point},
        viewport::Projector,
    },
    input::events::{MouseEvent, MouseEventKind},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    prelude::HashMap,
    rendering::context::{Color, RenderContext, StrokeStyle},
    Result,
};
use serde::{Deserialize, Serialize};

/// Style for point geometries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub fill_color: Color,
    pub stroke: StrokeStyle,
    /// Radius in pixels, also the base hit radius
    pub radius: f32,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            fill_color: Color::RED,
            stroke: StrokeStyle::new(Color::WHITE, 2.0),
            radius: 5.0,
        }
    }
}

/// Style for line strings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub stroke: StrokeStyle,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle::new(Color::BLUE, 2.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point(LatLng),
    LineString(Vec<LatLng>),
}

/// A geometry owned by a layer and identified by `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub id: String,
    pub shape: Shape,
}

impl Geometry {
    pub fn point(id: impl Into<String>, position: LatLng) -> Self {
        Self {
            id: id.into(),
            shape: Shape::Point(position),
        }
    }

    pub fn line_string(id: impl Into<String>, points: Vec<LatLng>) -> Self {
        Self {
            id: id.into(),
            shape: Shape::LineString(points),
        }
    }

    /// Empty for a line string without points
    pub fn bounding_box(&self) -> LatLngBounds {
        match &self.shape {
            Shape::Point(position) => LatLngBounds::new(*position, *position),
            Shape::LineString(points) => LatLngBounds::from_points(points),
        }
    }

    /// Position of a point geometry
    pub fn position(&self) -> Option<LatLng> {
        match &self.shape {
            Shape::Point(position) => Some(*position),
            Shape::LineString(_) => None,
        }
    }
}

/// Layer of points and line strings drawn in the geometry pass
pub struct GeometryLayer {
    properties: LayerProperties,
    geometries: HashMap<String, Geometry>,
    /// Insertion order, so drawing is deterministic
    order: Vec<String>,
    point_style: PointStyle,
    line_style: LineStyle,
    hovered: Option<String>,
}

impl GeometryLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            properties: LayerProperties::new(name, LayerType::Geometry),
            geometries: HashMap::default(),
            order: Vec::new(),
            point_style: PointStyle::default(),
            line_style: LineStyle::default(),
            hovered: None,
        }
    }

    /// Adds or replaces a geometry with the same id
    pub fn add_geometry(&mut self, geometry: Geometry) {
        if !self.geometries.contains_key(&geometry.id) {
            self.order.push(geometry.id.clone());
        }
        self.geometries.insert(geometry.id.clone(), geometry);
    }

    pub fn remove_geometry(&mut self, id: &str) -> Option<Geometry> {
        self.order.retain(|existing| existing != id);
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        self.geometries.remove(id)
    }

    pub fn geometry(&self, id: &str) -> Option<&Geometry> {
        self.geometries.get(id)
    }

    pub fn geometry_mut(&mut self, id: &str) -> Option<&mut Geometry> {
        self.geometries.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn set_point_style(&mut self, style: PointStyle) {
        self.point_style = style;
    }

    pub fn set_line_style(&mut self, style: LineStyle) {
        self.line_style = style;
    }

    /// Point geometry currently under the pointer
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Union of all geometry bounding boxes
    pub fn bounds(&self) -> LatLngBounds {
        let mut bounds = LatLngBounds::empty();
        for geometry in self.geometries.values() {
            let bbox = geometry.bounding_box();
            if !bbox.is_empty() {
                bounds.extend(&bbox.south_west);
                bounds.extend(&bbox.north_east);
            }
        }
        bounds
    }

    /// Point geometries within the hit radius of a screen position
    pub fn hit_test(&self, position: &Point, projector: &Projector) -> Vec<String> {
        let tolerance = self.point_style.radius as f64 + HIT_TOLERANCE;
        self.order
            .iter()
            .filter_map(|id| self.geometries.get(id))
            .filter_map(|geometry| {
                let screen = projector.to_screen(&geometry.position()?);
                (screen.distance_to(position) <= tolerance).then(|| geometry.id.clone())
            })
            .collect()
    }
}

impl LayerTrait for GeometryLayer {
    crate::impl_layer_trait!(GeometryLayer, properties);

    fn draw_geometries(&self, context: &mut RenderContext, projector: &Projector) -> Result<()> {
        let alpha = (self.properties.opacity * 255.0).round() as u8;

        for geometry in self.order.iter().filter_map(|id| self.geometries.get(id)) {
            match &geometry.shape {
                Shape::Point(position) => {
                    let style = self.point_style;
                    context.render_point(
                        projector.to_screen(position),
                        style.radius,
                        style.fill_color.with_alpha(alpha),
                        style.stroke,
                    );
                }
                Shape::LineString(points) => {
                    let screen: Vec<Point> = points.iter().map(|p| projector.to_screen(p)).collect();
                    context.render_line(&screen, self.line_style.stroke);
                }
            }
        }
        Ok(())
    }

    fn handle_mouse_event(&mut self, event: &MouseEvent, projector: &Projector) -> Vec<String> {
        let hits = self.hit_test(&event.position, projector);
        match event.kind {
            MouseEventKind::Press => hits,
            MouseEventKind::Move => {
                self.hovered = hits.into_iter().next();
                Vec::new()
            }
            MouseEventKind::Release => Vec::new(),
        }
    }
}
