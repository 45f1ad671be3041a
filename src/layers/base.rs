use crate::{
    core::{projection::MapAdapter, viewport::Projector},
    input::events::MouseEvent,
    rendering::context::RenderContext,
    Result,
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    /// Base imagery with its own coordinate mapping
    Map,
    /// Points and lines drawn above the imagery
    Geometry,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Map => write!(f, "map"),
            LayerType::Geometry => write!(f, "geometry"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerProperties {
    /// Unique within a map control; used for lookup
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
    /// Whether the layer receives forwarded mouse events
    pub interactive: bool,
}

impl LayerProperties {
    pub fn new(name: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            name: name.into(),
            layer_type,
            z_index: 0,
            opacity: 1.0,
            visible: true,
            interactive: true,
        }
    }
}

/// A source of map content. Layers are drawn in ascending `z_index`.
pub trait LayerTrait: Send {
    fn name(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    fn z_index(&self) -> i32;

    fn set_z_index(&mut self, z_index: i32);

    fn opacity(&self) -> f32;

    fn set_opacity(&mut self, opacity: f32);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    fn is_interactive(&self) -> bool {
        true
    }

    /// Coordinate mapping of this layer; the first layer that has one drives the view
    fn map_adapter(&self) -> Option<Arc<dyn MapAdapter>> {
        None
    }

    /// Base imagery pass
    fn draw_image(&self, _context: &mut RenderContext, _projector: &Projector) -> Result<()> {
        Ok(())
    }

    /// Geometry pass, drawn after every layer's imagery
    fn draw_geometries(&self, _context: &mut RenderContext, _projector: &Projector) -> Result<()> {
        Ok(())
    }

    /// Pointer input the map did not consume. Returns ids of geometries hit.
    fn handle_mouse_event(&mut self, _event: &MouseEvent, _projector: &Projector) -> Vec<String> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn std::any::Any;

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_properties() {
        let props = LayerProperties::new("roads", LayerType::Geometry);

        assert_eq!(props.name, "roads");
        assert_eq!(props.layer_type, LayerType::Geometry);
        assert_eq!(props.z_index, 0);
        assert_eq!(props.opacity, 1.0);
        assert!(props.visible);
        assert!(props.interactive);
    }

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Map.to_string(), "map");
        assert_eq!(LayerType::Geometry.to_string(), "geometry");
    }
}
