use crate::{
    core::{projection::MapAdapter, viewport::Projector},
    input::events::MouseEvent,
    layers::base::LayerTrait,
    prelude::HashMap,
    rendering::context::RenderContext,
    MapError, Result,
};
use std::sync::Arc;

/// Scaled stand-in for the previous zoom level while new imagery loads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomImage {
    pub from_zoom: u8,
    /// Magnification relative to the current level, `2^(to - from)`
    pub scale: f64,
}

/// A geometry hit reported by a layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerHit {
    pub layer: String,
    pub geometry_id: String,
}

/// Manages layers for the map, handling ordering and drawing
#[derive(Default)]
pub struct LayerManager {
    /// All layers indexed by name
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Layer names in draw order (ascending z-index, then insertion)
    render_order: Vec<String>,
    zoom_image: Option<ZoomImage>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer; names must be unique
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let name = layer.name().to_string();
        if self.layers.contains_key(&name) {
            return Err(MapError::Layer(format!("layer '{}' already exists", name)));
        }
        let z_index = layer.z_index();
        self.layers.insert(name.clone(), layer);

        let insert_pos = self
            .render_order
            .iter()
            .position(|existing| {
                self.layers
                    .get(existing)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, name);
        Ok(())
    }

    pub fn remove_layer(&mut self, name: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|existing| existing != name);
        self.layers.remove(name)
    }

    pub fn get_layer(&self, name: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(name).map(|l| l.as_ref())
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, name: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers.get_mut(name).map(|layer| f(layer.as_mut()))
    }

    /// Layer names in draw order
    pub fn layer_names(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Gets all layers in draw order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.render_order
            .iter()
            .filter_map(|name| self.layers.get(name).map(|l| l.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Coordinate mapping of the first layer in draw order that provides one
    pub fn active_adapter(&self) -> Option<Arc<dyn MapAdapter>> {
        self.layers().into_iter().find_map(|layer| layer.map_adapter())
    }

    /// Imagery pass over visible layers; a failing layer is skipped
    pub fn draw_image(&self, context: &mut RenderContext, projector: &Projector) {
        for layer in self.layers().into_iter().filter(|l| l.is_visible()) {
            if let Err(e) = layer.draw_image(context, projector) {
                log::warn!("layer '{}' failed to draw imagery: {}", layer.name(), e);
            }
        }
    }

    pub fn draw_geometries(&self, context: &mut RenderContext, projector: &Projector) {
        for layer in self.layers().into_iter().filter(|l| l.is_visible()) {
            if let Err(e) = layer.draw_geometries(context, projector) {
                log::warn!("layer '{}' failed to draw geometries: {}", layer.name(), e);
            }
        }
    }

    /// Offers a pointer event to visible interactive layers, topmost first
    pub fn forward_mouse_event(&mut self, event: &MouseEvent, projector: &Projector) -> Vec<LayerHit> {
        let mut hits = Vec::new();
        for name in self.render_order.iter().rev() {
            let Some(layer) = self.layers.get_mut(name) else {
                continue;
            };
            if !layer.is_visible() || !layer.is_interactive() {
                continue;
            }
            hits.extend(
                layer
                    .handle_mouse_event(event, projector)
                    .into_iter()
                    .map(|geometry_id| LayerHit {
                        layer: name.clone(),
                        geometry_id,
                    }),
            );
        }
        hits
    }

    /// Records a zoom level change so the old frame can be shown scaled
    pub fn note_zoom_change(&mut self, from: u8, to: u8) {
        let from_zoom = self.zoom_image.map_or(from, |image| image.from_zoom);
        self.zoom_image = Some(ZoomImage {
            from_zoom,
            scale: 2_f64.powi(to as i32 - from_zoom as i32),
        });
    }

    pub fn zoom_image(&self) -> Option<ZoomImage> {
        self.zoom_image
    }

    /// Drops the placeholder; returns whether one existed
    pub fn remove_zoom_image(&mut self) -> bool {
        self.zoom_image.take().is_some()
    }
}
