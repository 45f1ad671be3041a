//! Fluent construction of [`MapControl`] instances
//!
//! The builder collects configuration, the injected collaborators and the
//! initial layers, then validates everything in [`MapControlBuilder::build`].

use crate::{
    animation::scheduler::{Clock, SystemClock},
    core::{
        config::{AnimationConfig, InteractionConfig, MapControlConfig},
        geo::{LatLng, Point},
        map::MapControl,
    },
    input::dispatcher::MouseMode,
    layers::base::LayerTrait,
    tiles::imagery::{CacheConfig, ImageryService, NullImagery, ProxyConfig},
    Result,
};

/// Builder for creating and configuring MapControl instances
pub struct MapControlBuilder {
    config: MapControlConfig,
    imagery: Option<Box<dyn ImageryService>>,
    clock: Option<Box<dyn Clock>>,
    layers: Vec<Box<dyn LayerTrait>>,
}

impl MapControlBuilder {
    pub fn new() -> Self {
        Self {
            config: MapControlConfig::default(),
            imagery: None,
            clock: None,
            layers: Vec::new(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: MapControlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_viewport_size(mut self, width: f64, height: f64) -> Self {
        self.config.viewport_size = Point::new(width, height);
        self
    }

    /// Set the initial center and zoom level
    pub fn with_center_and_zoom(mut self, center: LatLng, zoom: u8) -> Self {
        self.config.initial_center = center;
        self.config.initial_zoom = zoom;
        self
    }

    pub fn with_mouse_mode(mut self, mode: MouseMode) -> Self {
        self.config.initial_mouse_mode = mode;
        self
    }

    pub fn with_scale(mut self, visible: bool) -> Self {
        self.config.show_scale = visible;
        self
    }

    pub fn with_crosshairs(mut self, visible: bool) -> Self {
        self.config.show_crosshairs = visible;
        self
    }

    pub fn with_mouse_wheel_events(mut self, enabled: bool) -> Self {
        self.config.mouse_wheel_events = enabled;
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.config.animation = animation;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionConfig) -> Self {
        self.config.interaction = interaction;
        self
    }

    pub fn with_persistent_cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = Some(cache);
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Inject the imagery service; defaults to one that never loads
    pub fn with_imagery(mut self, imagery: Box<dyn ImageryService>) -> Self {
        self.imagery = Some(imagery);
        self
    }

    /// Inject the time source; defaults to the system clock
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Add a layer; layers are added in call order
    pub fn with_layer(mut self, layer: Box<dyn LayerTrait>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn build(self) -> Result<MapControl> {
        let imagery = self.imagery.unwrap_or_else(|| Box::new(NullImagery::new()));
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock::new()));

        let mut control = MapControl::with_parts(self.config, imagery, clock)?;
        for layer in self.layers {
            control.add_layer(layer)?;
        }
        control.process_events();
        Ok(control)
    }
}

impl Default for MapControlBuilder {
    fn default() -> Self {
        Self::new()
    }
}
