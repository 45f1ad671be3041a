//! Construction-time configuration for the map control
//!
//! Every field has a default matching the classic widget, so partial JSON
//! documents are accepted and missing sections fall back to those defaults.

use crate::{
    core::{
        constants::{ANIMATION_START_DELAY, ANIMATION_STEPS, ANIMATION_TICK_INTERVAL, DEFAULT_VIEWPORT_SIZE},
        geo::{LatLng, Point},
    },
    input::dispatcher::MouseMode,
    tiles::imagery::{CacheConfig, ProxyConfig},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Top-level configuration of a [`crate::MapControl`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapControlConfig {
    pub viewport_size: Point,
    pub initial_center: LatLng,
    pub initial_zoom: u8,
    pub initial_mouse_mode: MouseMode,
    pub show_scale: bool,
    pub show_crosshairs: bool,
    pub mouse_wheel_events: bool,
    pub animation: AnimationConfig,
    pub interaction: InteractionConfig,
    pub cache: Option<CacheConfig>,
    pub proxy: Option<ProxyConfig>,
}

impl Default for MapControlConfig {
    fn default() -> Self {
        Self {
            viewport_size: Point::new(DEFAULT_VIEWPORT_SIZE.0, DEFAULT_VIEWPORT_SIZE.1),
            initial_center: LatLng::new(0.0, 0.0),
            initial_zoom: 0,
            initial_mouse_mode: MouseMode::Panning,
            show_scale: false,
            show_crosshairs: true,
            mouse_wheel_events: true,
            animation: AnimationConfig::default(),
            interaction: InteractionConfig::default(),
            cache: None,
            proxy: None,
        }
    }
}

impl MapControlConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loading map control config from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.viewport_size.x > 0.0 && self.viewport_size.y > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "viewport size must be positive, got {}x{}",
                self.viewport_size.x, self.viewport_size.y
            )));
        }
        if !self.initial_center.is_valid() {
            return Err(MapError::InvalidConfig(format!(
                "initial center ({}, {}) is not a valid coordinate",
                self.initial_center.lat, self.initial_center.lng
            )));
        }
        self.animation.validate()
    }

    pub fn with_viewport_size(mut self, width: f64, height: f64) -> Self {
        self.viewport_size = Point::new(width, height);
        self
    }

    pub fn with_mouse_mode(mut self, mode: MouseMode) -> Self {
        self.initial_mouse_mode = mode;
        self
    }

    pub fn with_scale(mut self, show: bool) -> Self {
        self.show_scale = show;
        self
    }

    pub fn with_crosshairs(mut self, show: bool) -> Self {
        self.show_crosshairs = show;
        self
    }
}

/// Timing of the animated pan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub steps: u32,
    pub start_delay_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            steps: ANIMATION_STEPS,
            start_delay_ms: ANIMATION_START_DELAY.as_millis() as u64,
            tick_interval_ms: ANIMATION_TICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl AnimationConfig {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(MapError::InvalidConfig(
                "animation needs at least one step".to_string(),
            ));
        }
        if self.tick_interval_ms <= self.start_delay_ms {
            return Err(MapError::InvalidConfig(format!(
                "tick interval ({} ms) must exceed the start delay ({} ms)",
                self.tick_interval_ms, self.start_delay_ms
            )));
        }
        Ok(())
    }
}

/// Where a wheel zoom-in keeps the map fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WheelZoomAnchor {
    /// The coordinate under the cursor stays under the cursor
    #[default]
    Cursor,
    /// The coordinate under the cursor becomes the new center
    Recenter,
}

/// Modifier that routes presses to layer content only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PassthroughModifier {
    #[default]
    Shift,
    Ctrl,
    Alt,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub cancel_animation_on_press: bool,
    pub wheel_zoom_anchor: WheelZoomAnchor,
    pub passthrough_modifier: PassthroughModifier,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            cancel_animation_on_press: true,
            wheel_zoom_anchor: WheelZoomAnchor::Cursor,
            passthrough_modifier: PassthroughModifier::Shift,
        }
    }
}
