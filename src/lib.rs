//! # mapctl
//!
//! Interactive viewport controller for tiled map widgets.
//!
//! [`MapControl`] converts between screen pixels and geographic coordinates,
//! drives pan and zoom navigation (animated pans, cursor-anchored wheel zoom),
//! arbitrates mouse modes and composes a double-buffered frame from layered
//! map and vector content. Tile fetching and rasterization stay with the host:
//! an [`ImageryService`] is injected at construction and frames are recorded
//! as [`rendering::context::DrawCommand`]s.

pub mod animation;
pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod tiles;
#[cfg(feature = "egui")]
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapControlBuilder,
    config::MapControlConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::MapControl,
    projection::{MapAdapter, MercatorAdapter},
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait,
    map_layer::MapLayer,
    vector::{Geometry, GeometryLayer},
};

pub use input::{
    dispatcher::MouseMode,
    events::{EventHandled, MapEvent, MapEventKind, MouseButton, MouseEvent, WheelEvent},
};

pub use tiles::imagery::{CacheConfig, ImageryService, NullImagery, ProxyConfig};

pub use animation::scheduler::{Clock, ManualClock, SystemClock};

pub use rendering::context::RenderContext;

#[cfg(feature = "egui")]
pub use ui::widget::MapControlWidget;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Imagery error: {0}")]
    Imagery(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend; safe to call more than once
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
