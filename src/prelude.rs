//! Prelude module for common mapctl types and traits
//!
//! Re-exports the most commonly used types for `use mapctl::prelude::*;`

pub use crate::core::{
    builder::MapControlBuilder,
    config::{AnimationConfig, InteractionConfig, MapControlConfig, PassthroughModifier, WheelZoomAnchor},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::MapControl,
    projection::{MapAdapter, MercatorAdapter},
    viewport::{Projector, Viewport},
};

pub use crate::layers::{
    base::{LayerProperties, LayerTrait, LayerType},
    manager::LayerManager,
    map_layer::MapLayer,
    vector::{Geometry, GeometryLayer, LineStyle, PointStyle, Shape},
};

pub use crate::input::{
    dispatcher::MouseMode,
    events::{
        EventHandled, KeyModifiers, MapEvent, MapEventKind, MouseButton, MouseEvent, WheelEvent,
        WheelOrientation,
    },
};

pub use crate::animation::scheduler::{Clock, ManualClock, SystemClock};

pub use crate::rendering::context::{Color, DrawCommand, RenderContext, StrokeStyle};

pub use crate::tiles::{
    bridge::ImageryNotifier,
    imagery::{CacheConfig, ImageryService, NullImagery, ProxyConfig},
};

#[cfg(feature = "egui")]
pub use crate::ui::widget::MapControlWidget;

pub use crate::{Error as MapError, Result};

pub use std::{
    collections::VecDeque,
    sync::Arc,
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
