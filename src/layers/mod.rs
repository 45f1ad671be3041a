pub mod macros;

pub mod base;
pub mod manager;
pub mod map_layer;
pub mod vector;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use manager::{LayerHit, LayerManager, ZoomImage};
pub use map_layer::MapLayer;
pub use vector::{Geometry, GeometryLayer, Shape};
