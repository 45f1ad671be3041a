pub mod bridge;
pub mod imagery;

// Re-exports for convenience
pub use bridge::{BridgeSummary, ImageryEvent, ImageryNotifier, TileArrivalBridge};
pub use imagery::{CacheConfig, ImageryService, NullImagery, ProxyConfig};
