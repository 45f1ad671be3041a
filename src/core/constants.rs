//! Engine-wide constants taken from the behaviour of classic tile map widgets.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

use std::time::Duration;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Viewport size used when nothing else is configured.
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (100.0, 100.0);

/// Number of steps a `move_to` pan animation is divided into.
pub const ANIMATION_STEPS: u32 = 25;

/// Delay before the first animation tick.
pub const ANIMATION_START_DELAY: Duration = Duration::from_millis(40);

/// Delay between subsequent animation ticks. Larger than the start delay.
pub const ANIMATION_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Scale bar distances in meters, indexed by zoom level.
pub const SCALE_DISTANCES: [f64; 19] = [
    5_000_000.0,
    2_000_000.0,
    1_000_000.0,
    1_000_000.0,
    1_000_000.0,
    100_000.0,
    100_000.0,
    50_000.0,
    50_000.0,
    10_000.0,
    10_000.0,
    10_000.0,
    1_000.0,
    1_000.0,
    500.0,
    200.0,
    100.0,
    50.0,
    25.0,
];

/// Zoom level at which one pixel covers `SCALE_METERS_PER_PIXEL` meters.
pub const SCALE_REFERENCE_ZOOM: i32 = 18;

/// Ground resolution at the reference zoom level.
pub const SCALE_METERS_PER_PIXEL: f64 = 0.597164;

/// Half length of the crosshair arms in pixels.
pub const CROSSHAIR_HALF_LENGTH: f64 = 10.0;

/// Pick radius for point geometries in pixels.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Oldest notifications are dropped beyond this many undrained events.
pub const MAX_QUEUED_EVENTS: usize = 1024;
