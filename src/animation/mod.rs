pub mod driver;
pub mod scheduler;

pub use driver::{AnimationRun, AnimationState, PanAnimator, TickOutcome};
pub use scheduler::{Clock, ManualClock, Scheduler, SystemClock, TimerTask};
