pub mod dispatcher;
pub mod events;
pub mod handler;

// Re-export the essential types
pub use dispatcher::{Action, InteractionDispatcher, InteractionState, MouseMode};
pub use events::{
    EventHandled, KeyModifiers, MapEvent, MapEventKind, MouseButton, MouseEvent, MouseEventKind,
    WheelEvent, WheelOrientation,
};
pub use handler::{EventCallback, EventManager};
