use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};

/// Phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseEventKind {
    Press,
    Release,
    Move,
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }
}

/// A pointer event in widget-local pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// Button that changed state; `None` for moves
    pub button: Option<MouseButton>,
    pub position: Point,
    pub modifiers: KeyModifiers,
}

impl MouseEvent {
    pub fn press(button: MouseButton, position: Point) -> Self {
        Self {
            kind: MouseEventKind::Press,
            button: Some(button),
            position,
            modifiers: KeyModifiers::default(),
        }
    }

    pub fn release(button: MouseButton, position: Point) -> Self {
        Self {
            kind: MouseEventKind::Release,
            button: Some(button),
            position,
            modifiers: KeyModifiers::default(),
        }
    }

    pub fn moved(position: Point) -> Self {
        Self {
            kind: MouseEventKind::Move,
            button: None,
            position,
            modifiers: KeyModifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.button == Some(MouseButton::Left)
    }
}

/// Axis of a wheel event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelOrientation {
    Vertical,
    Horizontal,
}

/// Scroll wheel input; positive delta rotates away from the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub delta: f64,
    pub orientation: WheelOrientation,
    pub position: Point,
}

impl WheelEvent {
    pub fn vertical(delta: f64, position: Point) -> Self {
        Self {
            delta,
            orientation: WheelOrientation::Vertical,
            position,
        }
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl EventHandled {
    pub fn is_handled(self) -> bool {
        self == EventHandled::Handled
    }
}

/// Notifications emitted to the embedding application
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Center or zoom changed; once per logical navigation operation
    ViewChanged { center: LatLng, zoom: u8 },
    /// A drag selection was committed
    BoxDragged {
        bounds: LatLngBounds,
        start: LatLng,
        end: LatLng,
    },
    /// A press or release, tagged with the coordinate under the pointer
    MouseCoordinate { event: MouseEvent, coordinate: LatLng },
    /// A layer reported a hit on one of its geometries
    GeometryClicked { layer: String, geometry_id: String },
    LayerAdded { name: String },
    LayerRemoved { name: String },
}

/// Discriminant used to register listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    ViewChanged,
    BoxDragged,
    MouseCoordinate,
    GeometryClicked,
    LayerAdded,
    LayerRemoved,
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::ViewChanged { .. } => MapEventKind::ViewChanged,
            MapEvent::BoxDragged { .. } => MapEventKind::BoxDragged,
            MapEvent::MouseCoordinate { .. } => MapEventKind::MouseCoordinate,
            MapEvent::GeometryClicked { .. } => MapEventKind::GeometryClicked,
            MapEvent::LayerAdded { .. } => MapEventKind::LayerAdded,
            MapEvent::LayerRemoved { .. } => MapEventKind::LayerRemoved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_event_constructors() {
        let press = MouseEvent::press(MouseButton::Left, Point::new(3.0, 4.0));
        assert_eq!(press.kind, MouseEventKind::Press);
        assert!(press.is_primary());

        let moved = MouseEvent::moved(Point::new(1.0, 1.0));
        assert_eq!(moved.button, None);
        assert!(!moved.is_primary());
    }

    #[test]
    fn test_key_modifiers() {
        let modifiers = KeyModifiers::shift();
        assert!(modifiers.shift);
        assert!(!modifiers.ctrl);
        assert!(!modifiers.alt);
        assert!(!modifiers.meta);
    }

    #[test]
    fn test_event_kind() {
        let event = MapEvent::ViewChanged {
            center: LatLng::default(),
            zoom: 3,
        };
        assert_eq!(event.kind(), MapEventKind::ViewChanged);
    }
}
