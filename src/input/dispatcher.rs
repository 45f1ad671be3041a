//! Mouse-mode state machine.
//!
//! The dispatcher owns [`InteractionState`] and turns raw pointer input into
//! [`Action`]s. It never touches the view itself; the map control executes the
//! actions so that every mutation goes through the navigation code paths.

use crate::{
    core::{
        config::{InteractionConfig, PassthroughModifier},
        geo::Point,
    },
    input::events::{EventHandled, KeyModifiers, MouseButton, MouseEvent, WheelEvent, WheelOrientation},
};
use serde::{Deserialize, Serialize};

/// How press+drag and the zoom buttons behave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MouseMode {
    /// Drag pans the view; wheel and buttons zoom
    #[default]
    Panning,
    /// Drag pans the view; buttons do not zoom
    PanningNoZoom,
    /// Drag draws a selection box; wheel and buttons zoom
    Dragging,
    /// Drag draws a selection box; buttons do not zoom
    DraggingNoZoom,
}

impl MouseMode {
    pub fn pans(self) -> bool {
        matches!(self, MouseMode::Panning | MouseMode::PanningNoZoom)
    }

    pub fn drags(self) -> bool {
        matches!(self, MouseMode::Dragging | MouseMode::DraggingNoZoom)
    }

    pub fn allows_button_zoom(self) -> bool {
        matches!(self, MouseMode::Panning | MouseMode::Dragging)
    }
}

/// Pointer state tracked between events
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    pub mode: MouseMode,
    pub is_pressed: bool,
    /// Press position; in panning modes the last drag reference instead
    pub press_origin: Point,
    pub current: Point,
}

/// What the map control has to do in response to input
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hand the raw event to the layers for hit-testing or hover
    ForwardToLayers(MouseEvent),
    /// Scroll the view by a world pixel delta
    Pan(Point),
    ZoomIn,
    ZoomOut,
    /// Wheel zoom in anchored at a screen position
    WheelZoomIn(Point),
    WheelZoomOut,
    /// Stop an in-flight pan animation
    CancelAnimation,
    /// Commit a selection box spanned by two screen positions
    CommitBox { start: Point, end: Point },
    /// Emit the coordinate-tagged mouse notification
    EmitCoordinate(MouseEvent),
    Redraw,
}

/// View facts the dispatcher needs but does not own
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchContext {
    pub has_layers: bool,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

#[derive(Debug, Clone)]
pub struct InteractionDispatcher {
    state: InteractionState,
    wheel_enabled: bool,
    config: InteractionConfig,
}

impl InteractionDispatcher {
    pub fn new(mode: MouseMode, wheel_enabled: bool, config: InteractionConfig) -> Self {
        Self {
            state: InteractionState {
                mode,
                ..Default::default()
            },
            wheel_enabled,
            config,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn mode(&self) -> MouseMode {
        self.state.mode
    }

    pub fn set_mode(&mut self, mode: MouseMode) {
        self.state.mode = mode;
    }

    pub fn is_pressed(&self) -> bool {
        self.state.is_pressed
    }

    pub fn set_wheel_enabled(&mut self, enabled: bool) {
        self.wheel_enabled = enabled;
    }

    pub fn wheel_enabled(&self) -> bool {
        self.wheel_enabled
    }

    /// Live selection rectangle, if a drag selection is in progress
    pub fn selection(&self) -> Option<(Point, Point)> {
        (self.state.is_pressed && self.state.mode.drags())
            .then_some((self.state.press_origin, self.state.current))
    }

    fn is_passthrough(&self, modifiers: &KeyModifiers) -> bool {
        match self.config.passthrough_modifier {
            PassthroughModifier::Shift => modifiers.shift,
            PassthroughModifier::Ctrl => modifiers.ctrl,
            PassthroughModifier::Alt => modifiers.alt,
            PassthroughModifier::None => false,
        }
    }

    pub fn press(&mut self, event: MouseEvent, ctx: &DispatchContext) -> Vec<Action> {
        let mut actions = vec![Action::ForwardToLayers(event)];

        if !self.is_passthrough(&event.modifiers) && ctx.has_layers {
            match event.button {
                Some(MouseButton::Left) => {
                    self.state.is_pressed = true;
                    self.state.press_origin = event.position;
                    self.state.current = event.position;
                    if self.config.cancel_animation_on_press {
                        actions.push(Action::CancelAnimation);
                    }
                }
                Some(MouseButton::Right) if self.zoom_buttons_active() => {
                    actions.push(Action::ZoomIn);
                }
                Some(MouseButton::Middle) if self.zoom_buttons_active() => {
                    actions.push(Action::ZoomOut);
                }
                _ => {}
            }
        }

        actions.push(Action::EmitCoordinate(event));
        actions
    }

    fn zoom_buttons_active(&self) -> bool {
        self.wheel_enabled && self.state.mode.allows_button_zoom()
    }

    pub fn mouse_move(&mut self, event: MouseEvent) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);

        if self.state.is_pressed && self.state.mode.pans() {
            let offset = self.state.press_origin.subtract(&event.position);
            self.state.press_origin = event.position;
            self.state.current = event.position;
            actions.push(Action::Pan(offset));
        } else if self.state.is_pressed && self.state.mode.drags() {
            self.state.current = event.position;
        } else {
            actions.push(Action::ForwardToLayers(event));
        }

        actions.push(Action::Redraw);
        actions
    }

    pub fn release(&mut self, event: MouseEvent) -> Vec<Action> {
        let mut actions = Vec::with_capacity(3);
        let was_pressed = std::mem::take(&mut self.state.is_pressed);

        if was_pressed && self.state.mode.drags() {
            self.state.current = event.position;
            actions.push(Action::CommitBox {
                start: self.state.press_origin,
                end: self.state.current,
            });
            actions.push(Action::Redraw);
        }

        actions.push(Action::EmitCoordinate(event));
        actions
    }

    /// Wheel input; the returned status tells the host whether to propagate the event
    pub fn wheel(&mut self, event: WheelEvent, ctx: &DispatchContext) -> (EventHandled, Vec<Action>) {
        if !self.wheel_enabled || event.orientation != WheelOrientation::Vertical {
            return (EventHandled::NotHandled, vec![]);
        }

        if event.delta > 0.0 {
            if ctx.zoom >= ctx.max_zoom {
                return (EventHandled::NotHandled, vec![]);
            }
            (EventHandled::Handled, vec![Action::WheelZoomIn(event.position)])
        } else if event.delta < 0.0 {
            if ctx.zoom <= ctx.min_zoom {
                return (EventHandled::NotHandled, vec![]);
            }
            (EventHandled::Handled, vec![Action::WheelZoomOut])
        } else {
            (EventHandled::NotHandled, vec![])
        }
    }
}
