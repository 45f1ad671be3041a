//! egui adapter for [`MapControl`].
//!
//! Translates egui pointer and scroll input into control events, pumps the
//! control once per frame and rasterizes the presented frame with the egui
//! painter. Tiles are drawn as placeholders; decoding imagery is left to the
//! host's imagery service.

use crate::{
    core::{geo::Point, map::MapControl},
    input::events::{KeyModifiers, MouseButton, MouseEvent, WheelEvent, WheelOrientation},
    rendering::context::{DrawCommand, RenderContext, StrokeStyle},
};
use egui::{Align2, Color32, FontId, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2, Widget};

pub struct MapControlWidget<'a> {
    control: &'a mut MapControl,
    size: Option<Vec2>,
}

impl<'a> MapControlWidget<'a> {
    pub fn new(control: &'a mut MapControl) -> Self {
        Self {
            control,
            size: None,
        }
    }

    /// Fixed widget size; defaults to the available space
    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }
}

fn to_local(rect: Rect, pos: Pos2) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

fn to_screen(rect: Rect, point: &Point) -> Pos2 {
    Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

fn convert_button(button: egui::PointerButton) -> MouseButton {
    match button {
        egui::PointerButton::Primary => MouseButton::Left,
        egui::PointerButton::Secondary => MouseButton::Right,
        egui::PointerButton::Middle => MouseButton::Middle,
        egui::PointerButton::Extra1 => MouseButton::Other(4),
        egui::PointerButton::Extra2 => MouseButton::Other(5),
    }
}

fn convert_modifiers(modifiers: egui::Modifiers) -> KeyModifiers {
    KeyModifiers {
        shift: modifiers.shift,
        ctrl: modifiers.ctrl,
        alt: modifiers.alt,
        meta: modifiers.mac_cmd,
    }
}

fn stroke(style: &StrokeStyle) -> Stroke {
    Stroke::new(style.width, Color32::from(style.color))
}

impl<'a> MapControlWidget<'a> {
    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let events = ui.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    modifiers,
                } => {
                    if pressed && !rect.contains(pos) {
                        continue;
                    }
                    let position = to_local(rect, pos);
                    let button = convert_button(button);
                    let modifiers = convert_modifiers(modifiers);
                    if pressed {
                        self.control
                            .mouse_press(MouseEvent::press(button, position).with_modifiers(modifiers));
                    } else {
                        self.control
                            .mouse_release(MouseEvent::release(button, position).with_modifiers(modifiers));
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    if rect.contains(pos) || self.control.is_mouse_pressed() {
                        self.control.mouse_move(MouseEvent::moved(to_local(rect, pos)));
                    }
                }
                _ => {}
            }
        }

        if let Some(hover) = response.hover_pos() {
            let scroll = ui.input(|i| i.raw_scroll_delta);
            let position = to_local(rect, hover);
            if scroll.y != 0.0 {
                self.control
                    .wheel(WheelEvent::vertical(scroll.y as f64, position));
            }
            if scroll.x != 0.0 {
                self.control.wheel(WheelEvent {
                    delta: scroll.x as f64,
                    orientation: WheelOrientation::Horizontal,
                    position,
                });
            }
        }
    }
}

fn paint_frame(painter: &egui::Painter, rect: Rect, frame: &RenderContext) {
    for command in frame.get_drawing_queue() {
        match command {
            DrawCommand::Tile { bounds, opacity, .. } => {
                let tile = Rect::from_two_pos(to_screen(rect, &bounds.0), to_screen(rect, &bounds.1));
                let alpha = (opacity * 255.0) as u8;
                painter.rect_filled(tile, 0.0, Color32::from_rgba_unmultiplied(232, 232, 228, alpha));
                painter.rect_stroke(tile, 0.0, Stroke::new(1.0, Color32::from_gray(200)));
            }
            DrawCommand::Placeholder { bounds, .. } => {
                let placeholder =
                    Rect::from_two_pos(to_screen(rect, &bounds.0), to_screen(rect, &bounds.1));
                painter.rect_filled(placeholder, 0.0, Color32::from_gray(210));
            }
            DrawCommand::Point {
                position,
                radius,
                fill,
                stroke: style,
            } => {
                painter.circle(to_screen(rect, position), *radius, Color32::from(*fill), stroke(style));
            }
            DrawCommand::Line { points, stroke: style } => {
                let points = points.iter().map(|p| to_screen(rect, p)).collect();
                painter.add(egui::Shape::line(points, stroke(style)));
            }
            DrawCommand::Segment { from, to, stroke: style } => {
                painter.line_segment([to_screen(rect, from), to_screen(rect, to)], stroke(style));
            }
            DrawCommand::Rect { min, max, stroke: style } => {
                let outline = Rect::from_two_pos(to_screen(rect, min), to_screen(rect, max));
                painter.rect_stroke(outline, 0.0, stroke(style));
            }
            DrawCommand::Text {
                position,
                text,
                color,
                size,
            } => {
                painter.text(
                    to_screen(rect, position),
                    Align2::LEFT_BOTTOM,
                    text,
                    FontId::proportional(*size),
                    Color32::from(*color),
                );
            }
        }
    }
}

impl<'a> Widget for MapControlWidget<'a> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let desired_size = self.size.unwrap_or_else(|| ui.available_size());
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        self.control
            .resize(Point::new(rect.width() as f64, rect.height() as f64));
        self.handle_input(ui, rect, &response);
        self.control.update();

        let painter = ui.painter_at(rect);
        paint_frame(&painter, rect, self.control.paint());

        if self.control.is_animating() || self.control.loading_queue_size() > 0 {
            ui.ctx().request_repaint();
        }
        response
    }
}
