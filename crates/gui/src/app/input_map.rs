//! egui input → editor input events

use eframe::egui;
use scene_editor_lib::input::{InputEvent, KeyCode, MouseButton, WheelDirection};

/// Translate this frame's raw egui events, in arrival order
pub fn collect_events(input: &egui::InputState) -> Vec<InputEvent> {
    let mut events = Vec::new();
    if input.viewport().close_requested() {
        events.push(InputEvent::Quit);
    }

    for event in &input.raw.events {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let Some(button) = map_button(*button) else {
                    continue;
                };
                let pos = [pos.x, pos.y];
                events.push(if *pressed {
                    InputEvent::MouseDown { button, pos }
                } else {
                    InputEvent::MouseUp { button, pos }
                });
            }
            egui::Event::PointerMoved(pos) => {
                events.push(InputEvent::MouseMove { pos: [pos.x, pos.y] });
            }
            egui::Event::MouseWheel { delta, .. } => {
                if delta.y > 0.0 {
                    events.push(InputEvent::MouseWheel { direction: WheelDirection::Up });
                } else if delta.y < 0.0 {
                    events.push(InputEvent::MouseWheel { direction: WheelDirection::Down });
                }
            }
            egui::Event::Text(text) => {
                events.extend(text.chars().map(|ch| InputEvent::KeyDown {
                    key: KeyCode::Other,
                    ch: Some(ch),
                }));
            }
            egui::Event::Key {
                key, pressed: true, ..
            } => {
                let key = match key {
                    egui::Key::Enter => KeyCode::Enter,
                    egui::Key::Escape => KeyCode::Escape,
                    egui::Key::Backspace => KeyCode::Backspace,
                    // Printable keys arrive as Text
                    _ => continue,
                };
                events.push(InputEvent::KeyDown { key, ch: None });
            }
            _ => {}
        }
    }
    events
}

fn map_button(button: egui::PointerButton) -> Option<MouseButton> {
    match button {
        egui::PointerButton::Primary => Some(MouseButton::Left),
        egui::PointerButton::Middle => Some(MouseButton::Middle),
        egui::PointerButton::Secondary => Some(MouseButton::Right),
        _ => None,
    }
}
