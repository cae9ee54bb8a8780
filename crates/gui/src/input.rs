//! Input dispatcher.
//!
//! Turns raw window events into state changes. Pointer presses are resolved in a fixed order
//! (palette, toolbar, camera drag) and the keyboard goes to the modal entry whenever it is
//! open, to the global shortcuts otherwise.

use crate::command::{self, Command};
use crate::i18n::t;
use crate::state::scene::primitive_label;
use crate::state::{CommitOutcome, EditorState, InteractionMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    /// Away from the user, zooms in
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Escape,
    Backspace,
    /// Anything else; the typed character, if any, travels alongside
    Other,
}

/// Window events as the core sees them
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    MouseDown { button: MouseButton, pos: [f32; 2] },
    MouseUp { button: MouseButton, pos: [f32; 2] },
    MouseMove { pos: [f32; 2] },
    MouseWheel { direction: WheelDirection },
    KeyDown { key: KeyCode, ch: Option<char> },
}

/// Whether the main loop keeps going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Global single-key shortcuts, matched case-insensitively
pub fn shortcut(ch: char) -> Option<Command> {
    match ch.to_ascii_lowercase() {
        'r' => Some(Command::ResetAccentRotation),
        'l' => Some(Command::ToggleLighting),
        'c' => Some(Command::ClearScene),
        'v' => Some(Command::ResetCamera),
        'm' => Some(Command::CycleRenderMode),
        _ => None,
    }
}

/// Apply one event to the editor state.
pub fn dispatch(state: &mut EditorState, event: InputEvent) -> Flow {
    match event {
        InputEvent::Quit => return Flow::Exit,
        InputEvent::MouseDown { button: MouseButton::Left, pos } => pointer_down(state, pos),
        InputEvent::MouseUp { button: MouseButton::Left, .. } => {
            if state.drag_anchor.take().is_some() {
                tracing::debug!("Camera drag ended");
            }
        }
        InputEvent::MouseDown { .. } | InputEvent::MouseUp { .. } => {}
        InputEvent::MouseMove { pos } => pointer_move(state, pos),
        InputEvent::MouseWheel { direction } => {
            let step = state.settings.camera.zoom_step;
            let delta = match direction {
                WheelDirection::Up => step,
                WheelDirection::Down => -step,
            };
            state.scene.adjust_zoom(delta);
        }
        InputEvent::KeyDown { key, ch } => {
            if state.modal.active {
                modal_key(state, key, ch);
            } else if let Some(cmd) = ch.and_then(shortcut) {
                command::execute(state, cmd);
            }
        }
    }
    Flow::Continue
}

/// Fold a batch of events; stops at the first quit
pub fn dispatch_all(state: &mut EditorState, events: impl IntoIterator<Item = InputEvent>) -> Flow {
    for event in events {
        if dispatch(state, event) == Flow::Exit {
            return Flow::Exit;
        }
    }
    Flow::Continue
}

fn pointer_down(state: &mut EditorState, pos: [f32; 2]) {
    let mode = state.mode();

    if mode == InteractionMode::ColorPicking && state.layout.palette.contains(pos) {
        let region = state.layout.palette;
        if state.picker.try_pick(pos, &region, &mut state.scene).is_some() {
            state.set_status(t("status.color_set"));
        }
        return;
    }

    if let Some(cmd) = state.layout.button_at(pos).map(|b| b.command) {
        command::execute(state, cmd);
        return;
    }

    if mode == InteractionMode::Idle {
        state.drag_anchor = Some(pos);
        tracing::debug!("Camera drag started at {pos:?}");
    }
}

fn pointer_move(state: &mut EditorState, pos: [f32; 2]) {
    let Some(prev) = state.drag_anchor else {
        return;
    };
    let k = state.settings.camera.drag_sensitivity;
    let dx = pos[0] - prev[0];
    let dy = pos[1] - prev[1];
    state.scene.rotate_camera_by(dx * k, dy * k);
    state.drag_anchor = Some(pos);
}

fn modal_key(state: &mut EditorState, key: KeyCode, ch: Option<char>) {
    match key {
        KeyCode::Enter => commit(state),
        KeyCode::Escape => {
            state.modal.cancel();
            state.set_status(t("status.cancelled"));
        }
        KeyCode::Backspace => state.modal.backspace(),
        KeyCode::Other => {
            if let Some(c) = ch.filter(|c| !c.is_control()) {
                state.modal.push_char(c);
            }
        }
    }
}

fn commit(state: &mut EditorState) {
    match state.modal.commit(&mut state.scene) {
        Ok(CommitOutcome::Primitive(_)) => {
            let label = state
                .scene
                .primitives()
                .last()
                .map(primitive_label)
                .unwrap_or_default();
            state.set_status(format!("{}: {label}", t("status.added")));
        }
        Ok(CommitOutcome::Light { effective: true }) => state.set_status(t("status.light_added")),
        Ok(CommitOutcome::Light { effective: false }) => {
            state.set_status(t("status.light_inactive"))
        }
        Err(e) => state.set_error(format!("{}: {e}", t("status.input_error"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StatusKind;
    use shared::{Camera, ColorTarget, FillMode, InputKind};

    fn left_down(pos: [f32; 2]) -> InputEvent {
        InputEvent::MouseDown { button: MouseButton::Left, pos }
    }

    fn left_up(pos: [f32; 2]) -> InputEvent {
        InputEvent::MouseUp { button: MouseButton::Left, pos }
    }

    fn key(ch: char) -> InputEvent {
        InputEvent::KeyDown { key: KeyCode::Other, ch: Some(ch) }
    }

    fn enter() -> InputEvent {
        InputEvent::KeyDown { key: KeyCode::Enter, ch: Some('\r') }
    }

    fn button_center(state: &EditorState, cmd: Command) -> [f32; 2] {
        state.layout.button_for(&cmd).unwrap().rect.center()
    }

    /// A point that is neither on a button nor on the palette
    const EMPTY: [f32; 2] = [400.0, 400.0];

    #[test]
    fn test_quit_exits() {
        let mut state = EditorState::default();
        assert_eq!(dispatch(&mut state, InputEvent::Quit), Flow::Exit);
        let flow = dispatch_all(&mut state, [key('m'), InputEvent::Quit, key('m')]);
        assert_eq!(flow, Flow::Exit);
        // The event after the quit is never seen
        assert_eq!(state.scene.render_settings().fill_mode, FillMode::Wireframe);
    }

    #[test]
    fn test_drag_rotates_camera() {
        let mut state = EditorState::default();
        dispatch(&mut state, left_down(EMPTY));
        assert_eq!(state.mode(), InteractionMode::CameraDragging);

        dispatch(&mut state, InputEvent::MouseMove { pos: [410.0, 420.0] });
        assert_eq!(state.scene.camera().rotation_y, 5.0);
        assert_eq!(state.scene.camera().rotation_x, 10.0);

        // Deltas are taken from the previous move, not the press
        dispatch(&mut state, InputEvent::MouseMove { pos: [412.0, 420.0] });
        assert_eq!(state.scene.camera().rotation_y, 6.0);

        dispatch(&mut state, left_up([412.0, 420.0]));
        assert_eq!(state.mode(), InteractionMode::Idle);

        dispatch(&mut state, InputEvent::MouseMove { pos: [500.0, 500.0] });
        assert_eq!(state.scene.camera().rotation_y, 6.0);
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut state = EditorState::default();
        dispatch(&mut state, InputEvent::MouseDown { button: MouseButton::Right, pos: EMPTY });
        assert_eq!(state.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_wheel_zooms() {
        let mut state = EditorState::default();
        dispatch(&mut state, InputEvent::MouseWheel { direction: WheelDirection::Up });
        assert_eq!(state.scene.camera().distance, -4.5);
        for _ in 0..100 {
            dispatch(&mut state, InputEvent::MouseWheel { direction: WheelDirection::Down });
        }
        assert_eq!(state.scene.camera().distance, Camera::MIN_DISTANCE);
    }

    #[test]
    fn test_button_starts_modal_and_commit() {
        let mut state = EditorState::default();
        let pos = button_center(&state, Command::StartInput { kind: InputKind::Line });
        dispatch(&mut state, left_down(pos));
        assert_eq!(state.mode(), InteractionMode::TextInputActive);

        for c in "0,0,0,1,1,1".chars() {
            dispatch(&mut state, key(c));
        }
        // Shortcut letters are text while the modal is open
        assert_eq!(state.scene.render_settings().fill_mode, FillMode::Fill);
        dispatch(&mut state, enter());

        assert_eq!(state.mode(), InteractionMode::Idle);
        assert_eq!(state.scene.primitives().len(), 1);
        assert_eq!(state.status.text, "Added: Line (2)");
    }

    #[test]
    fn test_bad_input_reports_error() {
        let mut state = EditorState::default();
        command::execute(&mut state, Command::StartInput { kind: InputKind::Light });
        for c in "1,2".chars() {
            dispatch(&mut state, key(c));
        }
        dispatch(&mut state, enter());
        assert_eq!(state.mode(), InteractionMode::TextInputActive);
        assert_eq!(state.modal.buffer, "1,2");
        assert_eq!(state.status.kind, StatusKind::Error);
        assert!(state.status.text.contains("got 2"));
    }

    #[test]
    fn test_escape_and_backspace() {
        let mut state = EditorState::default();
        command::execute(&mut state, Command::StartInput { kind: InputKind::Light });
        dispatch(&mut state, key('7'));
        dispatch(&mut state, key('8'));
        dispatch(&mut state, InputEvent::KeyDown { key: KeyCode::Backspace, ch: None });
        assert_eq!(state.modal.buffer, "7");
        dispatch(&mut state, InputEvent::KeyDown { key: KeyCode::Escape, ch: None });
        assert_eq!(state.mode(), InteractionMode::Idle);
        assert!(state.scene.lights().is_empty());
    }

    #[test]
    fn test_click_outside_while_modal_does_not_drag() {
        let mut state = EditorState::default();
        command::execute(&mut state, Command::StartInput { kind: InputKind::Line });
        dispatch(&mut state, left_down(EMPTY));
        assert_eq!(state.mode(), InteractionMode::TextInputActive);
        assert!(state.drag_anchor.is_none());
    }

    #[test]
    fn test_pick_resolves_before_buttons_and_drag() {
        let mut state = EditorState::default();
        let pos = button_center(&state, Command::StartColorPick { target: ColorTarget::Background });
        dispatch(&mut state, left_down(pos));
        assert_eq!(state.mode(), InteractionMode::ColorPicking);

        // Outside the palette: nothing happens, no drag starts
        dispatch(&mut state, left_down(EMPTY));
        assert_eq!(state.mode(), InteractionMode::ColorPicking);

        let palette = state.layout.palette;
        dispatch(&mut state, left_down([palette.x, palette.y]));
        assert_eq!(state.mode(), InteractionMode::Idle);
        assert_eq!(state.scene.colors().background, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_shortcuts_case_insensitive() {
        let mut state = EditorState::default();
        dispatch(&mut state, key('M'));
        dispatch(&mut state, key('m'));
        assert_eq!(state.scene.render_settings().fill_mode, FillMode::Point);

        dispatch(&mut state, key('L'));
        assert!(!state.scene.render_settings().lighting_enabled);

        state.scene.rotate_camera_by(30.0, 10.0);
        dispatch(&mut state, key('v'));
        assert_eq!(*state.scene.camera(), Camera::default());

        state.update();
        dispatch(&mut state, key('r'));
        assert_eq!(state.scene.accent_rotation(), 0.0);

        state.scene.add_light([1.0, 1.0, 1.0]);
        dispatch(&mut state, key('C'));
        assert!(state.scene.lights().is_empty());

        assert_eq!(shortcut('x'), None);
    }
}
