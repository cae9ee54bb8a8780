//! Integration tests for the JSON command protocol.
//!
//! Scripted command lists run against a harness-owned editor state.

use scene_editor_lib::command::{execute_json, execute_json_batch};
use scene_editor_lib::harness::TestHarness;
use scene_editor_lib::state::InteractionMode;
use shared::{ColorTarget, FillMode, InputKind, LineStyle};

#[test]
fn test_command_start_input_then_type() {
    let mut h = TestHarness::new();
    h.execute_json(r#"{"command": "start_input", "kind": "triangle"}"#).unwrap();
    assert_eq!(h.mode(), InteractionMode::TextInputActive);
    assert_eq!(h.state.modal.kind, InputKind::Triangle);

    h.type_str("0,0,0, 1,0,0, 0,1,0");
    h.press_enter();
    assert_eq!(h.primitives().len(), 1);
}

#[test]
fn test_command_color_pick_mode() {
    let mut h = TestHarness::new();
    h.execute_json(r#"{"command": "start_color_pick", "target": "background"}"#).unwrap();
    assert_eq!(h.mode(), InteractionMode::ColorPicking);
    assert_eq!(h.state.picker.target, ColorTarget::Background);
}

#[test]
fn test_command_batch_render_settings() {
    let mut h = TestHarness::new();
    let json = r#"[
        {"command": "cycle_render_mode"},
        {"command": "set_line_style", "style": "dotted"},
        {"command": "increase_line_width"},
        {"command": "increase_line_width"},
        {"command": "toggle_lighting"}
    ]"#;
    assert_eq!(execute_json_batch(&mut h.state, json).unwrap(), 5);

    let render = h.scene().render_settings();
    assert_eq!(render.fill_mode, FillMode::Wireframe);
    assert_eq!(render.line_style, LineStyle::Dotted);
    assert_eq!(render.line_width, 2.0);
    assert!(!render.lighting_enabled);

    // Dotted stipple reaches the recorded frame in wireframe
    h.frame();
    assert!(h.last_frame().contains(
        &scene_editor_lib::render::GfxCommand::SetLineStipple(Some(LineStyle::Dotted.stipple()))
    ));
}

#[test]
fn test_command_reset_camera_and_rotation() {
    let mut h = TestHarness::new();
    h.frame();
    h.frame();
    assert!(h.scene().accent_rotation() > 0.0);
    h.state.scene.rotate_camera_by(45.0, -10.0);

    execute_json_batch(
        &mut h.state,
        r#"[{"command": "reset_camera"}, {"command": "reset_accent_rotation"}]"#,
    )
    .unwrap();
    assert_eq!(*h.scene().camera(), shared::Camera::default());
    assert_eq!(h.scene().accent_rotation(), 0.0);
}

#[test]
fn test_command_clear_scene() {
    let mut h = TestHarness::new();
    h.enter_values(InputKind::Light, "1,1,1");
    let before = h.scene().lights_version();
    execute_json(&mut h.state, r#"{"command": "clear_scene"}"#).unwrap();
    assert!(h.scene().lights().is_empty());
    assert!(h.scene().lights_version() > before);
}

#[test]
fn test_command_unknown() {
    let mut h = TestHarness::new();
    let err = h.execute_json(r#"{"command": "extrude"}"#).unwrap_err();
    assert!(err.contains("Invalid command JSON"));
    let err = execute_json_batch(&mut h.state, r#"{"command": "clear_scene"}"#).unwrap_err();
    assert!(err.contains("Invalid commands JSON"));
}
