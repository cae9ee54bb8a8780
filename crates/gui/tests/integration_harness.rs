//! Integration tests for TestHarness.
//!
//! Drives the editor the way a user would: toolbar clicks, typed coordinates, drags and
//! wheel notches, then checks the scene and the recorded frames.

use scene_editor_lib::command::Command;
use scene_editor_lib::harness::TestHarness;
use scene_editor_lib::input::{Flow, InputEvent, WheelDirection};
use scene_editor_lib::render::GfxCommand;
use scene_editor_lib::state::{InteractionMode, StatusKind};
use shared::{Camera, ColorTarget, FillMode, InputKind, Primitive, RenderSettings};

/// Free viewport space: no button, no palette
const VIEWPORT: [f32; 2] = [400.0, 420.0];

#[test]
fn test_harness_line_entry() {
    let mut h = TestHarness::new();
    h.enter_values(InputKind::Line, "0,0,0,1,1,1");

    assert_eq!(h.mode(), InteractionMode::Idle);
    assert_eq!(h.primitives().len(), 1);
    match &h.primitives()[0] {
        Primitive::Line { points, .. } => {
            assert_eq!(*points, [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        }
        other => panic!("Expected Line, got {other:?}"),
    }
}

#[test]
fn test_harness_primitive_color_is_snapshotted() {
    let mut h = TestHarness::new();
    let before = h.scene().colors().active_primitive;
    h.enter_values(InputKind::Line, "1,2,3,4,5,6");
    assert_eq!(h.primitives()[0].color(), before);
    assert_eq!(h.primitives()[0].points(), &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);

    // Pick a new primitive color from the palette's top-left corner (pure red)
    h.click_button(Command::StartColorPick { target: ColorTarget::Primitive });
    let palette = h.state.layout.palette;
    h.click([palette.x, palette.y]);
    assert_eq!(h.scene().colors().active_primitive, [1.0, 0.0, 0.0, 1.0]);

    assert_eq!(h.primitives()[0].color(), before);
    h.enter_values(InputKind::Triangle, "0,0,0,1,0,0,0,1,0");
    assert_eq!(h.primitives()[1].color(), [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_harness_polygon_arity() {
    let mut h = TestHarness::new();
    h.enter_values(InputKind::Polygon, "1,2,3,4,5,6,7,8");
    assert!(h.primitives().is_empty());
    assert_eq!(h.mode(), InteractionMode::TextInputActive);
    assert_eq!(h.state.modal.buffer, "1,2,3,4,5,6,7,8");
    assert_eq!(h.status().kind, StatusKind::Error);

    // Fix the entry in place
    h.type_str(",9,10,11,12");
    h.press_enter();
    assert_eq!(h.primitives().len(), 1);
    assert_eq!(h.primitives()[0].points().len(), 4);
}

#[test]
fn test_harness_format_error_then_backspace() {
    let mut h = TestHarness::new();
    h.enter_values(InputKind::Light, "1,2,3x");
    assert_eq!(h.mode(), InteractionMode::TextInputActive);
    assert!(h.status().text.contains("'3x'"));

    h.press_backspace();
    h.press_enter();
    assert_eq!(h.mode(), InteractionMode::Idle);
    assert_eq!(h.scene().lights()[0].position, [1.0, 2.0, 3.0]);
}

#[test]
fn test_harness_escape_abandons_entry() {
    let mut h = TestHarness::new();
    h.click_button(Command::StartInput { kind: InputKind::Rectangle });
    h.type_str("0,0,0");
    h.press_escape();
    assert_eq!(h.mode(), InteractionMode::Idle);
    assert!(h.primitives().is_empty());

    // The modal is gone, so letters are shortcuts again
    h.key('m');
    assert_eq!(h.scene().render_settings().fill_mode, FillMode::Wireframe);
}

#[test]
fn test_harness_zoom_stays_clamped() {
    let mut h = TestHarness::new();
    h.scroll(WheelDirection::Up, 50);
    assert_eq!(h.scene().camera().distance, Camera::MAX_DISTANCE);
    h.scroll(WheelDirection::Down, 7);
    assert_eq!(h.scene().camera().distance, -4.5);
    for i in 0..200 {
        let dir = if i % 3 == 0 { WheelDirection::Up } else { WheelDirection::Down };
        h.scroll(dir, 1);
        let d = h.scene().camera().distance;
        assert!((Camera::MIN_DISTANCE..=Camera::MAX_DISTANCE).contains(&d));
    }
}

#[test]
fn test_harness_line_width_stays_clamped() {
    let mut h = TestHarness::new();
    for i in 0..60 {
        let cmd = if (i / 7) % 2 == 0 {
            Command::IncreaseLineWidth
        } else {
            Command::DecreaseLineWidth
        };
        h.click_button(cmd);
        let w = h.scene().render_settings().line_width;
        assert!((RenderSettings::MIN_LINE_WIDTH..=RenderSettings::MAX_LINE_WIDTH).contains(&w));
    }
    for _ in 0..30 {
        h.click_button(Command::IncreaseLineWidth);
    }
    assert_eq!(h.scene().render_settings().line_width, RenderSettings::MAX_LINE_WIDTH);
}

#[test]
fn test_harness_render_mode_period_three() {
    let mut h = TestHarness::new();
    for start in 0..3 {
        for _ in 0..start {
            h.click_button(Command::CycleRenderMode);
        }
        let before = h.scene().render_settings().fill_mode;
        for _ in 0..3 {
            h.click_button(Command::CycleRenderMode);
        }
        assert_eq!(h.scene().render_settings().fill_mode, before);
    }
}

#[test]
fn test_harness_clear_keeps_view_state() {
    let mut h = TestHarness::new();
    h.enter_values(InputKind::Triangle, "0,0,0,1,0,0,0,1,0");
    h.enter_values(InputKind::Light, "0,4,0");
    h.drag(VIEWPORT, [VIEWPORT[0] + 30.0, VIEWPORT[1] - 12.0]);
    h.scroll(WheelDirection::Up, 3);
    h.click_button(Command::CycleRenderMode);
    h.click_button(Command::StartColorPick { target: ColorTarget::Background });
    let palette = h.state.layout.palette;
    h.click([palette.x + 100.0, palette.y + 50.0]);

    let camera = *h.scene().camera();
    let render = *h.scene().render_settings();
    let colors = *h.scene().colors();

    h.click_button(Command::ClearScene);
    assert!(h.primitives().is_empty());
    assert!(h.scene().lights().is_empty());
    assert_eq!(*h.scene().camera(), camera);
    assert_eq!(*h.scene().render_settings(), render);
    assert_eq!(*h.scene().colors(), colors);
}

#[test]
fn test_harness_drag_orbits_camera() {
    let mut h = TestHarness::new();
    h.drag(VIEWPORT, [VIEWPORT[0] + 20.0, VIEWPORT[1] + 10.0]);
    assert_eq!(h.scene().camera().rotation_y, 10.0);
    assert_eq!(h.scene().camera().rotation_x, 5.0);
    assert_eq!(h.mode(), InteractionMode::Idle);

    // A press on a button never starts a drag
    h.send(InputEvent::MouseDown {
        button: scene_editor_lib::input::MouseButton::Left,
        pos: h.state.layout.buttons[5].rect.center(),
    });
    assert_eq!(h.mode(), InteractionMode::Idle);
}

#[test]
fn test_harness_frames_are_balanced() {
    let mut h = TestHarness::new();
    h.enter_values(InputKind::Rectangle, "-1,-1,0,1,1,0");
    h.enter_values(InputKind::Polygon, "0,0,0,1,0,0,1,1,0,0,1,0");
    h.enter_values(InputKind::Light, "2,2,2");

    for mode in 0..3 {
        if mode > 0 {
            h.click_button(Command::CycleRenderMode);
        }
        assert_eq!(h.frame(), Flow::Continue);
        assert!(h.last_frame_balanced());
        // Only the persistent accent texture survives a frame
        assert_eq!(h.live_texture_count(), 1);
    }

    h.click_button(Command::StartColorPick { target: ColorTarget::AccentObject });
    h.click_button(Command::StartInput { kind: InputKind::Line });
    h.frame();
    assert!(h.last_frame_balanced());
    assert_eq!(h.live_texture_count(), 1);

    h.shutdown();
    assert_eq!(h.live_texture_count(), 0);
}

#[test]
fn test_harness_palette_drawn_only_while_picking() {
    let mut h = TestHarness::new();
    let texture_uploads = |h: &TestHarness| {
        h.last_frame()
            .iter()
            .filter(|c| matches!(c, GfxCommand::CreateTexture { .. }))
            .count()
    };

    h.frame();
    // Accent texture plus text canvas on the first frame
    assert_eq!(texture_uploads(&h), 2);
    h.frame();
    assert_eq!(texture_uploads(&h), 1);

    h.click_button(Command::StartColorPick { target: ColorTarget::Background });
    h.frame();
    assert_eq!(texture_uploads(&h), 2);

    h.click(VIEWPORT);
    h.frame();
    assert_eq!(h.mode(), InteractionMode::ColorPicking);
    assert_eq!(texture_uploads(&h), 2);
}

#[test]
fn test_harness_background_reaches_clear() {
    let mut h = TestHarness::new();
    h.click_button(Command::StartColorPick { target: ColorTarget::Background });
    let palette = h.state.layout.palette;
    h.click([palette.x, palette.y + palette.size * 0.5]);
    h.frame();
    let clear = h.last_frame().iter().find(|c| matches!(c, GfxCommand::Clear(_)));
    assert_eq!(clear, Some(&GfxCommand::Clear([0.5, 0.0, 0.0, 1.0])));
}

#[test]
fn test_harness_queued_quit_stops_loop() {
    let mut h = TestHarness::new();
    h.queue(InputEvent::MouseWheel { direction: WheelDirection::Up });
    h.queue(InputEvent::Quit);
    assert_eq!(h.frame(), Flow::Exit);
    assert!(h.has_exited());
    assert!(h.last_frame().is_empty());
    assert_eq!(h.scene().camera().distance, -4.5);
}
