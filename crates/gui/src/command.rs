//! Editor commands.
//!
//! A closed set of discrete actions. Toolbar buttons and keyboard shortcuts both resolve to a
//! `Command`, and `execute` maps every variant to exactly one state operation. Commands also
//! have a JSON form so scripted sessions can drive a headless editor.

use serde::{Deserialize, Serialize};
use shared::{ColorTarget, InputKind, LineStyle, RenderSettings};

use crate::i18n::t;
use crate::state::EditorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Open the modal numeric entry for a primitive or light
    StartInput { kind: InputKind },
    /// Show the palette; the next pick writes to `target`
    StartColorPick { target: ColorTarget },
    CycleRenderMode,
    IncreaseLineWidth,
    DecreaseLineWidth,
    SetLineStyle { style: LineStyle },
    ToggleLighting,
    ClearScene,
    ResetCamera,
    ResetAccentRotation,
}

/// Execute a single command on the editor state.
pub fn execute(state: &mut EditorState, cmd: Command) {
    match cmd {
        Command::StartInput { kind } => {
            state.picker.active = false;
            state.drag_anchor = None;
            state.modal.start(kind);
        }

        Command::StartColorPick { target } => {
            state.modal.cancel();
            state.drag_anchor = None;
            state.picker.start(target);
        }

        Command::CycleRenderMode => state.scene.cycle_render_mode(),

        Command::IncreaseLineWidth => {
            state.scene.adjust_line_width(RenderSettings::LINE_WIDTH_STEP)
        }

        Command::DecreaseLineWidth => {
            state.scene.adjust_line_width(-RenderSettings::LINE_WIDTH_STEP)
        }

        Command::SetLineStyle { style } => state.scene.set_line_style(style),

        Command::ToggleLighting => state.scene.toggle_lighting(),

        Command::ClearScene => {
            state.scene.clear_all();
            state.set_status(t("status.cleared"));
        }

        Command::ResetCamera => state.scene.reset_camera(),

        Command::ResetAccentRotation => state.scene.reset_accent_rotation(),
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(state: &mut EditorState, json: &str) -> Result<(), String> {
    let cmd: Command =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    execute(state, cmd);
    Ok(())
}

/// Parse and execute multiple JSON commands (array). Returns how many ran.
pub fn execute_json_batch(state: &mut EditorState, json: &str) -> Result<usize, String> {
    let cmds: Vec<Command> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    let count = cmds.len();
    for cmd in cmds {
        execute(state, cmd);
    }
    Ok(count)
}
