//! Headless test harness for driving the editor programmatically.
//!
//! Wraps an `EditorState`, the render pipeline and a `CommandRecorder`, with block glyphs
//! standing in for a font. Input helpers dispatch immediately; `frame` runs one full
//! main-loop iteration over whatever was queued and keeps the recorded commands.

use shared::{InputKind, Primitive};

use crate::command::{self, Command};
use crate::frame::run_frame;
use crate::input::{dispatch, Flow, InputEvent, KeyCode, MouseButton, WheelDirection};
use crate::render::{BlockGlyphs, CommandRecorder, GfxCommand, RenderPipeline};
use crate::state::scene::SceneState;
use crate::state::{EditorSettings, EditorState, InteractionMode, StatusLine};

/// Headless test harness: editor state, renderer and recorded output
pub struct TestHarness {
    pub state: EditorState,
    pipeline: RenderPipeline,
    recorder: CommandRecorder,
    text: BlockGlyphs,
    queued: Vec<InputEvent>,
    last_frame: Vec<GfxCommand>,
    last_frame_balanced: bool,
    exited: bool,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Create a harness with default settings
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            state: EditorState::new(settings),
            pipeline: RenderPipeline::new(),
            recorder: CommandRecorder::new(),
            text: BlockGlyphs,
            queued: Vec::new(),
            last_frame: Vec::new(),
            last_frame_balanced: true,
            exited: false,
        }
    }

    // ── Input ─────────────────────────────────────────────────

    /// Dispatch one event right away
    pub fn send(&mut self, event: InputEvent) -> Flow {
        let flow = dispatch(&mut self.state, event);
        if flow == Flow::Exit {
            self.exited = true;
        }
        flow
    }

    /// Queue an event for the next `frame`
    pub fn queue(&mut self, event: InputEvent) {
        self.queued.push(event);
    }

    /// Left press and release at `pos`
    pub fn click(&mut self, pos: [f32; 2]) {
        self.send(InputEvent::MouseDown { button: MouseButton::Left, pos });
        self.send(InputEvent::MouseUp { button: MouseButton::Left, pos });
    }

    /// Click the toolbar button bound to `cmd`. Returns false when there is none.
    pub fn click_button(&mut self, cmd: Command) -> bool {
        let Some(pos) = self.state.layout.button_for(&cmd).map(|b| b.rect.center()) else {
            return false;
        };
        self.click(pos);
        true
    }

    /// Left-drag from `from` to `to` in a single move
    pub fn drag(&mut self, from: [f32; 2], to: [f32; 2]) {
        self.send(InputEvent::MouseDown { button: MouseButton::Left, pos: from });
        self.send(InputEvent::MouseMove { pos: to });
        self.send(InputEvent::MouseUp { button: MouseButton::Left, pos: to });
    }

    pub fn scroll(&mut self, direction: WheelDirection, notches: usize) {
        for _ in 0..notches {
            self.send(InputEvent::MouseWheel { direction });
        }
    }

    /// Type a printable key
    pub fn key(&mut self, ch: char) {
        self.send(InputEvent::KeyDown { key: KeyCode::Other, ch: Some(ch) });
    }

    pub fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.key(ch);
        }
    }

    pub fn press_enter(&mut self) {
        self.send(InputEvent::KeyDown { key: KeyCode::Enter, ch: None });
    }

    pub fn press_escape(&mut self) {
        self.send(InputEvent::KeyDown { key: KeyCode::Escape, ch: None });
    }

    pub fn press_backspace(&mut self) {
        self.send(InputEvent::KeyDown { key: KeyCode::Backspace, ch: None });
    }

    /// Open the modal for `kind` through its button, type `values`, press Enter
    pub fn enter_values(&mut self, kind: InputKind, values: &str) {
        self.click_button(Command::StartInput { kind });
        self.type_str(values);
        self.press_enter();
    }

    /// Parse and execute a JSON command
    pub fn execute_json(&mut self, json: &str) -> Result<(), String> {
        command::execute_json(&mut self.state, json)
    }

    // ── Frames ────────────────────────────────────────────────

    /// Run one main-loop iteration over the queued events
    pub fn frame(&mut self) -> Flow {
        let events: Vec<InputEvent> = self.queued.drain(..).collect();
        let flow = run_frame(
            &mut self.state,
            &mut self.pipeline,
            events,
            &mut self.recorder,
            &mut self.text,
        );
        if flow == Flow::Exit {
            self.exited = true;
        }
        self.last_frame_balanced = self.recorder.is_balanced();
        self.last_frame = self.recorder.take();
        flow
    }

    /// Commands recorded by the last `frame`
    pub fn last_frame(&self) -> &[GfxCommand] {
        &self.last_frame
    }

    pub fn last_frame_balanced(&self) -> bool {
        self.last_frame_balanced
    }

    /// Textures created and not deleted so far, across all frames
    pub fn live_texture_count(&self) -> usize {
        self.recorder.live_textures().len()
    }

    /// Release the pipeline's persistent resources
    pub fn shutdown(&mut self) {
        self.pipeline.shutdown(&mut self.recorder);
        self.last_frame = self.recorder.take();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn scene(&self) -> &SceneState {
        &self.state.scene
    }

    pub fn primitives(&self) -> &[Primitive] {
        self.state.scene.primitives()
    }

    pub fn mode(&self) -> InteractionMode {
        self.state.mode()
    }

    pub fn status(&self) -> &StatusLine {
        &self.state.status
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }
}
