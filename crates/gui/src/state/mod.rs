pub mod color_picker;
pub mod modal_input;
pub mod scene;
pub mod settings;

pub use color_picker::{ColorPickerState, PaletteRegion};
pub use modal_input::{CommitOutcome, ModalInputState};
pub use scene::SceneState;
pub use settings::EditorSettings;

use crate::ui::layout::Layout;

/// Which interaction currently owns pointer and keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    CameraDragging,
    ColorPicking,
    TextInputActive,
}

/// Severity of the last status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Last user-visible status message
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            text: crate::i18n::t("status.ready").to_string(),
            kind: StatusKind::Info,
        }
    }
}

/// Combined editor state, owned by the main loop and passed by `&mut` to every update
pub struct EditorState {
    pub scene: SceneState,
    pub picker: ColorPickerState,
    pub modal: ModalInputState,
    /// Last pointer position while a camera drag is in progress
    pub drag_anchor: Option<[f32; 2]>,
    pub layout: Layout,
    pub settings: EditorSettings,
    pub status: StatusLine,
}

impl EditorState {
    pub fn new(settings: EditorSettings) -> Self {
        let layout = Layout::new(settings.window.width, settings.window.height);
        Self {
            scene: SceneState::default(),
            picker: ColorPickerState::default(),
            modal: ModalInputState::default(),
            drag_anchor: None,
            layout,
            settings,
            status: StatusLine::default(),
        }
    }

    /// Derived from the components so it can never disagree with them
    pub fn mode(&self) -> InteractionMode {
        if self.modal.active {
            InteractionMode::TextInputActive
        } else if self.picker.active {
            InteractionMode::ColorPicking
        } else if self.drag_anchor.is_some() {
            InteractionMode::CameraDragging
        } else {
            InteractionMode::Idle
        }
    }

    /// Per-frame update step between dispatch and render
    pub fn update(&mut self) {
        let spin = self.settings.accent_spin;
        self.scene.advance_accent(spin);
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = StatusLine {
            text: text.into(),
            kind: StatusKind::Info,
        };
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!("{text}");
        self.status = StatusLine {
            text,
            kind: StatusKind::Error,
        };
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}
