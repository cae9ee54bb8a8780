//! Modal numeric entry
//!
//! One pending entry at a time. While active it owns the keyboard; a commit parses the
//! buffer as comma-separated floats, checks the count against the kind's arity rule and
//! hands the values to the scene.

use shared::{check_arity, InputKind, PrimitiveKind};

use super::scene::SceneState;
use crate::error::InputError;
use crate::i18n::t;

/// What a successful commit created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Primitive(PrimitiveKind),
    /// `effective` is false when every light slot was already taken
    Light { effective: bool },
}

#[derive(Debug, Clone, Default)]
pub struct ModalInputState {
    pub active: bool,
    pub buffer: String,
    pub prompt: String,
    pub kind: InputKind,
}

impl ModalInputState {
    /// Open the modal for `kind` with an empty buffer
    pub fn start(&mut self, kind: InputKind) {
        self.kind = kind;
        self.prompt = prompt_for(kind).to_string();
        self.buffer.clear();
        self.active = true;
        tracing::debug!("Modal input started: {kind}");
    }

    pub fn push_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Abandon the entry
    pub fn cancel(&mut self) {
        self.active = false;
        self.buffer.clear();
    }

    /// Parse, validate and apply the buffer.
    ///
    /// On error the modal stays open and the buffer is left as typed, so the user can fix
    /// it in place. That includes arity errors.
    pub fn commit(&mut self, scene: &mut SceneState) -> Result<CommitOutcome, InputError> {
        let values = parse_values(&self.buffer)?;
        check_arity(self.kind, values.len())?;

        let outcome = match self.kind.primitive_kind() {
            Some(kind) => {
                scene.add_primitive(kind, &values)?;
                CommitOutcome::Primitive(kind)
            }
            None => CommitOutcome::Light {
                effective: scene.add_light([values[0], values[1], values[2]]),
            },
        };

        self.active = false;
        self.buffer.clear();
        Ok(outcome)
    }
}

/// Split on commas, trim, parse every token as a finite float
pub fn parse_values(buffer: &str) -> Result<Vec<f32>, InputError> {
    buffer
        .split(',')
        .map(str::trim)
        .map(|token| match token.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(InputError::Format {
                token: token.to_string(),
            }),
        })
        .collect()
}

pub fn prompt_for(kind: InputKind) -> &'static str {
    match kind {
        InputKind::Line => t("prompt.line"),
        InputKind::Triangle => t("prompt.triangle"),
        InputKind::Rectangle => t("prompt.rectangle"),
        InputKind::Polygon => t("prompt.polygon"),
        InputKind::Light => t("prompt.light"),
    }
}
