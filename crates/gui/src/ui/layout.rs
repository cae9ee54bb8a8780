//! Fixed window layout: toolbar column, palette square and text anchors.
//!
//! Everything is in window pixels with the origin at the top-left corner, y pointing down,
//! matching both the pointer events and the overlay's orthographic projection.

use shared::{ColorTarget, InputKind, LineStyle};

use crate::command::Command;
use crate::state::PaletteRegion;

pub const BUTTON_X: f32 = 10.0;
pub const BUTTON_Y: f32 = 10.0;
pub const BUTTON_W: f32 = 150.0;
pub const BUTTON_H: f32 = 24.0;
pub const BUTTON_GAP: f32 = 6.0;

/// Side of the palette square, also the palette texture size
pub const PALETTE_SIZE: u32 = 256;
const PALETTE_MARGIN: f32 = 20.0;
const PALETTE_TOP: f32 = 40.0;

/// Left edge of everything drawn to the right of the toolbar
const TEXT_X: f32 = BUTTON_X + BUTTON_W + 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open: the right and bottom edges belong to the neighbour
    pub fn contains(&self, pos: [f32; 2]) -> bool {
        pos[0] >= self.x && pos[0] < self.x + self.w && pos[1] >= self.y && pos[1] < self.y + self.h
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.w * 0.5, self.y + self.h * 0.5]
    }
}

/// A toolbar button bound to one command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub command: Command,
    /// i18n key of the label
    pub label_key: &'static str,
    pub rect: Rect,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub buttons: Vec<Button>,
    pub palette: PaletteRegion,
    /// Baseline-free anchors (top-left of the text box)
    pub caption_pos: [f32; 2],
    pub prompt_pos: [f32; 2],
    pub buffer_pos: [f32; 2],
    pub hint_pos: [f32; 2],
    pub summary_pos: [f32; 2],
    pub status_pos: [f32; 2],
}

/// Toolbar order, top to bottom
fn input_label(kind: InputKind) -> &'static str {
    match kind {
        InputKind::Line => "btn.line",
        InputKind::Triangle => "btn.triangle",
        InputKind::Rectangle => "btn.rectangle",
        InputKind::Polygon => "btn.polygon",
        InputKind::Light => "btn.light",
    }
}

fn style_label(style: LineStyle) -> &'static str {
    match style {
        LineStyle::Solid => "btn.solid",
        LineStyle::Dashed => "btn.dashed",
        LineStyle::Dotted => "btn.dotted",
    }
}

/// Toolbar entries top to bottom
fn toolbar() -> Vec<(Command, &'static str)> {
    let inputs = InputKind::all()
        .iter()
        .map(|&kind| (Command::StartInput { kind }, input_label(kind)));
    let styles = LineStyle::all()
        .iter()
        .map(|&style| (Command::SetLineStyle { style }, style_label(style)));

    inputs
        .chain([
            (Command::CycleRenderMode, "btn.mode"),
            (Command::IncreaseLineWidth, "btn.width_up"),
            (Command::DecreaseLineWidth, "btn.width_down"),
        ])
        .chain(styles)
        .chain([
            (Command::ToggleLighting, "btn.lighting"),
            (Command::StartColorPick { target: ColorTarget::Background }, "btn.bg_color"),
            (Command::StartColorPick { target: ColorTarget::AccentObject }, "btn.accent_color"),
            (Command::StartColorPick { target: ColorTarget::Primitive }, "btn.prim_color"),
            (Command::ResetCamera, "btn.reset_camera"),
            (Command::ResetAccentRotation, "btn.reset_rotation"),
            (Command::ClearScene, "btn.clear"),
        ])
        .collect()
}

impl Layout {
    /// Window size in points; fractional sizes round down
    pub fn new(width: f32, height: f32) -> Self {
        let (width, height) = (width.max(1.0) as u32, height.max(1.0) as u32);
        let buttons = toolbar()
            .into_iter()
            .enumerate()
            .map(|(i, (command, label_key))| Button {
                command,
                label_key,
                rect: Rect::new(
                    BUTTON_X,
                    BUTTON_Y + i as f32 * (BUTTON_H + BUTTON_GAP),
                    BUTTON_W,
                    BUTTON_H,
                ),
            })
            .collect();

        let size = PALETTE_SIZE as f32;
        let palette_x = (width as f32 - size - PALETTE_MARGIN).max(TEXT_X);
        let palette = PaletteRegion { x: palette_x, y: PALETTE_TOP, size };

        Self {
            width,
            height,
            buttons,
            palette,
            caption_pos: [palette_x, PALETTE_TOP - 24.0],
            prompt_pos: [TEXT_X, 10.0],
            buffer_pos: [TEXT_X, 30.0],
            hint_pos: [TEXT_X, 50.0],
            summary_pos: [TEXT_X, height as f32 - 44.0],
            status_pos: [TEXT_X, height as f32 - 24.0],
        }
    }

    /// Topmost button under `pos`
    pub fn button_at(&self, pos: [f32; 2]) -> Option<&Button> {
        self.buttons.iter().find(|b| b.rect.contains(pos))
    }

    pub fn button_for(&self, command: &Command) -> Option<&Button> {
        self.buttons.iter().find(|b| &b.command == command)
    }
}
