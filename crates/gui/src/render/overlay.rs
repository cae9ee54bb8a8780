//! 2D overlay pass: toolbar, palette, text.
//!
//! Drawn last, in window pixels under an orthographic projection with y pointing down.
//! Every label of the frame is composited into one canvas and uploaded as a single texture;
//! that texture and the palette texture are created and deleted inside the pass.

use shared::{ColorTarget, Rgba};

use super::backend::{draw_batch, AttribScope, GraphicsBackend, MatrixMode, MatrixScope, Topology};
use super::text::{Canvas, TextRasterizer};
use crate::i18n::t;
use crate::state::color_picker::palette_pixels;
use crate::state::scene::scene_summary;
use crate::state::{EditorState, StatusKind};
use crate::ui::layout::{Rect, PALETTE_SIZE};

const BUTTON_FILL: Rgba = [0.22, 0.22, 0.26, 0.9];
const BUTTON_ACTIVE_FILL: Rgba = [0.30, 0.36, 0.52, 0.95];
const BUTTON_BORDER: Rgba = [0.75, 0.75, 0.8, 1.0];
const PALETTE_BORDER: Rgba = [1.0, 1.0, 1.0, 1.0];
const TEXT_COLOR: Rgba = [0.95, 0.95, 0.95, 1.0];
const ERROR_COLOR: Rgba = [1.0, 0.35, 0.3, 1.0];
const INPUT_COLOR: Rgba = [1.0, 0.9, 0.4, 1.0];
const LABEL_PADDING: f32 = 8.0;

pub fn draw_overlay(state: &EditorState, gfx: &mut dyn GraphicsBackend, text: &mut dyn TextRasterizer) {
    let layout = &state.layout;
    let (w, h) = (layout.width as f32, layout.height as f32);

    let mut proj = MatrixScope::new(gfx, MatrixMode::Projection);
    proj.load_identity();
    proj.ortho(0.0, w, h, 0.0, -1.0, 1.0);

    let mut model_view = MatrixScope::new(&mut *proj, MatrixMode::ModelView);
    model_view.load_identity();

    let mut gfx = AttribScope::new(&mut *model_view);
    gfx.set_lighting(false);
    gfx.set_depth_test(false);
    gfx.set_blend(true);
    gfx.set_fill_mode(shared::FillMode::Fill);
    gfx.set_line_stipple(None);
    gfx.set_line_width(1.0);
    gfx.bind_texture(None);

    for button in &layout.buttons {
        let fill = if is_engaged(state, &button.command) {
            BUTTON_ACTIVE_FILL
        } else {
            BUTTON_FILL
        };
        fill_rect(&mut *gfx, button.rect, fill);
        outline_rect(&mut *gfx, button.rect, BUTTON_BORDER);
    }

    if state.picker.active {
        draw_palette(state, &mut *gfx);
    }

    let canvas = compose_text(state, text);
    if !canvas.is_empty() {
        let (cw, ch) = (canvas.width(), canvas.height());
        let buffer = canvas.into_buffer();
        let id = gfx.create_texture(cw, ch, &buffer.pixels);
        gfx.bind_texture(Some(id));
        textured_quad(&mut *gfx, Rect::new(0.0, 0.0, w, h));
        gfx.bind_texture(None);
        gfx.delete_texture(id);
    }
}

/// Whether a toolbar command's mode is the one currently open
fn is_engaged(state: &EditorState, command: &crate::command::Command) -> bool {
    use crate::command::Command;
    match command {
        Command::StartInput { kind } => state.modal.active && state.modal.kind == *kind,
        Command::StartColorPick { target } => state.picker.active && state.picker.target == *target,
        Command::SetLineStyle { style } => state.scene.render_settings().line_style == *style,
        _ => false,
    }
}

fn draw_palette(state: &EditorState, gfx: &mut dyn GraphicsBackend) {
    let region = state.layout.palette;
    let rect = Rect::new(region.x, region.y, region.size, region.size);
    let pixels = palette_pixels(PALETTE_SIZE);
    let id = gfx.create_texture(PALETTE_SIZE, PALETTE_SIZE, &pixels);
    gfx.bind_texture(Some(id));
    textured_quad(gfx, rect);
    gfx.bind_texture(None);
    gfx.delete_texture(id);
    outline_rect(gfx, rect, PALETTE_BORDER);
}

/// Every string of the frame, placed on one window-sized canvas
pub fn compose_text(state: &EditorState, text: &mut dyn TextRasterizer) -> Canvas {
    let layout = &state.layout;
    let size = state.settings.ui.font_size;
    let mut canvas = Canvas::new(layout.width, layout.height);
    let mut put = |s: &str, pos: [f32; 2], color: Rgba| {
        if s.is_empty() {
            return;
        }
        let buf = text.rasterize(s, size, color);
        canvas.blit(&buf, pos[0].round() as i32, pos[1].round() as i32);
    };

    for button in &layout.buttons {
        let r = button.rect;
        let y = r.y + (r.h - size) * 0.5;
        put(t(button.label_key), [r.x + LABEL_PADDING, y], TEXT_COLOR);
    }

    if state.picker.active {
        let caption = match state.picker.target {
            ColorTarget::Background => t("picker.background"),
            ColorTarget::AccentObject => t("picker.accent_object"),
            ColorTarget::Primitive => t("picker.primitive"),
        };
        put(caption, layout.caption_pos, TEXT_COLOR);
    }

    if state.modal.active {
        put(&state.modal.prompt, layout.prompt_pos, TEXT_COLOR);
        put(&format!("> {}_", state.modal.buffer), layout.buffer_pos, INPUT_COLOR);
        put(t("hint.enter"), layout.hint_pos, TEXT_COLOR);
    }

    put(&scene_summary(&state.scene), layout.summary_pos, TEXT_COLOR);
    let status_color = match state.status.kind {
        StatusKind::Info => TEXT_COLOR,
        StatusKind::Error => ERROR_COLOR,
    };
    put(&state.status.text, layout.status_pos, status_color);

    canvas
}

fn corners(r: Rect) -> [[f32; 3]; 4] {
    [
        [r.x, r.y, 0.0],
        [r.x + r.w, r.y, 0.0],
        [r.x + r.w, r.y + r.h, 0.0],
        [r.x, r.y + r.h, 0.0],
    ]
}

fn fill_rect(gfx: &mut dyn GraphicsBackend, r: Rect, color: Rgba) {
    gfx.set_color(color);
    draw_batch(gfx, Topology::Quads, &corners(r));
}

fn outline_rect(gfx: &mut dyn GraphicsBackend, r: Rect, color: Rgba) {
    gfx.set_color(color);
    draw_batch(gfx, Topology::LineLoop, &corners(r));
}

/// Quad over `r` sampling the whole bound texture, texel row 0 at the top
fn textured_quad(gfx: &mut dyn GraphicsBackend, r: Rect) {
    const UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    gfx.set_color([1.0, 1.0, 1.0, 1.0]);
    gfx.begin(Topology::Quads);
    for (p, uv) in corners(r).iter().zip(UV) {
        gfx.tex_coord(uv);
        gfx.vertex(*p);
    }
    gfx.end();
}
