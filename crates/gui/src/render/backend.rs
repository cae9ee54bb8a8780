//! Immediate-mode graphics contract.
//!
//! The render pipeline talks to the GPU only through [`GraphicsBackend`]. The model is the
//! classic fixed-function one: a current color and line state, matrix stacks for projection
//! and model-view, an attribute stack, begin/end vertex batches and eight light slots.
//! Matrix and attribute pushes must balance within a frame; the scope guards at the bottom
//! of this file make that structural.

use std::ops::{Deref, DerefMut};

use shared::{FillMode, Rgba, Stipple};

/// Backend-assigned texture handle
pub type TextureId = u32;

/// Number of hardware light slots. Slot 0 is the default light.
pub const LIGHT_SLOTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Points,
    Lines,
    LineLoop,
    Triangles,
    Quads,
    Polygon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixMode {
    Projection,
    ModelView,
}

/// Color terms of one light slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub ambient: Rgba,
    pub diffuse: Rgba,
    pub specular: Rgba,
}

pub trait GraphicsBackend {
    /// Clear color and depth
    fn clear(&mut self, color: Rgba);

    fn matrix_mode(&mut self, mode: MatrixMode);
    fn load_identity(&mut self);
    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);
    /// Multiply the current matrix by a perspective projection
    fn perspective(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32);
    fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32);
    fn translate(&mut self, x: f32, y: f32, z: f32);
    /// Rotate by `degrees` about the axis `(x, y, z)`
    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32);

    /// Save color, line, point, fill, lighting, depth, blend and texture state
    fn push_attrib(&mut self);
    fn pop_attrib(&mut self);

    fn set_color(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f32);
    fn set_point_size(&mut self, size: f32);
    /// `None` disables stippling
    fn set_line_stipple(&mut self, stipple: Option<Stipple>);
    fn set_fill_mode(&mut self, mode: FillMode);
    fn set_depth_test(&mut self, enabled: bool);
    fn set_blend(&mut self, enabled: bool);

    fn set_lighting(&mut self, enabled: bool);
    /// Enable a slot with the given color terms, or disable it with `None`
    fn configure_light(&mut self, slot: usize, params: Option<LightParams>);
    /// Homogeneous position, transformed by the current model-view matrix.
    /// `w = 0` makes the light directional.
    fn set_light_position(&mut self, slot: usize, position: [f32; 4]);

    /// Upload tightly packed RGBA8 pixels, row 0 at the top
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> TextureId;
    fn bind_texture(&mut self, texture: Option<TextureId>);
    fn delete_texture(&mut self, texture: TextureId);

    fn begin(&mut self, topology: Topology);
    fn normal(&mut self, n: [f32; 3]);
    fn tex_coord(&mut self, uv: [f32; 2]);
    fn vertex(&mut self, p: [f32; 3]);
    fn end(&mut self);
}

// ── Scoped state ─────────────────────────────────────────────

/// Pushes a matrix on creation and pops it on drop
pub struct MatrixScope<'a> {
    gfx: &'a mut dyn GraphicsBackend,
    mode: MatrixMode,
}

impl<'a> MatrixScope<'a> {
    pub fn new(gfx: &'a mut dyn GraphicsBackend, mode: MatrixMode) -> Self {
        gfx.matrix_mode(mode);
        gfx.push_matrix();
        Self { gfx, mode }
    }
}

impl Drop for MatrixScope<'_> {
    fn drop(&mut self) {
        self.gfx.matrix_mode(self.mode);
        self.gfx.pop_matrix();
        if self.mode != MatrixMode::ModelView {
            self.gfx.matrix_mode(MatrixMode::ModelView);
        }
    }
}

impl<'a> Deref for MatrixScope<'a> {
    type Target = dyn GraphicsBackend + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.gfx
    }
}

impl DerefMut for MatrixScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.gfx
    }
}

/// Pushes the attribute state on creation and restores it on drop
pub struct AttribScope<'a> {
    gfx: &'a mut dyn GraphicsBackend,
}

impl<'a> AttribScope<'a> {
    pub fn new(gfx: &'a mut dyn GraphicsBackend) -> Self {
        gfx.push_attrib();
        Self { gfx }
    }
}

impl Drop for AttribScope<'_> {
    fn drop(&mut self) {
        self.gfx.pop_attrib();
    }
}

impl<'a> Deref for AttribScope<'a> {
    type Target = dyn GraphicsBackend + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.gfx
    }
}

impl DerefMut for AttribScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.gfx
    }
}

/// Emit one vertex batch
pub fn draw_batch(gfx: &mut dyn GraphicsBackend, topology: Topology, points: &[[f32; 3]]) {
    gfx.begin(topology);
    for p in points {
        gfx.vertex(*p);
    }
    gfx.end();
}
