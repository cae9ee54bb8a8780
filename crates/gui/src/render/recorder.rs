//! Frame recording.
//!
//! `CommandRecorder` is a [`GraphicsBackend`] that only writes down what it is asked to do.
//! The pipeline renders into it on the UI thread; the recorded list is then replayed onto the
//! real backend inside the window's paint callback. Tests inspect the list directly.

use std::collections::{BTreeSet, HashMap};

use shared::{FillMode, Rgba, Stipple};

use super::backend::{GraphicsBackend, LightParams, MatrixMode, TextureId, Topology};

#[derive(Debug, Clone, PartialEq)]
pub enum GfxCommand {
    Clear(Rgba),
    MatrixMode(MatrixMode),
    LoadIdentity,
    PushMatrix,
    PopMatrix,
    Perspective { fov_y: f32, aspect: f32, near: f32, far: f32 },
    Ortho { left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32 },
    Translate([f32; 3]),
    Rotate { degrees: f32, axis: [f32; 3] },
    PushAttrib,
    PopAttrib,
    SetColor(Rgba),
    SetLineWidth(f32),
    SetPointSize(f32),
    SetLineStipple(Option<Stipple>),
    SetFillMode(FillMode),
    SetDepthTest(bool),
    SetBlend(bool),
    SetLighting(bool),
    ConfigureLight { slot: usize, params: Option<LightParams> },
    SetLightPosition { slot: usize, position: [f32; 4] },
    CreateTexture { id: TextureId, width: u32, height: u32, rgba: Vec<u8> },
    BindTexture(Option<TextureId>),
    DeleteTexture(TextureId),
    Begin(Topology),
    Normal([f32; 3]),
    TexCoord([f32; 2]),
    Vertex([f32; 3]),
    End,
}

#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<GfxCommand>,
    next_texture: TextureId,
    live_textures: BTreeSet<TextureId>,
    mode: Option<MatrixMode>,
    projection_depth: i32,
    model_view_depth: i32,
    attrib_depth: i32,
    in_batch: bool,
    /// Set when a pop had nothing to pop or a batch was left open
    unbalanced: bool,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[GfxCommand] {
        &self.commands
    }

    /// Hand over everything recorded so far. Texture ids keep counting.
    pub fn take(&mut self) -> Vec<GfxCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Every push has its pop and no batch is open
    pub fn is_balanced(&self) -> bool {
        !self.unbalanced
            && !self.in_batch
            && self.projection_depth == 0
            && self.model_view_depth == 0
            && self.attrib_depth == 0
    }

    /// Textures created and not yet deleted
    pub fn live_textures(&self) -> &BTreeSet<TextureId> {
        &self.live_textures
    }

    /// Number of recorded commands matching `pred`
    pub fn count(&self, pred: impl Fn(&GfxCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    fn depth_mut(&mut self) -> &mut i32 {
        match self.mode.unwrap_or(MatrixMode::ModelView) {
            MatrixMode::Projection => &mut self.projection_depth,
            MatrixMode::ModelView => &mut self.model_view_depth,
        }
    }

    fn pop_depth(depth: &mut i32, unbalanced: &mut bool) {
        if *depth == 0 {
            *unbalanced = true;
        } else {
            *depth -= 1;
        }
    }
}

impl GraphicsBackend for CommandRecorder {
    fn clear(&mut self, color: Rgba) {
        self.commands.push(GfxCommand::Clear(color));
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.mode = Some(mode);
        self.commands.push(GfxCommand::MatrixMode(mode));
    }

    fn load_identity(&mut self) {
        self.commands.push(GfxCommand::LoadIdentity);
    }

    fn push_matrix(&mut self) {
        *self.depth_mut() += 1;
        self.commands.push(GfxCommand::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        let mut unbalanced = self.unbalanced;
        Self::pop_depth(self.depth_mut(), &mut unbalanced);
        self.unbalanced = unbalanced;
        self.commands.push(GfxCommand::PopMatrix);
    }

    fn perspective(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) {
        self.commands.push(GfxCommand::Perspective { fov_y, aspect, near, far });
    }

    fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.commands.push(GfxCommand::Ortho { left, right, bottom, top, near, far });
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.commands.push(GfxCommand::Translate([x, y, z]));
    }

    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) {
        self.commands.push(GfxCommand::Rotate { degrees, axis: [x, y, z] });
    }

    fn push_attrib(&mut self) {
        self.attrib_depth += 1;
        self.commands.push(GfxCommand::PushAttrib);
    }

    fn pop_attrib(&mut self) {
        Self::pop_depth(&mut self.attrib_depth, &mut self.unbalanced);
        self.commands.push(GfxCommand::PopAttrib);
    }

    fn set_color(&mut self, color: Rgba) {
        self.commands.push(GfxCommand::SetColor(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(GfxCommand::SetLineWidth(width));
    }

    fn set_point_size(&mut self, size: f32) {
        self.commands.push(GfxCommand::SetPointSize(size));
    }

    fn set_line_stipple(&mut self, stipple: Option<Stipple>) {
        self.commands.push(GfxCommand::SetLineStipple(stipple));
    }

    fn set_fill_mode(&mut self, mode: FillMode) {
        self.commands.push(GfxCommand::SetFillMode(mode));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.commands.push(GfxCommand::SetDepthTest(enabled));
    }

    fn set_blend(&mut self, enabled: bool) {
        self.commands.push(GfxCommand::SetBlend(enabled));
    }

    fn set_lighting(&mut self, enabled: bool) {
        self.commands.push(GfxCommand::SetLighting(enabled));
    }

    fn configure_light(&mut self, slot: usize, params: Option<LightParams>) {
        self.commands.push(GfxCommand::ConfigureLight { slot, params });
    }

    fn set_light_position(&mut self, slot: usize, position: [f32; 4]) {
        self.commands.push(GfxCommand::SetLightPosition { slot, position });
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> TextureId {
        self.next_texture += 1;
        let id = self.next_texture;
        self.live_textures.insert(id);
        self.commands.push(GfxCommand::CreateTexture {
            id,
            width,
            height,
            rgba: rgba.to_vec(),
        });
        id
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.commands.push(GfxCommand::BindTexture(texture));
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.live_textures.remove(&texture);
        self.commands.push(GfxCommand::DeleteTexture(texture));
    }

    fn begin(&mut self, topology: Topology) {
        if self.in_batch {
            self.unbalanced = true;
        }
        self.in_batch = true;
        self.commands.push(GfxCommand::Begin(topology));
    }

    fn normal(&mut self, n: [f32; 3]) {
        self.commands.push(GfxCommand::Normal(n));
    }

    fn tex_coord(&mut self, uv: [f32; 2]) {
        self.commands.push(GfxCommand::TexCoord(uv));
    }

    fn vertex(&mut self, p: [f32; 3]) {
        self.commands.push(GfxCommand::Vertex(p));
    }

    fn end(&mut self) {
        if !self.in_batch {
            self.unbalanced = true;
        }
        self.in_batch = false;
        self.commands.push(GfxCommand::End);
    }
}

// ── Replay ───────────────────────────────────────────────────

/// Plays recorded frames onto a real backend.
///
/// Recorded texture ids are the recorder's own; the replayer keeps the mapping to the
/// backend's ids across frames so a texture created in one frame can be bound in the next.
#[derive(Debug, Default)]
pub struct Replayer {
    textures: HashMap<TextureId, TextureId>,
}

impl Replayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replay(&mut self, commands: &[GfxCommand], gfx: &mut dyn GraphicsBackend) {
        for cmd in commands {
            self.apply(cmd, gfx);
        }
    }

    /// Backend textures still alive
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Delete whatever the recording never deleted
    pub fn release_all(&mut self, gfx: &mut dyn GraphicsBackend) {
        for (_, id) in self.textures.drain() {
            gfx.delete_texture(id);
        }
    }

    fn apply(&mut self, cmd: &GfxCommand, gfx: &mut dyn GraphicsBackend) {
        match cmd {
            GfxCommand::Clear(c) => gfx.clear(*c),
            GfxCommand::MatrixMode(m) => gfx.matrix_mode(*m),
            GfxCommand::LoadIdentity => gfx.load_identity(),
            GfxCommand::PushMatrix => gfx.push_matrix(),
            GfxCommand::PopMatrix => gfx.pop_matrix(),
            GfxCommand::Perspective { fov_y, aspect, near, far } => {
                gfx.perspective(*fov_y, *aspect, *near, *far)
            }
            GfxCommand::Ortho { left, right, bottom, top, near, far } => {
                gfx.ortho(*left, *right, *bottom, *top, *near, *far)
            }
            GfxCommand::Translate([x, y, z]) => gfx.translate(*x, *y, *z),
            GfxCommand::Rotate { degrees, axis } => {
                gfx.rotate(*degrees, axis[0], axis[1], axis[2])
            }
            GfxCommand::PushAttrib => gfx.push_attrib(),
            GfxCommand::PopAttrib => gfx.pop_attrib(),
            GfxCommand::SetColor(c) => gfx.set_color(*c),
            GfxCommand::SetLineWidth(w) => gfx.set_line_width(*w),
            GfxCommand::SetPointSize(s) => gfx.set_point_size(*s),
            GfxCommand::SetLineStipple(s) => gfx.set_line_stipple(*s),
            GfxCommand::SetFillMode(m) => gfx.set_fill_mode(*m),
            GfxCommand::SetDepthTest(on) => gfx.set_depth_test(*on),
            GfxCommand::SetBlend(on) => gfx.set_blend(*on),
            GfxCommand::SetLighting(on) => gfx.set_lighting(*on),
            GfxCommand::ConfigureLight { slot, params } => gfx.configure_light(*slot, *params),
            GfxCommand::SetLightPosition { slot, position } => {
                gfx.set_light_position(*slot, *position)
            }
            GfxCommand::CreateTexture { id, width, height, rgba } => {
                let backend_id = gfx.create_texture(*width, *height, rgba);
                if let Some(stale) = self.textures.insert(*id, backend_id) {
                    gfx.delete_texture(stale);
                }
            }
            GfxCommand::BindTexture(id) => {
                let mapped = id.and_then(|id| self.textures.get(&id).copied());
                if id.is_some() && mapped.is_none() {
                    tracing::warn!("Bind of unknown texture {id:?}");
                }
                gfx.bind_texture(mapped);
            }
            GfxCommand::DeleteTexture(id) => {
                if let Some(backend_id) = self.textures.remove(id) {
                    gfx.delete_texture(backend_id);
                }
            }
            GfxCommand::Begin(t) => gfx.begin(*t),
            GfxCommand::Normal(n) => gfx.normal(*n),
            GfxCommand::TexCoord(uv) => gfx.tex_coord(*uv),
            GfxCommand::Vertex(p) => gfx.vertex(*p),
            GfxCommand::End => gfx.end(),
        }
    }
}
