//! Fixed-function emulation on the CPU.
//!
//! Core-profile GL has no matrix stacks, no `glBegin`, no lights and no polygon modes. This
//! module keeps that state itself: vertices are transformed with `glam`, lit per vertex,
//! and assembled into plain triangle, line or point lists that a trivial shader can draw.
//! Nothing here touches GL, so it is tested directly.

use glam::{Mat3, Mat4, Vec3, Vec4};
use scene_editor_lib::render::backend::LIGHT_SLOTS;
use scene_editor_lib::render::{LightParams, MatrixMode, TextureId, Topology};
use shared::{FillMode, Rgba, Stipple};

const GLOBAL_AMBIENT: f32 = 0.2;
const SHININESS: f32 = 32.0;
const SPECULAR_STRENGTH: f32 = 0.3;

/// Everything `push_attrib` saves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribs {
    pub color: Rgba,
    pub line_width: f32,
    pub point_size: f32,
    pub stipple: Option<Stipple>,
    pub fill_mode: FillMode,
    pub lighting: bool,
    pub depth_test: bool,
    pub blend: bool,
    pub texture: Option<TextureId>,
}

impl Default for Attribs {
    fn default() -> Self {
        Self {
            color: [1.0; 4],
            line_width: 1.0,
            point_size: 1.0,
            stipple: None,
            fill_mode: FillMode::Fill,
            lighting: false,
            depth_test: false,
            blend: false,
            texture: None,
        }
    }
}

/// Interleaved vertex as uploaded: clip position, color, uv, stipple distance in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct GpuVertex {
    pub clip: [f32; 4],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub dist: f32,
}

pub const FLOATS_PER_VERTEX: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPrimitive {
    Triangles,
    Lines,
    Points,
}

/// One finished batch, ready for a single draw call
#[derive(Debug, Clone)]
pub struct Draw {
    pub primitive: DrawPrimitive,
    pub vertices: Vec<GpuVertex>,
    pub attribs: Attribs,
}

#[derive(Debug, Clone, Copy)]
struct MatrixStack {
    top: Mat4,
}

#[derive(Debug, Clone, Copy)]
struct LightSlot {
    params: Option<LightParams>,
    /// Eye space, homogeneous
    position: Vec4,
}

#[derive(Debug, Clone, Copy)]
struct BatchVertex {
    clip: Vec4,
    color: Rgba,
    uv: [f32; 2],
}

pub struct ImmediateState {
    mode: MatrixMode,
    projection: MatrixStack,
    model_view: MatrixStack,
    saved_projection: Vec<Mat4>,
    saved_model_view: Vec<Mat4>,
    current: Attribs,
    saved_attribs: Vec<Attribs>,
    lights: [LightSlot; LIGHT_SLOTS],
    normal: Vec3,
    uv: [f32; 2],
    batch: Option<(Topology, Vec<BatchVertex>)>,
    viewport: [f32; 2],
}

impl Default for ImmediateState {
    fn default() -> Self {
        Self::new()
    }
}

impl ImmediateState {
    pub fn new() -> Self {
        Self {
            mode: MatrixMode::ModelView,
            projection: MatrixStack { top: Mat4::IDENTITY },
            model_view: MatrixStack { top: Mat4::IDENTITY },
            saved_projection: Vec::new(),
            saved_model_view: Vec::new(),
            current: Attribs::default(),
            saved_attribs: Vec::new(),
            lights: [LightSlot { params: None, position: Vec4::Z }; LIGHT_SLOTS],
            normal: Vec3::Z,
            uv: [0.0, 0.0],
            batch: None,
            viewport: [1.0, 1.0],
        }
    }

    /// Start of a replayed frame: viewport size in pixels, stacks recovered if a previous
    /// frame left them unbalanced
    pub fn begin_frame(&mut self, width: f32, height: f32) {
        self.viewport = [width.max(1.0), height.max(1.0)];
        if !self.saved_projection.is_empty()
            || !self.saved_model_view.is_empty()
            || !self.saved_attribs.is_empty()
        {
            tracing::warn!("Unbalanced state stacks from the previous frame, resetting");
            if let Some(first) = self.saved_projection.first() {
                self.projection.top = *first;
            }
            if let Some(first) = self.saved_model_view.first() {
                self.model_view.top = *first;
            }
            if let Some(first) = self.saved_attribs.first() {
                self.current = *first;
            }
            self.saved_projection.clear();
            self.saved_model_view.clear();
            self.saved_attribs.clear();
        }
        self.batch = None;
    }

    pub fn attribs(&self) -> &Attribs {
        &self.current
    }

    pub fn attribs_mut(&mut self) -> &mut Attribs {
        &mut self.current
    }

    // ── Matrices ──────────────────────────────────────────────

    fn top_mut(&mut self) -> &mut Mat4 {
        match self.mode {
            MatrixMode::Projection => &mut self.projection.top,
            MatrixMode::ModelView => &mut self.model_view.top,
        }
    }

    pub fn matrix_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    pub fn load_identity(&mut self) {
        *self.top_mut() = Mat4::IDENTITY;
    }

    pub fn push_matrix(&mut self) {
        match self.mode {
            MatrixMode::Projection => self.saved_projection.push(self.projection.top),
            MatrixMode::ModelView => self.saved_model_view.push(self.model_view.top),
        }
    }

    pub fn pop_matrix(&mut self) {
        let popped = match self.mode {
            MatrixMode::Projection => self.saved_projection.pop(),
            MatrixMode::ModelView => self.saved_model_view.pop(),
        };
        match popped {
            Some(m) => *self.top_mut() = m,
            None => tracing::warn!("Matrix stack underflow ({:?})", self.mode),
        }
    }

    pub fn multiply(&mut self, m: Mat4) {
        let top = self.top_mut();
        *top = *top * m;
    }

    pub fn translate(&mut self, v: Vec3) {
        self.multiply(Mat4::from_translation(v));
    }

    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        let axis = axis.normalize_or_zero();
        if axis != Vec3::ZERO {
            self.multiply(Mat4::from_axis_angle(axis, degrees.to_radians()));
        }
    }

    pub fn perspective(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.multiply(Mat4::perspective_rh_gl(fov_y_degrees.to_radians(), aspect, near, far));
    }

    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.multiply(Mat4::orthographic_rh_gl(left, right, bottom, top, near, far));
    }

    // ── Attributes and lights ─────────────────────────────────

    pub fn push_attrib(&mut self) {
        self.saved_attribs.push(self.current);
    }

    pub fn pop_attrib(&mut self) {
        match self.saved_attribs.pop() {
            Some(a) => self.current = a,
            None => tracing::warn!("Attribute stack underflow"),
        }
    }

    pub fn configure_light(&mut self, slot: usize, params: Option<LightParams>) {
        if let Some(light) = self.lights.get_mut(slot) {
            light.params = params;
        }
    }

    /// Stored in eye space, like `glLightfv(GL_POSITION)`
    pub fn set_light_position(&mut self, slot: usize, position: [f32; 4]) {
        let eye = self.model_view.top * Vec4::from(position);
        if let Some(light) = self.lights.get_mut(slot) {
            light.position = eye;
        }
    }

    fn shade(&self, eye: Vec3, n: Vec3, color: Rgba) -> Rgba {
        let base = Vec3::new(color[0], color[1], color[2]);
        let mut ambient = Vec3::splat(GLOBAL_AMBIENT);
        let mut diffuse = Vec3::ZERO;
        let mut specular = Vec3::ZERO;

        for light in &self.lights {
            let Some(params) = light.params else {
                continue;
            };
            let l = if light.position.w == 0.0 {
                light.position.truncate()
            } else {
                light.position.truncate() / light.position.w - eye
            }
            .normalize_or_zero();

            let n_dot_l = n.dot(l).max(0.0);
            ambient += rgb(params.ambient);
            diffuse += rgb(params.diffuse) * n_dot_l;
            if n_dot_l > 0.0 {
                let h = (l + Vec3::Z).normalize_or_zero();
                specular += rgb(params.specular) * n.dot(h).max(0.0).powf(SHININESS);
            }
        }

        let out = base * (ambient + diffuse) + specular * SPECULAR_STRENGTH;
        [
            out.x.clamp(0.0, 1.0),
            out.y.clamp(0.0, 1.0),
            out.z.clamp(0.0, 1.0),
            color[3],
        ]
    }

    // ── Batches ───────────────────────────────────────────────

    pub fn begin(&mut self, topology: Topology) {
        if self.batch.is_some() {
            tracing::warn!("begin inside an open batch, previous batch dropped");
        }
        self.batch = Some((topology, Vec::new()));
    }

    pub fn normal(&mut self, n: [f32; 3]) {
        self.normal = Vec3::from(n);
    }

    pub fn tex_coord(&mut self, uv: [f32; 2]) {
        self.uv = uv;
    }

    pub fn vertex(&mut self, p: [f32; 3]) {
        let model_view = self.model_view.top;
        let eye = model_view.transform_point3(Vec3::from(p));
        let clip = self.projection.top * eye.extend(1.0);

        let color = if self.current.lighting {
            let normal_matrix = Mat3::from_mat4(model_view).inverse().transpose();
            let n = (normal_matrix * self.normal).normalize_or_zero();
            self.shade(eye, n, self.current.color)
        } else {
            self.current.color
        };

        let uv = self.uv;
        if let Some((_, vertices)) = self.batch.as_mut() {
            vertices.push(BatchVertex { clip, color, uv });
        }
    }

    /// Close the batch and assemble it for the current fill mode
    pub fn end(&mut self) -> Option<Draw> {
        let (topology, vertices) = self.batch.take()?;
        let (primitive, indices, continuous) =
            assemble(topology, self.current.fill_mode, vertices.len());
        if indices.is_empty() {
            return None;
        }

        let mut out = Vec::with_capacity(indices.len());
        match primitive {
            DrawPrimitive::Lines => {
                let mut carried: Option<(usize, f32)> = None;
                for pair in indices.chunks_exact(2) {
                    let (a, b) = (pair[0], pair[1]);
                    let start = match carried {
                        Some((end, dist)) if continuous && end == a => dist,
                        _ => 0.0,
                    };
                    let length = self.pixel_distance(vertices[a].clip, vertices[b].clip);
                    out.push(gpu_vertex(&vertices[a], start));
                    out.push(gpu_vertex(&vertices[b], start + length));
                    carried = Some((b, start + length));
                }
            }
            _ => out.extend(indices.iter().map(|&i| gpu_vertex(&vertices[i], 0.0))),
        }

        Some(Draw {
            primitive,
            vertices: out,
            attribs: self.current,
        })
    }

    fn pixel_distance(&self, a: Vec4, b: Vec4) -> f32 {
        if a.w <= 0.0 || b.w <= 0.0 {
            return 0.0;
        }
        let to_px = |c: Vec4| {
            let ndc = c.truncate() / c.w;
            glam::Vec2::new(
                (ndc.x + 1.0) * 0.5 * self.viewport[0],
                (ndc.y + 1.0) * 0.5 * self.viewport[1],
            )
        };
        to_px(a).distance(to_px(b))
    }
}

fn rgb(c: Rgba) -> Vec3 {
    Vec3::new(c[0], c[1], c[2])
}

fn gpu_vertex(v: &BatchVertex, dist: f32) -> GpuVertex {
    GpuVertex {
        clip: v.clip.to_array(),
        color: v.color,
        uv: v.uv,
        dist,
    }
}

/// Index list for one batch. The flag says whether consecutive line segments share a
/// stipple phase (loops and polygon outlines).
fn assemble(topology: Topology, fill: FillMode, n: usize) -> (DrawPrimitive, Vec<usize>, bool) {
    let faces: Vec<Vec<usize>> = match topology {
        Topology::Points => return (DrawPrimitive::Points, (0..n).collect(), false),
        Topology::Lines => return (DrawPrimitive::Lines, (0..n - n % 2).collect(), false),
        Topology::LineLoop => {
            let indices = if n >= 2 { loop_edges(&(0..n).collect::<Vec<_>>()) } else { Vec::new() };
            return (DrawPrimitive::Lines, indices, true);
        }
        Topology::Triangles => chunked(n, 3),
        Topology::Quads => chunked(n, 4),
        Topology::Polygon if n >= 3 => vec![(0..n).collect()],
        Topology::Polygon => Vec::new(),
    };

    match fill {
        FillMode::Fill => {
            let mut indices = Vec::new();
            for face in &faces {
                for i in 1..face.len() - 1 {
                    indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            (DrawPrimitive::Triangles, indices, false)
        }
        FillMode::Wireframe => {
            let indices = faces.iter().flat_map(|f| loop_edges(f)).collect();
            (DrawPrimitive::Lines, indices, true)
        }
        FillMode::Point => (DrawPrimitive::Points, faces.into_iter().flatten().collect(), false),
    }
}

fn chunked(n: usize, size: usize) -> Vec<Vec<usize>> {
    (0..n - n % size)
        .collect::<Vec<_>>()
        .chunks_exact(size)
        .map(|c| c.to_vec())
        .collect()
}

fn loop_edges(face: &[usize]) -> Vec<usize> {
    let mut edges = Vec::with_capacity(face.len() * 2);
    for (i, &a) in face.iter().enumerate() {
        edges.push(a);
        edges.push(face[(i + 1) % face.len()]);
    }
    edges
}
