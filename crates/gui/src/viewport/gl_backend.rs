use std::collections::HashMap;

use glow::HasContext;
use scene_editor_lib::render::{
    GfxCommand, GraphicsBackend, LightParams, MatrixMode, Replayer, TextureId, Topology,
};
use shared::{FillMode, Rgba, Stipple};

use super::immediate::{Draw, DrawPrimitive, GpuVertex, ImmediateState, FLOATS_PER_VERTEX};

// ── GPU resources ────────────────────────────────────────────

/// Program, streaming buffer, textures and the emulated fixed-function state
struct GlDevice {
    program: glow::Program,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    textures: HashMap<TextureId, glow::Texture>,
    next_texture: TextureId,
    state: ImmediateState,
}

/// Replays recorded frames with glow. Lives behind `Arc<Mutex<_>>` so the paint callback
/// can reach it.
pub struct GlBackend {
    device: GlDevice,
    replayer: Replayer,
}

impl GlBackend {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let program = compile_program(gl, VERT, FRAG)?;
        unsafe {
            let vao = gl.create_vertex_array()?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer()?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));

            let stride = (FLOATS_PER_VERTEX * 4) as i32;
            // clip position: location 0
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 4, glow::FLOAT, false, stride, 0);
            // color: location 1
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 4 * 4);
            // uv: location 2
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(2, 2, glow::FLOAT, false, stride, 8 * 4);
            // stipple distance: location 3
            gl.enable_vertex_attrib_array(3);
            gl.vertex_attrib_pointer_f32(3, 1, glow::FLOAT, false, stride, 10 * 4);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                device: GlDevice {
                    program,
                    vao,
                    vbo,
                    textures: HashMap::new(),
                    next_texture: 0,
                    state: ImmediateState::new(),
                },
                replayer: Replayer::new(),
            })
        }
    }

    /// Replay one recorded frame into the given viewport (GL pixels, origin bottom-left)
    pub fn paint(&mut self, gl: &glow::Context, viewport: [i32; 4], commands: &[GfxCommand]) {
        unsafe {
            gl.viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
            gl.scissor(viewport[0], viewport[1], viewport[2], viewport[3]);
            gl.enable(glow::SCISSOR_TEST);
            gl.enable(glow::PROGRAM_POINT_SIZE);
            gl.disable(glow::CULL_FACE);
        }
        self.device.state.begin_frame(viewport[2] as f32, viewport[3] as f32);

        self.replay(gl, commands);

        unsafe {
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.disable(glow::BLEND);
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.use_program(None);
        }
    }

    /// Replay without touching viewport state, e.g. the shutdown commands
    pub fn replay(&mut self, gl: &glow::Context, commands: &[GfxCommand]) {
        let mut target = ImmediateGl {
            gl,
            device: &mut self.device,
        };
        self.replayer.replay(commands, &mut target);
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        let mut target = ImmediateGl {
            gl,
            device: &mut self.device,
        };
        self.replayer.release_all(&mut target);
        unsafe {
            for (_, tex) in self.device.textures.drain() {
                gl.delete_texture(tex);
            }
            gl.delete_program(self.device.program);
            gl.delete_vertex_array(self.device.vao);
            gl.delete_buffer(self.device.vbo);
        }
        tracing::info!("GL resources released");
    }
}

// ── Immediate-mode target ────────────────────────────────────

/// `GraphicsBackend` over one GL context for the duration of a replay
struct ImmediateGl<'a> {
    gl: &'a glow::Context,
    device: &'a mut GlDevice,
}

impl ImmediateGl<'_> {
    fn draw(&mut self, draw: &Draw) {
        let gl = self.gl;
        let device = &mut *self.device;
        let a = &draw.attribs;
        let texture = a.texture.and_then(|id| device.textures.get(&id).copied());

        unsafe {
            if a.depth_test {
                gl.enable(glow::DEPTH_TEST);
                gl.depth_func(glow::LEQUAL);
            } else {
                gl.disable(glow::DEPTH_TEST);
            }
            if a.blend {
                gl.enable(glow::BLEND);
                gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            } else {
                gl.disable(glow::BLEND);
            }

            gl.use_program(Some(device.program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, texture);
            set_uniform_i32(gl, device.program, "u_texture", 0);
            set_uniform_i32(gl, device.program, "u_textured", texture.is_some() as i32);
            set_uniform_f32(gl, device.program, "u_point_size", a.point_size);

            let stipple = match (draw.primitive, a.stipple) {
                (DrawPrimitive::Lines, Some(s)) => Some(s),
                _ => None,
            };
            set_stipple(gl, device.program, stipple);

            let mode = match draw.primitive {
                DrawPrimitive::Triangles => glow::TRIANGLES,
                DrawPrimitive::Lines => {
                    gl.line_width(a.line_width);
                    glow::LINES
                }
                DrawPrimitive::Points => glow::POINTS,
            };

            gl.bind_vertex_array(Some(device.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(device.vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck_cast_slice(&draw.vertices),
                glow::STREAM_DRAW,
            );
            gl.draw_arrays(mode, 0, draw.vertices.len() as i32);
            gl.bind_vertex_array(None);
            gl.line_width(1.0);
        }
    }
}

impl GraphicsBackend for ImmediateGl<'_> {
    fn clear(&mut self, color: Rgba) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.device.state.matrix_mode(mode);
    }

    fn load_identity(&mut self) {
        self.device.state.load_identity();
    }

    fn push_matrix(&mut self) {
        self.device.state.push_matrix();
    }

    fn pop_matrix(&mut self) {
        self.device.state.pop_matrix();
    }

    fn perspective(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.device.state.perspective(fov_y_degrees, aspect, near, far);
    }

    fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.device.state.ortho(left, right, bottom, top, near, far);
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.device.state.translate(glam::Vec3::new(x, y, z));
    }

    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) {
        self.device.state.rotate(degrees, glam::Vec3::new(x, y, z));
    }

    fn push_attrib(&mut self) {
        self.device.state.push_attrib();
    }

    fn pop_attrib(&mut self) {
        self.device.state.pop_attrib();
    }

    fn set_color(&mut self, color: Rgba) {
        self.device.state.attribs_mut().color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.device.state.attribs_mut().line_width = width;
    }

    fn set_point_size(&mut self, size: f32) {
        self.device.state.attribs_mut().point_size = size;
    }

    fn set_line_stipple(&mut self, stipple: Option<Stipple>) {
        self.device.state.attribs_mut().stipple = stipple;
    }

    fn set_fill_mode(&mut self, mode: FillMode) {
        self.device.state.attribs_mut().fill_mode = mode;
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.device.state.attribs_mut().depth_test = enabled;
    }

    fn set_blend(&mut self, enabled: bool) {
        self.device.state.attribs_mut().blend = enabled;
    }

    fn set_lighting(&mut self, enabled: bool) {
        self.device.state.attribs_mut().lighting = enabled;
    }

    fn configure_light(&mut self, slot: usize, params: Option<LightParams>) {
        self.device.state.configure_light(slot, params);
    }

    fn set_light_position(&mut self, slot: usize, position: [f32; 4]) {
        self.device.state.set_light_position(slot, position);
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> TextureId {
        let gl = self.gl;
        self.device.next_texture += 1;
        let id = self.device.next_texture;
        unsafe {
            let tex = match gl.create_texture() {
                Ok(tex) => tex,
                Err(e) => {
                    tracing::error!("Texture creation failed: {e}");
                    return id;
                }
            };
            gl.bind_texture(glow::TEXTURE_2D, Some(tex));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(rgba)),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
            self.device.textures.insert(id, tex);
        }
        id
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.device.state.attribs_mut().texture = texture;
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if let Some(tex) = self.device.textures.remove(&texture) {
            unsafe {
                self.gl.delete_texture(tex);
            }
        }
    }

    fn begin(&mut self, topology: Topology) {
        self.device.state.begin(topology);
    }

    fn normal(&mut self, n: [f32; 3]) {
        self.device.state.normal(n);
    }

    fn tex_coord(&mut self, uv: [f32; 2]) {
        self.device.state.tex_coord(uv);
    }

    fn vertex(&mut self, p: [f32; 3]) {
        self.device.state.vertex(p);
    }

    fn end(&mut self) {
        if let Some(draw) = self.device.state.end() {
            self.draw(&draw);
        }
    }
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;

        let vert = gl.create_shader(glow::VERTEX_SHADER)?;
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            tracing::error!("Vertex shader error: {log}");
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER)?;
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            tracing::error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
        }

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_i32(gl: &glow::Context, program: glow::Program, name: &str, v: i32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_i32(loc.as_ref(), v);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

fn set_stipple(gl: &glow::Context, program: glow::Program, stipple: Option<Stipple>) {
    match stipple {
        Some(s) => {
            set_uniform_i32(gl, program, "u_stipple", 1);
            set_uniform_i32(gl, program, "u_stipple_pattern", s.pattern as i32);
            set_uniform_i32(gl, program, "u_stipple_factor", s.factor.max(1) as i32);
        }
        None => set_uniform_i32(gl, program, "u_stipple", 0),
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice(slice: &[GpuVertex]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice)) }
}

// ── Shaders ──────────────────────────────────────────────────

const VERT: &str = r#"#version 330 core
uniform float u_point_size;

layout(location = 0) in vec4 a_clip;
layout(location = 1) in vec4 a_color;
layout(location = 2) in vec2 a_uv;
layout(location = 3) in float a_dist;

out vec4 v_color;
out vec2 v_uv;
out float v_dist;

void main() {
    gl_Position = a_clip;
    gl_PointSize = u_point_size;
    v_color = a_color;
    v_uv = a_uv;
    v_dist = a_dist;
}
"#;

const FRAG: &str = r#"#version 330 core
uniform sampler2D u_texture;
uniform int u_textured;
uniform int u_stipple;
uniform int u_stipple_pattern;
uniform int u_stipple_factor;

in vec4 v_color;
in vec2 v_uv;
in float v_dist;

out vec4 frag_color;

void main() {
    if (u_stipple != 0) {
        int bit = int(floor(v_dist / float(u_stipple_factor))) & 15;
        if (((u_stipple_pattern >> bit) & 1) == 0) {
            discard;
        }
    }
    vec4 color = v_color;
    if (u_textured != 0) {
        color *= texture(u_texture, v_uv);
    }
    frag_color = color;
}
"#;
