//! Per-frame render pipeline.
//!
//! One frame is a fixed sequence of passes over a read-only view of the editor state:
//! clear, camera, axes, accent object, primitives, light markers, overlay. Each pass runs
//! inside its own matrix/attribute scope so none of them can leak state into the next.

use shared::{FillMode, LineStyle, Primitive, RenderSettings, Rgba, Stipple};

use super::backend::{
    draw_batch, AttribScope, GraphicsBackend, LightParams, MatrixMode, MatrixScope, TextureId,
    Topology, LIGHT_SLOTS,
};
use super::mesh::{self, MeshData};
use super::overlay::draw_overlay;
use super::text::TextRasterizer;
use crate::state::{EditorSettings, EditorState};

const AXIS_LENGTH: f32 = 5.0;
const TICK_SPACING: f32 = 2.0;
const TICK_COLOR: Rgba = [0.85, 0.85, 0.85, 1.0];
const MARKER_COLOR: Rgba = [1.0, 1.0, 0.2, 1.0];
const MARKER_SIZE: f32 = 8.0;

const CONE_RADIUS: f32 = 1.0;
const CONE_HEIGHT: f32 = 2.0;
const CONE_SEGMENTS: u32 = 32;
const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;

const NEAR: f32 = 0.1;
const FAR: f32 = 50.0;

/// Default light: white headlight along the view axis
const DEFAULT_LIGHT: LightParams = LightParams {
    ambient: [0.2, 0.2, 0.2, 1.0],
    diffuse: [0.8, 0.8, 0.8, 1.0],
    specular: [0.5, 0.5, 0.5, 1.0],
};

/// Color terms of every user light
const USER_LIGHT: LightParams = LightParams {
    ambient: [0.05, 0.05, 0.05, 1.0],
    diffuse: [0.9, 0.9, 0.85, 1.0],
    specular: [1.0, 1.0, 1.0, 1.0],
};

pub struct RenderPipeline {
    accent_mesh: MeshData,
    /// Persistent checkerboard, alive between `init` and `shutdown`
    accent_texture: Option<TextureId>,
    /// `lights_version` the light slots were last configured for
    applied_lights_version: Option<u64>,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self {
            accent_mesh: mesh::cone(CONE_RADIUS, CONE_HEIGHT, CONE_SEGMENTS),
            accent_texture: None,
            applied_lights_version: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.accent_texture.is_some()
    }

    /// One-time setup: projection, default light, accent texture
    pub fn init(&mut self, settings: &EditorSettings, gfx: &mut dyn GraphicsBackend) {
        if self.is_initialized() {
            return;
        }

        let aspect = settings.window.width / settings.window.height.max(1.0);
        gfx.matrix_mode(MatrixMode::Projection);
        gfx.load_identity();
        gfx.perspective(settings.camera.fov_degrees, aspect, NEAR, FAR);
        gfx.matrix_mode(MatrixMode::ModelView);
        gfx.load_identity();

        gfx.set_depth_test(true);
        gfx.configure_light(0, Some(DEFAULT_LIGHT));
        // Identity model-view: fixed in eye space, follows the camera
        gfx.set_light_position(0, [0.0, 0.0, 1.0, 0.0]);

        let pixels = mesh::checkerboard(CHECKER_SIZE, CHECKER_CELL);
        self.accent_texture = Some(gfx.create_texture(CHECKER_SIZE, CHECKER_SIZE, &pixels));
        tracing::info!("Render pipeline initialized ({}x{})", settings.window.width, settings.window.height);
    }

    /// Release the persistent texture
    pub fn shutdown(&mut self, gfx: &mut dyn GraphicsBackend) {
        if let Some(id) = self.accent_texture.take() {
            gfx.delete_texture(id);
        }
        self.applied_lights_version = None;
    }

    /// Render one frame
    pub fn render(
        &mut self,
        state: &EditorState,
        gfx: &mut dyn GraphicsBackend,
        text: &mut dyn TextRasterizer,
    ) {
        self.init(&state.settings, gfx);
        let scene = &state.scene;

        if self.applied_lights_version != Some(scene.lights_version()) {
            self.refresh_lights(state, gfx);
        }

        // 1. Clear
        gfx.clear(scene.colors().background);

        // 2. Camera
        let camera = scene.camera();
        gfx.matrix_mode(MatrixMode::ModelView);
        gfx.load_identity();
        gfx.translate(0.0, 0.0, camera.distance);
        gfx.rotate(camera.rotation_x, 1.0, 0.0, 0.0);
        gfx.rotate(camera.rotation_y, 0.0, 1.0, 0.0);
        for (i, light) in scene.effective_lights().iter().enumerate() {
            let [x, y, z] = light.position;
            gfx.set_light_position(i + 1, [x, y, z, 1.0]);
        }

        // 3-6. Scene
        draw_axes(gfx);
        self.draw_accent(state, gfx);
        draw_primitives(scene.primitives(), scene.render_settings(), gfx);
        draw_light_markers(state, gfx);

        // 7. Overlay
        draw_overlay(state, gfx, text);
    }

    /// Reconfigure slots 1.. for the current light list
    fn refresh_lights(&mut self, state: &EditorState, gfx: &mut dyn GraphicsBackend) {
        let active = state.scene.effective_lights().len();
        for slot in 1..LIGHT_SLOTS {
            let params = (slot <= active).then_some(USER_LIGHT);
            gfx.configure_light(slot, params);
        }
        self.applied_lights_version = Some(state.scene.lights_version());
        tracing::debug!("Light slots refreshed: {active} active");
    }

    fn draw_accent(&self, state: &EditorState, gfx: &mut dyn GraphicsBackend) {
        let render = state.scene.render_settings();

        let mut model_view = MatrixScope::new(gfx, MatrixMode::ModelView);
        model_view.rotate(state.scene.accent_rotation(), 0.0, 1.0, 0.0);

        let mut gfx = AttribScope::new(&mut *model_view);
        gfx.set_lighting(render.lighting_enabled);
        gfx.bind_texture(self.accent_texture);
        apply_line_state(&mut *gfx, render);
        gfx.set_color(state.scene.colors().accent_object);

        gfx.begin(Topology::Triangles);
        for v in &self.accent_mesh.vertices {
            gfx.normal(v.normal);
            gfx.tex_coord(v.uv);
            gfx.vertex(v.position);
        }
        gfx.end();
    }
}

/// Stipple is applied only to wireframe edges
pub fn stipple_for(render: &RenderSettings) -> Option<Stipple> {
    (render.fill_mode == FillMode::Wireframe && render.line_style != LineStyle::Solid)
        .then(|| render.line_style.stipple())
}

fn apply_line_state(gfx: &mut dyn GraphicsBackend, render: &RenderSettings) {
    gfx.set_fill_mode(render.fill_mode);
    gfx.set_line_width(render.line_width);
    gfx.set_point_size(render.line_width);
    gfx.set_line_stipple(stipple_for(render));
}

fn draw_axes(gfx: &mut dyn GraphicsBackend) {
    let mut model_view = MatrixScope::new(gfx, MatrixMode::ModelView);
    let mut gfx = AttribScope::new(&mut *model_view);
    gfx.set_lighting(false);
    gfx.bind_texture(None);
    gfx.set_fill_mode(FillMode::Fill);
    gfx.set_line_stipple(None);
    gfx.set_line_width(2.0);

    for seg in mesh::axes(AXIS_LENGTH) {
        gfx.set_color(seg.color);
        draw_batch(&mut *gfx, Topology::Lines, &[seg.from, seg.to]);
    }

    gfx.set_point_size(5.0);
    gfx.set_color(TICK_COLOR);
    draw_batch(&mut *gfx, Topology::Points, &mesh::axis_ticks(AXIS_LENGTH, TICK_SPACING));
}

fn topology_of(primitive: &Primitive) -> Topology {
    match primitive {
        Primitive::Line { .. } => Topology::Lines,
        Primitive::Triangle { .. } => Topology::Triangles,
        Primitive::Rectangle { .. } => Topology::Quads,
        Primitive::Polygon { .. } => Topology::Polygon,
    }
}

fn draw_primitives(primitives: &[Primitive], render: &RenderSettings, gfx: &mut dyn GraphicsBackend) {
    if primitives.is_empty() {
        return;
    }
    let mut gfx = AttribScope::new(gfx);
    gfx.set_lighting(false);
    gfx.bind_texture(None);
    apply_line_state(&mut *gfx, render);

    for p in primitives {
        gfx.set_color(p.color());
        draw_batch(&mut *gfx, topology_of(p), &p.vertices());
    }
}

fn draw_light_markers(state: &EditorState, gfx: &mut dyn GraphicsBackend) {
    let lights = state.scene.lights();
    if lights.is_empty() {
        return;
    }
    let mut gfx = AttribScope::new(gfx);
    gfx.set_lighting(false);
    gfx.bind_texture(None);
    gfx.set_fill_mode(FillMode::Fill);
    gfx.set_point_size(MARKER_SIZE);
    gfx.set_color(MARKER_COLOR);
    let points: Vec<[f32; 3]> = lights.iter().map(|l| l.position).collect();
    draw_batch(&mut *gfx, Topology::Points, &points);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recorder::{CommandRecorder, GfxCommand};
    use crate::render::text::BlockGlyphs;
    use shared::PrimitiveKind;

    fn frame(pipeline: &mut RenderPipeline, state: &EditorState) -> CommandRecorder {
        let mut rec = CommandRecorder::new();
        pipeline.render(state, &mut rec, &mut BlockGlyphs);
        rec
    }

    fn position_of(cmds: &[GfxCommand], pred: impl Fn(&GfxCommand) -> bool) -> usize {
        cmds.iter().position(pred).unwrap()
    }

    #[test]
    fn test_first_frame_initializes_once() {
        let state = EditorState::default();
        let mut pipeline = RenderPipeline::new();
        let rec = frame(&mut pipeline, &state);
        assert!(pipeline.is_initialized());
        assert!(rec.commands().contains(&GfxCommand::Perspective {
            fov_y: 45.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 50.0,
        }));
        assert_eq!(rec.live_textures().len(), 1);

        let rec = frame(&mut pipeline, &state);
        assert_eq!(rec.count(|c| matches!(c, GfxCommand::Perspective { .. })), 0);
        // Nothing changed in the light list: no reconfiguration
        assert_eq!(rec.count(|c| matches!(c, GfxCommand::ConfigureLight { .. })), 0);
    }

    #[test]
    fn test_frame_is_balanced() {
        let mut state = EditorState::default();
        state.scene.add_primitive(PrimitiveKind::Triangle, &[0.0; 9]).unwrap();
        state.scene.add_light([1.0, 2.0, 3.0]);
        state.picker.start(shared::ColorTarget::Background);
        let rec = frame(&mut RenderPipeline::new(), &state);
        assert!(rec.is_balanced());
    }

    #[test]
    fn test_pass_order() {
        let mut state = EditorState::default();
        state.scene.add_primitive(PrimitiveKind::Line, &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
        state.scene.add_light([0.0, 3.0, 0.0]);
        let rec = frame(&mut RenderPipeline::new(), &state);
        let cmds = rec.commands();

        let distance = state.scene.camera().distance;
        let line_color = state.scene.primitives()[0].color();

        let clear = position_of(cmds, |c| matches!(c, GfxCommand::Clear(_)));
        let camera = position_of(cmds, |c| *c == GfxCommand::Translate([0.0, 0.0, distance]));
        let axes = position_of(cmds, |c| *c == GfxCommand::SetLineWidth(2.0));
        let accent = position_of(cmds, |c| matches!(c, GfxCommand::Begin(Topology::Triangles)));
        let primitives = position_of(cmds, |c| *c == GfxCommand::SetColor(line_color));
        let marker = position_of(cmds, |c| *c == GfxCommand::SetPointSize(MARKER_SIZE));
        let overlay = position_of(cmds, |c| matches!(c, GfxCommand::Ortho { .. }));

        assert!(clear < camera && camera < axes && axes < accent);
        assert!(accent < primitives && primitives < marker && marker < overlay);
        assert_eq!(cmds[clear], GfxCommand::Clear(state.scene.colors().background));
    }

    #[test]
    fn test_stipple_only_in_wireframe() {
        let mut render = RenderSettings::default();
        render.line_style = LineStyle::Dashed;
        assert_eq!(stipple_for(&render), None);
        render.fill_mode = FillMode::Wireframe;
        assert_eq!(stipple_for(&render), Some(LineStyle::Dashed.stipple()));
        render.line_style = LineStyle::Solid;
        assert_eq!(stipple_for(&render), None);
    }

    #[test]
    fn test_lights_refresh_on_change() {
        let mut state = EditorState::default();
        let mut pipeline = RenderPipeline::new();
        frame(&mut pipeline, &state);

        state.scene.add_light([0.0, 1.0, 0.0]);
        let rec = frame(&mut pipeline, &state);
        assert!(rec.commands().contains(&GfxCommand::ConfigureLight { slot: 1, params: Some(USER_LIGHT) }));
        assert!(rec.commands().contains(&GfxCommand::ConfigureLight { slot: 2, params: None }));
        assert!(rec.commands().contains(&GfxCommand::SetLightPosition {
            slot: 1,
            position: [0.0, 1.0, 0.0, 1.0]
        }));

        state.scene.clear_all();
        let rec = frame(&mut pipeline, &state);
        assert!(rec.commands().contains(&GfxCommand::ConfigureLight { slot: 1, params: None }));
    }

    #[test]
    fn test_only_seven_user_slots() {
        let mut state = EditorState::default();
        for i in 0..9 {
            state.scene.add_light([i as f32, 0.0, 0.0]);
        }
        let rec = frame(&mut RenderPipeline::new(), &state);
        let positions = rec.count(|c| matches!(c, GfxCommand::SetLightPosition { slot, .. } if *slot > 0));
        assert_eq!(positions, 7);
        assert_eq!(
            rec.count(|c| matches!(c, GfxCommand::ConfigureLight { params: Some(_), .. })),
            8
        );
    }

    #[test]
    fn test_primitives_keep_their_color() {
        let mut state = EditorState::default();
        state.scene.add_primitive(PrimitiveKind::Line, &[0.0; 6]).unwrap();
        let original = state.scene.primitives()[0].color();
        state.scene.set_color(shared::ColorTarget::Primitive, [0.0, 0.0, 1.0]);
        let rec = frame(&mut RenderPipeline::new(), &state);
        assert!(rec.commands().contains(&GfxCommand::SetColor(original)));
    }

    #[test]
    fn test_shutdown_releases_texture() {
        let state = EditorState::default();
        let mut pipeline = RenderPipeline::new();
        let mut rec = CommandRecorder::new();
        pipeline.render(&state, &mut rec, &mut BlockGlyphs);
        pipeline.shutdown(&mut rec);
        assert!(rec.live_textures().is_empty());
        assert!(!pipeline.is_initialized());
    }
}
