//! Scene state management
//!
//! Owns primitives, lights, camera, render settings and the active colors. All mutation
//! goes through the methods in the submodules so the structural rules hold:
//! primitives are validated before they are stored, camera distance and line width stay
//! clamped, and only `clear_all` ever removes anything.

mod display;
mod primitive_ops;
mod view_ops;

pub use display::{fill_mode_label, primitive_label, scene_summary};

use shared::{Camera, ColorTargets, LightSource, Primitive, RenderSettings, MAX_EFFECTIVE_LIGHTS};

/// Scene model
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    primitives: Vec<Primitive>,
    lights: Vec<LightSource>,
    camera: Camera,
    render: RenderSettings,
    colors: ColorTargets,
    /// Local rotation of the accent object, degrees about Y
    accent_rotation: f32,
    /// Monotonically increasing version counter, bumped on every mutation
    pub(crate) version: u64,
    /// Bumped whenever the light list changes; the renderer reconfigures slots on change
    pub(crate) lights_version: u64,
}

impl SceneState {
    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn lights_version(&self) -> u64 {
        self.lights_version
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    /// Lights that occupy a shading slot; anything past the cap is stored but inert
    pub fn effective_lights(&self) -> &[LightSource] {
        let n = self.lights.len().min(MAX_EFFECTIVE_LIGHTS);
        &self.lights[..n]
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn render_settings(&self) -> &RenderSettings {
        &self.render
    }

    pub fn colors(&self) -> &ColorTargets {
        &self.colors
    }

    pub fn accent_rotation(&self) -> f32 {
        self.accent_rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ColorTarget, FillMode, LineStyle, PrimitiveKind};

    #[test]
    fn test_primitive_color_is_snapshotted() {
        let mut scene = SceneState::default();
        scene.set_color(ColorTarget::Primitive, [1.0, 0.0, 0.0]);
        scene
            .add_primitive(PrimitiveKind::Line, &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0])
            .unwrap();

        scene.set_color(ColorTarget::Primitive, [0.0, 0.0, 1.0]);
        assert_eq!(scene.primitives()[0].color(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(scene.colors().active_primitive, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_rejected_primitive_adds_nothing() {
        let mut scene = SceneState::default();
        let version = scene.version();
        assert!(scene.add_primitive(PrimitiveKind::Triangle, &[0.0; 6]).is_err());
        assert!(scene.primitives().is_empty());
        assert_eq!(scene.version(), version);
    }

    #[test]
    fn test_clear_all_keeps_view_state() {
        let mut scene = SceneState::default();
        scene
            .add_primitive(PrimitiveKind::Rectangle, &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0])
            .unwrap();
        scene.add_light([1.0, 2.0, 3.0]);
        scene.rotate_camera_by(12.5, -3.0);
        scene.adjust_zoom(-2.0);
        scene.cycle_render_mode();
        scene.set_line_style(LineStyle::Dotted);
        scene.adjust_line_width(2.5);
        scene.set_color(ColorTarget::Background, [0.2, 0.3, 0.4]);

        let camera = *scene.camera();
        let render = *scene.render_settings();
        let colors = *scene.colors();

        scene.clear_all();

        assert!(scene.primitives().is_empty());
        assert!(scene.lights().is_empty());
        assert_eq!(scene.camera().distance.to_bits(), camera.distance.to_bits());
        assert_eq!(scene.camera().rotation_x.to_bits(), camera.rotation_x.to_bits());
        assert_eq!(scene.camera().rotation_y.to_bits(), camera.rotation_y.to_bits());
        assert_eq!(*scene.render_settings(), render);
        assert_eq!(*scene.colors(), colors);
    }

    #[test]
    fn test_lights_past_cap_are_stored_but_inert() {
        let mut scene = SceneState::default();
        for i in 0..MAX_EFFECTIVE_LIGHTS {
            assert!(scene.add_light([i as f32, 0.0, 0.0]));
        }
        assert!(!scene.add_light([9.0, 9.0, 9.0]));
        assert_eq!(scene.lights().len(), MAX_EFFECTIVE_LIGHTS + 1);
        assert_eq!(scene.effective_lights().len(), MAX_EFFECTIVE_LIGHTS);
    }

    #[test]
    fn test_add_light_signals_refresh() {
        let mut scene = SceneState::default();
        let before = scene.lights_version();
        scene.add_light([0.0, 1.0, 0.0]);
        assert!(scene.lights_version() > before);

        let before = scene.lights_version();
        scene.clear_all();
        assert!(scene.lights_version() > before);

        // Clearing an already empty light list is not a lighting change
        let before = scene.lights_version();
        scene.clear_all();
        assert_eq!(scene.lights_version(), before);
    }

    #[test]
    fn test_zoom_stays_in_range() {
        let mut scene = SceneState::default();
        let steps = [0.5, 0.5, -0.5, 3.0, 7.0, -30.0, -0.5, 12.0, -1.5, 0.5];
        for _ in 0..10 {
            for step in steps {
                scene.adjust_zoom(step);
                let d = scene.camera().distance;
                assert!((Camera::MIN_DISTANCE..=Camera::MAX_DISTANCE).contains(&d));
            }
        }
    }

    #[test]
    fn test_line_width_stays_in_range() {
        let mut scene = SceneState::default();
        let deltas = [0.5, -0.5, 0.5, 0.5, -0.5, -0.5, -0.5, -0.5];
        for i in 0..200 {
            let delta = if i % 50 < 30 { 0.5 } else { deltas[i % deltas.len()] };
            scene.adjust_line_width(delta);
            let w = scene.render_settings().line_width;
            assert!((RenderSettings::MIN_LINE_WIDTH..=RenderSettings::MAX_LINE_WIDTH).contains(&w));
        }
    }

    #[test]
    fn test_cycle_render_mode() {
        let mut scene = SceneState::default();
        assert_eq!(scene.render_settings().fill_mode, FillMode::Fill);
        scene.cycle_render_mode();
        assert_eq!(scene.render_settings().fill_mode, FillMode::Wireframe);
        scene.cycle_render_mode();
        scene.cycle_render_mode();
        assert_eq!(scene.render_settings().fill_mode, FillMode::Fill);
    }

    #[test]
    fn test_camera_reset_and_accent() {
        let mut scene = SceneState::default();
        scene.rotate_camera_by(400.0, -720.0);
        assert_eq!(scene.camera().rotation_y, 400.0);
        assert_eq!(scene.camera().rotation_x, -720.0);
        scene.reset_camera();
        assert_eq!(*scene.camera(), Camera::default());

        scene.advance_accent(0.5);
        scene.advance_accent(0.5);
        assert_eq!(scene.accent_rotation(), 1.0);
        scene.reset_accent_rotation();
        assert_eq!(scene.accent_rotation(), 0.0);
    }

    #[test]
    fn test_toggle_lighting() {
        let mut scene = SceneState::default();
        assert!(scene.render_settings().lighting_enabled);
        scene.toggle_lighting();
        assert!(!scene.render_settings().lighting_enabled);
    }
}
