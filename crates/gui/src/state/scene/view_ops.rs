//! Camera, render settings and color operations

use shared::{opaque, ColorTarget, LineStyle};

use super::SceneState;

impl SceneState {
    pub fn set_color(&mut self, target: ColorTarget, rgb: [f32; 3]) {
        self.colors.set(target, opaque(rgb));
        self.version += 1;
    }

    pub fn cycle_render_mode(&mut self) {
        self.render.fill_mode = self.render.fill_mode.next();
        tracing::debug!("Render mode: {}", self.render.fill_mode.name());
        self.version += 1;
    }

    /// Change line width by `delta`, clamped to the allowed range
    pub fn adjust_line_width(&mut self, delta: f32) {
        self.render.adjust_line_width(delta);
        self.version += 1;
    }

    pub fn set_line_style(&mut self, style: LineStyle) {
        self.render.line_style = style;
        self.version += 1;
    }

    pub fn toggle_lighting(&mut self) {
        self.render.lighting_enabled = !self.render.lighting_enabled;
        tracing::debug!("Lighting enabled: {}", self.render.lighting_enabled);
        self.version += 1;
    }

    /// Move the camera along the view axis; distance stays clamped
    pub fn adjust_zoom(&mut self, delta: f32) {
        self.camera.zoom(delta);
        self.version += 1;
    }

    /// Accumulate yaw and pitch in degrees. No wraparound: the angles only feed rotations.
    pub fn rotate_camera_by(&mut self, d_yaw: f32, d_pitch: f32) {
        self.camera.rotate(d_yaw, d_pitch);
        self.version += 1;
    }

    pub fn reset_camera(&mut self) {
        self.camera = Default::default();
        self.version += 1;
    }

    pub fn reset_accent_rotation(&mut self) {
        self.accent_rotation = 0.0;
        self.version += 1;
    }

    /// Per-frame spin of the accent object
    pub fn advance_accent(&mut self, step: f32) {
        if step != 0.0 {
            self.accent_rotation += step;
            self.version += 1;
        }
    }
}
