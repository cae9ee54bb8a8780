//! Display helper functions for the status line

use shared::{FillMode, Primitive};

use super::SceneState;
use crate::i18n::t;

/// Get display name for a primitive
pub fn primitive_label(primitive: &Primitive) -> String {
    let kind = match primitive {
        Primitive::Line { .. } => t("btn.line"),
        Primitive::Triangle { .. } => t("btn.triangle"),
        Primitive::Rectangle { .. } => t("btn.rectangle"),
        Primitive::Polygon { .. } => t("btn.polygon"),
    };
    format!("{kind} ({})", primitive.points().len())
}

pub fn fill_mode_label(mode: FillMode) -> &'static str {
    match mode {
        FillMode::Fill => t("mode.fill"),
        FillMode::Wireframe => t("mode.wireframe"),
        FillMode::Point => t("mode.point"),
    }
}

/// One-line summary of the scene: counts, camera distance, line settings
pub fn scene_summary(scene: &SceneState) -> String {
    let render = scene.render_settings();
    let lighting = if render.lighting_enabled {
        t("status.lighting_on")
    } else {
        t("status.lighting_off")
    };
    format!(
        "{}: {}  {}: {}  {}: {:.1}  {}: {:.1}  {}  {}",
        t("status.primitives"),
        scene.primitives().len(),
        t("status.lights"),
        scene.lights().len(),
        t("status.zoom"),
        scene.camera().distance,
        t("status.width"),
        render.line_width,
        fill_mode_label(render.fill_mode),
        lighting,
    )
}
