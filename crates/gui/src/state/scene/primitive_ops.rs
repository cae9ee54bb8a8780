//! Primitive and light creation, and the full clear

use shared::{ArityError, LightSource, Point3, Primitive, PrimitiveKind, MAX_EFFECTIVE_LIGHTS};

use super::SceneState;

impl SceneState {
    /// Validate `values` against `kind` and append a primitive in the active primitive color
    pub fn add_primitive(&mut self, kind: PrimitiveKind, values: &[f32]) -> Result<(), ArityError> {
        let primitive = Primitive::from_values(kind, values, self.colors.active_primitive)?;
        tracing::info!(
            "Added {} with {} points",
            kind.input_kind(),
            primitive.points().len()
        );
        self.primitives.push(primitive);
        self.version += 1;
        Ok(())
    }

    /// Append a light. Returns whether it landed in a shading slot.
    pub fn add_light(&mut self, position: Point3) -> bool {
        self.lights.push(LightSource { position });
        self.version += 1;
        self.lights_version += 1;

        let effective = self.lights.len() <= MAX_EFFECTIVE_LIGHTS;
        if effective {
            tracing::info!("Added light {} at {:?}", self.lights.len(), position);
        } else {
            tracing::warn!(
                "Light {} at {:?} exceeds the {} slot limit and will not shade",
                self.lights.len(),
                position,
                MAX_EFFECTIVE_LIGHTS
            );
        }
        effective
    }

    /// Remove every primitive and light. Camera, render settings and colors are untouched.
    pub fn clear_all(&mut self) {
        let had_lights = !self.lights.is_empty();
        tracing::info!(
            "Clearing scene ({} primitives, {} lights)",
            self.primitives.len(),
            self.lights.len()
        );
        self.primitives.clear();
        self.lights.clear();
        self.version += 1;
        if had_lights {
            self.lights_version += 1;
        }
    }
}
