//! Editor settings
//!
//! Read once at startup from the platform config directory. Nothing is written back:
//! the editor keeps no state between runs.

use serde::{Deserialize, Serialize};

use crate::i18n::Lang;

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Fixed window width in points
    pub width: f32,
    /// Fixed window height in points
    pub height: f32,
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            title: "Scene Editor".to_string(),
        }
    }
}

/// Camera interaction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Degrees of rotation per pixel of drag
    pub drag_sensitivity: f32,
    /// Distance change per wheel notch
    pub zoom_step: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.5,
            zoom_step: 0.5,
            fov_degrees: 45.0,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Label font size in pixels
    pub font_size: f32,
    pub language: Lang,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Lang::En,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub window: WindowSettings,
    /// Target frames per second
    pub frame_rate: u32,
    pub camera: CameraSettings,
    /// Accent object spin in degrees per frame
    pub accent_spin: f32,
    pub ui: UiSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            frame_rate: 60,
            camera: CameraSettings::default(),
            accent_spin: 0.5,
            ui: UiSettings::default(),
        }
    }
}

impl EditorSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "scene-editor", "scene-editor") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        tracing::info!("Loaded settings from {}", config_path.display());
                        return settings;
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring malformed {}: {e}", config_path.display());
                    }
                }
            }
        }
        Self::default()
    }

    /// Parse settings; missing fields fall back to their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Frame budget derived from `frame_rate`
    pub fn frame_budget(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }
}
