// Library crate: the editor runtime (scene state, input dispatch, render pipeline) with no
// window toolkit in sight, so integration tests can drive it headless.
// The eframe/glow adapters (window, GL backend, glyph rasterizer) remain in the binary crate.

pub mod command;
pub mod error;
pub mod frame;
pub mod harness;
pub mod i18n;
pub mod input;
pub mod render;
pub mod state;
pub mod ui;
