//! Rendering: backend contract, frame recording and the render pipeline

pub mod backend;
pub mod mesh;
pub mod overlay;
pub mod pipeline;
pub mod recorder;
pub mod text;

pub use backend::{GraphicsBackend, LightParams, MatrixMode, TextureId, Topology};
pub use pipeline::RenderPipeline;
pub use recorder::{CommandRecorder, GfxCommand, Replayer};
pub use text::{BlockGlyphs, PixelBuffer, TextRasterizer};
