//! GL side of the viewport: fixed-function emulation, glow resources, glyphs

pub mod gl_backend;
pub mod immediate;
pub mod text_raster;

pub use gl_backend::GlBackend;
pub use text_raster::GlyphRasterizer;
