//! Glyph rasterization with `ab_glyph`, using the font egui ships as its default
//! proportional face.

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use scene_editor_lib::render::{PixelBuffer, TextRasterizer};
use shared::Rgba;

pub struct GlyphRasterizer {
    font: Option<FontArc>,
}

impl GlyphRasterizer {
    pub fn new() -> Self {
        let font = default_font_bytes().and_then(|bytes| match FontArc::try_from_vec(bytes) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::error!("Failed to load UI font: {e}");
                None
            }
        });
        if font.is_none() {
            tracing::warn!("No UI font available, overlay text will be blank");
        }
        Self { font }
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// First entry of egui's proportional family
fn default_font_bytes() -> Option<Vec<u8>> {
    let defs = egui::FontDefinitions::default();
    let name = defs.families.get(&egui::FontFamily::Proportional)?.first()?;
    defs.font_data.get(name).map(|data| data.font.to_vec())
}

impl TextRasterizer for GlyphRasterizer {
    fn rasterize(&mut self, text: &str, size: f32, color: Rgba) -> PixelBuffer {
        let Some(font) = &self.font else {
            return PixelBuffer::new(0, 0);
        };
        if text.is_empty() {
            return PixelBuffer::new(0, 0);
        }

        let scale = PxScale::from(size);
        let scaled = font.as_scaled(scale);
        let ascent = scaled.ascent();

        // Layout on a single baseline
        let mut glyphs = Vec::new();
        let mut caret = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(scale, point(caret, ascent)));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }

        let width = caret.ceil().max(1.0) as u32;
        let height = (ascent - scaled.descent()).ceil().max(1.0) as u32;
        let mut buffer = PixelBuffer::new(width, height);
        let rgb = [
            (color[0].clamp(0.0, 1.0) * 255.0) as u8,
            (color[1].clamp(0.0, 1.0) * 255.0) as u8,
            (color[2].clamp(0.0, 1.0) * 255.0) as u8,
        ];

        for glyph in glyphs {
            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                    return;
                }
                let alpha = (coverage * color[3].clamp(0.0, 1.0) * 255.0) as u8;
                let i = ((y as u32 * width + x as u32) * 4) as usize;
                if alpha > buffer.pixels[i + 3] {
                    buffer.pixels[i..i + 3].copy_from_slice(&rgb);
                    buffer.pixels[i + 3] = alpha;
                }
            });
        }
        buffer
    }
}
