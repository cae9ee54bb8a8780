//! Text rasterization and the overlay canvas.
//!
//! Fonts live outside the core: a [`TextRasterizer`] turns a string into an RGBA pixel
//! buffer, and the overlay composites every buffer of a frame into one window-sized
//! [`Canvas`] that is uploaded as a single texture.

use shared::Rgba;

/// Tightly packed RGBA8 pixels, row 0 at the top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Pixels with non-zero alpha
    pub fn coverage(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|p| p[3] > 0).count()
    }
}

pub trait TextRasterizer {
    /// Render `text` at `size` pixels in `color`; an empty string yields an empty buffer
    fn rasterize(&mut self, text: &str, size: f32, color: Rgba) -> PixelBuffer;
}

/// Window-sized compositing target for the overlay
pub struct Canvas {
    buffer: PixelBuffer,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
        }
    }

    /// Alpha-over `src` with its top-left corner at `(x, y)`; clipped to the canvas
    pub fn blit(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        let dst = &mut self.buffer;
        for sy in 0..src.height as i32 {
            let dy = y + sy;
            if dy < 0 || dy >= dst.height as i32 {
                continue;
            }
            for sx in 0..src.width as i32 {
                let dx = x + sx;
                if dx < 0 || dx >= dst.width as i32 {
                    continue;
                }
                let s = ((sy as u32 * src.width + sx as u32) * 4) as usize;
                let d = ((dy as u32 * dst.width + dx as u32) * 4) as usize;
                let sa = src.pixels[s + 3] as u32;
                if sa == 0 {
                    continue;
                }
                let da = dst.pixels[d + 3] as u32;
                let out_a = sa + da * (255 - sa) / 255;
                for c in 0..3 {
                    let sc = src.pixels[s + c] as u32 * sa;
                    let dc = dst.pixels[d + c] as u32 * da * (255 - sa) / 255;
                    dst.pixels[d + c] = ((sc + dc) / out_a.max(1)) as u8;
                }
                dst.pixels[d + 3] = out_a as u8;
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.coverage() == 0
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }
}

/// Deterministic rasterizer: every visible character is a solid block.
///
/// Used headless, where no font is available and only placement matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockGlyphs;

impl BlockGlyphs {
    pub fn advance(size: f32) -> u32 {
        ((size * 0.6).round() as u32).max(1)
    }
}

impl TextRasterizer for BlockGlyphs {
    fn rasterize(&mut self, text: &str, size: f32, color: Rgba) -> PixelBuffer {
        let advance = Self::advance(size);
        let height = (size.round() as u32).max(1);
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return PixelBuffer::new(0, 0);
        }

        let mut buf = PixelBuffer::new(advance * chars.len() as u32, height);
        let texel = [
            (color[0] * 255.0) as u8,
            (color[1] * 255.0) as u8,
            (color[2] * 255.0) as u8,
            (color[3] * 255.0) as u8,
        ];
        for (i, ch) in chars.iter().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            // One column of spacing between blocks
            for y in 0..height {
                for x in 0..advance.saturating_sub(1) {
                    let px = i as u32 * advance + x;
                    let at = ((y * buf.width + px) * 4) as usize;
                    buf.pixels[at..at + 4].copy_from_slice(&texel);
                }
            }
        }
        buf
    }
}
