//! HSV palette picker
//!
//! The palette is a square of side `S`: hue runs left to right (`x / S`), value runs top to
//! bottom (`1 - y / S`), saturation is always 1.

use shared::{ColorTarget, Rgba};

use super::scene::SceneState;

/// Standard six-sector HSV → RGB conversion. `h`, `s`, `v` in [0, 1].
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h6 = h * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    sector_rgb((sector as i32).rem_euclid(6), f, s, v)
}

fn sector_rgb(sector: i32, f: f32, s: f32, v: f32) -> [f32; 3] {
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Fixed square region of the window holding the palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteRegion {
    /// Top-left corner in window pixels
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl PaletteRegion {
    pub fn contains(&self, pos: [f32; 2]) -> bool {
        pos[0] >= self.x
            && pos[0] < self.x + self.size
            && pos[1] >= self.y
            && pos[1] < self.y + self.size
    }

    /// Color under a window position, `None` outside the square
    pub fn color_at(&self, pos: [f32; 2]) -> Option<[f32; 3]> {
        if !self.contains(pos) {
            return None;
        }
        let hue = (pos[0] - self.x) / self.size;
        let value = 1.0 - (pos[1] - self.y) / self.size;
        Some(hsv_to_rgb(hue, 1.0, value))
    }
}

/// RGBA8 pixels of the palette texture, row 0 at the top
pub fn palette_pixels(size: u32) -> Vec<u8> {
    let s = size as f32;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let [r, g, b] = hsv_to_rgb(x as f32 / s, 1.0, 1.0 - y as f32 / s);
            pixels.extend_from_slice(&[to_u8(r), to_u8(g), to_u8(b), 255]);
        }
    }
    pixels
}

fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorPickerState {
    pub active: bool,
    pub target: ColorTarget,
}

impl ColorPickerState {
    pub fn start(&mut self, target: ColorTarget) {
        self.active = true;
        self.target = target;
        tracing::debug!("Color picking for {}", target.name());
    }

    /// Apply the color under `pos` to the current target.
    ///
    /// Outside the palette nothing happens and the picker stays active.
    pub fn try_pick(
        &mut self,
        pos: [f32; 2],
        region: &PaletteRegion,
        scene: &mut SceneState,
    ) -> Option<Rgba> {
        if !self.active {
            return None;
        }
        let rgb = region.color_at(pos)?;
        scene.set_color(self.target, rgb);
        self.active = false;
        Some(scene.colors().get(self.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-6;

    fn assert_rgb(actual: [f32; 3], expected: [f32; 3]) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() <= TOL,
                "channel {i}: {actual:?} != {expected:?}"
            );
        }
    }

    #[test]
    fn test_primary_hues() {
        assert_rgb(hsv_to_rgb(0.0, 1.0, 1.0), [1.0, 0.0, 0.0]);
        assert_rgb(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), [0.0, 1.0, 0.0]);
        assert_rgb(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_hue_one_wraps_to_red() {
        assert_rgb(hsv_to_rgb(1.0, 1.0, 1.0), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sector_boundaries_are_continuous() {
        for s in [1.0, 0.5] {
            for v in [1.0, 0.3] {
                for k in 0..6 {
                    let before = sector_rgb((k + 5) % 6, 1.0, s, v);
                    let after = sector_rgb(k, 0.0, s, v);
                    assert_rgb(before, after);
                }
            }
        }
    }

    #[test]
    fn test_value_zero_is_black() {
        assert_rgb(hsv_to_rgb(0.42, 1.0, 0.0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_region_mapping() {
        let region = PaletteRegion { x: 100.0, y: 50.0, size: 300.0 };
        assert!(region.color_at([99.0, 60.0]).is_none());
        assert!(region.color_at([400.0, 60.0]).is_none());
        assert_rgb(region.color_at([100.0, 50.0]).unwrap(), [1.0, 0.0, 0.0]);
        assert_rgb(region.color_at([200.0, 50.0]).unwrap(), [0.0, 1.0, 0.0]);
        // Half way down: value 0.5
        assert_rgb(region.color_at([100.0, 200.0]).unwrap(), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_pick_outside_keeps_picker_active() {
        let region = PaletteRegion { x: 0.0, y: 0.0, size: 10.0 };
        let mut scene = SceneState::default();
        let before = *scene.colors();
        let mut picker = ColorPickerState::default();
        picker.start(ColorTarget::AccentObject);

        assert!(picker.try_pick([20.0, 20.0], &region, &mut scene).is_none());
        assert!(picker.active);
        assert_eq!(*scene.colors(), before);

        let picked = picker.try_pick([0.0, 0.0], &region, &mut scene).unwrap();
        assert!(!picker.active);
        assert_eq!(picked, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(scene.colors().accent_object, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(scene.colors().background, before.background);
    }

    #[test]
    fn test_palette_pixels_match_picks() {
        let size = 12;
        let pixels = palette_pixels(size);
        assert_eq!(pixels.len(), (size * size * 4) as usize);
        // Top-left texel is full red, bottom row is dark
        assert_eq!(&pixels[0..4], &[255, 0, 0, 255]);
        let last_row = ((size - 1) * size * 4) as usize;
        assert!(pixels[last_row] < 30);

        let region = PaletteRegion { x: 0.0, y: 0.0, size: size as f32 };
        let rgb = region.color_at([4.0, 3.0]).unwrap();
        let i = ((3 * size + 4) * 4) as usize;
        assert_eq!(pixels[i], to_u8(rgb[0]));
        assert_eq!(pixels[i + 1], to_u8(rgb[1]));
        assert_eq!(pixels[i + 2], to_u8(rgb[2]));
    }
}
