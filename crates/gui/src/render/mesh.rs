use glam::Vec3;

/// One vertex of the accent object: position, normal, texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Non-indexed triangle list
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// A colored segment of the reference axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSegment {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub color: [f32; 4],
}

// ── Accent object ────────────────────────────────────────────

/// Cone standing on the XZ plane, apex up, centered on the origin.
///
/// The side is mapped cylindrically (u around, v up) and the base cap planar, so the
/// checkerboard wraps the whole solid.
pub fn cone(radius: f32, height: f32, segments: u32) -> MeshData {
    let hh = height * 0.5;
    let slope = radius / height;
    let mut vertices = Vec::with_capacity(segments as usize * 6);

    for i in 0..segments {
        let t0 = i as f32 / segments as f32;
        let t1 = (i + 1) as f32 / segments as f32;
        let a0 = t0 * std::f32::consts::TAU;
        let a1 = t1 * std::f32::consts::TAU;

        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();

        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();
        let n_top = (n0 + n1).normalize();

        // Side, wound counter-clockwise seen from outside
        push(&mut vertices, [0.0, hh, 0.0], n_top, [(t0 + t1) * 0.5, 1.0]);
        push(&mut vertices, [radius * c1, -hh, radius * s1], n1, [t1, 0.0]);
        push(&mut vertices, [radius * c0, -hh, radius * s0], n0, [t0, 0.0]);

        // Base cap
        push(&mut vertices, [0.0, -hh, 0.0], Vec3::NEG_Y, [0.5, 0.5]);
        push(&mut vertices, [radius * c0, -hh, radius * s0], Vec3::NEG_Y, cap_uv(c0, s0));
        push(&mut vertices, [radius * c1, -hh, radius * s1], Vec3::NEG_Y, cap_uv(c1, s1));
    }

    MeshData { vertices }
}

fn cap_uv(c: f32, s: f32) -> [f32; 2] {
    [0.5 + 0.5 * c, 0.5 + 0.5 * s]
}

fn push(v: &mut Vec<MeshVertex>, position: [f32; 3], n: Vec3, uv: [f32; 2]) {
    v.push(MeshVertex {
        position,
        normal: n.to_array(),
        uv,
    });
}

// ── Axes ─────────────────────────────────────────────────────

/// Three segments through the origin, X red, Y green, Z blue
pub fn axes(length: f32) -> [AxisSegment; 3] {
    let r = [0.9_f32, 0.2, 0.2, 1.0];
    let g = [0.2_f32, 0.8, 0.2, 1.0];
    let b = [0.2_f32, 0.3, 0.9, 1.0];
    [
        AxisSegment { from: [-length, 0.0, 0.0], to: [length, 0.0, 0.0], color: r },
        AxisSegment { from: [0.0, -length, 0.0], to: [0.0, length, 0.0], color: g },
        AxisSegment { from: [0.0, 0.0, -length], to: [0.0, 0.0, length], color: b },
    ]
}

/// Tick points on all three axes every `spacing` units, origin excluded
pub fn axis_ticks(length: f32, spacing: f32) -> Vec<[f32; 3]> {
    let steps = (length / spacing).floor() as i32;
    let mut ticks = Vec::with_capacity(steps as usize * 6);
    for i in (-steps..=steps).filter(|&i| i != 0) {
        let d = i as f32 * spacing;
        ticks.push([d, 0.0, 0.0]);
        ticks.push([0.0, d, 0.0]);
        ticks.push([0.0, 0.0, d]);
    }
    ticks
}

// ── Textures ─────────────────────────────────────────────────

/// RGBA8 checkerboard of `size`² texels with square cells of `cell` texels
pub fn checkerboard(size: u32, cell: u32) -> Vec<u8> {
    let light = [255u8, 255, 255, 255];
    let dark = [96u8, 96, 96, 255];
    let cell = cell.max(1);
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let texel = if (x / cell + y / cell) % 2 == 0 { light } else { dark };
            pixels.extend_from_slice(&texel);
        }
    }
    pixels
}
