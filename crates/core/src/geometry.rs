//! Fullscreen quad shared by both passes.
//!
//! Six vertices, two counter-clockwise triangles covering [-1, 1]². The
//! offscreen vertex shader shrinks it by [`OFFSCREEN_QUAD_SCALE`], so pass A
//! only covers the centre of attachment 1.

use glam::{UVec2, Vec2};

/// Number of vertices issued per draw.
pub const QUAD_VERTEX_COUNT: i32 = 6;

/// Components per vertex (vec2 position at attribute 0).
pub const QUAD_COMPONENTS: i32 = 2;

/// Scale applied to the quad by the offscreen vertex shader.
pub const OFFSCREEN_QUAD_SCALE: f32 = 0.5;

/// Clip-space positions of the two triangles.
pub const FULLSCREEN_QUAD: [Vec2; 6] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
];

/// Returns true if the offscreen pass rasterizes the pixel at `pixel` in a
/// target of `size` pixels, i.e. the pixel centre falls inside the scaled quad.
pub fn offscreen_quad_covers(pixel: UVec2, size: UVec2) -> bool {
    if pixel.x >= size.x || pixel.y >= size.y {
        return false;
    }
    let centre = (pixel.as_vec2() + Vec2::splat(0.5)) / size.as_vec2();
    let ndc = centre * 2.0 - Vec2::ONE;
    ndc.abs().cmplt(Vec2::splat(OFFSCREEN_QUAD_SCALE)).all()
}
