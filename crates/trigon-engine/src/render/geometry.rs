//! Static triangle geometry.
//!
//! Both arrays are uploaded as-is into storage buffers, so every element is a
//! 16-byte `vec4<f32>`.

use crate::paint::Color;

pub const TRIANGLE_VERTEX_COUNT: u32 = 3;

/// Clip-space positions: top-left, bottom-center, top-right.
pub const TRIANGLE_POSITIONS: [[f32; 4]; 3] = [
    [-0.8, 0.8, 0.0, 1.0],
    [0.0, -0.8, 0.0, 1.0],
    [0.8, 0.8, 0.0, 1.0],
];

pub const TRIANGLE_COLORS: [[f32; 4]; 3] = [
    Color::RED.to_array(),
    Color::GREEN.to_array(),
    Color::BLUE.to_array(),
];

/// Signed area in clip space (counter-clockwise positive).
pub fn signed_area(positions: &[[f32; 4]; 3]) -> f32 {
    let [a, b, c] = positions;
    0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_position_and_one_color_per_vertex() {
        assert_eq!(TRIANGLE_POSITIONS.len(), TRIANGLE_VERTEX_COUNT as usize);
        assert_eq!(TRIANGLE_COLORS.len(), TRIANGLE_VERTEX_COUNT as usize);
    }

    #[test]
    fn elements_match_vec4_stride() {
        assert_eq!(std::mem::size_of_val(&TRIANGLE_POSITIONS), 3 * 16);
        assert_eq!(std::mem::size_of_val(&TRIANGLE_COLORS), 3 * 16);
    }

    #[test]
    fn positions_lie_inside_clip_volume() {
        for p in TRIANGLE_POSITIONS {
            assert!(p[0].abs() <= 1.0 && p[1].abs() <= 1.0);
            assert!((0.0..=1.0).contains(&p[2]));
            assert_eq!(p[3], 1.0);
        }
    }

    #[test]
    fn triangle_is_not_degenerate() {
        assert!(signed_area(&TRIANGLE_POSITIONS).abs() > 0.5);
    }

    #[test]
    fn colors_are_opaque() {
        assert!(TRIANGLE_COLORS.iter().all(|c| c[3] == 1.0));
    }
}
