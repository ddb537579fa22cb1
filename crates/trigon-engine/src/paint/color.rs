/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::from_premul(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::from_premul(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::from_premul(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::from_premul(0.0, 0.0, 1.0, 1.0);

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    ///
    /// Components are clamped to `[0, 1]`.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Creates a premultiplied color from straight 8-bit components.
    #[inline]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Layout used for vertex color storage (`vec4<f32>` in WGSL).
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to the clear value of a render pass.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_alpha_is_premultiplied() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c, Color::from_premul(0.5, 0.25, 0.0, 0.5));
    }

    #[test]
    fn straight_components_are_clamped() {
        let c = Color::from_straight(2.0, -1.0, 0.5, 3.0);
        assert_eq!(c, Color::from_premul(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn u8_extremes_map_to_unit_range() {
        assert_eq!(Color::from_rgba_u8(255, 255, 255, 255), Color::WHITE);
        assert_eq!(Color::from_rgba_u8(0, 0, 0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn wgpu_clear_value_matches_channels() {
        let w = Color::from_premul(0.25, 0.5, 0.75, 1.0).to_wgpu();
        assert_eq!((w.r, w.g, w.b, w.a), (0.25, 0.5, 0.75, 1.0));
    }
}
