use glam::{Mat4, Vec2, Vec4, vec2, vec4};
use wgpu::{Color, TextureFormat};

/// Orthographic 2D camera. `half_extents` is the visible half-width/height in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    pub half_extents: Vec2,
    /// The color that should end up stored in the surface, gamma encoded.
    pub clear_color: Vec4,
}

impl Camera {
    pub fn view_projection(&self) -> Mat4 {
        let projection = Mat4::orthographic_rh(
            -self.half_extents.x,
            self.half_extents.x,
            -self.half_extents.y,
            self.half_extents.y,
            -1.0,
            1.0,
        );

        projection * Mat4::from_translation(-self.center.extend(0.0))
    }

    /// Clear values for a surface of `format`. Srgb surfaces encode what they
    /// are given, so the color is decoded to linear first.
    pub fn clear_color_for(&self, format: TextureFormat) -> Color {
        let c = self.clear_color;

        let [r, g, b] = if format.is_srgb() {
            [srgb_to_linear(c.x), srgb_to_linear(c.y), srgb_to_linear(c.z)]
        } else {
            [c.x, c.y, c.z]
        };

        Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: c.w as f64,
        }
    }
}

fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_extents: vec2(5.0, 3.75),
            clear_color: vec4(0.1922, 0.9, 0.4, 1.0),
        }
    }
}
