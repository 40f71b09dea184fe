//! Textures: spatially varying colors looked up at hit points.

use crate::{Color, LatticeNoise, ShadeRec};

/// A color that may vary over a surface.
pub trait Texture: Send + Sync {
    /// Color at `sr.local_hit_point`.
    fn color(&self, sr: &ShadeRec) -> Color;
}

/// The same color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantColor(pub Color);

impl Texture for ConstantColor {
    fn color(&self, _sr: &ShadeRec) -> Color {
        self.0
    }
}

/// A color scaled by fractal noise mapped into `[min, max]`.
#[derive(Debug, Clone)]
pub struct FBmTexture {
    noise: LatticeNoise,
    color: Color,
    min: f32,
    max: f32,
}

impl FBmTexture {
    pub fn new(noise: LatticeNoise, color: Color, min: f32, max: f32) -> Self {
        Self {
            noise,
            color,
            min,
            max,
        }
    }
}

impl Texture for FBmTexture {
    fn color(&self, sr: &ShadeRec) -> Color {
        let value = self.noise.value_fbm(sr.local_hit_point);
        (self.min + (self.max - self.min) * value) * self.color
    }
}

/// Fractal noise expanded and wrapped back into `[0, 1)`, picking one of
/// two colors by which wrap the point fell into.
#[derive(Debug, Clone)]
pub struct WrappedTwoColors {
    noise: LatticeNoise,
    color1: Color,
    color2: Color,
    min: f32,
    max: f32,
    expansion: f32,
}

impl WrappedTwoColors {
    pub fn new(noise: LatticeNoise, color1: Color, color2: Color) -> Self {
        Self {
            noise,
            color1,
            color2,
            min: 0.0,
            max: 1.0,
            expansion: 2.0,
        }
    }

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_expansion(mut self, expansion: f32) -> Self {
        self.expansion = expansion;
        self
    }

    fn wrapped(&self, value: f32) -> Color {
        let n = self.expansion * value;
        let scaled = self.min + (self.max - self.min) * (n - n.floor());

        if n < 1.0 {
            scaled * self.color1
        } else {
            scaled * self.color2
        }
    }
}

impl Texture for WrappedTwoColors {
    fn color(&self, sr: &ShadeRec) -> Color {
        self.wrapped(self.noise.value_fbm(sr.local_hit_point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Matte, Sphere, World};
    use lattice_math::{Ray, Vec3};
    use std::sync::Arc;

    fn with_shade_rec(test: impl FnOnce(&ShadeRec)) {
        let mut world = World::new();
        let material: Arc<dyn Material> = Arc::new(Matte::new(0.25, 0.75, Vec3::ONE));
        world.add_object(Sphere::new(Vec3::ZERO, 1.0, material));

        let ray = Ray::new(Vec3::new(0.3, 0.2, 5.0), Vec3::NEG_Z);
        let sr = world.hit_objects(&ray).unwrap();
        test(&sr);
    }

    #[test]
    fn test_constant_color() {
        with_shade_rec(|sr| {
            let texture = ConstantColor(Color::new(0.1, 0.2, 0.3));
            assert_eq!(texture.color(sr), Color::new(0.1, 0.2, 0.3));
        });
    }

    #[test]
    fn test_fbm_texture_within_range() {
        with_shade_rec(|sr| {
            let texture = FBmTexture::new(LatticeNoise::new(3), Color::ONE, 0.2, 0.8);
            let c = texture.color(sr);
            assert!(c.x >= 0.2 - 1e-6 && c.x <= 0.8 + 1e-6);
            assert_eq!(c.x, c.y);
        });
    }

    #[test]
    fn test_wrapped_two_colors_switches_on_wrap() {
        let texture = WrappedTwoColors::new(LatticeNoise::new(1), Color::X, Color::Y);

        // 2 * 0.25 = 0.5: first wrap, color1 scaled by 0.5
        assert!((texture.wrapped(0.25) - 0.5 * Color::X).length() < 1e-6);
        // 2 * 0.75 = 1.5: second wrap, color2 scaled by 0.5
        assert!((texture.wrapped(0.75) - 0.5 * Color::Y).length() < 1e-6);
    }
}
