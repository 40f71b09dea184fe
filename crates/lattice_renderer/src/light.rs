//! Light sources.

use crate::{hittable::EPSILON, Color, ShadeRec};
use lattice_math::{Ray, Vec3};

/// A light source queried once per shaded hit.
pub trait Light: Send + Sync {
    /// Unit vector from the hit point towards the light.
    fn direction(&self, sr: &ShadeRec) -> Vec3;

    /// Incident radiance at the hit point.
    fn radiance(&self, sr: &ShadeRec) -> Color;

    fn casts_shadows(&self) -> bool;

    /// Whether something blocks `ray` before it reaches the light.
    fn in_shadow(&self, ray: &Ray, sr: &ShadeRec) -> bool;
}

/// Ray from just above the hit point towards a light.
pub fn shadow_ray(sr: &ShadeRec, direction: Vec3) -> Ray {
    Ray::new(sr.hit_point + EPSILON * sr.normal, direction)
}

/// Constant light arriving from every direction. Never shadowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ambient {
    pub ls: f32,
    pub color: Color,
}

impl Ambient {
    pub fn new(ls: f32, color: Color) -> Self {
        Self { ls, color }
    }
}

impl Default for Ambient {
    fn default() -> Self {
        Self::new(1.0, Color::ONE)
    }
}

impl Light for Ambient {
    fn direction(&self, _sr: &ShadeRec) -> Vec3 {
        Vec3::ZERO
    }

    fn radiance(&self, _sr: &ShadeRec) -> Color {
        self.ls * self.color
    }

    fn casts_shadows(&self) -> bool {
        false
    }

    fn in_shadow(&self, _ray: &Ray, _sr: &ShadeRec) -> bool {
        false
    }
}

/// Point light without falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub location: Vec3,
    pub ls: f32,
    pub color: Color,
    pub shadows: bool,
}

impl PointLight {
    pub fn new(location: Vec3, ls: f32, color: Color) -> Self {
        Self {
            location,
            ls,
            color,
            shadows: true,
        }
    }
}

impl Light for PointLight {
    fn direction(&self, sr: &ShadeRec) -> Vec3 {
        (self.location - sr.hit_point).normalize_or_zero()
    }

    fn radiance(&self, _sr: &ShadeRec) -> Color {
        self.ls * self.color
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }

    /// Only occluders closer than the light count.
    fn in_shadow(&self, ray: &Ray, sr: &ShadeRec) -> bool {
        let distance = self.location.distance(ray.origin);
        sr.world.shadow_hit(ray, distance)
    }
}

/// Light arriving from a fixed direction, as from a distant source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Directional {
    /// Direction towards the light
    direction: Vec3,
    pub ls: f32,
    pub color: Color,
    pub shadows: bool,
}

impl Directional {
    pub fn new(direction: Vec3, ls: f32, color: Color) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            ls,
            color,
            shadows: true,
        }
    }
}

impl Light for Directional {
    fn direction(&self, _sr: &ShadeRec) -> Vec3 {
        self.direction
    }

    fn radiance(&self, _sr: &ShadeRec) -> Color {
        self.ls * self.color
    }

    fn casts_shadows(&self) -> bool {
        self.shadows
    }

    fn in_shadow(&self, ray: &Ray, sr: &ShadeRec) -> bool {
        sr.world.shadow_hit(ray, f32::INFINITY)
    }
}
