//! Materials: how a hit point turns incoming light into a color.

use std::sync::Arc;

use lattice_math::{Ray, Vec3};
use rand::RngCore;

use crate::{
    brdf::{GlossySpecular, Lambertian, PerfectSpecular},
    light::shadow_ray,
    Light, ShadeRec, Texture,
};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Trait for surface materials.
pub trait Material: Send + Sync {
    /// Color for the ray-cast and Whitted tracers.
    fn shade(&self, sr: &ShadeRec, rng: &mut dyn RngCore) -> Color;

    /// Color for the path tracer. Defaults to `shade`.
    fn path_shade(&self, sr: &ShadeRec, rng: &mut dyn RngCore) -> Color {
        self.shade(sr, rng)
    }
}

/// Sum of `brdf(wo, wi) * L * cos` over every light that reaches the hit
/// point unshadowed.
fn direct_lighting(sr: &ShadeRec, brdf: impl Fn(Vec3, Vec3) -> Color) -> Color {
    let wo = -sr.ray.direction;
    let mut l = Color::ZERO;

    for light in sr.world.lights() {
        let wi = light.direction(sr);
        let ndotwi = sr.normal.dot(wi);
        if ndotwi <= 0.0 {
            continue;
        }

        let shadowed = light.casts_shadows() && light.in_shadow(&shadow_ray(sr, wi), sr);
        if !shadowed {
            l += brdf(wo, wi) * light.radiance(sr) * ndotwi;
        }
    }

    l
}

/// Diffuse surface lit by the ambient light and every world light.
#[derive(Clone)]
pub struct Matte {
    ambient: Lambertian,
    diffuse: Lambertian,
}

impl Matte {
    pub fn new(ka: f32, kd: f32, cd: Color) -> Self {
        Self {
            ambient: Lambertian::new(ka, cd),
            diffuse: Lambertian::new(kd, cd),
        }
    }

    /// Matte surface whose color comes from a texture.
    pub fn textured(ka: f32, kd: f32, cd: Arc<dyn Texture>) -> Self {
        Self {
            ambient: Lambertian::textured(ka, cd.clone()),
            diffuse: Lambertian::textured(kd, cd),
        }
    }

    fn ambient(&self, sr: &ShadeRec) -> Color {
        self.ambient.rho(sr, -sr.ray.direction) * sr.world.ambient.radiance(sr)
    }
}

impl Material for Matte {
    fn shade(&self, sr: &ShadeRec, _rng: &mut dyn RngCore) -> Color {
        self.ambient(sr) + direct_lighting(sr, |wo, wi| self.diffuse.f(sr, wo, wi))
    }

    fn path_shade(&self, sr: &ShadeRec, rng: &mut dyn RngCore) -> Color {
        let wo = -sr.ray.direction;
        let sample = self.diffuse.sample_f(sr, wo, rng);
        if sample.pdf <= 0.0 {
            return Color::ZERO;
        }

        let ndotwi = sr.normal.dot(sample.wi);
        let reflected = Ray::new(sr.hit_point, sample.wi);

        sample.f * sr.world.trace_ray(&reflected, sr.depth + 1, rng) * ndotwi / sample.pdf
    }
}

/// Diffuse plus a Phong highlight.
#[derive(Clone)]
pub struct Phong {
    ambient: Lambertian,
    diffuse: Lambertian,
    specular: GlossySpecular,
}

impl Phong {
    /// `exp` sets the highlight's tightness; `ks` its strength. The
    /// highlight is white.
    pub fn new(ka: f32, kd: f32, ks: f32, exp: f32, cd: Color) -> Self {
        Self {
            ambient: Lambertian::new(ka, cd),
            diffuse: Lambertian::new(kd, cd),
            specular: GlossySpecular::new(ks, exp, Color::ONE),
        }
    }
}

impl Material for Phong {
    fn shade(&self, sr: &ShadeRec, _rng: &mut dyn RngCore) -> Color {
        let ambient = self.ambient.rho(sr, -sr.ray.direction) * sr.world.ambient.radiance(sr);

        ambient
            + direct_lighting(sr, |wo, wi| {
                self.diffuse.f(sr, wo, wi) + self.specular.f(sr, wo, wi)
            })
    }
}

/// Phong surface that also mirrors its surroundings.
#[derive(Clone)]
pub struct Reflective {
    phong: Phong,
    reflective: PerfectSpecular,
}

impl Reflective {
    pub fn new(phong: Phong, kr: f32, cr: Color) -> Self {
        Self {
            phong,
            reflective: PerfectSpecular::new(kr, cr),
        }
    }

    /// Light arriving along the mirror direction, traced one level deeper.
    fn mirrored(&self, sr: &ShadeRec, rng: &mut dyn RngCore) -> (Color, f32, Color) {
        let sample = self.reflective.sample_f(sr, -sr.ray.direction);
        let reflected = Ray::new(sr.hit_point, sample.wi);
        let incoming = sr.world.trace_ray(&reflected, sr.depth + 1, rng);

        (sample.f, sample.pdf, incoming)
    }
}

impl Material for Reflective {
    fn shade(&self, sr: &ShadeRec, rng: &mut dyn RngCore) -> Color {
        let (f, ndotwi, incoming) = self.mirrored(sr, rng);
        self.phong.shade(sr, rng) + f * incoming * ndotwi
    }

    /// Direct lighting is left to the paths that reach emitters.
    fn path_shade(&self, sr: &ShadeRec, rng: &mut dyn RngCore) -> Color {
        let (f, ndotwi, incoming) = self.mirrored(sr, rng);
        f * incoming * ndotwi
    }
}

/// A surface that emits light from its front side.
#[derive(Debug, Clone, Copy)]
pub struct Emissive {
    ls: f32,
    ce: Color,
}

impl Emissive {
    pub fn new(ls: f32, ce: Color) -> Self {
        Self { ls, ce }
    }

    pub fn radiance(&self) -> Color {
        self.ls * self.ce
    }
}

impl Material for Emissive {
    fn shade(&self, sr: &ShadeRec, _rng: &mut dyn RngCore) -> Color {
        if -sr.normal.dot(sr.ray.direction) > 0.0 {
            self.radiance()
        } else {
            Color::ZERO
        }
    }
}
