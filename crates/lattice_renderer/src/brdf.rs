//! Bidirectional reflectance distribution functions.
//!
//! `wo` always points from the hit point back along the incoming ray and
//! `wi` towards the light or the next bounce.

use std::f32::consts::FRAC_1_PI;
use std::sync::Arc;

use crate::{sampler::sample_hemisphere, Color, ConstantColor, ShadeRec, Texture};
use lattice_math::Vec3;
use rand::RngCore;

/// A sampled incoming direction with its BRDF value and density.
#[derive(Debug, Clone, Copy)]
pub struct BrdfSample {
    pub f: Color,
    pub wi: Vec3,
    pub pdf: f32,
}

/// Orthonormal frame around `w`, jittered off-axis so `w = ±Y` works.
fn frame(w: Vec3) -> (Vec3, Vec3) {
    let v = Vec3::new(0.0034, 1.0, 0.0071).cross(w).normalize();
    let u = v.cross(w);
    (u, v)
}

/// Mirror `wo` about `n`.
#[inline]
pub fn reflect(wo: Vec3, n: Vec3) -> Vec3 {
    -wo + 2.0 * n * n.dot(wo)
}

/// Perfectly diffuse reflection.
#[derive(Clone)]
pub struct Lambertian {
    kd: f32,
    cd: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(kd: f32, cd: Color) -> Self {
        Self::textured(kd, Arc::new(ConstantColor(cd)))
    }

    pub fn textured(kd: f32, cd: Arc<dyn Texture>) -> Self {
        Self { kd, cd }
    }

    pub fn f(&self, sr: &ShadeRec, _wo: Vec3, _wi: Vec3) -> Color {
        self.kd * self.cd.color(sr) * FRAC_1_PI
    }

    /// Bihemispherical reflectance.
    pub fn rho(&self, sr: &ShadeRec, _wo: Vec3) -> Color {
        self.kd * self.cd.color(sr)
    }

    /// Cosine-weighted direction around the normal.
    pub fn sample_f(&self, sr: &ShadeRec, _wo: Vec3, rng: &mut dyn RngCore) -> BrdfSample {
        let w = sr.normal;
        let (u, v) = frame(w);
        let sp = sample_hemisphere(1.0, rng);
        let wi = (sp.x * u + sp.y * v + sp.z * w).normalize();

        BrdfSample {
            f: self.kd * self.cd.color(sr) * FRAC_1_PI,
            wi,
            pdf: sr.normal.dot(wi) * FRAC_1_PI,
        }
    }
}

/// Phong specular lobe.
#[derive(Debug, Clone, Copy)]
pub struct GlossySpecular {
    ks: f32,
    exp: f32,
    cs: Color,
}

impl GlossySpecular {
    pub fn new(ks: f32, exp: f32, cs: Color) -> Self {
        Self { ks, exp, cs }
    }

    pub fn f(&self, sr: &ShadeRec, wo: Vec3, wi: Vec3) -> Color {
        let r = reflect(wi, sr.normal);
        let rdotwo = r.dot(wo);

        if rdotwo > 0.0 {
            self.ks * self.cs * rdotwo.powf(self.exp)
        } else {
            Color::ZERO
        }
    }

    /// Direction drawn from the lobe around the mirror direction.
    pub fn sample_f(&self, sr: &ShadeRec, wo: Vec3, rng: &mut dyn RngCore) -> BrdfSample {
        let w = reflect(wo, sr.normal);
        let (u, v) = frame(w);
        let sp = sample_hemisphere(self.exp, rng);

        let mut wi = sp.x * u + sp.y * v + sp.z * w;
        if sr.normal.dot(wi) < 0.0 {
            // Below the surface: mirror the sample back into the lobe
            wi = -sp.x * u - sp.y * v + sp.z * w;
        }

        let phong_lobe = w.dot(wi).max(0.0).powf(self.exp);
        BrdfSample {
            f: self.ks * self.cs * phong_lobe,
            wi,
            pdf: phong_lobe * sr.normal.dot(wi),
        }
    }
}

/// Perfect mirror reflection.
#[derive(Debug, Clone, Copy)]
pub struct PerfectSpecular {
    kr: f32,
    cr: Color,
}

impl PerfectSpecular {
    pub fn new(kr: f32, cr: Color) -> Self {
        Self { kr, cr }
    }

    /// The mirror direction. `f` is divided by `|n · wi|` so the caller's
    /// cosine factor cancels. At grazing incidence `f` is zero.
    pub fn sample_f(&self, sr: &ShadeRec, wo: Vec3) -> BrdfSample {
        let wi = reflect(wo, sr.normal);
        let ndotwi = sr.normal.dot(wi).abs();

        let f = if ndotwi > 0.0 {
            self.kr * self.cr / ndotwi
        } else {
            Color::ZERO
        };

        BrdfSample { f, wi, pdf: ndotwi }
    }
}
