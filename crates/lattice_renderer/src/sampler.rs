//! Sub-pixel sample generators and hemisphere mapping.

use std::f32::consts::TAU;

use lattice_math::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Source of sample points in the unit square.
pub trait Sampler: Send {
    /// Samples per pixel.
    fn num_samples(&self) -> usize;

    /// Next point in `[0, 1)²`.
    fn sample_unit_square(&mut self) -> Vec2;
}

/// Largest `k` with `k * k <= n`, at least 1.
fn grid_side(n: usize) -> usize {
    let side = ((n as f64).sqrt() as usize).max(1);
    if side * side != n {
        log::warn!(
            "{} samples is not a perfect square, using {}",
            n,
            side * side
        );
    }
    side
}

/// Cell centers of a `k x k` grid.
#[derive(Debug, Clone)]
pub struct Regular {
    side: usize,
    next: usize,
}

impl Regular {
    pub fn new(num_samples: usize) -> Self {
        Self {
            side: grid_side(num_samples),
            next: 0,
        }
    }
}

impl Sampler for Regular {
    fn num_samples(&self) -> usize {
        self.side * self.side
    }

    fn sample_unit_square(&mut self) -> Vec2 {
        let k = self.next % self.num_samples();
        self.next += 1;

        let (row, col) = (k / self.side, k % self.side);
        Vec2::new(
            (col as f32 + 0.5) / self.side as f32,
            (row as f32 + 0.5) / self.side as f32,
        )
    }
}

/// One random point inside each cell of a `k x k` grid.
#[derive(Debug, Clone)]
pub struct Jittered {
    side: usize,
    next: usize,
    rng: StdRng,
}

impl Jittered {
    pub fn new(num_samples: usize, seed: u64) -> Self {
        Self {
            side: grid_side(num_samples),
            next: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for Jittered {
    fn num_samples(&self) -> usize {
        self.side * self.side
    }

    fn sample_unit_square(&mut self) -> Vec2 {
        let k = self.next % self.num_samples();
        self.next += 1;

        let (row, col) = (k / self.side, k % self.side);
        Vec2::new(
            (col as f32 + self.rng.gen::<f32>()) / self.side as f32,
            (row as f32 + self.rng.gen::<f32>()) / self.side as f32,
        )
    }
}

/// Uniform random points with no stratification.
#[derive(Debug, Clone)]
pub struct PureRandom {
    num_samples: usize,
    rng: StdRng,
}

impl PureRandom {
    pub fn new(num_samples: usize, seed: u64) -> Self {
        Self {
            num_samples: num_samples.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for PureRandom {
    fn num_samples(&self) -> usize {
        self.num_samples
    }

    fn sample_unit_square(&mut self) -> Vec2 {
        Vec2::new(self.rng.gen(), self.rng.gen())
    }
}

/// Sampler selection for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    Regular,
    #[default]
    Jittered,
    PureRandom,
}

impl SamplerKind {
    pub fn build(self, num_samples: usize, seed: u64) -> Box<dyn Sampler> {
        match self {
            SamplerKind::Regular => Box::new(Regular::new(num_samples)),
            SamplerKind::Jittered => Box::new(Jittered::new(num_samples, seed)),
            SamplerKind::PureRandom => Box::new(PureRandom::new(num_samples, seed)),
        }
    }
}

/// Map a unit-square point onto the hemisphere around +Z with density
/// proportional to `cos(theta)^e`. `e = 1` gives cosine weighting.
pub fn map_to_hemisphere(p: Vec2, e: f32) -> Vec3 {
    let (sin_phi, cos_phi) = (TAU * p.x).sin_cos();
    let cos_theta = (1.0 - p.y).powf(1.0 / (e + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

/// Random direction on the hemisphere around +Z, distributed as `cos(theta)^e`.
pub fn sample_hemisphere(e: f32, rng: &mut dyn RngCore) -> Vec3 {
    map_to_hemisphere(Vec2::new(rng.gen(), rng.gen()), e)
}
