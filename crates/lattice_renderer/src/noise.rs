//! Lattice value noise with fractal sums.

use lattice_math::Vec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const TABLE_SIZE: usize = 256;
const TABLE_MASK: i32 = TABLE_SIZE as i32 - 1;

/// Trilinearly interpolated value noise over an integer lattice.
///
/// Lattice values come from a seeded table, so two noises built from the
/// same seed agree everywhere.
#[derive(Debug, Clone)]
pub struct LatticeNoise {
    octaves: u32,
    lacunarity: f32,
    gain: f32,
    perm: [u8; TABLE_SIZE],
    values: [f32; TABLE_SIZE],
    fbm_min: f32,
    fbm_max: f32,
}

impl LatticeNoise {
    /// Single octave noise.
    pub fn new(seed: u64) -> Self {
        Self::with_octaves(seed, 1, 2.0, 0.5)
    }

    /// Noise whose fractal sum adds `octaves` layers, each `lacunarity`
    /// times the frequency and `gain` times the amplitude of the last.
    pub fn with_octaves(seed: u64, octaves: u32, lacunarity: f32, gain: f32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut perm: [u8; TABLE_SIZE] = std::array::from_fn(|i| i as u8);
        perm.shuffle(&mut rng);
        let values: [f32; TABLE_SIZE] = std::array::from_fn(|_| rng.gen_range(-1.0..=1.0));

        let octaves = octaves.max(1);
        let fbm_max = if gain == 1.0 {
            octaves as f32
        } else {
            (1.0 - gain.powi(octaves as i32)) / (1.0 - gain)
        };

        Self {
            octaves,
            lacunarity,
            gain,
            perm,
            values,
            fbm_min: -fbm_max,
            fbm_max,
        }
    }

    #[inline]
    fn perm(&self, x: i32) -> i32 {
        self.perm[(x & TABLE_MASK) as usize] as i32
    }

    #[inline]
    fn lattice_value(&self, ix: i32, iy: i32, iz: i32) -> f32 {
        self.values[self.perm(ix + self.perm(iy + self.perm(iz))) as usize]
    }

    /// Noise value in `[-1, 1]`.
    pub fn value_noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let f = p - floor;
        let (ix, iy, iz) = (floor.x as i32, floor.y as i32, floor.z as i32);

        let d = |i: i32, j: i32, k: i32| self.lattice_value(ix + i, iy + j, iz + k);

        let x0 = lerp(f.x, d(0, 0, 0), d(1, 0, 0));
        let x1 = lerp(f.x, d(0, 1, 0), d(1, 1, 0));
        let x2 = lerp(f.x, d(0, 0, 1), d(1, 0, 1));
        let x3 = lerp(f.x, d(0, 1, 1), d(1, 1, 1));
        let y0 = lerp(f.y, x0, x1);
        let y1 = lerp(f.y, x2, x3);
        lerp(f.z, y0, y1)
    }

    /// Fractal sum of noise octaves, rescaled to `[0, 1]`.
    pub fn value_fbm(&self, p: Vec3) -> f32 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut fbm = 0.0;

        for _ in 0..self.octaves {
            fbm += amplitude * self.value_noise(frequency * p);
            amplitude *= self.gain;
            frequency *= self.lacunarity;
        }

        (fbm - self.fbm_min) / (self.fbm_max - self.fbm_min)
    }
}

#[inline]
fn lerp(f: f32, a: f32, b: f32) -> f32 {
    a + f * (b - a)
}
