//! Render configuration.
//!
//! Everything here is plain data with serde support so a render can be
//! described in a JSON file. Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::{Color, SamplerKind, Tracer, DEFAULT_BUCKET_SIZE};

/// Image plane: resolution, pixel size, display settings and sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPlane {
    /// Horizontal resolution in pixels
    pub hres: u32,
    /// Vertical resolution in pixels
    pub vres: u32,
    /// Size of one pixel on the view plane
    pub pixel_size: f32,
    /// Display gamma; 1.0 leaves colors linear
    pub gamma: f32,
    /// Show colors outside [0, 1] as red instead of rescaling them
    pub show_out_of_gamut: bool,
    /// Samples per pixel
    pub num_samples: usize,
    /// Deepest recursion level still traced
    pub max_depth: u32,
    /// How sub-pixel sample points are distributed
    pub sampler: SamplerKind,
}

impl ViewPlane {
    pub fn inv_gamma(&self) -> f32 {
        1.0 / self.gamma
    }
}

impl Default for ViewPlane {
    fn default() -> Self {
        Self {
            hres: 400,
            vres: 400,
            pixel_size: 1.0,
            gamma: 1.0,
            show_out_of_gamut: false,
            num_samples: 1,
            max_depth: 5,
            sampler: SamplerKind::default(),
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub view_plane: ViewPlane,
    pub tracer: Tracer,
    /// Color returned for rays that hit nothing
    pub background: Color,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Base seed for the per-bucket samplers
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            view_plane: ViewPlane::default(),
            tracer: Tracer::default(),
            background: Color::ZERO,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: 0,
        }
    }
}
