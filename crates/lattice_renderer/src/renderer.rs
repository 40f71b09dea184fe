//! Pixel integration, color display mapping and whole-image rendering.

use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

use crate::{
    bucket::{generate_buckets, render_bucket, BucketResult},
    Camera, Color, RenderConfig, Sampler, ViewPlane, World,
};
use lattice_math::Vec2;

/// Average radiance over one pixel.
///
/// `row` counts up from the bottom of the image and `col` from the left.
/// The result is scaled by the camera's exposure time.
pub fn render_pixel(
    world: &World,
    camera: &Camera,
    sampler: &mut dyn Sampler,
    rng: &mut dyn RngCore,
    row: u32,
    col: u32,
) -> Color {
    let vp = &world.view_plane;
    let num_samples = sampler.num_samples();
    let mut pixel_color = Color::ZERO;

    for _ in 0..num_samples {
        let sp = sampler.sample_unit_square();
        let pp = vp.pixel_size
            * Vec2::new(
                col as f32 - 0.5 * vp.hres as f32 + sp.x,
                row as f32 - 0.5 * vp.vres as f32 + sp.y,
            );
        pixel_color += world.trace_ray(&camera.ray_for(pp), 0, rng);
    }

    pixel_color / num_samples as f32 * camera.exposure_time()
}

/// Map a radiance value into displayable `[0, 1]` range.
///
/// Out-of-gamut colors are either flagged in red or rescaled by their
/// largest component, then gamma is applied.
pub fn display_color(color: Color, vp: &ViewPlane) -> Color {
    let mapped = if vp.show_out_of_gamut {
        clamp_to_color(color, Color::X)
    } else {
        max_to_one(color)
    };

    if vp.gamma != 1.0 {
        mapped.max(Color::ZERO).powf(vp.inv_gamma())
    } else {
        mapped
    }
}

/// Scale the color down so its largest component is 1.
fn max_to_one(color: Color) -> Color {
    let max = color.max_element();
    if max > 1.0 {
        color / max
    } else {
        color
    }
}

/// Replace the color with `flag` if any component exceeds 1.
fn clamp_to_color(color: Color, flag: Color) -> Color {
    if color.max_element() > 1.0 {
        flag
    } else {
        color
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color, vp: &ViewPlane) -> [u8; 4] {
    let c = display_color(color, vp).clamp(Color::ZERO, Color::ONE) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

/// Simple image buffer for storing render output. Row 0 is the top of the
/// image.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let i = i as u32;
            self.set(bucket.x + i % bucket.width, bucket.y + i / bucket.width, *color);
        }
    }

    /// Display-mapped RGBA pixels.
    pub fn to_rgba8(&self, vp: &ViewPlane) -> Vec<[u8; 4]> {
        self.pixels.iter().map(|&c| color_to_rgba(c, vp)).collect()
    }

    /// Write the display-mapped image as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>, vp: &ViewPlane) -> image::ImageResult<()> {
        let rgba = self.to_rgba8(vp);
        image::save_buffer_with_format(
            path,
            bytemuck::cast_slice(&rgba),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
    }
}

/// Render the whole view plane, buckets in parallel.
///
/// Every bucket gets its own generator seeded from `config.seed` and its
/// spiral index. It seeds the bucket's sampler and drives shading, so the
/// result does not depend on thread scheduling.
pub fn render(world: &World, camera: &Camera, config: &RenderConfig) -> ImageBuffer {
    let vp = &world.view_plane;
    let buckets = generate_buckets(vp.hres, vp.vres, config.bucket_size.max(1));

    log::info!(
        "Rendering {}x{} with {:?} tracer: {} buckets, {} samples per pixel",
        vp.hres,
        vp.vres,
        world.tracer,
        buckets.len(),
        vp.num_samples
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(bucket.index as u64));
            let mut sampler = vp.sampler.build(vp.num_samples, rng.gen());
            let pixels = render_bucket(bucket, world, camera, sampler.as_mut(), &mut rng);
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(vp.hres, vp.vres);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
