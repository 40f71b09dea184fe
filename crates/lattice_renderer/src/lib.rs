//! Lattice renderer - grid-accelerated CPU ray tracing
//!
//! Objects are intersected through a closed `Object` enum, grouped into
//! compounds or uniform grids and placed with transformed instances. A
//! `World` holds the objects and lights and hands each ray to its `Tracer`,
//! which shades hits through the hit material.

mod brdf;
mod bucket;
mod camera;
mod compound;
mod config;
mod cuboid;
mod grid;
mod hittable;
mod instance;
mod light;
mod material;
mod noise;
mod object;
mod plane;
mod renderer;
mod sampler;
mod shade_rec;
mod sphere;
mod texture;
mod tracer;
mod triangle;
mod world;

pub use brdf::{reflect, BrdfSample, GlossySpecular, Lambertian, PerfectSpecular};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, Projection};
pub use compound::Compound;
pub use config::{RenderConfig, ViewPlane};
pub use cuboid::Cuboid;
pub use grid::{Grid, MeshShading, DEFAULT_MULTIPLIER};
pub use hittable::{closest_hit, closest_shadow_hit, Hit, Hittable, EPSILON};
pub use instance::Instance;
pub use light::{shadow_ray, Ambient, Directional, Light, PointLight};
pub use material::{Color, Emissive, Material, Matte, Phong, Reflective};
pub use noise::LatticeNoise;
pub use object::Object;
pub use plane::{Disk, Plane};
pub use renderer::{color_to_rgba, display_color, render, render_pixel, ImageBuffer};
pub use sampler::{
    map_to_hemisphere, sample_hemisphere, Jittered, PureRandom, Regular, Sampler, SamplerKind,
};
pub use shade_rec::ShadeRec;
pub use sphere::Sphere;
pub use texture::{ConstantColor, FBmTexture, Texture, WrappedTwoColors};
pub use tracer::Tracer;
pub use triangle::{SmoothTriangle, Triangle};
pub use world::World;

/// Re-export math types from lattice_math
pub use lattice_math::{BBox, Mat4, Ray, Vec2, Vec3};
