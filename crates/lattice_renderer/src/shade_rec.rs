//! Everything a material needs to shade one intersection.

use crate::{Hit, Material, World};
use lattice_math::{Ray, Vec3};

/// A resolved intersection plus the context it was found in.
#[derive(Clone, Copy)]
pub struct ShadeRec<'a> {
    /// World-space hit point
    pub hit_point: Vec3,
    /// Hit point for texture lookups (object space under instances)
    pub local_hit_point: Vec3,
    /// Outward unit normal at the hit
    pub normal: Vec3,
    pub material: &'a dyn Material,
    /// The ray that found this hit
    pub ray: Ray,
    /// Recursion depth of `ray`
    pub depth: u32,
    pub t: f32,
    pub world: &'a World,
}

impl<'a> ShadeRec<'a> {
    pub fn new(world: &'a World, ray: &Ray, hit: Hit<'a>) -> Self {
        Self {
            hit_point: ray.at(hit.t),
            local_hit_point: hit.local_hit_point,
            normal: hit.normal,
            material: hit.material,
            ray: *ray,
            depth: 0,
            t: hit.t,
            world,
        }
    }
}
