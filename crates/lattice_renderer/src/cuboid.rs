//! Axis-aligned box primitive.

use std::sync::Arc;

use crate::{
    hittable::{Hit, Hittable, EPSILON},
    Material,
};
use lattice_math::{slab, BBox, Ray, Vec3};

/// A solid axis-aligned box between two corners.
#[derive(Clone)]
pub struct Cuboid {
    bounds: BBox,
    pub(crate) material: Arc<dyn Material>,
    pub(crate) shadows: bool,
}

impl Cuboid {
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            bounds: BBox::from_points(p0, p1),
            material,
            shadows: true,
        }
    }

    /// Nearest hit distance and the outward normal of the face it lies on.
    fn intersect(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        let b = &self.bounds;
        let o = ray.origin;
        let d = ray.direction;

        let axes = [
            (slab(b.x0, b.x1, o.x, d.x), d.x, Vec3::X),
            (slab(b.y0, b.y1, o.y, d.y), d.y, Vec3::Y),
            (slab(b.z0, b.z1, o.z, d.z), d.z, Vec3::Z),
        ];

        // Entering face has the largest slab entry, leaving face the
        // smallest slab exit.
        let mut t0 = f32::NEG_INFINITY;
        let mut t1 = f32::INFINITY;
        let mut face_in = Vec3::ZERO;
        let mut face_out = Vec3::ZERO;

        for ((enter, exit), dir, axis) in axes {
            if enter > t0 {
                t0 = enter;
                face_in = if dir >= 0.0 { -axis } else { axis };
            }
            if exit < t1 {
                t1 = exit;
                face_out = if dir >= 0.0 { axis } else { -axis };
            }
        }

        if t0 < t1 && t1 > EPSILON {
            if t0 > EPSILON {
                Some((t0, face_in))
            } else {
                Some((t1, face_out))
            }
        } else {
            None
        }
    }
}

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let (t, normal) = self.intersect(ray)?;

        Some(Hit {
            t,
            normal,
            local_hit_point: ray.at(t),
            material: self.material.as_ref(),
        })
    }

    fn shadow_hit(&self, ray: &Ray) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        self.intersect(ray).map(|(t, _)| t)
    }

    fn bounding_box(&self) -> BBox {
        self.bounds
    }
}
