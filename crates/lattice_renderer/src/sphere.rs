//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{
    hittable::{Hit, Hittable, BBOX_PADDING, EPSILON},
    Material,
};
use lattice_math::{BBox, Ray, Vec3};

/// A sphere primitive.
#[derive(Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    pub(crate) material: Arc<dyn Material>,
    pub(crate) shadows: bool,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
            shadows: true,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Nearest root of the ray-sphere equation above EPSILON. Works for
    /// directions of any length.
    fn nearest_root(&self, ray: &Ray) -> Option<f32> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        let root = (h - sqrtd) / a;
        if root > EPSILON {
            return Some(root);
        }

        let root = (h + sqrtd) / a;
        (root > EPSILON).then_some(root)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let t = self.nearest_root(ray)?;
        let p = ray.at(t);

        Some(Hit {
            t,
            normal: (p - self.center) / self.radius,
            local_hit_point: p,
            material: self.material.as_ref(),
        })
    }

    fn shadow_hit(&self, ray: &Ray) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        self.nearest_root(ray)
    }

    fn bounding_box(&self) -> BBox {
        let rvec = Vec3::splat(self.radius);
        BBox::from_points(self.center - rvec, self.center + rvec).padded(BBOX_PADDING)
    }
}
