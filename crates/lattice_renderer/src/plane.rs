//! Infinite plane and disk primitives.

use std::sync::Arc;

use crate::{
    hittable::{Hit, Hittable, BBOX_PADDING, EPSILON},
    Material,
};
use lattice_math::{BBox, Ray, Vec3};

/// Ray parameter where `ray` meets the plane through `point` with `normal`.
fn plane_t(point: Vec3, normal: Vec3, ray: &Ray) -> Option<f32> {
    let denom = ray.direction.dot(normal);
    if denom == 0.0 {
        return None;
    }

    let t = (point - ray.origin).dot(normal) / denom;
    (t > EPSILON).then_some(t)
}

/// An infinite plane given by a point and a normal.
///
/// Its bounding box is unbounded, so grids keep planes out of their cells.
#[derive(Clone)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    pub(crate) material: Arc<dyn Material>,
    pub(crate) shadows: bool,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            material,
            shadows: true,
        }
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let t = plane_t(self.point, self.normal, ray)?;

        Some(Hit {
            t,
            normal: self.normal,
            local_hit_point: ray.at(t),
            material: self.material.as_ref(),
        })
    }

    fn shadow_hit(&self, ray: &Ray) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        plane_t(self.point, self.normal, ray)
    }

    fn bounding_box(&self) -> BBox {
        BBox::UNBOUNDED
    }
}

/// A flat disk: the part of a plane within `radius` of `center`.
#[derive(Clone)]
pub struct Disk {
    center: Vec3,
    normal: Vec3,
    radius: f32,
    pub(crate) material: Arc<dyn Material>,
    pub(crate) shadows: bool,
}

impl Disk {
    pub fn new(center: Vec3, normal: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            normal: normal.normalize_or_zero(),
            radius: radius.max(0.0),
            material,
            shadows: true,
        }
    }

    fn disk_t(&self, ray: &Ray) -> Option<f32> {
        let t = plane_t(self.center, self.normal, ray)?;
        (ray.at(t).distance_squared(self.center) < self.radius * self.radius).then_some(t)
    }
}

impl Hittable for Disk {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let t = self.disk_t(ray)?;

        Some(Hit {
            t,
            normal: self.normal,
            local_hit_point: ray.at(t),
            material: self.material.as_ref(),
        })
    }

    fn shadow_hit(&self, ray: &Ray) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        self.disk_t(ray)
    }

    fn bounding_box(&self) -> BBox {
        // Only the extent perpendicular to the normal matters
        let n = self.normal;
        let half = self.radius * (Vec3::ONE - n * n).max(Vec3::ZERO).powf(0.5);
        BBox::from_points(self.center - half, self.center + half).padded(BBOX_PADDING)
    }
}
