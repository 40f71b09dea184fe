//! Flat and smooth triangle primitives.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use crate::{
    hittable::{Hit, Hittable, BBOX_PADDING, EPSILON},
    Material,
};
use lattice_math::{BBox, Ray, Vec3};

/// Möller-Trumbore intersection. Returns `(t, u, v)` where `u` and `v` are
/// the barycentric weights of `v1` and `v2`.
fn intersect(v0: Vec3, v1: Vec3, v2: Vec3, ray: &Ray) -> Option<(f32, f32, f32)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < 1e-8 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some((t, u, v))
}

fn triangle_bounds(v0: Vec3, v1: Vec3, v2: Vec3) -> BBox {
    BBox::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2)).padded(BBOX_PADDING)
}

/// A flat-shaded triangle.
#[derive(Clone)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, counter-clockwise winding)
    normal: Vec3,
    pub(crate) material: Arc<dyn Material>,
    pub(crate) shadows: bool,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        Self {
            v0,
            v1,
            v2,
            normal,
            material,
            shadows: true,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let (t, _, _) = intersect(self.v0, self.v1, self.v2, ray)?;

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
        intersect(self.v0, self.v1, self.v2, ray).map(|(t, _, _)| t)
    }

    fn bounding_box(&self) -> BBox {
        triangle_bounds(self.v0, self.v1, self.v2)
    }
}

/// A triangle whose normal is interpolated from per-vertex normals.
#[derive(Clone)]
pub struct SmoothTriangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    n0: Vec3,
    n1: Vec3,
    n2: Vec3,
    pub(crate) material: Arc<dyn Material>,
    pub(crate) shadows: bool,
}

impl SmoothTriangle {
    pub fn new(
        vertices: [Vec3; 3],
        normals: [Vec3; 3],
        material: Arc<dyn Material>,
    ) -> Self {
        let [v0, v1, v2] = vertices;
        let [n0, n1, n2] = normals;

        Self {
            v0,
            v1,
            v2,
            n0,
            n1,
            n2,
            material,
            shadows: true,
        }
    }

    fn interpolate_normal(&self, u: f32, v: f32) -> Vec3 {
        ((1.0 - u - v) * self.n0 + u * self.n1 + v * self.n2).normalize_or_zero()
    }
}

impl Hittable for SmoothTriangle {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let (t, u, v) = intersect(self.v0, self.v1, self.v2, ray)?;

        Some(Hit {
            t,
            normal: self.interpolate_normal(u, v),
            local_hit_point: ray.at(t),
            material: self.material.as_ref(),
        })
    }

    fn shadow_hit(&self, ray: &Ray) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        intersect(self.v0, self.v1, self.v2, ray).map(|(t, _, _)| t)
    }

    fn bounding_box(&self) -> BBox {
        triangle_bounds(self.v0, self.v1, self.v2)
    }
}
