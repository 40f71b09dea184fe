//! Hittable trait and Hit for ray-object intersection.

use crate::{Material, Object};
use lattice_math::{BBox, Ray, Vec3};

/// Smallest ray parameter accepted as a hit. Also the offset used for
/// shadow ray origins and the padding around a grid's bounds.
pub const EPSILON: f32 = 0.001;

/// Padding added to primitive bounding boxes so that surfaces lying in an
/// axis plane still get a box with volume.
pub(crate) const BBOX_PADDING: f32 = 0.0001;

/// Result of a successful ray-object intersection.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Outward surface normal (not flipped towards the ray)
    pub normal: Vec3,
    /// Hit point used for texture lookups
    pub local_hit_point: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t > EPSILON`, if any.
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>>;

    /// Nearest occluding distance for shadow rays. Objects that do not cast
    /// shadows return `None`.
    fn shadow_hit(&self, ray: &Ray) -> Option<f32>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> BBox;
}

/// Closest hit among `objects`.
///
/// Uses a strict comparison, so on equal distances the first object wins.
pub fn closest_hit<'a, I>(objects: I, ray: &Ray) -> Option<Hit<'a>>
where
    I: IntoIterator<Item = &'a Object>,
{
    let mut closest_so_far = f32::INFINITY;
    let mut closest = None;

    for object in objects {
        if let Some(hit) = object.hit(ray) {
            if hit.t < closest_so_far {
                closest_so_far = hit.t;
                closest = Some(hit);
            }
        }
    }

    closest
}

/// Closest shadow distance among `objects`.
pub fn closest_shadow_hit<'a, I>(objects: I, ray: &Ray) -> Option<f32>
where
    I: IntoIterator<Item = &'a Object>,
{
    objects
        .into_iter()
        .filter_map(|object| object.shadow_hit(ray))
        .fold(None, |closest, t| match closest {
            Some(c) if c <= t => Some(c),
            _ => Some(t),
        })
}

/// The nearer of two optional hits, preferring `a` on a tie.
pub(crate) fn nearer<'a>(a: Option<Hit<'a>>, b: Option<Hit<'a>>) -> Option<Hit<'a>> {
    match (a, b) {
        (Some(a), Some(b)) if b.t < a.t => Some(b),
        (Some(a), _) => Some(a),
        (None, b) => b,
    }
}
