//! Transformed instances of a shared object.
//!
//! The wrapped object stays in its own space. Rays are carried into that
//! space with the inverse matrix, and normals come back with its transpose.
//! The object is reference counted so one mesh grid can back many
//! instances.

use std::sync::Arc;

use crate::{
    hittable::{Hit, Hittable},
    Material, Object,
};
use lattice_math::{BBox, Mat4, Mat4Ext, Ray, Vec3};

/// An object placed in the world through an affine transform.
#[derive(Clone)]
pub struct Instance {
    object: Arc<Object>,
    /// Object-to-world transform
    forward: Mat4,
    /// World-to-object transform
    inverse: Mat4,
    /// Cached world-space box, cleared by every transform
    bbox: Option<BBox>,
    /// Overrides the wrapped object's material when set
    material: Option<Arc<dyn Material>>,
    shadows: bool,
    transform_texture: bool,
}

impl Instance {
    pub fn new(object: impl Into<Object>) -> Self {
        Self::shared(Arc::new(object.into()))
    }

    /// Instance of an object that other instances may also reference.
    pub fn shared(object: Arc<Object>) -> Self {
        Self {
            object,
            forward: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
            bbox: None,
            material: None,
            shadows: true,
            transform_texture: true,
        }
    }

    fn apply(&mut self, forward: Mat4, inverse: Mat4) -> &mut Self {
        self.forward = forward * self.forward;
        self.inverse *= inverse;
        self.bbox = None;
        self
    }

    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.apply(Mat4::from_translation(offset), Mat4::from_translation(-offset))
    }

    /// Non-uniform scale. Components must be non-zero.
    pub fn scale(&mut self, factors: Vec3) -> &mut Self {
        self.apply(Mat4::from_scale(factors), Mat4::from_scale(factors.recip()))
    }

    /// Rotate about the x axis by `degrees`.
    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        let r = degrees.to_radians();
        self.apply(Mat4::from_rotation_x(r), Mat4::from_rotation_x(-r))
    }

    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        let r = degrees.to_radians();
        self.apply(Mat4::from_rotation_y(r), Mat4::from_rotation_y(-r))
    }

    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        let r = degrees.to_radians();
        self.apply(Mat4::from_rotation_z(r), Mat4::from_rotation_z(-r))
    }

    /// Apply an arbitrary invertible affine transform after the current one.
    pub fn transform(&mut self, matrix: Mat4) -> &mut Self {
        self.apply(matrix, matrix.inverse())
    }

    /// The wrapped object, in its own space.
    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn forward_matrix(&self) -> Mat4 {
        self.forward
    }

    pub fn inverse_matrix(&self) -> Mat4 {
        self.inverse
    }

    /// When set (the default), textures see hit points in the wrapped
    /// object's space, so they move with the object.
    pub fn set_transform_texture(&mut self, transform_texture: bool) {
        self.transform_texture = transform_texture;
    }

    /// Cache the world-space box. Call again after changing the transform.
    pub fn compute_bounding_box(&mut self) {
        self.bbox = Some(self.world_bounds());
    }

    fn world_bounds(&self) -> BBox {
        let local = self.object.bounding_box();
        if local.is_empty() {
            local
        } else if !local.is_finite() {
            BBox::UNBOUNDED
        } else {
            self.forward.transform_bbox(&local)
        }
    }

    pub fn material(&self) -> Option<&Arc<dyn Material>> {
        self.material.as_ref()
    }

    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = Some(material);
    }

    pub fn casts_shadows(&self) -> bool {
        self.shadows
    }

    pub fn set_shadows(&mut self, shadows: bool) {
        self.shadows = shadows;
    }

    /// The ray in the wrapped object's space. The direction is not
    /// renormalized, so `t` is the same in both spaces.
    fn object_ray(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.inverse.transform_point3(ray.origin),
            self.inverse.transform_vector3(ray.direction),
        )
    }

    fn culled(&self, ray: &Ray) -> bool {
        self.bbox.is_some_and(|bbox| !bbox.intersects(ray))
    }
}

impl Hittable for Instance {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        if self.culled(ray) {
            return None;
        }

        let local = self.object.hit(&self.object_ray(ray))?;

        Some(Hit {
            t: local.t,
            normal: self.inverse.transform_normal(local.normal),
            local_hit_point: if self.transform_texture {
                local.local_hit_point
            } else {
                ray.at(local.t)
            },
            material: match &self.material {
                Some(material) => material.as_ref(),
                None => local.material,
            },
        })
    }

    fn shadow_hit(&self, ray: &Ray) -> Option<f32> {
        if !self.shadows || self.culled(ray) {
            return None;
        }
        self.object.shadow_hit(&self.object_ray(ray))
    }

    fn bounding_box(&self) -> BBox {
        self.bbox.unwrap_or_else(|| self.world_bounds())
    }
}
