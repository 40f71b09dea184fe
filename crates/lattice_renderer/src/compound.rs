//! Compound objects: an ordered group of children hit as one.

use std::sync::Arc;

use crate::{
    hittable::{closest_hit, closest_shadow_hit, Hit, Hittable},
    Material, Object,
};
use lattice_math::{BBox, Ray};

/// An ordered list of objects that behaves like a single object.
///
/// A hit reports the nearest child hit and carries that child's material.
#[derive(Clone)]
pub struct Compound {
    objects: Vec<Object>,
    material: Option<Arc<dyn Material>>,
    shadows: bool,
}

impl Compound {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            material: None,
            shadows: true,
        }
    }

    /// Append a child. Children keep the order they were added in.
    pub fn add_object(&mut self, object: impl Into<Object>) {
        self.objects.push(object.into());
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [Object] {
        &mut self.objects
    }

    pub fn material(&self) -> Option<&Arc<dyn Material>> {
        self.material.as_ref()
    }

    /// Give every child the same material.
    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        for object in &mut self.objects {
            object.set_material(material.clone());
        }
        self.material = Some(material);
    }

    /// Set the material of the child at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_material_at(&mut self, index: usize, material: Arc<dyn Material>) {
        self.objects[index].set_material(material);
    }

    pub fn casts_shadows(&self) -> bool {
        self.shadows
    }

    pub fn set_shadows(&mut self, shadows: bool) {
        self.shadows = shadows;
    }
}

impl Default for Compound {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for Compound {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        closest_hit(&self.objects, ray)
    }

    fn shadow_hit(&self, ray: &Ray) -> Option<f32> {
        if !self.shadows {
            return None;
        }
        closest_shadow_hit(&self.objects, ray)
    }

    /// Union of the children's boxes, leaving out empty containers. A
    /// compound with nothing hittable reports the zero box.
    fn bounding_box(&self) -> BBox {
        let bbox = self
            .objects
            .iter()
            .filter(|object| !object.is_empty())
            .fold(BBox::EMPTY, |acc, object| acc.union(&object.bounding_box()));

        if bbox.is_empty() {
            BBox::default()
        } else {
            bbox
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Matte, Sphere};
    use lattice_math::Vec3;

    fn matte() -> Arc<dyn Material> {
        Arc::new(Matte::new(0.25, 0.75, Vec3::ONE))
    }

    fn two_spheres() -> Compound {
        let mut compound = Compound::new();
        compound.add_object(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, matte()));
        compound.add_object(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, matte()));
        compound
    }

    #[test]
    fn test_compound_hit_is_nearest_child() {
        let compound = two_spheres();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = compound.hit(&ray).unwrap();

        assert!((hit.t - 4.0).abs() < 1e-4);
        assert!(std::ptr::addr_eq(
            hit.material,
            Arc::as_ptr(compound.objects()[1].material().unwrap())
        ));
    }

    #[test]
    fn test_compound_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert!(two_spheres().hit(&ray).is_none());
    }

    #[test]
    fn test_compound_set_material_broadcasts() {
        let mut compound = two_spheres();
        let shared = matte();
        compound.set_material(shared.clone());

        for object in compound.objects() {
            assert!(Arc::ptr_eq(object.material().unwrap(), &shared));
        }
    }

    #[test]
    fn test_compound_set_material_at() {
        let mut compound = two_spheres();
        let shared = matte();
        compound.set_material_at(1, shared.clone());

        assert!(!Arc::ptr_eq(compound.objects()[0].material().unwrap(), &shared));
        assert!(Arc::ptr_eq(compound.objects()[1].material().unwrap(), &shared));
    }

    #[test]
    #[should_panic]
    fn test_compound_set_material_at_out_of_range() {
        let mut compound = two_spheres();
        compound.set_material_at(5, matte());
    }

    #[test]
    fn test_compound_bounding_box() {
        let bbox = two_spheres().bounding_box();
        assert!(bbox.z0 < -10.9);
        assert!(bbox.z1 > -4.1);
        assert!((bbox.x1 - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_compound_bounding_box() {
        assert_eq!(Compound::new().bounding_box(), BBox::default());
    }

    #[test]
    fn test_empty_child_does_not_stretch_bounding_box() {
        let mut compound = Compound::new();
        compound.add_object(Sphere::new(Vec3::new(10.0, 10.0, 10.0), 1.0, matte()));
        compound.add_object(Compound::new());

        let bbox = compound.bounding_box();
        assert!(bbox.x0 > 8.9);
        assert!(!bbox.inside(Vec3::ZERO));
    }

    #[test]
    fn test_compound_shadow_flag() {
        let mut compound = two_spheres();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!((compound.shadow_hit(&ray).unwrap() - 4.0).abs() < 1e-4);

        compound.set_shadows(false);
        assert!(compound.shadow_hit(&ray).is_none());
    }
}
