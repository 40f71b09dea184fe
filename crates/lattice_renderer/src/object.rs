//! The closed set of geometric objects a world can hold.

use std::sync::Arc;

use crate::{
    Compound, Cuboid, Disk, Grid, Hit, Hittable, Instance, Material, Plane, SmoothTriangle,
    Sphere, Triangle,
};
use lattice_math::{BBox, Ray};

/// Any geometric object: a primitive, an instance or a container.
#[derive(Clone)]
pub enum Object {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    SmoothTriangle(SmoothTriangle),
    Cuboid(Cuboid),
    Disk(Disk),
    Instance(Instance),
    Compound(Compound),
    Grid(Grid),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Object::Sphere($inner) => $body,
            Object::Plane($inner) => $body,
            Object::Triangle($inner) => $body,
            Object::SmoothTriangle($inner) => $body,
            Object::Cuboid($inner) => $body,
            Object::Disk($inner) => $body,
            Object::Instance($inner) => $body,
            Object::Compound($inner) => $body,
            Object::Grid($inner) => $body,
        }
    };
}

/// Material and shadow flag accessors shared by every primitive.
macro_rules! impl_surface {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $ty {
                /// Material used to shade hits on this primitive.
                pub fn material(&self) -> &Arc<dyn Material> {
                    &self.material
                }

                pub fn set_material(&mut self, material: Arc<dyn Material>) {
                    self.material = material;
                }

                /// Whether this primitive blocks shadow rays.
                pub fn casts_shadows(&self) -> bool {
                    self.shadows
                }

                pub fn set_shadows(&mut self, shadows: bool) {
                    self.shadows = shadows;
                }
            }

            impl From<$ty> for Object {
                fn from(value: $ty) -> Self {
                    Object::$ty(value)
                }
            }
        )*
    };
}

impl_surface!(Sphere, Plane, Triangle, SmoothTriangle, Cuboid, Disk);

impl From<Instance> for Object {
    fn from(value: Instance) -> Self {
        Object::Instance(value)
    }
}

impl From<Compound> for Object {
    fn from(value: Compound) -> Self {
        Object::Compound(value)
    }
}

impl From<Grid> for Object {
    fn from(value: Grid) -> Self {
        Object::Grid(value)
    }
}

impl Object {
    /// Material attached to this object.
    ///
    /// Primitives always have one. Containers and instances only have one
    /// after `set_material` was called on them.
    pub fn material(&self) -> Option<&Arc<dyn Material>> {
        match self {
            Object::Sphere(o) => Some(o.material()),
            Object::Plane(o) => Some(o.material()),
            Object::Triangle(o) => Some(o.material()),
            Object::SmoothTriangle(o) => Some(o.material()),
            Object::Cuboid(o) => Some(o.material()),
            Object::Disk(o) => Some(o.material()),
            Object::Instance(o) => o.material(),
            Object::Compound(o) => o.material(),
            Object::Grid(o) => o.material(),
        }
    }

    /// Set the material. Containers pass it on to every child.
    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        dispatch!(self, o => o.set_material(material))
    }

    pub fn casts_shadows(&self) -> bool {
        dispatch!(self, o => o.casts_shadows())
    }

    pub fn set_shadows(&mut self, shadows: bool) {
        dispatch!(self, o => o.set_shadows(shadows))
    }

    /// True for containers that hold nothing hittable. Their zero box says
    /// nothing about where they are.
    pub fn is_empty(&self) -> bool {
        match self {
            Object::Compound(o) => o.objects().iter().all(Object::is_empty),
            Object::Grid(o) => o.objects().iter().all(Object::is_empty),
            Object::Instance(o) => o.object().is_empty(),
            _ => false,
        }
    }
}

impl Hittable for Object {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        dispatch!(self, o => o.hit(ray))
    }

    fn shadow_hit(&self, ray: &Ray) -> Option<f32> {
        dispatch!(self, o => o.shadow_hit(ray))
    }

    fn bounding_box(&self) -> BBox {
        dispatch!(self, o => o.bounding_box())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Matte;
    use lattice_math::Vec3;

    fn matte() -> Arc<dyn Material> {
        Arc::new(Matte::new(0.25, 0.75, Vec3::ONE))
    }

    #[test]
    fn test_primitive_shadow_flag() {
        let mut object: Object = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, matte()).into();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(object.casts_shadows());
        assert!(object.shadow_hit(&ray).is_some());

        object.set_shadows(false);
        assert!(!object.casts_shadows());
        assert!(object.shadow_hit(&ray).is_none());
        // Regular hits are unaffected
        assert!(object.hit(&ray).is_some());
    }

    #[test]
    fn test_set_material_on_primitive() {
        let replacement = matte();
        let mut object: Object = Sphere::new(Vec3::ZERO, 1.0, matte()).into();
        object.set_material(replacement.clone());

        assert!(Arc::ptr_eq(object.material().unwrap(), &replacement));
    }

    #[test]
    fn test_is_empty() {
        let sphere: Object = Sphere::new(Vec3::ZERO, 1.0, matte()).into();
        assert!(!sphere.is_empty());

        let mut nested = Compound::new();
        nested.add_object(Compound::new());
        let nested: Object = nested.into();
        assert!(nested.is_empty());
        assert!(Object::from(Instance::new(nested)).is_empty());

        let mut full = Compound::new();
        full.add_object(Compound::new());
        full.add_object(Sphere::new(Vec3::ZERO, 1.0, matte()));
        assert!(!Object::from(full).is_empty());
    }

    #[test]
    fn test_empty_compound_has_no_material() {
        let object: Object = Compound::new().into();
        assert!(object.material().is_none());
    }
}
