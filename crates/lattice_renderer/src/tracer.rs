//! Tracers: how a ray's color is computed from what it hits.

use serde::{Deserialize, Serialize};

use crate::{Color, ViewPlane, World};
use lattice_math::Ray;
use rand::RngCore;

/// Light transport strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tracer {
    /// Direct lighting only; secondary rays come back black.
    #[default]
    RayCast,
    /// Direct lighting plus perfect specular recursion.
    Whitted,
    /// Monte Carlo path tracing.
    PathTrace,
}

impl Tracer {
    /// Deepest recursion level this tracer follows.
    pub fn max_depth(&self, view_plane: &ViewPlane) -> u32 {
        match self {
            Tracer::RayCast => 0,
            Tracer::Whitted | Tracer::PathTrace => view_plane.max_depth,
        }
    }

    /// Color seen along `ray` at recursion level `depth`.
    ///
    /// Past the maximum depth the result is black without any intersection
    /// test. Rays that hit nothing return the world's background. `rng`
    /// drives every random choice made while shading, so a seeded generator
    /// gives repeatable results.
    pub fn trace_ray(
        &self,
        world: &World,
        ray: &Ray,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        if depth > self.max_depth(&world.view_plane) {
            return Color::ZERO;
        }

        let Some(mut sr) = world.hit_objects(ray) else {
            return world.background;
        };
        sr.depth = depth;
        sr.ray = *ray;

        match self {
            Tracer::RayCast | Tracer::Whitted => sr.material.shade(&sr, rng),
            Tracer::PathTrace => sr.material.path_shade(&sr, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ambient, Emissive, Material, Matte, Phong, PointLight, Reflective, Sphere};
    use lattice_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn trace(world: &World, ray: &Ray, depth: u32) -> Color {
        world.trace_ray(ray, depth, &mut StdRng::seed_from_u64(0))
    }

    fn sphere_world(tracer: Tracer, material: Arc<dyn Material>) -> World {
        let mut world = World::new();
        world.tracer = tracer;
        world.background = Color::new(0.1, 0.2, 0.3);
        world.add_object(Sphere::new(Vec3::ZERO, 1.0, material));
        world
    }

    #[test]
    fn test_miss_returns_background() {
        let world = sphere_world(Tracer::Whitted, Arc::new(Matte::new(0.25, 0.75, Vec3::ONE)));
        let ray = Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::NEG_Z);

        for depth in 0..=world.view_plane.max_depth {
            assert_eq!(trace(&world, &ray, depth), world.background);
        }
    }

    #[test]
    fn test_empty_world_returns_background() {
        let mut world = World::new();
        world.background = Color::new(0.5, 0.5, 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let mut rng = StdRng::seed_from_u64(0);
        for tracer in [Tracer::RayCast, Tracer::Whitted, Tracer::PathTrace] {
            assert_eq!(tracer.trace_ray(&world, &ray, 0, &mut rng), world.background);
        }
    }

    #[test]
    fn test_depth_cutoff_returns_black() {
        let world = sphere_world(Tracer::Whitted, Arc::new(Emissive::new(1.0, Color::ONE)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let max_depth = world.view_plane.max_depth;

        assert_eq!(trace(&world, &ray, max_depth), Color::ONE);
        assert_eq!(trace(&world, &ray, max_depth + 1), Color::ZERO);
    }

    #[test]
    fn test_ray_cast_max_depth_is_zero() {
        let world = sphere_world(Tracer::RayCast, Arc::new(Emissive::new(1.0, Color::ONE)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        assert_eq!(trace(&world, &ray, 0), Color::ONE);
        assert_eq!(trace(&world, &ray, 1), Color::ZERO);
    }

    #[test]
    fn test_end_to_end_ambient_only() {
        let (ka, kd, cd) = (0.25, 0.75, Color::new(1.0, 0.5, 0.25));
        let mut world = sphere_world(Tracer::RayCast, Arc::new(Matte::new(ka, kd, cd)));
        world.ambient = Ambient::new(0.8, Color::new(1.0, 1.0, 0.5));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let sr = world.hit_objects(&ray).unwrap();
        assert!((sr.t - 4.0).abs() < 1e-5);
        assert!((sr.normal - Vec3::Z).length() < 1e-5);

        let color = trace(&world, &ray, 0);
        let expected = ka * cd * 0.8 * Color::new(1.0, 1.0, 0.5);
        assert!((color - expected).length() < 1e-5, "{color} vs {expected}");
    }

    #[test]
    fn test_point_light_and_shadow() {
        let material: Arc<dyn Material> = Arc::new(Matte::new(0.0, 1.0, Color::ONE));
        let mut world = sphere_world(Tracer::RayCast, material.clone());
        world.add_light(PointLight::new(Vec3::new(0.0, 0.0, 10.0), 1.0, Color::ONE));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let lit = trace(&world, &ray, 0);
        assert!((lit - Color::splat(std::f32::consts::FRAC_1_PI)).length() < 1e-4);

        // A blocker between the light and the hit point, behind the camera
        world.add_object(Sphere::new(Vec3::new(0.0, 0.0, 7.0), 0.5, material));
        let shadowed = trace(&world, &ray, 0);
        assert_eq!(shadowed, Color::ZERO);
    }

    #[test]
    fn test_whitted_reflection_recurses() {
        // Mirror sphere reflecting an emissive sphere behind the camera
        let mirror = Reflective::new(Phong::new(0.0, 0.0, 0.0, 1.0, Color::ONE), 1.0, Color::ONE);
        let mut world = sphere_world(Tracer::Whitted, Arc::new(mirror));
        world.add_object(Sphere::new(
            Vec3::new(0.0, 0.0, 10.0),
            1.0,
            Arc::new(Emissive::new(2.0, Color::ONE)),
        ));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let color = trace(&world, &ray, 0);
        assert!((color - Color::splat(2.0)).length() < 1e-3, "{color}");

        // The ray caster never follows the reflected ray
        world.tracer = Tracer::RayCast;
        assert_eq!(trace(&world, &ray, 0), Color::ZERO);
    }
}
