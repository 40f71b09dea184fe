//! The scene: objects, lights and the settings used to trace them.

use crate::{
    hittable::{closest_hit, Hittable},
    Ambient, Color, Light, Object, RenderConfig, ShadeRec, Tracer, ViewPlane,
};
use lattice_math::Ray;
use rand::RngCore;

/// Objects, lights and the settings shared by every ray.
pub struct World {
    pub view_plane: ViewPlane,
    /// Color returned for rays that hit nothing
    pub background: Color,
    pub tracer: Tracer,
    pub ambient: Ambient,
    objects: Vec<Object>,
    lights: Vec<Box<dyn Light>>,
}

impl World {
    /// Empty world with default settings, a black background and a white
    /// ambient light of radiance 1.
    pub fn new() -> Self {
        Self::from_config(&RenderConfig::default())
    }

    /// Empty world taking its view plane, tracer and background from `config`.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            view_plane: config.view_plane.clone(),
            background: config.background,
            tracer: config.tracer,
            ambient: Ambient::default(),
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: impl Into<Object>) {
        self.objects.push(object.into());
    }

    pub fn add_light(&mut self, light: impl Light + 'static) {
        self.lights.push(Box::new(light));
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    /// Nearest hit among the top-level objects.
    pub fn hit_objects(&self, ray: &Ray) -> Option<ShadeRec<'_>> {
        closest_hit(&self.objects, ray).map(|hit| ShadeRec::new(self, ray, hit))
    }

    /// True if a shadow-casting object lies on `ray` closer than `max_t`.
    pub fn shadow_hit(&self, ray: &Ray, max_t: f32) -> bool {
        self.objects
            .iter()
            .any(|object| object.shadow_hit(ray).is_some_and(|t| t < max_t))
    }

    /// Trace `ray` with this world's tracer.
    pub fn trace_ray(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        self.tracer.trace_ray(self, ray, depth, rng)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
