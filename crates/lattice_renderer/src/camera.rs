//! Camera for ray generation.

use serde::{Deserialize, Serialize};

use lattice_math::{Ray, Vec2, Vec3};

/// How view-plane points become rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// All rays leave the eye. `view_distance` is the eye to view-plane
    /// distance; `zoom` scales the pixel size down.
    Pinhole { view_distance: f32, zoom: f32 },
    /// Parallel rays along the viewing direction, one per view-plane point.
    Orthographic,
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Pinhole {
            view_distance: 500.0,
            zoom: 1.0,
        }
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    look_at: Vec3,
    up: Vec3,
    projection: Projection,
    exposure_time: f32,

    // Orthonormal basis, recomputed whenever the position changes
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    pub fn new(eye: Vec3, look_at: Vec3) -> Self {
        let mut camera = Self {
            eye,
            look_at,
            up: Vec3::Y,
            projection: Projection::default(),
            exposure_time: 1.0,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        };
        camera.compute_uvw();
        camera
    }

    /// Set the up vector.
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self.compute_uvw();
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Scale applied to every pixel's averaged color.
    pub fn with_exposure_time(mut self, exposure_time: f32) -> Self {
        self.exposure_time = exposure_time;
        self
    }

    pub fn exposure_time(&self) -> f32 {
        self.exposure_time
    }

    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Build the basis with `w` pointing from the look-at point to the eye.
    /// Looking straight up or down makes `up x w` vanish, so those two
    /// cases get a fixed basis.
    fn compute_uvw(&mut self) {
        let eye = self.eye;
        let look_at = self.look_at;

        if eye.x == look_at.x && eye.z == look_at.z && eye.y != look_at.y {
            if eye.y > look_at.y {
                self.u = Vec3::Z;
                self.v = Vec3::X;
                self.w = Vec3::Y;
            } else {
                self.u = Vec3::X;
                self.v = Vec3::Z;
                self.w = Vec3::NEG_Y;
            }
            return;
        }

        self.w = (eye - look_at).normalize();
        self.u = self.up.cross(self.w).normalize();
        self.v = self.w.cross(self.u);
    }

    /// Ray through the view-plane point `pp`, measured from the center of
    /// the view plane in world units.
    pub fn ray_for(&self, pp: Vec2) -> Ray {
        match self.projection {
            Projection::Pinhole {
                view_distance,
                zoom,
            } => {
                let p = pp / zoom;
                let direction = (p.x * self.u + p.y * self.v - view_distance * self.w).normalize();
                Ray::new(self.eye, direction)
            }
            Projection::Orthographic => {
                let origin = self.eye + pp.x * self.u + pp.y * self.v;
                Ray::new(origin, (self.look_at - self.eye).normalize())
            }
        }
    }
}
