//! Uniform grid acceleration structure.
//!
//! A grid is a compound whose bounded children are bucketed into a regular
//! 3D array of cells. Rays walk the cells front to back with a 3D-DDA and
//! stop at the first cell that holds a hit inside it. Children with an
//! unbounded box (planes, or instances of them) are tested on every ray.

use std::sync::Arc;

use crate::{
    hittable::{closest_hit, closest_shadow_hit, nearer, Hit, Hittable, EPSILON},
    Compound, Material, Object, SmoothTriangle, Triangle,
};
use lattice_core::Mesh;
use lattice_math::{slab, BBox, Ray, Vec3};

/// Default cells per object along the cube root, per axis.
pub const DEFAULT_MULTIPLIER: f32 = 2.0;

/// How mesh faces are turned into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshShading {
    #[default]
    Flat,
    Smooth,
}

/// Stepping state for one axis of the DDA.
#[derive(Debug, Clone, Copy)]
struct AxisStep {
    next: f32,
    delta: f32,
    step: isize,
    stop: isize,
}

impl AxisStep {
    /// `t_min`/`t_max` are the ray's slab distances on this axis, `index`
    /// the starting cell and `n` the number of cells.
    fn new(t_min: f32, t_max: f32, dir: f32, index: usize, n: usize) -> Self {
        let delta = (t_max - t_min) / n as f32;

        if dir > 0.0 {
            Self {
                next: t_min + (index + 1) as f32 * delta,
                delta,
                step: 1,
                stop: n as isize,
            }
        } else if dir < 0.0 {
            Self {
                next: t_min + (n - index) as f32 * delta,
                delta,
                step: -1,
                stop: -1,
            }
        } else {
            Self {
                next: f32::INFINITY,
                delta,
                step: -1,
                stop: -1,
            }
        }
    }
}

/// Uniform grid over a compound's children.
#[derive(Clone)]
pub struct Grid {
    compound: Compound,
    /// Object indices per cell, x varying fastest
    cells: Vec<Vec<u32>>,
    /// Indices of children with unbounded boxes
    unbounded: Vec<u32>,
    bbox: BBox,
    nx: usize,
    ny: usize,
    nz: usize,
    multiplier: f32,
    built: bool,
}

impl Grid {
    pub fn new() -> Self {
        Self::with_multiplier(DEFAULT_MULTIPLIER)
    }

    /// Grid with a custom cell density factor.
    pub fn with_multiplier(multiplier: f32) -> Self {
        Self {
            compound: Compound::new(),
            cells: Vec::new(),
            unbounded: Vec::new(),
            bbox: BBox::EMPTY,
            nx: 0,
            ny: 0,
            nz: 0,
            multiplier,
            built: false,
        }
    }

    /// Append a child. The grid must be rebuilt with `setup_cells` before the
    /// child is found through the cells; until then hits fall back to a
    /// linear scan.
    pub fn add_object(&mut self, object: impl Into<Object>) {
        self.compound.add_object(object);
        self.built = false;
    }

    /// Add every face of `mesh` as a triangle.
    ///
    /// Smooth shading computes vertex normals when the mesh has none.
    pub fn add_mesh(&mut self, mut mesh: Mesh, material: Arc<dyn Material>, shading: MeshShading) {
        if shading == MeshShading::Smooth {
            mesh.ensure_normals();
        }

        let normals = mesh.normals.as_deref().unwrap_or(&[]);
        for [i0, i1, i2] in mesh.faces() {
            let vertices = [mesh.positions[i0], mesh.positions[i1], mesh.positions[i2]];

            match shading {
                MeshShading::Flat => {
                    let [v0, v1, v2] = vertices;
                    self.compound
                        .add_object(Triangle::new(v0, v1, v2, material.clone()));
                }
                MeshShading::Smooth => {
                    let normals = [normals[i0], normals[i1], normals[i2]];
                    self.compound
                        .add_object(SmoothTriangle::new(vertices, normals, material.clone()));
                }
            }
        }

        log::info!(
            "Added mesh to grid: {} triangles ({:?} shading)",
            mesh.triangle_count(),
            shading
        );
        self.built = false;
    }

    pub fn num_objects(&self) -> usize {
        self.compound.num_objects()
    }

    pub fn objects(&self) -> &[Object] {
        self.compound.objects()
    }

    /// Mutable access to the children. Marks the grid as needing a rebuild.
    pub fn objects_mut(&mut self) -> &mut [Object] {
        self.built = false;
        self.compound.objects_mut()
    }

    pub fn material(&self) -> Option<&Arc<dyn Material>> {
        self.compound.material()
    }

    pub fn set_material(&mut self, material: Arc<dyn Material>) {
        self.compound.set_material(material);
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_material_at(&mut self, index: usize, material: Arc<dyn Material>) {
        self.compound.set_material_at(index, material);
    }

    pub fn casts_shadows(&self) -> bool {
        self.compound.casts_shadows()
    }

    pub fn set_shadows(&mut self, shadows: bool) {
        self.compound.set_shadows(shadows);
    }

    /// Whether the cells reflect the current children.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Number of cells along x, y and z.
    pub fn cell_counts(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Bucket every bounded child into the cells its box overlaps.
    pub fn setup_cells(&mut self) {
        self.cells.clear();
        self.unbounded.clear();

        let mut bounds = BBox::EMPTY;
        let mut boxes = Vec::with_capacity(self.compound.num_objects());

        for (i, object) in self.compound.objects().iter().enumerate() {
            if object.is_empty() {
                continue;
            }
            let bbox = object.bounding_box();
            if bbox.is_empty() {
                continue;
            }
            if bbox.is_finite() {
                bounds.expand_to_fit(&bbox);
                boxes.push((i as u32, bbox));
            } else {
                self.unbounded.push(i as u32);
            }
        }

        self.built = true;

        if boxes.is_empty() {
            self.bbox = BBox::EMPTY;
            (self.nx, self.ny, self.nz) = (0, 0, 0);
            log::debug!(
                "Grid has no bounded objects ({} unbounded)",
                self.unbounded.len()
            );
            return;
        }

        self.bbox = bounds.padded(EPSILON);

        let w = self.bbox.extent();
        let s = (w.x * w.y * w.z / boxes.len() as f32).cbrt();
        self.nx = (self.multiplier * w.x / s) as usize + 1;
        self.ny = (self.multiplier * w.y / s) as usize + 1;
        self.nz = (self.multiplier * w.z / s) as usize + 1;

        self.cells = vec![Vec::new(); self.nx * self.ny * self.nz];

        for (index, bbox) in boxes {
            let [x0, y0, z0] = self.cell_of(bbox.min());
            let [x1, y1, z1] = self.cell_of(bbox.max());

            for iz in z0..=z1 {
                for iy in y0..=y1 {
                    for ix in x0..=x1 {
                        let cell = self.cell_index(ix, iy, iz);
                        self.cells[cell].push(index);
                    }
                }
            }
        }

        self.log_stats();
    }

    fn log_stats(&self) {
        let mut counts = [0usize; 4];
        for cell in &self.cells {
            counts[cell.len().min(3)] += 1;
        }

        log::debug!(
            "Grid {}x{}x{} for {} objects: {} empty cells, {} with 1, {} with 2, {} with more; {} unbounded",
            self.nx,
            self.ny,
            self.nz,
            self.num_objects(),
            counts[0],
            counts[1],
            counts[2],
            counts[3],
            self.unbounded.len()
        );
    }

    #[inline]
    fn cell_index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        ix + self.nx * iy + self.nx * self.ny * iz
    }

    /// Cell containing `p`, clamped to the grid.
    fn cell_of(&self, p: Vec3) -> [usize; 3] {
        let b = &self.bbox;
        [
            cell_coord(p.x, b.x0, b.x1, self.nx),
            cell_coord(p.y, b.y0, b.y1, self.ny),
            cell_coord(p.z, b.z0, b.z1, self.nz),
        ]
    }

    /// Walk the cells pierced by `ray` front to back. `visit` gets each
    /// cell's object indices and the distance at which the ray leaves the
    /// cell; the walk stops at the first `Some`.
    fn walk<'a, T>(
        &'a self,
        ray: &Ray,
        mut visit: impl FnMut(&'a [u32], f32) -> Option<T>,
    ) -> Option<T> {
        if self.cells.is_empty() {
            return None;
        }

        let b = &self.bbox;
        let o = ray.origin;
        let d = ray.direction;

        let (tx_min, tx_max) = slab(b.x0, b.x1, o.x, d.x);
        let (ty_min, ty_max) = slab(b.y0, b.y1, o.y, d.y);
        let (tz_min, tz_max) = slab(b.z0, b.z1, o.z, d.z);

        let t0 = tx_min.max(ty_min).max(tz_min);
        let t1 = tx_max.min(ty_max).min(tz_max);

        if t0 > t1 || t1 < 0.0 {
            return None;
        }

        let start = if b.inside(o) { o } else { ray.at(t0) };
        let [ix, iy, iz] = self.cell_of(start);

        let mut index = [ix as isize, iy as isize, iz as isize];
        let mut axes = [
            AxisStep::new(tx_min, tx_max, d.x, ix, self.nx),
            AxisStep::new(ty_min, ty_max, d.y, iy, self.ny),
            AxisStep::new(tz_min, tz_max, d.z, iz, self.nz),
        ];

        loop {
            let cell: &'a [u32] = &self.cells[self.cell_index(
                index[0] as usize,
                index[1] as usize,
                index[2] as usize,
            )];

            let axis = if axes[0].next < axes[1].next && axes[0].next < axes[2].next {
                0
            } else if axes[1].next < axes[2].next {
                1
            } else {
                2
            };

            if let Some(found) = visit(cell, axes[axis].next) {
                return Some(found);
            }

            axes[axis].next += axes[axis].delta;
            index[axis] += axes[axis].step;
            if index[axis] == axes[axis].stop {
                return None;
            }
        }
    }

    fn unbounded_objects(&self) -> impl Iterator<Item = &Object> {
        let objects = self.compound.objects();
        self.unbounded.iter().map(move |&i| &objects[i as usize])
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the cell containing `value` along one axis, clamped to `[0, n)`.
fn cell_coord(value: f32, lo: f32, hi: f32, n: usize) -> usize {
    let cell = ((value - lo) * n as f32 / (hi - lo)).floor().max(0.0) as usize;
    cell.min(n - 1)
}

impl Hittable for Grid {
    fn hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        if !self.built {
            return self.compound.hit(ray);
        }

        let objects = self.compound.objects();
        let in_cells = self.walk(ray, |cell, t_exit| {
            closest_hit(cell.iter().map(|&i| &objects[i as usize]), ray)
                .filter(|hit| hit.t <= t_exit)
        });

        nearer(in_cells, closest_hit(self.unbounded_objects(), ray))
    }

    fn shadow_hit(&self, ray: &Ray) -> Option<f32> {
        if !self.built {
            return self.compound.shadow_hit(ray);
        }
        if !self.casts_shadows() {
            return None;
        }

        let objects = self.compound.objects();
        let in_cells = self.walk(ray, |cell, t_exit| {
            closest_shadow_hit(cell.iter().map(|&i| &objects[i as usize]), ray)
                .filter(|&t| t <= t_exit)
        });
        let unbounded = closest_shadow_hit(self.unbounded_objects(), ray);

        match (in_cells, unbounded) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn bounding_box(&self) -> BBox {
        if !self.built {
            return self.compound.bounding_box();
        }
        if !self.unbounded.is_empty() {
            BBox::UNBOUNDED
        } else if self.cells.is_empty() {
            BBox::default()
        } else {
            self.bbox
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Matte, Plane, Sphere};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn matte() -> Arc<dyn Material> {
        Arc::new(Matte::new(0.25, 0.75, Vec3::ONE))
    }

    /// Every sphere gets its own material so hits can be told apart.
    fn random_spheres(rng: &mut StdRng, count: usize) -> Vec<Sphere> {
        (0..count)
            .map(|_| {
                let center = Vec3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );
                Sphere::new(center, rng.gen_range(0.1..1.5), matte())
            })
            .collect()
    }

    fn random_ray(rng: &mut StdRng) -> Ray {
        let origin = Vec3::new(
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
            rng.gen_range(-20.0..20.0),
        );
        let target = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        Ray::new(origin, (target - origin).normalize())
    }

    #[test]
    fn test_grid_matches_compound() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new();
        let mut compound = Compound::new();

        for sphere in random_spheres(&mut rng, 200) {
            grid.add_object(sphere.clone());
            compound.add_object(sphere);
        }
        grid.setup_cells();

        for _ in 0..2000 {
            let ray = random_ray(&mut rng);

            match (compound.hit(&ray), grid.hit(&ray)) {
                (Some(e), Some(a)) => {
                    assert!((e.t - a.t).abs() < 1e-3, "{} vs {}", e.t, a.t);
                    assert!(
                        std::ptr::addr_eq(e.material, a.material),
                        "different object won for {ray:?}"
                    );
                }
                (None, None) => {}
                (e, a) => panic!(
                    "grid and compound disagree: {:?} vs {:?} for {ray:?}",
                    e.map(|hit| hit.t),
                    a.map(|hit| hit.t)
                ),
            }

            match (compound.shadow_hit(&ray), grid.shadow_hit(&ray)) {
                (Some(e), Some(a)) => assert!((e - a).abs() < 1e-3, "{e} vs {a}"),
                (None, None) => {}
                other => panic!("shadow hits disagree: {other:?} for {ray:?}"),
            }
        }
    }

    #[test]
    fn test_grid_axis_aligned_rays() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut grid = Grid::new();
        let mut compound = Compound::new();

        for sphere in random_spheres(&mut rng, 50) {
            grid.add_object(sphere.clone());
            compound.add_object(sphere);
        }
        grid.setup_cells();

        let directions = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
        for _ in 0..200 {
            let origin = Vec3::new(
                rng.gen_range(-12.0..12.0),
                rng.gen_range(-12.0..12.0),
                rng.gen_range(-12.0..12.0),
            );
            for direction in directions {
                let ray = Ray::new(origin, direction);
                let expected = compound.hit(&ray).map(|hit| hit.t);
                let actual = grid.hit(&ray).map(|hit| hit.t);
                match (expected, actual) {
                    (Some(e), Some(a)) => assert!((e - a).abs() < 1e-3),
                    (None, None) => {}
                    other => panic!("grid and compound disagree: {other:?} for {ray:?}"),
                }
            }
        }
    }

    #[test]
    fn test_grid_cell_counts() {
        let mut grid = Grid::new();
        for i in 0..8 {
            let x = (i % 2) as f32 * 4.0;
            let y = ((i / 2) % 2) as f32 * 4.0;
            let z = (i / 4) as f32 * 4.0;
            grid.add_object(Sphere::new(Vec3::new(x, y, z), 1.0, matte()));
        }
        grid.setup_cells();

        // A cube grid: s = w / 2 so each axis gets about 2 * 2 + 1 cells
        let (nx, ny, nz) = grid.cell_counts();
        assert_eq!(nx, ny);
        assert_eq!(ny, nz);
        assert!((4..=5).contains(&nx));
        assert!(grid.is_built());
    }

    #[test]
    fn test_grid_ray_outside_misses() {
        let mut grid = Grid::new();
        grid.add_object(Sphere::new(Vec3::ZERO, 1.0, matte()));
        grid.setup_cells();

        let ray = Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::NEG_Z);
        assert!(grid.hit(&ray).is_none());

        // Box behind the ray
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(grid.hit(&ray).is_none());
    }

    #[test]
    fn test_grid_ray_starting_inside() {
        let mut grid = Grid::new();
        grid.add_object(Sphere::new(Vec3::new(-3.0, 0.0, 0.0), 1.0, matte()));
        grid.add_object(Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, matte()));
        grid.setup_cells();

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = grid.hit(&ray).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_grid_hit_beyond_cell_is_deferred() {
        // A large sphere straddles many cells; a small one sits in front of
        // it further along the ray. The nearer hit must win.
        let mut grid = Grid::new();
        grid.add_object(Sphere::new(Vec3::new(0.0, 0.0, -6.0), 4.0, matte()));
        grid.add_object(Sphere::new(Vec3::new(0.0, 0.0, 0.0), 0.5, matte()));
        grid.add_object(Sphere::new(Vec3::new(5.0, 5.0, 5.0), 0.5, matte()));
        grid.setup_cells();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hit = grid.hit(&ray).unwrap();
        assert!((hit.t - 9.5).abs() < 1e-4);
    }

    #[test]
    fn test_unbuilt_grid_falls_back_to_scan() {
        let mut grid = Grid::new();
        grid.add_object(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, matte()));
        grid.setup_cells();

        // Added after the build: not in any cell yet
        grid.add_object(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, matte()));
        assert!(!grid.is_built());

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = grid.hit(&ray).unwrap();
        assert!((hit.t - 1.5).abs() < 1e-4);

        grid.setup_cells();
        let hit = grid.hit(&ray).unwrap();
        assert!((hit.t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_grid_keeps_planes_unbounded() {
        let mut grid = Grid::new();
        grid.add_object(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, matte()));
        grid.add_object(Plane::new(Vec3::new(0.0, -2.0, 0.0), Vec3::Y, matte()));
        grid.setup_cells();

        assert!(!grid.bounding_box().is_finite());

        // Sphere is in front of the plane along this ray
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -0.1, -1.0).normalize());
        let sphere_t = grid.objects()[0].hit(&ray).unwrap().t;
        assert!((grid.hit(&ray).unwrap().t - sphere_t).abs() < 1e-4);

        // Plane far from the grid bounds is still found
        let ray = Ray::new(Vec3::new(100.0, 0.0, 100.0), Vec3::NEG_Y);
        assert!((grid.hit(&ray).unwrap().t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_child_is_left_out_of_cells() {
        let mut grid = Grid::new();
        grid.add_object(Sphere::new(Vec3::new(10.0, 10.0, 10.0), 1.0, matte()));
        grid.add_object(Compound::new());
        grid.setup_cells();

        let bbox = grid.bounding_box();
        assert!(bbox.x0 > 8.9);
        assert!(!bbox.inside(Vec3::ZERO));

        let ray = Ray::new(Vec3::new(10.0, 10.0, 20.0), Vec3::NEG_Z);
        assert!((grid.hit(&ray).unwrap().t - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_grid() {
        let mut grid = Grid::new();
        grid.setup_cells();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(grid.hit(&ray).is_none());
        assert!(grid.shadow_hit(&ray).is_none());
        assert_eq!(grid.bounding_box(), BBox::default());
    }

    #[test]
    fn test_grid_shadow_flag() {
        let mut grid = Grid::new();
        grid.add_object(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, matte()));
        grid.setup_cells();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(grid.shadow_hit(&ray).is_some());

        grid.set_shadows(false);
        assert!(grid.shadow_hit(&ray).is_none());
        assert!(grid.hit(&ray).is_some());
    }

    #[test]
    fn test_grid_add_mesh() {
        let positions = vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2, 0, 2, 3], None).unwrap();

        let mut grid = Grid::new();
        grid.add_mesh(mesh, matte(), MeshShading::Smooth);
        grid.setup_cells();

        assert_eq!(grid.num_objects(), 2);
        let ray = Ray::new(Vec3::new(0.5, -0.5, 3.0), Vec3::NEG_Z);
        let hit = grid.hit(&ray).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-4);
        assert!((hit.normal - Vec3::Z).length() < 1e-3);
    }
}
