//! Mesh geometry and OBJ loading.
//!
//! A `Mesh` is an indexed triangle soup. The renderer turns every face into
//! a flat or smooth triangle and drops them into a grid.

use std::path::Path;

use lattice_math::{BBox, Vec3};
use thiserror::Error;

/// Errors that can occur while loading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to parse OBJ file: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidIndex {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Mesh file contains no triangles: {0}")]
    Empty(String),
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - see `ensure_normals`)
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: BBox,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    ///
    /// Fails if any index points past the end of `positions`.
    pub fn new(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
    ) -> MeshResult<Self> {
        let vertex_count = positions.len();
        if let Some((i, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, index)| **index as usize >= vertex_count)
        {
            return Err(MeshError::InvalidIndex {
                face: i / 3,
                index,
                vertex_count,
            });
        }

        let bounds = positions
            .iter()
            .fold(BBox::EMPTY, |acc, &p| acc.union(&BBox::from_points(p, p)));

        Ok(Self {
            positions,
            normals,
            indices,
            bounds,
        })
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Faces are assumed counter-clockwise when seen from the front (the OBJ
    /// convention). Vertices that only touch degenerate faces get +Y.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for [i0, i1, i2] in self.faces() {
            let p0 = self.positions[i0];
            let p1 = self.positions[i1];
            let p2 = self.positions[i2];

            let face_normal = (p1 - p0).cross(p2 - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Ensure the mesh has one normal per vertex, computing them if necessary.
    pub fn ensure_normals(&mut self) {
        let should_compute = match &self.normals {
            None => true,
            Some(normals) => normals.len() != self.positions.len(),
        };

        if should_compute {
            if let Some(normals) = &self.normals {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    normals.len(),
                    self.positions.len()
                );
            }
            self.compute_normals();
        }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate over faces as vertex index triplets.
    pub fn faces(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
    }
}

/// Load every model of a Wavefront OBJ file into a single triangulated mesh.
///
/// Normals from the file are kept only when every model provides them.
pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    let mut all_have_normals = true;

    for model in &models {
        let mesh = &model.mesh;
        let base = positions.len() as u32;

        positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );

        if mesh.normals.len() == mesh.positions.len() {
            normals.extend(
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| Vec3::new(n[0], n[1], n[2])),
            );
        } else {
            all_have_normals = false;
        }

        indices.extend(mesh.indices.iter().map(|&i| i + base));
    }

    if indices.is_empty() {
        return Err(MeshError::Empty(path.display().to_string()));
    }

    let normals = (all_have_normals && normals.len() == positions.len()).then_some(normals);
    let mesh = Mesh::new(positions, indices, normals)?;

    log::info!(
        "Loaded {}: {} models, {} vertices, {} triangles",
        path.display(),
        models.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn unit_triangle() -> Mesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        Mesh::new(positions, vec![0, 1, 2], None).unwrap()
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = unit_triangle();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_mesh_rejects_bad_index() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let err = Mesh::new(positions, vec![0, 1, 2, 0, 2, 7], None).unwrap_err();

        match err {
            MeshError::InvalidIndex {
                face,
                index,
                vertex_count,
            } => {
                assert_eq!(face, 1);
                assert_eq!(index, 7);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_compute_normals() {
        // Counter-clockwise when viewed from +Z
        let mut mesh = unit_triangle();
        mesh.compute_normals();

        assert!(mesh.has_normals());
        for normal in mesh.normals.as_ref().unwrap() {
            assert!((normal.z - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_ensure_normals_replaces_mismatched() {
        let mut mesh = unit_triangle();
        mesh.normals = Some(vec![Vec3::X]);
        mesh.ensure_normals();

        assert_eq!(mesh.normals.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_bounds_computation() {
        let positions = vec![
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];

        let mesh = Mesh::new(positions, vec![0, 1, 2], None).unwrap();

        assert!((mesh.bounds.x0 - (-1.0)).abs() < 0.001);
        assert!((mesh.bounds.x1 - 4.0).abs() < 0.001);
        assert!((mesh.bounds.y0 - (-2.0)).abs() < 0.001);
        assert!((mesh.bounds.y1 - 5.0).abs() < 0.001);
        assert!((mesh.bounds.z0 - (-3.0)).abs() < 0.001);
        assert!((mesh.bounds.z1 - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_load_obj_quad_is_triangulated() {
        let path = std::env::temp_dir().join("lattice_core_quad_test.obj");
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4").unwrap();
        }

        let mesh = load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_load_obj_missing_file() {
        let result = load_obj("/definitely/not/here/missing.obj");
        assert!(result.is_err());
    }
}
