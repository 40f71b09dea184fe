//! Lattice Core - scene assets consumed by the renderer.
//!
//! This crate provides:
//!
//! - **Meshes**: `Mesh` triangle soups with optional vertex normals
//! - **OBJ loading**: `load_obj` with typed errors
//!
//! # Example
//!
//! ```ignore
//! use lattice_core::load_obj;
//!
//! let mut mesh = load_obj("bunny.obj")?;
//! mesh.ensure_normals();
//! println!("Loaded {} triangles", mesh.triangle_count());
//! ```

pub mod mesh;

// Re-export commonly used types
pub use mesh::{load_obj, Mesh, MeshError, MeshResult};
