// Re-export glam for convenience
pub use glam::*;

// Lattice math types
mod bbox;
mod ray;
mod transform;

pub use bbox::{slab, BBox};
pub use ray::Ray;
pub use transform::Mat4Ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_reexports_compose() {
        let bbox = BBox::from_points(Vec3::ZERO, Vec3::ONE);
        let moved = Mat4::from_translation(Vec3::X).transform_bbox(&bbox);
        assert_eq!(moved.x0, 1.0);
        assert_eq!(moved.x1, 2.0);
    }
}
