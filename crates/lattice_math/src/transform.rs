// Transform utilities for Mat4
//
// Extends glam::Mat4 with the operations instances need.
// Note: glam::Mat4 already provides transform_point3(), transform_vector3() and inverse()

use glam::{Mat4, Vec3};
use crate::BBox;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a surface normal. `self` must be the INVERSE of the matrix
    /// that moved the surface; the normal is multiplied by its transpose and
    /// renormalized.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_bbox(&self, bbox: &BBox) -> BBox;
}

impl Mat4Ext for Mat4 {
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        // Only the upper 3x3 takes part: normals have an implicit w=0
        self.transpose().transform_vector3(normal).normalize()
    }

    fn transform_bbox(&self, bbox: &BBox) -> BBox {
        bbox.corners()
            .iter()
            .map(|&corner| self.transform_point3(corner))
            .fold(BBox::EMPTY, |acc, p| acc.union(&BBox::from_points(p, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_bbox_identity() {
        let bbox = BBox::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = Mat4::IDENTITY.transform_bbox(&bbox);

        assert!((transformed.min() - bbox.min()).length() < 0.001);
        assert!((transformed.max() - bbox.max()).length() < 0.001);
    }

    #[test]
    fn test_transform_bbox_translation() {
        let mat = Mat4::from_translation(Vec3::new(5.0, 5.0, 5.0));
        let bbox = BBox::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_bbox(&bbox);

        assert!((transformed.min() - Vec3::new(5.0, 5.0, 5.0)).length() < 0.001);
        assert!((transformed.max() - Vec3::new(6.0, 6.0, 6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_bbox_rotation_grows() {
        use std::f32::consts::FRAC_PI_4;

        let mat = Mat4::from_rotation_z(FRAC_PI_4);
        let bbox = BBox::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let transformed = mat.transform_bbox(&bbox);

        let half_diagonal = 2.0_f32.sqrt();
        assert!((transformed.x1 - half_diagonal).abs() < 0.001);
        assert!((transformed.y0 + half_diagonal).abs() < 0.001);
        assert!((transformed.z1 - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_transform_normal_nonuniform_scale() {
        // Plane x + y = 0 has normal (1, 1, 0)/sqrt(2). Scaling x by 2 turns it
        // into x/2 + y = 0 whose normal is (1, 2, 0)/sqrt(5).
        let forward = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let inverse = forward.inverse();
        let n = inverse.transform_normal(Vec3::new(1.0, 1.0, 0.0).normalize());

        let expected = Vec3::new(1.0, 2.0, 0.0).normalize();
        assert!((n - expected).length() < 0.001);
    }

    #[test]
    fn test_transform_normal_ignores_translation() {
        let inverse = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0)).inverse();
        let n = inverse.transform_normal(Vec3::Y);
        assert!((n - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_mat4_rotation_inverse() {
        use std::f32::consts::PI;

        let mat = Mat4::from_rotation_y(PI / 4.0); // 45 degrees
        let inv = mat.inverse();

        let point = Vec3::new(5.0, 3.0, 2.0);
        let transformed = mat.transform_point3(point);
        let back = inv.transform_point3(transformed);

        assert!((back - point).length() < 0.001);
    }
}
