//! World-space view-frustum corners and the translucent hexahedron drawn
//! over the orthographic monitor views.

use glam::{Mat4, Vec3, Vec4};

use crate::mesh::Vertex3d;
use crate::projection::FrustumExtents;

/// Padding applied along camera-space z so the overlay never z-fights the
/// clip planes it outlines: the near face sits just inside the near plane,
/// the far face just outside the far plane.
pub const PLANE_PADDING: f32 = 0.01;

/// Alpha used when the renderer draws the frustum volume.
pub const FRUSTUM_ALPHA: f32 = 0.6;

/// The eight corners of a perspective frustum in world space.
///
/// Corner order within each plane is right-top, left-top, right-bottom,
/// left-bottom.
#[derive(Clone, Copy, Debug)]
pub struct FrustumCorners {
    pub near: [Vec3; 4],
    pub far: [Vec3; 4],
}

impl FrustumCorners {
    /// Computes the corners from the frustum extents and the inverse of the
    /// camera's view matrix.
    ///
    /// Corners are laid out in camera space at `z = -near + PADDING` and
    /// `z = -far - PADDING`, then carried to world space by `view_inverse`.
    pub fn from_extents(extents: &FrustumExtents, view_inverse: Mat4) -> Self {
        let (rn, tn) = (extents.right_near, extents.top_near);
        let (rf, tf) = (extents.right_far(), extents.top_far());
        let zn = -extents.near + PLANE_PADDING;
        let zf = -extents.far - PLANE_PADDING;

        let to_world = |x: f32, y: f32, z: f32| (view_inverse * Vec4::new(x, y, z, 1.0)).truncate();

        Self {
            near: [
                to_world(rn, tn, zn),
                to_world(-rn, tn, zn),
                to_world(rn, -tn, zn),
                to_world(-rn, -tn, zn),
            ],
            far: [
                to_world(rf, tf, zf),
                to_world(-rf, tf, zf),
                to_world(rf, -tf, zf),
                to_world(-rf, -tf, zf),
            ],
        }
    }

    /// Expands the corners into a renderable hexahedron: four vertices per
    /// face, six faces, two triangles each (24 vertices, 36 indices).
    pub fn geometry(&self) -> (Vec<Vertex3d>, Vec<u32>) {
        let [rtn, ltn, rbn, lbn] = self.near;
        let [rtf, ltf, rbf, lbf] = self.far;

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        let mut face = |a: Vec3, b: Vec3, c: Vec3, d: Vec3| {
            let normal = (b - a).cross(c - a).normalize_or_zero().to_array();
            let base = vertices.len() as u32;
            vertices.push(Vertex3d::new(a.to_array(), normal, [1.0, 1.0]));
            vertices.push(Vertex3d::new(b.to_array(), normal, [1.0, 0.0]));
            vertices.push(Vertex3d::new(c.to_array(), normal, [0.0, 0.0]));
            vertices.push(Vertex3d::new(d.to_array(), normal, [0.0, 1.0]));
            indices.extend_from_slice(&[base, base + 1, base + 3, base + 1, base + 2, base + 3]);
        };

        face(rtn, rbn, lbn, ltn); // near
        face(rtf, rbf, lbf, ltf); // far
        face(rtn, rbn, rbf, rtf); // right
        face(ltn, lbn, lbf, ltf); // left
        face(rtn, rtf, ltf, ltn); // top
        face(rbn, rbf, lbf, lbn); // bottom

        (vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_view_leaves_corners_in_camera_space() {
        let extents = FrustumExtents::new(FRAC_PI_2, 1.0, 1.0, 10.0);
        let corners = FrustumCorners::from_extents(&extents, Mat4::IDENTITY);

        let expected_near = Vec3::new(1.0, 1.0, -1.0 + PLANE_PADDING);
        assert!((corners.near[0] - expected_near).length() < 1e-5);
        let expected_far = Vec3::new(-10.0, -10.0, -10.0 - PLANE_PADDING);
        assert!((corners.far[3] - expected_far).length() < 1e-4);
    }

    #[test]
    fn near_corners_mirror_across_the_view_axis() {
        let extents = FrustumExtents::new(FRAC_PI_2, 2.0, 0.5, 50.0);
        let corners = FrustumCorners::from_extents(&extents, Mat4::IDENTITY);
        assert_eq!(corners.near[0].x, -corners.near[1].x);
        assert_eq!(corners.near[0].y, -corners.near[2].y);
        // Same depth across a plane.
        for c in &corners.near {
            assert!((c.z - corners.near[0].z).abs() < 1e-6);
        }
    }

    #[test]
    fn translated_view_carries_corners_into_world_space() {
        let extents = FrustumExtents::new(FRAC_PI_2, 1.0, 1.0, 10.0);
        let eye = Vec3::new(3.0, -2.0, 7.0);
        let view = Mat4::from_translation(-eye);
        let corners = FrustumCorners::from_extents(&extents, view.inverse());
        let expected = Vec3::new(1.0, 1.0, -1.0 + PLANE_PADDING) + eye;
        assert!((corners.near[0] - expected).length() < 1e-4);
    }

    #[test]
    fn geometry_is_a_closed_hexahedron() {
        let extents = FrustumExtents::new(FRAC_PI_2, 1.0, 0.1, 250.0);
        let corners = FrustumCorners::from_extents(&extents, Mat4::IDENTITY);
        let (vertices, indices) = corners.geometry();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }
}
