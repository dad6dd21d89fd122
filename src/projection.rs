//! Hand-assembled projection matrices and the derived frustum extents.
//!
//! Both builders write their non-zero elements explicitly, column-major in
//! the OpenGL clip convention (z mapped to [-1, 1]). The renderer converts
//! to wgpu's [0, 1] depth range at upload time (see
//! [`mesh_pass::OPENGL_TO_WGPU`](crate::mesh_pass::OPENGL_TO_WGPU)), which
//! keeps the matrices here bit-for-bit checkable against the textbook forms.
//!
//! Degenerate parameters are rejected up front with a [`ProjectionError`]
//! instead of silently dividing by zero.

use glam::{Mat4, Vec4};

/// Rejected projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    /// Perspective near plane must be positive.
    NonPositiveNear(f32),
    /// Far plane must lie strictly beyond the near plane.
    FarNotBeyondNear { near: f32, far: f32 },
    /// Aspect ratio must be positive.
    NonPositiveAspect(f32),
    /// Orthographic volume collapsed on one axis.
    DegenerateExtent(&'static str),
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionError::NonPositiveNear(near) => {
                write!(f, "near plane must be positive, got {}", near)
            }
            ProjectionError::FarNotBeyondNear { near, far } => {
                write!(f, "far plane {} must be beyond near plane {}", far, near)
            }
            ProjectionError::NonPositiveAspect(aspect) => {
                write!(f, "aspect ratio must be positive, got {}", aspect)
            }
            ProjectionError::DegenerateExtent(axis) => {
                write!(f, "orthographic volume has zero size on {}", axis)
            }
        }
    }
}

impl std::error::Error for ProjectionError {}

/// Perspective projection with an explicit element layout.
///
/// `fovy` is the vertical field of view in radians. With the half-angle
/// tangent `t = tan(fovy / 2)` the non-zero elements are
///
/// ```text
/// m[0][0] = 1 / (t * aspect)      m[2][2] = -(far + near) / (far - near)
/// m[1][1] = 1 / t                 m[3][2] = -2 * far * near / (far - near)
///                                 m[2][3] = -1
/// ```
pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4, ProjectionError> {
    if near <= 0.0 {
        return Err(ProjectionError::NonPositiveNear(near));
    }
    if far <= near {
        return Err(ProjectionError::FarNotBeyondNear { near, far });
    }
    if aspect <= 0.0 {
        return Err(ProjectionError::NonPositiveAspect(aspect));
    }

    let t = (fovy / 2.0).tan();
    let depth = far - near;

    Ok(Mat4::from_cols(
        Vec4::new(1.0 / (t * aspect), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0 / t, 0.0, 0.0),
        Vec4::new(0.0, 0.0, -(far + near) / depth, -1.0),
        Vec4::new(0.0, 0.0, -2.0 * far * near / depth, 0.0),
    ))
}

/// Orthographic projection over the box `[l, r] × [b, t] × [near, far]`.
///
/// Diagonal scales `2 / (r - l)` style, translation column
/// `-(r + l) / (r - l)` style, with the usual z negation.
pub fn orthographic(
    l: f32,
    r: f32,
    b: f32,
    t: f32,
    near: f32,
    far: f32,
) -> Result<Mat4, ProjectionError> {
    if l == r {
        return Err(ProjectionError::DegenerateExtent("x"));
    }
    if b == t {
        return Err(ProjectionError::DegenerateExtent("y"));
    }
    if near == far {
        return Err(ProjectionError::DegenerateExtent("z"));
    }

    Ok(Mat4::from_cols(
        Vec4::new(2.0 / (r - l), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 / (t - b), 0.0, 0.0),
        Vec4::new(0.0, 0.0, -2.0 / (far - near), 0.0),
        Vec4::new(
            -(r + l) / (r - l),
            -(t + b) / (t - b),
            -(far + near) / (far - near),
            1.0,
        ),
    ))
}

/// Half-extents of a perspective frustum on its near plane, plus the clip
/// distances needed to scale them out to the far plane.
///
/// Feeds the frustum overlay and the on-screen camera diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrustumExtents {
    pub near: f32,
    pub far: f32,
    /// Half-height of the near plane: `tan(fovy / 2) * near`.
    pub top_near: f32,
    /// Half-width of the near plane: `top_near * aspect`.
    pub right_near: f32,
}

impl FrustumExtents {
    /// Derives extents from a vertical field of view in radians.
    pub fn new(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        let top_near = (fovy / 2.0).tan() * near;
        Self {
            near,
            far,
            top_near,
            right_near: top_near * aspect,
        }
    }

    /// Half-height of the far plane (similar triangles from the near plane).
    pub fn top_far(&self) -> f32 {
        self.top_near * self.far / self.near
    }

    /// Half-width of the far plane.
    pub fn right_far(&self) -> f32 {
        self.right_near * self.far / self.near
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn square_ninety_degree_perspective_has_unit_focal_terms() {
        let m = perspective(FRAC_PI_2, 1.0, 0.1, 100.0).unwrap();
        let cols = m.to_cols_array_2d();
        assert!((cols[0][0] - 1.0).abs() < 1e-5);
        assert!((cols[1][1] - 1.0).abs() < 1e-5);
        assert!((cols[2][3] + 1.0).abs() < 1e-6);
        assert_eq!(cols[3][3], 0.0);
    }

    #[test]
    fn perspective_depth_terms_match_the_closed_form() {
        let (near, far) = (0.1, 250.0);
        let m = perspective(FRAC_PI_2, 1.5, near, far).unwrap();
        let cols = m.to_cols_array_2d();
        assert!((cols[2][2] + (far + near) / (far - near)).abs() < 1e-5);
        assert!((cols[3][2] + 2.0 * far * near / (far - near)).abs() < 1e-5);
    }

    #[test]
    fn perspective_maps_the_near_plane_to_minus_one() {
        let m = perspective(FRAC_PI_2, 1.0, 0.1, 100.0).unwrap();
        let clip = m * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert!((clip.z / clip.w + 1.0).abs() < 1e-5);
        let clip = m * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert!((clip.z / clip.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn perspective_rejects_degenerate_parameters() {
        assert_eq!(
            perspective(FRAC_PI_2, 1.0, 0.0, 100.0),
            Err(ProjectionError::NonPositiveNear(0.0))
        );
        assert_eq!(
            perspective(FRAC_PI_2, 1.0, 1.0, 0.5),
            Err(ProjectionError::FarNotBeyondNear {
                near: 1.0,
                far: 0.5
            })
        );
        assert_eq!(
            perspective(FRAC_PI_2, 0.0, 0.1, 100.0),
            Err(ProjectionError::NonPositiveAspect(0.0))
        );
    }

    #[test]
    fn unit_ortho_maps_its_near_corner_onto_the_clip_corner() {
        let m = orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 100.0).unwrap();
        let corner = m * Vec4::new(1.0, 1.0, -0.1, 1.0);
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
        assert!((corner.z + 1.0).abs() < 1e-5);
        assert!((corner.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ortho_is_affine_in_depth() {
        let m = orthographic(-5.0, 5.0, -5.0, 5.0, 0.1, 250.0).unwrap();
        let far = m * Vec4::new(0.0, 0.0, -250.0, 1.0);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn ortho_rejects_collapsed_volumes() {
        assert!(orthographic(1.0, 1.0, -1.0, 1.0, 0.1, 1.0).is_err());
        assert!(orthographic(-1.0, 1.0, 2.0, 2.0, 0.1, 1.0).is_err());
        assert!(orthographic(-1.0, 1.0, -1.0, 1.0, 5.0, 5.0).is_err());
    }

    #[test]
    fn extents_scale_linearly_to_the_far_plane() {
        let ext = FrustumExtents::new(FRAC_PI_2, 2.0, 1.0, 10.0);
        assert!((ext.top_near - 1.0).abs() < 1e-5);
        assert!((ext.right_near - 2.0).abs() < 1e-5);
        assert!((ext.top_far() - 10.0).abs() < 1e-4);
        assert!((ext.right_far() - 20.0).abs() < 1e-4);
    }
}
