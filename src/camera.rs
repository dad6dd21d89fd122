//! Shared camera math: angle bookkeeping, the gated clamp used by every
//! camera parameter, and the hand-built look-at matrix.
//!
//! Both [`OrbitCamera`](crate::OrbitCamera) and [`FreeCamera`](crate::FreeCamera)
//! keep their angles in degrees and funnel every parameter change through the
//! helpers here, so the two controllers stay numerically identical where their
//! behavior overlaps (look sensitivity, angle wrapping, zoom limits).

use glam::{Mat4, Vec3, Vec4};

/// World-space up direction shared by every camera.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Mouse-look sensitivity in degrees per pixel of cursor travel.
pub const LOOK_SENSITIVITY: f32 = 0.1;

/// Default vertical field of view in degrees.
pub const DEFAULT_FOV: f32 = 45.0;

/// Field-of-view limits in degrees.
pub const FOV_RANGE: (f32, f32) = (1.0, 90.0);

/// Pitch limit (degrees) applied when pitch constraining is requested.
pub const PITCH_LIMIT: f32 = 89.0;

/// Folds an accumulated angle back into [-360, 360] degrees.
///
/// Deltas arrive a few degrees at a time, so a single fold per update is
/// enough to keep the angle bounded.
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut angle = angle;
    if angle > 360.0 {
        angle -= 360.0;
    }
    if angle < -360.0 {
        angle += 360.0;
    }
    angle
}

/// Subtracts `delta` from `value` only while `value` currently sits inside
/// `[min, max]`, then clamps the result into that range.
///
/// The gate makes the limits sticky in one direction: once a parameter rests
/// on a bound, deltas pushing further out are absorbed by the clamp, while
/// deltas pulling back in take effect immediately.
pub fn gated_retreat(value: f32, delta: f32, min: f32, max: f32) -> f32 {
    let mut value = value;
    if value >= min && value <= max {
        value -= delta;
    }
    value.clamp(min, max)
}

/// Builds a right-handed view matrix from an explicit orthonormal basis.
///
/// The basis is constructed by hand rather than delegated to
/// [`Mat4::look_at_rh`]: the camera-space z axis points from the target back
/// toward the eye, x is the normalized cross of world-up with z, and y closes
/// the frame. The rotation rows and the rotated translation are written
/// straight into the columns.
pub fn look_at(position: Vec3, target: Vec3, world_up: Vec3) -> Mat4 {
    let z = (position - target).normalize();
    let x = world_up.normalize().cross(z).normalize();
    let y = z.cross(x).normalize();

    Mat4::from_cols(
        Vec4::new(x.x, y.x, z.x, 0.0),
        Vec4::new(x.y, y.y, z.y, 0.0),
        Vec4::new(x.z, y.z, z.z, 0.0),
        Vec4::new(-x.dot(position), -y.dot(position), -z.dot(position), 1.0),
    )
}

/// A per-frame snapshot of whichever camera is in control.
///
/// The renderer and the frustum overlay consume this instead of poking at the
/// controllers directly.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Orientation basis. For the follow camera `front` points from the
    /// target toward the eye; for the ghost camera it is the look direction.
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
}
