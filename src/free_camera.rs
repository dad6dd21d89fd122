//! A free-fly "ghost" camera: WASD translation along its own basis plus
//! mouse look, detached from anything in the scene.

use glam::{Mat4, Vec3};

use crate::camera::{
    self, Camera, DEFAULT_FOV, FOV_RANGE, LOOK_SENSITIVITY, PITCH_LIMIT, WORLD_UP,
};

/// Cruise speed in world units per second.
pub const FLY_SPEED: f32 = 10.0;

/// Speed while sprint is held.
pub const SPRINT_SPEED: f32 = 25.0;

/// Yaw pointing down -Z, matching the spherical basis below.
const DEFAULT_YAW: f32 = -90.0;

/// Translation directions relative to the camera basis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlyDirection {
    Forward,
    Backward,
    Left,
    Right,
}

/// A first-person fly camera with degree-based angles.
///
/// Shares the wrap and gate-then-clamp policies of
/// [`OrbitCamera`](crate::OrbitCamera) so switching between the two rigs
/// feels identical under the mouse.
#[derive(Clone, Debug)]
pub struct FreeCamera {
    pub position: Vec3,
    /// Horizontal angle in degrees, wrapped to [-360, 360].
    pub yaw: f32,
    /// Vertical angle in degrees, wrapped and optionally clamped.
    pub pitch: f32,
    /// Vertical field of view in degrees, kept inside [`FOV_RANGE`].
    pub fov: f32,
    pub sensitivity: f32,
    /// Current translation speed; toggled by [`FreeCamera::set_sprint`].
    pub speed: f32,
    pub world_up: Vec3,
    /// Look direction derived from yaw and pitch.
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl FreeCamera {
    pub fn new(position: Vec3) -> Self {
        let mut cam = Self {
            position,
            yaw: DEFAULT_YAW,
            pitch: 0.0,
            fov: DEFAULT_FOV,
            sensitivity: LOOK_SENSITIVITY,
            speed: FLY_SPEED,
            world_up: WORLD_UP,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: WORLD_UP,
        };
        cam.update_vectors();
        cam
    }

    /// Translates along the camera basis by `speed * dt`.
    pub fn fly(&mut self, direction: FlyDirection, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            FlyDirection::Forward => self.position += self.front * velocity,
            FlyDirection::Backward => self.position -= self.front * velocity,
            FlyDirection::Left => self.position -= self.right * velocity,
            FlyDirection::Right => self.position += self.right * velocity,
        }
    }

    /// Switches between cruise and sprint speed.
    pub fn set_sprint(&mut self, sprint: bool) {
        self.speed = if sprint { SPRINT_SPEED } else { FLY_SPEED };
    }

    /// Applies a mouse drag to yaw and pitch, mirroring
    /// [`OrbitCamera::rotate`](crate::OrbitCamera::rotate).
    pub fn look(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw = camera::wrap_degrees(self.yaw + dx * self.sensitivity);
        self.pitch = camera::wrap_degrees(self.pitch + dy * self.sensitivity);

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Narrows (positive delta) or widens the field of view, gated and
    /// clamped to [`FOV_RANGE`].
    pub fn adjust_zoom(&mut self, delta: f32) {
        self.fov = camera::gated_retreat(self.fov, delta, FOV_RANGE.0, FOV_RANGE.1);
    }

    /// View matrix looking along the current front vector.
    pub fn view_matrix(&self) -> Mat4 {
        camera::look_at(self.position, self.position + self.front, self.world_up)
    }

    /// Snapshot for the renderer and frustum overlay.
    pub fn camera(&self) -> Camera {
        Camera {
            position: self.position,
            front: self.front,
            right: self.right,
            up: self.up,
            fov: self.fov,
        }
    }

    /// Spherical-to-Cartesian basis rebuild from yaw and pitch.
    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orientation_looks_down_negative_z() {
        let cam = FreeCamera::new(Vec3::new(0.0, 2.0, 10.0));
        assert!((cam.front - Vec3::NEG_Z).length() < 1e-5);
        assert!((cam.right - Vec3::X).length() < 1e-5);
        assert!((cam.up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn flying_forward_moves_along_front() {
        let mut cam = FreeCamera::new(Vec3::ZERO);
        cam.fly(FlyDirection::Forward, 0.5);
        assert!((cam.position - Vec3::new(0.0, 0.0, -FLY_SPEED * 0.5)).length() < 1e-5);
        cam.fly(FlyDirection::Right, 0.1);
        assert!((cam.position.x - FLY_SPEED * 0.1).abs() < 1e-5);
    }

    #[test]
    fn sprint_scales_translation() {
        let mut cam = FreeCamera::new(Vec3::ZERO);
        cam.set_sprint(true);
        cam.fly(FlyDirection::Backward, 1.0);
        assert!((cam.position.z - SPRINT_SPEED).abs() < 1e-4);
        cam.set_sprint(false);
        assert_eq!(cam.speed, FLY_SPEED);
    }

    #[test]
    fn look_constrains_pitch_like_the_orbit_camera() {
        let mut cam = FreeCamera::new(Vec3::ZERO);
        cam.look(0.0, 5000.0, true);
        assert!((cam.pitch - PITCH_LIMIT).abs() < 1e-4);
        // Straight-up pitch still leaves a usable basis.
        assert!(cam.front.is_finite());
        assert!(cam.right.length() > 0.9);
    }

    #[test]
    fn yaw_wraps_at_full_turns() {
        let mut cam = FreeCamera::new(Vec3::ZERO);
        // -90 start + 455 degrees of drag folds back under 360.
        cam.look(4550.0, 0.0, true);
        assert!(cam.yaw <= 360.0 && cam.yaw >= -360.0);
        assert!((cam.yaw - 5.0).abs() < 1e-3);
    }

    #[test]
    fn view_matrix_sends_a_point_ahead_to_negative_z() {
        let cam = FreeCamera::new(Vec3::new(0.0, 2.0, 10.0));
        let ahead = cam.view_matrix() * glam::Vec4::new(0.0, 2.0, 3.0, 1.0);
        assert!((ahead.truncate() - Vec3::new(0.0, 0.0, -7.0)).length() < 1e-4);
    }
}
