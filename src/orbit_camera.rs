//! A follow camera that orbits a target point at a bounded distance.
//!
//! The orbit position is not derived from spherical trigonometry but from a
//! short matrix chain: a distance offset along +Z is pitched about world X,
//! yawed about world Y (negated, so dragging right orbits right), and finally
//! translated onto the target. Pitch sits innermost in the chain; reordering
//! it changes which great circle the camera travels.

use glam::{Mat4, Vec3, Vec4};

use crate::camera::{
    self, Camera, DEFAULT_FOV, FOV_RANGE, LOOK_SENSITIVITY, PITCH_LIMIT, WORLD_UP,
};

/// Distance limits (world units) between the camera and its target.
pub const DISTANCE_RANGE: (f32, f32) = (3.0, 20.0);

/// A camera that follows a target from a clamped distance.
///
/// # Example
/// ```
/// use bathyscope::{OrbitCamera, Vec3};
///
/// let mut orbit = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
/// orbit.rotate(120.0, -40.0, true);
/// orbit.adjust_distance(-0.5);
/// let view = orbit.view_matrix();
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera follows.
    pub target: Vec3,
    /// Distance from the target, kept inside [`DISTANCE_RANGE`].
    pub distance: f32,
    /// Horizontal angle in degrees, wrapped to [-360, 360].
    pub yaw: f32,
    /// Vertical angle in degrees, wrapped to [-360, 360] and optionally
    /// clamped to ±[`PITCH_LIMIT`].
    pub pitch: f32,
    /// Vertical field of view in degrees, kept inside [`FOV_RANGE`].
    pub fov: f32,
    /// Mouse sensitivity in degrees per pixel.
    pub sensitivity: f32,
    /// World up direction.
    pub world_up: Vec3,
    /// Derived eye position; recomputed after every parameter change.
    pub position: Vec3,
    /// Unit vector from the target toward the eye.
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl OrbitCamera {
    /// Creates an orbit camera at `position` following `target`.
    ///
    /// The initial distance is taken from the separation of the two points;
    /// yaw and pitch start at zero, which places the eye on the target's +Z
    /// axis at that distance.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut cam = Self {
            target,
            distance: (position - target).length(),
            yaw: 0.0,
            pitch: 0.0,
            fov: DEFAULT_FOV,
            sensitivity: LOOK_SENSITIVITY,
            world_up: WORLD_UP,
            position,
            front: Vec3::Z,
            right: Vec3::X,
            up: WORLD_UP,
        };
        cam.update_position();
        cam
    }

    /// Moves the follow target and recomputes the orbit position around it.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.update_position();
    }

    /// Applies a mouse drag to yaw and pitch.
    ///
    /// Offsets are in pixels and scaled by the sensitivity. Both angles wrap
    /// to [-360, 360]; when `constrain_pitch` is set, pitch is additionally
    /// clamped to ±[`PITCH_LIMIT`] so the orbit cannot flip over the pole.
    pub fn rotate(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw = camera::wrap_degrees(self.yaw + dx * self.sensitivity);
        self.pitch = camera::wrap_degrees(self.pitch + dy * self.sensitivity);

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_position();
    }

    /// Pulls the camera in (positive delta) or pushes it out (negative),
    /// gated and clamped to [`DISTANCE_RANGE`].
    pub fn adjust_distance(&mut self, delta: f32) {
        self.distance =
            camera::gated_retreat(self.distance, delta, DISTANCE_RANGE.0, DISTANCE_RANGE.1);
        self.update_position();
    }

    /// Narrows (positive delta) or widens the field of view, gated and
    /// clamped to [`FOV_RANGE`]. Does not move the camera.
    pub fn adjust_zoom(&mut self, delta: f32) {
        self.fov = camera::gated_retreat(self.fov, delta, FOV_RANGE.0, FOV_RANGE.1);
    }

    /// View matrix looking from the orbit position at the target.
    pub fn view_matrix(&self) -> Mat4 {
        camera::look_at(self.position, self.target, self.world_up)
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

    /// Rebuilds the eye position from target, distance, yaw and pitch.
    ///
    /// Offset chain, innermost first: (0, 0, distance, 1) rotated by pitch
    /// about X, by -yaw about Y, then translated onto the target.
    fn update_position(&mut self) {
        let offset = Vec4::new(0.0, 0.0, self.distance, 1.0);
        let orbit = Mat4::from_translation(self.target)
            * Mat4::from_rotation_y((-self.yaw).to_radians())
            * Mat4::from_rotation_x(self.pitch.to_radians());
        self.position = (orbit * offset).truncate();
        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        self.front = (self.position - self.target).normalize();
        self.right = self.world_up.cross(self.front).normalize();
        self.up = self.front.cross(self.right).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() < eps, "expected {} ≈ {}", a, b);
    }

    #[test]
    fn starts_on_the_target_z_axis() {
        let cam = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        assert!((cam.position - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-5);
        assert_near(cam.distance, 6.0, 1e-6);
    }

    #[test]
    fn distance_invariant_holds_after_every_update() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 5.0, 2.0), Vec3::ZERO);
        cam.rotate(237.0, -118.0, true);
        assert_near((cam.position - cam.target).length(), cam.distance, 1e-4);

        cam.adjust_distance(-2.5);
        assert_near((cam.position - cam.target).length(), cam.distance, 1e-4);

        cam.set_target(Vec3::new(4.0, -1.0, 9.0));
        assert_near((cam.position - cam.target).length(), cam.distance, 1e-4);
    }

    #[test]
    fn distance_stays_inside_its_range() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        for _ in 0..100 {
            cam.adjust_distance(-1.0);
        }
        assert_near(cam.distance, DISTANCE_RANGE.1, 1e-6);
        for _ in 0..100 {
            cam.adjust_distance(1.0);
        }
        assert_near(cam.distance, DISTANCE_RANGE.0, 1e-6);
    }

    #[test]
    fn zoom_stays_inside_its_range() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        for _ in 0..100 {
            cam.adjust_zoom(1.0);
        }
        assert_near(cam.fov, FOV_RANGE.0, 1e-6);
        for _ in 0..200 {
            cam.adjust_zoom(-1.0);
        }
        assert_near(cam.fov, FOV_RANGE.1, 1e-6);
    }

    #[test]
    fn yaw_wraps_instead_of_accumulating() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        // 0.1 sensitivity: 3650 px of drag is 365 degrees of yaw.
        cam.rotate(3650.0, 0.0, true);
        assert!(cam.yaw <= 360.0 && cam.yaw >= -360.0);
        assert_near(cam.yaw, 5.0, 1e-3);
    }

    #[test]
    fn pitch_clamps_only_when_constrained() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        cam.rotate(0.0, 2000.0, true);
        assert_near(cam.pitch, PITCH_LIMIT, 1e-4);

        let mut free = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        free.rotate(0.0, 2000.0, false);
        assert_near(free.pitch, 200.0, 1e-3);
    }

    #[test]
    fn positive_pitch_swings_the_eye_below_the_target() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        // 30 degrees of pitch at 0.1 sensitivity.
        cam.rotate(0.0, 300.0, true);
        let expected = Vec3::new(
            0.0,
            -6.0 * 30.0_f32.to_radians().sin(),
            6.0 * 30.0_f32.to_radians().cos(),
        );
        assert!((cam.position - expected).length() < 1e-4);
    }

    #[test]
    fn view_matrix_inverse_recovers_the_eye() {
        let mut cam = OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO);
        cam.rotate(421.0, -133.0, true);
        let recovered = cam.view_matrix().inverse() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((recovered.truncate() - cam.position).length() < 1e-4);
    }
}
