//! The camera rig: one tagged switch between the ghost and follow cameras.
//!
//! Everything downstream of the rig (monitors, frustum overlay, the drawn
//! camera model) asks the rig rather than branching on which controller is
//! live. Both controllers stay resident so toggling back restores the
//! previous viewpoint.

use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::free_camera::FreeCamera;
use crate::orbit_camera::OrbitCamera;
use crate::projection::FrustumExtents;

/// Which controller is driving the result view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Free-fly ghost camera.
    Ghost,
    /// Target-following orbit camera.
    Follow,
}

/// Offset of the drawn camera model along the active camera's front vector.
const MODEL_OFFSET: f32 = 1.4;

/// Holds both camera controllers and the switch between them.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub ghost: FreeCamera,
    pub follow: OrbitCamera,
    pub mode: CameraMode,
    /// Near clip distance shared by every monitor.
    pub near: f32,
    /// Far clip distance shared by every monitor.
    pub far: f32,
}

impl CameraRig {
    pub fn new(ghost: FreeCamera, follow: OrbitCamera) -> Self {
        Self {
            ghost,
            follow,
            mode: CameraMode::Follow,
            near: 0.1,
            far: 250.0,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            CameraMode::Ghost => CameraMode::Follow,
            CameraMode::Follow => CameraMode::Ghost,
        };
    }

    pub fn is_ghost(&self) -> bool {
        self.mode == CameraMode::Ghost
    }

    /// View matrix of the active controller.
    pub fn view_matrix(&self) -> Mat4 {
        match self.mode {
            CameraMode::Ghost => self.ghost.view_matrix(),
            CameraMode::Follow => self.follow.view_matrix(),
        }
    }

    /// Snapshot of the active controller.
    pub fn camera(&self) -> Camera {
        match self.mode {
            CameraMode::Ghost => self.ghost.camera(),
            CameraMode::Follow => self.follow.camera(),
        }
    }

    /// Vertical field of view of the active controller, in degrees.
    pub fn fov(&self) -> f32 {
        self.camera().fov
    }

    /// Routes a mouse drag to the active controller.
    pub fn look(&mut self, dx: f32, dy: f32) {
        match self.mode {
            CameraMode::Ghost => self.ghost.look(dx, dy, true),
            CameraMode::Follow => self.follow.rotate(dx, dy, true),
        }
    }

    /// Routes a zoom delta to the active controller.
    pub fn adjust_zoom(&mut self, delta: f32) {
        match self.mode {
            CameraMode::Ghost => self.ghost.adjust_zoom(delta),
            CameraMode::Follow => self.follow.adjust_zoom(delta),
        }
    }

    /// Frustum extents of the active view at the given aspect ratio.
    pub fn frustum_extents(&self, aspect: f32) -> FrustumExtents {
        FrustumExtents::new(self.fov().to_radians(), aspect, self.near, self.far)
    }

    /// Placement of the drawn camera model: world position plus the yaw and
    /// pitch (degrees) it is rotated by.
    ///
    /// The model trails [`MODEL_OFFSET`] units behind the eye so the body
    /// shows up in the axis monitors without blocking the lens. The two
    /// controllers' front vectors point opposite ways (the follow camera's
    /// points back at the eye), so the sign flips between modes.
    pub fn model_anchor(&self) -> (Vec3, f32, f32) {
        match self.mode {
            CameraMode::Ghost => {
                let cam = &self.ghost;
                (
                    cam.position - cam.front * MODEL_OFFSET,
                    cam.yaw,
                    cam.pitch,
                )
            }
            CameraMode::Follow => {
                let cam = &self.follow;
                (
                    cam.position + cam.front * MODEL_OFFSET,
                    cam.yaw,
                    cam.pitch,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(
            FreeCamera::new(Vec3::new(0.0, 2.0, 10.0)),
            OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO),
        )
    }

    #[test]
    fn toggling_preserves_both_controllers() {
        let mut rig = rig();
        rig.look(500.0, 0.0); // moves only the follow camera
        let follow_yaw = rig.follow.yaw;
        assert!(follow_yaw != 0.0);

        rig.toggle_mode();
        assert!(rig.is_ghost());
        rig.look(-300.0, 0.0); // moves only the ghost camera
        assert_eq!(rig.follow.yaw, follow_yaw);

        rig.toggle_mode();
        assert_eq!(rig.follow.yaw, follow_yaw);
    }

    #[test]
    fn zoom_routes_to_the_active_controller() {
        let mut rig = rig();
        rig.adjust_zoom(5.0);
        assert_eq!(rig.follow.fov, 40.0);
        assert_eq!(rig.ghost.fov, 45.0);

        rig.toggle_mode();
        rig.adjust_zoom(-5.0);
        assert_eq!(rig.ghost.fov, 50.0);
        assert_eq!(rig.follow.fov, 40.0);
    }

    #[test]
    fn view_matrix_switches_with_the_mode() {
        let mut rig = rig();
        let follow_view = rig.view_matrix();
        rig.toggle_mode();
        assert_ne!(rig.view_matrix(), follow_view);
        assert_eq!(rig.view_matrix(), rig.ghost.view_matrix());
    }

    #[test]
    fn model_anchor_trails_behind_the_eye_in_both_modes() {
        let mut rig = rig();
        // Follow camera at (0,0,6) looking at the origin: front = +Z, body
        // behind the eye along +Z.
        let (anchor, _, _) = rig.model_anchor();
        assert!((anchor - Vec3::new(0.0, 0.0, 7.4)).length() < 1e-4);

        rig.toggle_mode();
        // Ghost at (0,2,10) looking down -Z: body behind the eye along +Z.
        let (anchor, _, _) = rig.model_anchor();
        assert!((anchor - Vec3::new(0.0, 2.0, 11.4)).length() < 1e-4);
    }

    #[test]
    fn frustum_extents_track_the_active_fov() {
        let mut rig = rig();
        rig.follow.adjust_zoom(-45.0); // fov 90
        let ext = rig.frustum_extents(1.0);
        assert!((ext.top_near - rig.near).abs() < 1e-5);
        assert_eq!(ext.far, rig.far);
    }
}
