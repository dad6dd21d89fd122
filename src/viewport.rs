//! Monitor selection and viewport layout.
//!
//! Each [`Monitor`] is one way of watching the active camera: three
//! orthographic views looking in along a world axis, plus the camera's own
//! perspective "result" view. A [`ScreenMode`] shows either one monitor
//! fullscreen or all four tiled in a 2x2 grid.

use glam::{Mat4, Vec3};

use crate::camera::{self, WORLD_UP};
use crate::projection::{self, ProjectionError};

/// Distance of the axis monitors' eye from the watched point.
const MONITOR_OFFSET: f32 = 15.0;

/// Orthographic half-extent on the larger window axis.
const ORTHO_EXTENT: f32 = 5.0;

/// One of the four ways of watching the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Monitor {
    /// Looking in along +X.
    Side,
    /// Looking down along +Y.
    Top,
    /// Looking in along +Z.
    Front,
    /// The active camera's own perspective view.
    Result,
}

/// Which monitors are on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenMode {
    Single(Monitor),
    /// All four monitors in a 2x2 grid: side top-left, top top-right,
    /// front bottom-left, result bottom-right.
    Quad,
}

impl ScreenMode {
    /// The monitors this mode draws, in grid order.
    pub fn monitors(&self) -> &[Monitor] {
        match self {
            ScreenMode::Single(monitor) => std::slice::from_ref(monitor),
            ScreenMode::Quad => &[Monitor::Side, Monitor::Top, Monitor::Front, Monitor::Result],
        }
    }
}

/// A viewport rectangle in surface pixels, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The screen rectangle a monitor occupies under the given mode.
pub fn viewport_rect(mode: ScreenMode, monitor: Monitor, width: f32, height: f32) -> ViewportRect {
    match mode {
        ScreenMode::Single(_) => ViewportRect {
            x: 0.0,
            y: 0.0,
            width,
            height,
        },
        ScreenMode::Quad => {
            let (w, h) = (width / 2.0, height / 2.0);
            let (x, y) = match monitor {
                Monitor::Side => (0.0, 0.0),
                Monitor::Top => (w, 0.0),
                Monitor::Front => (0.0, h),
                Monitor::Result => (w, h),
            };
            ViewportRect {
                x,
                y,
                width: w,
                height: h,
            }
        }
    }
}

/// View matrix for a monitor.
///
/// Axis monitors watch `focus` (the active camera's position) from
/// [`MONITOR_OFFSET`] units out along their axis; the top view needs a
/// non-vertical up vector. The result monitor reuses `result_view`.
pub fn monitor_view(monitor: Monitor, focus: Vec3, result_view: Mat4) -> Mat4 {
    match monitor {
        Monitor::Side => camera::look_at(focus + Vec3::X * MONITOR_OFFSET, focus, WORLD_UP),
        Monitor::Top => camera::look_at(focus + Vec3::Y * MONITOR_OFFSET, focus, Vec3::NEG_Z),
        Monitor::Front => camera::look_at(focus + Vec3::Z * MONITOR_OFFSET, focus, WORLD_UP),
        Monitor::Result => result_view,
    }
}

/// Eye position a monitor views from, for shading.
pub fn monitor_eye(monitor: Monitor, focus: Vec3, camera_eye: Vec3) -> Vec3 {
    match monitor {
        Monitor::Side => focus + Vec3::X * MONITOR_OFFSET,
        Monitor::Top => focus + Vec3::Y * MONITOR_OFFSET,
        Monitor::Front => focus + Vec3::Z * MONITOR_OFFSET,
        Monitor::Result => camera_eye,
    }
}

/// Projection matrix for a monitor.
///
/// Axis monitors get a letterboxed orthographic box: the larger window axis
/// spans [`ORTHO_EXTENT`] half-units and the smaller axis shrinks with the
/// aspect, so world units stay square on screen. The result monitor gets the
/// camera's perspective projection.
pub fn monitor_projection(
    monitor: Monitor,
    fov_degrees: f32,
    width: f32,
    height: f32,
    near: f32,
    far: f32,
) -> Result<Mat4, ProjectionError> {
    match monitor {
        Monitor::Result => {
            projection::perspective(fov_degrees.to_radians(), width / height, near, far)
        }
        _ => {
            if width > height {
                let e = ORTHO_EXTENT * height / width;
                projection::orthographic(-ORTHO_EXTENT, ORTHO_EXTENT, -e, e, near, far)
            } else {
                let e = ORTHO_EXTENT * width / height;
                projection::orthographic(-e, e, -ORTHO_EXTENT, ORTHO_EXTENT, near, far)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn quad_rects_tile_the_window() {
        let (w, h) = (800.0, 600.0);
        let rects: Vec<_> = ScreenMode::Quad
            .monitors()
            .iter()
            .map(|&m| viewport_rect(ScreenMode::Quad, m, w, h))
            .collect();

        let area: f32 = rects.iter().map(|r| r.width * r.height).sum();
        assert_eq!(area, w * h);

        // Side top-left, result bottom-right.
        assert_eq!(rects[0], ViewportRect { x: 0.0, y: 0.0, width: 400.0, height: 300.0 });
        assert_eq!(rects[3].x, 400.0);
        assert_eq!(rects[3].y, 300.0);
    }

    #[test]
    fn single_mode_fills_the_window() {
        let rect = viewport_rect(ScreenMode::Single(Monitor::Top), Monitor::Top, 1024.0, 768.0);
        assert_eq!(rect.width, 1024.0);
        assert_eq!(rect.height, 768.0);
    }

    #[test]
    fn axis_monitors_center_their_focus() {
        let focus = Vec3::new(4.0, -2.0, 7.0);
        for monitor in [Monitor::Side, Monitor::Top, Monitor::Front] {
            let view = monitor_view(monitor, focus, Mat4::IDENTITY);
            let centered = view * Vec4::new(focus.x, focus.y, focus.z, 1.0);
            let p = centered.truncate();
            assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
            assert!((p.z + MONITOR_OFFSET).abs() < 1e-4);
        }
    }

    #[test]
    fn top_monitor_keeps_north_up() {
        // A point ahead of the focus (-Z) should appear above it on screen.
        let view = monitor_view(Monitor::Top, Vec3::ZERO, Mat4::IDENTITY);
        let ahead = view * Vec4::new(0.0, 0.0, -3.0, 1.0);
        assert!(ahead.y > 0.0);
    }

    #[test]
    fn ortho_letterbox_keeps_world_units_square() {
        let m = monitor_projection(Monitor::Side, 45.0, 800.0, 600.0, 0.1, 250.0).unwrap();
        let cols = m.to_cols_array_2d();
        // x half-extent 5, y half-extent 5 * 600 / 800 = 3.75.
        assert!((cols[0][0] - 1.0 / 5.0).abs() < 1e-5);
        assert!((cols[1][1] - 1.0 / 3.75).abs() < 1e-5);

        let tall = monitor_projection(Monitor::Side, 45.0, 600.0, 800.0, 0.1, 250.0).unwrap();
        let cols = tall.to_cols_array_2d();
        assert!((cols[1][1] - 1.0 / 5.0).abs() < 1e-5);
        assert!((cols[0][0] - 1.0 / 3.75).abs() < 1e-5);
    }

    #[test]
    fn result_monitor_uses_the_camera_perspective() {
        let m = monitor_projection(Monitor::Result, 90.0, 600.0, 600.0, 0.1, 100.0).unwrap();
        let cols = m.to_cols_array_2d();
        assert!((cols[0][0] - 1.0).abs() < 1e-5);
        assert!((cols[2][3] + 1.0).abs() < 1e-6);
    }
}
