//! # Bathyscope
//!
//! **An interactive 3D viewer for a remotely operated underwater vehicle.**
//!
//! Drive an ROV around a procedurally scattered seascape and watch it
//! through four monitors at once: orthographic side, top, and front views
//! plus the active camera's own perspective view, with its frustum drawn
//! into the world as a translucent volume.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bathyscope::AppConfig;
//!
//! fn main() {
//!     env_logger::init();
//!     bathyscope::run(AppConfig::new().title("Bathyscope").size(800, 600));
//! }
//! ```
//!
//! Two cameras share the rig: a follow camera orbiting the ROV and a
//! free-fly ghost camera (`G` toggles). Keys `1`-`5` pick the monitor
//! layout, `X` shows the axis gizmos, and the mouse looks and zooms.

mod app;
mod camera;
mod color;
mod free_camera;
mod frustum;
mod gpu;
mod input;
mod mesh;
mod mesh_pass;
mod models;
mod orbit_camera;
mod projection;
mod rig;
mod rov;
mod scene;
mod viewport;

pub use app::{AppConfig, run};
pub use camera::{Camera, gated_retreat, look_at, wrap_degrees};
pub use color::Color;
pub use free_camera::{FlyDirection, FreeCamera};
pub use frustum::FrustumCorners;
pub use gpu::GpuContext;
pub use input::Input;
pub use mesh::{MatrixStack, Mesh, Primitive, PrimitiveSet, Vertex3d};
pub use mesh_pass::{DrawCommand, MeshPass, ViewPlan};
pub use orbit_camera::OrbitCamera;
pub use projection::{FrustumExtents, ProjectionError, orthographic, perspective};
pub use rig::{CameraMode, CameraRig};
pub use rov::{Maneuver, Rov};
pub use scene::{CameraPose, SceneLayout, daytime, draw_list};
pub use viewport::{Monitor, ScreenMode, ViewportRect};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
