//! The application shell: window, event loop, per-frame simulation and
//! rendering.
//!
//! Controls:
//! - `G` toggles between the follow camera and the free-fly ghost camera
//! - follow mode: `W`/`S` thrust, `A`/`D` strafe, `Q`/`E` turn, `Space`
//!   ascend, left shift descend, `O`/`P` pull the camera in and out
//! - ghost mode: `W`/`A`/`S`/`D` fly, left shift sprints
//! - right mouse drag looks, scroll zooms, `X` toggles the axis gizmos
//! - `1`-`4` select a single monitor, `5` shows all four, `F11` fullscreen

use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use glam::Vec3;

use crate::color::Color;
use crate::free_camera::{FlyDirection, FreeCamera};
use crate::frustum::FrustumCorners;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::mesh::{Mesh, PrimitiveSet};
use crate::mesh_pass::{MeshPass, ViewPlan};
use crate::orbit_camera::OrbitCamera;
use crate::rig::CameraRig;
use crate::rov::{Maneuver, Rov};
use crate::scene::{self, CameraPose, SceneLayout};
use crate::viewport::{self, Monitor, ScreenMode};

const CLEAR_COLOR: Color = Color::rgb(0.1, 0.1, 0.1);

/// Step applied to the follow distance per frame while `O`/`P` are held.
const DISTANCE_STEP: f32 = 0.5;

/// Configuration for the app window.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Bathyscope".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Runs the application until the window closes.
pub fn run(config: AppConfig) {
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = BathyscopeApp::Pending { config };
    event_loop.run_app(&mut app).unwrap();
}

enum BathyscopeApp {
    Pending {
        config: AppConfig,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        mesh_pass: MeshPass,
        primitives: PrimitiveSet,
        input: Input,
        rov: Rov,
        rig: CameraRig,
        layout: SceneLayout,
        screen_mode: ScreenMode,
        show_axis: bool,
        start_time: Instant,
        last_frame: Instant,
    },
}

impl ApplicationHandler for BathyscopeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let BathyscopeApp::Pending { config } = self {
            let window_attrs = WindowAttributes::default()
                .with_title(&config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
            let gpu = GpuContext::new(window.clone());
            let mesh_pass = MeshPass::new(&gpu);
            let primitives = PrimitiveSet::new(&gpu);

            let rov = Rov::new(Vec3::ZERO);
            let rig = CameraRig::new(
                FreeCamera::new(Vec3::new(0.0, 2.0, 10.0)),
                OrbitCamera::new(Vec3::new(0.0, 0.0, 6.0), rov.position),
            );
            let layout = SceneLayout::generate(&mut rand::rng());

            log::info!(
                "scene ready: {} crates, {} seaweed, {} fish",
                layout.crates.len(),
                layout.seaweed.len(),
                layout.fish.len()
            );

            *self = BathyscopeApp::Running {
                window,
                gpu,
                mesh_pass,
                primitives,
                input: Input::new(),
                rov,
                rig,
                layout,
                screen_mode: ScreenMode::Quad,
                show_axis: false,
                start_time: Instant::now(),
                last_frame: Instant::now(),
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let BathyscopeApp::Running {
            window,
            gpu,
            mesh_pass,
            primitives,
            input,
            rov,
            rig,
            layout,
            screen_mode,
            show_axis,
            start_time,
            last_frame,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let time = start_time.elapsed().as_secs_f32();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                if input.key_pressed(KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                handle_toggles(input, window, rig, screen_mode, show_axis);
                handle_movement(input, dt, rig, rov);

                if input.mouse_down(MouseButton::Right) {
                    let delta = input.mouse_delta();
                    rig.look(delta.x, -delta.y);
                }
                let scroll = input.scroll_delta();
                if scroll.y != 0.0 {
                    rig.adjust_zoom(scroll.y);
                }

                rig.follow.set_target(rov.position);

                // Rebuild the frustum overlay from the active view.
                let extents = rig.frustum_extents(gpu.aspect());
                let corners = FrustumCorners::from_extents(&extents, rig.view_matrix().inverse());
                let (vertices, indices) = corners.geometry();
                primitives.frustum = Some(Mesh::new(gpu, &vertices, &indices));

                let (anchor, yaw, pitch) = rig.model_anchor();
                let commands = scene::draw_list(
                    layout,
                    rov,
                    CameraPose {
                        position: anchor,
                        yaw,
                        pitch,
                    },
                    time,
                    *show_axis,
                );

                let camera = rig.camera();
                let (width, height) = (gpu.width() as f32, gpu.height() as f32);
                let mut views = Vec::new();
                for &monitor in screen_mode.monitors() {
                    let rect = viewport::viewport_rect(*screen_mode, monitor, width, height);
                    let projection = match viewport::monitor_projection(
                        monitor,
                        camera.fov,
                        rect.width,
                        rect.height,
                        rig.near,
                        rig.far,
                    ) {
                        Ok(projection) => projection,
                        Err(err) => {
                            log::error!("skipping {monitor:?} monitor: {err}");
                            continue;
                        }
                    };
                    views.push(ViewPlan {
                        view: viewport::monitor_view(monitor, camera.position, rig.view_matrix()),
                        projection,
                        eye: viewport::monitor_eye(monitor, camera.position, camera.position),
                        viewport: rect,
                    });
                }

                let output = match gpu.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.resize(gpu.width(), gpu.height());
                        window.request_redraw();
                        return;
                    }
                    Err(err) => {
                        log::error!("surface error: {err}");
                        event_loop.exit();
                        return;
                    }
                };
                let target = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                mesh_pass.render(
                    gpu,
                    &target,
                    primitives,
                    &views,
                    &commands,
                    time,
                    CLEAR_COLOR,
                );
                output.present();

                input.begin_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Edge-triggered toggles: camera mode, axis gizmos, screen selection,
/// fullscreen.
fn handle_toggles(
    input: &Input,
    window: &Window,
    rig: &mut CameraRig,
    screen_mode: &mut ScreenMode,
    show_axis: &mut bool,
) {
    if input.key_pressed(KeyCode::KeyG) {
        rig.toggle_mode();
        log::info!(
            "camera mode: {}",
            if rig.is_ghost() { "ghost" } else { "follow" }
        );
    }
    if input.key_pressed(KeyCode::KeyX) {
        *show_axis = !*show_axis;
    }

    let selection = [
        (KeyCode::Digit1, ScreenMode::Single(Monitor::Side)),
        (KeyCode::Digit2, ScreenMode::Single(Monitor::Top)),
        (KeyCode::Digit3, ScreenMode::Single(Monitor::Front)),
        (KeyCode::Digit4, ScreenMode::Single(Monitor::Result)),
        (KeyCode::Digit5, ScreenMode::Quad),
    ];
    for (key, mode) in selection {
        if input.key_pressed(key) && *screen_mode != mode {
            *screen_mode = mode;
            log::info!("screen mode: {mode:?}");
        }
    }

    if input.key_pressed(KeyCode::F11) {
        if window.fullscreen().is_some() {
            window.set_fullscreen(None);
        } else {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }
}

/// Held-key movement: flies the ghost camera or steers the ROV.
fn handle_movement(input: &Input, dt: f32, rig: &mut CameraRig, rov: &mut Rov) {
    if rig.is_ghost() {
        rig.ghost.set_sprint(input.key_down(KeyCode::ShiftLeft));
        let flights = [
            (KeyCode::KeyW, FlyDirection::Forward),
            (KeyCode::KeyS, FlyDirection::Backward),
            (KeyCode::KeyA, FlyDirection::Left),
            (KeyCode::KeyD, FlyDirection::Right),
        ];
        for (key, direction) in flights {
            if input.key_down(key) {
                rig.ghost.fly(direction, dt);
            }
        }
    } else {
        let maneuvers = [
            (KeyCode::KeyW, Maneuver::Forward),
            (KeyCode::KeyS, Maneuver::Backward),
            (KeyCode::KeyA, Maneuver::StrafeLeft),
            (KeyCode::KeyD, Maneuver::StrafeRight),
            (KeyCode::KeyQ, Maneuver::TurnLeft),
            (KeyCode::KeyE, Maneuver::TurnRight),
            (KeyCode::Space, Maneuver::Ascend),
            (KeyCode::ShiftLeft, Maneuver::Descend),
        ];
        for (key, maneuver) in maneuvers {
            if input.key_down(key) {
                rov.steer(maneuver, dt);
            }
        }
        if input.key_down(KeyCode::KeyO) {
            rig.follow.adjust_distance(-DISTANCE_STEP);
        }
        if input.key_down(KeyCode::KeyP) {
            rig.follow.adjust_distance(DISTANCE_STEP);
        }
    }
}
