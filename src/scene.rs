//! The underwater scene: randomized prop placement and per-frame draw list
//! assembly.
//!
//! [`SceneLayout`] is generated once at startup; [`draw_list`] turns it into
//! draw commands each frame, animating the props from the elapsed time.

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::color::Color;
use crate::mesh::{MatrixStack, Primitive};
use crate::mesh_pass::DrawCommand;
use crate::models;
use crate::rov::Rov;

pub const CRATE_COUNT: usize = 20;
pub const SEAWEED_COUNT: usize = 600;
pub const FISH_COUNT: usize = 300;

const CRATE_SPREAD: f32 = 30.0;
const SEAWEED_SPREAD: f32 = 80.0;
const FISH_SPREAD: f32 = 60.0;

const SKY_SCALE: f32 = 80.0;
const SEABED_DEPTH: f32 = -5.0;
const FISH_DEPTH: f32 = -2.5;

/// Degrees per second for the sun's orbit and the fish school's spin.
const ORBIT_RATE: f32 = 5.0;

const SKY_COLOR: Color = Color::rgb(0.294_117_66, 0.623_529_4, 0.949_019_6);
const SUN_COLOR: Color = Color::rgb(1.0, 0.682_352_94, 0.0);
const SEA_COLOR: Color = Color::rgb(0.09, 0.38, 0.6);
const SAND_COLOR: Color = Color::rgb(0.76, 0.7, 0.5);
const SEAWEED_COLOR: Color = Color::rgb(0.13, 0.55, 0.26);
const FISH_COLOR: Color = Color::rgb(0.85, 0.5, 0.2);
const CRATE_COLOR: Color = Color::rgb(0.55, 0.39, 0.23);
const FRUSTUM_COLOR: Color = Color::rgba(0.6, 0.6, 0.6, crate::frustum::FRUSTUM_ALPHA);
const ORIGIN_COLOR: Color = Color::rgb(0.1, 0.1, 0.1);

/// Day/night brightness factor in [0, 1], cycling with the elapsed time.
pub fn daytime(time: f32) -> f32 {
    (time / 10.0).sin() / 2.0 + 0.5
}

/// Randomized prop positions, fixed for the lifetime of the session.
///
/// All props scatter on a square around the origin; their rest height is
/// baked into [`draw_list`], not stored here.
pub struct SceneLayout {
    pub crates: Vec<Vec3>,
    pub seaweed: Vec<Vec3>,
    pub fish: Vec<Vec3>,
}

impl SceneLayout {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        fn scatter<R: Rng>(rng: &mut R, count: usize, spread: f32) -> Vec<Vec3> {
            (0..count)
                .map(|_| {
                    Vec3::new(
                        rng.random_range(-spread..spread),
                        0.0,
                        rng.random_range(-spread..spread),
                    )
                })
                .collect()
        }

        Self {
            crates: scatter(rng, CRATE_COUNT, CRATE_SPREAD),
            seaweed: scatter(rng, SEAWEED_COUNT, SEAWEED_SPREAD),
            fish: scatter(rng, FISH_COUNT, FISH_SPREAD),
        }
    }
}

/// Camera-model placement for the frame: anchor position plus look angles
/// in degrees.
#[derive(Clone, Copy, Debug)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Assembles the frame's draw commands.
///
/// Order matters for the translucent frustum overlay, which blends over
/// everything drawn before it.
pub fn draw_list(
    layout: &SceneLayout,
    rov: &Rov,
    camera: CameraPose,
    time: f32,
    show_axis: bool,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(
        layout.crates.len() + layout.seaweed.len() + layout.fish.len() + 32,
    );
    let day = daytime(time);

    if show_axis {
        commands.push(DrawCommand {
            primitive: Primitive::Sphere,
            model: Mat4::from_scale(Vec3::splat(0.2)),
            color: ORIGIN_COLOR,
        });
        models::axis_gizmo(&mut commands, Mat4::IDENTITY);
    }

    // Sky volume
    commands.push(DrawCommand {
        primitive: Primitive::Cube,
        model: Mat4::from_scale(Vec3::splat(SKY_SCALE)),
        color: SKY_COLOR.scaled(day),
    });

    // Sea surface
    commands.push(DrawCommand {
        primitive: Primitive::Plane,
        model: Mat4::IDENTITY,
        color: SEA_COLOR,
    });

    // Seabed with the seaweed rooted on it
    let mut m = MatrixStack::new();
    m.translate(Vec3::new(0.0, SEABED_DEPTH, 0.0));
    commands.push(DrawCommand {
        primitive: Primitive::Plane,
        model: m.top(),
        color: SAND_COLOR,
    });
    for position in &layout.seaweed {
        m.push();
        m.translate(*position);
        commands.push(DrawCommand {
            primitive: Primitive::Quad,
            model: m.top(),
            color: SEAWEED_COLOR,
        });
        m.pop();
    }

    // Fish school: the whole group sways sideways and spins about the origin
    let mut m = MatrixStack::new();
    m.translate(Vec3::new(0.0, FISH_DEPTH, 0.0));
    for position in &layout.fish {
        m.push();
        m.translate(Vec3::new(-time.sin(), 0.0, 0.0));
        m.rotate_y((time * ORBIT_RATE).to_radians());
        m.translate(*position);
        m.scale(Vec3::new(1.0, 0.5, 0.5));
        commands.push(DrawCommand {
            primitive: Primitive::Quad,
            model: m.top(),
            color: FISH_COLOR,
        });
        m.pop();
    }

    // Crates bob on the surface, phase-shifted by their z position
    for position in &layout.crates {
        let bob = (time * 3.0 + position.z).sin() / 4.0;
        commands.push(DrawCommand {
            primitive: Primitive::Cube,
            model: Mat4::from_translation(Vec3::new(position.x, bob, position.z)),
            color: CRATE_COLOR,
        });
    }

    // The vehicle, with its local axes when enabled
    if show_axis {
        let frame =
            Mat4::from_translation(rov.position) * Mat4::from_rotation_y(rov.yaw.to_radians());
        models::axis_gizmo(&mut commands, frame);
    }
    models::rov(&mut commands, rov);

    // The active camera's gizmo
    models::camera_model(&mut commands, camera.position, camera.yaw, camera.pitch);
    if show_axis {
        let frame = Mat4::from_translation(camera.position)
            * Mat4::from_rotation_y((-camera.yaw).to_radians())
            * Mat4::from_rotation_x(camera.pitch.to_radians());
        models::axis_gizmo(&mut commands, frame);
    }

    // Frustum overlay; its geometry is already in world space
    commands.push(DrawCommand {
        primitive: Primitive::Frustum,
        model: Mat4::IDENTITY,
        color: FRUSTUM_COLOR,
    });

    // Sun orbiting in the XY plane
    commands.push(DrawCommand {
        primitive: Primitive::Sphere,
        model: Mat4::from_rotation_z((time * ORBIT_RATE).to_radians())
            * Mat4::from_translation(Vec3::new(90.0, 0.0, 0.0)),
        color: SUN_COLOR.scaled(day),
    });

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layout() -> SceneLayout {
        SceneLayout::generate(&mut StdRng::seed_from_u64(7))
    }

    fn pose() -> CameraPose {
        CameraPose {
            position: Vec3::new(0.0, 2.0, 10.0),
            yaw: -90.0,
            pitch: 0.0,
        }
    }

    #[test]
    fn layout_scatters_within_bounds() {
        let layout = layout();
        assert_eq!(layout.crates.len(), CRATE_COUNT);
        assert_eq!(layout.seaweed.len(), SEAWEED_COUNT);
        assert_eq!(layout.fish.len(), FISH_COUNT);

        for p in &layout.crates {
            assert!(p.x.abs() <= CRATE_SPREAD && p.z.abs() <= CRATE_SPREAD);
            assert_eq!(p.y, 0.0);
        }
        for p in &layout.seaweed {
            assert!(p.x.abs() <= SEAWEED_SPREAD && p.z.abs() <= SEAWEED_SPREAD);
        }
        for p in &layout.fish {
            assert!(p.x.abs() <= FISH_SPREAD && p.z.abs() <= FISH_SPREAD);
        }
    }

    #[test]
    fn daytime_cycles_between_zero_and_one() {
        for i in 0..200 {
            let d = daytime(i as f32);
            assert!((0.0..=1.0).contains(&d));
        }
        assert!((daytime(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn axis_toggle_adds_gizmos() {
        let layout = layout();
        let rov = Rov::new(Vec3::ZERO);
        let bare = draw_list(&layout, &rov, pose(), 1.0, false);
        let with_axes = draw_list(&layout, &rov, pose(), 1.0, true);
        // Origin marker plus three axis sets of three rods each.
        assert_eq!(with_axes.len(), bare.len() + 10);
    }

    #[test]
    fn crates_bob_with_time() {
        let layout = layout();
        let rov = Rov::new(Vec3::ZERO);
        let a = draw_list(&layout, &rov, pose(), 0.0, false);
        let b = draw_list(&layout, &rov, pose(), 0.4, false);

        let crate_at = |list: &[DrawCommand], i: usize| {
            let index = 2 + 1 + SEAWEED_COUNT + FISH_COUNT + i;
            (list[index].model * Vec4::W).truncate()
        };
        let before = crate_at(&a, 0);
        let after = crate_at(&b, 0);
        assert_eq!(before.x, after.x);
        assert_eq!(before.z, after.z);
        assert!((before.y - after.y).abs() > 1e-4);
        assert!(before.y.abs() <= 0.25 && after.y.abs() <= 0.25);
    }

    #[test]
    fn fish_school_spins_about_its_center() {
        let layout = layout();
        let rov = Rov::new(Vec3::ZERO);
        let a = draw_list(&layout, &rov, pose(), 0.0, false);

        let first_fish = 2 + 1 + SEAWEED_COUNT;
        let p = (a[first_fish].model * Vec4::W).truncate();
        // At t = 0 there is no sway or spin; fish sit at their layout slot.
        assert!((p - (layout.fish[0] + Vec3::new(0.0, FISH_DEPTH, 0.0))).length() < 1e-4);
    }

    #[test]
    fn frustum_overlay_is_translucent_and_late() {
        let layout = layout();
        let rov = Rov::new(Vec3::ZERO);
        let list = draw_list(&layout, &rov, pose(), 1.0, false);

        let frustum = list
            .iter()
            .position(|c| c.primitive == Primitive::Frustum)
            .unwrap();
        assert_eq!(list[frustum].color.a, 0.6);
        // Only the sun comes after it.
        assert_eq!(frustum, list.len() - 2);
    }
}
