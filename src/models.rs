//! Compound models assembled from the shared primitives through the matrix
//! stack: the ROV, the camera gizmo, and the axis gizmo.
//!
//! Every part is emitted as a [`DrawCommand`]; nothing here touches the GPU.

use glam::{Mat4, Vec3};

use crate::color::Color;
use crate::mesh::{MatrixStack, Primitive};
use crate::mesh_pass::DrawCommand;
use crate::rov::Rov;

const HULL_YELLOW: Color = Color::rgb(1.0, 0.956_862_75, 0.580_392_16);
const HULL_GREY: Color = Color::rgb(0.611_764_7, 0.611_764_7, 0.611_764_7);
const POD_BLACK: Color = Color::rgb(0.1, 0.1, 0.1);
const JOINT_GREY: Color = Color::rgb(0.4, 0.4, 0.4);
const LIMB_GREY: Color = Color::rgb(0.2, 0.2, 0.2);
const LENS_GREY: Color = Color::rgb(0.25, 0.25, 0.25);

fn part(commands: &mut Vec<DrawCommand>, primitive: Primitive, model: Mat4, color: Color) {
    commands.push(DrawCommand {
        primitive,
        model,
        color,
    });
}

/// Emits the ROV at its current position and heading.
///
/// Hierarchy: hull on top; body slung half a unit below carrying the camera
/// pod (front), the manipulator arm (shoulder, upper arm, elbow, forearm,
/// wrist, two claw fingers), and the engine (pylon, hub spinning by
/// `engine_angle`, three blades at 120 degree spacing).
pub fn rov(commands: &mut Vec<DrawCommand>, rov: &Rov) {
    let mut m = MatrixStack::new();
    m.save(Mat4::from_translation(rov.position) * Mat4::from_rotation_y(rov.yaw.to_radians()));

    // Hull
    m.push();
    m.scale(Vec3::new(1.0, 0.6, 2.0));
    part(commands, Primitive::Cube, m.top(), HULL_YELLOW);
    m.pop();

    // Body frame; the arm and engine hang off it
    m.push();
    m.translate(Vec3::new(0.0, -0.5, 0.0));

    m.push();
    m.scale(Vec3::new(0.8, 0.4, 1.6));
    part(commands, Primitive::Cube, m.top(), HULL_GREY);
    m.pop();

    // Camera pod
    m.push();
    m.translate(Vec3::new(0.0, 0.0, -0.95));
    m.scale(Vec3::new(0.2, 0.2, 0.3));
    part(commands, Primitive::Cube, m.top(), POD_BLACK);
    m.pop();

    // Manipulator arm. Joints advance the frame in place; segments branch
    // off with push/pop so their scales never leak into the next joint.
    m.push();
    m.translate(Vec3::new(0.0, -0.2, -0.4));

    m.push();
    m.scale(Vec3::splat(0.2));
    part(commands, Primitive::Sphere, m.top(), JOINT_GREY);
    m.pop();

    m.push();
    m.translate(Vec3::new(0.0, -0.3, 0.0));
    m.push();
    m.scale(Vec3::new(0.05, 0.6, 0.05));
    part(commands, Primitive::Cube, m.top(), LIMB_GREY);
    m.pop();

    // Elbow
    m.translate(Vec3::new(0.0, -0.3, 0.0));
    m.push();
    m.scale(Vec3::splat(0.15));
    part(commands, Primitive::Sphere, m.top(), JOINT_GREY);
    m.pop();

    // Forearm reaches forward
    m.push();
    m.translate(Vec3::new(0.0, 0.0, -0.5));
    m.rotate_x(90f32.to_radians());
    m.scale(Vec3::new(0.05, 1.0, 0.05));
    part(commands, Primitive::Cube, m.top(), LIMB_GREY);
    m.pop();

    // Wrist
    m.translate(Vec3::new(0.0, 0.0, -1.0));
    m.push();
    m.scale(Vec3::splat(0.1));
    part(commands, Primitive::Sphere, m.top(), JOINT_GREY);
    m.pop();

    // Claw fingers, angled toward each other
    m.translate(Vec3::new(0.0, 0.0, -0.1));
    for side in [-1.0f32, 1.0] {
        m.push();
        m.translate(Vec3::new(side * 0.05, 0.0, 0.0));
        m.rotate_y(side * -45f32.to_radians());
        m.scale(Vec3::new(0.05, 0.2, 0.2));
        part(commands, Primitive::Cube, m.top(), LIMB_GREY);
        m.pop();
    }
    m.pop(); // arm

    // Engine
    m.push();
    m.translate(Vec3::new(0.0, 0.0, 1.1));

    m.push();
    m.scale(Vec3::new(0.1, 0.1, 0.6));
    part(commands, Primitive::Cube, m.top(), LIMB_GREY);
    m.pop();

    m.push();
    m.translate(Vec3::new(0.0, 0.0, 0.3));
    m.rotate_z(rov.engine_angle.to_radians());

    m.push();
    m.scale(Vec3::new(0.2, 0.2, 0.1));
    part(commands, Primitive::Sphere, m.top(), JOINT_GREY);
    m.pop();

    for blade in 0..3 {
        m.push();
        m.rotate_z((blade as f32 * 120.0).to_radians());
        m.translate(Vec3::new(0.0, 0.3, 0.0));
        m.scale(Vec3::new(0.2, 0.6, 0.05));
        part(commands, Primitive::Cube, m.top(), LIMB_GREY);
        m.pop();
    }

    m.pop(); // hub
    m.pop(); // engine
    m.pop(); // body
}

/// Emits the camera gizmo: a body box with a lens box sunk into its front.
///
/// `position` is the model anchor (behind the eye), `yaw`/`pitch` the
/// camera's look angles in degrees. The lens is nested inside the body's
/// scale, so it inherits the body's proportions.
pub fn camera_model(commands: &mut Vec<DrawCommand>, position: Vec3, yaw: f32, pitch: f32) {
    let mut m = MatrixStack::new();
    m.save(
        Mat4::from_translation(position)
            * Mat4::from_rotation_y((-yaw).to_radians())
            * Mat4::from_rotation_x(pitch.to_radians()),
    );

    m.push();
    m.scale(Vec3::new(1.0, 0.8, 1.8));
    part(commands, Primitive::Cube, m.top(), LIMB_GREY);

    m.push();
    m.translate(Vec3::new(0.0, 0.0, -0.2));
    m.scale(Vec3::new(0.6, 0.6, 1.2));
    part(commands, Primitive::Cube, m.top(), LENS_GREY);
    m.pop();
    m.pop();
}

/// Emits three color-coded axis rods (red X, green Y, blue Z) in `base`'s
/// frame, each reaching 3 units out along its axis.
pub fn axis_gizmo(commands: &mut Vec<DrawCommand>, base: Mat4) {
    let rods = [
        (Vec3::new(1.5, 0.0, 0.0), Vec3::new(3.0, 0.1, 0.1), Color::RED),
        (Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.1, 3.0, 0.1), Color::GREEN),
        (Vec3::new(0.0, 0.0, 1.5), Vec3::new(0.1, 0.1, 3.0), Color::BLUE),
    ];
    for (offset, size, color) in rods {
        let mut m = MatrixStack::new();
        m.save(base);
        m.translate(offset);
        m.scale(size);
        part(commands, Primitive::Cube, m.top(), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn rov_parts_follow_the_vehicle() {
        let mut at_origin = Vec::new();
        rov(&mut at_origin, &Rov::new(Vec3::ZERO));

        let offset = Vec3::new(10.0, -2.0, 5.0);
        let mut moved = Vec::new();
        rov(&mut moved, &Rov::new(offset));

        assert_eq!(at_origin.len(), moved.len());
        for (a, b) in at_origin.iter().zip(&moved) {
            let a_center = (a.model * Vec4::W).truncate();
            let b_center = (b.model * Vec4::W).truncate();
            assert!((b_center - a_center - offset).length() < 1e-4);
        }
    }

    #[test]
    fn rov_hull_sits_above_the_body() {
        let mut commands = Vec::new();
        rov(&mut commands, &Rov::new(Vec3::ZERO));

        let hull = (commands[0].model * Vec4::W).truncate();
        let body = (commands[1].model * Vec4::W).truncate();
        assert!(hull.y > body.y);
        assert_eq!(commands[0].color, HULL_YELLOW);
    }

    #[test]
    fn engine_blades_spin_with_the_propeller() {
        let mut stopped = Vec::new();
        rov(&mut stopped, &Rov::new(Vec3::ZERO));

        let mut spinning_rov = Rov::new(Vec3::ZERO);
        spinning_rov.engine_angle = 90.0;
        let mut spinning = Vec::new();
        rov(&mut spinning, &spinning_rov);

        // The last three commands are the blades.
        let n = stopped.len();
        for i in n - 3..n {
            let a = (stopped[i].model * Vec4::W).truncate();
            let b = (spinning[i].model * Vec4::W).truncate();
            assert!((a - b).length() > 0.1);
        }
        // The pylon, well before the hub, does not move.
        let a = (stopped[n - 5].model * Vec4::W).truncate();
        let b = (spinning[n - 5].model * Vec4::W).truncate();
        assert!((a - b).length() < 1e-5);
    }

    #[test]
    fn axis_rods_reach_along_their_axes() {
        let mut commands = Vec::new();
        axis_gizmo(&mut commands, Mat4::IDENTITY);
        assert_eq!(commands.len(), 3);

        // Far end of the X rod: local (0.5, 0, 0) lands at x = 3.
        let tip = (commands[0].model * Vec4::new(0.5, 0.0, 0.0, 1.0)).truncate();
        assert!((tip - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(commands[0].color, Color::RED);
    }
}
