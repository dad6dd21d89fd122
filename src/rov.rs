//! The simulated ROV: position, heading, propeller spin, and the maneuver
//! handling that keeps it inside the play area.

use glam::{Mat3, Vec3};

use crate::camera::{self, WORLD_UP};

/// Horizontal play-area half-extent; |x| and |z| are clamped to this.
pub const BOUND_XZ: f32 = 98.0;

/// Vertical travel range: seabed clearance up to just above the surface.
pub const DEPTH_RANGE: (f32, f32) = (-3.0, 0.7);

/// Degrees of yaw per unit of travel while turning.
const TURN_RATE: f32 = 8.0;

/// Propeller degrees per unit of travel.
const ENGINE_SPIN: f32 = 40.0;

/// Movement speed limits.
pub const SPEED_RANGE: (f32, f32) = (1.0, 20.0);

/// A thruster command applied for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Maneuver {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Ascend,
    Descend,
}

/// State of the vehicle the follow camera tracks.
#[derive(Clone, Debug)]
pub struct Rov {
    pub position: Vec3,
    /// Heading in degrees about world Y, wrapped to [-360, 360].
    pub yaw: f32,
    /// Unit heading vector; -Z at zero yaw.
    pub front: Vec3,
    pub right: Vec3,
    /// Accumulated propeller angle in degrees, wrapped to [-360, 360].
    pub engine_angle: f32,
    /// Travel speed in units per second, within [`SPEED_RANGE`].
    pub speed: f32,
}

impl Rov {
    pub fn new(position: Vec3) -> Self {
        let mut rov = Self {
            position,
            yaw: 0.0,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            engine_angle: 0.0,
            speed: 5.0,
        };
        rov.update_heading();
        rov
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(SPEED_RANGE.0, SPEED_RANGE.1);
    }

    /// Applies one maneuver for `dt` seconds.
    ///
    /// Translations move `speed * dt` units; forward and backward thrust
    /// also spin the propeller in the matching direction. Turns rotate the
    /// heading, vertical motion is gate-then-clamped to [`DEPTH_RANGE`], and
    /// the horizontal position is clamped to the play area after every move.
    pub fn steer(&mut self, maneuver: Maneuver, dt: f32) {
        let velocity = self.speed * dt;
        match maneuver {
            Maneuver::Forward => {
                self.position += self.front * velocity;
                self.spin_engine(velocity);
            }
            Maneuver::Backward => {
                self.position -= self.front * velocity;
                self.spin_engine(-velocity);
            }
            Maneuver::StrafeLeft => {
                self.position -= self.right * velocity;
            }
            Maneuver::StrafeRight => {
                self.position += self.right * velocity;
            }
            Maneuver::TurnLeft => {
                self.yaw = camera::wrap_degrees(self.yaw + TURN_RATE * velocity);
                self.update_heading();
            }
            Maneuver::TurnRight => {
                self.yaw = camera::wrap_degrees(self.yaw - TURN_RATE * velocity);
                self.update_heading();
            }
            Maneuver::Ascend => {
                self.position.y =
                    camera::gated_retreat(self.position.y, -velocity, DEPTH_RANGE.0, DEPTH_RANGE.1);
            }
            Maneuver::Descend => {
                self.position.y =
                    camera::gated_retreat(self.position.y, velocity, DEPTH_RANGE.0, DEPTH_RANGE.1);
            }
        }

        self.position.x = self.position.x.clamp(-BOUND_XZ, BOUND_XZ);
        self.position.z = self.position.z.clamp(-BOUND_XZ, BOUND_XZ);
    }

    fn spin_engine(&mut self, travel: f32) {
        self.engine_angle = camera::wrap_degrees(self.engine_angle + self.speed * ENGINE_SPIN * travel);
    }

    fn update_heading(&mut self) {
        self.front = Mat3::from_rotation_y(self.yaw.to_radians()) * Vec3::NEG_Z;
        self.right = self.front.cross(WORLD_UP).normalize();
    }
}
