use std::time::Duration;

use crate::color::Rgb;

/// Fixed simulation timestep.
pub const TIMESTEP: Duration = Duration::from_micros(1_000_000 / 60);

/// Gravity along -Y (meters per second squared, positive magnitude).
pub const GRAVITY_MPS2: f32 = 9.81;

/// How much the catapult drive loses every tick (rad/s).
///
/// The arm motor target speed is `-drive_power`, so a full button mash winds down
/// linearly until the arm is left hanging on its joint.
pub const DRIVE_DECAY_PER_TICK: f32 = 0.05;

/// Drive added per power-up press (rad/s).
pub const POWER_UP_STEP: f32 = 1.0;

/// Motor factor used for the catapult velocity drive.
pub const DRIVE_MOTOR_FACTOR: f32 = 1.0e4;

/// Pyramid boxes whose center drops to or below this height count as knocked down.
pub const BOX_HEIGHT_THRESHOLD: f32 = 10.0;

/// Angle applied per rotate-left / rotate-right command (radians, about +Y).
pub const ROTATE_STEP_RAD: f32 = 0.1;

/// Acceleration applied to the cloth once the ball has gone through the goal.
pub const CLOTH_WIND_MPS2: [f32; 3] = [0.0, 0.0, 11.0];

/// Where the catapult base sits.
pub const CATAPULT_POSITION: [f32; 3] = [0.0, 1.0, 0.0];

/// Ball density. Heavy enough to topple the big pyramids.
pub const BALL_DENSITY: f32 = 40.0;

/// Anchor of the ball joint in the arm's local frame.
///
/// High enough that the ball hull clears the top of the beam (y = 0.4).
pub const ARM_BALL_ANCHOR: [f32; 3] = [7.0, 1.5, 0.0];

/// Goal post placement.
pub const GOAL_POST_POSITION: [f32; 3] = [-50.0, 0.0, 0.0];

/// Goal trigger volume: center and half-extents.
pub const GOAL_TRIGGER_POSITION: [f32; 3] = [-50.0, 45.0, 0.0];
pub const GOAL_TRIGGER_HALF_EXTENTS: [f32; 3] = [1.0, 20.0, 15.0];

/// Cloth pinned between the goal uprights: top-left corner, size (width, height), resolution.
pub const CLOTH_POSITION: [f32; 3] = [-50.0, 59.0, 12.0];
pub const CLOTH_SIZE: [f32; 2] = [25.0, 28.0];
pub const CLOTH_RESOLUTION: [usize; 2] = [4, 4];

/// Halfway line: a long kinematic slab across the pitch.
pub const HALFWAY_LINE_POSITION: [f32; 3] = [-75.0, 0.5, 0.0];
pub const HALFWAY_LINE_HALF_EXTENTS: [f32; 3] = [5.0, 1.0, 1000.0];

/// Every pyramid is built around this point.
pub const PYRAMID_ORIGIN: [f32; 3] = [-100.0, 0.0, 0.0];

/// Density of a single pyramid box.
pub const PYRAMID_BOX_DENSITY: f32 = 0.1;

/// Friction of grass.
///
/// <https://www.engineeringtoolbox.com/friction-coefficients-d_778.html>
pub const GRASS_FRICTION: f32 = 0.35;

/// Leather on grass: static 0.61, dynamic 0.52.
pub const LEATHER_FRICTION: f32 = 0.52;
pub const LEATHER_RESTITUTION: f32 = 0.5;

/// Pyramid boxes: enough friction to stand on their own, low enough to topple.
pub const BOX_FRICTION: f32 = 0.5;
pub const BOX_RESTITUTION: f32 = 0.8;

/// Circus palette.
pub const PALETTE: [Rgb; 5] = [
    Rgb::new(46.0 / 255.0, 9.0 / 255.0, 39.0 / 255.0),
    Rgb::new(217.0 / 255.0, 0.0, 0.0),
    Rgb::new(1.0, 45.0 / 255.0, 0.0),
    Rgb::new(1.0, 140.0 / 255.0, 54.0 / 255.0),
    Rgb::new(4.0 / 255.0, 117.0 / 255.0, 111.0 / 255.0),
];

pub const GRASS_COLOR: Rgb = Rgb::new(50.0 / 255.0, 110.0 / 255.0, 10.0 / 255.0);

/// Over-bright so the line reads as a marking rather than a solid.
pub const HALFWAY_LINE_COLOR: Rgb = Rgb::new(2.0, 2.0, 2.0);

pub const KNOCKED_DOWN_COLOR: Rgb = Rgb::new(1.0, 0.0, 0.0);
