/*!
Runtime-tunable scene settings.

Defaults come from [`crate::constants`]. A runner may override any of them before
building the scene; the scene never changes them afterwards.
*/

use std::time::Duration;

use nalgebra::Vector3;

use crate::constants::{
    BOX_HEIGHT_THRESHOLD, CLOTH_WIND_MPS2, DRIVE_DECAY_PER_TICK, GRAVITY_MPS2, POWER_UP_STEP,
    TIMESTEP,
};

#[derive(Clone, Debug, PartialEq)]
pub struct SceneSettings {
    /// Fixed simulation step.
    pub timestep: Duration,
    /// Gravity vector (meters per second squared).
    pub gravity: Vector3<f32>,
    /// Drive lost per tick (rad/s).
    pub drive_decay: f32,
    /// Drive gained per power-up (rad/s).
    pub power_up_step: f32,
    /// Height at or below which a pyramid box counts as knocked down (meters).
    pub box_height_threshold: f32,
    /// Acceleration applied to the cloth once the ball goes through the goal.
    pub cloth_wind: Vector3<f32>,
    /// Seed for ball colors.
    pub color_seed: u64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            timestep: TIMESTEP,
            gravity: Vector3::new(0.0, -GRAVITY_MPS2, 0.0),
            drive_decay: DRIVE_DECAY_PER_TICK,
            power_up_step: POWER_UP_STEP,
            box_height_threshold: BOX_HEIGHT_THRESHOLD,
            cloth_wind: CLOTH_WIND_MPS2.into(),
            color_seed: 0,
        }
    }
}

impl SceneSettings {
    pub fn dt_seconds(&self) -> f32 {
        self.timestep.as_secs_f32()
    }
}
