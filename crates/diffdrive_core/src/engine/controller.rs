//! Velocity controller
//!
//! Two modes per tick:
//! - Manual: one or more discrete commands apply fixed deltas.
//! - Settle: no command, so the step law pulls both wheels toward
//!   `last_stable_forward`.
//!
//! Whatever mode ran, an exact `left == right` afterwards becomes the new
//! `last_stable_forward`.

use serde::{Deserialize, Serialize};

use super::kinematics::WheelVelocities;
use crate::config::{CommandDeltas, ControllerConfig, SettleBand, SpeedLimitPolicy, VehicleConfig};

/// Discrete command for one tick. `None` selects the settle law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    #[default]
    None,
    TurnLeft,
    TurnRight,
    Forward,
    Backward,
    Stop,
}

impl Command {
    pub fn is_none(self) -> bool {
        matches!(self, Command::None)
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::None => "none",
            Command::TurnLeft => "turn_left",
            Command::TurnRight => "turn_right",
            Command::Forward => "forward",
            Command::Backward => "backward",
            Command::Stop => "stop",
        }
    }
}

/// Which settle-law branch ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleBranch {
    /// `|diff|` above the ramp threshold: both wheels stepped toward the target
    Ramp,
    /// `|diff|` within the snap threshold: both wheels set to the target
    Snap,
    /// Between the two thresholds: nothing changed
    Deadband,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "branch", rename_all = "snake_case")]
pub enum ControlOutcome {
    Manual,
    Settle(SettleBranch),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityController {
    deltas: CommandDeltas,
    settle: SettleBand,
    speed_limit: SpeedLimitPolicy,
    min_speed: f64,
    max_speed: f64,
}

impl VelocityController {
    pub fn new(config: &ControllerConfig, vehicle: &VehicleConfig) -> Self {
        Self {
            deltas: config.deltas,
            settle: config.settle,
            speed_limit: config.speed_limit,
            min_speed: vehicle.min_speed,
            max_speed: vehicle.max_speed,
        }
    }

    /// Run one control step. `commands` are applied in order; `Command::None`
    /// entries are ignored, and if nothing remains the settle law runs.
    pub fn update(&self, wheels: &mut WheelVelocities, commands: &[Command]) -> ControlOutcome {
        let mut manual = false;
        for &command in commands.iter().filter(|c| !c.is_none()) {
            self.apply_command(wheels, command);
            manual = true;
        }

        let outcome = if manual {
            ControlOutcome::Manual
        } else {
            ControlOutcome::Settle(self.settle(wheels))
        };

        if self.speed_limit == SpeedLimitPolicy::Clamp {
            // Dead zone on commanded speeds only, so a settle ramp can leave rest.
            self.clamp_wheels(wheels, manual);
        }

        if wheels.is_straight() {
            wheels.last_stable_forward = wheels.left;
        }

        outcome
    }

    /// Apply a single command's delta. The `left == right` rule is left to
    /// [`VelocityController::update`]; `Stop` alone keeps `last_stable_forward`.
    pub fn apply_command(&self, wheels: &mut WheelVelocities, command: Command) {
        let d = &self.deltas;
        match command {
            Command::None => {}
            Command::TurnLeft => wheels.left -= d.turn_left_left,
            Command::TurnRight => wheels.right -= d.turn_right_right,
            Command::Forward => {
                wheels.left += d.forward;
                wheels.right += d.forward;
                wheels.last_stable_forward += d.forward;
            }
            Command::Backward => {
                wheels.left -= d.backward;
                wheels.right -= d.backward;
                wheels.last_stable_forward -= d.backward;
            }
            Command::Stop => {
                wheels.left = 0.0;
                wheels.right = 0.0;
            }
        }
    }

    /// Step/snap law toward `last_stable_forward`.
    pub fn settle(&self, wheels: &mut WheelVelocities) -> SettleBranch {
        let diff = wheels.diff().abs();
        let target = wheels.last_stable_forward;

        let branch = if diff > self.settle.ramp_above {
            wheels.left = step_toward(wheels.left, target, self.settle.ramp_step);
            wheels.right = step_toward(wheels.right, target, self.settle.ramp_step);
            SettleBranch::Ramp
        } else if diff <= self.settle.snap_at_or_below {
            wheels.left = target;
            wheels.right = target;
            SettleBranch::Snap
        } else {
            SettleBranch::Deadband
        };
        log::debug!("[Settle] {:?} diff {} target {}", branch, diff, target);
        branch
    }

    fn clamp_wheels(&self, wheels: &mut WheelVelocities, dead_zone: bool) {
        let min_speed = if dead_zone { self.min_speed } else { 0.0 };
        let before = (wheels.left, wheels.right);
        wheels.left = limit_speed(wheels.left, min_speed, self.max_speed);
        wheels.right = limit_speed(wheels.right, min_speed, self.max_speed);
        if before != (wheels.left, wheels.right) {
            log::warn!(
                "[Speed Limit] clamped L {} -> {}, R {} -> {}",
                before.0,
                wheels.left,
                before.1,
                wheels.right
            );
        }
    }
}

#[inline]
fn step_toward(value: f64, target: f64, step: f64) -> f64 {
    if value < target {
        value + step
    } else if value > target {
        value - step
    } else {
        value
    }
}

#[inline]
fn limit_speed(value: f64, min_speed: f64, max_speed: f64) -> f64 {
    let clamped = value.clamp(-max_speed, max_speed);
    if clamped.abs() < min_speed {
        0.0
    } else {
        clamped
    }
}
