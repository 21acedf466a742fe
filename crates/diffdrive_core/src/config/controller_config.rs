//! Velocity controller tuning

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::units::meters_to_pixels;

/// Per-command wheel deltas (px/s). Turning hits one wheel only, so turns skid
/// instead of arcing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommandDeltas {
    /// Subtracted from the left wheel on `TurnLeft`
    pub turn_left_left: f64,
    /// Subtracted from the right wheel on `TurnRight`
    pub turn_right_right: f64,
    /// Added to both wheels and to the stable reference on `Forward`
    pub forward: f64,
    /// Subtracted from both wheels and from the stable reference on `Backward`
    pub backward: f64,
}

impl Default for CommandDeltas {
    fn default() -> Self {
        Self::autonomous()
    }
}

impl CommandDeltas {
    /// Deltas used when the obstacle sensor is steering (hard right turn)
    pub fn autonomous() -> Self {
        Self {
            turn_left_left: meters_to_pixels(0.002),
            turn_right_right: meters_to_pixels(0.01),
            forward: meters_to_pixels(0.001),
            backward: meters_to_pixels(0.003),
        }
    }

    /// Keyboard-only deltas, symmetric turns
    pub fn manual() -> Self {
        Self { turn_right_right: meters_to_pixels(0.002), ..Self::autonomous() }
    }
}

/// Thresholds of the settle law.
///
/// `|diff| > ramp_above` ramps, `|diff| <= snap_at_or_below` snaps. With the
/// defaults (2 and 1) the band `1 < |diff| <= 2` does neither.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettleBand {
    pub ramp_above: f64,
    pub snap_at_or_below: f64,
    /// Fixed per-wheel step applied while ramping (px/s per tick)
    pub ramp_step: f64,
}

impl Default for SettleBand {
    fn default() -> Self {
        Self { ramp_above: 2.0, snap_at_or_below: 1.0, ramp_step: 0.3 }
    }
}

impl SettleBand {
    /// Snap covers everything the ramp does not, so no deadband exists.
    pub fn closed() -> Self {
        let band = Self::default();
        Self { snap_at_or_below: band.ramp_above, ..band }
    }

    pub fn has_deadband(&self) -> bool {
        self.snap_at_or_below < self.ramp_above
    }

    pub fn validate(&self) -> Result<()> {
        let values = [self.ramp_above, self.snap_at_or_below, self.ramp_step];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SimError::invalid_config("settle band values must be finite"));
        }
        if self.snap_at_or_below < 0.0 {
            return Err(SimError::invalid_config("snap_at_or_below must be >= 0"));
        }
        if self.snap_at_or_below > self.ramp_above {
            return Err(SimError::invalid_config(format!(
                "snap_at_or_below {} exceeds ramp_above {}",
                self.snap_at_or_below, self.ramp_above
            )));
        }
        if self.ramp_step <= 0.0 {
            return Err(SimError::invalid_config("ramp_step must be > 0"));
        }
        Ok(())
    }
}

/// Whether `min_speed` / `max_speed` are applied to the wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeedLimitPolicy {
    /// Bounds are carried but never applied
    #[default]
    Unenforced,
    /// Clamp each wheel to `[-max_speed, max_speed]`; zero magnitudes below `min_speed`
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ControllerConfig {
    #[serde(default)]
    pub deltas: CommandDeltas,
    #[serde(default)]
    pub settle: SettleBand,
    #[serde(default)]
    pub speed_limit: SpeedLimitPolicy,
}

impl ControllerConfig {
    pub fn manual() -> Self {
        Self { deltas: CommandDeltas::manual(), ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        let d = &self.deltas;
        let deltas = [d.turn_left_left, d.turn_right_right, d.forward, d.backward];
        if deltas.iter().any(|v| !v.is_finite()) {
            return Err(SimError::invalid_config("command deltas must be finite"));
        }
        self.settle.validate()
    }
}
