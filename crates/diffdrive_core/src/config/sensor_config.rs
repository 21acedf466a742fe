//! Three-ray obstacle sensor geometry

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Length of each ray, measured from the ray origin (px)
    pub ray_length: f64,
    /// Distance from the vehicle center to the ray origin along heading (px)
    pub standoff: f64,
    /// Half-angle between the side rays and the front ray (degrees)
    pub spread_degrees: f64,
    /// Queue a corrective turn when the front ray is blocked
    pub reactive_avoidance: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { ray_length: 25.0, standoff: 20.0, spread_degrees: 30.0, reactive_avoidance: true }
    }
}

impl SensorConfig {
    pub fn passive() -> Self {
        Self { reactive_avoidance: false, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.ray_length.is_finite() || self.ray_length <= 0.0 {
            return Err(SimError::invalid_config(format!(
                "ray_length must be finite and > 0, got {}",
                self.ray_length
            )));
        }
        if !self.standoff.is_finite() || self.standoff < 0.0 {
            return Err(SimError::invalid_config(format!(
                "standoff must be finite and >= 0, got {}",
                self.standoff
            )));
        }
        if !self.spread_degrees.is_finite() {
            return Err(SimError::invalid_config("spread_degrees must be finite"));
        }
        Ok(())
    }
}
