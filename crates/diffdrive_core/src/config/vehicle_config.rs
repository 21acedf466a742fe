//! Vehicle geometry and speed envelope

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::units::meters_to_pixels;

/// Immutable after the vehicle is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Lateral distance between the drive wheels (px). Must be > 0.
    pub wheel_base_width: f64,
    /// Lower speed bound (px/s). Only consulted by `SpeedLimitPolicy::Clamp`.
    pub min_speed: f64,
    /// Upper speed bound (px/s). Only consulted by `SpeedLimitPolicy::Clamp`.
    pub max_speed: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            wheel_base_width: meters_to_pixels(0.01),
            min_speed: meters_to_pixels(0.0),
            max_speed: meters_to_pixels(0.02),
        }
    }
}

impl VehicleConfig {
    pub fn new(wheel_base_width: f64, min_speed: f64, max_speed: f64) -> Result<Self> {
        let cfg = Self { wheel_base_width, min_speed, max_speed };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.wheel_base_width.is_finite() || self.wheel_base_width <= 0.0 {
            return Err(SimError::invalid_config(format!(
                "wheel_base_width must be finite and > 0, got {}",
                self.wheel_base_width
            )));
        }
        if !self.min_speed.is_finite() || !self.max_speed.is_finite() {
            return Err(SimError::invalid_config("speed bounds must be finite"));
        }
        if self.min_speed < 0.0 || self.max_speed < 0.0 {
            return Err(SimError::invalid_config(format!(
                "speed bounds are magnitudes and must be >= 0 (min={}, max={})",
                self.min_speed, self.max_speed
            )));
        }
        if self.min_speed > self.max_speed {
            return Err(SimError::invalid_config(format!(
                "min_speed {} exceeds max_speed {}",
                self.min_speed, self.max_speed
            )));
        }
        Ok(())
    }
}
