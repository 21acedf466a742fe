//! # Simulation Configuration
//!
//! All tuning values live here so the kernel has no magic numbers.
//!
//! ## Presets
//! - `autonomous` (default): sensor-driven avoidance, hard right turn on a blocked front ray
//! - `manual`: keyboard-only vehicle, symmetric turns, sensor does not steer
//!
//! ## Usage
//! ```rust
//! use diffdrive_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let manual = SimConfig::manual();
//! assert!(config.sensor.reactive_avoidance);
//! assert!(!manual.sensor.reactive_avoidance);
//! ```
//!
//! ## Environment Variables
//!
//! - `DIFFDRIVE_PRESET`: Select preset (autonomous, manual)

mod controller_config;
mod sensor_config;
mod vehicle_config;

pub use controller_config::{CommandDeltas, ControllerConfig, SettleBand, SpeedLimitPolicy};
pub use sensor_config::SensorConfig;
pub use vehicle_config::VehicleConfig;

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Result, SimError};

pub const PRESET_ENV_VAR: &str = "DIFFDRIVE_PRESET";

/// What to do with a `dt` that is negative or not finite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DtPolicy {
    /// Treat the tick as a skipped frame (`dt = 0`) and keep running
    #[default]
    Clamp,
    /// Fail the tick with `SimError::InvalidTick`
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub dt_policy: DtPolicy,
}

impl SimConfig {
    pub fn autonomous() -> Self {
        Self::default()
    }

    pub fn manual() -> Self {
        Self {
            controller: ControllerConfig::manual(),
            sensor: SensorConfig::passive(),
            ..Self::default()
        }
    }

    pub fn preset(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "autonomous" | "default" => Ok(Self::autonomous()),
            "manual" => Ok(Self::manual()),
            other => Err(SimError::Scenario(format!("unknown preset '{}'", other))),
        }
    }

    /// Preset named by `DIFFDRIVE_PRESET`, falling back to `autonomous`.
    pub fn from_env_or_default() -> Self {
        Self::from_preset_var(env::var(PRESET_ENV_VAR).ok().as_deref())
    }

    fn from_preset_var(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("manual") => Self::manual(),
            _ => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.vehicle.validate()?;
        self.controller.validate()?;
        self.sensor.validate()
    }

    /// Load from `.yaml`/`.yml` or `.json`, then validate.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let cfg: Self = if is_yaml(path) {
            serde_yaml::from_str(&raw)?
        } else {
            serde_json::from_str(&raw)?
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()).as_deref(),
        Some("yaml") | Some("yml")
    )
}

// ========== Tests ==========
