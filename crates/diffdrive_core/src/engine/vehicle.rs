//! Per-vehicle state and the tick function
//!
//! One tick: control update -> pose integration -> sensing -> (maybe) queue
//! a correction that becomes a manual command on the following tick.

use serde::{Deserialize, Serialize};

use super::controller::{Command, ControlOutcome, VelocityController};
use super::kinematics::{integrate, Point, Pose, WheelVelocities};
use super::sensor::{ObstacleSensor, SensorReading};
use super::world::TraversabilityOracle;
use crate::config::{DtPolicy, SimConfig, VehicleConfig};
use crate::error::{Result, SimError};

/// Everything a tick produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub tick: u64,
    /// `dt` actually integrated (after policy)
    pub dt: f64,
    /// Correction from the previous tick that was consumed this tick
    pub correction_applied: Option<Command>,
    pub control: ControlOutcome,
    pub wheels: WheelVelocities,
    pub pose: Pose,
    pub reading: SensorReading,
    /// Correction queued for the next tick
    pub correction_queued: Option<Command>,
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    config: VehicleConfig,
    dt_policy: DtPolicy,
    pose: Pose,
    wheels: WheelVelocities,
    controller: VelocityController,
    sensor: ObstacleSensor,
    pending_correction: Option<Command>,
    tick: u64,
}

/// Spawn a vehicle at rest, heading 0, with the default controller and sensor.
pub fn create_vehicle(
    start: Point,
    wheel_base_width: f64,
    min_speed: f64,
    max_speed: f64,
) -> Result<Vehicle> {
    let vehicle = VehicleConfig::new(wheel_base_width, min_speed, max_speed)?;
    Vehicle::with_config(start, &SimConfig { vehicle, ..SimConfig::default() })
}

impl Vehicle {
    pub fn with_config(start: Point, config: &SimConfig) -> Result<Self> {
        config.validate()?;
        if !start.0.is_finite() || !start.1.is_finite() {
            return Err(SimError::invalid_config(format!(
                "start position must be finite, got {:?}",
                start
            )));
        }
        Ok(Self {
            config: config.vehicle,
            dt_policy: config.dt_policy,
            pose: Pose::at(start),
            wheels: WheelVelocities::default(),
            controller: VelocityController::new(&config.controller, &config.vehicle),
            sensor: ObstacleSensor::new(config.sensor),
            pending_correction: None,
            tick: 0,
        })
    }

    /// Same as [`Vehicle::with_config`] but with a non-zero starting heading.
    pub fn with_pose(pose: Pose, config: &SimConfig) -> Result<Self> {
        if !pose.heading.is_finite() {
            return Err(SimError::invalid_config("start heading must be finite"));
        }
        let mut vehicle = Self::with_config(pose.position(), config)?;
        vehicle.pose.heading = pose.heading;
        Ok(vehicle)
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn wheels(&self) -> WheelVelocities {
        self.wheels
    }

    pub fn pending_correction(&self) -> Option<Command> {
        self.pending_correction
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Direct wheel override for tests and host tooling.
    pub fn set_wheels(&mut self, wheels: WheelVelocities) {
        self.wheels = wheels;
    }

    fn effective_dt(&self, dt: f64) -> Result<f64> {
        if dt.is_finite() && dt >= 0.0 {
            return Ok(dt);
        }
        match self.dt_policy {
            DtPolicy::Reject => Err(SimError::InvalidTick { dt }),
            DtPolicy::Clamp => {
                log::warn!("[Tick {}] invalid dt {}, treating as skipped frame", self.tick, dt);
                Ok(0.0)
            }
        }
    }

    /// Advance one tick.
    ///
    /// A correction queued by the previous tick is applied first, then the
    /// operator `command`. If neither exists the settle law runs.
    pub fn tick(
        &mut self,
        dt: f64,
        command: Command,
        oracle: &dyn TraversabilityOracle,
    ) -> Result<TickOutcome> {
        let dt = self.effective_dt(dt)?;
        let correction = self.pending_correction.take();

        let commands = [correction.unwrap_or(Command::None), command];
        let control = self.controller.update(&mut self.wheels, &commands);

        log::trace!(
            "[Control] Theta {} Last F Vel {} Diff {} L {} R {}",
            self.pose.heading,
            self.wheels.last_stable_forward,
            self.wheels.diff(),
            self.wheels.left,
            self.wheels.right
        );

        self.pose = integrate(&self.pose, &self.wheels, self.config.wheel_base_width, dt);
        log::trace!("[Vehicle coord] {} {}", self.pose.x, self.pose.y);

        let reading = self.sensor.sense(&self.pose, oracle);
        let queued = self.sensor.correction(&reading);
        if let Some(cmd) = queued {
            log::info!("[Tick {}] front ray blocked, queueing {}", self.tick, cmd.name());
        }
        self.pending_correction = queued;

        let outcome = TickOutcome {
            tick: self.tick,
            dt,
            correction_applied: correction,
            control,
            wheels: self.wheels,
            pose: self.pose,
            reading,
            correction_queued: queued,
        };
        self.tick += 1;
        Ok(outcome)
    }
}
