//! Tick trace
//!
//! Per-tick records of what the controller did and what the sensor saw, for
//! offline inspection ("why did it turn there?").

use serde::{Deserialize, Serialize};

use super::controller::{Command, ControlOutcome, SettleBranch};
use super::kinematics::{Pose, WheelVelocities};
use super::sensor::SensorReading;
use super::vehicle::TickOutcome;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: u64,
    pub dt: f64,
    /// Operator command for this tick
    pub command: Command,
    pub correction_applied: Option<Command>,
    pub control: ControlOutcome,
    pub wheels: WheelVelocities,
    pub pose: Pose,
    pub reading: SensorReading,
    pub correction_queued: Option<Command>,
}

impl TickRecord {
    pub fn from_outcome(command: Command, outcome: &TickOutcome) -> Self {
        Self {
            tick: outcome.tick,
            dt: outcome.dt,
            command,
            correction_applied: outcome.correction_applied,
            control: outcome.control,
            wheels: outcome.wheels,
            pose: outcome.pose,
            reading: outcome.reading,
            correction_queued: outcome.correction_queued,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTrace {
    pub records: Vec<TickRecord>,
}

impl RunTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TickRecord) {
        self.records.push(record);
    }

    pub fn record(&mut self, command: Command, outcome: &TickOutcome) {
        self.push(TickRecord::from_outcome(command, outcome));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TickRecord> {
        self.records.last()
    }

    pub fn max_abs_diff(&self) -> f64 {
        self.records.iter().map(|r| r.wheels.diff().abs()).fold(0.0, f64::max)
    }

    pub fn blocked_front_ticks(&self) -> usize {
        self.records.iter().filter(|r| r.reading.front().blocked).count()
    }

    pub fn deadband_ticks(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.control == ControlOutcome::Settle(SettleBranch::Deadband))
            .count()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
