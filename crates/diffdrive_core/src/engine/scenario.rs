//! Headless scenarios
//!
//! A scenario file fixes the start pose, the world, a fixed `dt` and a
//! schedule of operator commands, then optionally asserts on the result.
//!
//! ```yaml
//! id: wall_ahead
//! start: [200.0, 200.0]
//! dt: 0.1
//! ticks: 20
//! world:
//!   width: 400
//!   height: 400
//!   obstacles:
//!     - { x: 260, y: 0, w: 20, h: 400 }
//! commands:
//!   - { tick: 0, command: forward }
//! expect:
//!   min_blocked_front_ticks: 1
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::controller::Command;
use super::kinematics::{Pose, WheelVelocities};
use super::trace::RunTrace;
use super::vehicle::Vehicle;
use super::world::{OpenWorld, TraversabilityOracle, WorldSpec};
use crate::config::{is_yaml, SimConfig};
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduledCommand {
    pub tick: u64,
    pub command: Command,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoseExpectation {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub heading: Option<f64>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    1e-6
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScenarioExpectations {
    #[serde(default)]
    pub final_pose: Option<PoseExpectation>,
    #[serde(default)]
    pub min_blocked_front_ticks: Option<usize>,
    #[serde(default)]
    pub max_final_abs_diff: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioSpec {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `autonomous` (default) or `manual`; ignored when `config` is given
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub config: Option<SimConfig>,
    pub start: [f64; 2],
    #[serde(default)]
    pub heading: f64,
    pub dt: f64,
    pub ticks: u64,
    #[serde(default)]
    pub world: Option<WorldSpec>,
    #[serde(default)]
    pub commands: Vec<ScheduledCommand>,
    #[serde(default)]
    pub expect: ScenarioExpectations,
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub id: String,
    pub trace: RunTrace,
    pub final_pose: Pose,
    pub final_wheels: WheelVelocities,
    pub assertion_failures: Vec<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.assertion_failures.is_empty()
    }
}

impl ScenarioSpec {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let spec = if is_yaml(path) { Self::from_yaml(&raw)? } else { Self::from_json(&raw)? };
        Ok(spec)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn resolve_config(&self) -> Result<SimConfig> {
        match (&self.config, self.preset.as_deref()) {
            (Some(cfg), _) => Ok(*cfg),
            (None, Some(name)) => SimConfig::preset(name),
            (None, None) => Ok(SimConfig::default()),
        }
    }

    fn command_schedule(&self) -> Result<BTreeMap<u64, Command>> {
        let mut schedule = BTreeMap::new();
        for entry in &self.commands {
            if entry.tick >= self.ticks {
                return Err(SimError::Scenario(format!(
                    "{}: command {} scheduled at tick {} but run has {} ticks",
                    self.id,
                    entry.command.name(),
                    entry.tick,
                    self.ticks
                )));
            }
            if schedule.insert(entry.tick, entry.command).is_some() {
                return Err(SimError::Scenario(format!(
                    "{}: more than one command at tick {}",
                    self.id, entry.tick
                )));
            }
        }
        Ok(schedule)
    }
}

pub fn run_scenario(spec: &ScenarioSpec) -> Result<ScenarioReport> {
    run_scenario_with_ticks(spec, spec.ticks)
}

/// Run with an explicit tick count (the CLI's `--ticks` override).
pub fn run_scenario_with_ticks(spec: &ScenarioSpec, ticks: u64) -> Result<ScenarioReport> {
    let spec = ScenarioSpec { ticks, ..spec.clone() };
    let config = spec.resolve_config()?;
    let schedule = spec.command_schedule()?;
    let start = Pose::new(spec.start[0], spec.start[1], spec.heading);
    let mut vehicle = Vehicle::with_pose(start, &config)?;

    let grid = match &spec.world {
        Some(world) => Some(world.build()?),
        None => None,
    };
    let oracle: &dyn TraversabilityOracle = match &grid {
        Some(grid) => grid,
        None => &OpenWorld,
    };

    log::info!("[Scenario {}] start {:?}, {} ticks @ dt {}", spec.id, start, ticks, spec.dt);

    let mut trace = RunTrace::new();
    for tick in 0..ticks {
        let command = schedule.get(&tick).copied().unwrap_or(Command::None);
        let outcome = vehicle.tick(spec.dt, command, oracle)?;
        trace.record(command, &outcome);
    }

    let final_pose = vehicle.pose();
    let final_wheels = vehicle.wheels();
    let assertion_failures = check_expectations(&spec.expect, &trace, &final_pose, &final_wheels);

    log::info!(
        "[Scenario {}] finished at ({:.3}, {:.3}) heading {:.4}, {} assertion failure(s)",
        spec.id,
        final_pose.x,
        final_pose.y,
        final_pose.heading,
        assertion_failures.len()
    );

    Ok(ScenarioReport { id: spec.id, trace, final_pose, final_wheels, assertion_failures })
}

fn check_expectations(
    expect: &ScenarioExpectations,
    trace: &RunTrace,
    pose: &Pose,
    wheels: &WheelVelocities,
) -> Vec<String> {
    let mut failures = Vec::new();

    if let Some(exp) = &expect.final_pose {
        let dx = (pose.x - exp.x).abs();
        let dy = (pose.y - exp.y).abs();
        if dx > exp.tolerance || dy > exp.tolerance {
            failures.push(format!(
                "final position ({}, {}) not within {} of ({}, {})",
                pose.x, pose.y, exp.tolerance, exp.x, exp.y
            ));
        }
        if let Some(heading) = exp.heading {
            if (pose.heading - heading).abs() > exp.tolerance {
                failures.push(format!(
                    "final heading {} not within {} of {}",
                    pose.heading, exp.tolerance, heading
                ));
            }
        }
    }

    if let Some(min) = expect.min_blocked_front_ticks {
        let seen = trace.blocked_front_ticks();
        if seen < min {
            failures.push(format!("front ray blocked on {} tick(s), expected >= {}", seen, min));
        }
    }

    if let Some(max) = expect.max_final_abs_diff {
        let diff = wheels.diff().abs();
        if diff > max {
            failures.push(format!("final |left - right| = {}, expected <= {}", diff, max));
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const WALL_YAML: &str = r#"
id: wall_ahead
start: [200.0, 200.0]
dt: 0.1
ticks: 20
world:
  width: 400
  height: 400
  obstacles:
    - { x: 245, y: 0, w: 20, h: 400 }
commands:
  - { tick: 0, command: forward }
expect:
  min_blocked_front_ticks: 1
"#;

    #[test]
    fn test_parse_yaml() {
        let spec = ScenarioSpec::from_yaml(WALL_YAML).unwrap();
        assert_eq!(spec.id, "wall_ahead");
        assert_eq!(spec.commands.len(), 1);
        assert_eq!(spec.commands[0].command, Command::Forward);
        assert_eq!(spec.heading, 0.0);
        assert_eq!(spec.resolve_config().unwrap(), SimConfig::default());
    }

    #[test]
    fn test_wall_triggers_correction() {
        let spec = ScenarioSpec::from_yaml(WALL_YAML).unwrap();
        let report = run_scenario(&spec).unwrap();
        assert!(report.passed(), "{:?}", report.assertion_failures);
        assert_eq!(report.trace.len(), 20);
        let corrected = report
            .trace
            .records
            .iter()
            .any(|r| r.correction_applied == Some(Command::TurnRight));
        assert!(corrected);
    }

    #[test]
    fn test_command_past_end_rejected() {
        let mut spec = ScenarioSpec::from_yaml(WALL_YAML).unwrap();
        spec.commands.push(ScheduledCommand { tick: 99, command: Command::Stop });
        assert!(matches!(run_scenario(&spec), Err(SimError::Scenario(_))));
    }

    #[test]
    fn test_duplicate_tick_rejected() {
        let mut spec = ScenarioSpec::from_yaml(WALL_YAML).unwrap();
        spec.commands.push(ScheduledCommand { tick: 0, command: Command::Stop });
        assert!(matches!(run_scenario(&spec), Err(SimError::Scenario(_))));
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let mut spec = ScenarioSpec::from_yaml(WALL_YAML).unwrap();
        spec.preset = Some("turbo".into());
        assert!(matches!(run_scenario(&spec), Err(SimError::Scenario(_))));
    }

    #[test]
    fn test_huge_world_is_an_error() {
        let yaml = format!(
            "id: huge\nstart: [0.0, 0.0]\ndt: 0.1\nticks: 1\nworld:\n  width: {}\n  height: 4\n",
            usize::MAX / 2 + 1
        );
        let spec = ScenarioSpec::from_yaml(&yaml).unwrap();
        assert!(matches!(run_scenario(&spec), Err(SimError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_failed_expectation_is_reported() {
        let spec = ScenarioSpec::from_json(
            r#"{
                "id": "idle",
                "start": [10.0, 10.0],
                "dt": 0.1,
                "ticks": 3,
                "expect": { "final_pose": { "x": 50.0, "y": 10.0 } }
            }"#,
        )
        .unwrap();
        let report = run_scenario(&spec).unwrap();
        assert!(!report.passed());
        assert_eq!(report.assertion_failures.len(), 1);
        assert_eq!(report.final_pose, Pose::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn test_tick_override() {
        let spec = ScenarioSpec::from_yaml(WALL_YAML).unwrap();
        let report = run_scenario_with_ticks(&spec, 5).unwrap();
        assert_eq!(report.trace.len(), 5);
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"id": "f", "preset": "manual", "start": [0.0, 0.0], "dt": 0.0, "ticks": 1}}"#
        )
        .unwrap();
        let spec = ScenarioSpec::load_from_path(file.path()).unwrap();
        assert_eq!(spec.resolve_config().unwrap(), SimConfig::manual());
    }
}
