//! Simulation kernel
//!
//! - [`kinematics`]: pose integration
//! - [`controller`]: command deltas and the settle law
//! - [`sensor`]: three-ray obstacle sensing
//! - [`world`]: traversability queries
//! - [`vehicle`]: per-vehicle state and `tick`
//! - [`trace`]: per-tick records
//! - [`scenario`]: scripted headless runs

pub mod controller;
pub mod kinematics;
pub mod scenario;
pub mod sensor;
pub mod trace;
pub mod vehicle;
pub mod world;

pub use controller::{Command, ControlOutcome, SettleBranch, VelocityController};
pub use kinematics::{integrate, Point, Pose, WheelVelocities};
pub use scenario::{run_scenario, run_scenario_with_ticks, ScenarioReport, ScenarioSpec};
pub use sensor::{ObstacleSensor, RayPosition, RayReading, SensorReading};
pub use trace::{RunTrace, TickRecord};
pub use vehicle::{create_vehicle, TickOutcome, Vehicle};
pub use world::{OccupancyGrid, OpenWorld, Rect, TraversabilityOracle, WorldSpec};
