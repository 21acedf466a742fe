//! # diffdrive_core - Differential-Drive Vehicle Simulation Kernel
//!
//! Deterministic, single-threaded tick kernel for a two-wheeled vehicle:
//! pose integration, a step/snap velocity controller, and a three-ray
//! obstacle sensor that feeds a corrective turn back into the controller.
//!
//! ## Features
//! - Pure per-tick step: the host loop owns timing and rendering
//! - Pluggable traversability oracle (occupancy grid, closures, open world)
//! - Serializable configuration presets and tick traces
//! - Scripted scenarios for headless runs
//!
//! ```rust
//! use diffdrive_core::{create_vehicle, Command, OpenWorld};
//!
//! let mut car = create_vehicle((200.0, 200.0), 37.7952, 0.0, 75.5904).unwrap();
//! car.tick(0.0, Command::Forward, &OpenWorld).unwrap();
//! let out = car.tick(0.1, Command::None, &OpenWorld).unwrap();
//! assert!(out.pose.x > 200.0);
//! ```

// Exact float equality is part of the controller's contract
#![allow(clippy::float_cmp)]

pub mod config;
pub mod engine;
pub mod error;
pub mod units;

pub use config::SimConfig;
pub use engine::{
    create_vehicle, integrate, run_scenario, Command, ControlOutcome, OccupancyGrid, OpenWorld,
    Point, Pose, RunTrace, ScenarioReport, ScenarioSpec, SensorReading, SettleBranch,
    TickOutcome, TraversabilityOracle, Vehicle, WheelVelocities,
};
pub use error::{Result, SimError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
