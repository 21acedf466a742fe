//! End-to-end behavior of the tick kernel

use diffdrive_core::config::{ControllerConfig, SettleBand, SimConfig};
use diffdrive_core::engine::scenario::run_scenario;
use diffdrive_core::{
    create_vehicle, Command, ControlOutcome, OccupancyGrid, OpenWorld, Pose, ScenarioSpec,
    SettleBranch, Vehicle, WheelVelocities,
};
use std::path::PathBuf;

const WHEEL_BASE: f64 = 37.7952;

fn spawn() -> Vehicle {
    create_vehicle((200.0, 200.0), WHEEL_BASE, 0.0, 75.5904).unwrap()
}

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

#[test]
fn straight_line_moves_v_dt_along_heading() {
    let start = Pose::new(100.0, 100.0, 0.7);
    let mut car = Vehicle::with_pose(start, &SimConfig::default()).unwrap();
    car.set_wheels(WheelVelocities::new(12.0, 12.0, 12.0));

    let out = car.tick(0.25, Command::None, &OpenWorld).unwrap();
    assert_eq!(out.control, ControlOutcome::Settle(SettleBranch::Snap));
    assert_eq!(out.pose.heading, 0.7);
    assert!((out.pose.x - (100.0 + 3.0 * 0.7f64.cos())).abs() < 1e-9);
    assert!((out.pose.y - (100.0 - 3.0 * 0.7f64.sin())).abs() < 1e-9);
}

#[test]
fn pure_rotation_keeps_position() {
    // Rotation is only held for one tick: the settle law starts undoing it.
    let mut car = spawn();
    car.set_wheels(WheelVelocities::new(-5.0, 5.0, 0.0));
    let out = car.tick(0.0, Command::None, &OpenWorld).unwrap();
    assert_eq!(out.control, ControlOutcome::Settle(SettleBranch::Ramp));

    // after the ramp step the wheels are (-4.7, 4.7): still opposite
    assert!((out.wheels.left + out.wheels.right).abs() < 1e-12);
    let out = car.tick(0.5, Command::None, &OpenWorld).unwrap();
    assert_eq!(out.pose.x, 200.0);
    assert_eq!(out.pose.y, 200.0);
    let expected = (out.wheels.right - out.wheels.left) / WHEEL_BASE * 0.5;
    assert!((out.pose.heading - expected).abs() < 1e-12);
}

#[test]
fn ramp_converges_when_band_is_closed() {
    let cfg = SimConfig {
        controller: ControllerConfig { settle: SettleBand::closed(), ..ControllerConfig::default() },
        ..SimConfig::default()
    };
    let mut car = Vehicle::with_config((200.0, 200.0), &cfg).unwrap();
    car.set_wheels(WheelVelocities::new(8.0, 2.0, 5.0));

    let mut last = car.wheels().diff().abs();
    let mut ticks = 0;
    while !car.wheels().is_straight() {
        car.tick(0.01, Command::None, &OpenWorld).unwrap();
        let diff = car.wheels().diff().abs();
        assert!(diff <= last + 1e-12, "|diff| grew: {} -> {}", last, diff);
        last = diff;
        ticks += 1;
        assert!(ticks <= 20, "no convergence after {} ticks", ticks);
    }
    assert_eq!(car.wheels().left, 5.0);
    assert_eq!(car.wheels().last_stable_forward, 5.0);
}

#[test]
fn deadband_diff_of_one_and_a_half_is_left_alone() {
    let mut car = spawn();
    let start = WheelVelocities::new(4.5, 3.0, 3.78);
    car.set_wheels(start);

    for _ in 0..5 {
        let out = car.tick(0.1, Command::None, &OpenWorld).unwrap();
        assert_eq!(out.control, ControlOutcome::Settle(SettleBranch::Deadband));
    }
    assert_eq!(car.wheels(), start);
}

#[test]
fn center_ray_endpoint_geometry() {
    let mut car = spawn();
    let out = car.tick(0.0, Command::None, &OpenWorld).unwrap();
    assert_eq!(out.reading.origin, (220.0, 200.0));
    assert_eq!(out.reading.front().endpoint, (245.0, 200.0));
}

#[test]
fn reactive_loop_applies_turn_right_next_tick() {
    let mut grid = OccupancyGrid::new(1300, 520).unwrap();
    grid.set_blocked(245, 200, true);
    let mut car = spawn();

    let first = car.tick(0.0, Command::None, &grid).unwrap();
    assert!(first.reading.front().blocked);
    assert_eq!(first.correction_queued, Some(Command::TurnRight));
    let before = first.wheels;

    let second = car.tick(0.0, Command::None, &grid).unwrap();
    assert_eq!(second.control, ControlOutcome::Manual);
    assert_eq!(second.wheels.left, before.left);
    assert!((second.wheels.right - (before.right - WHEEL_BASE)).abs() < 1e-9);
}

#[test]
fn forward_then_coast_end_to_end() {
    let mut car = spawn();

    let out = car.tick(0.0, Command::Forward, &OpenWorld).unwrap();
    assert!((out.wheels.left - 3.77952).abs() < 1e-9);
    assert_eq!(out.wheels.left, out.wheels.right);
    assert_eq!(out.wheels.last_stable_forward, out.wheels.left);

    let mut last_diff = out.wheels.diff().abs();
    for _ in 0..2 {
        let out = car.tick(0.1, Command::None, &OpenWorld).unwrap();
        assert!(out.wheels.diff().abs() <= last_diff);
        last_diff = out.wheels.diff().abs();
    }

    // two ticks of 3.78 px/s * 0.1 s
    let pose = car.pose();
    assert!((pose.x - (200.0 + 2.0 * 3.77952 * 0.1)).abs() < 1e-9);
    assert_eq!(pose.y, 200.0);
    assert_eq!(pose.heading, 0.0);
}

#[test]
fn manual_preset_never_self_corrects() {
    let mut car = Vehicle::with_config((200.0, 200.0), &SimConfig::manual()).unwrap();
    let wall = |p: diffdrive_core::Point| p.0 >= 240.0;
    let out = car.tick(0.0, Command::None, &wall).unwrap();
    assert!(out.reading.front().blocked);
    assert_eq!(out.correction_queued, None);
}

#[test]
fn bundled_scenarios_pass() {
    for name in ["forward_coast.yaml", "wall_ahead.yaml", "deadband_hold.json"] {
        let spec = ScenarioSpec::load_from_path(scenario_path(name)).unwrap();
        let report = run_scenario(&spec).unwrap();
        assert!(report.passed(), "{}: {:?}", name, report.assertion_failures);
    }
}
