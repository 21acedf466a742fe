//! Differential-drive forward kinematics
//!
//! Screen convention: X grows to the right, Y grows downward. Heading is
//! measured counter-clockwise as seen on screen, so a positive heading moves
//! the vehicle toward smaller Y. That is why the Y update subtracts.
//!
//! Heading is never wrapped here. It keeps accumulating across full turns;
//! use [`Pose::wrapped_heading`] when a `[0, 2π)` value is needed.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Point in world pixels (x right, y down)
pub type Point = (f64, f64);

/// Vehicle pose in world pixels / radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    pub fn at(position: Point) -> Self {
        Self::new(position.0, position.1, 0.0)
    }

    pub fn position(&self) -> Point {
        (self.x, self.y)
    }

    /// Heading folded into `[0, 2π)`. The stored heading is left untouched.
    pub fn wrapped_heading(&self) -> f64 {
        let wrapped = self.heading.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if wrapped >= TAU {
            0.0
        } else {
            wrapped
        }
    }

    pub fn heading_degrees(&self) -> f64 {
        self.heading.to_degrees()
    }

    /// Point `distance` ahead of the pose along `angle` (screen Y inverted).
    #[inline]
    pub fn project(&self, angle: f64, distance: f64) -> Point {
        project_from(self.position(), angle, distance)
    }
}

/// Project `distance` from `origin` along `angle`, honoring the Y-down axis.
#[inline]
pub fn project_from(origin: Point, angle: f64, distance: f64) -> Point {
    (origin.0 + distance * angle.cos(), origin.1 - distance * angle.sin())
}

/// Wheel speeds plus the controller's memory of the last straight-line speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WheelVelocities {
    pub left: f64,
    pub right: f64,
    /// Most recent speed at which `left == right`; the settle law's target.
    pub last_stable_forward: f64,
}

impl WheelVelocities {
    pub fn new(left: f64, right: f64, last_stable_forward: f64) -> Self {
        Self { left, right, last_stable_forward }
    }

    /// `left - right`, the quantity the settle law keys on
    #[inline]
    pub fn diff(&self) -> f64 {
        self.left - self.right
    }

    #[inline]
    pub fn is_straight(&self) -> bool {
        self.left == self.right
    }
}

#[inline]
pub fn linear_velocity(wheels: &WheelVelocities) -> f64 {
    (wheels.left + wheels.right) / 2.0
}

#[inline]
pub fn angular_velocity(wheels: &WheelVelocities, wheel_base_width: f64) -> f64 {
    (wheels.right - wheels.left) / wheel_base_width
}

/// Forward-Euler step of the differential-drive model.
///
/// `dt` is assumed finite and non-negative and `wheel_base_width` positive;
/// both are enforced upstream (tick validation and vehicle construction).
pub fn integrate(pose: &Pose, wheels: &WheelVelocities, wheel_base_width: f64, dt: f64) -> Pose {
    let v = linear_velocity(wheels);
    Pose {
        x: pose.x + v * pose.heading.cos() * dt,
        y: pose.y - v * pose.heading.sin() * dt,
        heading: pose.heading + angular_velocity(wheels, wheel_base_width) * dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const WHEEL_BASE: f64 = 37.7952;

    #[test]
    fn test_straight_along_x() {
        let pose = Pose::new(200.0, 200.0, 0.0);
        let wheels = WheelVelocities::new(10.0, 10.0, 10.0);
        let next = integrate(&pose, &wheels, WHEEL_BASE, 0.5);
        assert!((next.x - 205.0).abs() < 1e-12);
        assert_eq!(next.y, 200.0);
        assert_eq!(next.heading, 0.0);
    }

    #[test]
    fn test_positive_heading_moves_up_screen() {
        let pose = Pose::new(0.0, 0.0, FRAC_PI_2);
        let wheels = WheelVelocities::new(4.0, 4.0, 4.0);
        let next = integrate(&pose, &wheels, WHEEL_BASE, 1.0);
        assert!(next.x.abs() < 1e-9);
        assert!((next.y + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let pose = Pose::new(12.0, -3.0, 1.2);
        let wheels = WheelVelocities::new(-7.0, 30.0, 0.0);
        assert_eq!(integrate(&pose, &wheels, WHEEL_BASE, 0.0), pose);
    }

    #[test]
    fn test_right_faster_turns_counter_clockwise() {
        let pose = Pose::default();
        let wheels = WheelVelocities::new(0.0, WHEEL_BASE, 0.0);
        let next = integrate(&pose, &wheels, WHEEL_BASE, 0.25);
        assert!((next.heading - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_heading_is_not_wrapped() {
        let mut pose = Pose::default();
        let wheels = WheelVelocities::new(-PI * WHEEL_BASE, PI * WHEEL_BASE, 0.0);
        for _ in 0..4 {
            pose = integrate(&pose, &wheels, WHEEL_BASE, 1.0);
        }
        // 4 ticks x 2π rad/s
        assert!((pose.heading - 4.0 * TAU).abs() < 1e-9);
        assert!(pose.wrapped_heading() < 1e-6 || (TAU - pose.wrapped_heading()) < 1e-6);
    }

    #[test]
    fn test_wrapped_heading_negative() {
        let pose = Pose::new(0.0, 0.0, -FRAC_PI_2);
        assert!((pose.wrapped_heading() - 1.5 * PI).abs() < 1e-12);
        assert_eq!(pose.heading, -FRAC_PI_2);
    }

    #[test]
    fn test_project_inverts_y() {
        let pose = Pose::new(10.0, 10.0, FRAC_PI_2);
        let p = pose.project(pose.heading, 5.0);
        assert!((p.0 - 10.0).abs() < 1e-12);
        assert!((p.1 - 5.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_straight_line_keeps_heading(
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
            heading in -10.0f64..10.0,
            v in -200.0f64..200.0,
            dt in 0.0f64..1.0,
        ) {
            let pose = Pose::new(x, y, heading);
            let wheels = WheelVelocities::new(v, v, v);
            let next = integrate(&pose, &wheels, WHEEL_BASE, dt);

            prop_assert_eq!(next.heading, heading);
            prop_assert!((next.x - (x + v * heading.cos() * dt)).abs() < 1e-9);
            prop_assert!((next.y - (y - v * heading.sin() * dt)).abs() < 1e-9);
            let travelled = ((next.x - x).powi(2) + (next.y - y).powi(2)).sqrt();
            prop_assert!((travelled - v.abs() * dt).abs() < 1e-6);
        }

        #[test]
        fn prop_pure_rotation_keeps_position(
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
            heading in -10.0f64..10.0,
            v in -200.0f64..200.0,
            dt in 0.0f64..1.0,
        ) {
            let pose = Pose::new(x, y, heading);
            let wheels = WheelVelocities::new(-v, v, 0.0);
            let next = integrate(&pose, &wheels, WHEEL_BASE, dt);

            prop_assert_eq!(next.x, x);
            prop_assert_eq!(next.y, y);
            let expected = heading + (2.0 * v) / WHEEL_BASE * dt;
            prop_assert!((next.heading - expected).abs() < 1e-9);
        }
    }
}
