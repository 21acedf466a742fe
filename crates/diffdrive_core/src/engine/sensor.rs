//! Three-ray obstacle sensor
//!
//! Rays start at a point `standoff` ahead of the vehicle center and fan out at
//! `heading - spread`, `heading`, `heading + spread`. Heading grows
//! counter-clockwise on screen, so that order is right, front, left. Only a
//! blocked front ray produces a correction; side rays are reported only.

use serde::{Deserialize, Serialize};

use super::controller::Command;
use super::kinematics::{project_from, Point, Pose};
use super::world::TraversabilityOracle;
use crate::config::SensorConfig;

pub const RAY_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RayPosition {
    Right,
    Front,
    Left,
}

impl RayPosition {
    /// Ascending-angle order used for the reading array
    pub const ALL: [RayPosition; RAY_COUNT] =
        [RayPosition::Right, RayPosition::Front, RayPosition::Left];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            RayPosition::Right => 0,
            RayPosition::Front => 1,
            RayPosition::Left => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayReading {
    pub position: RayPosition,
    /// Absolute ray angle (radians)
    pub angle: f64,
    pub endpoint: Point,
    pub blocked: bool,
}

/// One tick's sample; never carried over to the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub origin: Point,
    pub rays: [RayReading; RAY_COUNT],
}

impl SensorReading {
    pub fn ray(&self, position: RayPosition) -> &RayReading {
        &self.rays[position.index()]
    }

    pub fn front(&self) -> &RayReading {
        self.ray(RayPosition::Front)
    }

    pub fn left(&self) -> &RayReading {
        self.ray(RayPosition::Left)
    }

    pub fn right(&self) -> &RayReading {
        self.ray(RayPosition::Right)
    }

    pub fn any_blocked(&self) -> bool {
        self.rays.iter().any(|r| r.blocked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSensor {
    config: SensorConfig,
}

impl ObstacleSensor {
    pub fn new(config: SensorConfig) -> Self {
        Self { config }
    }

    /// Ray origin: `standoff` ahead of the vehicle center along its heading
    pub fn origin(&self, pose: &Pose) -> Point {
        pose.project(pose.heading, self.config.standoff)
    }

    /// Three angles evenly spaced over `[heading - spread, heading + spread]`
    pub fn ray_angles(&self, heading: f64) -> [f64; RAY_COUNT] {
        let spread = self.config.spread_degrees.to_radians();
        let start = heading - spread;
        let step = (2.0 * spread) / (RAY_COUNT - 1) as f64;
        let mut angles = [0.0; RAY_COUNT];
        for (i, angle) in angles.iter_mut().enumerate() {
            *angle = start + step * i as f64;
        }
        // the center ray is exactly the heading
        angles[RayPosition::Front.index()] = heading;
        angles
    }

    pub fn sense(&self, pose: &Pose, oracle: &dyn TraversabilityOracle) -> SensorReading {
        let origin = self.origin(pose);
        let angles = self.ray_angles(pose.heading);

        let rays = RayPosition::ALL.map(|position| {
            let angle = angles[position.index()];
            let endpoint = project_from(origin, angle, self.config.ray_length);
            RayReading { position, angle, endpoint, blocked: oracle.is_blocked(endpoint) }
        });

        let reading = SensorReading { origin, rays };
        log::debug!(
            "[Sensor] Front {:?} {} Left {:?} {} Right {:?} {}",
            reading.front().endpoint,
            reading.front().blocked,
            reading.left().endpoint,
            reading.left().blocked,
            reading.right().endpoint,
            reading.right().blocked,
        );
        reading
    }

    /// Corrective command for the next tick, if the front ray is blocked.
    pub fn correction(&self, reading: &SensorReading) -> Option<Command> {
        if self.config.reactive_avoidance && reading.front().blocked {
            Some(Command::TurnRight)
        } else {
            None
        }
    }
}
