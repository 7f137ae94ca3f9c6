//! Common types used throughout rust_motion_planning

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Unicycle state: position, heading, linear and angular velocity.
///
/// The geometric planner only uses the position and heading; velocities stay
/// at zero unless the configuration space carries dynamic bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct State2D {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "theta")]
    pub yaw: f64,
    pub v: f64,
    #[serde(alias = "w")]
    pub omega: f64,
}

impl State2D {
    pub fn new(x: f64, y: f64, yaw: f64, v: f64, omega: f64) -> Self {
        Self { x, y, yaw, v, omega }
    }

    /// State at rest at the given position with zero heading
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, ..Default::default() }
    }

    /// State at rest with the given pose
    pub fn with_pose(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw, ..Default::default() }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Euclidean distance in the (x, y) plane, ignoring heading and velocities
    pub fn distance(&self, other: &State2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Control input for the unicycle model
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlInput {
    /// linear acceleration
    pub acceleration: f64,
    /// angular acceleration (steering rate)
    pub steering_rate: f64,
}

impl ControlInput {
    pub fn new(acceleration: f64, steering_rate: f64) -> Self {
        Self { acceleration, steering_rate }
    }

    pub fn zero() -> Self {
        Self { acceleration: 0.0, steering_rate: 0.0 }
    }
}

/// One forward-simulated sample: the state reached at `time` and the control
/// that was applied to get there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f64,
    pub state: State2D,
    pub control: ControlInput,
}

impl TrajectorySample {
    pub fn new(time: f64, state: State2D, control: ControlInput) -> Self {
        Self { time, state, control }
    }
}

/// Outcome of a successful steering step.
///
/// `trajectory` is empty for straight-line steering; forward simulation keeps
/// every intermediate sample, timed relative to the start of the step.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub head: State2D,
    pub trajectory: Vec<TrajectorySample>,
}

impl Extension {
    pub fn new(head: State2D) -> Self {
        Self { head, trajectory: Vec::new() }
    }

    pub fn with_trajectory(head: State2D, trajectory: Vec<TrajectorySample>) -> Self {
        Self { head, trajectory }
    }

    /// Duration covered by the trajectory
    pub fn duration(&self) -> f64 {
        self.trajectory.last().map_or(0.0, |s| s.time)
    }
}
