//! Configuration space, obstacles, robot footprint and problem definitions
//! for the sampling-based planners.

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::common::geometry::{clamp, robot_point_global};
use crate::common::{PlanningError, PlanningResult, Point2D, State2D};

/// Closed range `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `min < value < max`
    pub fn contains_strictly(&self, value: f64) -> bool {
        self.min < value && value < self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        clamp(value, self.min, self.max)
    }

    fn validate(&self, name: &str) -> PlanningResult<()> {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            Ok(())
        } else {
            Err(PlanningError::InvalidParameter(format!(
                "{} bounds [{}, {}] are empty or not finite",
                name, self.min, self.max
            )))
        }
    }
}

/// Velocity, angular velocity, acceleration and steering-rate limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicBounds {
    pub velocity: Interval,
    #[serde(alias = "angular_velocity")]
    pub omega: Interval,
    pub acceleration: Interval,
    #[serde(alias = "gamma")]
    pub steering_rate: Interval,
}

impl DynamicBounds {
    pub fn validate(&self) -> PlanningResult<()> {
        self.velocity.validate("velocity")?;
        self.omega.validate("angular velocity")?;
        self.acceleration.validate("acceleration")?;
        self.steering_rate.validate("steering rate")
    }

    /// Whether `v` and `omega` lie strictly inside their limits
    pub fn admits(&self, state: &State2D) -> bool {
        self.velocity.contains_strictly(state.v) && self.omega.contains_strictly(state.omega)
    }
}

/// Axis-aligned workspace plus optional dynamic limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSpace {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    #[serde(default)]
    pub dynamics: Option<DynamicBounds>,
}

impl ConfigSpace {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        ConfigSpace { x_min, x_max, y_min, y_max, dynamics: None }
    }

    pub fn with_dynamics(mut self, dynamics: DynamicBounds) -> Self {
        self.dynamics = Some(dynamics);
        self
    }

    pub fn x_range(&self) -> Interval {
        Interval::new(self.x_min, self.x_max)
    }

    pub fn y_range(&self) -> Interval {
        Interval::new(self.y_min, self.y_max)
    }

    pub fn validate(&self) -> PlanningResult<()> {
        self.x_range().validate("x")?;
        self.y_range().validate("y")?;
        match &self.dynamics {
            Some(dynamics) => dynamics.validate(),
            None => Ok(()),
        }
    }

    /// Whether the point lies strictly inside the workspace
    pub fn contains(&self, point: &Point2D) -> bool {
        self.x_range().contains_strictly(point.x) && self.y_range().contains_strictly(point.y)
    }
}

/// Circular obstacle (x, y, radius)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleObstacle {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "r")]
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// A point on the rim counts as a collision
    pub fn collides(&self, point: &Point2D) -> bool {
        self.center().distance(point) <= self.radius
    }
}

/// Circular goal region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalRegion {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "r")]
    pub radius: f64,
}

impl GoalRegion {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Strict containment: a state exactly on the rim is not in the goal
    pub fn contains(&self, state: &State2D) -> bool {
        state.position().distance(&self.center()) < self.radius
    }
}

/// Rigid robot outline given as points in the robot frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RobotFootprint {
    points: Vec<Point2D>,
}

impl RobotFootprint {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    /// Footprint of a point robot
    pub fn point() -> Self {
        Self { points: vec![Point2D::origin()] }
    }

    /// Axis-aligned rectangle centred on the robot origin, corners only
    pub fn rectangle(length: f64, width: f64) -> Self {
        let (hl, hw) = (length / 2.0, width / 2.0);
        Self::new(
            [(hl, hw), (-hl, hw), (-hl, -hw), (hl, -hw)]
                .into_iter()
                .map(Point2D::from)
                .collect(),
        )
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Footprint points in the global frame for the given state
    pub fn global_points<'a>(&'a self, state: &'a State2D) -> impl Iterator<Item = Point2D> + 'a {
        self.points.iter().map(move |p| robot_point_global(state, p))
    }
}

impl Default for RobotFootprint {
    fn default() -> Self {
        Self::point()
    }
}

/// How the tree is extended toward a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringMode {
    /// Fixed-length straight-line steps
    #[default]
    Geometric,
    /// Forward-simulated unicycle trajectories
    Kinodynamic,
}

/// A single planning query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(default)]
    pub name: String,
    pub start: State2D,
    #[serde(alias = "goal_region")]
    pub goal: GoalRegion,
    pub epsilon: f64,
    /// Collision-check spacing along geometric steps; defaults to `epsilon`
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default, alias = "allow_steps_smaller_than_epsilon")]
    pub allow_small_steps: bool,
    #[serde(default)]
    pub steering: SteeringMode,
}

impl Problem {
    pub fn new(start: State2D, goal: GoalRegion, epsilon: f64) -> Self {
        Problem {
            name: String::new(),
            start,
            goal,
            epsilon,
            delta: None,
            allow_small_steps: false,
            steering: SteeringMode::Geometric,
        }
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    pub fn with_small_steps(mut self, allow: bool) -> Self {
        self.allow_small_steps = allow;
        self
    }

    pub fn with_steering(mut self, steering: SteeringMode) -> Self {
        self.steering = steering;
        self
    }
}

/// Uniform sampler over a [`ConfigSpace`].
///
/// Heading is drawn from `(-pi, pi]`; velocities are drawn only when the
/// space carries dynamic bounds and stay zero otherwise.
#[derive(Debug, Clone)]
pub struct StateSampler {
    x: Uniform<f64>,
    y: Uniform<f64>,
    velocity: Option<(Uniform<f64>, Uniform<f64>)>,
}

impl StateSampler {
    pub fn new(space: &ConfigSpace) -> PlanningResult<Self> {
        space.validate()?;
        Ok(StateSampler {
            x: Uniform::new(space.x_min, space.x_max),
            y: Uniform::new(space.y_min, space.y_max),
            velocity: space.dynamics.map(|d| {
                (
                    Uniform::new(d.velocity.min, d.velocity.max),
                    Uniform::new(d.omega.min, d.omega.max),
                )
            }),
        })
    }
}

impl Distribution<State2D> for StateSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> State2D {
        let x = self.x.sample(rng);
        let y = self.y.sample(rng);
        let yaw = PI - 2.0 * PI * rng.gen::<f64>();
        let (v, omega) = match &self.velocity {
            Some((v, omega)) => (v.sample(rng), omega.sample(rng)),
            None => (0.0, 0.0),
        };
        State2D::new(x, y, yaw, v, omega)
    }
}
