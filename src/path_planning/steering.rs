//! Steering functions for the RRT planner
//!
//! Two strategies extend the tree toward a sample:
//! - [`StraightLineSteering`]: fixed-length straight steps with a sampled
//!   collision check along the segment
//! - [`KinodynamicSteering`]: forward simulation of a unicycle under bounded
//!   acceleration and steering rate

use log::trace;

use crate::common::geometry::clamp;
use crate::common::{
    ControlInput, Extension, MotionModel, PlanningError, PlanningResult, State2D, StateValidator,
    Steering, TrajectorySample,
};
use crate::path_planning::config_space::{ConfigSpace, DynamicBounds, Problem, SteeringMode};

/// Straight-line steering of at most `epsilon` per step
#[derive(Debug, Clone, Copy)]
pub struct StraightLineSteering {
    epsilon: f64,
    allow_small_steps: bool,
    resolution: f64,
}

impl StraightLineSteering {
    /// Segments are checked only at their endpoints until
    /// [`with_resolution`](Self::with_resolution) says otherwise
    pub fn new(epsilon: f64, allow_small_steps: bool) -> PlanningResult<Self> {
        if !(epsilon > 0.0) || !epsilon.is_finite() {
            return Err(PlanningError::InvalidParameter(format!(
                "step size must be positive, got {}",
                epsilon
            )));
        }
        Ok(StraightLineSteering { epsilon, allow_small_steps, resolution: epsilon })
    }

    /// Spacing of the collision samples taken along each step
    pub fn with_resolution(mut self, resolution: f64) -> PlanningResult<Self> {
        if !(resolution > 0.0) || !resolution.is_finite() {
            return Err(PlanningError::InvalidParameter(format!(
                "collision check resolution must be positive, got {}",
                resolution
            )));
        }
        self.resolution = resolution;
        Ok(self)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Point `epsilon` away from `from` in the direction of `toward`.
    ///
    /// With small steps allowed, a target closer than `epsilon` is returned
    /// as is. The head takes heading and velocities from `toward`.
    pub fn step_toward(&self, from: &State2D, toward: &State2D) -> Option<State2D> {
        let distance = from.distance(toward);
        if distance == 0.0 {
            return None;
        }
        if self.allow_small_steps && distance < self.epsilon {
            return Some(*toward);
        }
        let scale = self.epsilon / distance;
        Some(State2D {
            x: from.x + (toward.x - from.x) * scale,
            y: from.y + (toward.y - from.y) * scale,
            ..*toward
        })
    }
}

impl Steering for StraightLineSteering {
    fn steer(
        &self,
        from: &State2D,
        toward: &State2D,
        validator: &dyn StateValidator,
    ) -> Option<Extension> {
        let head = self.step_toward(from, toward)?;
        if validator.is_valid(&head) && validator.is_segment_valid(from, &head, self.resolution) {
            Some(Extension::new(head))
        } else {
            None
        }
    }
}

/// Unicycle with first-order velocity dynamics, integrated by explicit Euler
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicycleModel;

impl MotionModel for UnicycleModel {
    type State = State2D;
    type Control = ControlInput;

    fn propagate(&self, state: &State2D, control: &ControlInput, dt: f64) -> State2D {
        State2D {
            x: state.x + dt * state.v * state.yaw.cos(),
            y: state.y + dt * state.v * state.yaw.sin(),
            yaw: state.yaw + dt * state.omega,
            v: state.v + dt * control.acceleration,
            omega: state.omega + dt * control.steering_rate,
        }
    }
}

/// Shortest and longest simulated step duration
const MIN_STEER_TIME: f64 = 1.0;
const MAX_STEER_TIME: f64 = 10.0;

/// Forward-simulating steering.
///
/// A constant control is chosen that would bring the velocities of `from` to
/// those of the sample, clamped to the acceleration and steering-rate limits,
/// and applied for a duration derived from `epsilon` and the average speed.
#[derive(Debug, Clone)]
pub struct KinodynamicSteering<M = UnicycleModel> {
    epsilon: f64,
    step: f64,
    bounds: DynamicBounds,
    model: M,
}

impl KinodynamicSteering<UnicycleModel> {
    pub fn new(epsilon: f64, step: f64, bounds: DynamicBounds) -> PlanningResult<Self> {
        Self::with_model(epsilon, step, bounds, UnicycleModel)
    }
}

impl<M> KinodynamicSteering<M>
where
    M: MotionModel<State = State2D, Control = ControlInput>,
{
    pub fn with_model(epsilon: f64, step: f64, bounds: DynamicBounds, model: M) -> PlanningResult<Self> {
        if !(epsilon > 0.0) || !epsilon.is_finite() {
            return Err(PlanningError::InvalidParameter(format!(
                "step size must be positive, got {}",
                epsilon
            )));
        }
        if !(step > 0.0) || !step.is_finite() {
            return Err(PlanningError::InvalidParameter(format!(
                "integration step must be positive, got {}",
                step
            )));
        }
        bounds.validate()?;
        Ok(KinodynamicSteering { epsilon, step, bounds, model })
    }

    /// Control to apply from `from` toward `toward` and for how long
    pub fn controls_toward(&self, from: &State2D, toward: &State2D) -> (ControlInput, f64) {
        let dv = toward.v - from.v;
        let domega = toward.omega - from.omega;
        let average_speed = from.v + dv / 2.0;
        // zero speed gives +inf, reversing gives a negative time; both clamp
        let duration = clamp(self.epsilon / average_speed, MIN_STEER_TIME, MAX_STEER_TIME);

        let control = ControlInput::new(
            self.bounds.acceleration.clamp(dv / duration),
            self.bounds.steering_rate.clamp(domega / duration),
        );
        (control, duration)
    }

    /// Integrate `control` from `from` for `duration`, validating every step.
    ///
    /// Returns the samples timed relative to `from`, or `None` at the first
    /// invalid state.
    pub fn simulate(
        &self,
        from: &State2D,
        control: &ControlInput,
        duration: f64,
        validator: &dyn StateValidator,
    ) -> Option<Vec<TrajectorySample>> {
        let mut samples = Vec::new();
        let mut state = *from;
        let mut i = 0usize;
        while (i as f64) * self.step < duration {
            state = self.model.propagate(&state, control, self.step);
            if !validator.is_valid(&state) {
                trace!("forward simulation stopped at step {}: ({:.3}, {:.3})", i, state.x, state.y);
                return None;
            }
            i += 1;
            samples.push(TrajectorySample::new(i as f64 * self.step, state, *control));
        }
        Some(samples)
    }
}

impl<M> Steering for KinodynamicSteering<M>
where
    M: MotionModel<State = State2D, Control = ControlInput>,
{
    fn steer(
        &self,
        from: &State2D,
        toward: &State2D,
        validator: &dyn StateValidator,
    ) -> Option<Extension> {
        let (control, duration) = self.controls_toward(from, toward);
        let samples = self.simulate(from, &control, duration, validator)?;
        let head = samples.last()?.state;
        Some(Extension::with_trajectory(head, samples))
    }
}

/// Steering strategy for `problem` in `space`.
///
/// Kinodynamic steering needs the dynamic bounds of the space and integrates
/// with `integration_step`.
pub fn build_steering(
    problem: &Problem,
    space: &ConfigSpace,
    integration_step: f64,
) -> PlanningResult<Box<dyn Steering>> {
    match problem.steering {
        SteeringMode::Geometric => {
            let steering = StraightLineSteering::new(problem.epsilon, problem.allow_small_steps)?;
            let steering = match problem.delta {
                Some(delta) => steering.with_resolution(delta)?,
                None => steering,
            };
            Ok(Box::new(steering))
        }
        SteeringMode::Kinodynamic => {
            let bounds = space.dynamics.ok_or_else(|| {
                PlanningError::InvalidParameter(
                    "kinodynamic steering requires dynamic bounds".to_string(),
                )
            })?;
            Ok(Box::new(KinodynamicSteering::new(problem.epsilon, integration_step, bounds)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::config_space::{GoalRegion, Interval};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    fn free(_: &State2D) -> bool {
        true
    }

    fn bounds() -> DynamicBounds {
        DynamicBounds {
            velocity: Interval::new(-5.0, 5.0),
            omega: Interval::new(-1.0, 1.0),
            acceleration: Interval::new(-1.0, 1.0),
            steering_rate: Interval::new(-0.5, 0.5),
        }
    }

    #[test]
    fn test_straight_step_vertical() {
        let steering = StraightLineSteering::new(1.0, false).unwrap();
        let head = steering
            .steer(&State2D::at(0.0, 0.0), &State2D::at(0.0, 10.0), &free)
            .unwrap()
            .head;
        assert_relative_eq!(head.x, 0.0);
        assert_relative_eq!(head.y, 1.0);
    }

    #[test]
    fn test_straight_step_horizontal() {
        let steering = StraightLineSteering::new(50.0, false).unwrap();
        let head = steering.step_toward(&State2D::at(0.0, 0.0), &State2D::at(100.0, 0.0)).unwrap();
        assert_relative_eq!(head.x, 50.0);
        assert_relative_eq!(head.y, 0.0);
    }

    #[test]
    fn test_straight_step_diagonal_keeps_heading() {
        let steering = StraightLineSteering::new(2.0_f64.sqrt(), false).unwrap();
        let target = State2D::with_pose(10.0, 10.0, FRAC_PI_4);
        let head = steering.step_toward(&State2D::at(0.0, 0.0), &target).unwrap();
        assert_relative_eq!(head.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(head.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(head.yaw, FRAC_PI_4);
    }

    #[test]
    fn test_small_steps() {
        let origin = State2D::at(0.0, 0.0);
        let target = State2D::at(3.0, 4.0);

        let snapping = StraightLineSteering::new(10.0, true).unwrap();
        assert_eq!(snapping.step_toward(&origin, &target), Some(target));

        let fixed = StraightLineSteering::new(10.0, false).unwrap();
        let head = fixed.step_toward(&origin, &target).unwrap();
        assert_relative_eq!(head.x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(head.y, 8.0, epsilon = 1e-12);

        assert!(snapping.step_toward(&origin, &origin).is_none());
    }

    #[test]
    fn test_straight_step_rejected_along_segment() {
        // a thin wall at x = 5 that both endpoints avoid
        let wall = |s: &State2D| (s.x - 5.0).abs() > 0.2;
        let origin = State2D::at(0.0, 0.0);
        let target = State2D::at(20.0, 0.0);

        let coarse = StraightLineSteering::new(10.0, false).unwrap();
        assert!(coarse.steer(&origin, &target, &wall).is_some());

        let fine = coarse.with_resolution(0.25).unwrap();
        assert!(fine.steer(&origin, &target, &wall).is_none());
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(StraightLineSteering::new(2.5, false).unwrap().epsilon(), 2.5);
        assert!(StraightLineSteering::new(0.0, false).is_err());
        assert!(StraightLineSteering::new(1.0, false).unwrap().with_resolution(-1.0).is_err());
        assert!(KinodynamicSteering::new(1.0, 0.0, bounds()).is_err());
        assert!(KinodynamicSteering::new(f64::NAN, 0.1, bounds()).is_err());
    }

    #[test]
    fn test_unicycle_euler_step() {
        let state = State2D::new(1.0, 2.0, FRAC_PI_4, 2.0, 0.5);
        let next = UnicycleModel.propagate(&state, &ControlInput::new(1.0, -0.2), 0.1);
        assert_relative_eq!(next.x, 1.0 + 0.2 * FRAC_PI_4.cos(), epsilon = 1e-12);
        assert_relative_eq!(next.y, 2.0 + 0.2 * FRAC_PI_4.sin(), epsilon = 1e-12);
        assert_relative_eq!(next.yaw, FRAC_PI_4 + 0.05, epsilon = 1e-12);
        assert_relative_eq!(next.v, 2.1, epsilon = 1e-12);
        assert_relative_eq!(next.omega, 0.48, epsilon = 1e-12);
    }

    #[test]
    fn test_controls_toward() {
        let steering = KinodynamicSteering::new(4.0, 0.1, bounds()).unwrap();

        // average speed 1 -> duration 4, control reaches the target velocities
        let from = State2D::new(0.0, 0.0, 0.0, 0.5, 0.0);
        let toward = State2D::new(5.0, 5.0, 0.0, 1.5, 0.4);
        let (control, duration) = steering.controls_toward(&from, &toward);
        assert_relative_eq!(duration, 4.0);
        assert_relative_eq!(control.acceleration, 0.25);
        assert_relative_eq!(control.steering_rate, 0.1);

        // standing still -> longest duration
        let (_, duration) = steering.controls_toward(&State2D::at(0.0, 0.0), &State2D::at(1.0, 1.0));
        assert_relative_eq!(duration, MAX_STEER_TIME);

        // reversing -> shortest duration, clamped controls
        let toward = State2D::new(0.0, 0.0, 0.0, -4.0, -1.0);
        let (control, duration) = steering.controls_toward(&State2D::at(0.0, 0.0), &toward);
        assert_relative_eq!(duration, MIN_STEER_TIME);
        assert_relative_eq!(control.acceleration, -1.0);
        assert_relative_eq!(control.steering_rate, -0.5);
    }

    #[test]
    fn test_forward_simulation_constant_speed() {
        let steering = KinodynamicSteering::new(1.0, 0.1, bounds()).unwrap();
        let from = State2D::new(0.0, 0.0, 0.0, 1.0, 0.0);
        let toward = State2D::new(10.0, 0.0, 0.0, 1.0, 0.0);

        let extension = steering.steer(&from, &toward, &free).unwrap();
        assert_eq!(extension.trajectory.len(), 10);
        assert_relative_eq!(extension.head.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(extension.head.y, 0.0);
        assert_relative_eq!(extension.duration(), 1.0, epsilon = 1e-9);
        assert!(extension.trajectory.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_forward_simulation_accelerating() {
        let steering = KinodynamicSteering::new(1.0, 0.1, bounds()).unwrap();
        let from = State2D::at(0.0, 0.0);
        let toward = State2D::new(10.0, 0.0, 0.0, 4.0, 0.0);

        // duration clamps to 1 and acceleration to 1
        let extension = steering.steer(&from, &toward, &free).unwrap();
        assert_relative_eq!(extension.head.v, 1.0, epsilon = 1e-9);
        // x = sum of h * v_k for v_k = 0.0, 0.1, ..., 0.9
        assert_relative_eq!(extension.head.x, 0.45, epsilon = 1e-9);
        assert!(extension
            .trajectory
            .iter()
            .all(|s| s.control == ControlInput::new(1.0, 0.0)));
    }

    #[test]
    fn test_forward_simulation_stops_on_unsafe_state() {
        let steering = KinodynamicSteering::new(1.0, 0.1, bounds()).unwrap();
        let from = State2D::new(0.0, 0.0, 0.0, 1.0, 0.0);
        let toward = State2D::new(10.0, 0.0, 0.0, 1.0, 0.0);
        let fence = |s: &State2D| s.x < 0.5;
        assert!(steering.steer(&from, &toward, &fence).is_none());
    }

    #[test]
    fn test_build_steering() {
        let problem = Problem::new(State2D::at(1.0, 1.0), GoalRegion::new(9.0, 9.0, 1.0), 2.0);
        let space = ConfigSpace::new(0.0, 10.0, 0.0, 10.0);
        assert!(build_steering(&problem, &space, 0.1).is_ok());

        let kinodynamic = problem.clone().with_steering(SteeringMode::Kinodynamic);
        assert!(matches!(
            build_steering(&kinodynamic, &space, 0.1),
            Err(PlanningError::InvalidParameter(_))
        ));
        let space = space.with_dynamics(bounds());
        assert!(build_steering(&kinodynamic, &space, 0.1).is_ok());
    }
}
