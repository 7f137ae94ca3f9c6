//! Common traits defining the seams between the planners and their collaborators

use crate::common::geometry::points_along;
use crate::common::types::*;

/// Trait for vehicle/robot motion models
pub trait MotionModel {
    /// State type
    type State;
    /// Control type
    type Control;

    /// Propagate state forward in time
    fn propagate(&self, state: &Self::State, control: &Self::Control, dt: f64) -> Self::State;
}

/// Admissibility check for candidate states
pub trait StateValidator {
    /// Whether `state` is inside the configuration space and collision free
    fn is_valid(&self, state: &State2D) -> bool;

    /// Whether every sample of the straight segment `tail -> head`, taken
    /// `resolution` apart, is valid
    fn is_segment_valid(&self, tail: &State2D, head: &State2D, resolution: f64) -> bool {
        points_along(tail, head, resolution).all(|state| self.is_valid(&state))
    }
}

impl<F> StateValidator for F
where
    F: Fn(&State2D) -> bool,
{
    fn is_valid(&self, state: &State2D) -> bool {
        self(state)
    }
}

/// Steering strategy used to grow a sampling-based tree
pub trait Steering {
    /// Move from `from` toward `toward`.
    ///
    /// Returns `None` if any state visited along the way fails `validator`;
    /// the step is then discarded as a whole.
    fn steer(
        &self,
        from: &State2D,
        toward: &State2D,
        validator: &dyn StateValidator,
    ) -> Option<Extension>;
}

impl<S: Steering + ?Sized> Steering for Box<S> {
    fn steer(
        &self,
        from: &State2D,
        toward: &State2D,
        validator: &dyn StateValidator,
    ) -> Option<Extension> {
        (**self).steer(from, toward, validator)
    }
}
