//! State admissibility: workspace bounds, dynamic limits and circular
//! obstacles evaluated over the robot footprint.

use crate::common::{Point2D, State2D, StateValidator};
use crate::path_planning::config_space::{CircleObstacle, ConfigSpace, RobotFootprint};

/// Decides whether a robot state is safe.
///
/// A state is safe when every footprint point (in the global frame) and the
/// reference position lie strictly inside the workspace, no such point lies
/// inside or on an obstacle, and, if the space carries dynamic bounds, the
/// velocities lie strictly inside them.
#[derive(Debug, Clone)]
pub struct SafetyOracle {
    space: ConfigSpace,
    obstacles: Vec<CircleObstacle>,
    footprint: RobotFootprint,
}

impl SafetyOracle {
    pub fn new(space: ConfigSpace, obstacles: Vec<CircleObstacle>) -> Self {
        SafetyOracle { space, obstacles, footprint: RobotFootprint::point() }
    }

    pub fn with_footprint(mut self, footprint: RobotFootprint) -> Self {
        self.footprint = if footprint.is_empty() { RobotFootprint::point() } else { footprint };
        self
    }

    pub fn space(&self) -> &ConfigSpace {
        &self.space
    }

    pub fn obstacles(&self) -> &[CircleObstacle] {
        &self.obstacles
    }

    pub fn footprint(&self) -> &RobotFootprint {
        &self.footprint
    }

    fn point_is_free(&self, point: &Point2D) -> bool {
        self.space.contains(point) && !self.obstacles.iter().any(|o| o.collides(point))
    }

    pub fn is_safe(&self, state: &State2D) -> bool {
        if let Some(dynamics) = &self.space.dynamics {
            if !dynamics.admits(state) {
                return false;
            }
        }
        self.space.contains(&state.position())
            && self.footprint.global_points(state).all(|p| self.point_is_free(&p))
    }
}

impl StateValidator for SafetyOracle {
    fn is_valid(&self, state: &State2D) -> bool {
        self.is_safe(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::config_space::{DynamicBounds, Interval};
    use std::f64::consts::PI;

    fn oracle() -> SafetyOracle {
        SafetyOracle::new(
            ConfigSpace::new(0.0, 100.0, 0.0, 100.0),
            vec![CircleObstacle::new(50.0, 50.0, 10.0)],
        )
    }

    #[test]
    fn test_point_robot() {
        let oracle = oracle();
        assert!(oracle.is_safe(&State2D::at(10.0, 10.0)));
        assert!(!oracle.is_safe(&State2D::at(50.0, 55.0)));
        // on the obstacle rim
        assert!(!oracle.is_safe(&State2D::at(50.0, 60.0)));
        assert!(oracle.is_safe(&State2D::at(50.0, 60.5)));
        // on or beyond the workspace boundary
        assert!(!oracle.is_safe(&State2D::at(0.0, 10.0)));
        assert!(!oracle.is_safe(&State2D::at(10.0, 100.0)));
        assert!(!oracle.is_safe(&State2D::at(-1.0, 10.0)));
    }

    #[test]
    fn test_footprint_rotation() {
        // 10 m long, 1 m wide bar
        let oracle = oracle().with_footprint(RobotFootprint::rectangle(10.0, 1.0));
        let state = State2D::with_pose(50.0, 33.0, 0.0);
        assert!(oracle.is_safe(&state));
        // rotated upright, the front corners reach y = 38 and stay clear
        let upright = State2D::with_pose(50.0, 33.0, PI / 2.0);
        assert!(oracle.is_safe(&upright));
        let closer = State2D::with_pose(50.0, 36.0, PI / 2.0);
        assert!(!oracle.is_safe(&closer));
        // corners leave the workspace near the wall
        assert!(!oracle.is_safe(&State2D::with_pose(3.0, 50.0, 0.0)));
        assert!(oracle.is_safe(&State2D::with_pose(3.0, 50.0, PI / 2.0)));
    }

    #[test]
    fn test_dynamic_bounds() {
        let dynamics = DynamicBounds {
            velocity: Interval::new(-1.0, 2.0),
            omega: Interval::new(-0.5, 0.5),
            acceleration: Interval::new(-1.0, 1.0),
            steering_rate: Interval::new(-1.0, 1.0),
        };
        let oracle = SafetyOracle::new(
            ConfigSpace::new(0.0, 10.0, 0.0, 10.0).with_dynamics(dynamics),
            Vec::new(),
        );
        assert!(oracle.is_safe(&State2D::new(5.0, 5.0, 0.0, 1.0, 0.2)));
        assert!(!oracle.is_safe(&State2D::new(5.0, 5.0, 0.0, 2.0, 0.2)));
        assert!(!oracle.is_safe(&State2D::new(5.0, 5.0, 0.0, 1.0, -0.5)));
    }

    #[test]
    fn test_segment_validation() {
        let oracle = oracle();
        let tail = State2D::at(30.0, 50.0);
        let head = State2D::at(70.0, 50.0);
        // endpoints alone are safe, intermediate samples are not
        assert!(oracle.is_segment_valid(&tail, &head, 40.0));
        assert!(!oracle.is_segment_valid(&tail, &head, 1.0));
    }
}
