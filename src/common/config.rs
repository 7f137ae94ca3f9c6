//! YAML configuration for sampling-based planning runs.
//!
//! A single document describes the workspace, obstacles, the optional robot
//! footprint, RRT settings and a list of problems:
//!
//! ```yaml
//! config_space:
//!   x_min: 0.0
//!   x_max: 100.0
//!   y_min: 0.0
//!   y_max: 100.0
//! obstacles:
//!   - { x: 50.0, y: 50.0, radius: 10.0 }
//! robot: [[1.0, 0.5], [-1.0, 0.5], [-1.0, -0.5], [1.0, -0.5]]
//! rrt:
//!   seed: 11
//! problems:
//!   - start: { x: 10.0, y: 10.0 }
//!     goal: { x: 90.0, y: 90.0, radius: 5.0 }
//!     epsilon: 5.0
//! ```

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::common::{PlanningError, PlanningResult};
use crate::path_planning::config_space::{CircleObstacle, ConfigSpace, Problem, RobotFootprint};
use crate::path_planning::rrt::{Rrt, RrtConfig, RrtResult};
use crate::path_planning::safety::SafetyOracle;
use crate::path_planning::steering::build_steering;

/// Everything needed to run the RRT planner on a set of problems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub config_space: ConfigSpace,
    #[serde(default)]
    pub obstacles: Vec<CircleObstacle>,
    #[serde(default)]
    pub robot: Option<RobotFootprint>,
    #[serde(default)]
    pub rrt: RrtConfig,
    #[serde(default)]
    pub problems: Vec<Problem>,
}

impl PlanningConfig {
    pub fn new(config_space: ConfigSpace) -> Self {
        PlanningConfig {
            config_space,
            obstacles: Vec::new(),
            robot: None,
            rrt: RrtConfig::default(),
            problems: Vec::new(),
        }
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> PlanningResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        debug!("loading planning config from {}", path.display());
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string and validate it
    pub fn from_yaml(yaml: &str) -> PlanningResult<Self> {
        let config: PlanningConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> PlanningResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> PlanningResult<()> {
        self.config_space.validate()?;
        self.rrt.validate()?;
        if let Some(o) = self.obstacles.iter().find(|o| !(o.radius >= 0.0)) {
            return Err(PlanningError::ConfigError(format!(
                "obstacle at ({}, {}) has invalid radius {}",
                o.x, o.y, o.radius
            )));
        }
        Ok(())
    }

    pub fn safety_oracle(&self) -> SafetyOracle {
        let oracle = SafetyOracle::new(self.config_space.clone(), self.obstacles.clone());
        match &self.robot {
            Some(footprint) => oracle.with_footprint(footprint.clone()),
            None => oracle,
        }
    }

    /// Run the planner on the problem at `index`, seeded from the RRT settings
    pub fn solve(&self, index: usize) -> PlanningResult<RrtResult> {
        let problem = self.problems.get(index).ok_or_else(|| {
            PlanningError::InvalidParameter(format!(
                "problem {} requested but only {} configured",
                index,
                self.problems.len()
            ))
        })?;
        debug!("solving problem {} '{}' with {:?} steering", index, problem.name, problem.steering);
        let steering = build_steering(problem, &self.config_space, self.rrt.integration_step)?;
        let planner = Rrt::new(
            self.config_space.clone(),
            steering,
            self.safety_oracle(),
            self.rrt.clone(),
        )?;
        planner.run_seeded(&problem.start, &problem.goal)
    }
}
