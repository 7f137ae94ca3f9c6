//! RRT (Rapidly-exploring Random Tree) path planning algorithm
//!
//! Sampling-based path planning algorithm that builds a tree by
//! randomly sampling the configuration space. The tree is grown by a
//! pluggable [`Steering`] strategy, so the same loop serves the geometric
//! planner (straight steps) and the kinodynamic one (forward-simulated
//! unicycle trajectories).

use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::common::{
    Extension, PlanningError, PlanningResult, State2D, StateValidator, Steering, TrajectorySample,
};
use crate::path_planning::config_space::{ConfigSpace, GoalRegion, StateSampler};

/// Configuration for the RRT loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RrtConfig {
    /// Maximum number of sampling iterations
    pub max_iterations: usize,
    /// Optional wall-clock budget in seconds
    pub max_duration: Option<f64>,
    /// Seed used by [`Rrt::run_seeded`]
    pub seed: u64,
    /// Euler integration step for kinodynamic steering
    pub integration_step: f64,
}

impl Default for RrtConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            max_duration: None,
            seed: 11,
            integration_step: 0.1,
        }
    }
}

impl RrtConfig {
    /// Wall-clock budget as a [`Duration`], `None` when unlimited
    pub fn time_budget(&self) -> PlanningResult<Option<Duration>> {
        self.max_duration
            .map(|seconds| {
                Duration::try_from_secs_f64(seconds).map_err(|e| {
                    PlanningError::InvalidParameter(format!(
                        "max_duration must be a representable non-negative number of seconds, got {}: {}",
                        seconds, e
                    ))
                })
            })
            .transpose()
    }

    pub fn validate(&self) -> PlanningResult<()> {
        self.time_budget()?;
        if !(self.integration_step > 0.0) || !self.integration_step.is_finite() {
            return Err(PlanningError::InvalidParameter(format!(
                "integration_step must be positive, got {}",
                self.integration_step
            )));
        }
        Ok(())
    }
}

/// Tree vertex. `trajectory` holds the samples of the edge from the parent,
/// timed relative to the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub state: State2D,
    pub parent: Option<usize>,
    pub trajectory: Vec<TrajectorySample>,
}

/// Parent-to-child edge of the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeEdge<'a> {
    pub tail: usize,
    pub head: usize,
    pub tail_state: State2D,
    pub head_state: State2D,
    pub trajectory: &'a [TrajectorySample],
}

/// Arena of vertices rooted at index 0.
///
/// Parents always have a lower index than their children, so parent walks
/// terminate.
#[derive(Debug, Clone, PartialEq)]
pub struct RrtTree {
    vertices: Vec<Vertex>,
}

impl RrtTree {
    pub fn new(root: State2D) -> Self {
        RrtTree {
            vertices: vec![Vertex { state: root, parent: None, trajectory: Vec::new() }],
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// A tree always holds its root
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn root(&self) -> &State2D {
        &self.vertices[0].state
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Attach the head of `extension` below `parent`; returns the new index
    pub fn attach(&mut self, parent: usize, extension: Extension) -> PlanningResult<usize> {
        if parent >= self.vertices.len() {
            return Err(PlanningError::NodeNotInTree(parent));
        }
        self.vertices.push(Vertex {
            state: extension.head,
            parent: Some(parent),
            trajectory: extension.trajectory,
        });
        Ok(self.vertices.len() - 1)
    }

    /// Index of the vertex closest to `state` in the (x, y) plane; the lowest
    /// index wins ties
    pub fn nearest(&self, state: &State2D) -> usize {
        self.vertices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| OrderedFloat(v.state.distance(state)))
            .map_or(0, |(i, _)| i)
    }

    pub fn edges(&self) -> impl Iterator<Item = TreeEdge<'_>> {
        self.vertices.iter().enumerate().filter_map(move |(head, vertex)| {
            vertex.parent.map(|tail| TreeEdge {
                tail,
                head,
                tail_state: self.vertices[tail].state,
                head_state: vertex.state,
                trajectory: &vertex.trajectory,
            })
        })
    }

    /// Vertex indices from the root to `index`
    pub fn path_indices(&self, index: usize) -> PlanningResult<Vec<usize>> {
        if index >= self.vertices.len() {
            return Err(PlanningError::NodeNotInTree(index));
        }
        let mut indices = vec![index];
        let mut current = index;
        while let Some(parent) = self.vertices[current].parent {
            indices.push(parent);
            current = parent;
        }
        indices.reverse();
        Ok(indices)
    }

    /// Vertex states from the root to `index`
    pub fn path(&self, index: usize) -> PlanningResult<Vec<State2D>> {
        Ok(self
            .path_indices(index)?
            .into_iter()
            .map(|i| self.vertices[i].state)
            .collect())
    }

    /// Edge trajectories from the root to `index`, concatenated and re-timed
    /// from the root. Empty when the edges carry no samples.
    pub fn trajectory(&self, index: usize) -> PlanningResult<Vec<TrajectorySample>> {
        let mut samples = Vec::new();
        let mut offset = 0.0;
        for i in self.path_indices(index)? {
            let edge = &self.vertices[i].trajectory;
            samples.extend(edge.iter().map(|s| TrajectorySample { time: s.time + offset, ..*s }));
            offset = samples.last().map_or(offset, |s| s.time);
        }
        Ok(samples)
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RrtResult {
    pub tree: RrtTree,
    /// States from the start to the first vertex inside the goal region
    pub path: Vec<State2D>,
    /// Concatenated edge samples along `path` (kinodynamic steering only)
    pub trajectory: Vec<TrajectorySample>,
    pub goal_index: usize,
    pub iterations: usize,
}

impl RrtResult {
    fn from_tree(tree: RrtTree, goal_index: usize, iterations: usize) -> PlanningResult<Self> {
        let path = tree.path(goal_index)?;
        let trajectory = tree.trajectory(goal_index)?;
        Ok(RrtResult { tree, path, trajectory, goal_index, iterations })
    }

    pub fn edges(&self) -> impl Iterator<Item = TreeEdge<'_>> {
        self.tree.edges()
    }
}

/// RRT planner over a configuration space.
///
/// `S` extends the tree toward each sample, `V` decides which states are
/// admissible.
pub struct Rrt<S, V> {
    space: ConfigSpace,
    sampler: StateSampler,
    steering: S,
    validator: V,
    config: RrtConfig,
}

impl<S: Steering, V: StateValidator> Rrt<S, V> {
    pub fn new(space: ConfigSpace, steering: S, validator: V, config: RrtConfig) -> PlanningResult<Self> {
        config.validate()?;
        let sampler = StateSampler::new(&space)?;
        Ok(Rrt { space, sampler, steering, validator, config })
    }

    pub fn space(&self) -> &ConfigSpace {
        &self.space
    }

    pub fn config(&self) -> &RrtConfig {
        &self.config
    }

    /// Grow a tree from `start` until a vertex lands inside `goal`.
    ///
    /// # Errors
    ///
    /// [`PlanningError::PathNotFound`] once the iteration or time budget is
    /// exhausted.
    pub fn run<R: Rng + ?Sized>(
        &self,
        start: &State2D,
        goal: &GoalRegion,
        rng: &mut R,
    ) -> PlanningResult<RrtResult> {
        debug!(
            "RRT from ({:.3}, {:.3}) to goal ({:.3}, {:.3}) r={:.3}",
            start.x, start.y, goal.x, goal.y, goal.radius
        );
        let mut tree = RrtTree::new(*start);
        if goal.contains(tree.root()) {
            debug!("RRT start already inside the goal region");
            return RrtResult::from_tree(tree, 0, 0);
        }

        let started = Instant::now();
        let budget = self.config.time_budget()?;

        for iteration in 1..=self.config.max_iterations {
            if let Some(budget) = budget {
                if started.elapsed() >= budget {
                    warn!(
                        "RRT time budget of {:?} exhausted after {} iterations, {} vertices",
                        budget,
                        iteration - 1,
                        tree.len()
                    );
                    return Err(PlanningError::PathNotFound { iterations: iteration - 1 });
                }
            }

            let sample = self.sampler.sample(rng);
            let nearest = tree.nearest(&sample);
            let from = tree
                .vertex(nearest)
                .map(|vertex| vertex.state)
                .ok_or(PlanningError::NodeNotInTree(nearest))?;

            let extension = match self.steering.steer(&from, &sample, &self.validator) {
                Some(extension) => extension,
                None => {
                    trace!(
                        "iteration {}: step from vertex {} toward ({:.3}, {:.3}) discarded",
                        iteration, nearest, sample.x, sample.y
                    );
                    continue;
                }
            };

            let index = tree.attach(nearest, extension)?;
            if tree.vertex(index).map_or(false, |vertex| goal.contains(&vertex.state)) {
                debug!(
                    "RRT reached the goal after {} iterations with {} vertices",
                    iteration,
                    tree.len()
                );
                return RrtResult::from_tree(tree, index, iteration);
            }
        }

        warn!(
            "RRT gave up after {} iterations with {} vertices",
            self.config.max_iterations,
            tree.len()
        );
        Err(PlanningError::PathNotFound { iterations: self.config.max_iterations })
    }

    /// [`run`](Self::run) with a generator seeded from the configuration
    pub fn run_seeded(&self, start: &State2D, goal: &GoalRegion) -> PlanningResult<RrtResult> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.run(start, goal, &mut rng)
    }
}
