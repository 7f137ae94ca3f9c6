//! A* search over an explicit weighted graph
//!
//! Classic best-first search ordered by cost-to-start plus a heuristic
//! estimate of the remaining cost. With [`Zero`] as heuristic the search
//! degenerates to Dijkstra's algorithm.
//!
//! Per-run bookkeeping (cost, priority, parent) lives in a search-local arena
//! indexed like the graph's node storage, so a [`Graph`] can be searched any
//! number of times without being reset.

use std::collections::HashSet;
use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::common::{PlanningError, Point2D};
use crate::path_planning::graph::{Graph, Node, NodeId};
use crate::path_planning::priority_queue::{Priority, PriorityQueue};

/// Estimate of the remaining cost from `node` to `goal`
pub trait Heuristic {
    fn estimate(&self, node: &Node, goal: &Node) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(&Node, &Node) -> f64,
{
    fn estimate(&self, node: &Node, goal: &Node) -> f64 {
        self(node, goal)
    }
}

/// Straight-line distance between node positions
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Heuristic for Euclidean {
    fn estimate(&self, node: &Node, goal: &Node) -> f64 {
        node.position().distance(&goal.position())
    }
}

/// Always zero, turning A* into Dijkstra
#[derive(Debug, Clone, Copy, Default)]
pub struct Zero;

impl Heuristic for Zero {
    fn estimate(&self, _node: &Node, _goal: &Node) -> f64 {
        0.0
    }
}

/// Configuration for A* planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AStarConfig {
    /// Heuristic weight (1.0 = optimal, >1.0 = faster but suboptimal)
    #[serde(default = "default_heuristic_weight")]
    pub heuristic_weight: f64,
}

fn default_heuristic_weight() -> f64 {
    1.0
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self { heuristic_weight: default_heuristic_weight() }
    }
}

/// Parent of a node at the time it was popped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentLink {
    pub id: NodeId,
    pub position: Point2D,
}

/// One popped node, in pop order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTreeEntry {
    pub id: NodeId,
    pub position: Point2D,
    /// `None` for the start node
    pub parent: Option<ParentLink>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathEntry {
    pub id: NodeId,
    pub position: Point2D,
}

/// Successful search output
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Start to goal, inclusive
    pub path: Vec<PathEntry>,
    pub path_cost: f64,
    pub search_tree: Vec<SearchTreeEntry>,
}

impl SearchResult {
    pub fn path_ids(&self) -> Vec<NodeId> {
        self.path.iter().map(|p| p.id).collect()
    }
}

/// Failed search output: the reason plus whatever was explored before giving up
#[derive(Debug)]
pub struct SearchFailure {
    pub error: PlanningError,
    pub search_tree: Vec<SearchTreeEntry>,
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} nodes explored)", self.error, self.search_tree.len())
    }
}

impl std::error::Error for SearchFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<SearchFailure> for PlanningError {
    fn from(failure: SearchFailure) -> Self {
        failure.error
    }
}

/// Per-run state of one graph node
#[derive(Debug, Clone)]
struct SearchNode {
    finite: bool,
    cost_to_start: f64,
    priority: f64,
    parent: Option<usize>,
}

impl SearchNode {
    fn unreached() -> Self {
        SearchNode {
            finite: false,
            cost_to_start: f64::INFINITY,
            priority: f64::INFINITY,
            parent: None,
        }
    }

    fn queue_priority(&self) -> Priority {
        if self.finite {
            Priority::finite(self.priority)
        } else {
            Priority::infinite()
        }
    }
}

/// A* planner over a borrowed graph
pub struct AStarPlanner<'g, H> {
    graph: &'g Graph,
    heuristic: H,
    config: AStarConfig,
}

impl<'g> AStarPlanner<'g, Euclidean> {
    /// Planner with the Euclidean heuristic
    pub fn euclidean(graph: &'g Graph) -> Self {
        Self::new(graph, Euclidean)
    }
}

impl<'g> AStarPlanner<'g, Zero> {
    /// Planner without heuristic, i.e. Dijkstra
    pub fn dijkstra(graph: &'g Graph) -> Self {
        Self::new(graph, Zero)
    }
}

impl<'g, H: Heuristic> AStarPlanner<'g, H> {
    pub fn new(graph: &'g Graph, heuristic: H) -> Self {
        AStarPlanner { graph, heuristic, config: AStarConfig::default() }
    }

    pub fn with_config(mut self, config: AStarConfig) -> Self {
        self.config = config;
        self
    }

    fn calc_heuristic(&self, node: &Node, goal: &Node) -> f64 {
        self.config.heuristic_weight * self.heuristic.estimate(node, goal)
    }

    /// Search for the cheapest path from `start` to `goal`.
    ///
    /// The search stops as soon as the goal is popped from the open set.
    ///
    /// # Errors
    ///
    /// [`PlanningError::NodeNotFound`] if either id is not in the graph, or
    /// [`PlanningError::GoalNotFound`] with the explored search tree if the
    /// open set runs empty first.
    pub fn search(&self, start: NodeId, goal: NodeId) -> Result<SearchResult, SearchFailure> {
        let fail = |error| SearchFailure { error, search_tree: Vec::new() };
        let start_slot = self.graph.slot_of(start).ok_or_else(|| fail(PlanningError::NodeNotFound(start)))?;
        let goal_slot = self.graph.slot_of(goal).ok_or_else(|| fail(PlanningError::NodeNotFound(goal)))?;
        let goal_node = self.graph.node_at(goal_slot);

        let start_node = self.graph.node_at(start_slot);
        debug!(
            "A* from {} ({:.3}, {:.3}) to {} ({:.3}, {:.3})",
            start, start_node.x, start_node.y, goal, goal_node.x, goal_node.y
        );

        let mut state = vec![SearchNode::unreached(); self.graph.len()];
        let mut unvisited: HashSet<usize> = (0..self.graph.len()).filter(|&s| s != start_slot).collect();
        let mut open_set = PriorityQueue::with_capacity(self.graph.len());
        let mut search_tree = Vec::new();

        state[start_slot] = SearchNode {
            finite: true,
            cost_to_start: 0.0,
            priority: self.calc_heuristic(start_node, goal_node),
            parent: None,
        };
        open_set.push(start_slot, state[start_slot].queue_priority());

        let mut found = false;
        while let Some((current, _)) = open_set.pop() {
            search_tree.push(self.tree_entry(current, &state));

            if current == goal_slot {
                found = true;
                break;
            }

            let current_cost = state[current].cost_to_start;
            for (&neighbor_id, &weight) in &self.graph.node_at(current).neighbors {
                let neighbor = match self.graph.slot_of(neighbor_id) {
                    Some(slot) => slot,
                    None => continue,
                };
                let new_cost = current_cost + weight;
                let first_visit = unvisited.remove(&neighbor);
                if !first_visit && state[neighbor].cost_to_start <= new_cost {
                    continue;
                }

                let neighbor_node = self.graph.node_at(neighbor);
                state[neighbor] = SearchNode {
                    finite: true,
                    cost_to_start: new_cost,
                    priority: new_cost + self.calc_heuristic(neighbor_node, goal_node),
                    parent: Some(current),
                };
                trace!("relaxed {} via {}: cost {:.3}", neighbor_id, self.graph.node_at(current).id, new_cost);

                let priority = state[neighbor].queue_priority();
                if !open_set.update(&neighbor, priority) {
                    open_set.push(neighbor, priority);
                }
            }
        }

        if !found {
            debug!("A* exhausted the open set after {} expansions", search_tree.len());
            return Err(SearchFailure { error: PlanningError::GoalNotFound, search_tree });
        }

        let path = self.calc_final_path(goal_slot, &state);
        let path_cost = state[goal_slot].cost_to_start;
        debug!(
            "A* found a path of {} nodes, cost {:.3}, after {} expansions",
            path.len(),
            path_cost,
            search_tree.len()
        );

        Ok(SearchResult { path, path_cost, search_tree })
    }

    fn tree_entry(&self, slot: usize, state: &[SearchNode]) -> SearchTreeEntry {
        let node = self.graph.node_at(slot);
        SearchTreeEntry {
            id: node.id,
            position: node.position(),
            parent: state[slot].parent.map(|p| {
                let parent = self.graph.node_at(p);
                ParentLink { id: parent.id, position: parent.position() }
            }),
        }
    }

    fn calc_final_path(&self, goal_slot: usize, state: &[SearchNode]) -> Vec<PathEntry> {
        let mut path = Vec::new();
        let mut current = Some(goal_slot);

        while let Some(slot) = current {
            let node = self.graph.node_at(slot);
            path.push(PathEntry { id: node.id, position: node.position() });
            current = state[slot].parent;
        }

        path.reverse();
        path
    }
}

/// A* with the Euclidean heuristic
pub fn a_star(graph: &Graph, start: NodeId, goal: NodeId) -> Result<SearchResult, SearchFailure> {
    AStarPlanner::euclidean(graph).search(start, goal)
}

/// A* with the zero heuristic
pub fn dijkstra(graph: &Graph, start: NodeId, goal: NodeId) -> Result<SearchResult, SearchFailure> {
    AStarPlanner::dijkstra(graph).search(start, goal)
}
