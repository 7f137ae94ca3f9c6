//! Weighted directed graph with 2D node positions.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::common::{PlanningError, PlanningResult, Point2D};

pub type NodeId = usize;

/// Node record as handed over by a graph reader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// Directed edge record as handed over by a graph reader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub tail: NodeId,
    pub head: NodeId,
    pub weight: f64,
}

impl EdgeRecord {
    pub fn new(tail: NodeId, head: NodeId, weight: f64) -> Self {
        Self { tail, head, weight }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    /// neighbor id -> edge weight
    pub neighbors: BTreeMap<NodeId, f64>,
}

impl Node {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Node { id, x, y, neighbors: BTreeMap::new() }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Graph storage.
///
/// Nodes live in a dense vector; `index` maps external ids to slots so the
/// search can keep its per-run state in plain vectors.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from node and edge records.
    ///
    /// A repeated (tail, head) pair overwrites the earlier weight.
    ///
    /// # Errors
    ///
    /// If an id is duplicated, an edge references an unknown node, or a
    /// weight is negative.
    pub fn from_records(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> PlanningResult<Self> {
        let mut graph = Graph::new();
        for n in nodes {
            graph.add_node(n.id, n.x, n.y)?;
        }
        for e in edges {
            graph.add_edge(e.tail, e.head, e.weight)?;
        }
        Ok(graph)
    }

    pub fn add_node(&mut self, id: NodeId, x: f64, y: f64) -> PlanningResult<()> {
        if self.index.contains_key(&id) {
            return Err(PlanningError::InvalidParameter(format!("duplicate node id {}", id)));
        }
        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node::new(id, x, y));
        Ok(())
    }

    pub fn add_edge(&mut self, tail: NodeId, head: NodeId, weight: f64) -> PlanningResult<()> {
        if !(weight >= 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "edge {} -> {} has invalid weight {}",
                tail, head, weight
            )));
        }
        if !self.index.contains_key(&head) {
            return Err(PlanningError::NodeNotFound(head));
        }
        let slot = *self.index.get(&tail).ok_or(PlanningError::NodeNotFound(tail))?;
        self.nodes[slot].neighbors.insert(head, weight);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn edge_weight(&self, tail: NodeId, head: NodeId) -> Option<f64> {
        self.node(tail)?.neighbors.get(&head).copied()
    }

    /// Sum of the edge weights along `ids`, or `None` if two consecutive ids
    /// are not connected
    pub fn path_cost(&self, ids: &[NodeId]) -> Option<f64> {
        ids.iter()
            .tuple_windows()
            .map(|(&a, &b)| self.edge_weight(a, b))
            .sum()
    }

    pub(crate) fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(crate) fn node_at(&self, slot: usize) -> &Node {
        &self.nodes[slot]
    }
}
