//! Error types for rust_motion_planning

use std::fmt;

use crate::path_planning::graph::NodeId;

/// Main error type for the planners
#[derive(Debug)]
pub enum PlanningError {
    /// A node id referenced by a search or an edge is not part of the graph
    NodeNotFound(NodeId),
    /// A* exhausted its open set before popping the goal
    GoalNotFound,
    /// RRT exhausted its iteration or time budget without reaching the goal region
    PathNotFound { iterations: usize },
    /// A vertex index is not part of the RRT tree
    NodeNotInTree(usize),
    /// Invalid parameter
    InvalidParameter(String),
    /// Configuration could not be parsed
    ConfigError(String),
    /// I/O error
    IoError(std::io::Error),
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningError::NodeNotFound(id) => write!(f, "Node {} is not in the graph", id),
            PlanningError::GoalNotFound => write!(f, "Search did not find the goal"),
            PlanningError::PathNotFound { iterations } => {
                write!(f, "No path found after {} iterations", iterations)
            }
            PlanningError::NodeNotInTree(index) => write!(f, "Vertex {} is not in the tree", index),
            PlanningError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlanningError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            PlanningError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PlanningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanningError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlanningError {
    fn from(e: std::io::Error) -> Self {
        PlanningError::IoError(e)
    }
}

impl From<serde_yaml::Error> for PlanningError {
    fn from(e: serde_yaml::Error) -> Self {
        PlanningError::ConfigError(e.to_string())
    }
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;
