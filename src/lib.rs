//! RustMotionPlanning - A* graph search and RRT motion planning in 2D
//!
//! This crate provides:
//! - an informed graph search (A*) over weighted directed graphs with
//!   positioned nodes, backed by an indexed priority queue
//! - a rapidly-exploring random tree planner over a bounded 2D workspace
//!   with circular obstacles and a rigid robot footprint, using either
//!   straight-line steering or forward-simulated unicycle dynamics

// Core modules
pub mod common;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{ControlInput, Extension, Point2D, State2D, TrajectorySample};
pub use common::{MotionModel, StateValidator, Steering};
pub use common::{PlanningConfig, PlanningError, PlanningResult};
