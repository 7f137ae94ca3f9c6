//! Common types, traits, and error definitions for rust_motion_planning
//!
//! This module provides the building blocks shared by the graph search and
//! the sampling-based planners.

pub mod types;
pub mod traits;
pub mod error;
pub mod geometry;
pub mod config;

pub use types::*;
pub use traits::*;
pub use error::*;
pub use config::PlanningConfig;
