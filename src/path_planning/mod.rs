// Path Planning algorithms module

pub mod priority_queue;
pub mod graph;
pub mod a_star;
pub mod config_space;
pub mod safety;
pub mod steering;
pub mod rrt;

pub use priority_queue::*;
pub use graph::*;
pub use a_star::*;
pub use config_space::*;
pub use safety::*;
pub use steering::*;
pub use rrt::*;
