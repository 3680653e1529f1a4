//! Core types for rmc.

mod graph;
mod inference;
mod memory_node;
mod options;
mod relation;
mod result;

pub use graph::*;
pub use inference::*;
pub use memory_node::*;
pub use options::*;
pub use relation::*;
pub use result::*;
