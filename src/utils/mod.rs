/// Batch statistics over sorted slices
pub mod helper;

mod node;
pub use node::{NodeArena, NodeId};
