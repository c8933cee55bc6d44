//! Arena scene graph
//!
//! Minimal pose hierarchy the chain builder walks and the solver writes
//! rotations into.

mod graph;
mod node;

pub use graph::Scene;
pub use node::{Node, NodeId};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0} does not exist in the scene")]
    UnknownNode(NodeId),
}
