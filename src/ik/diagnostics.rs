use crate::scene::{NodeId, SceneError};
use thiserror::Error;

/// Non-fatal structural findings. A chain that carries warnings is still
/// usable by the solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainWarning {
    #[error("chain has {bones} bones but {joints} joints, expected one fewer joint than bones")]
    JointCountMismatch { bones: usize, joints: usize },

    #[error("bone {bone} links to joint {found:?}, expected {expected:?}")]
    BrokenBoneLink {
        bone: usize,
        expected: Option<usize>,
        found: Option<usize>,
    },

    #[error("joint {joint} links to bone {found}, expected {expected}")]
    BrokenJointLink {
        joint: usize,
        expected: usize,
        found: usize,
    },

    #[error("bone {bone} has negative length {length}")]
    NegativeBoneLength { bone: usize, length: f32 },

    #[error("bone {bone} has no scene node attached")]
    MissingAttachment { bone: usize },

    #[error("alternating path has even length {len}, dropping the trailing joint")]
    EvenAlternatingPath { len: usize },

    #[error("segment {bone} is degenerate, using length {fallback}")]
    DegenerateBoneLength { bone: usize, fallback: f32 },

    #[error("pivot override for joint {joint} is out of range (chain has {joints} joints)")]
    UnknownPivot { joint: usize, joints: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("root {root} is not an ancestor of end effector {end_effector}")]
    RootNotReached { root: NodeId, end_effector: NodeId },

    #[error(transparent)]
    Scene(#[from] SceneError),
}
