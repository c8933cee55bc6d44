use super::bone::Bone;
use crate::scene::NodeId;
use glam::{Quat, Vec3};

/// Articulation between two consecutive bones.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub position: Vec3,
    pub orientation: Quat,
    /// Node that receives this joint's rotation instead of the parent bone.
    pub pivot: Option<NodeId>,
    pub child_bone: usize,
    pub name: String,
}

/// Node chosen to receive a segment's rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotTarget {
    Bone(NodeId),
    Explicit(NodeId),
}

impl PivotTarget {
    pub fn node(self) -> NodeId {
        match self {
            PivotTarget::Bone(node) | PivotTarget::Explicit(node) => node,
        }
    }
}

impl Joint {
    pub fn new(name: impl Into<String>, position: Vec3, orientation: Quat, child_bone: usize) -> Self {
        Self {
            position,
            orientation,
            pivot: None,
            child_bone,
            name: name.into(),
        }
    }

    pub fn with_pivot(mut self, pivot: NodeId) -> Self {
        self.pivot = Some(pivot);
        self
    }

    pub fn set_pivot(&mut self, pivot: NodeId) {
        self.pivot = Some(pivot);
    }

    /// Resolves which node should rotate for the segment that starts at
    /// `parent`. Falls back to the bone's own node when pivots are disabled
    /// or none is set.
    pub fn pivot_target(&self, parent: &Bone, use_pivots: bool) -> Option<PivotTarget> {
        match self.pivot {
            Some(pivot) if use_pivots => Some(PivotTarget::Explicit(pivot)),
            _ => parent.attachment.map(PivotTarget::Bone),
        }
    }
}
