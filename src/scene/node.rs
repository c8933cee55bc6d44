use crate::math::Transform;
use std::fmt;

/// Handle into a [`Scene`](super::Scene) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named node with a local transform relative to its parent.
///
/// Tree links are stored as ids so every access goes through the arena and
/// traversal never follows live references.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub local: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, local: Transform, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            local,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
