use crate::scene::NodeId;

/// One rigid segment of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    /// Rest distance to the next bone. Zero on the tip.
    pub length: f32,
    pub attachment: Option<NodeId>,
    /// Joint toward the next bone, `None` on the tip.
    pub child_joint: Option<usize>,
    pub name: String,
}

impl Bone {
    pub fn new(name: impl Into<String>, attachment: Option<NodeId>) -> Self {
        Self {
            length: 0.0,
            attachment,
            child_joint: None,
            name: name.into(),
        }
    }

    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    pub fn with_child_joint(mut self, joint: usize) -> Self {
        self.child_joint = Some(joint);
        self
    }

    pub fn is_tip(&self) -> bool {
        self.child_joint.is_none()
    }
}
