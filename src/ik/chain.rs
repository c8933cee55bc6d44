use super::bone::Bone;
use super::builder::ChainBuilder;
use super::diagnostics::ChainWarning;
use super::joint::Joint;
use crate::scene::NodeId;
use glam::{Quat, Vec3};

/// Solved pose of the chain's tip in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndEffector {
    pub id: Option<NodeId>,
    pub location: Vec3,
    pub orientation: Quat,
}

impl Default for EndEffector {
    fn default() -> Self {
        Self {
            id: None,
            location: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Chain {
    pub(crate) bones: Vec<Bone>,
    pub(crate) joints: Vec<Joint>,
    pub(crate) total_length: f32,
    pub(crate) end_effector: EndEffector,
}

impl Chain {
    pub fn builder(root: NodeId) -> ChainBuilder {
        ChainBuilder::new(root)
    }

    /// Assembles a chain from hand-made parts. Structural problems are
    /// reported, not rejected.
    pub fn from_parts(
        bones: Vec<Bone>,
        joints: Vec<Joint>,
        end_effector: EndEffector,
    ) -> (Self, Vec<ChainWarning>) {
        let chain = Self::assemble(bones, joints, end_effector);
        let warnings = chain.validate();
        (chain, warnings)
    }

    pub(crate) fn assemble(bones: Vec<Bone>, joints: Vec<Joint>, end_effector: EndEffector) -> Self {
        let mut chain = Self {
            bones,
            joints,
            total_length: 0.0,
            end_effector,
        };
        chain.total_length = chain.segment_lengths().sum();
        chain
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Rest lengths of every segment, root first. The tip bone has no
    /// segment.
    pub fn segment_lengths(&self) -> impl Iterator<Item = f32> + '_ {
        let segments = self.bones.len().saturating_sub(1);
        self.bones[..segments].iter().map(|b| b.length)
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    pub fn set_bone_length(&mut self, bone: usize, length: f32) {
        if let Some(b) = self.bones.get_mut(bone) {
            b.length = length.max(0.0);
            self.total_length = self.segment_lengths().sum();
        }
    }

    pub fn end_effector(&self) -> &EndEffector {
        &self.end_effector
    }

    pub(crate) fn set_end_effector(&mut self, effector: EndEffector) {
        self.end_effector = effector;
    }

    pub fn root_node(&self) -> Option<NodeId> {
        self.bones.first().and_then(|b| b.attachment)
    }

    pub fn tip_node(&self) -> Option<NodeId> {
        self.bones.last().and_then(|b| b.attachment)
    }

    /// Checks counts and bone/joint index linkage.
    pub fn validate(&self) -> Vec<ChainWarning> {
        let mut warnings = Vec::new();
        let n = self.bones.len();

        if self.joints.len() != n.saturating_sub(1) {
            warnings.push(ChainWarning::JointCountMismatch {
                bones: n,
                joints: self.joints.len(),
            });
        }

        for (i, bone) in self.bones.iter().enumerate() {
            let expected = (i + 1 < n).then_some(i);
            if bone.child_joint != expected {
                warnings.push(ChainWarning::BrokenBoneLink {
                    bone: i,
                    expected,
                    found: bone.child_joint,
                });
            }
            if bone.length < 0.0 {
                warnings.push(ChainWarning::NegativeBoneLength {
                    bone: i,
                    length: bone.length,
                });
            }
            if bone.attachment.is_none() {
                warnings.push(ChainWarning::MissingAttachment { bone: i });
            }
        }

        for (i, joint) in self.joints.iter().enumerate() {
            if joint.child_bone != i + 1 {
                warnings.push(ChainWarning::BrokenJointLink {
                    joint: i,
                    expected: i + 1,
                    found: joint.child_bone,
                });
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bones(lengths: &[f32]) -> Vec<Bone> {
        let n = lengths.len();
        lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| {
                let bone = Bone::new(format!("b{i}"), Some(NodeId(i))).with_length(len);
                if i + 1 < n {
                    bone.with_child_joint(i)
                } else {
                    bone
                }
            })
            .collect()
    }

    fn joints(count: usize) -> Vec<Joint> {
        (0..count)
            .map(|i| Joint::new(format!("j{i}"), Vec3::ZERO, Quat::IDENTITY, i + 1))
            .collect()
    }

    #[test]
    fn well_formed_parts_validate_cleanly() {
        let (chain, warnings) = Chain::from_parts(bones(&[1.0, 2.0, 0.0]), joints(2), EndEffector::default());
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_relative_eq!(chain.total_length(), 3.0);
        assert_eq!(chain.root_node(), Some(NodeId(0)));
        assert_eq!(chain.tip_node(), Some(NodeId(2)));
    }

    #[test]
    fn tip_length_is_not_part_of_total() {
        let (chain, _) = Chain::from_parts(bones(&[1.0, 5.0]), joints(1), EndEffector::default());
        assert_relative_eq!(chain.total_length(), 1.0);
    }

    #[test]
    fn broken_linkage_is_reported() {
        let mut parts = bones(&[1.0, 1.0, 0.0]);
        parts[2].child_joint = Some(7);
        let mut js = joints(2);
        js[0].child_bone = 2;

        let (_, warnings) = Chain::from_parts(parts, js, EndEffector::default());
        assert!(warnings.contains(&ChainWarning::BrokenBoneLink {
            bone: 2,
            expected: None,
            found: Some(7),
        }));
        assert!(warnings.contains(&ChainWarning::BrokenJointLink {
            joint: 0,
            expected: 1,
            found: 2,
        }));
    }

    #[test]
    fn joint_count_mismatch_is_reported() {
        let (_, warnings) = Chain::from_parts(bones(&[1.0, 0.0]), joints(2), EndEffector::default());
        assert!(warnings.contains(&ChainWarning::JointCountMismatch { bones: 2, joints: 2 }));
    }

    #[test]
    fn set_bone_length_refreshes_total_and_clamps() {
        let (mut chain, _) = Chain::from_parts(bones(&[1.0, 1.0, 0.0]), joints(2), EndEffector::default());
        chain.set_bone_length(1, 3.0);
        assert_relative_eq!(chain.total_length(), 4.0);
        chain.set_bone_length(0, -2.0);
        assert_relative_eq!(chain.total_length(), 3.0);
    }
}
