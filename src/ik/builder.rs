use super::bone::Bone;
use super::chain::{Chain, EndEffector};
use super::diagnostics::{BuildError, ChainWarning};
use super::joint::Joint;
use super::path::{ancestor_path, deepest_leaf_path};
use crate::math::{facing_rotation, Transform};
use crate::scene::{NodeId, Scene};

/// Length used when the first segment is degenerate.
pub const DEFAULT_BONE_LENGTH: f32 = 0.01;

const DEGENERATE_LENGTH: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Every path node is a bone; joints are synthesised between them.
    #[default]
    VirtualFromBonesOnly,
    /// Path alternates bone, joint, bone, ...
    FromHierarchyAlternating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JointPlacement {
    /// Halfway between the two bones, facing the child.
    #[default]
    Midpoint,
    /// On the child bone's own pose.
    SnapToChild,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub compute_lengths: bool,
    pub joint_placement: JointPlacement,
    pub pivots: Vec<(usize, NodeId)>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            compute_lengths: true,
            joint_placement: JointPlacement::Midpoint,
            pivots: Vec::new(),
        }
    }
}

/// A built chain together with the diagnostics collected while building it.
#[derive(Debug, Clone)]
pub struct ChainBuild {
    pub chain: Chain,
    pub warnings: Vec<ChainWarning>,
}

impl ChainBuild {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ChainBuilder {
    root: NodeId,
    end_effector: Option<NodeId>,
    mode: BuildMode,
    options: BuildOptions,
}

impl ChainBuilder {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            end_effector: None,
            mode: BuildMode::default(),
            options: BuildOptions::default(),
        }
    }

    pub fn end_effector(mut self, node: NodeId) -> Self {
        self.end_effector = Some(node);
        self
    }

    pub fn mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn compute_lengths(mut self, compute: bool) -> Self {
        self.options.compute_lengths = compute;
        self
    }

    pub fn joint_placement(mut self, placement: JointPlacement) -> Self {
        self.options.joint_placement = placement;
        self
    }

    /// Routes the rotation of joint `joint` to `node`.
    pub fn pivot(mut self, joint: usize, node: NodeId) -> Self {
        self.options.pivots.push((joint, node));
        self
    }

    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Walks the scene and builds the chain. Only an unreachable root or an
    /// invalid node id fails; everything else is reported as a warning.
    pub fn build(&self, scene: &Scene) -> Result<ChainBuild, BuildError> {
        let result = self.build_inner(scene);
        match &result {
            Ok(build) => {
                for warning in &build.warnings {
                    log::warn!("chain build: {warning}");
                }
            }
            Err(err) => log::warn!("chain build failed: {err}"),
        }
        result
    }

    fn build_inner(&self, scene: &Scene) -> Result<ChainBuild, BuildError> {
        let mut warnings = Vec::new();

        let mut path = match self.end_effector {
            Some(end) => ancestor_path(scene, self.root, end)?.ok_or(BuildError::RootNotReached {
                root: self.root,
                end_effector: end,
            })?,
            None => deepest_leaf_path(scene, self.root)?,
        };

        let (bone_nodes, joint_nodes) = match self.mode {
            BuildMode::VirtualFromBonesOnly => (path, None),
            BuildMode::FromHierarchyAlternating => {
                if path.len() % 2 == 0 {
                    warnings.push(ChainWarning::EvenAlternatingPath { len: path.len() });
                    path.pop();
                }
                let bones = path.iter().step_by(2).copied().collect::<Vec<_>>();
                let joints = path.iter().skip(1).step_by(2).copied().collect::<Vec<_>>();
                (bones, Some(joints))
            }
        };

        let poses = bone_nodes
            .iter()
            .map(|&node| scene.world_transform(node))
            .collect::<Result<Vec<_>, _>>()?;

        let lengths = self.segment_lengths(&poses, &mut warnings);
        let n = bone_nodes.len();

        let mut bones = Vec::with_capacity(n);
        for (i, &node) in bone_nodes.iter().enumerate() {
            let mut bone = Bone::new(scene.name(node)?, Some(node));
            if i + 1 < n {
                bone = bone.with_length(lengths[i]).with_child_joint(i);
            }
            bones.push(bone);
        }

        let mut joints = Vec::with_capacity(n.saturating_sub(1));
        for i in 0..n.saturating_sub(1) {
            let joint = match &joint_nodes {
                Some(nodes) => {
                    let node = nodes[i];
                    let pose = scene.world_transform(node)?;
                    Joint::new(scene.name(node)?, pose.position, pose.rotation, i + 1).with_pivot(node)
                }
                None => self.virtual_joint(i, &bones, &poses),
            };
            joints.push(joint);
        }

        for &(index, node) in &self.options.pivots {
            scene.node(node)?;
            match joints.get_mut(index) {
                Some(joint) => joint.set_pivot(node),
                None => warnings.push(ChainWarning::UnknownPivot {
                    joint: index,
                    joints: n.saturating_sub(1),
                }),
            }
        }

        let end_effector = match (bone_nodes.last(), poses.last()) {
            (Some(&node), Some(pose)) => EndEffector {
                id: Some(node),
                location: pose.position,
                orientation: pose.rotation,
            },
            _ => EndEffector::default(),
        };

        let chain = Chain::assemble(bones, joints, end_effector);
        warnings.extend(chain.validate());

        Ok(ChainBuild { chain, warnings })
    }

    fn segment_lengths(&self, poses: &[Transform], warnings: &mut Vec<ChainWarning>) -> Vec<f32> {
        let mut lengths: Vec<f32> = Vec::with_capacity(poses.len().saturating_sub(1));
        if !self.options.compute_lengths {
            lengths.resize(poses.len().saturating_sub(1), 0.0);
            return lengths;
        }

        for (i, pair) in poses.windows(2).enumerate() {
            let length = (pair[1].position - pair[0].position).length();
            if length > DEGENERATE_LENGTH {
                lengths.push(length);
            } else {
                let fallback = lengths.last().copied().unwrap_or(DEFAULT_BONE_LENGTH);
                warnings.push(ChainWarning::DegenerateBoneLength { bone: i, fallback });
                lengths.push(fallback);
            }
        }
        lengths
    }

    fn virtual_joint(&self, i: usize, bones: &[Bone], poses: &[Transform]) -> Joint {
        let parent = &poses[i];
        let child = &poses[i + 1];
        let name = format!("{}->{}", bones[i].name, bones[i + 1].name);
        match self.options.joint_placement {
            JointPlacement::Midpoint => Joint::new(
                name,
                parent.position.lerp(child.position, 0.5),
                facing_rotation(child.position - parent.position),
                i + 1,
            ),
            JointPlacement::SnapToChild => Joint::new(name, child.position, child.rotation, i + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn line(points: &[Vec3]) -> (Scene, Vec<NodeId>) {
        let mut scene = Scene::new();
        let mut ids = vec![scene.add_root("n0", Transform::from_position(points[0]))];
        for (i, w) in points.windows(2).enumerate() {
            let parent = *ids.last().unwrap();
            let id = scene
                .add_child(parent, format!("n{}", i + 1), Transform::from_position(w[1] - w[0]))
                .unwrap();
            ids.push(id);
        }
        (scene, ids)
    }

    #[test]
    fn first_degenerate_segment_uses_default_length() {
        let (scene, ids) = line(&[Vec3::ZERO, Vec3::ZERO, Vec3::Y]);
        let build = ChainBuilder::new(ids[0]).build(&scene).unwrap();

        let lengths: Vec<f32> = build.chain.segment_lengths().collect();
        assert_relative_eq!(lengths[0], DEFAULT_BONE_LENGTH);
        assert_relative_eq!(lengths[1], 1.0);
        assert_eq!(
            build.warnings,
            vec![ChainWarning::DegenerateBoneLength {
                bone: 0,
                fallback: DEFAULT_BONE_LENGTH
            }]
        );
    }

    #[test]
    fn later_degenerate_segment_reuses_previous_length() {
        let (scene, ids) = line(&[Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]);
        let build = ChainBuilder::new(ids[0]).build(&scene).unwrap();

        let lengths: Vec<f32> = build.chain.segment_lengths().collect();
        assert_eq!(lengths.len(), 2);
        assert_relative_eq!(lengths[1], 2.0);
    }

    #[test]
    fn disabled_length_computation_leaves_zeros() {
        let (scene, ids) = line(&[Vec3::ZERO, Vec3::Y, Vec3::Y * 2.0]);
        let build = ChainBuilder::new(ids[0])
            .compute_lengths(false)
            .build(&scene)
            .unwrap();

        assert!(build.is_clean());
        assert!(build.chain.segment_lengths().all(|l| l == 0.0));
        assert_relative_eq!(build.chain.total_length(), 0.0);
    }

    #[test]
    fn midpoint_joints_face_the_child() {
        let (scene, ids) = line(&[Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)]);
        let build = ChainBuilder::new(ids[0]).build(&scene).unwrap();
        let joint = &build.chain.joints()[0];

        assert!(joint.position.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert!((joint.orientation * Vec3::Y).abs_diff_eq(Vec3::X, 1e-5));
        assert_eq!(joint.name, "n0->n1");
        assert_eq!(joint.pivot, None);
    }

    #[test]
    fn snapped_joints_copy_child_pose() {
        let (scene, ids) = line(&[Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)]);
        let build = ChainBuilder::new(ids[0])
            .joint_placement(JointPlacement::SnapToChild)
            .build(&scene)
            .unwrap();

        assert!(build.chain.joints()[0]
            .position
            .abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-6));
    }

    #[test]
    fn pivot_override_out_of_range_is_a_warning() {
        let (scene, ids) = line(&[Vec3::ZERO, Vec3::Y]);
        let build = ChainBuilder::new(ids[0])
            .pivot(0, ids[0])
            .pivot(3, ids[1])
            .build(&scene)
            .unwrap();

        assert_eq!(build.chain.joints()[0].pivot, Some(ids[0]));
        assert_eq!(
            build.warnings,
            vec![ChainWarning::UnknownPivot { joint: 3, joints: 1 }]
        );
    }
}
