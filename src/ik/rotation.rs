//! Converts a solved point chain into clamped incremental rotations on the
//! scene nodes.

use super::chain::Chain;
use super::config::SolverConfig;
use super::joint::PivotTarget;
use crate::math::planar::DIRECTION_EPSILON;
use crate::math::signed_angle_z;
use crate::scene::{NodeId, Scene, SceneError};
use glam::{Mat4, Vec3};
use std::collections::HashMap;

/// Rotates each segment's pivot so the segment heads toward the solved
/// direction. `points` are in the space described by `space` (solve space
/// to world). Returns the applied angle per segment in degrees, zero where
/// the segment was skipped.
///
/// The clamp holds per pivot node: when several segments resolve to the same
/// node, their combined rotation this call stays within the limit.
pub(crate) fn apply_rotations(
    chain: &Chain,
    scene: &mut Scene,
    points: &[Vec3],
    space: &Mat4,
    config: &SolverConfig,
) -> Vec<f32> {
    let to_space = space.inverse();
    let axis = space.transform_vector3(Vec3::Z);
    let max_delta = config.max_delta_z_deg.to_radians();
    let bones = chain.bones();
    let mut applied = vec![0.0; chain.joint_count()];
    let mut spent: HashMap<NodeId, f32> = HashMap::new();

    for (i, joint) in chain.joints().iter().enumerate() {
        let (Some(parent), Some(child_bone)) = (bones.get(i), bones.get(i + 1)) else {
            continue;
        };
        let desired = points[i + 1] - points[i];
        if desired.length_squared() < DIRECTION_EPSILON * DIRECTION_EPSILON {
            continue;
        }
        let Some(pivot) = joint
            .pivot_target(parent, config.use_joint_pivots)
            .map(PivotTarget::node)
        else {
            continue;
        };
        let Some(child) = child_bone.attachment else {
            continue;
        };

        let used = spent.get(&pivot).copied().unwrap_or(0.0);
        let step = PivotStep {
            pivot,
            child,
            desired,
            axis,
            min: -max_delta - used,
            max: max_delta - used,
        };
        match step.apply(scene, &to_space, config.unscale_during_rotation) {
            Ok(angle) => {
                applied[i] = angle.to_degrees();
                *spent.entry(pivot).or_insert(0.0) += angle;
            }
            Err(err) => log::debug!("skipping segment {i}: {err}"),
        }
    }

    applied
}

struct PivotStep {
    pivot: NodeId,
    child: NodeId,
    desired: Vec3,
    axis: Vec3,
    /// Remaining rotation budget for `pivot` this call, in radians.
    min: f32,
    max: f32,
}

impl PivotStep {
    fn apply(&self, scene: &mut Scene, to_space: &Mat4, unscale: bool) -> Result<f32, SceneError> {
        let saved_scale = if unscale {
            let scale = scene.local(self.pivot)?.scale;
            scene.set_local_scale(self.pivot, Vec3::ONE)?;
            Some(scale)
        } else {
            None
        };

        let pivot_pos = to_space.transform_point3(scene.world_position(self.pivot)?);
        let child_pos = to_space.transform_point3(scene.world_position(self.child)?);
        let angle = signed_angle_z(child_pos - pivot_pos, self.desired)
            .map(|a| a.clamp(self.min, self.max))
            .unwrap_or(0.0);

        if angle != 0.0 {
            scene.rotate_about_world_axis(self.pivot, self.axis, angle)?;
        }

        if let Some(scale) = saved_scale {
            scene.set_local_scale(self.pivot, scale)?;
        }
        Ok(angle)
    }
}
