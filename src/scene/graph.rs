use glam::{Mat4, Quat, Vec3};

use super::node::{Node, NodeId};
use super::SceneError;
use crate::math::Transform;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add_root(&mut self, name: impl Into<String>, local: Transform) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name, local, None));
        id
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: Transform,
    ) -> Result<NodeId, SceneError> {
        self.node(parent)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name, local, Some(parent)));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(id.0).ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(id.0).ok_or(SceneError::UnknownNode(id))
    }

    pub fn name(&self, id: NodeId) -> Result<&str, SceneError> {
        self.node(id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, SceneError> {
        self.node(id).map(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        self.node(id).map(Node::children)
    }

    pub fn local(&self, id: NodeId) -> Result<Transform, SceneError> {
        self.node(id).map(|n| n.local)
    }

    pub fn set_local(&mut self, id: NodeId, local: Transform) -> Result<(), SceneError> {
        self.node_mut(id)?.local = local;
        Ok(())
    }

    pub fn set_local_rotation(&mut self, id: NodeId, rotation: Quat) -> Result<(), SceneError> {
        self.node_mut(id)?.local.rotation = rotation;
        Ok(())
    }

    pub fn set_local_scale(&mut self, id: NodeId, scale: Vec3) -> Result<(), SceneError> {
        self.node_mut(id)?.local.scale = scale;
        Ok(())
    }

    /// Local-to-world matrix, composed from the root down.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let mut matrix = self.node(id)?.local.to_matrix();
        let mut cursor = self.node(id)?.parent;
        while let Some(parent) = cursor {
            let node = self.node(parent)?;
            matrix = node.local.to_matrix() * matrix;
            cursor = node.parent;
        }
        Ok(matrix)
    }

    /// World matrix of the node's parent, identity for roots.
    pub fn parent_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        match self.parent(id)? {
            Some(parent) => self.world_matrix(parent),
            None => Ok(Mat4::IDENTITY),
        }
    }

    pub fn world_transform(&self, id: NodeId) -> Result<Transform, SceneError> {
        self.world_matrix(id).map(|m| Transform::from_matrix(&m))
    }

    pub fn world_position(&self, id: NodeId) -> Result<Vec3, SceneError> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    /// Rotates the node by `angle` radians about a world-space axis,
    /// keeping its position. The increment is folded into the local
    /// rotation.
    pub fn rotate_about_world_axis(
        &mut self,
        id: NodeId,
        axis: Vec3,
        angle: f32,
    ) -> Result<(), SceneError> {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO || angle == 0.0 {
            return Ok(());
        }
        let parent_rotation = Transform::from_matrix(&self.parent_matrix(id)?).rotation;
        let local_axis = (parent_rotation.inverse() * axis).normalize_or_zero();
        if local_axis == Vec3::ZERO {
            return Ok(());
        }
        let node = self.node_mut(id)?;
        node.local.rotation = (Quat::from_axis_angle(local_axis, angle) * node.local.rotation).normalize();
        Ok(())
    }

    /// Ids from `id` up to its topmost ancestor, `id` first.
    pub fn ancestry(&self, id: NodeId) -> Result<Vec<NodeId>, SceneError> {
        let mut path = vec![id];
        let mut cursor = self.parent(id)?;
        while let Some(parent) = cursor {
            path.push(parent);
            cursor = self.parent(parent)?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn arm() -> (Scene, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new();
        let shoulder = scene.add_root("shoulder", Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        let elbow = scene
            .add_child(shoulder, "elbow", Transform::from_position(Vec3::Y))
            .unwrap();
        let wrist = scene
            .add_child(elbow, "wrist", Transform::from_position(Vec3::Y))
            .unwrap();
        (scene, shoulder, elbow, wrist)
    }

    #[test]
    fn world_position_composes_parents() {
        let (mut scene, shoulder, _, wrist) = arm();
        assert!(scene
            .world_position(wrist)
            .unwrap()
            .abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));

        scene
            .set_local_rotation(shoulder, Quat::from_rotation_z(-FRAC_PI_2))
            .unwrap();
        assert!(scene
            .world_position(wrist)
            .unwrap()
            .abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn rotate_about_world_axis_respects_parent_frame() {
        let (mut scene, shoulder, elbow, wrist) = arm();
        scene
            .set_local_rotation(shoulder, Quat::from_rotation_x(std::f32::consts::PI))
            .unwrap();
        // Parent is flipped about X, so world +Z is local -Z for the elbow.
        scene.rotate_about_world_axis(elbow, Vec3::Z, FRAC_PI_2).unwrap();

        let elbow_pos = scene.world_position(elbow).unwrap();
        let wrist_pos = scene.world_position(wrist).unwrap();
        let dir = (wrist_pos - elbow_pos).normalize();
        // Elbow pointed down (-Y); a CCW quarter turn about +Z points it to +X.
        assert!(dir.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn unknown_ids_are_errors() {
        let (scene, ..) = arm();
        let bogus = NodeId(42);
        assert!(matches!(scene.node(bogus), Err(SceneError::UnknownNode(id)) if id == bogus));
    }

    #[test]
    fn ancestry_walks_to_root() {
        let (scene, shoulder, elbow, wrist) = arm();
        assert_eq!(scene.ancestry(wrist).unwrap(), vec![wrist, elbow, shoulder]);
        assert_eq!(scene.name(elbow).unwrap(), "elbow");
        assert_relative_eq!(scene.world_transform(wrist).unwrap().scale.x, 1.0, epsilon = 1e-6);
    }
}
