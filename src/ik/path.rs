//! Path discovery over the scene arena.

use crate::scene::{NodeId, Scene, SceneError};

/// Walks parents from `end` until `root` is met. Returns the path root
/// first, or `None` when `root` is not an ancestor of `end`.
pub(crate) fn ancestor_path(
    scene: &Scene,
    root: NodeId,
    end: NodeId,
) -> Result<Option<Vec<NodeId>>, SceneError> {
    scene.node(root)?;
    let mut path = scene.ancestry(end)?;
    Ok(path.iter().position(|&id| id == root).map(|at| {
        path.truncate(at + 1);
        path.reverse();
        path
    }))
}

/// Path from `root` to the first deepest leaf in child order. A later leaf
/// only wins if it is strictly deeper.
pub(crate) fn deepest_leaf_path(scene: &Scene, root: NodeId) -> Result<Vec<NodeId>, SceneError> {
    let mut current = Vec::new();
    let mut best = Vec::new();
    let mut stack = vec![(root, 0)];

    while let Some((node, depth)) = stack.pop() {
        current.truncate(depth);
        current.push(node);
        let entry = scene.node(node)?;
        if entry.is_leaf() {
            if current.len() > best.len() {
                best.clone_from(&current);
            }
        } else {
            // Reversed so children pop in insertion order.
            stack.extend(entry.children().iter().rev().map(|&child| (child, depth + 1)));
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;

    #[test]
    fn first_deepest_leaf_wins_ties() {
        let mut scene = Scene::new();
        let root = scene.add_root("root", Transform::IDENTITY);
        let a = scene.add_child(root, "a", Transform::IDENTITY).unwrap();
        let a1 = scene.add_child(a, "a1", Transform::IDENTITY).unwrap();
        let b = scene.add_child(root, "b", Transform::IDENTITY).unwrap();
        let _b1 = scene.add_child(b, "b1", Transform::IDENTITY).unwrap();
        let _c = scene.add_child(root, "c", Transform::IDENTITY).unwrap();

        assert_eq!(deepest_leaf_path(&scene, root).unwrap(), vec![root, a, a1]);
    }

    #[test]
    fn strictly_deeper_leaf_replaces_earlier_one() {
        let mut scene = Scene::new();
        let root = scene.add_root("root", Transform::IDENTITY);
        let _a = scene.add_child(root, "a", Transform::IDENTITY).unwrap();
        let b = scene.add_child(root, "b", Transform::IDENTITY).unwrap();
        let b1 = scene.add_child(b, "b1", Transform::IDENTITY).unwrap();

        assert_eq!(deepest_leaf_path(&scene, root).unwrap(), vec![root, b, b1]);
    }

    #[test]
    fn ancestor_path_fails_outside_root() {
        let mut scene = Scene::new();
        let root = scene.add_root("root", Transform::IDENTITY);
        let child = scene.add_child(root, "child", Transform::IDENTITY).unwrap();
        let stray = scene.add_root("stray", Transform::IDENTITY);

        assert_eq!(ancestor_path(&scene, root, child).unwrap(), Some(vec![root, child]));
        assert_eq!(ancestor_path(&scene, root, stray).unwrap(), None);
        assert_eq!(ancestor_path(&scene, root, root).unwrap(), Some(vec![root]));
    }

    #[test]
    fn deep_hierarchy_does_not_recurse() {
        let mut scene = Scene::new();
        let root = scene.add_root("root", Transform::IDENTITY);
        let mut last = root;
        for i in 0..100_000 {
            last = scene.add_child(last, format!("n{i}"), Transform::IDENTITY).unwrap();
        }

        let path = deepest_leaf_path(&scene, root).unwrap();
        assert_eq!(path.len(), 100_001);
        assert_eq!(path.last(), Some(&last));
    }
}
