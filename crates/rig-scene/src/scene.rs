use crate::SceneHost;
use glam::Quat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// A transform node in the scene.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub tag: Option<String>,
    pub parent: Option<NodeId>,
    /// Rotation relative to the parent.
    pub local_rotation: Quat,
}

/// Flat node store with parent links. Removed ids are never reused.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, tag: Option<&str>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(SceneNode {
            id,
            tag: tag.map(str::to_string),
            parent,
            local_rotation: Quat::IDENTITY,
        });
        id
    }

    /// Remove a node. Children are re-parented to the removed node's parent.
    pub fn despawn(&mut self, id: NodeId) -> bool {
        let Some(index) = self.nodes.iter().position(|n| n.id == id) else {
            return false;
        };
        let removed = self.nodes.remove(index);
        for node in self.nodes.iter_mut().filter(|n| n.parent == Some(id)) {
            node.parent = removed.parent;
        }
        true
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Rotation of `id` in world space, or `None` if the node is gone.
    pub fn world_rotation(&self, id: NodeId) -> Option<Quat> {
        let node = self.node(id)?;
        let parent = match node.parent {
            Some(parent) => self.world_rotation(parent).unwrap_or(Quat::IDENTITY),
            None => Quat::IDENTITY,
        };
        Some(parent * node.local_rotation)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SceneHost for Scene {
    fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.tag.as_deref() == Some(tag))
            .map(|n| n.id)
    }

    fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn set_local_rotation(&mut self, id: NodeId, rotation: Quat) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.local_rotation = rotation;
                true
            }
            None => false,
        }
    }

    fn set_world_rotation(&mut self, id: NodeId, rotation: Quat) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let parent = node
            .parent
            .and_then(|p| self.world_rotation(p))
            .unwrap_or(Quat::IDENTITY);
        self.set_local_rotation(id, parent.inverse() * rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_tag_returns_first_match() {
        let mut scene = Scene::new();
        scene.spawn(None, None);
        let first = scene.spawn(Some("Hand"), None);
        scene.spawn(Some("Hand"), None);
        assert_eq!(scene.find_by_tag("Hand"), Some(first));
        assert_eq!(scene.find_by_tag("Foot"), None);
    }

    #[test]
    fn world_rotation_composes_parents() {
        let mut scene = Scene::new();
        let body = scene.spawn(None, None);
        let arm = scene.spawn(None, Some(body));
        scene.set_local_rotation(body, Quat::from_rotation_y(0.5));
        scene.set_local_rotation(arm, Quat::from_rotation_x(0.25));

        let world = scene.world_rotation(arm).unwrap();
        let expected = Quat::from_rotation_y(0.5) * Quat::from_rotation_x(0.25);
        assert!((world.dot(expected).abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn set_world_rotation_accounts_for_parent() {
        let mut scene = Scene::new();
        let body = scene.spawn(None, None);
        let arm = scene.spawn(None, Some(body));
        scene.set_local_rotation(body, Quat::from_rotation_z(1.0));

        let target = Quat::from_rotation_x(-0.7);
        assert!(scene.set_world_rotation(arm, target));
        let world = scene.world_rotation(arm).unwrap();
        assert!((world.dot(target).abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn despawned_nodes_reject_writes() {
        let mut scene = Scene::new();
        let body = scene.spawn(Some("Body"), None);
        let arm = scene.spawn(None, Some(body));
        assert!(scene.despawn(body));
        assert!(!scene.contains(body));
        assert!(!scene.set_local_rotation(body, Quat::IDENTITY));
        assert_eq!(scene.node(arm).unwrap().parent, None);
        assert!(!scene.despawn(body));
    }
}
