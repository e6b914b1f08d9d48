use crate::{NodeId, SceneHost};

/// Tag-based handle to a node the driver writes into.
///
/// Resolution is retried on every call while unbound, and a handle whose node
/// has been removed is dropped, so targets spawned or replaced later are
/// picked up without a restart.
#[derive(Debug, Clone)]
pub struct TargetBinding {
    tag: String,
    node: Option<NodeId>,
}

impl TargetBinding {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            node: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn is_bound(&self) -> bool {
        self.node.is_some()
    }

    /// Current node for this tag, rebinding if needed.
    pub fn resolve(&mut self, scene: &dyn SceneHost) -> Option<NodeId> {
        if let Some(id) = self.node {
            if scene.contains(id) {
                return Some(id);
            }
            tracing::debug!(tag = %self.tag, "Target removed, unbinding");
            self.node = None;
        }

        self.node = scene.find_by_tag(&self.tag);
        if let Some(id) = self.node {
            tracing::info!(tag = %self.tag, ?id, "Target bound");
        }
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scene;

    #[test]
    fn missing_target_stays_unbound() {
        let scene = Scene::new();
        let mut binding = TargetBinding::new("HeadRig");
        assert_eq!(binding.resolve(&scene), None);
        assert_eq!(binding.resolve(&scene), None);
        assert!(!binding.is_bound());
    }

    #[test]
    fn binds_once_target_appears() {
        let mut scene = Scene::new();
        let mut binding = TargetBinding::new("HeadRig");
        assert_eq!(binding.resolve(&scene), None);

        let rig = scene.spawn(Some("HeadRig"), None);
        assert_eq!(binding.resolve(&scene), Some(rig));
        assert_eq!(binding.node(), Some(rig));
    }

    #[test]
    fn rebinds_after_replacement() {
        let mut scene = Scene::new();
        let first = scene.spawn(Some("HeadRig"), None);
        let mut binding = TargetBinding::new("HeadRig");
        assert_eq!(binding.resolve(&scene), Some(first));

        scene.despawn(first);
        let second = scene.spawn(Some("HeadRig"), None);
        assert_eq!(binding.resolve(&scene), Some(second));

        scene.despawn(second);
        assert_eq!(binding.resolve(&scene), None);
        assert_eq!(binding.tag(), "HeadRig");
    }
}
