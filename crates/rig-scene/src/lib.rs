pub mod binding;
pub mod scene;

pub use binding::TargetBinding;
pub use scene::{NodeId, Scene, SceneNode};

use glam::Quat;

/// What the frame driver needs from the host's scene graph.
pub trait SceneHost {
    /// First live node carrying `tag`, if any.
    fn find_by_tag(&self, tag: &str) -> Option<NodeId>;
    /// Whether `id` still refers to a live node.
    fn contains(&self, id: NodeId) -> bool;
    /// Returns false if the node is gone.
    fn set_local_rotation(&mut self, id: NodeId, rotation: Quat) -> bool;
    /// Returns false if the node is gone.
    fn set_world_rotation(&mut self, id: NodeId, rotation: Quat) -> bool;
}
