//! Keyboard-driven player controller.
//!
//! Nothing in the frame driver depends on this crate; the host links it and
//! feeds `PlayerConfig` plus its own key events into [`player::PlayerController`].

pub mod player;

use glam::Vec3;

/// What the host's physics body should do this fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerCommand {
    /// Velocity to assign to the body.
    pub velocity: Vec3,
    /// Instant velocity change to add after assignment, if any.
    pub impulse: Option<Vec3>,
}
