use crate::PlayerCommand;
use glam::Vec3;
use rig_config::PlayerConfig;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard state sampled every frame and consumed on the fixed step.
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Set on a fresh space press, held until a grounded fixed step uses it.
    jump_latched: bool,
    left_held: bool,
    right_held: bool,
    /// Analog override (gamepad stick); wins over keys when non-zero.
    analog: f32,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key(&mut self, key: PhysicalKey, state: ElementState, repeat: bool) {
        let pressed = state == ElementState::Pressed;
        match key {
            PhysicalKey::Code(KeyCode::Space) => {
                if pressed && !repeat && !self.jump_latched {
                    self.jump_latched = true;
                    tracing::debug!("Space was pressed");
                }
            }
            PhysicalKey::Code(KeyCode::ArrowLeft | KeyCode::KeyA) => self.left_held = pressed,
            PhysicalKey::Code(KeyCode::ArrowRight | KeyCode::KeyD) => self.right_held = pressed,
            _ => {}
        }
    }

    pub fn set_analog_axis(&mut self, value: f32) {
        self.analog = value.clamp(-1.0, 1.0);
    }

    /// Horizontal axis in [-1, 1].
    pub fn horizontal(&self) -> f32 {
        if self.analog != 0.0 {
            return self.analog;
        }
        match (self.left_held, self.right_held) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn jump_pending(&self) -> bool {
        self.jump_latched
    }
}

/// Side-scroller movement: horizontal velocity from input, jump when grounded.
pub struct PlayerController {
    config: PlayerConfig,
    pub input: PlayerInput,
}

impl PlayerController {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            input: PlayerInput::new(),
        }
    }

    /// Radius the host should use for its ground overlap query.
    pub fn ground_check_radius(&self) -> f32 {
        self.config.ground_check_radius
    }

    /// One physics step. `grounded` is the host's overlap result at the feet.
    pub fn fixed_update(&mut self, current_velocity: Vec3, grounded: bool) -> PlayerCommand {
        let velocity = Vec3::new(self.input.horizontal(), current_velocity.y, 0.0);

        let impulse = if grounded && self.input.jump_latched {
            self.input.jump_latched = false;
            Some(Vec3::Y * self.config.jump_velocity)
        } else {
            None
        };

        PlayerCommand { velocity, impulse }
    }

    /// Whether a trigger contact with an object on `layer` should destroy it.
    pub fn should_destroy_on_trigger(&self, layer: u32) -> bool {
        layer == self.config.pickup_layer
    }
}
