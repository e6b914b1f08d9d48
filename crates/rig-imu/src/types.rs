use glam::{Quat, Vec3};

/// Point-in-time reading from an attitude source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Orientation in the source's native (left-handed) convention.
    pub attitude: Quat,
    /// Linear acceleration, when the source reports it.
    pub acceleration: Option<Vec3>,
}

impl SensorSample {
    pub fn new(attitude: Quat) -> Self {
        Self {
            attitude,
            acceleration: None,
        }
    }

    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = Some(acceleration);
        self
    }
}

/// Quaternion components exactly as the forearm peripheral reports them.
///
/// These are not yet in any scene convention; see [`crate::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawOrientation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl RawOrientation {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// Which transform slot a converted rotation is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSpace {
    Local,
    World,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limb {
    Left,
    Right,
}

impl Limb {
    pub const BOTH: [Limb; 2] = [Limb::Right, Limb::Left];
}
