//! Sensor-to-scene orientation conversion.
//!
//! Every source gets an [`OrientationTable`]: a component reorder with sign
//! flips, a list of fixed mounting corrections, and a residual sign pattern.
//! [`convert`] is the only composition routine; the tables are plain data so
//! each one can be checked on its own.
//!
//! Quaternion products are Hamilton products on (x, y, z, w). Corrections are
//! pre-multiplied onto the running result in table order.

use crate::types::{Limb, RotationSpace};
use glam::{EulerRot, Quat};

/// Reorders and sign-flips raw quaternion components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRemap {
    /// Raw component index (0 = x .. 3 = w) feeding each output component.
    pub order: [usize; 4],
    /// Sign applied to each output component after reordering.
    pub signs: [f32; 4],
}

impl AxisRemap {
    pub const IDENTITY: Self = Self {
        order: [0, 1, 2, 3],
        signs: [1.0, 1.0, 1.0, 1.0],
    };

    pub fn apply(&self, raw: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = raw[self.order[i]] * self.signs[i];
        }
        out
    }
}

/// Euler angles in degrees, applied Z first, then X, then Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerDegrees {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerDegrees {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.y.to_radians(),
            self.x.to_radians(),
            self.z.to_radians(),
        )
    }
}

/// Fixed per-source transform from raw components to a scene rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationTable {
    pub name: &'static str,
    pub remap: AxisRemap,
    /// Pre-multiplied onto the remapped quaternion, first entry first.
    pub corrections: &'static [EulerDegrees],
    /// Sign pattern applied after all corrections.
    pub residual_signs: [f32; 4],
    pub space: RotationSpace,
}

const NO_RESIDUAL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Attitude sensor on the head: left-handed, tilted toward the floor, upside down.
pub const HEAD: OrientationTable = OrientationTable {
    name: "head",
    remap: AxisRemap {
        order: [0, 1, 2, 3],
        signs: [1.0, 1.0, -1.0, -1.0],
    },
    corrections: &[
        EulerDegrees::new(-90.0, 0.0, 0.0),
        EulerDegrees::new(0.0, 0.0, 180.0),
        EulerDegrees::new(0.0, -90.0, 0.0),
    ],
    residual_signs: NO_RESIDUAL,
    space: RotationSpace::Local,
};

/// Peripheral wiring for forearm bones: (Y, X, Z, W) -> (x, y, z, w).
const AVATAR_ORDER: [usize; 4] = [1, 0, 2, 3];

/// Right forearm bone. The trailing z flip was found empirically and has not
/// been derived from the mounting geometry; recalibrate before changing it.
pub const AVATAR_RIGHT: OrientationTable = OrientationTable {
    name: "avatar-right",
    remap: AxisRemap {
        order: AVATAR_ORDER,
        signs: [-1.0, 1.0, -1.0, -1.0],
    },
    corrections: &[EulerDegrees::new(-180.0, 0.0, -180.0)],
    residual_signs: [1.0, 1.0, -1.0, 1.0],
    space: RotationSpace::World,
};

/// Left forearm bone: the peripheral is mirrored on this arm, no correction.
pub const AVATAR_LEFT: OrientationTable = OrientationTable {
    name: "avatar-left",
    remap: AxisRemap {
        order: AVATAR_ORDER,
        signs: [1.0, 1.0, 1.0, 1.0],
    },
    corrections: &[],
    residual_signs: NO_RESIDUAL,
    space: RotationSpace::World,
};

/// Peripheral wiring for XR controllers: (Y, Z, X, W) -> (x, y, z, w).
const CONTROLLER_ORDER: [usize; 4] = [1, 2, 0, 3];

pub const CONTROLLER_RIGHT: OrientationTable = OrientationTable {
    name: "controller-right",
    remap: AxisRemap {
        order: CONTROLLER_ORDER,
        signs: [1.0, 1.0, 1.0, 1.0],
    },
    corrections: &[],
    residual_signs: NO_RESIDUAL,
    space: RotationSpace::Local,
};

pub const CONTROLLER_LEFT: OrientationTable = OrientationTable {
    name: "controller-left",
    remap: AxisRemap {
        order: CONTROLLER_ORDER,
        signs: [1.0, -1.0, -1.0, 1.0],
    },
    corrections: &[],
    residual_signs: NO_RESIDUAL,
    space: RotationSpace::Local,
};

/// Left-handed to right-handed: (x, y, z, w) -> (x, y, -z, -w). Self-inverse.
pub fn handedness_flip(q: Quat) -> Quat {
    Quat::from_xyzw(q.x, q.y, -q.z, -q.w)
}

/// Run raw components through a table. Pure; no renormalization.
pub fn convert(table: &OrientationTable, raw: [f32; 4]) -> Quat {
    let [x, y, z, w] = table.remap.apply(raw);
    let mut q = Quat::from_xyzw(x, y, z, w);
    for correction in table.corrections {
        q = correction.to_quat() * q;
    }
    let s = table.residual_signs;
    Quat::from_xyzw(q.x * s[0], q.y * s[1], q.z * s[2], q.w * s[3])
}

/// Head attitude to a local camera rotation.
pub fn head_rotation(attitude: Quat) -> Quat {
    convert(&HEAD, attitude.to_array())
}

/// Which pair of limb tables the peripheral feeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbTables {
    pub right: &'static OrientationTable,
    pub left: &'static OrientationTable,
}

impl LimbTables {
    pub const AVATAR: Self = Self {
        right: &AVATAR_RIGHT,
        left: &AVATAR_LEFT,
    };

    pub const XR_CONTROLLERS: Self = Self {
        right: &CONTROLLER_RIGHT,
        left: &CONTROLLER_LEFT,
    };

    pub fn table(&self, limb: Limb) -> &'static OrientationTable {
        match limb {
            Limb::Right => self.right,
            Limb::Left => self.left,
        }
    }
}
