use crate::diagnostics::ToastCounter;
use crate::{SkipReason, SourceStatus, TickError};
use rig_bridge::{BridgeHost, PeripheralLink};
use rig_config::{LimbMode, PeripheralConfig};
use rig_imu::convert::{convert, LimbTables};
use rig_imu::types::{Limb, RotationSpace};
use rig_scene::{SceneHost, TargetBinding};
use tracing::{debug, info, warn};

/// Forearm peripheral -> left/right limb rotations.
pub struct PeripheralPipeline {
    /// `None` when the platform bridge could not be reached; stays that way.
    link: Option<PeripheralLink>,
    tables: LimbTables,
    right: TargetBinding,
    left: TargetBinding,
    toast: Option<ToastCounter>,
}

impl PeripheralPipeline {
    /// Returns `None` when the peripheral is disabled in config.
    pub fn start(host: &dyn BridgeHost, config: &PeripheralConfig) -> Option<Self> {
        let tables = match config.mode {
            LimbMode::Avatar => LimbTables::AVATAR,
            LimbMode::XrControllers => LimbTables::XR_CONTROLLERS,
            LimbMode::Disabled => {
                info!("Peripheral disabled in config");
                return None;
            }
        };

        let link = match PeripheralLink::open(host) {
            Ok(link) => Some(link),
            Err(e) => {
                warn!(%e, "Peripheral absent for this session");
                None
            }
        };

        Some(Self {
            link,
            tables,
            right: TargetBinding::new(config.right_tag()),
            left: TargetBinding::new(config.left_tag()),
            toast: config
                .logging_enabled
                .then(|| ToastCounter::new(config.toast_every_frames)),
        })
    }

    pub fn link(&self) -> Option<&PeripheralLink> {
        self.link.as_ref()
    }

    pub fn tick(&mut self, scene: &mut dyn SceneHost) -> Result<SourceStatus, TickError> {
        let Some(link) = &self.link else {
            return Ok(SourceStatus::Skipped(SkipReason::PeripheralAbsent));
        };

        let snapshot = link.read_snapshot();
        let raw = snapshot.orientation;
        if !raw.to_array().iter().all(|c| c.is_finite()) {
            return Err(TickError::NonFiniteOrientation(raw));
        }

        let mut applied = 0;
        for limb in Limb::BOTH {
            let binding = match limb {
                Limb::Right => &mut self.right,
                Limb::Left => &mut self.left,
            };
            let Some(id) = binding.resolve(&*scene) else {
                continue;
            };

            let table = self.tables.table(limb);
            let rotation = convert(table, raw.to_array());
            let written = match table.space {
                RotationSpace::Local => scene.set_local_rotation(id, rotation),
                RotationSpace::World => scene.set_world_rotation(id, rotation),
            };
            if written {
                applied += 1;
            }
        }

        if let Some(toast) = &mut self.toast {
            let message = snapshot.describe();
            debug!("{message}");
            if toast.advance() {
                link.show_toast(&message);
            }
        }

        Ok(if applied > 0 {
            SourceStatus::Applied
        } else {
            SourceStatus::Skipped(SkipReason::TargetMissing)
        })
    }
}
