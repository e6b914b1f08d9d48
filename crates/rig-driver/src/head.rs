use crate::{SkipReason, SourceStatus, TickError};
use glam::Vec3;
use rig_config::{FilterConfig, HeadConfig};
use rig_imu::convert::head_rotation;
use rig_imu::filter::LowPassFilter;
use rig_imu::{SensorSource, SourceError};
use rig_scene::{SceneHost, TargetBinding};
use tracing::{info, trace};

/// Attitude sensor -> camera rotation, plus smoothed head acceleration.
pub struct HeadPipeline {
    source: Box<dyn SensorSource>,
    camera: TargetBinding,
    rig: TargetBinding,
    filter: LowPassFilter,
}

impl HeadPipeline {
    /// Enable the source if present and seed the filter from its first reading.
    pub fn start(
        mut source: Box<dyn SensorSource>,
        head: &HeadConfig,
        filter: &FilterConfig,
    ) -> Self {
        let mut initial = Vec3::ZERO;

        if source.is_available() {
            source.enable();
            info!(
                source = source.name(),
                enabled = source.is_enabled(),
                "Sensor enabled on start"
            );
            if let Ok(Some(acceleration)) = source.read_latest().map(|s| s.acceleration) {
                initial = acceleration;
            }
        } else {
            info!(source = source.name(), "Sensor not present");
        }

        Self {
            source,
            camera: TargetBinding::new(head.camera_tag.clone()),
            rig: TargetBinding::new(head.rig_tag.clone()),
            filter: LowPassFilter::new(filter.factor(), initial),
        }
    }

    /// A source that was absent or disabled at start is never re-enabled here;
    /// it stays skipped until the host enables it.
    pub fn tick(&mut self, scene: &mut dyn SceneHost) -> Result<SourceStatus, TickError> {
        if !self.source.is_available() {
            return Ok(SourceStatus::Skipped(SkipReason::SourceUnavailable));
        }
        if !self.source.is_enabled() {
            return Ok(SourceStatus::Skipped(SkipReason::SourceDisabled));
        }

        let sample = match self.source.read_latest() {
            Ok(sample) => sample,
            Err(SourceError::NoReading { .. }) => {
                return Ok(SourceStatus::Skipped(SkipReason::AwaitingSample));
            }
            Err(e) => return Err(e.into()),
        };
        trace!(attitude = ?sample.attitude, "Attitude sample");

        let rotation = head_rotation(sample.attitude);
        let applied = match self.camera.resolve(&*scene) {
            Some(id) => scene.set_local_rotation(id, rotation),
            None => false,
        };

        if self.rig.resolve(&*scene).is_some() {
            if let Some(acceleration) = sample.acceleration {
                let smoothed = self.filter.update(acceleration);
                trace!(?smoothed, "Head acceleration");
            }
        }

        Ok(if applied {
            SourceStatus::Applied
        } else {
            SourceStatus::Skipped(SkipReason::TargetMissing)
        })
    }

    /// Low-pass filtered head acceleration.
    pub fn smoothed_acceleration(&self) -> Vec3 {
        self.filter.value()
    }
}
