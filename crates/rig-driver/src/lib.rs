//! Per-frame driver for sensor-driven rig targets.
//!
//! The host calls [`FrameDriver::tick`] once per frame. Each source is
//! processed on its own; a failure in one is logged and the rest of the tick
//! still runs. Availability and target bindings are re-checked every tick.

pub mod diagnostics;
pub mod head;
pub mod peripheral;

use head::HeadPipeline;
use peripheral::PeripheralPipeline;
use rig_bridge::BridgeHost;
use rig_config::AppConfig;
use rig_imu::types::RawOrientation;
use rig_imu::{SensorSource, SourceError};
use rig_scene::SceneHost;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Peripheral reported a non-finite orientation: {0:?}")]
    NonFiniteOrientation(RawOrientation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SourceUnavailable,
    SourceDisabled,
    AwaitingSample,
    TargetMissing,
    PeripheralAbsent,
}

/// Outcome of one source for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Applied,
    Skipped(SkipReason),
    Failed,
}

/// Per-source outcomes; `None` means the source is not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub frame: u64,
    pub head: Option<SourceStatus>,
    pub peripheral: Option<SourceStatus>,
}

pub struct FrameDriver {
    head: Option<HeadPipeline>,
    peripheral: Option<PeripheralPipeline>,
    frame_count: u64,
}

impl FrameDriver {
    pub fn new(head: Option<HeadPipeline>, peripheral: Option<PeripheralPipeline>) -> Self {
        Self {
            head,
            peripheral,
            frame_count: 0,
        }
    }

    /// Initialization callback: enable sensors and attach the peripheral.
    pub fn start(
        config: &AppConfig,
        attitude: Box<dyn SensorSource>,
        bridge_host: &dyn BridgeHost,
    ) -> Self {
        let head = HeadPipeline::start(attitude, &config.head, &config.filter);
        let peripheral = PeripheralPipeline::start(bridge_host, &config.peripheral);
        Self::new(Some(head), peripheral)
    }

    /// Per-frame callback.
    pub fn tick(&mut self, scene: &mut dyn SceneHost) -> TickReport {
        self.frame_count += 1;

        let head = self
            .head
            .as_mut()
            .map(|pipeline| settle("head", pipeline.tick(&mut *scene)));
        let peripheral = self
            .peripheral
            .as_mut()
            .map(|pipeline| settle("peripheral", pipeline.tick(&mut *scene)));

        if self.frame_count % 300 == 0 {
            debug!(frames = self.frame_count, "Driver heartbeat");
        }

        TickReport {
            frame: self.frame_count,
            head,
            peripheral,
        }
    }

    pub fn head(&self) -> Option<&HeadPipeline> {
        self.head.as_ref()
    }

    pub fn peripheral(&self) -> Option<&PeripheralPipeline> {
        self.peripheral.as_ref()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

fn settle(source: &'static str, result: Result<SourceStatus, TickError>) -> SourceStatus {
    match result {
        Ok(status) => {
            if let SourceStatus::Skipped(reason) = status {
                trace!(source, ?reason, "Source skipped");
            }
            status
        }
        Err(e) => {
            warn!(source, error = %e, "Source update failed, continuing tick");
            SourceStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use rig_bridge::memory::{InMemoryBridge, InMemoryHost, PeripheralWriter};
    use rig_bridge::{PeripheralSnapshot, UnsupportedHost};
    use rig_imu::convert::head_rotation;
    use rig_imu::types::SensorSample;
    use rig_imu::{attitude_channel, AttitudeClient};
    use rig_scene::{NodeId, Scene};
    use std::sync::Arc;

    /// Present and enabled, but every read fails.
    struct BrokenSource;

    impl SensorSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn is_enabled(&self) -> bool {
            true
        }
        fn enable(&mut self) {}
        fn read_latest(&self) -> Result<SensorSample, SourceError> {
            Err(SourceError::Unavailable {
                name: "broken".into(),
            })
        }
    }

    fn rig_scene() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let camera = scene.spawn(Some("MainCamera"), None);
        scene.spawn(Some("HeadRig"), None);
        let forearm = scene.spawn(Some("EthanLeftForeArm"), None);
        (scene, camera, forearm)
    }

    #[test]
    fn unavailable_source_leaves_previous_rotation() {
        let (mut scene, camera, _) = rig_scene();
        let (feed, client) = attitude_channel("attitude");
        let mut driver =
            FrameDriver::start(&AppConfig::default(), Box::new(client), &UnsupportedHost);

        let attitude = Quat::from_rotation_x(0.8);
        feed.publish(SensorSample::new(attitude));
        let report = driver.tick(&mut scene);
        assert_eq!(report.head, Some(SourceStatus::Applied));
        let before = scene.node(camera).unwrap().local_rotation;
        assert_eq!(before, head_rotation(attitude));

        drop(feed);
        let report = driver.tick(&mut scene);
        assert_eq!(
            report.head,
            Some(SourceStatus::Skipped(SkipReason::SourceUnavailable))
        );
        assert_eq!(scene.node(camera).unwrap().local_rotation, before);
    }

    #[test]
    fn failing_source_does_not_stop_the_tick() {
        let (mut scene, camera, forearm) = rig_scene();
        let bridge = Arc::new(InMemoryBridge::new());
        let mut driver = FrameDriver::start(
            &AppConfig::default(),
            Box::new(BrokenSource),
            &InMemoryHost::new(bridge.clone()),
        );
        let lock = driver.peripheral().unwrap().link().unwrap().data_lock();
        let raw = RawOrientation::new(0.0, 0.6, 0.0, 0.8);
        PeripheralWriter::new(bridge, lock).write(&PeripheralSnapshot {
            orientation: raw,
            ..Default::default()
        });

        let report = driver.tick(&mut scene);
        assert_eq!(report.head, Some(SourceStatus::Failed));
        assert_eq!(report.peripheral, Some(SourceStatus::Applied));
        assert_eq!(scene.node(camera).unwrap().local_rotation, Quat::IDENTITY);
        assert_eq!(
            scene.node(forearm).unwrap().local_rotation,
            Quat::from_xyzw(0.6, 0.0, 0.0, 0.8)
        );
    }

    #[test]
    fn absent_everything_ticks_quietly() {
        let mut scene = Scene::new();
        let mut driver = FrameDriver::start(
            &AppConfig::default(),
            Box::new(AttitudeClient::absent("attitude")),
            &UnsupportedHost,
        );
        for frame in 1..=3 {
            let report = driver.tick(&mut scene);
            assert_eq!(report.frame, frame);
            assert_eq!(
                report.head,
                Some(SourceStatus::Skipped(SkipReason::SourceUnavailable))
            );
            assert_eq!(
                report.peripheral,
                Some(SourceStatus::Skipped(SkipReason::PeripheralAbsent))
            );
        }
        assert_eq!(driver.frame_count(), 3);
    }

    #[test]
    fn targets_spawned_later_are_picked_up() {
        let mut scene = Scene::new();
        let (feed, client) = attitude_channel("attitude");
        let mut driver =
            FrameDriver::start(&AppConfig::default(), Box::new(client), &UnsupportedHost);
        feed.publish(SensorSample::new(Quat::IDENTITY));

        assert_eq!(
            driver.tick(&mut scene).head,
            Some(SourceStatus::Skipped(SkipReason::TargetMissing))
        );
        let camera = scene.spawn(Some("MainCamera"), None);
        assert_eq!(driver.tick(&mut scene).head, Some(SourceStatus::Applied));
        assert_eq!(
            scene.node(camera).unwrap().local_rotation,
            head_rotation(Quat::IDENTITY)
        );
    }

    #[test]
    fn disabled_peripheral_is_not_reported() {
        let mut scene = Scene::new();
        let mut config = AppConfig::default();
        config.peripheral.mode = rig_config::LimbMode::Disabled;
        let mut driver = FrameDriver::start(
            &config,
            Box::new(AttitudeClient::absent("attitude")),
            &UnsupportedHost,
        );
        assert_eq!(driver.tick(&mut scene).peripheral, None);
    }
}
