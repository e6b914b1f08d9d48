use anyhow::Result;
use glam::{Quat, Vec3};
use rig_bridge::memory::{InMemoryBridge, InMemoryHost, PeripheralWriter};
use rig_bridge::{BridgeHost, PeripheralSnapshot, UnsupportedHost};
use rig_config::AppConfig;
use rig_driver::{FrameDriver, SourceStatus};
use rig_imu::types::{RawOrientation, SensorSample};
use rig_imu::{attitude_channel, AttitudeClient, AttitudeFeed, SensorSource};
use rig_scene::Scene;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Scene standing in for the engine: a camera under a head rig, and an avatar
/// with both forearm bones and both XR hands.
fn build_scene(config: &AppConfig) -> Scene {
    let mut scene = Scene::new();
    let rig = scene.spawn(Some(config.head.rig_tag.as_str()), None);
    scene.spawn(Some(config.head.camera_tag.as_str()), Some(rig));

    let avatar = scene.spawn(None, None);
    scene.spawn(Some("EthanRightForeArm"), Some(avatar));
    scene.spawn(Some("EthanLeftForeArm"), Some(avatar));
    scene.spawn(Some("RightHand"), None);
    scene.spawn(Some("LeftHand"), None);
    scene
}

/// Simulated attitude sensor: slow yaw sweep with a little accelerometer noise.
async fn attitude_loop(feed: AttitudeFeed, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    let mut t = 0.0f32;
    loop {
        ticker.tick().await;
        t += period.as_secs_f32();
        let attitude =
            Quat::from_rotation_z(0.5 * t.sin()) * Quat::from_rotation_x(0.1 * t.cos());
        let acceleration = Vec3::new(0.02 * (7.0 * t).sin(), -1.0, 0.02 * (5.0 * t).cos());
        feed.publish(SensorSample::new(attitude).with_acceleration(acceleration));
    }
}

/// Simulated forearm peripheral writer, running off the tick thread.
async fn peripheral_loop(writer: PeripheralWriter, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    let mut t = 0.0f32;
    loop {
        ticker.tick().await;
        t += period.as_secs_f32();
        let q = Quat::from_rotation_y(0.8 * t.sin());
        writer.write(&PeripheralSnapshot {
            orientation: RawOrientation::new(q.x, q.y, q.z, q.w),
            acceleration: Vec3::new(0.0, -1.0, 0.0),
            gyroscope: Vec3::new(0.0, 0.8 * t.cos(), 0.0),
            average_abs_emg: 20.0 + 5.0 * (3.0 * t).sin(),
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "motion_rig=info,rig_driver=info,rig_imu=info,rig_bridge=info,rig_scene=info"
                    .into()
            }),
        )
        .init();

    info!("Motion rig starting");

    // Load config.
    let config = rig_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    info!(mode = ?config.peripheral.mode, tick_hz = config.tick_hz, "Config loaded");

    let period = Duration::from_secs_f64(1.0 / f64::from(config.tick_hz.max(1)));
    let simulate = std::env::var_os("MOTION_RIG_NO_SIM").is_none();

    // Attitude sensor (absent when simulation is off).
    let attitude: Box<dyn SensorSource> = if simulate {
        let (feed, client) = attitude_channel("attitude");
        tokio::spawn(attitude_loop(feed, period));
        Box::new(client)
    } else {
        Box::new(AttitudeClient::absent("attitude"))
    };

    // Peripheral bridge (unreachable when simulation is off).
    let bridge = Arc::new(InMemoryBridge::new());
    let host: Box<dyn BridgeHost> = if simulate {
        Box::new(InMemoryHost::new(bridge.clone()))
    } else {
        Box::new(UnsupportedHost)
    };

    let mut scene = build_scene(&config);
    let mut driver = FrameDriver::start(&config, attitude, host.as_ref());

    if let Some(link) = driver.peripheral().and_then(|p| p.link()) {
        let writer = PeripheralWriter::new(bridge, link.data_lock());
        tokio::spawn(peripheral_loop(writer, period));
    }

    info!(nodes = scene.len(), "Driver started, press Ctrl+C to stop");

    let mut ticker = tokio::time::interval(period);
    let mut failures = 0u64;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = driver.tick(&mut scene);
                if report.head == Some(SourceStatus::Failed)
                    || report.peripheral == Some(SourceStatus::Failed)
                {
                    failures += 1;
                }
                if report.frame % 300 == 0 {
                    if let Some(head) = driver.head() {
                        tracing::debug!(
                            frame = report.frame,
                            accel = ?head.smoothed_acceleration(),
                            failures,
                            "Head heartbeat"
                        );
                    }
                }
            }
            _ = &mut shutdown => {
                info!(frames = driver.frame_count(), failures, "Shutting down");
                break;
            }
        }
    }

    // Save config on exit.
    if let Err(e) = rig_config::save_config(&config) {
        tracing::error!(?e, "Failed to save config");
    }

    Ok(())
}
