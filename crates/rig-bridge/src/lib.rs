//! Forearm peripheral bridge.
//!
//! The device bridge exposes one getter per scalar channel. A writer thread on
//! the bridge side updates those channels while the host reads them, so every
//! batch of reads (and every batch of writes) happens under one shared data
//! lock owned by [`PeripheralLink`].

pub mod memory;

use glam::Vec3;
use parking_lot::Mutex;
use rig_imu::types::RawOrientation;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Host platform unreachable: {0}")]
    PlatformUnreachable(String),
}

/// Scalar getters published by the peripheral plugin.
pub trait PeripheralBridge: Send + Sync {
    fn x_orientation(&self) -> f32;
    fn y_orientation(&self) -> f32;
    fn z_orientation(&self) -> f32;
    fn w_orientation(&self) -> f32;
    fn x_acceleration(&self) -> f32;
    fn y_acceleration(&self) -> f32;
    fn z_acceleration(&self) -> f32;
    fn x_gyroscope(&self) -> f32;
    fn y_gyroscope(&self) -> f32;
    fn z_gyroscope(&self) -> f32;
    fn average_abs_emg(&self) -> f32;

    /// Show a short on-device message.
    fn show_toast(&self, message: &str);
}

/// Platform entry point that hands out the plugin for the current activity.
pub trait BridgeHost {
    fn attach(&self) -> Result<Arc<dyn PeripheralBridge>, BridgeError>;
}

/// Host for platforms that have no peripheral plugin.
pub struct UnsupportedHost;

impl BridgeHost for UnsupportedHost {
    fn attach(&self) -> Result<Arc<dyn PeripheralBridge>, BridgeError> {
        Err(BridgeError::PlatformUnreachable(
            std::env::consts::OS.to_string(),
        ))
    }
}

/// One consistent reading of every peripheral channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeripheralSnapshot {
    pub orientation: RawOrientation,
    pub acceleration: Vec3,
    pub gyroscope: Vec3,
    pub average_abs_emg: f32,
}

impl PeripheralSnapshot {
    /// Multi-line diagnostic text for logs and toasts.
    pub fn describe(&self) -> String {
        let o = self.orientation;
        let a = self.acceleration;
        let g = self.gyroscope;
        format!(
            "Plugin extract:\
             \nOrientation x: {}, y: {}, z: {}, w: {}\
             \nAcceleration x: {}, y: {}, z: {}\
             \nGyroscope x: {}, y: {}, z: {}\
             \nAverage EMG: {}",
            o.x, o.y, o.z, o.w, a.x, a.y, a.z, g.x, g.y, g.z, self.average_abs_emg
        )
    }
}

/// Owned connection to the peripheral plugin plus the shared data lock.
///
/// Created once at startup; dropping it releases the plugin handle.
pub struct PeripheralLink {
    bridge: Arc<dyn PeripheralBridge>,
    data_lock: Arc<Mutex<()>>,
}

impl PeripheralLink {
    /// Attach through the platform host with a fresh data lock.
    pub fn open(host: &dyn BridgeHost) -> Result<Self, BridgeError> {
        let bridge = host.attach()?;
        tracing::info!("Peripheral plugin attached");
        Ok(Self::new(bridge, Arc::new(Mutex::new(()))))
    }

    /// Wrap an already attached bridge whose writer shares `data_lock`.
    pub fn new(bridge: Arc<dyn PeripheralBridge>, data_lock: Arc<Mutex<()>>) -> Self {
        Self { bridge, data_lock }
    }

    /// Handle for the writer side; hold it while updating channels.
    pub fn data_lock(&self) -> Arc<Mutex<()>> {
        self.data_lock.clone()
    }

    /// Read all eleven channels as one atomic group.
    pub fn read_snapshot(&self) -> PeripheralSnapshot {
        let _guard = self.data_lock.lock();
        let b = &self.bridge;
        PeripheralSnapshot {
            orientation: RawOrientation::new(
                b.x_orientation(),
                b.y_orientation(),
                b.z_orientation(),
                b.w_orientation(),
            ),
            acceleration: Vec3::new(b.x_acceleration(), b.y_acceleration(), b.z_acceleration()),
            gyroscope: Vec3::new(b.x_gyroscope(), b.y_gyroscope(), b.z_gyroscope()),
            average_abs_emg: b.average_abs_emg(),
        }
    }

    pub fn show_toast(&self, message: &str) {
        self.bridge.show_toast(message);
    }
}

impl Drop for PeripheralLink {
    fn drop(&mut self) {
        tracing::debug!("Peripheral plugin released");
    }
}
