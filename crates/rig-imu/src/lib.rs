pub mod convert;
pub mod filter;
pub mod types;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use types::SensorSample;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("{name} is not available")]
    Unavailable { name: String },
    #[error("{name} is disabled")]
    Disabled { name: String },
    #[error("{name} has not produced a reading yet")]
    NoReading { name: String },
}

/// A device that reports orientation (and possibly acceleration).
///
/// Availability can change at any time; callers re-check every tick and only
/// call [`SensorSource::read_latest`] when the source is available.
pub trait SensorSource: Send {
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
    fn is_enabled(&self) -> bool;
    fn enable(&mut self);
    fn read_latest(&self) -> Result<SensorSample, SourceError>;
}

/// Producer half of an attitude channel, owned by whatever polls the device.
pub struct AttitudeFeed {
    sample_tx: watch::Sender<Option<SensorSample>>,
    enabled: Arc<AtomicBool>,
}

impl AttitudeFeed {
    /// Publish the newest reading, replacing whatever was there.
    pub fn publish(&self, sample: SensorSample) {
        self.sample_tx.send_replace(Some(sample));
    }

    /// Host-side enable/disable (the platform may toggle devices at runtime).
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// Consumer half of an attitude channel.
///
/// The source is available for as long as its [`AttitudeFeed`] is alive.
pub struct AttitudeClient {
    name: String,
    sample_rx: watch::Receiver<Option<SensorSample>>,
    enabled: Arc<AtomicBool>,
}

/// Create a connected feed/client pair. The device starts disabled.
pub fn attitude_channel(name: impl Into<String>) -> (AttitudeFeed, AttitudeClient) {
    let (sample_tx, sample_rx) = watch::channel(None);
    let enabled = Arc::new(AtomicBool::new(false));
    let feed = AttitudeFeed {
        sample_tx,
        enabled: enabled.clone(),
    };
    let client = AttitudeClient {
        name: name.into(),
        sample_rx,
        enabled,
    };
    (feed, client)
}

impl AttitudeClient {
    /// A client for a device this platform does not have.
    pub fn absent(name: impl Into<String>) -> Self {
        let (feed, client) = attitude_channel(name);
        drop(feed);
        client
    }
}

impl SensorSource for AttitudeClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.sample_rx.has_changed().is_ok()
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    fn enable(&mut self) {
        if self.is_available() {
            self.enabled.store(true, Ordering::Release);
            tracing::debug!(source = %self.name, "Attitude source enabled");
        }
    }

    fn read_latest(&self) -> Result<SensorSample, SourceError> {
        if !self.is_available() {
            return Err(SourceError::Unavailable {
                name: self.name.clone(),
            });
        }
        if !self.is_enabled() {
            return Err(SourceError::Disabled {
                name: self.name.clone(),
            });
        }
        (*self.sample_rx.borrow()).ok_or_else(|| SourceError::NoReading {
            name: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn absent_client_is_never_available() {
        let mut client = AttitudeClient::absent("attitude");
        assert!(!client.is_available());
        client.enable();
        assert!(!client.is_enabled());
        assert!(matches!(
            client.read_latest(),
            Err(SourceError::Unavailable { .. })
        ));
    }

    #[test]
    fn reads_latest_published_sample() {
        let (feed, mut client) = attitude_channel("attitude");
        assert!(client.is_available());
        assert!(matches!(client.read_latest(), Err(SourceError::Disabled { .. })));

        client.enable();
        assert!(feed.is_enabled());
        assert!(matches!(client.read_latest(), Err(SourceError::NoReading { .. })));

        feed.publish(SensorSample::new(Quat::from_rotation_x(0.1)));
        let second = SensorSample::new(Quat::from_rotation_x(0.2)).with_acceleration(Vec3::Y);
        feed.publish(second);
        assert_eq!(client.read_latest(), Ok(second));
    }

    #[test]
    fn availability_follows_feed_lifetime() {
        let (feed, mut client) = attitude_channel("attitude");
        client.enable();
        feed.publish(SensorSample::new(Quat::IDENTITY));
        assert!(client.read_latest().is_ok());

        drop(feed);
        assert!(!client.is_available());
        assert!(client.read_latest().is_err());
    }

    #[test]
    fn host_can_disable_at_runtime() {
        let (feed, mut client) = attitude_channel("attitude");
        client.enable();
        feed.set_enabled(false);
        assert!(!client.is_enabled());
    }
}
