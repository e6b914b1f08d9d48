use crate::{BridgeError, BridgeHost, PeripheralBridge, PeripheralSnapshot};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const CHANNELS: usize = 11;

/// Peripheral bridge backed by process memory.
///
/// Used by the simulator and tests. Each channel is an independent atomic, so
/// without the shared data lock a reader could observe a half-written sample.
#[derive(Default)]
pub struct InMemoryBridge {
    channels: [AtomicU32; CHANNELS],
    toasts: Mutex<Vec<String>>,
}

impl InMemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, channel: usize) -> f32 {
        f32::from_bits(self.channels[channel].load(Ordering::Relaxed))
    }

    fn set(&self, channel: usize, value: f32) {
        self.channels[channel].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Toasts shown so far, oldest first.
    pub fn toasts(&self) -> Vec<String> {
        self.toasts.lock().clone()
    }
}

impl PeripheralBridge for InMemoryBridge {
    fn x_orientation(&self) -> f32 {
        self.get(0)
    }
    fn y_orientation(&self) -> f32 {
        self.get(1)
    }
    fn z_orientation(&self) -> f32 {
        self.get(2)
    }
    fn w_orientation(&self) -> f32 {
        self.get(3)
    }
    fn x_acceleration(&self) -> f32 {
        self.get(4)
    }
    fn y_acceleration(&self) -> f32 {
        self.get(5)
    }
    fn z_acceleration(&self) -> f32 {
        self.get(6)
    }
    fn x_gyroscope(&self) -> f32 {
        self.get(7)
    }
    fn y_gyroscope(&self) -> f32 {
        self.get(8)
    }
    fn z_gyroscope(&self) -> f32 {
        self.get(9)
    }
    fn average_abs_emg(&self) -> f32 {
        self.get(10)
    }

    fn show_toast(&self, message: &str) {
        tracing::info!(%message, "Toast");
        self.toasts.lock().push(message.to_string());
    }
}

/// Host that always attaches the same in-memory bridge.
pub struct InMemoryHost {
    bridge: Arc<InMemoryBridge>,
}

impl InMemoryHost {
    pub fn new(bridge: Arc<InMemoryBridge>) -> Self {
        Self { bridge }
    }
}

impl BridgeHost for InMemoryHost {
    fn attach(&self) -> Result<Arc<dyn PeripheralBridge>, BridgeError> {
        Ok(self.bridge.clone())
    }
}

/// Device-side writer. Publishes whole samples under the shared data lock.
#[derive(Clone)]
pub struct PeripheralWriter {
    bridge: Arc<InMemoryBridge>,
    data_lock: Arc<Mutex<()>>,
}

impl PeripheralWriter {
    pub fn new(bridge: Arc<InMemoryBridge>, data_lock: Arc<Mutex<()>>) -> Self {
        Self { bridge, data_lock }
    }

    pub fn write(&self, snapshot: &PeripheralSnapshot) {
        let o = snapshot.orientation;
        let a = snapshot.acceleration;
        let g = snapshot.gyroscope;
        let values = [
            o.x,
            o.y,
            o.z,
            o.w,
            a.x,
            a.y,
            a.z,
            g.x,
            g.y,
            g.z,
            snapshot.average_abs_emg,
        ];

        let _guard = self.data_lock.lock();
        for (channel, value) in values.into_iter().enumerate() {
            self.bridge.set(channel, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PeripheralLink;
    use glam::Vec3;
    use rig_imu::types::RawOrientation;
    use std::sync::atomic::AtomicBool;

    fn uniform(value: f32) -> PeripheralSnapshot {
        PeripheralSnapshot {
            orientation: RawOrientation::new(value, value, value, value),
            acceleration: Vec3::splat(value),
            gyroscope: Vec3::splat(value),
            average_abs_emg: value,
        }
    }

    fn open_link(bridge: &Arc<InMemoryBridge>) -> PeripheralLink {
        match PeripheralLink::open(&InMemoryHost::new(bridge.clone())) {
            Ok(link) => link,
            Err(e) => panic!("in-memory host failed: {e}"),
        }
    }

    #[test]
    fn snapshot_reads_what_was_written() {
        let bridge = Arc::new(InMemoryBridge::new());
        let link = open_link(&bridge);
        let writer = PeripheralWriter::new(bridge.clone(), link.data_lock());

        let snapshot = PeripheralSnapshot {
            orientation: RawOrientation::new(0.1, 0.2, 0.3, 0.9),
            acceleration: Vec3::new(0.0, -1.0, 0.0),
            gyroscope: Vec3::new(0.5, 0.0, -0.5),
            average_abs_emg: 42.0,
        };
        writer.write(&snapshot);
        assert_eq!(link.read_snapshot(), snapshot);
    }

    #[test]
    fn concurrent_writer_never_tears_a_snapshot() {
        let bridge = Arc::new(InMemoryBridge::new());
        let link = open_link(&bridge);
        let writer = PeripheralWriter::new(bridge.clone(), link.data_lock());
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let stop = stop.clone();
            std::thread::spawn(move || {
                let mut value = 0.0f32;
                while !stop.load(Ordering::Relaxed) {
                    value += 1.0;
                    writer.write(&uniform(value));
                }
            })
        };

        for _ in 0..5_000 {
            let s = link.read_snapshot();
            let v = s.orientation.x;
            assert_eq!(s, uniform(v), "torn snapshot");
        }

        stop.store(true, Ordering::Relaxed);
        handle.join().unwrap();
    }

    #[test]
    fn toasts_are_recorded() {
        let bridge = Arc::new(InMemoryBridge::new());
        let link = open_link(&bridge);
        link.show_toast("hello");
        assert_eq!(bridge.toasts(), vec!["hello".to_string()]);
    }
}
