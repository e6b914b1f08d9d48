use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Host tick rate in Hz (nominally the display refresh rate).
    pub tick_hz: u32,
    /// Acceleration smoothing.
    pub filter: FilterConfig,
    /// Head-tracking targets.
    pub head: HeadConfig,
    /// Forearm peripheral.
    pub peripheral: PeripheralConfig,
    /// Player movement tuning.
    pub player: PlayerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            filter: FilterConfig::default(),
            head: HeadConfig::default(),
            peripheral: PeripheralConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Nominal accelerometer update interval in seconds.
    pub update_interval_secs: f32,
    /// Low-pass kernel width in seconds. Wider = smoother, slower.
    pub kernel_width_secs: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: 1.0 / 60.0,
            kernel_width_secs: 1.0,
        }
    }
}

impl FilterConfig {
    /// Smoothing factor handed to the low-pass filter.
    pub fn factor(&self) -> f32 {
        self.update_interval_secs / self.kernel_width_secs
    }

    /// Reject timings whose factor falls outside [0, 1].
    pub fn validate(&self) -> anyhow::Result<()> {
        let factor = self.factor();
        if !(0.0..=1.0).contains(&factor) {
            anyhow::bail!(
                "low-pass factor {factor} out of range \
                 (update_interval_secs = {}, kernel_width_secs = {})",
                self.update_interval_secs,
                self.kernel_width_secs
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    /// Tag of the node that receives the converted attitude as local rotation.
    pub camera_tag: String,
    /// Tag of the head rig. Acceleration is only smoothed while it is bound.
    pub rig_tag: String,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            camera_tag: "MainCamera".into(),
            rig_tag: "HeadRig".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimbMode {
    /// Drive the avatar's forearm bones (world rotation).
    Avatar,
    /// Drive a pair of XR hand controllers (local rotation).
    XrControllers,
    /// Peripheral not used this session.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeripheralConfig {
    pub mode: LimbMode,
    /// Override for the right-limb tag. `None` uses the mode's default.
    pub right_tag: Option<String>,
    /// Override for the left-limb tag. `None` uses the mode's default.
    pub left_tag: Option<String>,
    /// Log every snapshot and periodically toast it on the device.
    pub logging_enabled: bool,
    /// Ticks between toasts while logging is enabled.
    pub toast_every_frames: u32,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            mode: LimbMode::Avatar,
            right_tag: None,
            left_tag: None,
            logging_enabled: false,
            toast_every_frames: 100,
        }
    }
}

impl PeripheralConfig {
    pub fn right_tag(&self) -> &str {
        self.right_tag.as_deref().unwrap_or(match self.mode {
            LimbMode::XrControllers => "RightHand",
            _ => "EthanRightForeArm",
        })
    }

    pub fn left_tag(&self) -> &str {
        self.left_tag.as_deref().unwrap_or(match self.mode {
            LimbMode::XrControllers => "LeftHand",
            _ => "EthanLeftForeArm",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Upward velocity change applied on jump.
    pub jump_velocity: f32,
    /// Radius of the ground-check overlap sphere.
    pub ground_check_radius: f32,
    /// Layer of pickups destroyed on contact.
    pub pickup_layer: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            jump_velocity: 6.0,
            ground_check_radius: 0.1,
            pickup_layer: 7,
        }
    }
}
