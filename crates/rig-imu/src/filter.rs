use glam::Vec3;

/// One low-pass step: move `previous` toward `sample` by `factor`.
///
/// `factor` is expected in [0, 1]; it is not checked here.
pub fn low_pass(previous: Vec3, sample: Vec3, factor: f32) -> Vec3 {
    previous + (sample - previous) * factor
}

/// Exponential smoothing of a noisy 3D signal (acceleration).
///
/// Owns the running value between frames; everything else is stateless.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    value: Vec3,
    factor: f32,
}

impl LowPassFilter {
    pub fn new(factor: f32, initial: Vec3) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&factor),
            "low-pass factor {factor} outside [0, 1]"
        );
        Self {
            value: initial,
            factor,
        }
    }

    /// Advance with a new sample and return the smoothed value.
    pub fn update(&mut self, sample: Vec3) -> Vec3 {
        self.value = low_pass(self.value, sample, self.factor);
        self.value
    }

    pub fn value(&self) -> Vec3 {
        self.value
    }
}
