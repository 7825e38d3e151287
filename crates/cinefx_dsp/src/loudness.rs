//! Loudness Enhancer
//!
//! Applies a target make-up gain (millibels) and then a tanh soft limiter so
//! the boosted signal never exceeds ±1.0.
//!
//! # Algorithm
//!
//! - Below the limiter threshold: linear
//! - Above: the excess is squashed with `tanh`, scaled into the remaining
//!   headroom, so the curve is continuous at the threshold and approaches
//!   full scale asymptotically

use crate::units::{db_to_amplitude, millibel_to_db};

/// Level (dBFS) where the output limiter starts bending the curve
pub const LIMITER_THRESHOLD_DB: f32 = -1.0;

/// Highest make-up gain actually applied (mB); keeps the linear gain finite
pub const MAX_TARGET_GAIN_MB: i32 = i16::MAX as i32;

pub struct LoudnessEnhancer {
    target_gain_mb: i32,
    gain_linear: f32,
    threshold: f32,
    enabled: bool,
}

impl LoudnessEnhancer {
    pub fn new() -> Self {
        Self {
            target_gain_mb: 0,
            gain_linear: 1.0,
            threshold: db_to_amplitude(LIMITER_THRESHOLD_DB),
            enabled: false,
        }
    }

    /// Requested gain is reported back unchanged; the applied gain is capped
    /// at [`MAX_TARGET_GAIN_MB`]
    pub fn set_target_gain(&mut self, gain_mb: i32) {
        self.target_gain_mb = gain_mb;
        self.gain_linear = db_to_amplitude(millibel_to_db(gain_mb.min(MAX_TARGET_GAIN_MB)));
    }

    pub fn target_gain(&self) -> i32 {
        self.target_gain_mb
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Linear limiter threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    #[inline]
    pub fn process_sample(&self, sample: f32) -> f32 {
        if !self.enabled {
            return sample;
        }
        soft_limit(sample * self.gain_linear, self.threshold)
    }

    #[inline]
    pub fn process_interleaved(&self, buffer: &mut [f32]) {
        if !self.enabled {
            return;
        }
        for sample in buffer.iter_mut() {
            *sample = soft_limit(*sample * self.gain_linear, self.threshold);
        }
    }
}

impl Default for LoudnessEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn soft_limit(sample: f32, threshold: f32) -> f32 {
    let magnitude = sample.abs();
    if magnitude <= threshold {
        return sample;
    }

    let headroom = (1.0 - threshold).max(0.001);
    let excess = (magnitude - threshold) / headroom;
    sample.signum() * (threshold + headroom * excess.tanh())
}
