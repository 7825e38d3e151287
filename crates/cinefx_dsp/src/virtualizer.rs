//! Stereo Virtualizer
//!
//! Mid/side widener. The side signal is scaled by `1 + strength/1000`, so
//! strength 0 leaves the image untouched and 1000 doubles its width.
//! Mono content (no side signal) passes through unchanged at any strength.

use crate::error::DspError;
use crate::units::{strength_fraction, MAX_STRENGTH};

pub struct Virtualizer {
    strength: i16,
    side_gain: f32,
    enabled: bool,
}

impl Virtualizer {
    pub fn new() -> Self {
        Self {
            strength: 0,
            side_gain: 1.0,
            enabled: false,
        }
    }

    pub fn set_strength(&mut self, strength: i16) -> Result<(), DspError> {
        if !(0..=MAX_STRENGTH).contains(&strength) {
            return Err(DspError::InvalidStrength(strength));
        }
        self.strength = strength;
        self.side_gain = 1.0 + strength_fraction(strength);
        Ok(())
    }

    pub fn strength(&self) -> i16 {
        self.strength
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn process_sample(&self, left: f32, right: f32) -> (f32, f32) {
        if !self.enabled {
            return (left, right);
        }
        let mid = (left + right) * 0.5;
        let side = (left - right) * 0.5 * self.side_gain;
        (mid + side, mid - side)
    }
}

impl Default for Virtualizer {
    fn default() -> Self {
        Self::new()
    }
}
