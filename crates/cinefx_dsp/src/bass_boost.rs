//! Bass Boost
//!
//! Low-shelf BiQuad whose gain follows a per-mille strength.
//! Strength 0 is transparent, 1000 lifts everything below the corner by
//! [`MAX_BASS_BOOST_DB`].

use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type, Q_BUTTERWORTH_F32};

use crate::error::DspError;
use crate::units::{strength_fraction, MAX_STRENGTH};

/// Shelf corner frequency (Hz)
pub const BASS_BOOST_FREQUENCY: f32 = 80.0;

/// Shelf gain at full strength
pub const MAX_BASS_BOOST_DB: f32 = 15.0;

pub struct BassBoost {
    left: DirectForm2Transposed<f32>,
    right: DirectForm2Transposed<f32>,
    sample_rate: f32,
    strength: i16,
    enabled: bool,
}

impl BassBoost {
    /// Create a disabled bass boost at strength 0
    pub fn new(sample_rate: f32) -> Result<Self, DspError> {
        if sample_rate <= 0.0 {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }
        let coeffs = shelf(sample_rate, 0)?;
        Ok(Self {
            left: DirectForm2Transposed::<f32>::new(coeffs),
            right: DirectForm2Transposed::<f32>::new(coeffs),
            sample_rate,
            strength: 0,
            enabled: false,
        })
    }

    pub fn set_strength(&mut self, strength: i16) -> Result<(), DspError> {
        if !(0..=MAX_STRENGTH).contains(&strength) {
            return Err(DspError::InvalidStrength(strength));
        }
        let coeffs = shelf(self.sample_rate, strength)?;
        self.left.update_coefficients(coeffs);
        self.right.update_coefficients(coeffs);
        self.strength = strength;
        Ok(())
    }

    pub fn strength(&self) -> i16 {
        self.strength
    }

    /// Shelf gain for the current strength
    pub fn gain_db(&self) -> f32 {
        strength_fraction(self.strength) * MAX_BASS_BOOST_DB
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn process_sample(&mut self, left: f32, right: f32) -> (f32, f32) {
        if !self.enabled {
            return (left, right);
        }
        (self.left.run(left), self.right.run(right))
    }

    pub fn reset(&mut self) {
        self.left.reset_state();
        self.right.reset_state();
    }
}

fn shelf(sample_rate: f32, strength: i16) -> Result<Coefficients<f32>, DspError> {
    let gain_db = strength_fraction(strength) * MAX_BASS_BOOST_DB;
    Coefficients::<f32>::from_params(
        Type::LowShelf(gain_db),
        sample_rate.hz(),
        BASS_BOOST_FREQUENCY.hz(),
        Q_BUTTERWORTH_F32,
    )
    .map_err(|_| DspError::InvalidCoefficients {
        frequency: BASS_BOOST_FREQUENCY,
        sample_rate,
    })
}
