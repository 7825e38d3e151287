//! Level unit conversions
//!
//! Effect backends speak millibels (1/100 dB) and per-mille strengths;
//! the filters want dB and linear amplitude.

/// Upper bound of a per-mille effect strength
pub const MAX_STRENGTH: i16 = 1000;

/// Convert millibels to decibels
#[inline]
pub fn millibel_to_db(millibel: i32) -> f32 {
    millibel as f32 / 100.0
}

/// Convert decibels to linear amplitude
/// Formula: amplitude = 10^(dB/20)
#[inline]
pub fn db_to_amplitude(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Map a per-mille strength onto `0.0..=1.0`
#[inline]
pub fn strength_fraction(strength: i16) -> f32 {
    f32::from(strength.clamp(0, MAX_STRENGTH)) / f32::from(MAX_STRENGTH)
}
