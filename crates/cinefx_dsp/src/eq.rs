//! Multi-Band Graphic Equalizer
//!
//! Implements a cascade of BiQuad filters for audio equalization.
//! Based on the RBJ (Robert Bristow-Johnson) Audio EQ Cookbook.
//!
//! The band layout is not fixed: a session's equalizer is built from whatever
//! center frequencies the effect backend reports (five bands on a typical
//! handset, ten on some DSPs).

use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type, Q_BUTTERWORTH_F32};

use crate::error::DspError;

/// Center frequencies (Hz) of the common five-band handset equalizer
pub const DEFAULT_BAND_CENTERS: [f32; 5] = [60.0, 230.0, 910.0, 3600.0, 14000.0];

/// Gains are clamped to this many dB either side of flat
pub const MAX_BAND_GAIN_DB: f32 = 24.0;

/// Filter type for each EQ band
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandType {
    LowShelf,
    Peaking,
    HighShelf,
}

/// Single EQ band configuration
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub frequency: f32,
    pub gain_db: f32,
    pub q: f32,
    pub band_type: BandType,
}

impl Band {
    pub fn new(frequency: f32, band_type: BandType) -> Self {
        Self {
            frequency,
            gain_db: 0.0,
            q: Q_BUTTERWORTH_F32,
            band_type,
        }
    }

    fn to_coefficients(self, sample_rate: f32) -> Result<Coefficients<f32>, DspError> {
        let filter = match self.band_type {
            BandType::LowShelf => Type::LowShelf(self.gain_db),
            BandType::Peaking => Type::PeakingEQ(self.gain_db),
            BandType::HighShelf => Type::HighShelf(self.gain_db),
        };

        Coefficients::<f32>::from_params(filter, sample_rate.hz(), self.frequency.hz(), self.q)
            .map_err(|_| DspError::InvalidCoefficients {
                frequency: self.frequency,
                sample_rate,
            })
    }
}

/// Complete EQ configuration
#[derive(Debug, Clone)]
pub struct EqConfig {
    pub bands: Vec<Band>,
    pub enabled: bool,
}

impl EqConfig {
    /// Build a flat configuration from a list of center frequencies
    ///
    /// The outermost bands become shelves when there are at least three bands,
    /// everything else is a peaking filter.
    pub fn with_frequencies(frequencies: &[f32]) -> Self {
        let last = frequencies.len().saturating_sub(1);
        let shelves = frequencies.len() >= 3;

        let bands = frequencies
            .iter()
            .enumerate()
            .map(|(i, &frequency)| {
                let band_type = match i {
                    0 if shelves => BandType::LowShelf,
                    i if shelves && i == last => BandType::HighShelf,
                    _ => BandType::Peaking,
                };
                Band::new(frequency, band_type)
            })
            .collect();

        Self {
            bands,
            enabled: true,
        }
    }

    /// Set gain for a specific band
    pub fn set_band_gain(&mut self, band_index: usize, gain_db: f32) -> Result<(), DspError> {
        let count = self.bands.len();
        let band = self
            .bands
            .get_mut(band_index)
            .ok_or(DspError::InvalidBandIndex {
                index: band_index,
                count,
            })?;
        band.gain_db = gain_db.clamp(-MAX_BAND_GAIN_DB, MAX_BAND_GAIN_DB);
        Ok(())
    }

    /// Current gains in band order
    pub fn gains(&self) -> Vec<f32> {
        self.bands.iter().map(|b| b.gain_db).collect()
    }
}

impl Default for EqConfig {
    fn default() -> Self {
        Self::with_frequencies(&DEFAULT_BAND_CENTERS)
    }
}

/// The main equalizer processor
///
/// Holds the filter state and processes stereo audio.
/// No allocations in the processing path.
pub struct Equalizer {
    filters_left: Vec<DirectForm2Transposed<f32>>,
    filters_right: Vec<DirectForm2Transposed<f32>>,
    config: EqConfig,
    sample_rate: f32,
}

impl Equalizer {
    /// Create a flat equalizer with one band per center frequency
    pub fn new(sample_rate: f32, frequencies: &[f32]) -> Result<Self, DspError> {
        if sample_rate <= 0.0 {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }
        if frequencies.is_empty() {
            return Err(DspError::NoBands);
        }

        let config = EqConfig::with_frequencies(frequencies);
        let mut filters_left = Vec::with_capacity(config.bands.len());
        let mut filters_right = Vec::with_capacity(config.bands.len());
        for band in &config.bands {
            let coeffs = band.to_coefficients(sample_rate)?;
            filters_left.push(DirectForm2Transposed::<f32>::new(coeffs));
            filters_right.push(DirectForm2Transposed::<f32>::new(coeffs));
        }

        Ok(Self {
            filters_left,
            filters_right,
            config,
            sample_rate,
        })
    }

    /// Replace the configuration, recalculating every filter
    ///
    /// The band layout must match the one the equalizer was built with.
    pub fn update_config(&mut self, config: EqConfig) -> Result<(), DspError> {
        if config.bands.len() != self.filters_left.len() {
            return Err(DspError::InvalidBandIndex {
                index: config.bands.len(),
                count: self.filters_left.len(),
            });
        }
        for (i, band) in config.bands.iter().enumerate() {
            let coeffs = band.to_coefficients(self.sample_rate)?;
            self.filters_left[i].update_coefficients(coeffs);
            self.filters_right[i].update_coefficients(coeffs);
        }
        self.config = config;
        Ok(())
    }

    /// Set gain for a single band
    pub fn set_band_gain(&mut self, band_index: usize, gain_db: f32) -> Result<(), DspError> {
        self.config.set_band_gain(band_index, gain_db)?;

        let coeffs = self.config.bands[band_index].to_coefficients(self.sample_rate)?;
        self.filters_left[band_index].update_coefficients(coeffs);
        self.filters_right[band_index].update_coefficients(coeffs);
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Process a stereo sample pair through the EQ chain
    #[inline]
    pub fn process_sample(&mut self, left: f32, right: f32) -> (f32, f32) {
        if !self.config.enabled {
            return (left, right);
        }

        let mut l = left;
        let mut r = right;
        for (fl, fr) in self.filters_left.iter_mut().zip(self.filters_right.iter_mut()) {
            l = fl.run(l);
            r = fr.run(r);
        }
        (l, r)
    }

    /// Process an interleaved stereo buffer in-place
    ///
    /// Buffer format: [L0, R0, L1, R1, ...]
    #[inline]
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) {
        for frame in buffer.chunks_exact_mut(2) {
            let (l, r) = self.process_sample(frame[0], frame[1]);
            frame[0] = l;
            frame[1] = r;
        }
    }

    /// Process separate left/right channel buffers
    #[inline]
    pub fn process_planar(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len(), "Channel buffers must be same length");

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (new_l, new_r) = self.process_sample(*l, *r);
            *l = new_l;
            *r = new_r;
        }
    }

    pub fn config(&self) -> &EqConfig {
        &self.config
    }

    pub fn band_count(&self) -> usize {
        self.config.bands.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Clear delay lines
    ///
    /// Call when switching audio sources to prevent filter ringing
    pub fn reset(&mut self) {
        for (fl, fr) in self.filters_left.iter_mut().zip(self.filters_right.iter_mut()) {
            fl.reset_state();
            fr.reset_state();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_band() -> Equalizer {
        Equalizer::new(48000.0, &DEFAULT_BAND_CENTERS).unwrap()
    }

    #[test]
    fn test_default_config_is_flat() {
        let config = EqConfig::default();
        assert_eq!(config.bands.len(), 5);
        for band in &config.bands {
            assert_eq!(band.gain_db, 0.0, "Default should be flat (0dB)");
        }
    }

    #[test]
    fn test_band_frequencies_follow_layout() {
        let config = EqConfig::with_frequencies(&DEFAULT_BAND_CENTERS);
        for (i, band) in config.bands.iter().enumerate() {
            assert_eq!(band.frequency, DEFAULT_BAND_CENTERS[i]);
        }
    }

    #[test]
    fn test_outer_bands_are_shelves() {
        let config = EqConfig::default();
        assert_eq!(config.bands[0].band_type, BandType::LowShelf);
        assert_eq!(config.bands[4].band_type, BandType::HighShelf);
        for band in &config.bands[1..4] {
            assert_eq!(band.band_type, BandType::Peaking);
        }
    }

    #[test]
    fn test_two_band_layout_has_no_shelves() {
        let config = EqConfig::with_frequencies(&[100.0, 5000.0]);
        assert!(config
            .bands
            .iter()
            .all(|b| b.band_type == BandType::Peaking));
    }

    #[test]
    fn test_gain_clamping() {
        let mut config = EqConfig::default();

        config.set_band_gain(0, 100.0).unwrap();
        assert_eq!(config.bands[0].gain_db, MAX_BAND_GAIN_DB);

        config.set_band_gain(0, -100.0).unwrap();
        assert_eq!(config.bands[0].gain_db, -MAX_BAND_GAIN_DB);
    }

    #[test]
    fn test_invalid_band_index() {
        let mut config = EqConfig::default();
        assert_eq!(
            config.set_band_gain(5, 0.0),
            Err(DspError::InvalidBandIndex { index: 5, count: 5 })
        );
        assert!(config.set_band_gain(100, 0.0).is_err());
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(
            Equalizer::new(0.0, &DEFAULT_BAND_CENTERS),
            Err(DspError::InvalidSampleRate(_))
        ));
        assert!(matches!(Equalizer::new(48000.0, &[]), Err(DspError::NoBands)));
        // Above Nyquist
        assert!(matches!(
            Equalizer::new(8000.0, &[60.0, 6000.0]),
            Err(DspError::InvalidCoefficients { .. })
        ));
    }

    #[test]
    fn test_flat_eq_is_stable() {
        let mut eq = five_band();

        for _ in 0..1000 {
            eq.process_sample(0.5, -0.5);
        }
        let (out_l, out_r) = eq.process_sample(0.5, -0.5);

        assert!(out_l.is_finite() && out_r.is_finite());
        assert!(out_l.abs() < 2.0, "Output should not clip: {}", out_l);
        assert!(out_l > 0.0, "Left output should keep positive polarity");
        assert!(out_r < 0.0, "Right output should keep negative polarity");
    }

    #[test]
    fn test_eq_disabled_passthrough() {
        let mut eq = five_band();
        eq.set_band_gain(2, 12.0).unwrap();
        eq.set_enabled(false);

        let (out_l, out_r) = eq.process_sample(0.5, -0.5);
        assert_eq!(out_l, 0.5);
        assert_eq!(out_r, -0.5);
    }

    #[test]
    fn test_update_config_rejects_other_layout() {
        let mut eq = five_band();
        let ten = EqConfig::with_frequencies(&[
            31.0, 62.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
        ]);
        assert!(eq.update_config(ten).is_err());

        let mut same = eq.config().clone();
        same.bands[1].gain_db = 6.0;
        eq.update_config(same).unwrap();
        assert_eq!(eq.config().gains()[1], 6.0);
    }

    #[test]
    fn test_interleaved_and_planar_processing() {
        let mut eq = five_band();
        let mut buffer = vec![0.5, -0.5, 0.3, -0.3, 0.1, -0.1];
        eq.process_interleaved(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite() && s.abs() < 10.0));

        let mut left = vec![0.5, 0.3, 0.1];
        let mut right = vec![-0.5, -0.3, -0.1];
        eq.process_planar(&mut left, &mut right);
        assert!(left.iter().chain(right.iter()).all(|s| s.is_finite()));
    }

    #[test]
    fn test_reset_keeps_working() {
        let mut eq = five_band();
        for _ in 0..100 {
            eq.process_sample(0.5, -0.5);
        }
        eq.reset();

        let (l, r) = eq.process_sample(0.5, -0.5);
        assert!(l.is_finite());
        assert!(r.is_finite());
    }

    #[test]
    fn test_boost_increases_amplitude() {
        let mut eq = five_band();
        // 910 Hz band
        eq.set_band_gain(2, 12.0).unwrap();

        let sample_rate = 48000.0;
        let freq = 910.0;
        let mut max_input = 0.0_f32;
        let mut max_output = 0.0_f32;

        for i in 0..4800 {
            let t = i as f32 / sample_rate;
            let sample = (2.0 * std::f32::consts::PI * freq * t).sin() * 0.25;
            max_input = max_input.max(sample.abs());

            let (out, _) = eq.process_sample(sample, sample);
            max_output = max_output.max(out.abs());
        }

        assert!(max_output > max_input, "Boost should increase amplitude");
    }
}
