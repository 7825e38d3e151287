//! DSP Error Types

use thiserror::Error;

/// Errors that can occur during DSP operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Invalid band index: {index} (equalizer has {count} bands)")]
    InvalidBandIndex { index: usize, count: usize },

    #[error("Equalizer needs at least one band")]
    NoBands,

    #[error("Invalid filter coefficients for {frequency}Hz at sample rate {sample_rate}Hz")]
    InvalidCoefficients { frequency: f32, sample_rate: f32 },

    #[error("Sample rate must be positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("Strength out of range: {0} (must be 0-1000)")]
    InvalidStrength(i16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DspError::InvalidBandIndex { index: 15, count: 5 };
        let msg = err.to_string();
        assert!(msg.contains("15"));
        assert!(msg.contains("5 bands"));

        let err = DspError::InvalidCoefficients {
            frequency: 1000.0,
            sample_rate: 48000.0,
        };
        assert!(err.to_string().contains("1000"));

        let err = DspError::InvalidStrength(1200);
        assert!(err.to_string().contains("1200"));
    }
}
