//! Platform Error Types

use thiserror::Error;

use crate::traits::{EffectKind, SessionId};

/// Errors from effect backends and their units
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Effect not available on this device: {0}")]
    EffectUnavailable(EffectKind),

    #[error("Invalid audio session: {0}")]
    InvalidSession(SessionId),

    #[error("Session limit reached ({0} concurrent sessions)")]
    SessionLimitReached(usize),

    #[error("{kind} already attached to session {session}")]
    UnitBusy { kind: EffectKind, session: SessionId },

    #[error("Invalid band {band} (unit has {count} bands)")]
    InvalidBand { band: u16, count: u16 },

    #[error("Parameter not supported: {0}")]
    UnsupportedParameter(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("DSP error: {0}")]
    Dsp(#[from] cinefx_dsp::DspError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlatformError::EffectUnavailable(EffectKind::Virtualizer);
        assert!(err.to_string().contains("Virtualizer"));

        let err = PlatformError::UnitBusy {
            kind: EffectKind::Equalizer,
            session: SessionId(9),
        };
        assert_eq!(err.to_string(), "Equalizer already attached to session 9");
    }

    #[test]
    fn test_error_from_dsp() {
        let err: PlatformError = cinefx_dsp::DspError::InvalidStrength(2000).into();
        assert!(matches!(err, PlatformError::Dsp(_)));
    }
}
