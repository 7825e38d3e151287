//! Effect Unit Traits
//!
//! Defines the interface every effect backend must provide. A backend hands
//! out one unit per effect kind per audio session; the unit is the handle to
//! the stateful processor behind it. Dropping a unit releases it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// Identifier of an audio output stream
///
/// `0` is reserved for "no session".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i32);

impl SessionId {
    pub const NONE: SessionId = SessionId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for SessionId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four post-processing stages a session can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Equalizer,
    BassBoost,
    Virtualizer,
    LoudnessEnhancer,
}

impl EffectKind {
    /// All kinds, in processing order
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Equalizer,
        EffectKind::BassBoost,
        EffectKind::Virtualizer,
        EffectKind::LoudnessEnhancer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Equalizer => "Equalizer",
            EffectKind::BassBoost => "Bass Boost",
            EffectKind::Virtualizer => "Virtualizer",
            EffectKind::LoudnessEnhancer => "Loudness Enhancer",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Band metadata as reported by an equalizer unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandInfo {
    /// Hardware-assigned ordinal
    pub index: u16,

    /// Center frequency in milliHertz
    pub center_freq_mhz: i32,

    /// Current level in millibels
    pub level: i16,

    pub min_level: i16,
    pub max_level: i16,
}

/// Behavior shared by every effect unit
pub trait EffectUnit: Send {
    fn kind(&self) -> EffectKind;

    /// Session the unit is attached to
    fn session(&self) -> SessionId;

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError>;

    fn is_enabled(&self) -> bool;
}

/// Multi-band equalizer
///
/// Band count, center frequencies and the level range are fixed for the
/// lifetime of the unit.
pub trait EqualizerUnit: EffectUnit {
    fn band_count(&self) -> u16;

    /// (min, max) level in millibels, shared by all bands
    fn band_level_range(&self) -> (i16, i16);

    /// Center frequency of a band in milliHertz
    fn center_freq(&self, band: u16) -> Result<i32, PlatformError>;

    fn band_level(&self, band: u16) -> Result<i16, PlatformError>;

    fn set_band_level(&mut self, band: u16, level: i16) -> Result<(), PlatformError>;

    /// Snapshot of every band's metadata and current level
    fn bands(&self) -> Result<Vec<BandInfo>, PlatformError> {
        let (min_level, max_level) = self.band_level_range();
        (0..self.band_count())
            .map(|index| {
                Ok(BandInfo {
                    index,
                    center_freq_mhz: self.center_freq(index)?,
                    level: self.band_level(index)?,
                    min_level,
                    max_level,
                })
            })
            .collect()
    }
}

/// Effect driven by a single 0-1000 strength (bass boost, virtualizer)
pub trait StrengthUnit: EffectUnit {
    /// Whether the strength can actually be adjusted on this device
    fn strength_supported(&self) -> bool;

    fn set_strength(&mut self, strength: i16) -> Result<(), PlatformError>;

    fn strength(&self) -> Result<i16, PlatformError>;
}

/// Loudness enhancer with a target gain in millibels
pub trait LoudnessUnit: EffectUnit {
    fn set_target_gain(&mut self, gain_mb: i32) -> Result<(), PlatformError>;

    fn target_gain(&self) -> Result<i32, PlatformError>;
}

/// Factory for effect units bound to an audio session
///
/// Each `create_*` call is independent: one kind failing says nothing about
/// the others.
pub trait EffectBackend: Send + Sync {
    /// Name of this backend for logs
    fn name(&self) -> &'static str;

    fn create_equalizer(&self, session: SessionId) -> Result<Box<dyn EqualizerUnit>, PlatformError>;

    fn create_bass_boost(&self, session: SessionId) -> Result<Box<dyn StrengthUnit>, PlatformError>;

    fn create_virtualizer(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn StrengthUnit>, PlatformError>;

    fn create_loudness_enhancer(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn LoudnessUnit>, PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_none() {
        assert!(SessionId::NONE.is_none());
        assert!(SessionId::default().is_none());
        assert!(!SessionId(42).is_none());
        assert_eq!(SessionId::from(7).get(), 7);
        assert_eq!(SessionId(13).to_string(), "13");
    }

    #[test]
    fn test_session_id_serializes_as_integer() {
        let json = serde_json::to_string(&SessionId(5)).unwrap();
        assert_eq!(json, "5");
    }

    #[test]
    fn test_effect_kind_display() {
        assert_eq!(EffectKind::BassBoost.to_string(), "Bass Boost");
        assert_eq!(EffectKind::ALL[0], EffectKind::Equalizer);
        assert_eq!(EffectKind::ALL[3], EffectKind::LoudnessEnhancer);
    }

    struct FixedEq {
        levels: Vec<i16>,
    }

    impl EffectUnit for FixedEq {
        fn kind(&self) -> EffectKind {
            EffectKind::Equalizer
        }
        fn session(&self) -> SessionId {
            SessionId(1)
        }
        fn set_enabled(&mut self, _enabled: bool) -> Result<(), PlatformError> {
            Ok(())
        }
        fn is_enabled(&self) -> bool {
            false
        }
    }

    impl EqualizerUnit for FixedEq {
        fn band_count(&self) -> u16 {
            self.levels.len() as u16
        }
        fn band_level_range(&self) -> (i16, i16) {
            (-1200, 1200)
        }
        fn center_freq(&self, band: u16) -> Result<i32, PlatformError> {
            Ok(1000 * 100 * (i32::from(band) + 1))
        }
        fn band_level(&self, band: u16) -> Result<i16, PlatformError> {
            self.levels
                .get(usize::from(band))
                .copied()
                .ok_or(PlatformError::InvalidBand {
                    band,
                    count: self.band_count(),
                })
        }
        fn set_band_level(&mut self, _band: u16, _level: i16) -> Result<(), PlatformError> {
            Ok(())
        }
    }

    #[test]
    fn test_default_bands_collects_metadata() {
        let eq = FixedEq {
            levels: vec![0, 300, -200],
        };
        let bands = eq.bands().unwrap();

        assert_eq!(bands.len(), 3);
        assert_eq!(
            bands[1],
            BandInfo {
                index: 1,
                center_freq_mhz: 200_000,
                level: 300,
                min_level: -1200,
                max_level: 1200,
            }
        );
        assert!(bands.iter().enumerate().all(|(i, b)| usize::from(b.index) == i));
    }
}
