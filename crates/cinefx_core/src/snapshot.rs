//! Observable Effect State
//!
//! `EffectSnapshot` is what the effects panel renders from. It is replaced
//! wholesale on every change, never mutated in place once published.

use serde::{Deserialize, Serialize};

use cinefx_platform::{BandInfo, EffectKind};

use crate::config::EffectDefaults;

/// One equalizer band as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqBand {
    /// Hardware-assigned ordinal
    pub index: u16,

    /// Center frequency in milliHertz (fixed while the session is bound)
    pub center_freq_mhz: i32,

    /// Current level in millibels
    pub level: i16,

    pub min_level: i16,
    pub max_level: i16,
}

impl EqBand {
    /// Center frequency in whole Hz
    pub fn center_freq_hz(&self) -> i32 {
        self.center_freq_mhz / 1000
    }

    /// Slider caption, e.g. "910Hz"
    pub fn label(&self) -> String {
        format!("{}Hz", self.center_freq_hz())
    }

    pub fn level_in_range(&self, level: i16) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }
}

impl From<BandInfo> for EqBand {
    fn from(info: BandInfo) -> Self {
        Self {
            index: info.index,
            center_freq_mhz: info.center_freq_mhz,
            level: info.level,
            min_level: info.min_level,
            max_level: info.max_level,
        }
    }
}

/// Full effect state at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    pub eq_enabled: bool,
    pub bass_enabled: bool,
    pub virtualizer_enabled: bool,
    pub loudness_enabled: bool,

    /// Bands of the bound session's equalizer, in hardware order
    pub eq_bands: Vec<EqBand>,

    /// 0-1000
    pub bass_strength: i16,
    /// 0-1000
    pub virtualizer_strength: i16,
    pub loudness_gain_mb: i32,
}

impl EffectSnapshot {
    pub fn band(&self, index: u16) -> Option<&EqBand> {
        self.eq_bands.iter().find(|b| b.index == index)
    }

    /// Logical enabled flag for an effect kind
    pub fn is_enabled(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Equalizer => self.eq_enabled,
            EffectKind::BassBoost => self.bass_enabled,
            EffectKind::Virtualizer => self.virtualizer_enabled,
            EffectKind::LoudnessEnhancer => self.loudness_enabled,
        }
    }
}

impl From<&EffectDefaults> for EffectSnapshot {
    fn from(defaults: &EffectDefaults) -> Self {
        Self {
            eq_enabled: defaults.eq_enabled,
            bass_enabled: defaults.bass_enabled,
            virtualizer_enabled: defaults.virtualizer_enabled,
            loudness_enabled: defaults.loudness_enabled,
            eq_bands: Vec::new(),
            bass_strength: defaults.bass_strength,
            virtualizer_strength: defaults.virtualizer_strength,
            loudness_gain_mb: defaults.loudness_gain_mb,
        }
    }
}

impl Default for EffectSnapshot {
    fn default() -> Self {
        Self::from(&EffectDefaults::default())
    }
}
