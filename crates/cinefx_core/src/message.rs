//! Message Types for the Effects Panel
//!
//! Commands flow from the UI to the coordinator, which runs them one at a
//! time; state flows back as `EffectSnapshot` values.

use serde::{Deserialize, Serialize};

/// A single user action on the effects panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum EffectCommand {
    SetEqEnabled(bool),

    SetBassEnabled(bool),

    SetVirtualizerEnabled(bool),

    SetLoudnessEnabled(bool),

    /// Set one equalizer band, level in millibels
    SetEqBandLevel { band: u16, level: i16 },

    /// 0-1000
    SetBassStrength(i16),

    /// 0-1000
    SetVirtualizerStrength(i16),

    /// Target gain in millibels
    SetLoudnessGain(i32),

    /// Apply a built-in preset by name (case-insensitive)
    ApplyPreset { name: String },
}
