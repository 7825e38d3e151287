//! cinefx Platform - Effect Unit Seam
//!
//! This crate defines how the effects coordinator talks to whatever actually
//! processes audio for a playback session:
//! - Effect unit traits (equalizer, strength-driven units, loudness)
//! - A backend trait that creates units bound to an audio session
//! - An in-process software backend built on `cinefx_dsp`
//!
//! # Backends
//!
//! | Backend    | Where it runs                | Strength support |
//! |------------|------------------------------|------------------|
//! | Software   | In-process, `process()` call | Configurable     |
//! | Device     | Platform audio framework     | Device-reported  |
//!
//! Device backends live with the host application and implement
//! [`EffectBackend`] directly.

mod error;
mod software;
mod traits;

pub use error::PlatformError;
pub use software::{SoftwareBackend, SoftwareBackendConfig};
pub use traits::{
    BandInfo, EffectBackend, EffectKind, EffectUnit, EqualizerUnit, LoudnessUnit, SessionId,
    StrengthUnit,
};
