//! cinefx Core - Audio Effect Coordination
//!
//! This crate keeps the video player's post-processing effects in step with
//! the active playback session:
//! - Binding effect units (equalizer, bass boost, virtualizer, loudness) to
//!   whichever audio session the player reports
//! - Relaying user and preset changes to those units
//! - Publishing the resulting state as an observable snapshot
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   UI / Control Thread                       │
//! │  Player ──PlaybackListener──▶ AudioEffectCoordinator        │
//! │  Panel  ──set_* / EffectCommand──▶        │                 │
//! └───────────────────────────────────────────┼─────────────────┘
//!                    EffectBackend units ◀────┤
//!                                             ▼ publish
//! ┌─────────────────────────────────────────────────────────────┐
//! │   SnapshotWatcher / SnapshotReceiver (any thread)           │
//! │   latest EffectSnapshot, replayed to new subscribers        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod coordinator;
mod error;
mod message;
mod observable;
mod playback;
mod snapshot;

#[cfg(test)]
mod testing;

pub use config::{EffectConfig, EffectDefaults, LOUDNESS_GAIN_RANGE, STRENGTH_RANGE};
pub use coordinator::AudioEffectCoordinator;
pub use error::{EffectError, EffectResult};
pub use message::EffectCommand;
pub use observable::{SnapshotPublisher, SnapshotReceiver, SnapshotWatcher};
pub use playback::PlaybackListener;
pub use snapshot::{EffectSnapshot, EqBand};

// Re-export the pieces callers need to construct and drive a coordinator
pub use cinefx_dsp::{Preset, ANIME, FLAT, MOVIE, PRESETS};
pub use cinefx_platform::{
    EffectBackend, EffectKind, PlatformError, SessionId, SoftwareBackend, SoftwareBackendConfig,
};
