//! cinefx DSP - Software Effect Processors
//!
//! This crate provides the in-process implementation of the four effect units
//! a playback session can carry, plus the built-in preset catalog:
//! - Multi-band graphic equalizer using BiQuad filters
//! - Bass boost (low shelf driven by a per-mille strength)
//! - Stereo virtualizer (mid/side widening)
//! - Loudness enhancer (make-up gain with a soft limiter)
//!
//! # Architecture
//!
//! Processors are plain owned structs. Parameter updates happen between
//! buffers; `process*` methods never allocate.

mod bass_boost;
mod eq;
mod error;
mod loudness;
mod presets;
mod processor;
mod units;
mod virtualizer;

pub use bass_boost::{BassBoost, BASS_BOOST_FREQUENCY, MAX_BASS_BOOST_DB};
pub use eq::{Band, BandType, EqConfig, Equalizer, DEFAULT_BAND_CENTERS, MAX_BAND_GAIN_DB};
pub use error::DspError;
pub use loudness::{LoudnessEnhancer, LIMITER_THRESHOLD_DB, MAX_TARGET_GAIN_MB};
pub use presets::{Preset, ANIME, FLAT, MOVIE, PRESETS};
pub use processor::AudioProcessor;
pub use units::{db_to_amplitude, millibel_to_db, strength_fraction, MAX_STRENGTH};
pub use virtualizer::Virtualizer;
