//! Audio Processor Trait
//!
//! Common interface over the effect processors so a session's effect chain
//! can run them in sequence without caring which unit it is talking to.

use crate::bass_boost::BassBoost;
use crate::eq::Equalizer;
use crate::loudness::LoudnessEnhancer;
use crate::virtualizer::Virtualizer;

/// Trait for audio processors in an effect chain
///
/// # Real-time Safety Contract
///
/// Implementors MUST NOT allocate, lock, or make syscalls in `process()`.
/// Time is O(n) in the buffer length. The contract covers the processor
/// only: whatever guards a processor (e.g. a backend's session registry) is
/// the caller's concern.
pub trait AudioProcessor: Send {
    /// Process an interleaved stereo buffer in-place: [L0, R0, L1, R1, ...]
    fn process(&mut self, buffer: &mut [f32]);

    /// Reset internal state (delay lines)
    fn reset(&mut self) {}

    /// Human-readable name for logs
    fn name(&self) -> &'static str;

    fn is_enabled(&self) -> bool;
}

impl AudioProcessor for Equalizer {
    fn process(&mut self, buffer: &mut [f32]) {
        self.process_interleaved(buffer);
    }

    fn reset(&mut self) {
        Equalizer::reset(self);
    }

    fn name(&self) -> &'static str {
        "Equalizer"
    }

    fn is_enabled(&self) -> bool {
        Equalizer::is_enabled(self)
    }
}

impl AudioProcessor for BassBoost {
    fn process(&mut self, buffer: &mut [f32]) {
        for frame in buffer.chunks_exact_mut(2) {
            let (l, r) = self.process_sample(frame[0], frame[1]);
            frame[0] = l;
            frame[1] = r;
        }
    }

    fn reset(&mut self) {
        BassBoost::reset(self);
    }

    fn name(&self) -> &'static str {
        "Bass Boost"
    }

    fn is_enabled(&self) -> bool {
        BassBoost::is_enabled(self)
    }
}

impl AudioProcessor for Virtualizer {
    fn process(&mut self, buffer: &mut [f32]) {
        for frame in buffer.chunks_exact_mut(2) {
            let (l, r) = self.process_sample(frame[0], frame[1]);
            frame[0] = l;
            frame[1] = r;
        }
    }

    fn name(&self) -> &'static str {
        "Virtualizer"
    }

    fn is_enabled(&self) -> bool {
        Virtualizer::is_enabled(self)
    }
}

impl AudioProcessor for LoudnessEnhancer {
    fn process(&mut self, buffer: &mut [f32]) {
        self.process_interleaved(buffer);
    }

    fn name(&self) -> &'static str {
        "Loudness Enhancer"
    }

    fn is_enabled(&self) -> bool {
        LoudnessEnhancer::is_enabled(self)
    }
}
