//! Playback Collaborator Interface
//!
//! The media player tells the effects layer when its output stream changes.
//! Supplying a non-zero session id is the player's job; the coordinator only
//! ignores `0`.

use cinefx_platform::SessionId;

use crate::coordinator::AudioEffectCoordinator;

/// Callbacks from the media player
pub trait PlaybackListener {
    /// The player's output stream now runs on `session`
    fn on_audio_session_changed(&mut self, session: SessionId);

    /// Playback stopped or the player was torn down
    fn on_playback_released(&mut self);
}

impl PlaybackListener for AudioEffectCoordinator {
    fn on_audio_session_changed(&mut self, session: SessionId) {
        self.bind(session);
    }

    fn on_playback_released(&mut self) {
        self.release();
    }
}
