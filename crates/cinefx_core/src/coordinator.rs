//! Audio Effect Coordinator - Main Entry Point
//!
//! The coordinator owns the effect units bound to the active playback
//! session and keeps the observable snapshot in step with them.
//!
//! ```text
//!   playback ──on_audio_session_changed──▶ bind(S)
//!                                           │ drop old units, create new
//!                                           ▼
//!   UI ──set_* / apply_preset / execute──▶ state ──write──▶ effect units
//!                                           │
//!                                           └──publish──▶ SnapshotWatcher(s)
//! ```
//!
//! Every mutation takes `&mut self`, so all writes come from one owner.
//! Hardware failures are logged and absorbed; the snapshot always records
//! what the user asked for, whether or not a unit could honor it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use cinefx_dsp::Preset;
use cinefx_platform::{
    EffectBackend, EffectKind, EqualizerUnit, LoudnessUnit, PlatformError, SessionId,
    StrengthUnit,
};

use crate::config::EffectConfig;
use crate::error::{EffectError, EffectResult};
use crate::message::EffectCommand;
use crate::observable::{SnapshotPublisher, SnapshotReceiver, SnapshotWatcher};
use crate::snapshot::{EqBand, EffectSnapshot};

/// Log and swallow a failed hardware call
fn log_hw(kind: EffectKind, action: &str, result: Result<(), PlatformError>) {
    if let Err(e) = result {
        warn!("{} {} failed: {}", kind, action, e);
    }
}

/// The two effects driven by a 0-1000 strength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrengthKind {
    BassBoost,
    Virtualizer,
}

impl StrengthKind {
    fn effect(self) -> EffectKind {
        match self {
            StrengthKind::BassBoost => EffectKind::BassBoost,
            StrengthKind::Virtualizer => EffectKind::Virtualizer,
        }
    }
}

/// Units held for the bound session; `None` when not acquired
#[derive(Default)]
struct EffectUnits {
    equalizer: Option<Box<dyn EqualizerUnit>>,
    bass_boost: Option<Box<dyn StrengthUnit>>,
    virtualizer: Option<Box<dyn StrengthUnit>>,
    loudness: Option<Box<dyn LoudnessUnit>>,
}

impl EffectUnits {
    fn strength_unit(&mut self, kind: StrengthKind) -> Option<&mut Box<dyn StrengthUnit>> {
        match kind {
            StrengthKind::BassBoost => self.bass_boost.as_mut(),
            StrengthKind::Virtualizer => self.virtualizer.as_mut(),
        }
    }

    fn is_bound(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Equalizer => self.equalizer.is_some(),
            EffectKind::BassBoost => self.bass_boost.is_some(),
            EffectKind::Virtualizer => self.virtualizer.is_some(),
            EffectKind::LoudnessEnhancer => self.loudness.is_some(),
        }
    }
}

/// Single point of truth for the post-processing effect configuration
pub struct AudioEffectCoordinator {
    backend: Box<dyn EffectBackend>,
    session: Option<SessionId>,
    units: EffectUnits,
    /// Working copy of the published snapshot
    state: EffectSnapshot,
    publisher: SnapshotPublisher,
}

impl AudioEffectCoordinator {
    /// Create an unbound coordinator with default configuration
    pub fn new(backend: Box<dyn EffectBackend>) -> Self {
        let config = EffectConfig::default();
        Self::build(backend, &config)
    }

    pub fn with_config(
        backend: Box<dyn EffectBackend>,
        config: EffectConfig,
    ) -> EffectResult<Self> {
        config.validate()?;
        Ok(Self::build(backend, &config))
    }

    fn build(backend: Box<dyn EffectBackend>, config: &EffectConfig) -> Self {
        let state = EffectSnapshot::from(&config.defaults);
        let publisher = SnapshotPublisher::new(state.clone(), config.subscriber_capacity);
        info!("Effect coordinator created on {} backend", backend.name());

        Self {
            backend,
            session: None,
            units: EffectUnits::default(),
            state,
            publisher,
        }
    }

    // ---- Session binding ----

    /// Bind the effect units to a playback session
    ///
    /// `0` and the currently bound session are no-ops. Otherwise the old
    /// units are released before any new one is created.
    pub fn bind(&mut self, session: SessionId) {
        if session.is_none() || self.session == Some(session) {
            return;
        }

        self.release();
        self.session = Some(session);
        info!("Binding effects to audio session {}", session);

        self.bind_equalizer(session);
        self.units.bass_boost = self.acquire_strength(StrengthKind::BassBoost, session);
        self.units.virtualizer = self.acquire_strength(StrengthKind::Virtualizer, session);
        self.bind_loudness(session);

        self.publish();
    }

    fn bind_equalizer(&mut self, session: SessionId) {
        self.state.eq_bands.clear();

        let mut eq = match self.backend.create_equalizer(session) {
            Ok(eq) => eq,
            Err(e) => {
                warn!("Equalizer unavailable on session {}: {}", session, e);
                return;
            }
        };

        log_hw(
            EffectKind::Equalizer,
            "enable",
            eq.set_enabled(self.state.eq_enabled),
        );

        match eq.bands() {
            Ok(bands) => {
                debug!("Equalizer reports {} bands", bands.len());
                self.state.eq_bands = bands.into_iter().map(EqBand::from).collect();
                self.units.equalizer = Some(eq);
            }
            Err(e) => warn!("Equalizer band query failed, dropping unit: {}", e),
        }
    }

    fn acquire_strength(
        &self,
        strength_kind: StrengthKind,
        session: SessionId,
    ) -> Option<Box<dyn StrengthUnit>> {
        let created = match strength_kind {
            StrengthKind::BassBoost => self.backend.create_bass_boost(session),
            StrengthKind::Virtualizer => self.backend.create_virtualizer(session),
        };
        let kind = strength_kind.effect();
        let mut unit = match created {
            Ok(unit) => unit,
            Err(e) => {
                warn!("{} unavailable on session {}: {}", kind, session, e);
                return None;
            }
        };

        let (enabled, strength) = self.strength_intent(strength_kind);
        let supported = unit.strength_supported();
        if supported {
            log_hw(kind, "set strength", unit.set_strength(strength));
        } else {
            debug!("{} strength not adjustable on session {}", kind, session);
        }
        log_hw(kind, "enable", unit.set_enabled(enabled && supported));

        Some(unit)
    }

    fn bind_loudness(&mut self, session: SessionId) {
        match self.backend.create_loudness_enhancer(session) {
            Ok(mut unit) => {
                let kind = EffectKind::LoudnessEnhancer;
                log_hw(kind, "enable", unit.set_enabled(self.state.loudness_enabled));
                log_hw(
                    kind,
                    "set target gain",
                    unit.set_target_gain(self.state.loudness_gain_mb),
                );
                self.units.loudness = Some(unit);
            }
            Err(e) => warn!("Loudness enhancer unavailable on session {}: {}", session, e),
        }
    }

    /// Drop every held unit and forget the bound session
    ///
    /// Safe to call when unbound. Snapshot values are kept so the next bind
    /// restores them.
    pub fn release(&mut self) {
        self.units = EffectUnits::default();
        if let Some(session) = self.session.take() {
            info!("Released effects from audio session {}", session);
        }
    }

    // ---- Parameter setters ----

    pub fn set_eq_enabled(&mut self, enabled: bool) {
        self.write_eq_enabled(enabled);
        self.publish();
    }

    pub fn set_bass_enabled(&mut self, enabled: bool) {
        self.write_strength_enabled(StrengthKind::BassBoost, enabled);
        self.publish();
    }

    pub fn set_virtualizer_enabled(&mut self, enabled: bool) {
        self.write_strength_enabled(StrengthKind::Virtualizer, enabled);
        self.publish();
    }

    pub fn set_loudness_enabled(&mut self, enabled: bool) {
        self.write_loudness_enabled(enabled);
        self.publish();
    }

    /// Set one band's level in millibels
    ///
    /// The level is forwarded as given; keeping it within the band's range is
    /// up to the caller.
    pub fn set_eq_band_level(&mut self, band: u16, level: i16) {
        self.write_band_level(band, level);
        self.publish();
    }

    pub fn set_bass_strength(&mut self, strength: i16) {
        self.write_strength(StrengthKind::BassBoost, strength);
        self.publish();
    }

    pub fn set_virtualizer_strength(&mut self, strength: i16) {
        self.write_strength(StrengthKind::Virtualizer, strength);
        self.publish();
    }

    pub fn set_loudness_gain(&mut self, gain_mb: i32) {
        self.write_loudness_gain(gain_mb);
        self.publish();
    }

    /// Apply a preset to every current band and effect
    ///
    /// All changes land in a single published snapshot. The equalizer's
    /// enabled flag is left alone; the other three are enabled exactly when
    /// the preset gives them a positive value.
    pub fn apply_preset(&mut self, preset: &Preset) {
        info!("Applying preset {}", preset.name);

        let targets: Vec<(u16, i16)> = self
            .state
            .eq_bands
            .iter()
            .map(|b| (b.index, preset.gain_for_center_freq(b.center_freq_mhz)))
            .collect();
        for (band, level) in targets {
            self.write_band_level(band, level);
        }

        self.write_strength(StrengthKind::BassBoost, preset.bass_strength);
        self.write_strength(StrengthKind::Virtualizer, preset.virtualizer_strength);
        self.write_loudness_gain(preset.loudness_gain);

        self.write_strength_enabled(StrengthKind::BassBoost, preset.bass_strength > 0);
        self.write_strength_enabled(StrengthKind::Virtualizer, preset.virtualizer_strength > 0);
        self.write_loudness_enabled(preset.loudness_gain > 0);

        self.publish();
    }

    /// Run a command from the effects panel
    pub fn execute(&mut self, command: EffectCommand) -> EffectResult<()> {
        match command {
            EffectCommand::SetEqEnabled(enabled) => self.set_eq_enabled(enabled),
            EffectCommand::SetBassEnabled(enabled) => self.set_bass_enabled(enabled),
            EffectCommand::SetVirtualizerEnabled(enabled) => self.set_virtualizer_enabled(enabled),
            EffectCommand::SetLoudnessEnabled(enabled) => self.set_loudness_enabled(enabled),
            EffectCommand::SetEqBandLevel { band, level } => self.set_eq_band_level(band, level),
            EffectCommand::SetBassStrength(strength) => self.set_bass_strength(strength),
            EffectCommand::SetVirtualizerStrength(strength) => {
                self.set_virtualizer_strength(strength)
            }
            EffectCommand::SetLoudnessGain(gain_mb) => self.set_loudness_gain(gain_mb),
            EffectCommand::ApplyPreset { name } => {
                let preset = Preset::by_name(&name).ok_or(EffectError::UnknownPreset(name))?;
                self.apply_preset(preset);
            }
        }
        Ok(())
    }

    // ---- Observation ----

    pub fn snapshot(&self) -> Arc<EffectSnapshot> {
        self.publisher.current()
    }

    /// Stream of snapshots, starting with the current one
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.publisher.subscribe()
    }

    pub fn watcher(&self) -> SnapshotWatcher {
        self.publisher.watcher()
    }

    pub fn bound_session(&self) -> Option<SessionId> {
        self.session
    }

    /// Whether a unit of this kind is held for the bound session
    pub fn is_unit_bound(&self, kind: EffectKind) -> bool {
        self.units.is_bound(kind)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    // ---- Internal (no publish) ----

    fn publish(&self) {
        self.publisher.publish(self.state.clone());
    }

    fn strength_intent(&self, kind: StrengthKind) -> (bool, i16) {
        match kind {
            StrengthKind::BassBoost => (self.state.bass_enabled, self.state.bass_strength),
            StrengthKind::Virtualizer => {
                (self.state.virtualizer_enabled, self.state.virtualizer_strength)
            }
        }
    }

    fn write_eq_enabled(&mut self, enabled: bool) {
        if let Some(eq) = self.units.equalizer.as_mut() {
            log_hw(EffectKind::Equalizer, "enable", eq.set_enabled(enabled));
        }
        self.state.eq_enabled = enabled;
    }

    fn write_strength_enabled(&mut self, kind: StrengthKind, enabled: bool) {
        if let Some(unit) = self.units.strength_unit(kind) {
            let supported = unit.strength_supported();
            log_hw(kind.effect(), "enable", unit.set_enabled(enabled && supported));
        }
        match kind {
            StrengthKind::BassBoost => self.state.bass_enabled = enabled,
            StrengthKind::Virtualizer => self.state.virtualizer_enabled = enabled,
        }
    }

    fn write_loudness_enabled(&mut self, enabled: bool) {
        if let Some(unit) = self.units.loudness.as_mut() {
            log_hw(
                EffectKind::LoudnessEnhancer,
                "enable",
                unit.set_enabled(enabled),
            );
        }
        self.state.loudness_enabled = enabled;
    }

    fn write_band_level(&mut self, band: u16, level: i16) {
        if let Some(eq) = self.units.equalizer.as_mut() {
            log_hw(
                EffectKind::Equalizer,
                "set band level",
                eq.set_band_level(band, level),
            );
        }
        match self.state.eq_bands.iter_mut().find(|b| b.index == band) {
            Some(entry) => entry.level = level,
            None => debug!("Band {} not in current layout", band),
        }
    }

    fn write_strength(&mut self, kind: StrengthKind, strength: i16) {
        if let Some(unit) = self.units.strength_unit(kind) {
            if unit.strength_supported() {
                log_hw(kind.effect(), "set strength", unit.set_strength(strength));
            } else {
                debug!(
                    "{} strength not adjustable, keeping {} as intent",
                    kind.effect(),
                    strength
                );
            }
        }
        match kind {
            StrengthKind::BassBoost => self.state.bass_strength = strength,
            StrengthKind::Virtualizer => self.state.virtualizer_strength = strength,
        }
    }

    fn write_loudness_gain(&mut self, gain_mb: i32) {
        if let Some(unit) = self.units.loudness.as_mut() {
            log_hw(
                EffectKind::LoudnessEnhancer,
                "set target gain",
                unit.set_target_gain(gain_mb),
            );
        }
        self.state.loudness_gain_mb = gain_mb;
    }
}

impl Drop for AudioEffectCoordinator {
    fn drop(&mut self) {
        self.release();
    }
}
