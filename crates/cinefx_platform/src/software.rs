//! Software Effect Backend
//!
//! In-process implementation of the effect unit traits. Every session owns an
//! effect chain of `cinefx_dsp` processors; units are handles into that chain
//! and the renderer pushes audio through it with [`SoftwareBackend::process`].
//!
//! ```text
//!   coordinator ──set_*──▶ Software*Unit ──lock──▶ Registry[session].chain
//!   renderer    ──process(session, buf)──────────▶ EQ → Bass → Virt → Loud
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use cinefx_dsp::{
    millibel_to_db, AudioProcessor, BassBoost, Equalizer, LoudnessEnhancer, Virtualizer,
    DEFAULT_BAND_CENTERS,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PlatformError;
use crate::traits::{
    EffectBackend, EffectKind, EffectUnit, EqualizerUnit, LoudnessUnit, SessionId, StrengthUnit,
};

/// Configuration of the simulated device
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareBackendConfig {
    /// Rate the renderer feeds `process` at
    pub sample_rate: f32,

    /// Equalizer band centers in Hz
    pub band_centers_hz: Vec<f32>,

    /// (min, max) band level in millibels
    pub band_level_range: (i16, i16),

    /// Sessions that may hold units at the same time
    pub max_sessions: usize,

    pub bass_strength_supported: bool,

    pub virtualizer_strength_supported: bool,

    /// Effect kinds this device refuses to create
    pub unavailable: Vec<EffectKind>,
}

impl Default for SoftwareBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            band_centers_hz: DEFAULT_BAND_CENTERS.to_vec(),
            band_level_range: (-1500, 1500),
            max_sessions: 8,
            bass_strength_supported: true,
            virtualizer_strength_supported: true,
            unavailable: Vec::new(),
        }
    }
}

impl SoftwareBackendConfig {
    pub fn validate(&self) -> Result<(), PlatformError> {
        let invalid = |msg: String| Err(PlatformError::InvalidConfiguration(msg));

        if self.sample_rate <= 0.0 {
            return invalid(format!("sample rate must be positive, got {}", self.sample_rate));
        }
        if self.band_centers_hz.is_empty() || self.band_centers_hz.len() > usize::from(u16::MAX) {
            return invalid(format!(
                "band count must be 1-{}, got {}",
                u16::MAX,
                self.band_centers_hz.len()
            ));
        }
        let nyquist = self.sample_rate / 2.0;
        if let Some(bad) = self
            .band_centers_hz
            .iter()
            .find(|&&hz| hz <= 0.0 || hz >= nyquist)
        {
            return invalid(format!("band center {}Hz outside (0, {}Hz)", bad, nyquist));
        }
        let (min, max) = self.band_level_range;
        if min > max {
            return invalid(format!("band level range [{}, {}] is empty", min, max));
        }
        if self.max_sessions == 0 {
            return invalid("max_sessions must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Processors attached to one session
#[derive(Default)]
struct SessionChain {
    equalizer: Option<Equalizer>,
    bass_boost: Option<BassBoost>,
    virtualizer: Option<Virtualizer>,
    loudness: Option<LoudnessEnhancer>,
}

impl SessionChain {
    fn has(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Equalizer => self.equalizer.is_some(),
            EffectKind::BassBoost => self.bass_boost.is_some(),
            EffectKind::Virtualizer => self.virtualizer.is_some(),
            EffectKind::LoudnessEnhancer => self.loudness.is_some(),
        }
    }

    fn detach(&mut self, kind: EffectKind) {
        match kind {
            EffectKind::Equalizer => self.equalizer = None,
            EffectKind::BassBoost => self.bass_boost = None,
            EffectKind::Virtualizer => self.virtualizer = None,
            EffectKind::LoudnessEnhancer => self.loudness = None,
        }
    }

    fn is_empty(&self) -> bool {
        EffectKind::ALL.iter().all(|&kind| !self.has(kind))
    }

    fn kinds(&self) -> Vec<EffectKind> {
        EffectKind::ALL
            .into_iter()
            .filter(|&kind| self.has(kind))
            .collect()
    }

    fn process(&mut self, buffer: &mut [f32]) {
        let stages: [Option<&mut dyn AudioProcessor>; 4] = [
            self.equalizer.as_mut().map(|p| p as &mut dyn AudioProcessor),
            self.bass_boost.as_mut().map(|p| p as &mut dyn AudioProcessor),
            self.virtualizer.as_mut().map(|p| p as &mut dyn AudioProcessor),
            self.loudness.as_mut().map(|p| p as &mut dyn AudioProcessor),
        ];
        for stage in stages.into_iter().flatten() {
            if stage.is_enabled() {
                stage.process(buffer);
            }
        }
    }
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<SessionId, SessionChain>,
}

/// In-process effect backend
///
/// Cheap to clone; clones share the same session registry, so the playback
/// renderer can keep one for `process` while the coordinator owns another.
#[derive(Clone)]
pub struct SoftwareBackend {
    registry: Arc<Mutex<Registry>>,
    config: Arc<SoftwareBackendConfig>,
}

impl SoftwareBackend {
    /// Create a backend with the default five-band layout
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            config: Arc::new(SoftwareBackendConfig::default()),
        }
    }

    pub fn with_config(config: SoftwareBackendConfig) -> Result<Self, PlatformError> {
        config.validate()?;
        Ok(Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SoftwareBackendConfig {
        &self.config
    }

    /// Run an interleaved stereo buffer through the session's enabled units
    ///
    /// Returns false (buffer untouched) when nothing is attached to the session.
    /// The registry lock, shared with every unit setter, is held for the
    /// whole buffer.
    pub fn process(&self, session: SessionId, buffer: &mut [f32]) -> bool {
        let mut registry = self.registry.lock();
        match registry.sessions.get_mut(&session) {
            Some(chain) => {
                chain.process(buffer);
                true
            }
            None => false,
        }
    }

    /// Sessions that currently hold at least one unit, ascending
    pub fn active_sessions(&self) -> Vec<SessionId> {
        let mut sessions: Vec<_> = self.registry.lock().sessions.keys().copied().collect();
        sessions.sort();
        sessions
    }

    /// Kinds attached to a session, in processing order
    pub fn active_units(&self, session: SessionId) -> Vec<EffectKind> {
        self.registry
            .lock()
            .sessions
            .get(&session)
            .map(SessionChain::kinds)
            .unwrap_or_default()
    }

    fn check_available(&self, session: SessionId, kind: EffectKind) -> Result<(), PlatformError> {
        if session.get() <= 0 {
            return Err(PlatformError::InvalidSession(session));
        }
        if self.config.unavailable.contains(&kind) {
            return Err(PlatformError::EffectUnavailable(kind));
        }
        Ok(())
    }

    /// Place a freshly built processor into the session's chain
    fn attach(
        &self,
        session: SessionId,
        kind: EffectKind,
        place: impl FnOnce(&mut SessionChain),
    ) -> Result<UnitHandle, PlatformError> {
        let mut registry = self.registry.lock();

        if !registry.sessions.contains_key(&session)
            && registry.sessions.len() >= self.config.max_sessions
        {
            return Err(PlatformError::SessionLimitReached(self.config.max_sessions));
        }

        let chain = registry.sessions.entry(session).or_default();
        if chain.has(kind) {
            return Err(PlatformError::UnitBusy { kind, session });
        }
        place(chain);

        debug!("Attached software {} to session {}", kind, session);
        Ok(UnitHandle {
            registry: Arc::clone(&self.registry),
            session,
            kind,
        })
    }
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectBackend for SoftwareBackend {
    fn name(&self) -> &'static str {
        "Software"
    }

    fn create_equalizer(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn EqualizerUnit>, PlatformError> {
        self.check_available(session, EffectKind::Equalizer)?;

        let mut eq = Equalizer::new(self.config.sample_rate, &self.config.band_centers_hz)?;
        eq.set_enabled(false);
        let handle = self.attach(session, EffectKind::Equalizer, |chain| {
            chain.equalizer = Some(eq)
        })?;

        let centers_mhz = self
            .config
            .band_centers_hz
            .iter()
            .map(|hz| (hz * 1000.0).round() as i32)
            .collect::<Vec<_>>();
        let levels = vec![0; centers_mhz.len()];
        info!(
            "Software equalizer on session {}: {} bands",
            session,
            centers_mhz.len()
        );

        Ok(Box::new(SoftwareEqualizer {
            handle,
            centers_mhz,
            levels,
            level_range: self.config.band_level_range,
        }))
    }

    fn create_bass_boost(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn StrengthUnit>, PlatformError> {
        self.check_available(session, EffectKind::BassBoost)?;

        let boost = BassBoost::new(self.config.sample_rate)?;
        let handle = self.attach(session, EffectKind::BassBoost, |chain| {
            chain.bass_boost = Some(boost)
        })?;

        Ok(Box::new(SoftwareStrengthUnit {
            handle,
            strength_supported: self.config.bass_strength_supported,
        }))
    }

    fn create_virtualizer(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn StrengthUnit>, PlatformError> {
        self.check_available(session, EffectKind::Virtualizer)?;

        let handle = self.attach(session, EffectKind::Virtualizer, |chain| {
            chain.virtualizer = Some(Virtualizer::new())
        })?;

        Ok(Box::new(SoftwareStrengthUnit {
            handle,
            strength_supported: self.config.virtualizer_strength_supported,
        }))
    }

    fn create_loudness_enhancer(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn LoudnessUnit>, PlatformError> {
        self.check_available(session, EffectKind::LoudnessEnhancer)?;

        let handle = self.attach(session, EffectKind::LoudnessEnhancer, |chain| {
            chain.loudness = Some(LoudnessEnhancer::new())
        })?;

        Ok(Box::new(SoftwareLoudnessUnit { handle }))
    }
}

/// Owner of one slot in a session chain; frees the slot on drop
struct UnitHandle {
    registry: Arc<Mutex<Registry>>,
    session: SessionId,
    kind: EffectKind,
}

impl UnitHandle {
    fn with_chain<R>(&self, f: impl FnOnce(&mut SessionChain) -> R) -> Result<R, PlatformError> {
        let mut registry = self.registry.lock();
        registry
            .sessions
            .get_mut(&self.session)
            .map(f)
            .ok_or(PlatformError::InvalidSession(self.session))
    }
}

impl Drop for UnitHandle {
    fn drop(&mut self) {
        let mut registry = self.registry.lock();
        if let Some(chain) = registry.sessions.get_mut(&self.session) {
            chain.detach(self.kind);
            if chain.is_empty() {
                registry.sessions.remove(&self.session);
            }
        }
        debug!("Released software {} from session {}", self.kind, self.session);
    }
}

struct SoftwareEqualizer {
    handle: UnitHandle,
    centers_mhz: Vec<i32>,
    levels: Vec<i16>,
    level_range: (i16, i16),
}

impl SoftwareEqualizer {
    fn check_band(&self, band: u16) -> Result<usize, PlatformError> {
        let index = usize::from(band);
        if index < self.levels.len() {
            Ok(index)
        } else {
            Err(PlatformError::InvalidBand {
                band,
                count: self.band_count(),
            })
        }
    }
}

impl EffectUnit for SoftwareEqualizer {
    fn kind(&self) -> EffectKind {
        EffectKind::Equalizer
    }

    fn session(&self) -> SessionId {
        self.handle.session
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError> {
        self.handle.with_chain(|chain| {
            if let Some(eq) = chain.equalizer.as_mut() {
                eq.set_enabled(enabled);
            }
        })
    }

    fn is_enabled(&self) -> bool {
        self.handle
            .with_chain(|chain| chain.equalizer.as_ref().is_some_and(|eq| eq.is_enabled()))
            .unwrap_or(false)
    }
}

impl EqualizerUnit for SoftwareEqualizer {
    fn band_count(&self) -> u16 {
        self.levels.len() as u16
    }

    fn band_level_range(&self) -> (i16, i16) {
        self.level_range
    }

    fn center_freq(&self, band: u16) -> Result<i32, PlatformError> {
        let index = self.check_band(band)?;
        Ok(self.centers_mhz[index])
    }

    fn band_level(&self, band: u16) -> Result<i16, PlatformError> {
        let index = self.check_band(band)?;
        Ok(self.levels[index])
    }

    /// Levels outside the device range are clamped into it
    fn set_band_level(&mut self, band: u16, level: i16) -> Result<(), PlatformError> {
        let index = self.check_band(band)?;
        let (min, max) = self.level_range;
        let applied = level.clamp(min, max);
        if applied != level {
            debug!("Band {} level {}mB clamped to {}mB", band, level, applied);
        }

        self.handle.with_chain(|chain| match chain.equalizer.as_mut() {
            Some(eq) => eq.set_band_gain(index, millibel_to_db(i32::from(applied))),
            None => Ok(()),
        })??;
        self.levels[index] = applied;
        Ok(())
    }
}

/// Bass boost or virtualizer, depending on the handle's kind
struct SoftwareStrengthUnit {
    handle: UnitHandle,
    strength_supported: bool,
}

impl EffectUnit for SoftwareStrengthUnit {
    fn kind(&self) -> EffectKind {
        self.handle.kind
    }

    fn session(&self) -> SessionId {
        self.handle.session
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError> {
        let kind = self.handle.kind;
        self.handle.with_chain(|chain| match kind {
            EffectKind::BassBoost => {
                if let Some(bass) = chain.bass_boost.as_mut() {
                    bass.set_enabled(enabled);
                }
            }
            EffectKind::Virtualizer => {
                if let Some(virt) = chain.virtualizer.as_mut() {
                    virt.set_enabled(enabled);
                }
            }
            _ => {}
        })
    }

    fn is_enabled(&self) -> bool {
        self.handle
            .with_chain(|chain| match self.handle.kind {
                EffectKind::BassBoost => {
                    chain.bass_boost.as_ref().is_some_and(BassBoost::is_enabled)
                }
                EffectKind::Virtualizer => {
                    chain.virtualizer.as_ref().is_some_and(Virtualizer::is_enabled)
                }
                _ => false,
            })
            .unwrap_or(false)
    }
}

impl StrengthUnit for SoftwareStrengthUnit {
    fn strength_supported(&self) -> bool {
        self.strength_supported
    }

    fn set_strength(&mut self, strength: i16) -> Result<(), PlatformError> {
        if !self.strength_supported {
            return Err(PlatformError::UnsupportedParameter(format!(
                "{} strength",
                self.handle.kind
            )));
        }
        let kind = self.handle.kind;
        self.handle.with_chain(|chain| match kind {
            EffectKind::BassBoost => chain
                .bass_boost
                .as_mut()
                .map_or(Ok(()), |b| b.set_strength(strength)),
            EffectKind::Virtualizer => chain
                .virtualizer
                .as_mut()
                .map_or(Ok(()), |v| v.set_strength(strength)),
            _ => Ok(()),
        })??;
        Ok(())
    }

    fn strength(&self) -> Result<i16, PlatformError> {
        let kind = self.handle.kind;
        self.handle.with_chain(|chain| match kind {
            EffectKind::BassBoost => chain.bass_boost.as_ref().map_or(0, |b| b.strength()),
            EffectKind::Virtualizer => chain.virtualizer.as_ref().map_or(0, |v| v.strength()),
            _ => 0,
        })
    }
}

struct SoftwareLoudnessUnit {
    handle: UnitHandle,
}

impl EffectUnit for SoftwareLoudnessUnit {
    fn kind(&self) -> EffectKind {
        EffectKind::LoudnessEnhancer
    }

    fn session(&self) -> SessionId {
        self.handle.session
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError> {
        self.handle.with_chain(|chain| {
            if let Some(loud) = chain.loudness.as_mut() {
                loud.set_enabled(enabled);
            }
        })
    }

    fn is_enabled(&self) -> bool {
        self.handle
            .with_chain(|chain| chain.loudness.as_ref().is_some_and(|l| l.is_enabled()))
            .unwrap_or(false)
    }
}

impl LoudnessUnit for SoftwareLoudnessUnit {
    fn set_target_gain(&mut self, gain_mb: i32) -> Result<(), PlatformError> {
        self.handle.with_chain(|chain| {
            if let Some(loud) = chain.loudness.as_mut() {
                loud.set_target_gain(gain_mb);
            }
        })
    }

    fn target_gain(&self) -> Result<i32, PlatformError> {
        self.handle
            .with_chain(|chain| chain.loudness.as_ref().map_or(0, |l| l.target_gain()))
    }
}
