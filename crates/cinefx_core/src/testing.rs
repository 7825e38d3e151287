//! Recording effect backend for coordinator tests

use std::sync::Arc;

use parking_lot::Mutex;

use cinefx_platform::{
    EffectBackend, EffectKind, EffectUnit, EqualizerUnit, LoudnessUnit, PlatformError, SessionId,
    StrengthUnit,
};

/// Hardware-side call observed by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwEvent {
    Created(EffectKind, SessionId),
    Released(EffectKind, SessionId),
    Enabled(EffectKind, bool),
    BandLevel(u16, i16),
    Strength(EffectKind, i16),
    TargetGain(i32),
}

#[derive(Clone)]
pub struct MockBackend {
    events: Arc<Mutex<Vec<HwEvent>>>,
    failing: Vec<EffectKind>,
    strength_supported: bool,
    /// (center Hz, current level mB)
    bands: Vec<(i32, i16)>,
    level_range: (i16, i16),
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            failing: Vec::new(),
            strength_supported: true,
            bands: [60, 230, 910, 3600, 14000].iter().map(|&hz| (hz, 0)).collect(),
            level_range: (-1500, 1500),
        }
    }

    pub fn with_failing(mut self, kind: EffectKind) -> Self {
        self.failing.push(kind);
        self
    }

    pub fn without_strength(mut self) -> Self {
        self.strength_supported = false;
        self
    }

    pub fn with_bands(mut self, bands: &[(i32, i16)]) -> Self {
        self.bands = bands.to_vec();
        self
    }

    pub fn events(&self) -> Vec<HwEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn unit(&self, kind: EffectKind, session: SessionId) -> Result<MockUnit, PlatformError> {
        if self.failing.contains(&kind) {
            return Err(PlatformError::EffectUnavailable(kind));
        }
        self.events.lock().push(HwEvent::Created(kind, session));
        Ok(MockUnit {
            kind,
            session,
            events: Arc::clone(&self.events),
            enabled: false,
            strength_supported: self.strength_supported,
            bands: self.bands.clone(),
            level_range: self.level_range,
            strength: 0,
            gain: 0,
        })
    }
}

impl EffectBackend for MockBackend {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn create_equalizer(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn EqualizerUnit>, PlatformError> {
        Ok(Box::new(self.unit(EffectKind::Equalizer, session)?))
    }

    fn create_bass_boost(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn StrengthUnit>, PlatformError> {
        Ok(Box::new(self.unit(EffectKind::BassBoost, session)?))
    }

    fn create_virtualizer(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn StrengthUnit>, PlatformError> {
        Ok(Box::new(self.unit(EffectKind::Virtualizer, session)?))
    }

    fn create_loudness_enhancer(
        &self,
        session: SessionId,
    ) -> Result<Box<dyn LoudnessUnit>, PlatformError> {
        Ok(Box::new(self.unit(EffectKind::LoudnessEnhancer, session)?))
    }
}

struct MockUnit {
    kind: EffectKind,
    session: SessionId,
    events: Arc<Mutex<Vec<HwEvent>>>,
    enabled: bool,
    strength_supported: bool,
    bands: Vec<(i32, i16)>,
    level_range: (i16, i16),
    strength: i16,
    gain: i32,
}

impl MockUnit {
    fn record(&self, event: HwEvent) {
        self.events.lock().push(event);
    }

    fn check_band(&self, band: u16) -> Result<usize, PlatformError> {
        let index = usize::from(band);
        if index < self.bands.len() {
            Ok(index)
        } else {
            Err(PlatformError::InvalidBand {
                band,
                count: self.band_count(),
            })
        }
    }
}

impl Drop for MockUnit {
    fn drop(&mut self) {
        self.record(HwEvent::Released(self.kind, self.session));
    }
}

impl EffectUnit for MockUnit {
    fn kind(&self) -> EffectKind {
        self.kind
    }

    fn session(&self) -> SessionId {
        self.session
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError> {
        self.enabled = enabled;
        self.record(HwEvent::Enabled(self.kind, enabled));
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl EqualizerUnit for MockUnit {
    fn band_count(&self) -> u16 {
        self.bands.len() as u16
    }

    fn band_level_range(&self) -> (i16, i16) {
        self.level_range
    }

    fn center_freq(&self, band: u16) -> Result<i32, PlatformError> {
        let index = self.check_band(band)?;
        Ok(self.bands[index].0 * 1000)
    }

    fn band_level(&self, band: u16) -> Result<i16, PlatformError> {
        let index = self.check_band(band)?;
        Ok(self.bands[index].1)
    }

    fn set_band_level(&mut self, band: u16, level: i16) -> Result<(), PlatformError> {
        let index = self.check_band(band)?;
        self.bands[index].1 = level;
        self.record(HwEvent::BandLevel(band, level));
        Ok(())
    }
}

impl StrengthUnit for MockUnit {
    fn strength_supported(&self) -> bool {
        self.strength_supported
    }

    fn set_strength(&mut self, strength: i16) -> Result<(), PlatformError> {
        if !self.strength_supported {
            return Err(PlatformError::UnsupportedParameter("strength".into()));
        }
        self.strength = strength;
        self.record(HwEvent::Strength(self.kind, strength));
        Ok(())
    }

    fn strength(&self) -> Result<i16, PlatformError> {
        Ok(self.strength)
    }
}

impl LoudnessUnit for MockUnit {
    fn set_target_gain(&mut self, gain_mb: i32) -> Result<(), PlatformError> {
        self.gain = gain_mb;
        self.record(HwEvent::TargetGain(gain_mb));
        Ok(())
    }

    fn target_gain(&self) -> Result<i32, PlatformError> {
        Ok(self.gain)
    }
}
