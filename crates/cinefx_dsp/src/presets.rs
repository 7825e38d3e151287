//! Built-in Effect Presets
//!
//! A preset is not tied to any particular band layout: it maps target
//! frequencies to gains and each device band picks the gain of the nearest
//! target.

/// Named effect preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    /// (frequency Hz, gain mB) pairs, ascending by frequency
    pub gains: &'static [(u32, i16)],
    /// 0-1000
    pub bass_strength: i16,
    /// 0-1000
    pub virtualizer_strength: i16,
    /// mB
    pub loudness_gain: i32,
}

impl Preset {
    /// Gain for a band centered at `center_freq_mhz` (milliHertz)
    ///
    /// Picks the target frequency closest to the band center in whole Hz.
    /// Equidistant targets resolve to the lower frequency. A preset with no
    /// targets yields 0.
    pub fn gain_for_center_freq(&self, center_freq_mhz: i32) -> i16 {
        let center_hz = i64::from(center_freq_mhz / 1000);
        self.gains
            .iter()
            .min_by_key(|(hz, _)| ((i64::from(*hz) - center_hz).abs(), *hz))
            .map_or(0, |&(_, gain)| gain)
    }

    /// Look a built-in preset up by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

pub const MOVIE: Preset = Preset {
    name: "Movie",
    gains: &[
        (31, 400),
        (62, 400),
        (125, 200),
        (250, 200),
        (500, 0),
        (1000, 0),
        (2000, 200),
        (4000, 300),
        (8000, 300),
        (16000, 200),
    ],
    bass_strength: 400,
    virtualizer_strength: 600,
    loudness_gain: 200,
};

pub const ANIME: Preset = Preset {
    name: "Anime",
    gains: &[
        (31, 200),
        (62, 200),
        (125, 0),
        (250, 400),
        (500, 400),
        (1000, 400),
        (2000, 200),
        (4000, 300),
        (8000, 300),
        (16000, 200),
    ],
    bass_strength: 200,
    virtualizer_strength: 300,
    loudness_gain: 100,
};

pub const FLAT: Preset = Preset {
    name: "Flat",
    gains: &[
        (31, 0),
        (62, 0),
        (125, 0),
        (250, 0),
        (500, 0),
        (1000, 0),
        (2000, 0),
        (4000, 0),
        (8000, 0),
        (16000, 0),
    ],
    bass_strength: 0,
    virtualizer_strength: 0,
    loudness_gain: 0,
};

/// List of built-in presets, in the order the effects panel shows them
pub const PRESETS: &[Preset] = &[MOVIE, ANIME, FLAT];
