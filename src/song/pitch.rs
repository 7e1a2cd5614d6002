//! Pitches and their precomputed waveforms.
//!
//! The playable catalog spans two octaves starting at A4. Frequencies are
//! derived from each pitch's position in [`NOTE_ORDER`], so that table is
//! the single source of truth for tuning: moving an entry retunes it.

use crate::config::{ToneConfig, MAX_VOLUME};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Reference frequency of A4 in Hz.
pub const FREQUENCY_A_HZ: f64 = 440.0;

/// A single note name from the fixed catalog, or a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pitch {
    Rest,
    A4,
    A4S,
    B4,
    C4,
    C4S,
    D4,
    D4S,
    E4,
    F4,
    F4S,
    G4,
    G4S,
    A5,
    A5S,
    B5,
    C5,
    C5S,
    D5,
    D5S,
    E5,
    F5,
    F5S,
    G5,
    G5S,
}

/// Every sounding pitch, in tuning order. Index 0 is the reference A (440 Hz)
/// and each following entry is one half step higher.
pub const NOTE_ORDER: [Pitch; 24] = [
    Pitch::A4,
    Pitch::A4S,
    Pitch::B4,
    Pitch::C4,
    Pitch::C4S,
    Pitch::D4,
    Pitch::D4S,
    Pitch::E4,
    Pitch::F4,
    Pitch::F4S,
    Pitch::G4,
    Pitch::G4S,
    Pitch::A5,
    Pitch::A5S,
    Pitch::B5,
    Pitch::C5,
    Pitch::C5S,
    Pitch::D5,
    Pitch::D5S,
    Pitch::E5,
    Pitch::F5,
    Pitch::F5S,
    Pitch::G5,
    Pitch::G5S,
];

impl Pitch {
    /// Returns true for the rest sentinel.
    pub fn is_rest(self) -> bool {
        self == Pitch::Rest
    }

    /// Half steps above A4, or None for a rest.
    pub fn half_steps(self) -> Option<usize> {
        NOTE_ORDER.iter().position(|&p| p == self)
    }

    /// Frequency in Hz: `440 * 2^(half_steps / 12)`. None for a rest.
    pub fn frequency(self) -> Option<f64> {
        self.half_steps()
            .map(|n| FREQUENCY_A_HZ * 2.0f64.powf(n as f64 / 12.0))
    }

    /// Textual code used in song files (`REST`, `A4`, `A4S`, ...).
    pub fn code(self) -> &'static str {
        match self {
            Pitch::Rest => "REST",
            Pitch::A4 => "A4",
            Pitch::A4S => "A4S",
            Pitch::B4 => "B4",
            Pitch::C4 => "C4",
            Pitch::C4S => "C4S",
            Pitch::D4 => "D4",
            Pitch::D4S => "D4S",
            Pitch::E4 => "E4",
            Pitch::F4 => "F4",
            Pitch::F4S => "F4S",
            Pitch::G4 => "G4",
            Pitch::G4S => "G4S",
            Pitch::A5 => "A5",
            Pitch::A5S => "A5S",
            Pitch::B5 => "B5",
            Pitch::C5 => "C5",
            Pitch::C5S => "C5S",
            Pitch::D5 => "D5",
            Pitch::D5S => "D5S",
            Pitch::E5 => "E5",
            Pitch::F5 => "F5",
            Pitch::F5S => "F5S",
            Pitch::G5 => "G5",
            Pitch::G5S => "G5S",
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Pitch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Pitch::Rest.code() {
            return Ok(Pitch::Rest);
        }
        NOTE_ORDER
            .iter()
            .copied()
            .find(|p| p.code() == s)
            .ok_or_else(|| format!("unknown pitch '{}'", s))
    }
}

/// One measure of 8-bit signed samples for a single pitch.
///
/// Cloning is cheap; the samples are shared and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformBuffer(Arc<[i8]>);

impl WaveformBuffer {
    /// A buffer of `len` zero samples.
    pub fn silence(len: usize) -> Self {
        Self(vec![0i8; len].into())
    }

    /// A sine wave at `frequency` Hz, one measure long.
    pub fn sine(frequency: f64, config: &ToneConfig) -> Self {
        let step = frequency * 2.0 * std::f64::consts::PI / config.sample_rate as f64;
        let samples: Vec<i8> = (0..config.samples_per_measure())
            .map(|i| {
                (MAX_VOLUME * (i as f64 * step).sin())
                    .round()
                    .clamp(-MAX_VOLUME, MAX_VOLUME) as i8
            })
            .collect();
        Self(samples.into())
    }

    /// The raw samples.
    pub fn samples(&self) -> &[i8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Precomputed waveforms for every pitch.
#[derive(Debug, Clone)]
pub struct PitchTable {
    config: ToneConfig,
    /// Indexed like [`NOTE_ORDER`].
    tones: Vec<WaveformBuffer>,
    silence: WaveformBuffer,
}

impl PitchTable {
    /// Generates every waveform up front. Each pitch is independent, so the
    /// work is spread across the rayon pool.
    pub fn new(config: ToneConfig) -> Self {
        let tones: Vec<WaveformBuffer> = NOTE_ORDER
            .par_iter()
            .map(|pitch| {
                // NOTE_ORDER holds no rests, so every entry has a frequency.
                let frequency = pitch.frequency().unwrap_or(0.0);
                WaveformBuffer::sine(frequency, &config)
            })
            .collect();

        tracing::debug!(
            "Precomputed {} waveforms of {} samples at {} Hz",
            tones.len(),
            config.samples_per_measure(),
            config.sample_rate
        );

        Self {
            config,
            tones,
            silence: WaveformBuffer::silence(config.samples_per_measure()),
        }
    }

    /// Returns the waveform for a pitch. A rest maps to all-zero samples.
    pub fn samples(&self, pitch: Pitch) -> &WaveformBuffer {
        match pitch.half_steps() {
            Some(index) => &self.tones[index],
            None => &self.silence,
        }
    }

    pub fn config(&self) -> &ToneConfig {
        &self.config
    }
}

impl Default for PitchTable {
    fn default() -> Self {
        Self::new(ToneConfig::default())
    }
}
