//! Song data structures.
//!
//! A song is an ordered list of (pitch, length) entries. This module also
//! owns the pitch catalog with its precomputed waveforms, the note-length
//! table, and the loader that reads songs from disk.

mod duration;
mod loader;
mod pitch;

pub use duration::{DurationTable, NoteLength};
pub use loader::{load_song, parse_song, parse_song_json, ParsedSong, SongError};
pub use pitch::{Pitch, PitchTable, WaveformBuffer, FREQUENCY_A_HZ, NOTE_ORDER};

use std::collections::BTreeSet;

/// One note (or rest) of a song. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongEntry {
    pub pitch: Pitch,
    pub length: NoteLength,
}

impl SongEntry {
    pub fn new(pitch: Pitch, length: NoteLength) -> Self {
        Self { pitch, length }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_rest()
    }
}

/// An ordered sequence of entries. Order defines playback order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Song {
    entries: Vec<SongEntry>,
}

impl Song {
    pub fn new(entries: Vec<SongEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SongEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct sounding pitches, in catalog order.
    pub fn distinct_pitches(&self) -> BTreeSet<Pitch> {
        self.entries
            .iter()
            .filter(|e| !e.is_rest())
            .map(|e| e.pitch)
            .collect()
    }

    /// Total nominal length in milliseconds.
    pub fn total_ms(&self, durations: &DurationTable) -> u64 {
        self.entries
            .iter()
            .map(|e| durations.time_ms(e.length))
            .sum()
    }
}

impl FromIterator<SongEntry> for Song {
    fn from_iter<I: IntoIterator<Item = SongEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
