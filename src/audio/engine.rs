//! Renders a song into an audio sink.
//!
//! Each note is written straight from its pitch's precomputed waveform,
//! starting at the first sample and clipped to one measure, followed by a
//! short run of silence. Rests are written as silence of their full length.

use super::{AudioSink, PlaybackError};
use crate::choir::CancelToken;
use crate::config::{ToneConfig, GAP_SAMPLES};
use crate::song::{DurationTable, Pitch, PitchTable, Song, SongEntry};

/// Totals for one call to [`PlaybackEngine::play`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Entries written, rests included.
    pub entries: usize,
    /// Samples written, gaps included.
    pub samples: usize,
}

/// Streams songs through an [`AudioSink`].
///
/// Holds the precomputed waveforms, so build one engine and reuse it.
#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    pitches: PitchTable,
    durations: DurationTable,
}

impl PlaybackEngine {
    /// Creates an engine, generating every waveform for `config`.
    pub fn new(config: ToneConfig) -> Self {
        Self {
            pitches: PitchTable::new(config),
            durations: DurationTable::new(&config),
        }
    }

    pub fn config(&self) -> &ToneConfig {
        self.pitches.config()
    }

    pub fn pitches(&self) -> &PitchTable {
        &self.pitches
    }

    pub fn durations(&self) -> &DurationTable {
        &self.durations
    }

    /// Number of samples an entry occupies, not counting the trailing gap.
    ///
    /// Notes are clipped to one measure; rests are not.
    pub fn entry_samples(&self, entry: &SongEntry) -> usize {
        let ms = self.durations.time_ms(entry.length);
        let ms = if entry.is_rest() {
            ms
        } else {
            ms.min(self.config().measure_ms())
        };
        self.config().samples_for_ms(ms)
    }

    /// Writes `count` zero samples, one measure at a time.
    fn write_silence(&self, sink: &mut dyn AudioSink, count: usize) -> Result<(), PlaybackError> {
        let silence = self.pitches.samples(Pitch::Rest).samples();
        let mut remaining = count;
        while remaining > 0 {
            let chunk = remaining.min(silence.len());
            sink.write(&silence[..chunk])?;
            remaining -= chunk;
        }
        Ok(())
    }

    fn play_entry(
        &self,
        sink: &mut dyn AudioSink,
        entry: &SongEntry,
    ) -> Result<usize, PlaybackError> {
        let count = self.entry_samples(entry);

        if entry.is_rest() {
            self.write_silence(sink, count)?;
            return Ok(count);
        }

        let wave = self.pitches.samples(entry.pitch).samples();
        let count = count.min(wave.len());
        sink.write(&wave[..count])?;
        self.write_silence(sink, GAP_SAMPLES)?;
        Ok(count + GAP_SAMPLES)
    }

    /// Plays `song` into `sink`, then drains it.
    ///
    /// # Errors
    ///
    /// A failed write stops playback immediately; the rest of the song is not
    /// attempted. Returns [`PlaybackError::Interrupted`] if `cancel` fires
    /// between entries.
    pub fn play(
        &self,
        song: &Song,
        sink: &mut dyn AudioSink,
        cancel: &CancelToken,
    ) -> Result<PlaybackSummary, PlaybackError> {
        let mut summary = PlaybackSummary::default();

        for entry in song.entries() {
            if cancel.is_cancelled() {
                return Err(PlaybackError::Interrupted);
            }
            tracing::debug!("Playing {} for {}", entry.pitch, entry.length);
            summary.samples += self.play_entry(sink, entry)?;
            summary.entries += 1;
        }

        sink.drain()?;
        tracing::info!(
            "Played {} entries ({} samples)",
            summary.entries,
            summary.samples
        );
        Ok(summary)
    }
}
