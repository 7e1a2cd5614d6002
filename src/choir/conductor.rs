//! The conductor walks a song in order and keeps every note on one timeline.
//!
//! Rests suspend the conductor itself. Each note is handed to its pitch's
//! performer and held on that performer's own thread, and the conductor joins
//! that thread before looking at the next entry. Notes therefore never
//! overlap, and an entry never starts before the previous one has finished.

use super::{CancelToken, ChoirError, PerformerRegistry};
use crate::song::{DurationTable, Song, SongEntry};
use std::time::{Duration, Instant};

/// What happened to one entry of the song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// A rest elapsed.
    Rested,
    /// The named performer held the note.
    Performed { performer: String },
    /// The note was reported and skipped.
    Skipped { reason: String },
}

/// Timing of one entry, measured from the start of the performance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub index: usize,
    pub entry: SongEntry,
    pub started: Duration,
    pub finished: Duration,
    pub outcome: StageOutcome,
}

/// Record of a completed run through a song.
#[derive(Debug, Clone, Default)]
pub struct Performance {
    pub stages: Vec<StageReport>,
}

impl Performance {
    /// Number of notes that were actually held.
    pub fn performed(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| matches!(s.outcome, StageOutcome::Performed { .. }))
            .count()
    }

    /// Number of notes that were skipped.
    pub fn skipped(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| matches!(s.outcome, StageOutcome::Skipped { .. }))
            .count()
    }

    /// Time at which the last entry finished.
    pub fn elapsed(&self) -> Duration {
        self.stages.last().map(|s| s.finished).unwrap_or_default()
    }
}

/// Drives a song through a [`PerformerRegistry`].
#[derive(Debug)]
pub struct Conductor {
    registry: PerformerRegistry,
    durations: DurationTable,
}

impl Conductor {
    pub fn new(registry: PerformerRegistry, durations: DurationTable) -> Self {
        Self {
            registry,
            durations,
        }
    }

    /// A conductor whose registry already holds a performer for every pitch
    /// in `song`.
    pub fn for_song(song: &Song, durations: DurationTable) -> Self {
        Self::new(PerformerRegistry::for_song(song), durations)
    }

    pub fn registry(&self) -> &PerformerRegistry {
        &self.registry
    }

    pub fn durations(&self) -> &DurationTable {
        &self.durations
    }

    /// Plays through `song`, one entry at a time.
    ///
    /// Notes whose performer can't be found or has no length are logged and
    /// skipped; the song continues.
    ///
    /// # Errors
    ///
    /// Returns [`ChoirError::Interrupted`] as soon as `cancel` fires, without
    /// processing further entries. Thread start failures and performer panics
    /// also stop the run.
    pub fn conduct(&self, song: &Song, cancel: &CancelToken) -> Result<Performance, ChoirError> {
        let start = Instant::now();
        let mut performance = Performance::default();

        for (index, entry) in song.entries().iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("Stopping before entry {}: interrupted", index);
                return Err(ChoirError::Interrupted);
            }

            let started = start.elapsed();
            let outcome = self.stage(entry, cancel)?;
            performance.stages.push(StageReport {
                index,
                entry: *entry,
                started,
                finished: start.elapsed(),
                outcome,
            });
        }

        Ok(performance)
    }

    fn stage(&self, entry: &SongEntry, cancel: &CancelToken) -> Result<StageOutcome, ChoirError> {
        let ms = self.durations.time_ms(entry.length);

        if entry.is_rest() {
            tracing::info!("Rest for {}ms", ms);
            cancel.sleep(Duration::from_millis(ms))?;
            return Ok(StageOutcome::Rested);
        }

        let performer = match self.registry.resolve(entry.pitch) {
            Ok(performer) => performer,
            Err(e) => {
                tracing::warn!("{}", e);
                return Ok(StageOutcome::Skipped {
                    reason: e.to_string(),
                });
            }
        };

        performer.assign(entry.length);
        tracing::debug!("{} plays {} for {}ms", performer.name(), entry.pitch, ms);

        let handle = performer.dispatch(&self.durations, cancel)?;
        match handle.join() {
            Ok(Ok(())) => Ok(StageOutcome::Performed {
                performer: performer.name().to_string(),
            }),
            Ok(Err(e @ ChoirError::MissingDuration { .. })) => Ok(StageOutcome::Skipped {
                reason: e.to_string(),
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ChoirError::PerformerPanicked(performer.name().to_string())),
        }
    }
}
