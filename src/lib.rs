//! bellchoir - a bell choir that plays songs one pitch per performer.
//!
//! This library provides the waveform tables, the performer/conductor timing
//! model, and the playback engine used by the `bellchoir` binary.

pub mod audio;
pub mod choir;
pub mod config;
pub mod song;

// Re-export commonly used types
pub use audio::{AudioSink, MemorySink, PlaybackEngine, PlaybackError, RodioSink};
pub use choir::{CancelToken, ChoirError, Conductor, Performer, PerformerRegistry};
pub use config::{ConfigError, ToneConfig, MEASURE_LENGTH_SECS, SAMPLE_RATE};
pub use song::{load_song, NoteLength, Pitch, PitchTable, Song, SongEntry, SongError};
