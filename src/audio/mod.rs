//! Audio rendering and output.
//!
//! This module turns songs into sound:
//! - Writing each note's precomputed waveform, clipped to one measure
//! - Separating notes with a short gap of silence
//! - Sending the result to the default output device via rodio

pub mod engine;
pub mod sink;

pub use engine::{PlaybackEngine, PlaybackSummary};
pub use sink::{AudioSink, MemorySink, RodioSink};

use thiserror::Error;

/// Errors that abort playback.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The output device could not be opened
    #[error("audio output unavailable: {0}")]
    SinkUnavailable(String),
    /// A write to the output device failed
    #[error("audio write failed: {0}")]
    SinkWriteFailure(String),
    /// Cancellation was requested
    #[error("playback interrupted")]
    Interrupted,
}
