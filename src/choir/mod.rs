//! The bell choir: one performer per pitch, directed by a conductor.
//!
//! This side of the crate models timing only. Each note is held by the
//! performer that owns its pitch, on its own thread, while the conductor
//! waits for it to finish before moving on. Sound is produced separately by
//! [`crate::audio::PlaybackEngine`].

mod cancel;
mod conductor;
mod performer;
mod registry;

pub use cancel::CancelToken;
pub use conductor::{Conductor, Performance, StageOutcome, StageReport};
pub use performer::Performer;
pub use registry::PerformerRegistry;

use crate::song::Pitch;
use thiserror::Error;

/// Errors raised while conducting a song.
#[derive(Debug, Error)]
pub enum ChoirError {
    /// A performer was dispatched before any length was assigned to it
    #[error("{performer} ({pitch}) has no note length set")]
    MissingDuration { performer: String, pitch: Pitch },
    /// No performer can be found or created for a pitch
    #[error("no performer found for pitch {0}")]
    UnmappedPitch(Pitch),
    /// Cancellation was requested while waiting
    #[error("interrupted")]
    Interrupted,
    /// The performer's thread could not be started
    #[error("failed to start performer thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// The performer's thread panicked
    #[error("performer {0} panicked")]
    PerformerPanicked(String),
}
