//! A single choir member.

use super::{CancelToken, ChoirError};
use crate::song::{DurationTable, NoteLength, Pitch};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Holds one pitch for whatever length it was last assigned.
///
/// The pitch is fixed at creation. The length is overwritten each time the
/// performer is reused for a new entry.
#[derive(Debug)]
pub struct Performer {
    name: String,
    pitch: Pitch,
    length: Mutex<Option<NoteLength>>,
}

impl Performer {
    /// Creates a performer with no length assigned.
    pub fn new(name: impl Into<String>, pitch: Pitch) -> Self {
        Self {
            name: name.into(),
            pitch,
            length: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    /// Sets the length held by the next `perform` or `dispatch`.
    pub fn assign(&self, length: NoteLength) {
        match self.length.lock() {
            Ok(mut guard) => *guard = Some(length),
            Err(poisoned) => *poisoned.into_inner() = Some(length),
        }
    }

    /// The currently assigned length, if any.
    pub fn current_length(&self) -> Option<NoteLength> {
        match self.length.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn missing_duration(&self) -> ChoirError {
        tracing::warn!("{} has no note length set!", self.name);
        ChoirError::MissingDuration {
            performer: self.name.clone(),
            pitch: self.pitch,
        }
    }

    /// Holds the assigned length on the calling thread.
    ///
    /// # Errors
    ///
    /// [`ChoirError::MissingDuration`] if nothing was ever assigned, or
    /// [`ChoirError::Interrupted`] if `cancel` fires while holding.
    pub fn perform(
        &self,
        durations: &DurationTable,
        cancel: &CancelToken,
    ) -> Result<(), ChoirError> {
        let length = self.current_length().ok_or_else(|| self.missing_duration())?;
        hold(durations.time_ms(length), cancel)
    }

    /// Holds the assigned length on a new thread.
    ///
    /// The length is read once, here, and moved into the thread, so a later
    /// `assign` can't change a note that is already sounding.
    ///
    /// # Errors
    ///
    /// Returns [`ChoirError::Spawn`] if the thread cannot be started. Errors
    /// from the hold itself come back through the join handle.
    pub fn dispatch(
        &self,
        durations: &DurationTable,
        cancel: &CancelToken,
    ) -> Result<JoinHandle<Result<(), ChoirError>>, ChoirError> {
        let held = self
            .current_length()
            .map(|length| durations.time_ms(length))
            .ok_or_else(|| self.missing_duration());
        let cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name(format!("{} ({})", self.name, self.pitch))
            .spawn(move || -> Result<(), ChoirError> { hold(held?, &cancel) })?;
        Ok(handle)
    }
}

fn hold(ms: u64, cancel: &CancelToken) -> Result<(), ChoirError> {
    cancel.sleep(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_perform_without_length() {
        let performer = Performer::new("Member 0", Pitch::A4);
        let result = performer.perform(&DurationTable::default(), &CancelToken::new());
        assert!(matches!(
            result,
            Err(ChoirError::MissingDuration { pitch: Pitch::A4, .. })
        ));
    }

    #[test]
    fn test_assign_overwrites() {
        let performer = Performer::new("Member 0", Pitch::B4);
        assert_eq!(performer.current_length(), None);
        performer.assign(NoteLength::Half);
        performer.assign(NoteLength::Sixteenth);
        assert_eq!(performer.current_length(), Some(NoteLength::Sixteenth));
        assert_eq!(performer.pitch(), Pitch::B4);
    }

    #[test]
    fn test_perform_holds_for_length() {
        let performer = Performer::new("Member 0", Pitch::C4);
        performer.assign(NoteLength::Sixteenth);
        let start = Instant::now();
        performer
            .perform(&DurationTable::default(), &CancelToken::new())
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(63));
    }

    #[test]
    fn test_dispatch_snapshots_length() {
        let performer = Performer::new("Member 0", Pitch::D4);
        performer.assign(NoteLength::ThirtySecond);
        let start = Instant::now();
        let handle = performer
            .dispatch(&DurationTable::default(), &CancelToken::new())
            .unwrap();
        // Reassigning after dispatch doesn't stretch the running note.
        performer.assign(NoteLength::Whole);
        handle.join().unwrap().unwrap();
        assert!(start.elapsed() < Duration::from_millis(900));
    }

    #[test]
    fn test_dispatch_without_length_reports_through_handle() {
        let performer = Performer::new("Member 3", Pitch::E4);
        let handle = performer
            .dispatch(&DurationTable::default(), &CancelToken::new())
            .unwrap();
        assert!(matches!(
            handle.join().unwrap(),
            Err(ChoirError::MissingDuration { .. })
        ));
    }

    #[test]
    fn test_dispatch_is_interruptible() {
        let performer = Performer::new("Member 0", Pitch::F4);
        performer.assign(NoteLength::Whole);
        let cancel = CancelToken::new();
        let start = Instant::now();
        let handle = performer
            .dispatch(&DurationTable::default(), &cancel)
            .unwrap();
        cancel.cancel();
        assert!(matches!(handle.join().unwrap(), Err(ChoirError::Interrupted)));
        assert!(start.elapsed() < Duration::from_millis(900));
    }
}
