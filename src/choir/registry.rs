//! Pitch to performer mapping.

use super::{ChoirError, Performer};
use crate::song::{Pitch, Song};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Holds at most one [`Performer`] per pitch.
///
/// Performers are created lazily the first time their pitch is resolved and
/// live as long as the registry (or until [`clear`](Self::clear)). The map is
/// behind a mutex so a registry can be shared across threads.
#[derive(Debug, Default)]
pub struct PerformerRegistry {
    performers: Mutex<HashMap<Pitch, Arc<Performer>>>,
}

impl PerformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with one performer for every distinct pitch in
    /// `song`, assigned the length of that pitch's first entry.
    pub fn for_song(song: &Song) -> Self {
        let registry = Self::new();
        for entry in song.entries().iter().filter(|e| !e.is_rest()) {
            if registry.lookup(entry.pitch).is_some() {
                continue;
            }
            if let Ok(performer) = registry.resolve(entry.pitch) {
                performer.assign(entry.length);
                tracing::info!(
                    "Assigned {} to note {} with length {}",
                    performer.name(),
                    entry.pitch,
                    entry.length
                );
            }
        }
        registry
    }

    fn map(&self) -> MutexGuard<'_, HashMap<Pitch, Arc<Performer>>> {
        match self.performers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Returns the performer for `pitch`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ChoirError::UnmappedPitch`] for [`Pitch::Rest`]; rests have
    /// no performer.
    pub fn resolve(&self, pitch: Pitch) -> Result<Arc<Performer>, ChoirError> {
        if pitch.is_rest() {
            return Err(ChoirError::UnmappedPitch(pitch));
        }
        let mut map = self.map();
        let next = map.len();
        let performer = map
            .entry(pitch)
            .or_insert_with(|| Arc::new(Performer::new(format!("Member {}", next), pitch)));
        Ok(Arc::clone(performer))
    }

    /// Returns the performer for `pitch` without creating one.
    pub fn lookup(&self, pitch: Pitch) -> Option<Arc<Performer>> {
        self.map().get(&pitch).cloned()
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    /// Drops every performer, e.g. before conducting a different song.
    pub fn clear(&self) {
        self.map().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::{NoteLength, SongEntry};

    #[test]
    fn test_resolve_is_idempotent() {
        let registry = PerformerRegistry::new();
        let first = registry.resolve(Pitch::A4).unwrap();
        let second = registry.resolve(Pitch::A4).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_pitches_get_distinct_performers() {
        let registry = PerformerRegistry::new();
        let a = registry.resolve(Pitch::A4).unwrap();
        let c = registry.resolve(Pitch::C4).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(a.name(), "Member 0");
        assert_eq!(c.name(), "Member 1");
        assert_eq!(c.current_length(), None);
    }

    #[test]
    fn test_rest_is_never_resolved() {
        let registry = PerformerRegistry::new();
        assert!(matches!(
            registry.resolve(Pitch::Rest),
            Err(ChoirError::UnmappedPitch(Pitch::Rest))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_for_song() {
        let song = Song::new(vec![
            SongEntry::new(Pitch::G4, NoteLength::Half),
            SongEntry::new(Pitch::Rest, NoteLength::Quarter),
            SongEntry::new(Pitch::E4, NoteLength::Eighth),
            SongEntry::new(Pitch::G4, NoteLength::Whole),
        ]);
        let registry = PerformerRegistry::for_song(&song);
        assert_eq!(registry.len(), 2);
        assert!(registry.lookup(Pitch::Rest).is_none());

        let g4 = registry.lookup(Pitch::G4).unwrap();
        assert_eq!(g4.current_length(), Some(NoteLength::Half));
        assert!(Arc::ptr_eq(&g4, &registry.resolve(Pitch::G4).unwrap()));
    }

    #[test]
    fn test_clear() {
        let registry = PerformerRegistry::new();
        let before = registry.resolve(Pitch::B5).unwrap();
        registry.clear();
        assert!(registry.lookup(Pitch::B5).is_none());
        let after = registry.resolve(Pitch::B5).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_concurrent_resolve_shares_performer() {
        let registry = Arc::new(PerformerRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.resolve(Pitch::D5).unwrap())
            })
            .collect();
        let performers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(performers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(registry.len(), 1);
    }
}
