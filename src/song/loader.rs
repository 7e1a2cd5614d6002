//! Song file loading.
//!
//! Two formats are accepted:
//!
//! - Plain text, one `<PITCH> <LENGTH>` pair per line (`A4 4`, `REST 8`).
//!   Blank lines and lines starting with `#` are ignored.
//! - JSON (`.json` extension): an array of `{ "pitch": "A4", "length": "4" }`
//!   records using the same codes.
//!
//! An entry that can't be decoded is dropped with a warning; the rest of the
//! song still loads.

use super::{NoteLength, Pitch, Song, SongEntry};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a song.
#[derive(Debug, Error)]
pub enum SongError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON song file is not an array of records
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A single entry did not decode into a known pitch and length
    #[error("malformed entry {line} '{text}': {reason}")]
    MalformedEntry {
        line: usize,
        text: String,
        reason: String,
    },
}

/// Result of decoding a song: the entries that parsed, plus the ones dropped.
#[derive(Debug, Default)]
pub struct ParsedSong {
    pub song: Song,
    /// Only [`SongError::MalformedEntry`] values end up here.
    pub malformed: Vec<SongError>,
}

/// One record of a JSON song file.
#[derive(Debug, Clone, Deserialize)]
struct SongRecord {
    pitch: String,
    length: String,
}

/// Decodes a pitch code and a length code into an entry.
fn decode_entry(pitch: &str, length: &str) -> Result<SongEntry, String> {
    let pitch: Pitch = pitch.parse()?;
    let length: NoteLength = length.parse()?;
    Ok(SongEntry::new(pitch, length))
}

/// A decoded record: 1-based position, original text, and the decode result.
type Record = (usize, String, Result<SongEntry, String>);

fn collect(records: impl Iterator<Item = Record>) -> ParsedSong {
    let mut entries = Vec::new();
    let mut malformed = Vec::new();

    for (line, text, decoded) in records {
        match decoded {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                tracing::warn!("Skipping invalid entry {}: '{}' ({})", line, text, reason);
                malformed.push(SongError::MalformedEntry { line, text, reason });
            }
        }
    }

    ParsedSong {
        song: Song::new(entries),
        malformed,
    }
}

/// Parses the plain-text song format.
///
/// Line numbers in reported errors are 1-based.
pub fn parse_song(source: &str) -> ParsedSong {
    let records = source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                return None;
            }
            let parts: Vec<&str> = text.split_whitespace().collect();
            let decoded = match parts.as_slice() {
                [pitch, length] => decode_entry(pitch, length),
                _ => Err(format!("expected 2 fields, found {}", parts.len())),
            };
            Some((index + 1, text.to_string(), decoded))
        });

    collect(records)
}

/// Parses a JSON song. Record numbers in reported errors are 1-based.
///
/// # Errors
///
/// Returns error if the document is not an array of `{pitch, length}` records.
/// Records with unknown codes are dropped, not reported as errors.
pub fn parse_song_json(json: &str) -> Result<ParsedSong, SongError> {
    let records: Vec<SongRecord> = serde_json::from_str(json)?;
    let records = records.into_iter().enumerate().map(|(index, record)| {
        let decoded = decode_entry(&record.pitch, &record.length);
        (index + 1, format!("{} {}", record.pitch, record.length), decoded)
    });
    Ok(collect(records))
}

/// Loads a song from disk, picking the format by file extension.
///
/// # Errors
///
/// Returns error if the file cannot be read, or if a `.json` file is not a
/// valid record array.
pub fn load_song<P: AsRef<Path>>(path: P) -> Result<ParsedSong, SongError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        parse_song_json(&contents)?
    } else {
        parse_song(&contents)
    };

    tracing::info!(
        "Loaded {} entries from {} ({} skipped)",
        parsed.song.len(),
        path.display(),
        parsed.malformed.len()
    );

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_song() {
        let parsed = parse_song("A4 4\nREST 8\nC4 2\n");
        assert!(parsed.malformed.is_empty());
        assert_eq!(
            parsed.song.entries(),
            &[
                SongEntry::new(Pitch::A4, NoteLength::Quarter),
                SongEntry::new(Pitch::Rest, NoteLength::Eighth),
                SongEntry::new(Pitch::C4, NoteLength::Half),
            ]
        );
    }

    #[test]
    fn test_unknown_duration_is_dropped() {
        let parsed = parse_song("A4 4\nA4 7\nB4 8");
        assert_eq!(parsed.song.len(), 2);
        assert_eq!(
            parsed.song.entries(),
            &[
                SongEntry::new(Pitch::A4, NoteLength::Quarter),
                SongEntry::new(Pitch::B4, NoteLength::Eighth),
            ]
        );
        assert_eq!(parsed.malformed.len(), 1);
        match &parsed.malformed[0] {
            SongError::MalformedEntry { line, text, .. } => {
                assert_eq!(*line, 2);
                assert_eq!(text, "A4 7");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_pitch_and_bad_shape_are_dropped() {
        let parsed = parse_song("H4 4\nA4\nA4 4 4\nG5S 16");
        assert_eq!(
            parsed.song.entries(),
            &[SongEntry::new(Pitch::G5S, NoteLength::Sixteenth)]
        );
        assert_eq!(parsed.malformed.len(), 3);
    }

    #[test]
    fn test_blank_lines_and_comments_are_ignored() {
        let parsed = parse_song("# intro\n\n  A4   4  \n\t\nREST 1\n");
        assert_eq!(parsed.song.len(), 2);
        assert!(parsed.malformed.is_empty());
    }

    #[test]
    fn test_parse_json_song() {
        let json = r#"[
            {"pitch": "A4", "length": "4"},
            {"pitch": "REST", "length": "8"},
            {"pitch": "A4", "length": "7"},
            {"pitch": "C5S", "length": "316"}
        ]"#;
        let parsed = parse_song_json(json).unwrap();
        assert_eq!(
            parsed.song.entries(),
            &[
                SongEntry::new(Pitch::A4, NoteLength::Quarter),
                SongEntry::new(Pitch::Rest, NoteLength::Eighth),
                SongEntry::new(Pitch::C5S, NoteLength::ThreeSixteenths),
            ]
        );
        assert_eq!(parsed.malformed.len(), 1);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            parse_song_json("{\"pitch\": \"A4\"}"),
            Err(SongError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_song("does/not/exist.txt"),
            Err(SongError::Io(_))
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("bellchoir-load-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let text_path = dir.join("song.txt");
        fs::write(&text_path, "E4 8\nD4 8\nC4 4\n").unwrap();
        assert_eq!(load_song(&text_path).unwrap().song.len(), 3);

        let json_path = dir.join("song.json");
        fs::write(&json_path, r#"[{"pitch": "E4", "length": "1"}]"#).unwrap();
        assert_eq!(load_song(&json_path).unwrap().song.len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
