//! Note lengths.
//!
//! Every length is a fraction of one measure; the [`DurationTable`] turns
//! those fractions into milliseconds for a given measure length.

use crate::config::ToneConfig;
use std::fmt;
use std::str::FromStr;

/// A symbolic note length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteLength {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    Third,
    ThreeSixteenths,
    ThreeQuarters,
    ThreeEighths,
    SixEighths,
}

impl NoteLength {
    /// All lengths, for iteration.
    pub const ALL: [NoteLength; 11] = [
        NoteLength::Whole,
        NoteLength::Half,
        NoteLength::Quarter,
        NoteLength::Eighth,
        NoteLength::Sixteenth,
        NoteLength::ThirtySecond,
        NoteLength::Third,
        NoteLength::ThreeSixteenths,
        NoteLength::ThreeQuarters,
        NoteLength::ThreeEighths,
        NoteLength::SixEighths,
    ];

    /// Share of one measure, in (0, 1].
    pub fn fraction(self) -> f64 {
        match self {
            NoteLength::Whole => 1.0,
            NoteLength::Half => 0.5,
            NoteLength::Quarter => 0.25,
            NoteLength::Eighth => 0.125,
            NoteLength::Sixteenth => 0.0625,
            NoteLength::ThirtySecond => 0.03125,
            NoteLength::Third => 0.33333,
            NoteLength::ThreeSixteenths => 0.1875,
            NoteLength::ThreeQuarters => 0.75,
            NoteLength::ThreeEighths => 0.375,
            // 3/32 of a measure, despite the name.
            NoteLength::SixEighths => 0.09375,
        }
    }

    /// Textual code used in song files.
    pub fn code(self) -> &'static str {
        match self {
            NoteLength::Whole => "1",
            NoteLength::Half => "2",
            NoteLength::Quarter => "4",
            NoteLength::Eighth => "8",
            NoteLength::Sixteenth => "16",
            NoteLength::ThirtySecond => "32",
            NoteLength::Third => "3",
            NoteLength::ThreeSixteenths => "316",
            NoteLength::ThreeQuarters => "34",
            NoteLength::ThreeEighths => "38",
            NoteLength::SixEighths => "68",
        }
    }

    /// Milliseconds at the default measure length.
    pub fn time_ms(self) -> u64 {
        DurationTable::default().time_ms(self)
    }
}

impl fmt::Display for NoteLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for NoteLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteLength::ALL
            .iter()
            .copied()
            .find(|l| l.code() == s)
            .ok_or_else(|| format!("unknown duration '{}'", s))
    }
}

/// Millisecond lengths for every [`NoteLength`], computed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationTable {
    measure_ms: u64,
    /// Indexed like [`NoteLength::ALL`].
    times: [u64; 11],
}

impl DurationTable {
    pub fn new(config: &ToneConfig) -> Self {
        let measure_ms = config.measure_ms();
        let times = NoteLength::ALL.map(|l| (l.fraction() * measure_ms as f64).round() as u64);
        Self { measure_ms, times }
    }

    /// Holding time for a note length, rounded to the nearest millisecond.
    pub fn time_ms(&self, length: NoteLength) -> u64 {
        self.times[length as usize]
    }

    /// Length of a full measure in milliseconds.
    pub fn measure_ms(&self) -> u64 {
        self.measure_ms
    }
}

impl Default for DurationTable {
    fn default() -> Self {
        Self::new(&ToneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_times() {
        let table = DurationTable::default();
        assert_eq!(table.time_ms(NoteLength::Whole), 1000);
        assert_eq!(table.time_ms(NoteLength::Half), 500);
        assert_eq!(table.time_ms(NoteLength::Quarter), 250);
        assert_eq!(table.time_ms(NoteLength::Eighth), 125);
        assert_eq!(table.time_ms(NoteLength::Sixteenth), 63);
        assert_eq!(table.time_ms(NoteLength::ThirtySecond), 31);
        assert_eq!(table.time_ms(NoteLength::Third), 333);
        assert_eq!(table.time_ms(NoteLength::ThreeQuarters), 750);
    }

    #[test]
    fn test_times_follow_fraction() {
        let config = ToneConfig::new(8000, 3).unwrap();
        let table = DurationTable::new(&config);
        assert_eq!(table.measure_ms(), 3000);
        for length in NoteLength::ALL {
            let expected = (length.fraction() * 3000.0).round() as u64;
            assert_eq!(table.time_ms(length), expected, "{:?}", length);
        }
    }

    #[test]
    fn test_fractions_in_range() {
        for length in NoteLength::ALL {
            let f = length.fraction();
            assert!(f > 0.0 && f <= 1.0);
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!("4".parse::<NoteLength>(), Ok(NoteLength::Quarter));
        assert_eq!("316".parse::<NoteLength>(), Ok(NoteLength::ThreeSixteenths));
        assert_eq!("68".parse::<NoteLength>(), Ok(NoteLength::SixEighths));
        assert!("7".parse::<NoteLength>().is_err());
        assert!("".parse::<NoteLength>().is_err());
    }

    #[test]
    fn test_all_is_in_declaration_order() {
        for (i, length) in NoteLength::ALL.iter().enumerate() {
            assert_eq!(*length as usize, i);
        }
    }
}
