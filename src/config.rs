//! Tone generation settings.
//!
//! All waveform lengths and note durations are derived from two values:
//! the output sample rate and the length of one measure.

use thiserror::Error;

/// Output sample rate in Hz (48 KiHz).
pub const SAMPLE_RATE: u32 = 48 * 1024;

/// Length of one measure in seconds. Every note length is a fraction of this.
pub const MEASURE_LENGTH_SECS: u32 = 1;

/// Peak amplitude of a generated sine wave (8-bit signed).
pub const MAX_VOLUME: f64 = 127.0;

/// Silence written after every note so repeated pitches don't blend together.
pub const GAP_SAMPLES: usize = 50;

/// Errors raised when validating a [`ToneConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sample rate must be greater than zero")]
    ZeroSampleRate,
    #[error("measure length must be greater than zero")]
    ZeroMeasureLength,
}

/// Sample rate and measure length shared by the pitch and duration tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneConfig {
    /// Samples per second.
    pub sample_rate: u32,
    /// Seconds per measure.
    pub measure_length_secs: u32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            measure_length_secs: MEASURE_LENGTH_SECS,
        }
    }
}

impl ToneConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns error if either value is zero.
    pub fn new(sample_rate: u32, measure_length_secs: u32) -> Result<Self, ConfigError> {
        let config = Self {
            sample_rate,
            measure_length_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that both values are non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.measure_length_secs == 0 {
            return Err(ConfigError::ZeroMeasureLength);
        }
        Ok(())
    }

    /// Length of one measure in milliseconds.
    pub fn measure_ms(&self) -> u64 {
        self.measure_length_secs as u64 * 1000
    }

    /// Number of samples in one measure (the length of every waveform buffer).
    pub fn samples_per_measure(&self) -> usize {
        self.sample_rate as usize * self.measure_length_secs as usize
    }

    /// Converts a millisecond span into a sample count at this rate.
    pub fn samples_for_ms(&self, ms: u64) -> usize {
        (self.sample_rate as u64 * ms / 1000) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToneConfig::default();
        assert_eq!(config.sample_rate, 49152);
        assert_eq!(config.measure_length_secs, 1);
        assert_eq!(config.samples_per_measure(), 49152);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_values() {
        assert_eq!(ToneConfig::new(0, 1), Err(ConfigError::ZeroSampleRate));
        assert_eq!(ToneConfig::new(48000, 0), Err(ConfigError::ZeroMeasureLength));
    }

    #[test]
    fn test_samples_for_ms() {
        let config = ToneConfig::default();
        assert_eq!(config.samples_for_ms(250), 12288);
        assert_eq!(config.samples_for_ms(1000), 49152);
        assert_eq!(config.samples_for_ms(0), 0);
    }
}
