//! Audio output sinks.
//!
//! The playback engine writes mono 8-bit signed samples at a fixed rate into
//! an [`AudioSink`]. [`RodioSink`] sends them to the default output device;
//! [`MemorySink`] keeps them in memory.

use super::PlaybackError;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

/// Mono output.
pub const CHANNELS: u16 = 1;

/// Destination for rendered samples.
pub trait AudioSink {
    /// Queues samples for output.
    fn write(&mut self, samples: &[i8]) -> Result<(), PlaybackError>;

    /// Blocks until everything written so far has been played.
    fn drain(&mut self) -> Result<(), PlaybackError>;

    /// Releases the output. Writing after close is an error.
    fn close(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
}

/// Plays samples through the system's default audio device.
pub struct RodioSink {
    /// Audio output stream (must be kept alive).
    _stream: OutputStream,
    /// Audio output handle for playback.
    _stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    sample_rate: u32,
}

impl RodioSink {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::SinkUnavailable`] if no device can be opened.
    pub fn open(sample_rate: u32) -> Result<Self, PlaybackError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| PlaybackError::SinkUnavailable(e.to_string()))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| PlaybackError::SinkUnavailable(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            _stream_handle: stream_handle,
            sink: Some(sink),
            sample_rate,
        })
    }

    fn sink(&self) -> Result<&Sink, PlaybackError> {
        self.sink
            .as_ref()
            .ok_or_else(|| PlaybackError::SinkWriteFailure("output already closed".to_string()))
    }
}

impl AudioSink for RodioSink {
    fn write(&mut self, samples: &[i8]) -> Result<(), PlaybackError> {
        // The device takes 16-bit samples; widen without changing the shape.
        let widened: Vec<i16> = samples.iter().map(|&s| (s as i16) << 8).collect();
        self.sink()?
            .append(SamplesBuffer::new(CHANNELS, self.sample_rate, widened));
        Ok(())
    }

    fn drain(&mut self) -> Result<(), PlaybackError> {
        self.sink()?.sleep_until_end();
        Ok(())
    }

    fn close(&mut self) -> Result<(), PlaybackError> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        Ok(())
    }
}

/// Collects samples in memory. Useful for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    samples: Vec<i8>,
    /// Length of each individual write, in order.
    writes: Vec<usize>,
    drained: bool,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[i8] {
        &self.samples
    }

    pub fn writes(&self) -> &[usize] {
        &self.writes
    }

    pub fn is_drained(&self) -> bool {
        self.drained
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl AudioSink for MemorySink {
    fn write(&mut self, samples: &[i8]) -> Result<(), PlaybackError> {
        if self.closed {
            return Err(PlaybackError::SinkWriteFailure(
                "output already closed".to_string(),
            ));
        }
        self.samples.extend_from_slice(samples);
        self.writes.push(samples.len());
        self.drained = false;
        Ok(())
    }

    fn drain(&mut self) -> Result<(), PlaybackError> {
        self.drained = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), PlaybackError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_writes() {
        let mut sink = MemorySink::new();
        sink.write(&[1, 2, 3]).unwrap();
        sink.write(&[]).unwrap();
        sink.write(&[-4]).unwrap();
        sink.drain().unwrap();

        assert_eq!(sink.samples(), &[1, 2, 3, -4]);
        assert_eq!(sink.writes(), &[3, 0, 1]);
        assert!(sink.is_drained());
    }

    #[test]
    fn test_memory_sink_rejects_writes_after_close() {
        let mut sink = MemorySink::new();
        sink.close().unwrap();
        assert!(sink.is_closed());
        assert!(matches!(
            sink.write(&[0]),
            Err(PlaybackError::SinkWriteFailure(_))
        ));
    }
}
