//! Audio chunk types produced by the VAD chunker

use std::path::PathBuf;
use std::sync::Arc;

/// Reference to the audio backing a chunk.
///
/// Batch mode chunks point back into the source file; live mode chunks carry
/// their PCM samples directly since the stream is not seekable.
#[derive(Debug, Clone)]
pub enum AudioRef {
    /// Chunk is a time window into an audio file.
    File(PathBuf),
    /// Chunk carries its own 16 kHz mono samples.
    Samples(Arc<[f32]>),
}

impl AudioRef {
    /// File path, if this reference is file-backed.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            AudioRef::File(p) => Some(p),
            AudioRef::Samples(_) => None,
        }
    }
}

/// A speech segment emitted by the VAD chunker.
///
/// Chunks are immutable once emitted. Times are in seconds from the start of
/// the input. Neighbouring chunks may overlap by the configured overlap
/// window at both boundaries (never past the stream ends).
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Audio backing this chunk.
    pub audio: AudioRef,
}

impl AudioChunk {
    pub fn new(start_time: f64, end_time: f64, audio: AudioRef) -> Self {
        Self {
            start_time,
            end_time,
            audio,
        }
    }

    /// Chunk duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}
