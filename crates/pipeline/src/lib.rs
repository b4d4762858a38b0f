//! Audio pipeline: VAD chunking, multi-engine fusion and engine registry
//!
//! The pipeline turns an audio reference into ordered speech chunks, runs
//! the configured ASR engines over each chunk and fuses their hypotheses
//! into a single result with a re-decode policy for low-confidence output.

pub mod audio_io;
pub mod fusion;
pub mod langid;
pub mod registry;
pub mod vad;

pub use audio_io::{load_audio_mono_16k, DecodedAudio};
pub use fusion::{FusionEngine, FusionEngineConfig};
pub use langid::RouteIdentifier;
pub use registry::{EngineEntry, EngineRegistry};
pub use vad::{VadChunker, VadChunkerConfig};

use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("audio decode error: {0}")]
    AudioDecode(String),

    #[error("resample error: {0}")]
    Resample(String),

    #[error("VAD error: {0}")]
    Vad(String),

    #[error("fusion error: {0}")]
    Fusion(String),

    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    #[error("engine load failed for '{engine}': {reason}")]
    EngineLoad { engine: String, reason: String },
}

impl From<PipelineError> for katha_core::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::AudioDecode(reason) => katha_core::Error::AudioDecode {
                path: String::new(),
                reason,
            },
            PipelineError::Resample(reason) => katha_core::Error::AudioDecode {
                path: String::new(),
                reason,
            },
            PipelineError::Vad(reason) => katha_core::Error::Vad(reason),
            PipelineError::Fusion(reason) => katha_core::Error::Fusion(reason),
            PipelineError::UnknownEngine(engine) => katha_core::Error::AsrEngine {
                engine,
                reason: "not registered".to_string(),
            },
            PipelineError::EngineLoad { engine, reason } => {
                katha_core::Error::AsrEngine { engine, reason }
            }
        }
    }
}
