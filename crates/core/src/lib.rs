//! Core types and traits for the Gurbani transcription pipeline
//!
//! This crate provides foundational types used across all other crates:
//! - Audio chunk and hypothesis types
//! - Fusion and segment result types
//! - Scripture line and quote match types
//! - Route classification
//! - Traits for pluggable backends (ASR engines, denoiser, scripture store)
//! - Error taxonomy

pub mod audio;
pub mod error;
pub mod route;
pub mod scripture;
pub mod segment;
pub mod traits;

pub use audio::{AudioChunk, AudioRef};
pub use error::{Error, Result};
pub use route::Route;
pub use scripture::{QuoteCandidate, QuoteMatch, MatchMethod, ScriptureLine, ScriptureSource};
pub use segment::{
    FusionResult, Hypothesis, HypothesisSnapshot, ProcessedSegment, SegmentTiming, SegmentType,
    TranscriptionMetrics, TranscriptionResult,
};
pub use traits::{
    AsrEngine, Denoiser, EmbeddingIndex, EngineCapabilities, EngineId, ScriptureStore,
};
