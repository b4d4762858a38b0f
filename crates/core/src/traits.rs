//! Traits for pluggable backends
//!
//! ASR engines, the denoiser, and the scripture stores are external
//! collaborators. The pipeline consumes them through these interfaces and
//! ships deterministic test doubles; model bindings live elsewhere.

use crate::audio::AudioChunk;
use crate::error::Result;
use crate::route::Route;
use crate::scripture::ScriptureLine;
use crate::segment::Hypothesis;
use async_trait::async_trait;
use std::path::Path;

/// Stable engine identifier (registry key).
pub type EngineId = String;

/// Static capability descriptor for an ASR engine.
#[derive(Debug, Clone)]
pub struct EngineCapabilities {
    pub id: EngineId,
    pub supports_timestamps: bool,
    /// ISO 639-1 codes the engine accepts as hints.
    pub supported_languages: Vec<String>,
    pub is_available: bool,
}

/// An opaque ASR engine.
///
/// Implementations must be internally thread-safe for inference; the
/// orchestrator runs several engines concurrently against the same chunk.
#[async_trait]
pub trait AsrEngine: Send + Sync {
    /// Transcribe a single chunk.
    ///
    /// `language_hint` and `route_hint` bias decoding; `initial_prompt` seeds
    /// domain vocabulary for engines that support prompting.
    async fn transcribe_chunk(
        &self,
        chunk: &AudioChunk,
        language_hint: Option<&str>,
        route_hint: Option<Route>,
        initial_prompt: Option<&str>,
    ) -> Result<Hypothesis>;

    /// Transcribe a whole file in one pass.
    async fn transcribe_file(&self, path: &Path, language_hint: Option<&str>)
        -> Result<Hypothesis>;

    fn capabilities(&self) -> EngineCapabilities;
}

/// Optional audio pre-filter.
#[async_trait]
pub trait Denoiser: Send + Sync {
    /// Estimated noise ratio in [0, 1].
    async fn estimate_noise_level(&self, path: &Path) -> Result<f64>;

    /// Denoise a file, writing to `out`. Returns the output path.
    async fn denoise_file(&self, input: &Path, out: &Path) -> Result<std::path::PathBuf>;

    /// Denoise raw PCM samples.
    async fn denoise_samples(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>>;
}

/// Queryable canonical scripture store.
///
/// Read-only after construction; concurrent reads are unsynchronized.
#[async_trait]
pub trait ScriptureStore: Send + Sync {
    /// Approximate text search, best matches first.
    async fn search_by_text(
        &self,
        text: &str,
        top_k: usize,
        fuzzy: bool,
    ) -> Result<Vec<ScriptureLine>>;

    async fn line_by_id(&self, line_id: &str) -> Result<Option<ScriptureLine>>;

    /// Lines surrounding `line_id` within the same shabad.
    async fn context(&self, line_id: &str, window: usize) -> Result<Vec<ScriptureLine>>;
}

/// Pre-built vector index over scripture lines.
///
/// Embeddings are normalized; `search` returns inner-product similarities.
#[async_trait]
pub trait EmbeddingIndex: Send + Sync {
    /// Top-k `(line_id, similarity)` pairs for a query text.
    async fn search(&self, query_text: &str, top_k: usize) -> Result<Vec<(String, f64)>>;
}
