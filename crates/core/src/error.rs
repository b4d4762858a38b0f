//! Error taxonomy for the transcription pipeline
//!
//! Fatal-for-the-input: [`Error::AudioDecode`], [`Error::Vad`].
//! Fatal-for-the-chunk: primary [`Error::AsrEngine`] failures and
//! [`Error::Fusion`] invariant violations; the orchestrator converts these
//! into placeholder segments so time coverage is preserved.
//! Recoverable: [`Error::ScriptConversion`] and [`Error::QuoteMatch`] — the
//! segment continues with best-effort text and `needs_review = true`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to decode audio {path}: {reason}")]
    AudioDecode { path: String, reason: String },

    #[error("VAD chunking failed: {0}")]
    Vad(String),

    #[error("ASR engine '{engine}' failed: {reason}")]
    AsrEngine { engine: String, reason: String },

    #[error("ASR engine '{engine}' timed out after {timeout_s}s")]
    AsrTimeout { engine: String, timeout_s: u64 },

    #[error("fusion failed: {0}")]
    Fusion(String),

    #[error("script conversion failed ({source_script} -> gurmukhi): {reason}")]
    ScriptConversion {
        source_script: String,
        reason: String,
    },

    #[error("quote matching failed: {0}")]
    QuoteMatch(String),

    #[error("audio denoising failed: {0}")]
    Denoise(String),

    #[error("scripture database not found: {0}")]
    DatabaseNotFound(String),

    #[error("lexicon error: {0}")]
    Lexicon(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error aborts the whole input (as opposed to one chunk).
    pub fn is_fatal_for_input(&self) -> bool {
        matches!(self, Error::AudioDecode { .. } | Error::Vad(_))
    }

    /// Whether post-processing may continue with the pre-failure text.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ScriptConversion { .. } | Error::QuoteMatch(_) | Error::DatabaseNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let err = Error::Vad("unreadable".into());
        assert!(err.is_fatal_for_input());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recoverable_classification() {
        let err = Error::QuoteMatch("store offline".into());
        assert!(err.is_recoverable());
        assert!(!err.is_fatal_for_input());
    }
}
