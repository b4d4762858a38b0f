//! Per-chunk route classification
//!
//! The route directs which auxiliary ASR engines run for a chunk and whether
//! the scripture matcher is consulted.

use serde::{Deserialize, Serialize};

/// Language/domain route assigned to each chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Spoken Punjabi (katha, announcements).
    PunjabiSpeech,
    /// Spoken English.
    EnglishSpeech,
    /// Likely a scripture citation (praman) or kirtan line.
    ScriptureQuoteLikely,
    /// Code-switched or undetermined content.
    Mixed,
}

impl Route {
    /// Stable wire name, matching the output segment JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::PunjabiSpeech => "punjabi_speech",
            Route::EnglishSpeech => "english_speech",
            Route::ScriptureQuoteLikely => "scripture_quote_likely",
            Route::Mixed => "mixed",
        }
    }

    /// All routes, for metrics histograms.
    pub fn all() -> [Route; 4] {
        [
            Route::PunjabiSpeech,
            Route::EnglishSpeech,
            Route::ScriptureQuoteLikely,
            Route::Mixed,
        ]
    }

    /// Whether this route biases toward the scripture matcher.
    pub fn suggests_scripture(&self) -> bool {
        matches!(self, Route::ScriptureQuoteLikely)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
