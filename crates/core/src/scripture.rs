//! Scripture line and quote match types

use serde::{Deserialize, Serialize};

/// Source scripture corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptureSource {
    /// Sri Guru Granth Sahib Ji.
    #[serde(rename = "SGGS")]
    Sggs,
    /// Dasam Granth.
    #[serde(rename = "DasamGranth")]
    DasamGranth,
}

impl std::fmt::Display for ScriptureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptureSource::Sggs => f.write_str("SGGS"),
            ScriptureSource::DasamGranth => f.write_str("DasamGranth"),
        }
    }
}

/// A single canonical line from scripture.
///
/// Immutable; keyed by `(source, line_id)`. Read-only after store load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptureLine {
    pub line_id: String,
    pub source: ScriptureSource,
    pub gurmukhi: String,
    pub roman: Option<String>,
    /// Page number in SGGS (1-1430).
    pub ang: Option<u32>,
    pub raag: Option<String>,
    pub author: Option<String>,
    /// Hymn unit this line belongs to.
    pub shabad_id: Option<String>,
}

/// How a quote match was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Fuzzy,
    Semantic,
    Constrained,
    Alignment,
}

/// A verified match of spoken text against a canonical scripture line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteMatch {
    pub source: ScriptureSource,
    pub line_id: String,
    pub canonical_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_roman: Option<String>,
    /// The transcribed text before canonical replacement.
    pub spoken_text: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ang: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub match_method: MatchMethod,
}

/// A detected quote candidate awaiting matching.
#[derive(Debug, Clone)]
pub struct QuoteCandidate {
    pub text: String,
    pub confidence: f64,
    pub detection_reason: String,
}
