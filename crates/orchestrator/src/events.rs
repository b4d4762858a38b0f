//! Live transcription events
//!
//! Live mode emits a draft immediately after the primary engine completes
//! and a verified event after full post-processing. Within a chunk the
//! draft always precedes the verified event.

use katha_core::QuoteMatch;
use serde::{Deserialize, Serialize};

/// Early caption from the primary engine, before fusion and
/// post-processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftEvent {
    pub session_id: String,
    pub segment_id: String,
    pub start: f64,
    pub end: f64,
    /// Raw primary-engine text.
    pub text: String,
    /// Best-effort Gurmukhi rendering of the draft.
    pub gurmukhi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roman: Option<String>,
    pub confidence: f64,
}

/// Final segment after the full pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedEvent {
    pub session_id: String,
    pub segment_id: String,
    pub start: f64,
    pub end: f64,
    pub gurmukhi: String,
    pub roman: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_match: Option<QuoteMatch>,
    pub needs_review: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

/// Events broadcast by the orchestrator in live mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LiveEvent {
    Draft(DraftEvent),
    Verified(VerifiedEvent),
    Error(ErrorEvent),
}

impl LiveEvent {
    /// Segment id derived from chunk timing, stable across draft/verified.
    pub fn segment_id(start: f64, end: f64) -> String {
        format!("seg_{start:.2}_{end:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id_stable() {
        assert_eq!(LiveEvent::segment_id(1.5, 4.25), "seg_1.50_4.25");
    }

    #[test]
    fn test_event_json_tagging() {
        let event = LiveEvent::Draft(DraftEvent {
            session_id: "s1".into(),
            segment_id: "seg_0.00_2.00".into(),
            start: 0.0,
            end: 2.0,
            text: "ਸਤਿ".into(),
            gurmukhi: "ਸਤਿ".into(),
            roman: None,
            confidence: 0.8,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"draft\""));
        assert!(!json.contains("roman"));
    }
}
