//! Hypothesis, fusion and output segment types

use crate::route::Route;
use crate::scripture::QuoteMatch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-segment timing reported by an ASR engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentTiming {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// A single ASR engine's transcription of one chunk.
///
/// Engines produce hypotheses independently; no ordering between engines is
/// assumed. Collected hypotheses feed fusion and are then discarded.
#[derive(Debug, Clone)]
pub struct Hypothesis {
    pub engine_id: String,
    pub text: String,
    pub language: String,
    /// Engine confidence in [0, 1].
    pub confidence: f64,
    /// Language-identification probability, when the engine reports one.
    pub language_probability: Option<f64>,
    pub timings: Vec<SegmentTiming>,
}

impl Hypothesis {
    pub fn new(engine_id: impl Into<String>, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            engine_id: engine_id.into(),
            text: text.into(),
            language: "pa".to_string(),
            confidence,
            language_probability: None,
            timings: Vec::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_language_probability(mut self, p: f64) -> Self {
        self.language_probability = Some(p);
        self
    }
}

/// By-value snapshot of a hypothesis kept in the output audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HypothesisSnapshot {
    pub engine: String,
    pub text: String,
    pub confidence: f64,
}

impl From<&Hypothesis> for HypothesisSnapshot {
    fn from(h: &Hypothesis) -> Self {
        Self {
            engine: h.engine_id.clone(),
            text: h.text.clone(),
            confidence: h.confidence,
        }
    }
}

/// Result of fusing multiple ASR hypotheses for one chunk.
///
/// Invariant: `selected_engine` names one of `hypotheses`, and `fused_text`
/// equals the selected hypothesis text before any post-processing.
#[derive(Debug, Clone)]
pub struct FusionResult {
    pub fused_text: String,
    pub fused_confidence: f64,
    /// Mean pairwise agreement of the winner, in [0, 1].
    pub agreement_score: f64,
    pub selected_engine: String,
    pub hypotheses: Vec<Hypothesis>,
    pub redecode_attempts: u32,
}

impl FusionResult {
    /// Audit-trail snapshots in engine-completion order.
    pub fn hypothesis_snapshots(&self) -> Vec<HypothesisSnapshot> {
        self.hypotheses.iter().map(HypothesisSnapshot::from).collect()
    }
}

/// Segment content classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    Speech,
    ScriptureQuote,
}

/// A fully processed, time-aligned output segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedSegment {
    pub start: f64,
    pub end: f64,
    pub route: Route,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    /// Post-processed Gurmukhi text (canonical text if a quote was snapped).
    pub text: String,
    pub confidence: f64,
    pub language: String,
    /// Audit trail of engine hypotheses (by value, no back-references).
    pub hypotheses: Vec<HypothesisSnapshot>,
    pub needs_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roman: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_match: Option<QuoteMatch>,
    /// Pre-replacement text when a canonical quote was snapped in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoken_text: Option<String>,
}

impl ProcessedSegment {
    /// Placeholder segment for a chunk whose processing failed. Keeps time
    /// coverage and ordering intact; always flagged for review.
    pub fn placeholder(start: f64, end: f64, route: Route, reason: &str) -> Self {
        Self {
            start,
            end,
            route,
            segment_type: SegmentType::Speech,
            text: format!("[Transcription failed - review audio] ({reason})"),
            confidence: 0.0,
            language: "pa".to_string(),
            hypotheses: Vec::new(),
            needs_review: true,
            roman: None,
            original_script: None,
            script_confidence: None,
            quote_match: None,
            spoken_text: None,
        }
    }
}

/// Aggregate metrics for one transcription run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TranscriptionMetrics {
    pub total_chunks: usize,
    pub total_segments: usize,
    pub segments_needing_review: usize,
    pub average_confidence: f64,
    pub route_counts: HashMap<String, usize>,
    pub quotes_detected: usize,
    pub quotes_replaced: usize,
    pub quotes_flagged_review: usize,
}

impl TranscriptionMetrics {
    /// Compute metrics over a finished segment list.
    pub fn from_segments(segments: &[ProcessedSegment], total_chunks: usize) -> Self {
        let total_segments = segments.len();
        let segments_needing_review = segments.iter().filter(|s| s.needs_review).count();
        let average_confidence = if total_segments > 0 {
            segments.iter().map(|s| s.confidence).sum::<f64>() / total_segments as f64
        } else {
            0.0
        };

        let mut route_counts = HashMap::new();
        for route in Route::all() {
            let count = segments.iter().filter(|s| s.route == route).count();
            route_counts.insert(route.as_str().to_string(), count);
        }

        let quotes_detected = segments.iter().filter(|s| s.quote_match.is_some()).count();
        let quotes_replaced = segments
            .iter()
            .filter(|s| s.quote_match.is_some() && s.segment_type == SegmentType::ScriptureQuote)
            .count();
        let quotes_flagged_review = segments
            .iter()
            .filter(|s| s.quote_match.is_some() && s.needs_review)
            .count();

        Self {
            total_chunks,
            total_segments,
            segments_needing_review,
            average_confidence,
            route_counts,
            quotes_detected,
            quotes_replaced,
            quotes_flagged_review,
        }
    }
}

/// Final result of a transcription run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub job_id: String,
    pub segments: Vec<ProcessedSegment>,
    pub metrics: TranscriptionMetrics,
}
