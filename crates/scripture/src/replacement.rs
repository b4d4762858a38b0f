//! Canonical quote replacement
//!
//! When a match clears the replacement threshold the segment text is
//! snapped to the canonical line and the spoken text is preserved for the
//! audit trail. Below the threshold the match is attached for review
//! without touching the text.

use katha_core::{ProcessedSegment, QuoteMatch, SegmentType};

/// Apply a quote match to a segment according to the replacement threshold.
pub fn apply_quote_match(
    segment: &mut ProcessedSegment,
    quote_match: QuoteMatch,
    replacement_threshold: f64,
) {
    if quote_match.confidence >= replacement_threshold {
        tracing::info!(
            line_id = %quote_match.line_id,
            confidence = format!("{:.2}", quote_match.confidence),
            "replacing segment text with canonical line"
        );
        segment.spoken_text = Some(segment.text.clone());
        segment.text = quote_match.canonical_text.clone();
        if quote_match.canonical_roman.is_some() {
            segment.roman = quote_match.canonical_roman.clone();
        }
        segment.segment_type = SegmentType::ScriptureQuote;
        segment.quote_match = Some(quote_match);
    } else {
        tracing::debug!(
            line_id = %quote_match.line_id,
            confidence = format!("{:.2}", quote_match.confidence),
            "attaching match below replacement threshold for review"
        );
        segment.needs_review = true;
        segment.quote_match = Some(quote_match);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use katha_core::{MatchMethod, Route, ScriptureSource};

    fn segment(text: &str) -> ProcessedSegment {
        ProcessedSegment {
            start: 0.0,
            end: 2.0,
            route: Route::ScriptureQuoteLikely,
            segment_type: SegmentType::Speech,
            text: text.to_string(),
            confidence: 0.8,
            language: "pa".to_string(),
            hypotheses: Vec::new(),
            needs_review: false,
            roman: None,
            original_script: None,
            script_confidence: None,
            quote_match: None,
            spoken_text: None,
        }
    }

    fn quote_match(confidence: f64) -> QuoteMatch {
        QuoteMatch {
            source: ScriptureSource::Sggs,
            line_id: "1".to_string(),
            canonical_text: "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ".to_string(),
            canonical_roman: Some("sat naam kartaa purakh".to_string()),
            spoken_text: "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਕ".to_string(),
            confidence,
            ang: Some(1),
            raag: None,
            author: None,
            match_method: MatchMethod::Fuzzy,
        }
    }

    #[test]
    fn test_replacement_above_threshold() {
        let mut seg = segment("ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਕ");
        apply_quote_match(&mut seg, quote_match(0.9), 0.8);

        assert_eq!(seg.text, "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ");
        assert_eq!(seg.spoken_text.as_deref(), Some("ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਕ"));
        assert_eq!(seg.segment_type, SegmentType::ScriptureQuote);
        assert!(seg.roman.is_some());
        // Invariant: replaced text equals the attached canonical text
        assert_eq!(seg.text, seg.quote_match.as_ref().unwrap().canonical_text);
        assert!(!seg.needs_review);
    }

    #[test]
    fn test_below_threshold_attaches_for_review() {
        let mut seg = segment("ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਕ");
        apply_quote_match(&mut seg, quote_match(0.72), 0.8);

        assert_eq!(seg.text, "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਕ");
        assert_eq!(seg.segment_type, SegmentType::Speech);
        assert!(seg.needs_review);
        assert!(seg.quote_match.is_some());
        assert!(seg.spoken_text.is_none());
    }

    #[test]
    fn test_exactly_at_threshold_replaces() {
        let mut seg = segment("ਸਤਿ ਨਾਮੁ");
        apply_quote_match(&mut seg, quote_match(0.8), 0.8);
        assert_eq!(seg.segment_type, SegmentType::ScriptureQuote);
    }
}
