//! Domain-constrained spelling correction
//!
//! Corrects spelling errors while staying inside the scripture vocabulary.
//! Never translates or paraphrases; only normalizes spelling within a small
//! edit distance, and keeps the original when no confident candidate exists.

use crate::script_lock::ScriptLock;
use katha_config::DomainMode;
use katha_lexicon::Lexicon;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

static GURMUKHI_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{0A00}-\u{0A7F}]+").expect("static regex"));

/// Alternate spellings normalized to the standard orthography. These are not
/// errors, just variants.
static SPELLING_VARIANTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ਗੁੜੂ", "ਗੁਰੂ"),
        ("ਸੱਚ", "ਸਚ"),
        ("ਨੰਾ", "ਨਾਂ"),
    ])
});

const MIN_CORRECTION_LENGTH: usize = 2;
const MAX_CANDIDATES: usize = 10;

/// A potential spelling correction.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionCandidate {
    pub word: String,
    pub edit_distance: usize,
    pub frequency: u32,
    pub confidence: f64,
    pub source: CandidateSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    Lexicon,
    Normalization,
}

/// Result of correcting a single word.
#[derive(Debug, Clone)]
pub struct CorrectionResult {
    pub original: String,
    pub corrected: String,
    pub was_corrected: bool,
    pub candidate: Option<CorrectionCandidate>,
}

impl CorrectionResult {
    fn unchanged(word: &str) -> Self {
        Self {
            original: word.to_string(),
            corrected: word.to_string(),
            was_corrected: false,
            candidate: None,
        }
    }
}

/// Statistics over a batch of corrections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectionStats {
    pub total_words: usize,
    pub corrected_words: usize,
    pub correction_rate: f64,
    pub from_lexicon: usize,
    pub from_normalization: usize,
}

impl CorrectionStats {
    pub fn from_results(results: &[CorrectionResult]) -> Self {
        let total_words = results.len();
        let corrected_words = results.iter().filter(|r| r.was_corrected).count();
        let from_lexicon = results
            .iter()
            .filter(|r| {
                r.was_corrected
                    && r.candidate.as_ref().map(|c| c.source) == Some(CandidateSource::Lexicon)
            })
            .count();
        let from_normalization = results
            .iter()
            .filter(|r| {
                r.was_corrected
                    && r.candidate.as_ref().map(|c| c.source)
                        == Some(CandidateSource::Normalization)
            })
            .count();
        Self {
            total_words,
            corrected_words,
            correction_rate: if total_words > 0 {
                corrected_words as f64 / total_words as f64
            } else {
                0.0
            },
            from_lexicon,
            from_normalization,
        }
    }
}

/// Bounded-edit spelling corrector over the domain lexicon.
pub struct DomainCorrector {
    mode: DomainMode,
    lexicon: Arc<Lexicon>,
    script_lock: ScriptLock,
    max_edit_distance: usize,
    min_confidence: f64,
}

impl DomainCorrector {
    pub fn new(mode: DomainMode, lexicon: Arc<Lexicon>) -> Self {
        Self {
            mode,
            lexicon,
            script_lock: ScriptLock::new(),
            max_edit_distance: 2,
            min_confidence: 0.5,
        }
    }

    /// Conservative variant: single-character edits only, higher confidence
    /// bar. Suitable for sensitive transcriptions.
    pub fn conservative(mode: DomainMode, lexicon: Arc<Lexicon>) -> Self {
        Self {
            mode,
            lexicon,
            script_lock: ScriptLock::new(),
            max_edit_distance: 1,
            min_confidence: 0.7,
        }
    }

    pub fn with_limits(mut self, max_edit_distance: usize, min_confidence: f64) -> Self {
        self.max_edit_distance = max_edit_distance;
        self.min_confidence = min_confidence;
        self
    }

    fn candidate_confidence(&self, distance: usize, frequency: u32) -> f64 {
        let distance_factor = 1.0 - (distance as f64 / (self.max_edit_distance as f64 + 1.0));
        let frequency_factor = if frequency > 0 {
            (frequency as f64 / 100.0).min(1.0)
        } else {
            0.1
        };
        0.5 * distance_factor + 0.5 * frequency_factor
    }

    /// Candidates within the edit budget, best first. Determinism: ties by
    /// higher frequency, then lexicographic order.
    fn find_candidates(&self, word: &str) -> Vec<CorrectionCandidate> {
        let mut candidates = Vec::new();
        let word_len = word.chars().count();

        if word_len < MIN_CORRECTION_LENGTH {
            return candidates;
        }

        if self.lexicon.contains(word, self.mode) {
            if let Some(&normalized) = SPELLING_VARIANTS.get(word) {
                candidates.push(CorrectionCandidate {
                    word: normalized.to_string(),
                    edit_distance: 0,
                    frequency: self.lexicon.frequency(normalized),
                    confidence: 0.9,
                    source: CandidateSource::Normalization,
                });
            }
            return candidates;
        }

        for vocab_word in self.lexicon.combined_vocab(self.mode) {
            let len_diff = vocab_word.chars().count().abs_diff(word_len);
            if len_diff > self.max_edit_distance {
                continue;
            }

            let distance = strsim::levenshtein(word, vocab_word);
            if distance == 0 || distance > self.max_edit_distance {
                continue;
            }

            let frequency = self.lexicon.frequency(vocab_word);
            candidates.push(CorrectionCandidate {
                word: vocab_word.to_string(),
                edit_distance: distance,
                frequency,
                confidence: self.candidate_confidence(distance, frequency),
                source: CandidateSource::Lexicon,
            });
        }

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.frequency.cmp(&a.frequency))
                .then(a.word.cmp(&b.word))
        });
        candidates.truncate(MAX_CANDIDATES);
        candidates
    }

    /// Correct a single word.
    pub fn correct_word(&self, word: &str) -> CorrectionResult {
        if word.chars().count() < MIN_CORRECTION_LENGTH {
            return CorrectionResult::unchanged(word);
        }

        if self.lexicon.contains(word, self.mode) {
            if let Some(&normalized) = SPELLING_VARIANTS.get(word) {
                return CorrectionResult {
                    original: word.to_string(),
                    corrected: normalized.to_string(),
                    was_corrected: true,
                    candidate: Some(CorrectionCandidate {
                        word: normalized.to_string(),
                        edit_distance: 0,
                        frequency: self.lexicon.frequency(normalized),
                        confidence: 0.9,
                        source: CandidateSource::Normalization,
                    }),
                };
            }
            return CorrectionResult::unchanged(word);
        }

        let mut candidates = self.find_candidates(word);
        if candidates.is_empty() {
            return CorrectionResult::unchanged(word);
        }

        let best = candidates.remove(0);
        if best.confidence >= self.min_confidence {
            return CorrectionResult {
                original: word.to_string(),
                corrected: best.word.clone(),
                was_corrected: true,
                candidate: Some(best),
            };
        }

        CorrectionResult::unchanged(word)
    }

    /// Correct all Gurmukhi words in text, preserving everything between
    /// them. Word count is preserved: corrections are word-for-word.
    pub fn correct_text(
        &self,
        text: &str,
        enforce_script: bool,
    ) -> (String, Vec<CorrectionResult>) {
        if text.is_empty() {
            return (String::new(), Vec::new());
        }

        let working = if enforce_script {
            self.script_lock.repair(text).0
        } else {
            text.to_string()
        };

        let mut results = Vec::new();
        let mut corrected = String::with_capacity(working.len());
        let mut last_end = 0;

        for m in GURMUKHI_WORD.find_iter(&working) {
            corrected.push_str(&working[last_end..m.start()]);
            let result = self.correct_word(m.as_str());
            corrected.push_str(&result.corrected);
            results.push(result);
            last_end = m.end();
        }
        corrected.push_str(&working[last_end..]);

        let corrections_made = results.iter().filter(|r| r.was_corrected).count();
        if corrections_made > 0 {
            tracing::debug!(corrections = corrections_made, "domain corrections applied");
        }

        (corrected, results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lexicon_with(words: &[(&str, u32)]) -> Arc<Lexicon> {
        let mut lexicon = Lexicon::default();
        for (word, freq) in words {
            lexicon.sggs_vocab.insert(word.to_string());
            lexicon.word_frequencies.insert(word.to_string(), *freq);
        }
        Arc::new(lexicon)
    }

    #[test]
    fn test_in_vocab_word_unchanged() {
        let corrector = DomainCorrector::new(DomainMode::Sggs, lexicon_with(&[("ਪੁਰਖੁ", 50)]));
        let result = corrector.correct_word("ਪੁਰਖੁ");
        assert!(!result.was_corrected);
        assert_eq!(result.corrected, "ਪੁਰਖੁ");
    }

    #[test]
    fn test_short_word_skipped() {
        let corrector = DomainCorrector::new(DomainMode::Sggs, lexicon_with(&[]));
        let result = corrector.correct_word("ਸ");
        assert!(!result.was_corrected);
    }

    #[test]
    fn test_misspelling_corrected_within_edit_distance() {
        // ਪੁਰਕ -> ਪੁਰਖੁ is 2 edits, frequent word gives enough confidence
        let corrector = DomainCorrector::new(DomainMode::Sggs, lexicon_with(&[("ਪੁਰਖੁ", 100)]));
        let result = corrector.correct_word("ਪੁਰਕ");
        assert!(result.was_corrected);
        assert_eq!(result.corrected, "ਪੁਰਖੁ");
        let candidate = result.candidate.unwrap();
        assert!(candidate.edit_distance <= 2);
        assert!(candidate.confidence >= 0.5);
    }

    #[test]
    fn test_distant_word_not_corrected() {
        let corrector = DomainCorrector::new(DomainMode::Sggs, lexicon_with(&[("ਵਾਹਿਗੁਰੂ", 100)]));
        let result = corrector.correct_word("ਜਲਥਲ");
        assert!(!result.was_corrected);
        assert_eq!(result.corrected, "ਜਲਥਲ");
    }

    #[test]
    fn test_conservative_requires_single_edit() {
        let lexicon = lexicon_with(&[("ਪੁਰਖੁ", 100)]);
        let conservative = DomainCorrector::conservative(DomainMode::Sggs, lexicon);
        // Two edits away: not eligible under conservative limits
        let result = conservative.correct_word("ਪੁਰਕ");
        assert!(!result.was_corrected);
    }

    #[test]
    fn test_spelling_variant_normalized() {
        // ਸੱਚ is a valid variant; curated vocabulary contains it via corpus add
        let corrector = DomainCorrector::new(DomainMode::Sggs, lexicon_with(&[("ਸੱਚ", 10), ("ਸਚ", 40)]));
        let result = corrector.correct_word("ਸੱਚ");
        assert!(result.was_corrected);
        assert_eq!(result.corrected, "ਸਚ");
        assert_eq!(
            result.candidate.unwrap().source,
            CandidateSource::Normalization
        );
    }

    #[test]
    fn test_tie_broken_by_frequency_then_lexicographic() {
        // Two candidates at the same distance; the more frequent must win.
        let corrector = DomainCorrector::new(
            DomainMode::Sggs,
            lexicon_with(&[("ਨਾਮਾ", 100), ("ਨਾਮੀ", 100)]),
        );
        let result = corrector.correct_word("ਨਾਮਕ");
        assert!(result.was_corrected);
        // Equal confidence and frequency: lexicographic order decides
        assert_eq!(result.corrected, "ਨਾਮਾ".min("ਨਾਮੀ"));
    }

    #[test]
    fn test_correct_text_preserves_structure() {
        let corrector = DomainCorrector::new(DomainMode::Sggs, lexicon_with(&[("ਪੁਰਖੁ", 100)]));
        let (corrected, results) = corrector.correct_text("ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਕ ॥", false);
        assert!(corrected.contains("ਪੁਰਖੁ"));
        assert!(corrected.contains("॥"));
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_correct_text_word_count_preserved() {
        let corrector = DomainCorrector::new(DomainMode::Sggs, lexicon_with(&[("ਪੁਰਖੁ", 100)]));
        let text = "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਕ";
        let (corrected, _) = corrector.correct_text(text, false);
        assert_eq!(
            corrected.split_whitespace().count(),
            text.split_whitespace().count()
        );
    }

    #[test]
    fn test_correct_empty_text() {
        let corrector = DomainCorrector::new(DomainMode::Sggs, lexicon_with(&[]));
        let (corrected, results) = corrector.correct_text("", false);
        assert!(corrected.is_empty());
        assert!(results.is_empty());
    }

    #[test]
    fn test_stats() {
        let corrector = DomainCorrector::new(DomainMode::Sggs, lexicon_with(&[("ਪੁਰਖੁ", 100)]));
        let (_, results) = corrector.correct_text("ਸਤਿ ਨਾਮੁ ਪੁਰਕ", false);
        let stats = CorrectionStats::from_results(&results);
        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.corrected_words, 1);
        assert_eq!(stats.from_lexicon, 1);
        assert!(stats.correction_rate > 0.3);
    }

    proptest! {
        #[test]
        fn prop_word_count_preserved(words in proptest::collection::vec("[\\u{0A05}-\\u{0A39}]{2,6}", 1..8)) {
            let corrector = DomainCorrector::new(
                DomainMode::Sggs,
                lexicon_with(&[("ਪੁਰਖੁ", 100), ("ਨਾਮੁ", 80)]),
            );
            let text = words.join(" ");
            let (corrected, _) = corrector.correct_text(&text, false);
            prop_assert_eq!(
                corrected.split_whitespace().count(),
                text.split_whitespace().count()
            );
        }
    }
}
