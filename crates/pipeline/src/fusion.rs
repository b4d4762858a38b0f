//! ASR fusion: voting, confidence merge and re-decode policy
//!
//! Merges multiple ASR engine outputs into a single high-confidence
//! transcription. Hypotheses are compared pairwise, the winner is chosen by
//! agreement-gated confidence, and low-confidence or low-agreement results
//! trigger a bounded re-decode pass.

use crate::PipelineError;
use katha_core::{FusionResult, Hypothesis};

/// Fusion policy configuration
#[derive(Debug, Clone)]
pub struct FusionEngineConfig {
    /// Mean pairwise similarity above which engines "agree".
    pub agreement_threshold: f64,
    /// Confidence boost applied when the winner has high agreement.
    pub confidence_boost: f64,
    /// Fused confidence below which a re-decode is triggered.
    pub redecode_threshold: f64,
    pub max_redecode_attempts: u32,
}

impl Default for FusionEngineConfig {
    fn default() -> Self {
        Self {
            agreement_threshold: 0.85,
            confidence_boost: 0.1,
            redecode_threshold: 0.6,
            max_redecode_attempts: 2,
        }
    }
}

/// Multi-hypothesis fusion engine.
#[derive(Debug, Clone, Default)]
pub struct FusionEngine {
    config: FusionEngineConfig,
}

impl FusionEngine {
    pub fn new(config: FusionEngineConfig) -> Self {
        Self { config }
    }

    /// Text similarity in [0, 1]: token-sort ratio (order-invariant) over
    /// whitespace-normalized text. Both-empty compares equal; one-empty
    /// compares disjoint.
    fn text_similarity(a: &str, b: &str) -> f64 {
        let a = a.split_whitespace().collect::<Vec<_>>().join(" ");
        let b = b.split_whitespace().collect::<Vec<_>>().join(" ");

        if a.is_empty() && b.is_empty() {
            return 1.0;
        }
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let mut tokens_a: Vec<&str> = a.split(' ').collect();
        let mut tokens_b: Vec<&str> = b.split(' ').collect();
        tokens_a.sort_unstable();
        tokens_b.sort_unstable();

        strsim::normalized_levenshtein(&tokens_a.join(" "), &tokens_b.join(" "))
    }

    /// Symmetric pairwise agreement matrix with unit diagonal.
    fn agreement_matrix(hypotheses: &[Hypothesis]) -> Vec<Vec<f64>> {
        let n = hypotheses.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            matrix[i][i] = 1.0;
            for j in (i + 1)..n {
                let score = Self::text_similarity(&hypotheses[i].text, &hypotheses[j].text);
                matrix[i][j] = score;
                matrix[j][i] = score;
            }
        }

        matrix
    }

    /// Winner selection: among the high-agreement set when non-empty,
    /// otherwise over all hypotheses; by confidence, with the primary engine
    /// (index 0) preferred on ties.
    fn select_best(
        &self,
        hypotheses: &[Hypothesis],
        matrix: &[Vec<f64>],
    ) -> (usize, f64) {
        let n = hypotheses.len();
        let avg: Vec<f64> = (0..n)
            .map(|i| matrix[i].iter().sum::<f64>() / n as f64)
            .collect();

        let high: Vec<usize> = (0..n)
            .filter(|&i| avg[i] >= self.config.agreement_threshold)
            .collect();

        let pool: Vec<usize> = if high.is_empty() {
            (0..n).collect()
        } else {
            high
        };

        let best = pool
            .into_iter()
            .max_by(|&a, &b| {
                hypotheses[a]
                    .confidence
                    .partial_cmp(&hypotheses[b].confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    // max_by keeps the later of equal elements; prefer the
                    // lower index (primary engine) on confidence ties
                    .then(b.cmp(&a))
            })
            .unwrap_or(0);

        (best, avg[best])
    }

    /// Fuse hypotheses into a single result.
    ///
    /// Errors on an empty list. A single hypothesis is returned as-is with
    /// perfect agreement.
    pub fn fuse(&self, hypotheses: Vec<Hypothesis>) -> Result<FusionResult, PipelineError> {
        if hypotheses.is_empty() {
            return Err(PipelineError::Fusion(
                "cannot fuse empty hypothesis list".to_string(),
            ));
        }

        if hypotheses.len() == 1 {
            let h = &hypotheses[0];
            return Ok(FusionResult {
                fused_text: h.text.clone(),
                fused_confidence: h.confidence,
                agreement_score: 1.0,
                selected_engine: h.engine_id.clone(),
                hypotheses,
                redecode_attempts: 0,
            });
        }

        let matrix = Self::agreement_matrix(&hypotheses);
        let (selected, agreement_score) = self.select_best(&hypotheses, &matrix);

        let winner = &hypotheses[selected];
        let mut fused_confidence = winner.confidence;
        if agreement_score >= self.config.agreement_threshold {
            fused_confidence = (fused_confidence + self.config.confidence_boost).min(1.0);
        }

        tracing::debug!(
            selected = %winner.engine_id,
            confidence = format!("{fused_confidence:.2}"),
            agreement = format!("{agreement_score:.2}"),
            hypotheses = hypotheses.len(),
            "fusion complete"
        );

        Ok(FusionResult {
            fused_text: winner.text.clone(),
            fused_confidence,
            agreement_score,
            selected_engine: winner.engine_id.clone(),
            hypotheses,
            redecode_attempts: 0,
        })
    }

    /// Whether a fusion result warrants a re-decode pass.
    ///
    /// Triggers on low fused confidence, or on strong engine disagreement
    /// (below 0.5 — deliberately looser than the agreement threshold used
    /// for the confidence boost).
    pub fn should_redecode(&self, result: &FusionResult) -> bool {
        if result.redecode_attempts >= self.config.max_redecode_attempts {
            return false;
        }
        if result.fused_confidence < self.config.redecode_threshold {
            return true;
        }
        result.agreement_score < 0.5
    }

    /// Fold a re-decode hypothesis into an existing result and re-fuse.
    pub fn apply_redecode(
        &self,
        result: FusionResult,
        redecode: Hypothesis,
    ) -> Result<FusionResult, PipelineError> {
        let attempts = result.redecode_attempts;
        let mut hypotheses = result.hypotheses;
        hypotheses.push(redecode);

        let mut updated = self.fuse(hypotheses)?;
        updated.redecode_attempts = attempts + 1;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> FusionEngine {
        FusionEngine::new(FusionEngineConfig::default())
    }

    fn hyp(id: &str, text: &str, confidence: f64) -> Hypothesis {
        Hypothesis::new(id, text, confidence)
    }

    #[test]
    fn test_empty_list_errors() {
        assert!(engine().fuse(vec![]).is_err());
    }

    #[test]
    fn test_single_hypothesis_perfect_agreement() {
        let result = engine().fuse(vec![hyp("asr_a", "ਸਤਿ ਨਾਮੁ", 0.75)]).unwrap();
        assert_eq!(result.agreement_score, 1.0);
        assert_eq!(result.fused_text, "ਸਤਿ ਨਾਮੁ");
        assert_eq!(result.fused_confidence, 0.75);
        assert_eq!(result.selected_engine, "asr_a");
        assert_eq!(result.redecode_attempts, 0);
    }

    #[test]
    fn test_identical_texts_boosted() {
        // Scenario: two engines agree exactly; higher confidence wins and
        // the agreement boost applies.
        let result = engine()
            .fuse(vec![
                hyp("asr_a", "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ", 0.7),
                hyp("asr_b", "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ", 0.8),
            ])
            .unwrap();
        assert_eq!(result.selected_engine, "asr_b");
        assert_eq!(result.agreement_score, 1.0);
        assert!((result.fused_confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_boost_clamped_to_one() {
        let result = engine()
            .fuse(vec![
                hyp("asr_a", "ਹਰਿ ਨਾਮੁ", 0.98),
                hyp("asr_b", "ਹਰਿ ਨਾਮੁ", 0.95),
            ])
            .unwrap();
        assert_eq!(result.fused_confidence, 1.0);
    }

    #[test]
    fn test_selected_engine_invariant() {
        let result = engine()
            .fuse(vec![
                hyp("asr_a", "ਹਰਿ ਜਪੋ", 0.6),
                hyp("asr_b", "ਕੁਝ ਹੋਰ ਹੀ", 0.9),
            ])
            .unwrap();
        assert!(result
            .hypotheses
            .iter()
            .any(|h| h.engine_id == result.selected_engine));
        let winner = result
            .hypotheses
            .iter()
            .find(|h| h.engine_id == result.selected_engine)
            .unwrap();
        assert_eq!(result.fused_text, winner.text);
        assert!((0.0..=1.0).contains(&result.fused_confidence));
        assert!((0.0..=1.0).contains(&result.agreement_score));
    }

    #[test]
    fn test_disagreement_selects_by_confidence_no_boost() {
        let result = engine()
            .fuse(vec![
                hyp("asr_a", "ਸਤਿ ਨਾਮੁ ਕਰਤਾ", 0.4),
                hyp("asr_b", "ਪੂਰੀ ਵੱਖਰੀ ਗੱਲ ਇੱਥੇ", 0.45),
            ])
            .unwrap();
        assert_eq!(result.selected_engine, "asr_b");
        // Low agreement: no boost applied
        assert!((result.fused_confidence - 0.45).abs() < 1e-9);
        assert!(result.agreement_score < 0.85);
    }

    #[test]
    fn test_primary_engine_wins_confidence_tie() {
        let result = engine()
            .fuse(vec![
                hyp("asr_a", "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪੋ ਜੀ", 0.8),
                hyp("asr_b", "ਬਿਲਕੁਲ ਅਲੱਗ ਪਾਠ ਏਥੇ ਹੈ", 0.8),
            ])
            .unwrap();
        assert_eq!(result.selected_engine, "asr_a");
    }

    #[test]
    fn test_token_order_invariance() {
        // Token-sort ratio treats reordered tokens as agreement
        let sim = FusionEngine::text_similarity("ਨਾਮੁ ਸਤਿ", "ਸਤਿ ਨਾਮੁ");
        assert_eq!(sim, 1.0);
    }

    #[test]
    fn test_whitespace_normalized() {
        let sim = FusionEngine::text_similarity("ਸਤਿ   ਨਾਮੁ", " ਸਤਿ ਨਾਮੁ ");
        assert_eq!(sim, 1.0);
    }

    #[test]
    fn test_empty_text_similarity() {
        assert_eq!(FusionEngine::text_similarity("", ""), 1.0);
        assert_eq!(FusionEngine::text_similarity("ਹਰਿ", ""), 0.0);
    }

    #[test]
    fn test_all_empty_texts_select_by_confidence() {
        let result = engine()
            .fuse(vec![hyp("asr_a", "", 0.2), hyp("asr_b", "", 0.3)])
            .unwrap();
        assert_eq!(result.selected_engine, "asr_b");
        assert!(result.fused_text.is_empty());
    }

    #[test]
    fn test_should_redecode_low_confidence() {
        let result = engine()
            .fuse(vec![
                hyp("asr_a", "ਇੱਕ ਗੱਲ", 0.4),
                hyp("asr_b", "ਹੋਰ ਕੁਝ ਵੱਖਰਾ", 0.45),
            ])
            .unwrap();
        assert!(engine().should_redecode(&result));
    }

    #[test]
    fn test_should_redecode_low_agreement_despite_confidence() {
        // Three engines, mutually disjoint texts: the winner's mean
        // agreement (self included) drops below 0.5.
        let result = engine()
            .fuse(vec![
                hyp("asr_a", "ਕਕਕ ਕਕ", 0.9),
                hyp("asr_b", "ਗਗਗਗ ਗਗ", 0.3),
                hyp("asr_c", "ਝਝ ਝਝਝ", 0.2),
            ])
            .unwrap();
        // Confidence fine, agreement under 0.5: still triggers
        assert!(result.fused_confidence >= 0.6);
        assert!(result.agreement_score < 0.5);
        assert!(engine().should_redecode(&result));
    }

    #[test]
    fn test_no_redecode_when_confident_and_agreeing() {
        let result = engine()
            .fuse(vec![
                hyp("asr_a", "ਸਤਿ ਨਾਮੁ", 0.8),
                hyp("asr_b", "ਸਤਿ ਨਾਮੁ", 0.85),
            ])
            .unwrap();
        assert!(!engine().should_redecode(&result));
    }

    #[test]
    fn test_redecode_attempts_capped() {
        let mut result = engine()
            .fuse(vec![
                hyp("asr_a", "ਇੱਕ", 0.2),
                hyp("asr_b", "ਦੋ ਹੋਰ", 0.25),
            ])
            .unwrap();
        result.redecode_attempts = 2;
        assert!(!engine().should_redecode(&result));
    }

    #[test]
    fn test_apply_redecode_scenario() {
        // Scenario: two disagreeing low-confidence engines, then a
        // high-confidence re-decode matching engine 2's text.
        let eng = engine();
        let initial = eng
            .fuse(vec![
                hyp("asr_a", "ਕੁਝ ਅਸਪਸ਼ਟ ਬੋਲ", 0.4),
                hyp("asr_b", "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ", 0.45),
            ])
            .unwrap();
        assert!(eng.should_redecode(&initial));

        let updated = eng
            .apply_redecode(initial, hyp("asr_indic", "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ", 0.85))
            .unwrap();
        assert_eq!(updated.redecode_attempts, 1);
        assert_eq!(updated.selected_engine, "asr_indic");
        assert_eq!(updated.fused_text, "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ");
        assert_eq!(updated.hypotheses.len(), 3);
    }
}
