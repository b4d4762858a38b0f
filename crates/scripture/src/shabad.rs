//! Live shabad tracking
//!
//! During kirtan the same shabad is sung line by line, so a matched line
//! predicts its successor. The tracker keeps a per-session pointer into the
//! current shabad, tries the expected lines before a full search, and
//! resets after enough consecutive misses.

use katha_core::{Result, ScriptureLine, ScriptureStore};
use katha_lexicon::gurbani_vocabulary;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

/// Audio content mode classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMode {
    /// Singing (shabad/kirtan).
    Shabad,
    /// Spoken exposition (katha).
    Katha,
    Mixed,
    Unknown,
}

/// Patterns indicating katha (speaking about scripture).
static KATHA_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"ਜਿਵੇਂ\s+ਕਿ",
        r"ਇਸ\s+ਦਾ\s+ਅਰਥ",
        r"ਇਸ\s+ਵਿੱਚ",
        r"ਗੁਰੂ\s+ਸਾਹਿਬ\s+ਨੇ",
        r"ਭਾਵ\s+ਹੈ",
        r"ਦੱਸਿਆ\s+ਹੈ",
        r"ਸਮਝਾਉਂਦੇ\s+ਹਨ",
        r"ਵਿਚਾਰ",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

/// Patterns indicating shabad (sung scripture).
static SHABAD_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"॥\s*ਰਹਾਉ\s*॥", r"॥\s*\d+\s*॥", r"॥\s*॥"]
        .iter()
        .map(|p| Regex::new(p).expect("static regex"))
        .collect()
});

const GURBANI_VOCAB_THRESHOLD: f64 = 0.35;

/// Tracks the current shabad within one live session.
#[derive(Debug, Clone)]
pub struct ShabadContext {
    pub shabad_id: String,
    pub current_line_index: usize,
    pub lines: Vec<ScriptureLine>,
    pub confidence: f64,
    pub last_matched_text: String,
}

impl ShabadContext {
    pub fn current_line(&self) -> Option<&ScriptureLine> {
        self.lines.get(self.current_line_index)
    }

    pub fn next_line(&self) -> Option<&ScriptureLine> {
        self.lines.get(self.current_line_index + 1)
    }

    pub fn previous_line(&self) -> Option<&ScriptureLine> {
        self.current_line_index
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
    }

    /// Move to the next line. Returns false at the end of the shabad.
    pub fn advance(&mut self) -> bool {
        if self.current_line_index + 1 < self.lines.len() {
            self.current_line_index += 1;
            true
        } else {
            false
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current_line_index + 1 >= self.lines.len()
    }
}

/// Per-session shabad tracker. Exclusive to one session; not shared.
pub struct ShabadTracker {
    store: Arc<dyn ScriptureStore>,
    match_threshold: f64,
    max_misses: u32,
    context: Option<ShabadContext>,
    consecutive_misses: u32,
}

impl ShabadTracker {
    pub fn new(store: Arc<dyn ScriptureStore>) -> Self {
        Self {
            store,
            match_threshold: 0.7,
            max_misses: 3,
            context: None,
            consecutive_misses: 0,
        }
    }

    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn context(&self) -> Option<&ShabadContext> {
        self.context.as_ref()
    }

    /// Predicted next line from the current context.
    pub fn predicted_next_line(&self) -> Option<&ScriptureLine> {
        self.context.as_ref().and_then(|c| c.next_line())
    }

    pub fn reset(&mut self) {
        self.context = None;
        self.consecutive_misses = 0;
    }

    /// Classify audio mode from transcribed text.
    pub fn detect_mode(text: &str) -> (AudioMode, f64) {
        if text.trim().is_empty() {
            return (AudioMode::Unknown, 0.0);
        }

        let katha_score = KATHA_INDICATORS.iter().filter(|p| p.is_match(text)).count();
        // Shabad markers weigh double
        let mut shabad_score = SHABAD_INDICATORS
            .iter()
            .filter(|p| p.is_match(text))
            .count()
            * 2;

        let density = Self::vocab_density(text);
        if density >= GURBANI_VOCAB_THRESHOLD {
            shabad_score += 1;
        }

        if katha_score > shabad_score {
            (
                AudioMode::Katha,
                (0.5 + katha_score as f64 * 0.15).min(1.0),
            )
        } else if shabad_score > katha_score {
            (
                AudioMode::Shabad,
                (0.5 + shabad_score as f64 * 0.15 + density * 0.2).min(1.0),
            )
        } else if density >= GURBANI_VOCAB_THRESHOLD {
            (AudioMode::Shabad, 0.5 + density * 0.3)
        } else {
            (AudioMode::Mixed, 0.4)
        }
    }

    fn vocab_density(text: &str) -> f64 {
        let words: HashSet<&str> = katha_text::tokenize_gurmukhi(text).into_iter().collect();
        if words.is_empty() {
            return 0.0;
        }
        let archaic = words
            .iter()
            .filter(|w| gurbani_vocabulary().contains(*w))
            .count();
        archaic as f64 / words.len() as f64
    }

    /// Jaccard similarity over Gurmukhi word sets.
    fn word_jaccard(a: &str, b: &str) -> f64 {
        let wa: HashSet<&str> = katha_text::tokenize_gurmukhi(a).into_iter().collect();
        let wb: HashSet<&str> = katha_text::tokenize_gurmukhi(b).into_iter().collect();
        if wa.is_empty() || wb.is_empty() {
            return 0.0;
        }
        let intersection = wa.intersection(&wb).count();
        let union = wa.union(&wb).count();
        intersection as f64 / union as f64
    }

    /// Try matching against the expected lines of the current context:
    /// current, next (advancing on hit), then previous (refrain repeats).
    fn match_from_context(&mut self, text: &str) -> Option<(ScriptureLine, f64)> {
        let context = self.context.as_mut()?;

        if let Some(line) = context.current_line() {
            let score = Self::word_jaccard(text, &line.gurmukhi);
            if score >= self.match_threshold {
                return Some((line.clone(), score));
            }
        }

        if let Some(line) = context.next_line().cloned() {
            let score = Self::word_jaccard(text, &line.gurmukhi);
            if score >= self.match_threshold {
                context.advance();
                return Some((line, score));
            }
        }

        if let Some(line) = context.previous_line() {
            let score = Self::word_jaccard(text, &line.gurmukhi);
            if score >= self.match_threshold {
                return Some((line.clone(), score));
            }
        }

        None
    }

    /// Match transcribed text to a shabad line, preferring the tracked
    /// context, falling back to store search. Updates miss counting and
    /// loads a new shabad context when the match moves to another shabad.
    pub async fn match_line(&mut self, text: &str) -> Result<Option<(ScriptureLine, f64)>> {
        let clean: String = text.replace(['॥', '।'], " ");
        let clean = clean.trim();
        if clean.chars().count() < 5 {
            return Ok(None);
        }

        if let Some(hit) = self.match_from_context(clean) {
            self.consecutive_misses = 0;
            if let Some(context) = &mut self.context {
                context.last_matched_text = clean.to_string();
                context.confidence = hit.1;
            }
            return Ok(Some(hit));
        }

        let results = self.store.search_by_text(clean, 5, true).await?;
        let best = results
            .into_iter()
            .map(|line| {
                let score = Self::word_jaccard(clean, &line.gurmukhi);
                (line, score)
            })
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        match best {
            Some((line, score)) if score >= self.match_threshold => {
                self.consecutive_misses = 0;
                self.enter_shabad(&line, score, clean).await?;
                Ok(Some((line, score)))
            }
            _ => {
                self.consecutive_misses += 1;
                if self.consecutive_misses > self.max_misses {
                    tracing::debug!(
                        misses = self.consecutive_misses,
                        "resetting shabad context after consecutive misses"
                    );
                    self.reset();
                }
                Ok(None)
            }
        }
    }

    /// Load the matched line's shabad as the new context when it differs
    /// from the tracked one.
    async fn enter_shabad(&mut self, line: &ScriptureLine, score: f64, text: &str) -> Result<()> {
        let Some(shabad_id) = &line.shabad_id else {
            return Ok(());
        };

        let same = self
            .context
            .as_ref()
            .is_some_and(|c| c.shabad_id == *shabad_id);
        if same {
            return Ok(());
        }

        let lines = self.store.context(&line.line_id, 0).await?;
        let lines = if lines.is_empty() {
            vec![line.clone()]
        } else {
            lines
        };
        let index = lines
            .iter()
            .position(|l| l.line_id == line.line_id)
            .unwrap_or(0);

        tracing::info!(shabad_id = %shabad_id, lines = lines.len(), "entered new shabad");
        self.context = Some(ShabadContext {
            shabad_id: shabad_id.clone(),
            current_line_index: index,
            lines,
            confidence: score,
            last_matched_text: text.to_string(),
        });
        Ok(())
    }
}
