//! Real-time quote context detection
//!
//! Detects when a speaker is about to quote or is quoting from scripture,
//! from introductory phrases, verse markers, archaic vocabulary density and
//! continuation state carried across segments.

use katha_core::QuoteCandidate;
use katha_lexicon::gurbani_vocabulary;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Where in a quotation the current segment sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteContextType {
    None,
    /// An introduction announcing an upcoming quote.
    Intro,
    QuoteStart,
    QuoteMiddle,
}

/// Result of quote context detection for one segment.
#[derive(Debug, Clone)]
pub struct QuoteContextResult {
    pub is_quote_likely: bool,
    pub is_quote_intro: bool,
    pub confidence: f64,
    pub detected_signals: Vec<String>,
    pub context_type: QuoteContextType,
}

struct NamedPattern {
    regex: Regex,
    name: &'static str,
}

fn patterns(defs: &[(&str, &'static str)]) -> Vec<NamedPattern> {
    defs.iter()
        .map(|(pattern, name)| NamedPattern {
            regex: Regex::new(pattern).expect("static regex"),
            name,
        })
        .collect()
}

/// Introductory phrases that signal an upcoming quote.
static INTRO_PATTERNS: Lazy<Vec<NamedPattern>> = Lazy::new(|| {
    patterns(&[
        // "As stated in Bani"
        (r"ਜਿਵੇਂ\s+ਬਾਣੀ\s+(?:ਵਿੱਚ|ਚ)\s+(?:ਕਿਹਾ|ਆਇਆ|ਲਿਖਿਆ)", "intro_jive_bani"),
        (r"ਜਿਵੇਂ\s+ਕਿਹਾ\s+ਹੈ", "intro_jive_kiha"),
        // "Guru Sahib says"
        (
            r"ਗੁਰੂ\s+ਸਾਹਿਬ\s+(?:ਫੁਰਮਾਉਂਦੇ|ਫਰਮਾਉਂਦੇ|ਕਹਿੰਦੇ)\s+(?:ਹਨ|ਨੇ)",
            "intro_guru_says",
        ),
        (r"ਸਤਿਗੁਰੂ\s+(?:ਜੀ\s+)?(?:ਫੁਰਮਾਉਂਦੇ|ਕਹਿੰਦੇ)", "intro_satguru_says"),
        // "Gurbani states"
        (r"ਗੁਰਬਾਣੀ\s+(?:ਦਾ\s+)?(?:ਫੁਰਮਾਨ|ਬਚਨ)\s+ਹੈ", "intro_gurbani_farman"),
        (r"ਗੁਰਬਾਣੀ\s+(?:ਫੁਰਮਾਉਂਦੀ|ਕਹਿੰਦੀ)\s+ਹੈ", "intro_gurbani_says"),
        // "On Ang X"
        (r"ਅੰਗ\s+\d+\s+(?:ਤੇ|ਉੱਤੇ|ਵਿੱਚ)", "intro_ang_ref"),
        (r"ਪੰਨਾ\s+\d+\s+(?:ਤੇ|ਉੱਤੇ)", "intro_page_ref"),
        // "In Raag X"
        (r"ਰਾਗ\s+[\u{0A00}-\u{0A7F}]+\s+(?:ਵਿੱਚ|ਚ)", "intro_raag_ref"),
        // "This shabad/salok says"
        (r"(?:ਇਸ|ਇਹ)\s+ਸ਼ਬਦ\s+(?:ਵਿੱਚ|ਚ)", "intro_shabad_ref"),
        (r"(?:ਇਸ|ਇਹ)\s+ਸਲੋਕ\s+(?:ਵਿੱਚ|ਚ)", "intro_salok_ref"),
        // "Listen to this"
        (r"ਸੁਣੋ\s+(?:ਜੀ)?", "intro_suno"),
        // "The meaning is"
        (r"(?:ਇਸ\s+ਦਾ\s+)?ਅਰਥ\s+ਹੈ", "intro_arth"),
        // Mahala reference
        (r"ਮਹਲਾ\s+[੧੨੩੪੫੬੭੮੯1-9]", "intro_mahala"),
    ])
});

/// Markers that indicate the segment is inside a quote.
static INTERNAL_PATTERNS: Lazy<Vec<NamedPattern>> = Lazy::new(|| {
    patterns(&[
        (r"॥\s*ਰਹਾਉ\s*॥", "quote_rahao"),
        (r"॥\s*\d+\s*॥", "quote_verse_number"),
        (r"ਸਲੋਕ\s+ਮ(?:ਹਲਾ)?\s*[੧੨੩੪੫1-5]", "quote_salok"),
        (r"ਪਉੜੀ\s*॥", "quote_pauri"),
        (r"॥\s*॥", "quote_double_danda"),
    ])
});

static ANG_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"ਅੰਗ\s*(\d+)").expect("static regex"));
/// Code-switched speech cites pages in English ("Ang 917").
static ANG_REF_LATIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Aa]ng\s*(\d+)").expect("static regex"));
static RAAG_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ਰਾਗ\s+([\u{0A00}-\u{0A7F}]+)").expect("static regex"));

/// Minimum archaic-vocabulary density to suggest a quote.
const MIN_VOCAB_DENSITY: f64 = 0.25;

/// Stateful quote context detector. Tracks intro/continuation state across
/// segments within one session.
#[derive(Debug, Default)]
pub struct QuoteContextDetector {
    previous_was_intro: bool,
    quote_in_progress: bool,
}

impl QuoteContextDetector {
    pub fn new() -> Self {
        Self::default()
    }

    fn matched_names(patterns: &[NamedPattern], text: &str) -> Vec<&'static str> {
        patterns
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.name)
            .collect()
    }

    /// Share of distinct Gurmukhi words drawn from the archaic vocabulary.
    pub fn vocab_density(text: &str) -> f64 {
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

    /// Detect quote context in a segment, consuming the carried state.
    pub fn detect(&mut self, text: &str) -> QuoteContextResult {
        let mut signals = Vec::new();
        let mut confidence = 0.0;
        let mut context_type = QuoteContextType::None;

        let intro_matches = Self::matched_names(&INTRO_PATTERNS, text);
        if !intro_matches.is_empty() {
            confidence += 0.3 * intro_matches.len() as f64;
            signals.extend(intro_matches.iter().map(|m| format!("intro:{m}")));
            context_type = QuoteContextType::Intro;
        }

        let internal_matches = Self::matched_names(&INTERNAL_PATTERNS, text);
        if !internal_matches.is_empty() {
            confidence += 0.4 * internal_matches.len() as f64;
            signals.extend(internal_matches.iter().map(|m| format!("internal:{m}")));
            context_type = if self.quote_in_progress {
                QuoteContextType::QuoteMiddle
            } else {
                QuoteContextType::QuoteStart
            };
        }

        let density = Self::vocab_density(text);
        if density >= MIN_VOCAB_DENSITY {
            signals.push(format!("vocab_density:{density:.2}"));
            confidence += density * 0.3;
        }

        if self.previous_was_intro && context_type == QuoteContextType::None {
            signals.push("follows_intro".to_string());
            confidence += 0.3;
            context_type = QuoteContextType::QuoteStart;
        }

        // Continuation: the previous segment was mid-quote and this one still
        // reads archaic (lower density bar for continuations).
        if self.quote_in_progress
            && context_type == QuoteContextType::None
            && density >= 0.15
        {
            signals.push("quote_continuation".to_string());
            confidence += 0.2;
            context_type = QuoteContextType::QuoteMiddle;
        }

        let confidence = confidence.min(1.0);
        let is_quote_intro = context_type == QuoteContextType::Intro;
        let is_quote_likely = confidence >= 0.3
            || matches!(
                context_type,
                QuoteContextType::QuoteStart | QuoteContextType::QuoteMiddle
            );

        self.previous_was_intro = is_quote_intro;
        self.quote_in_progress = matches!(
            context_type,
            QuoteContextType::QuoteStart | QuoteContextType::QuoteMiddle
        );

        QuoteContextResult {
            is_quote_likely,
            is_quote_intro,
            confidence,
            detected_signals: signals,
            context_type,
        }
    }

    /// Build quote candidates from a detection result.
    pub fn candidates(&self, text: &str, result: &QuoteContextResult) -> Vec<QuoteCandidate> {
        if !result.is_quote_likely || text.trim().is_empty() {
            return Vec::new();
        }
        vec![QuoteCandidate {
            text: text.to_string(),
            confidence: result.confidence.max(0.3),
            detection_reason: result
                .detected_signals
                .first()
                .cloned()
                .unwrap_or_else(|| "context".to_string()),
        }]
    }

    /// Extract an Ang (page) reference, if any. Tries the Gurmukhi form
    /// first, then the Latin form.
    pub fn extract_ang_reference(text: &str) -> Option<u32> {
        if let Some(ang) = ANG_REF
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
        {
            return Some(ang);
        }
        ANG_REF_LATIN
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Extract a raag reference, if any.
    pub fn extract_raag_reference(text: &str) -> Option<String> {
        RAAG_REF
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn reset(&mut self) {
        self.previous_was_intro = false;
        self.quote_in_progress = false;
    }
}
