//! Anti-drift validation for Gurbani transcription
//!
//! Detects when ASR output drifts from the expected Gurbani domain into
//! modern slang, English, or unrelated languages, and recommends a remedy.

use crate::normalize::tokenize_gurmukhi;
use crate::script_lock::{ScriptAnalysis, ScriptLock};
use katha_config::DomainMode;
use katha_lexicon::Lexicon;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Severity levels for drift detection, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftSeverity {
    None,
    /// Minor drift, likely acceptable.
    Low,
    /// Moderate drift, correction recommended.
    Medium,
    /// Significant drift, re-decode recommended.
    High,
    /// Likely garbage output.
    Critical,
}

/// Types of drift detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftType {
    /// Devanagari or Arabic characters present.
    ScriptMix,
    /// English words or phrases.
    EnglishDrift,
    /// High out-of-vocabulary ratio.
    HighOov,
    /// URLs or email addresses.
    Url,
    /// Hindi-English mix patterns in Latin script.
    Hinglish,
    /// Modern slang or colloquialisms.
    Slang,
    /// Emoji codepoints.
    Emoji,
    /// Script purity below threshold.
    LowPurity,
}

/// Diagnostic results from drift detection.
#[derive(Debug, Clone)]
pub struct DriftDiagnostic {
    pub script_purity: f64,
    pub latin_ratio: f64,
    pub oov_ratio: f64,
    pub script_analysis: ScriptAnalysis,
    pub severity: DriftSeverity,
    pub drift_types: Vec<DriftType>,
    pub english_sequences: Vec<String>,
    pub oov_words: Vec<String>,
    pub should_redecode: bool,
    pub should_correct: bool,
    pub should_reject: bool,
}

impl DriftDiagnostic {
    fn clean() -> Self {
        Self {
            script_purity: 1.0,
            latin_ratio: 0.0,
            oov_ratio: 0.0,
            script_analysis: ScriptAnalysis::default(),
            severity: DriftSeverity::None,
            drift_types: Vec::new(),
            english_sequences: Vec::new(),
            oov_words: Vec::new(),
            should_redecode: false,
            should_correct: false,
            should_reject: false,
        }
    }

    pub fn has_drift(&self, drift_type: DriftType) -> bool {
        self.drift_types.contains(&drift_type)
    }
}

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)https?://\S+|www\.\S+|[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
    )
    .expect("static regex")
});

/// Three or more consecutive Latin words.
static ENGLISH_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[A-Za-z]+\s+){2,}[A-Za-z]+").expect("static regex"));

static EMOJI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "[\u{1F600}-\u{1F64F}\u{1F300}-\u{1F5FF}\u{1F680}-\u{1F6FF}\u{1F1E0}-\u{1F1FF}\u{2702}-\u{27B0}\u{1F900}-\u{1F9FF}]",
    )
    .expect("static regex")
});

/// Hindi function words written in Latin script.
static HINGLISH_MARKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "hai", "hain", "ho", "tha", "thi", "the",
        "ka", "ki", "ke", "ko", "se", "mein", "par",
        "aur", "lekin", "toh", "bhi", "kya", "kyun",
        "nahi", "nahin", "ji", "jee", "bahut", "achha",
        "acha", "theek", "thik", "ok", "okay",
    ]
    .into_iter()
    .collect()
});

static MODERN_SLANG: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "lol", "omg", "btw", "brb", "idk", "fyi",
        "cool", "bro", "dude", "guys", "like",
        "literally", "basically", "actually", "random",
    ]
    .into_iter()
    .collect()
});

/// Multi-signal drift detector.
pub struct DriftDetector {
    mode: DomainMode,
    lexicon: Arc<Lexicon>,
    script_lock: ScriptLock,
    script_purity_threshold: f64,
    latin_ratio_threshold: f64,
    oov_ratio_threshold: f64,
}

impl DriftDetector {
    pub fn new(mode: DomainMode, lexicon: Arc<Lexicon>) -> Self {
        Self {
            mode,
            lexicon,
            script_lock: ScriptLock::new(),
            script_purity_threshold: 0.95,
            latin_ratio_threshold: 0.02,
            oov_ratio_threshold: 0.15,
        }
    }

    pub fn with_thresholds(
        mut self,
        script_purity: f64,
        latin_ratio: f64,
        oov_ratio: f64,
    ) -> Self {
        self.script_purity_threshold = script_purity;
        self.latin_ratio_threshold = latin_ratio;
        self.oov_ratio_threshold = oov_ratio;
        self
    }

    /// Gurmukhi words (length >= 2) absent from the domain lexicon.
    fn oov_ratio(&self, text: &str) -> (f64, Vec<String>) {
        let words = tokenize_gurmukhi(text);
        if words.is_empty() {
            return (0.0, Vec::new());
        }

        let oov: Vec<String> = words
            .iter()
            .filter(|w| w.chars().count() >= 2 && !self.lexicon.contains(w, self.mode))
            .map(|w| w.to_string())
            .collect();

        (oov.len() as f64 / words.len() as f64, oov)
    }

    fn english_sequences(text: &str) -> Vec<String> {
        ENGLISH_SEQUENCE
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| s.split_whitespace().count() >= 3)
            .collect()
    }

    fn detect_hinglish(text: &str) -> bool {
        let lower = text.to_lowercase();
        let words: HashSet<&str> = lower.unicode_words().collect();
        words
            .iter()
            .filter(|w| HINGLISH_MARKERS.contains(**w))
            .count()
            >= 2
    }

    fn detect_slang(text: &str) -> bool {
        let lower = text.to_lowercase();
        lower.unicode_words().any(|w| MODERN_SLANG.contains(w))
    }

    /// Severity ladder, evaluated top-down; first match wins.
    fn classify_severity(
        &self,
        script_purity: f64,
        latin_ratio: f64,
        oov_ratio: f64,
        drift_types: &[DriftType],
    ) -> DriftSeverity {
        if script_purity < 0.5 || drift_types.contains(&DriftType::Url) {
            return DriftSeverity::Critical;
        }

        let high_conditions = [
            script_purity < 0.80,
            latin_ratio > 0.10,
            drift_types.len() >= 3,
            drift_types.contains(&DriftType::EnglishDrift) && latin_ratio > 0.05,
        ];
        if high_conditions.iter().filter(|&&c| c).count() >= 2 {
            return DriftSeverity::High;
        }

        let medium_conditions = [
            script_purity < self.script_purity_threshold,
            latin_ratio > self.latin_ratio_threshold,
            oov_ratio > self.oov_ratio_threshold,
            drift_types.len() >= 2,
        ];
        if medium_conditions.iter().filter(|&&c| c).count() >= 2 {
            return DriftSeverity::Medium;
        }

        if !drift_types.is_empty() || script_purity < 0.98 {
            return DriftSeverity::Low;
        }

        DriftSeverity::None
    }

    /// Detect drift in transcription output.
    pub fn detect(&self, text: &str) -> DriftDiagnostic {
        if text.trim().is_empty() {
            return DriftDiagnostic::clean();
        }

        let script_analysis = self.script_lock.analyze(text);
        let script_purity = script_analysis.script_purity();
        let latin_ratio = script_analysis.latin_ratio();
        let (oov_ratio, oov_words) = self.oov_ratio(text);

        let mut drift_types = Vec::new();

        if script_purity < self.script_purity_threshold {
            drift_types.push(DriftType::LowPurity);
        }
        if script_analysis.devanagari_chars > 0 || script_analysis.arabic_chars > 0 {
            drift_types.push(DriftType::ScriptMix);
        }

        let english_sequences = Self::english_sequences(text);
        if !english_sequences.is_empty() || latin_ratio > self.latin_ratio_threshold {
            drift_types.push(DriftType::EnglishDrift);
        }

        if URL_PATTERN.is_match(text) {
            drift_types.push(DriftType::Url);
        }
        if Self::detect_hinglish(text) {
            drift_types.push(DriftType::Hinglish);
        }
        if Self::detect_slang(text) {
            drift_types.push(DriftType::Slang);
        }
        if EMOJI_PATTERN.is_match(text) {
            drift_types.push(DriftType::Emoji);
        }
        if oov_ratio > self.oov_ratio_threshold {
            drift_types.push(DriftType::HighOov);
        }

        let severity = self.classify_severity(script_purity, latin_ratio, oov_ratio, &drift_types);

        let should_reject = severity == DriftSeverity::Critical;
        let should_redecode = severity >= DriftSeverity::High;
        let should_correct = matches!(severity, DriftSeverity::Low | DriftSeverity::Medium);

        DriftDiagnostic {
            script_purity,
            latin_ratio,
            oov_ratio,
            script_analysis,
            severity,
            drift_types,
            english_sequences,
            oov_words,
            should_redecode,
            should_correct,
            should_reject,
        }
    }

    /// Check if text is at or below a maximum acceptable severity.
    pub fn is_acceptable(&self, text: &str, max_severity: DriftSeverity) -> bool {
        self.detect(text).severity <= max_severity
    }

    /// Validate against the configured thresholds.
    /// Returns `(script_ok, latin_ok, oov_ok)`.
    pub fn validate_thresholds(&self, text: &str) -> (bool, bool, bool) {
        let d = self.detect(text);
        (
            d.script_purity >= self.script_purity_threshold,
            d.latin_ratio <= self.latin_ratio_threshold,
            d.oov_ratio <= self.oov_ratio_threshold,
        )
    }
}
