//! Gurmukhi script lock and enforcement
//!
//! Ensures ASR output is constrained to Gurmukhi script only, with repair
//! mechanisms for non-Gurmukhi characters that slip through.

use katha_lexicon::GurmukhiScript;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Script composition metrics for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScriptAnalysis {
    pub total_chars: usize,
    pub gurmukhi_chars: usize,
    pub latin_chars: usize,
    pub devanagari_chars: usize,
    pub arabic_chars: usize,
    pub space_punct_chars: usize,
    pub other_chars: usize,
}

impl ScriptAnalysis {
    /// Gurmukhi chars over all script (non-space, non-punct) chars.
    /// Empty text is pure by definition.
    pub fn script_purity(&self) -> f64 {
        let script_chars = self.gurmukhi_chars
            + self.latin_chars
            + self.devanagari_chars
            + self.arabic_chars
            + self.other_chars;
        if script_chars == 0 {
            return 1.0;
        }
        self.gurmukhi_chars as f64 / script_chars as f64
    }

    /// Latin chars over total chars.
    pub fn latin_ratio(&self) -> f64 {
        if self.total_chars == 0 {
            return 0.0;
        }
        self.latin_chars as f64 / self.total_chars as f64
    }

    pub fn is_pure_gurmukhi(&self) -> bool {
        self.script_purity() >= 0.99
    }
}

/// Per-character script classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Gurmukhi,
    Latin,
    Devanagari,
    Arabic,
    Space,
    Punct,
    Digit,
    Other,
}

fn classify_char(c: char) -> CharClass {
    if matches!(c, ' ' | '\t' | '\n' | '\r') {
        return CharClass::Space;
    }
    if GurmukhiScript::is_allowed_punctuation(c) {
        return CharClass::Punct;
    }
    if GurmukhiScript::is_gurmukhi(c) {
        return CharClass::Gurmukhi;
    }
    if GurmukhiScript::is_devanagari(c) {
        return CharClass::Devanagari;
    }
    if GurmukhiScript::is_arabic(c) {
        return CharClass::Arabic;
    }
    if GurmukhiScript::is_latin(c) {
        return CharClass::Latin;
    }
    if c.is_ascii_digit() {
        return CharClass::Digit;
    }
    CharClass::Other
}

/// Latin-to-Gurmukhi phonetic table. Two-letter combinations are tried
/// before single letters (greedy longest match).
static LATIN_TO_GURMUKHI: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("aa", "ਆ"), ("ee", "ਈ"), ("oo", "ਊ"), ("ai", "ਐ"), ("au", "ਔ"),
        ("kh", "ਖ"), ("gh", "ਘ"), ("ng", "ਙ"), ("ch", "ਚ"), ("chh", "ਛ"),
        ("jh", "ਝ"), ("th", "ਥ"), ("dh", "ਧ"), ("ph", "ਫ"), ("bh", "ਭ"),
        ("sh", "ਸ਼"),
        ("a", "ਅ"), ("i", "ਇ"), ("u", "ਉ"), ("e", "ਏ"), ("o", "ਓ"),
        ("k", "ਕ"), ("g", "ਗ"), ("j", "ਜ"), ("t", "ਤ"), ("d", "ਦ"),
        ("n", "ਨ"), ("p", "ਪ"), ("b", "ਬ"), ("m", "ਮ"), ("y", "ਯ"),
        ("r", "ਰ"), ("l", "ਲ"), ("v", "ਵ"), ("w", "ਵ"), ("s", "ਸ"),
        ("h", "ਹ"), ("x", "ਖ਼"), ("z", "ਜ਼"), ("f", "ਫ਼"), ("q", "ਕ"),
    ])
});

/// Devanagari-to-Gurmukhi character table (vowels, consonants, vowel
/// signs, marks, nukta forms, digits). Values are strings: a few nukta
/// forms have no precomposed Gurmukhi codepoint.
static DEVANAGARI_TO_GURMUKHI: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Vowels
        ('अ', "ਅ"), ('आ', "ਆ"), ('इ', "ਇ"), ('ई', "ਈ"), ('उ', "ਉ"), ('ऊ', "ਊ"),
        ('ए', "ਏ"), ('ऐ', "ਐ"), ('ओ', "ਓ"), ('औ', "ਔ"),
        // Consonants
        ('क', "ਕ"), ('ख', "ਖ"), ('ग', "ਗ"), ('घ', "ਘ"), ('ङ', "ਙ"),
        ('च', "ਚ"), ('छ', "ਛ"), ('ज', "ਜ"), ('झ', "ਝ"), ('ञ', "ਞ"),
        ('ट', "ਟ"), ('ठ', "ਠ"), ('ड', "ਡ"), ('ढ', "ਢ"), ('ण', "ਣ"),
        ('त', "ਤ"), ('थ', "ਥ"), ('द', "ਦ"), ('ध', "ਧ"), ('न', "ਨ"),
        ('प', "ਪ"), ('फ', "ਫ"), ('ब', "ਬ"), ('भ', "ਭ"), ('म', "ਮ"),
        ('य', "ਯ"), ('र', "ਰ"), ('ल', "ਲ"), ('व', "ਵ"),
        ('श', "ਸ਼"), ('ष', "ਸ਼"), ('स', "ਸ"), ('ह', "ਹ"),
        // Vowel signs
        ('ा', "ਾ"), ('ि', "ਿ"), ('ी', "ੀ"), ('ु', "ੁ"), ('ू', "ੂ"),
        ('े', "ੇ"), ('ै', "ੈ"), ('ो', "ੋ"), ('ौ', "ੌ"),
        // Marks
        ('ं', "ੰ"), ('ः', "ਃ"), ('्', "੍"), ('ँ', "ੰ"),
        // Nukta forms
        ('\u{958}', "ਕ਼"), ('\u{959}', "ਖ਼"), ('\u{95a}', "ਗ਼"), ('\u{95b}', "ਜ਼"), ('\u{95e}', "ਫ਼"),
        // Digits
        ('०', "੦"), ('१', "੧"), ('२', "੨"), ('३', "੩"), ('४', "੪"),
        ('५', "੫"), ('६', "੬"), ('७', "੭"), ('८', "੮"), ('९', "੯"),
    ])
});

/// Latin words longer than this are dropped instead of transliterated;
/// long runs are almost always English leakage, not phonetic Gurmukhi.
const MAX_TRANSLITERATION_LEN: usize = 10;

/// Gurmukhi script enforcement and validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLock;

impl ScriptLock {
    pub fn new() -> Self {
        Self
    }

    /// Analyze script composition of text.
    pub fn analyze(&self, text: &str) -> ScriptAnalysis {
        let mut analysis = ScriptAnalysis {
            total_chars: text.chars().count(),
            ..Default::default()
        };

        for c in text.chars() {
            match classify_char(c) {
                CharClass::Gurmukhi => analysis.gurmukhi_chars += 1,
                CharClass::Latin => analysis.latin_chars += 1,
                CharClass::Devanagari => analysis.devanagari_chars += 1,
                CharClass::Arabic => analysis.arabic_chars += 1,
                CharClass::Space | CharClass::Punct | CharClass::Digit => {
                    analysis.space_punct_chars += 1
                }
                CharClass::Other => analysis.other_chars += 1,
            }
        }

        analysis
    }

    /// Validate text for Gurmukhi purity.
    ///
    /// Strict: purity >= 0.95 and latin ratio < 0.02. Lenient: purity >= 0.80.
    pub fn validate(&self, text: &str, strict: bool) -> (bool, ScriptAnalysis) {
        let analysis = self.analyze(text);
        let is_valid = if strict {
            analysis.script_purity() >= 0.95 && analysis.latin_ratio() < 0.02
        } else {
            analysis.script_purity() >= 0.80
        };
        (is_valid, analysis)
    }

    /// Phonetic transliteration of one Latin word, greedy longest-match.
    /// Unknown letters are dropped.
    fn transliterate_latin_word(word: &str) -> String {
        let lower: Vec<char> = word.to_lowercase().chars().collect();
        let mut result = String::new();
        let mut i = 0;

        while i < lower.len() {
            if i + 1 < lower.len() {
                let two: String = lower[i..i + 2].iter().collect();
                if let Some(g) = LATIN_TO_GURMUKHI.get(two.as_str()) {
                    result.push_str(g);
                    i += 2;
                    continue;
                }
            }
            let one = lower[i].to_string();
            if let Some(g) = LATIN_TO_GURMUKHI.get(one.as_str()) {
                result.push_str(g);
            } else if !lower[i].is_alphabetic() {
                result.push(lower[i]);
            }
            i += 1;
        }

        result
    }

    fn convert_devanagari(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match DEVANAGARI_TO_GURMUKHI.get(&c) {
                Some(mapped) => out.push_str(mapped),
                None => out.push(c),
            }
        }
        out
    }

    /// Repair text by converting or removing non-Gurmukhi characters.
    ///
    /// Ordered procedure: Devanagari mapping, Latin transliteration (short
    /// words only), filtering, whitespace collapse. Deterministic and
    /// idempotent after one application.
    pub fn repair(&self, text: &str) -> (String, bool) {
        let original = text;

        // Step 1: Devanagari -> Gurmukhi character table
        let text = Self::convert_devanagari(text);

        // Step 2: transliterate or drop Latin word runs
        let mut converted = String::with_capacity(text.len());
        let mut latin_run = String::new();
        for c in text.chars() {
            if classify_char(c) == CharClass::Latin {
                latin_run.push(c);
            } else {
                if !latin_run.is_empty() {
                    if latin_run.chars().count() <= MAX_TRANSLITERATION_LEN {
                        converted.push_str(&Self::transliterate_latin_word(&latin_run));
                    }
                    latin_run.clear();
                }
                converted.push(c);
            }
        }
        if !latin_run.is_empty() && latin_run.chars().count() <= MAX_TRANSLITERATION_LEN {
            converted.push_str(&Self::transliterate_latin_word(&latin_run));
        }

        // Step 3: keep Gurmukhi, whitespace, digits and allowed punctuation
        let filtered: String = converted
            .chars()
            .filter(|&c| {
                matches!(
                    classify_char(c),
                    CharClass::Gurmukhi | CharClass::Space | CharClass::Digit | CharClass::Punct
                )
            })
            .collect();

        // Step 4: collapse runs of spaces
        let mut repaired = String::with_capacity(filtered.len());
        let mut last_was_space = false;
        for c in filtered.chars() {
            if c == ' ' {
                if !last_was_space {
                    repaired.push(c);
                }
                last_was_space = true;
            } else {
                repaired.push(c);
                last_was_space = false;
            }
        }
        let repaired = repaired.trim().to_string();

        let was_modified = repaired != original;
        if was_modified {
            tracing::debug!(
                original_len = original.chars().count(),
                repaired_len = repaired.chars().count(),
                "script repair modified text"
            );
        }

        (repaired, was_modified)
    }

    /// Enforce Gurmukhi script: validate, repairing on failure.
    ///
    /// Repair is best-effort; if the repaired text still fails strict
    /// validation it is returned anyway with `was_repaired = true`.
    pub fn enforce(&self, text: &str, strict: bool) -> (String, ScriptAnalysis, bool) {
        let (is_valid, analysis) = self.validate(text, strict);
        if is_valid {
            return (text.to_string(), analysis, false);
        }

        let (repaired, _) = self.repair(text);
        let (_, new_analysis) = self.validate(&repaired, strict);
        (repaired, new_analysis, true)
    }
}
