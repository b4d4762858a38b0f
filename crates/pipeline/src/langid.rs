//! Language-route identification
//!
//! Assigns each chunk a [`Route`] from a quick primary-engine pass:
//! language code plus a scripture-likeness heuristic over the transcribed
//! text. Falls back to Punjabi speech when no signal is available.

use katha_core::{Hypothesis, Route};

/// Rule-based route identifier.
#[derive(Debug, Clone)]
pub struct RouteIdentifier {
    punjabi_threshold: f64,
    english_threshold: f64,
}

impl Default for RouteIdentifier {
    fn default() -> Self {
        Self {
            punjabi_threshold: 0.6,
            english_threshold: 0.6,
        }
    }
}

impl RouteIdentifier {
    pub fn new(punjabi_threshold: f64, english_threshold: f64) -> Self {
        Self {
            punjabi_threshold,
            english_threshold,
        }
    }

    /// Identify the route for a chunk from the primary hypothesis.
    pub fn identify(&self, hypothesis: &Hypothesis) -> Route {
        let language = hypothesis.language.to_lowercase();
        let confidence = hypothesis.language_probability.unwrap_or(0.5);

        match language.as_str() {
            "pa" if confidence >= self.punjabi_threshold => {
                if Self::looks_like_scripture(&hypothesis.text) {
                    Route::ScriptureQuoteLikely
                } else {
                    Route::PunjabiSpeech
                }
            }
            "en" if confidence >= self.english_threshold => Route::EnglishSpeech,
            "pa" | "hi" | "ur" => {
                if Self::looks_like_scripture(&hypothesis.text) {
                    Route::ScriptureQuoteLikely
                } else {
                    Route::PunjabiSpeech
                }
            }
            _ => Route::Mixed,
        }
    }

    /// Heuristic scripture check. Majority-Gurmukhi text qualifies only
    /// when it also carries a scripture signal: verse dandas, archaic
    /// vocabulary density, or an explicit scripture term. Plain modern
    /// Punjabi stays on the speech route.
    fn looks_like_scripture(text: &str) -> bool {
        if text.is_empty() {
            return false;
        }

        let gurmukhi = text
            .chars()
            .filter(|&c| ('\u{0A00}'..='\u{0A7F}').contains(&c))
            .count();
        let alnum = text.chars().filter(|c| c.is_alphanumeric()).count();
        if alnum == 0 || (gurmukhi as f64) < 0.5 * alnum as f64 {
            return false;
        }

        if text.contains('॥') {
            return true;
        }

        const SCRIPTURE_INDICATORS: [&str; 5] =
            ["ਵਾਹਿਗੁਰੂ", "ਸਤਿਗੁਰੂ", "ਗੁਰਬਾਣੀ", "ਮਹਲਾ", "ਸਲੋਕ"];
        if SCRIPTURE_INDICATORS.iter().any(|i| text.contains(i)) {
            return true;
        }

        Self::archaic_density(text) >= 0.25
    }

    /// Share of Gurmukhi words drawn from the archaic scripture vocabulary.
    fn archaic_density(text: &str) -> f64 {
        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|w| {
                w.chars().all(|c| ('\u{0A00}'..='\u{0A7F}').contains(&c))
            })
            .collect();
        if words.is_empty() {
            return 0.0;
        }
        let archaic = words
            .iter()
            .filter(|w| katha_lexicon::gurbani_vocabulary().contains(*w))
            .count();
        archaic as f64 / words.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hyp(text: &str, language: &str, prob: f64) -> Hypothesis {
        Hypothesis::new("asr_a", text, 0.8)
            .with_language(language)
            .with_language_probability(prob)
    }

    #[test]
    fn test_punjabi_speech() {
        let route = RouteIdentifier::default().identify(&hyp("ਅੱਜ ਅਸੀਂ ਗੱਲ ਕਰਾਂਗੇ", "pa", 0.9));
        assert_eq!(route, Route::PunjabiSpeech);
    }

    #[test]
    fn test_english_speech() {
        let route =
            RouteIdentifier::default().identify(&hyp("welcome everyone to the program", "en", 0.9));
        assert_eq!(route, Route::EnglishSpeech);
    }

    #[test]
    fn test_scripture_with_verse_markers() {
        let route =
            RouteIdentifier::default().identify(&hyp("ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ ॥", "pa", 0.9));
        assert_eq!(route, Route::ScriptureQuoteLikely);
    }

    #[test]
    fn test_archaic_vocabulary_routes_to_scripture() {
        // No verse markers, but a quarter of the words are archaic forms
        let route =
            RouteIdentifier::default().identify(&hyp("ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ", "pa", 0.9));
        assert_eq!(route, Route::ScriptureQuoteLikely);
    }

    #[test]
    fn test_modern_punjabi_stays_on_speech_route() {
        let route = RouteIdentifier::default()
            .identify(&hyp("ਅੱਜ ਅਸੀਂ ਵਧੀਆ ਗੱਲ ਕਰਾਂਗੇ ਸਾਰੇ ਮਿਲ ਕੇ", "pa", 0.9));
        assert_eq!(route, Route::PunjabiSpeech);
    }

    #[test]
    fn test_hindi_falls_back_to_punjabi_speech() {
        let route = RouteIdentifier::default().identify(&hyp("ਅੱਜ ਦੀ ਗੱਲ", "hi", 0.4));
        assert_eq!(route, Route::PunjabiSpeech);
    }

    #[test]
    fn test_unknown_language_is_mixed() {
        let route = RouteIdentifier::default().identify(&hyp("quelque chose", "fr", 0.8));
        assert_eq!(route, Route::Mixed);
    }

    #[test]
    fn test_low_confidence_english_is_mixed() {
        // Language-probability below threshold and not an Indic fallback
        let route = RouteIdentifier::default().identify(&hyp("some words", "en", 0.3));
        assert_eq!(route, Route::Mixed);
    }
}
