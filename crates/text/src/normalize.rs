//! Unicode normalization and tokenization helpers
//!
//! All text entering comparison, tokenization or storage is normalized at
//! ingress; Gurmukhi diacritic ordering varies between sources and would
//! otherwise produce false negatives in matching.

use katha_config::UnicodeForm;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static GURMUKHI_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{0A00}-\u{0A7F}]+").expect("static regex"));

/// Apply the configured Unicode normalization form.
pub fn normalize(text: &str, form: UnicodeForm) -> String {
    match form {
        UnicodeForm::NFC => text.nfc().collect(),
        UnicodeForm::NFD => text.nfd().collect(),
        UnicodeForm::NFKC => text.nfkc().collect(),
        UnicodeForm::NFKD => text.nfkd().collect(),
    }
}

/// Extract Gurmukhi words from text, in order.
pub fn tokenize_gurmukhi(text: &str) -> Vec<&str> {
    GURMUKHI_WORD.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_idempotent() {
        let text = "ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ";
        let once = normalize(text, UnicodeForm::NFC);
        let twice = normalize(&once, UnicodeForm::NFC);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_tokenize_skips_latin() {
        let tokens = tokenize_gurmukhi("ਹਰਿ hello ਨਾਮੁ 42 ਜਪੋ");
        assert_eq!(tokens, vec!["ਹਰਿ", "ਨਾਮੁ", "ਜਪੋ"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize_gurmukhi("only english here").is_empty());
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(s in "\\PC*") {
            for form in [UnicodeForm::NFC, UnicodeForm::NFD, UnicodeForm::NFKC, UnicodeForm::NFKD] {
                let once = normalize(&s, form);
                let twice = normalize(&once, form);
                prop_assert_eq!(&once, &twice);
            }
        }
    }
}
