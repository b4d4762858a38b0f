//! Curated Gurmukhi vocabulary tables
//!
//! These are closed sets drawn from the scripture corpus: function words and
//! particles, honorifics and author names, raag names, theological terms,
//! and the archaic-word sets used for quote detection and semantic keyword
//! matching.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Common Gurbani function words and particles.
static COMMON_PARTICLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Conjunctions and particles
        "ਤੇ", "ਕੇ", "ਕਾ", "ਕੀ", "ਕੋ", "ਨੂੰ", "ਨੇ", "ਦਾ", "ਦੀ", "ਦੇ",
        "ਜੋ", "ਸੋ", "ਜੇ", "ਹੈ", "ਹੋ", "ਹਿ", "ਹਉ", "ਹਮ", "ਤੂੰ", "ਤੂ",
        "ਮੈ", "ਮੇਰਾ", "ਮੇਰੀ", "ਮੇਰੇ", "ਤੇਰਾ", "ਤੇਰੀ", "ਤੇਰੇ",
        "ਇਹ", "ਇਸ", "ਉਹ", "ਉਸ", "ਕਿਸ", "ਜਿਸ", "ਕਿਉ", "ਕਿਉਂ",
        "ਨਾ", "ਨਹੀ", "ਨਹੀਂ", "ਬਿਨ", "ਬਿਨੁ", "ਬਿਨਾ",
        "ਸਭ", "ਸਭੁ", "ਸਭਿ", "ਸਗਲ", "ਸਗਲੀ",
        "ਏਕ", "ਏਕੁ", "ਇਕ", "ਇਕੁ", "ਦੋ", "ਦੁਇ", "ਤਿਨ", "ਤੀਨ",
        // Common verbs
        "ਹੋਇ", "ਹੋਵੈ", "ਹੋਆ", "ਹੋਈ", "ਕਰ", "ਕਰਿ", "ਕਰੇ", "ਕਰੈ", "ਕੀਆ",
        "ਆਵੈ", "ਆਇ", "ਆਇਆ", "ਜਾਇ", "ਜਾਵੈ", "ਗਇਆ", "ਗਈ",
        "ਦੇਇ", "ਦੇਵੈ", "ਦਿਤਾ", "ਲੇਇ", "ਲੈ", "ਲੀਆ",
        "ਮਿਲੈ", "ਮਿਲਿ", "ਮਿਲਿਆ", "ਪਾਇ", "ਪਾਵੈ", "ਪਾਇਆ",
        // Common nouns and theological terms
        "ਮਨ", "ਮਨੁ", "ਮਨਿ", "ਹਰਿ", "ਰਾਮ", "ਪ੍ਰਭ", "ਪ੍ਰਭੁ",
        "ਗੁਰ", "ਗੁਰੁ", "ਸਤਿਗੁਰ", "ਸਤਿਗੁਰੁ",
        "ਨਾਮ", "ਨਾਮੁ", "ਨਾਮਿ", "ਸਬਦ", "ਸਬਦੁ", "ਸਬਦਿ",
        "ਜੀਉ", "ਜੀਅ", "ਪ੍ਰਾਣ", "ਪ੍ਰਾਣੀ", "ਜਗ", "ਜਗਤ", "ਜਗਤੁ",
        "ਸਾਚ", "ਸਾਚਾ", "ਸਾਚੀ", "ਸਾਚੁ", "ਸਚੁ", "ਸਚਾ", "ਸਚੀ",
        "ਪਾਪ", "ਪੁੰਨ", "ਧਰਮ", "ਧਰਮੁ", "ਕਰਮ", "ਕਰਮੁ",
        "ਮਾਇਆ", "ਭਗਤ", "ਭਗਤਿ", "ਸੇਵ", "ਸੇਵਾ", "ਸਿਮਰ", "ਸਿਮਰਨ",
    ]
    .into_iter()
    .collect()
});

/// Honorifics and bhagat/author names.
static HONORIFICS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ਜੀ", "ਜੀਉ", "ਸਾਹਿਬ", "ਸ੍ਰੀ", "ਭਾਈ", "ਬਾਬਾ",
        "ਮਹਲਾ", "ਮਹਲ", "ਗੁਰੂ", "ਦੇਵ", "ਦਾਸ", "ਸੇਵਕ",
        "ਨਾਨਕ", "ਕਬੀਰ", "ਰਵਿਦਾਸ", "ਫਰੀਦ", "ਨਾਮਦੇਵ",
        "ਤ੍ਰਿਲੋਚਨ", "ਬੇਣੀ", "ਧੰਨਾ", "ਪੀਪਾ", "ਸੈਣ",
        "ਸੂਰਦਾਸ", "ਪਰਮਾਨੰਦ", "ਸਧਨਾ", "ਰਾਮਾਨੰਦ", "ਜੈਦੇਵ",
    ]
    .into_iter()
    .collect()
});

/// Raag names under which scripture is organized.
static RAAG_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ਸਿਰੀ", "ਮਾਝ", "ਗਉੜੀ", "ਆਸਾ", "ਗੂਜਰੀ", "ਦੇਵਗੰਧਾਰੀ",
        "ਬਿਹਾਗੜਾ", "ਵਡਹੰਸ", "ਸੋਰਠਿ", "ਧਨਾਸਰੀ", "ਜੈਤਸਰੀ",
        "ਟੋਡੀ", "ਬੈਰਾੜੀ", "ਤਿਲੰਗ", "ਸੂਹੀ", "ਬਿਲਾਵਲ",
        "ਗੋਂਡ", "ਰਾਮਕਲੀ", "ਨਟ", "ਮਾਲੀ", "ਮਾਰੂ",
        "ਤੁਖਾਰੀ", "ਕੇਦਾਰਾ", "ਭੈਰਉ", "ਬਸੰਤ", "ਸਾਰੰਗ",
        "ਮਲਾਰ", "ਕਾਨੜਾ", "ਕਲਿਆਣ", "ਪ੍ਰਭਾਤੀ", "ਜੈਜਾਵੰਤੀ",
    ]
    .into_iter()
    .collect()
});

/// Core theological terms beyond the particle set.
static THEOLOGICAL_TERMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ਵਾਹਿਗੁਰੂ", "ਗੋਬਿੰਦ", "ਗੋਪਾਲ", "ਨਾਰਾਇਣ", "ਮਾਧੋ", "ਮੁਰਾਰਿ", "ਠਾਕੁਰ",
        "ਹੁਕਮ", "ਹੁਕਮੁ", "ਹੁਕਮਿ", "ਬਾਣੀ", "ਗੁਰਬਾਣੀ",
        "ਮੁਕਤਿ", "ਮੋਖ", "ਨਿਰਵਾਣ", "ਅਨੰਦ", "ਸੁਖ", "ਦੁਖ", "ਸਾਂਤਿ",
        "ਪ੍ਰੇਮ", "ਪਿਆਰ", "ਸਿਫਤਿ", "ਸਾਲਾਹ", "ਕਿਰਪਾ", "ਮਿਹਰ", "ਨਦਰਿ",
        "ਹਉਮੈ", "ਅਹੰਕਾਰ", "ਮੋਹ", "ਲੋਭ", "ਕਾਮ", "ਕ੍ਰੋਧ",
        "ਜਪ", "ਜਪੁ", "ਤਪ", "ਤਪੁ", "ਦਾਨ", "ਦਾਨੁ", "ਇਸਨਾਨ", "ਪੂਜਾ",
        "ਧਿਆਨ", "ਧਿਆਨੁ", "ਸੰਗਤ", "ਸਾਧ", "ਜਨਮ", "ਮਰਣ", "ਜੀਵਨ",
    ]
    .into_iter()
    .collect()
});

/// High-frequency archaic forms used to score Gurbani vocabulary density
/// when detecting quote candidates.
static GURBANI_VOCABULARY: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Divine names (archaic forms)
        "ਹਰਿ", "ਪ੍ਰਭ", "ਪ੍ਰਭੁ", "ਗੋਬਿੰਦ", "ਗੋਪਾਲ", "ਮਾਧੋ",
        // Core concepts
        "ਨਾਮੁ", "ਨਾਮਿ", "ਸਬਦੁ", "ਸਬਦਿ", "ਹੁਕਮੁ", "ਹੁਕਮਿ",
        // Archaic verb forms
        "ਹੋਇ", "ਹੋਵੈ", "ਕਰੈ", "ਜਪੈ", "ਮਿਲੈ", "ਪਾਵੈ",
        // Archaic suffixes
        "ਕਉ", "ਤਉ", "ਜਉ", "ਸਉ",
        // Spiritual terms
        "ਮੁਕਤਿ", "ਜੁਗਤਿ", "ਭਗਤਿ", "ਬਿਰਤਿ",
        // Sant Bhasha markers
        "ਮੋਹਿ", "ਤੋਹਿ", "ਕਾਹੂ", "ਜਾਹੂ", "ਜੀਉ", "ਸਾਚੁ", "ਸਾਚਾ",
    ]
    .into_iter()
    .collect()
});

/// Critical keywords (divine names, honorifics) for semantic verification of
/// quote matches: a candidate line should carry the same critical keywords
/// as the spoken text.
static GURBANI_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ਵਾਹਿਗੁਰੂ", "ਸਤਿਗੁਰੂ", "ਸਤਿਗੁਰ", "ਗੁਰੂ", "ਗੁਰ", "ਬਾਣੀ", "ਗੁਰਬਾਣੀ",
        "ਸਬਦ", "ਸਬਦੁ", "ਪ੍ਰਭੂ", "ਪ੍ਰਭ", "ਪ੍ਰਭੁ", "ਰਾਮ", "ਹਰਿ", "ਗੋਬਿੰਦ",
        "ਕਿਰਪਾ", "ਮਿਹਰ", "ਸਤਿ", "ਨਾਮੁ", "ਕਰਤਾ", "ਪੁਰਖੁ",
    ]
    .into_iter()
    .collect()
});

pub fn common_particles() -> &'static HashSet<&'static str> {
    &COMMON_PARTICLES
}

pub fn honorifics() -> &'static HashSet<&'static str> {
    &HONORIFICS
}

pub fn raag_names() -> &'static HashSet<&'static str> {
    &RAAG_NAMES
}

pub fn theological_terms() -> &'static HashSet<&'static str> {
    &THEOLOGICAL_TERMS
}

pub fn gurbani_vocabulary() -> &'static HashSet<&'static str> {
    &GURBANI_VOCABULARY
}

pub fn gurbani_keywords() -> &'static HashSet<&'static str> {
    &GURBANI_KEYWORDS
}
