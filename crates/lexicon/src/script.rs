//! Gurmukhi script predicates
//!
//! Character classification uses explicit Unicode-range checks rather than
//! library category lookups so behaviour is identical across locales.

/// Unicode ranges and character sets for Gurmukhi script validation.
pub struct GurmukhiScript;

impl GurmukhiScript {
    /// Main Gurmukhi Unicode block.
    pub const RANGE_START: u32 = 0x0A00;
    pub const RANGE_END: u32 = 0x0A7F;

    pub const DEVANAGARI_START: u32 = 0x0900;
    pub const DEVANAGARI_END: u32 = 0x097F;

    pub const ARABIC_START: u32 = 0x0600;
    pub const ARABIC_END: u32 = 0x06FF;

    /// Basic Latin letters A-Z / a-z.
    pub const LATIN_BASIC_START: u32 = 0x0041;
    pub const LATIN_BASIC_END: u32 = 0x007A;

    /// Extended Latin.
    pub const LATIN_EXT_START: u32 = 0x00C0;
    pub const LATIN_EXT_END: u32 = 0x024F;

    /// Whitespace plus punctuation permitted in Gurbani output, including
    /// the traditional danda marks.
    pub const ALLOWED_PUNCTUATION: &'static str = " \t\n,.;:!?-'\"()[]{}।॥੶";

    pub fn is_gurmukhi(c: char) -> bool {
        let cp = c as u32;
        (Self::RANGE_START..=Self::RANGE_END).contains(&cp)
    }

    pub fn is_devanagari(c: char) -> bool {
        let cp = c as u32;
        (Self::DEVANAGARI_START..=Self::DEVANAGARI_END).contains(&cp)
    }

    pub fn is_arabic(c: char) -> bool {
        let cp = c as u32;
        (Self::ARABIC_START..=Self::ARABIC_END).contains(&cp)
    }

    pub fn is_latin(c: char) -> bool {
        let cp = c as u32;
        ((Self::LATIN_BASIC_START..=Self::LATIN_BASIC_END).contains(&cp) && c.is_ascii_alphabetic())
            || (Self::LATIN_EXT_START..=Self::LATIN_EXT_END).contains(&cp)
    }

    pub fn is_allowed_punctuation(c: char) -> bool {
        Self::ALLOWED_PUNCTUATION.contains(c)
    }

    pub fn is_ascii_digit(c: char) -> bool {
        c.is_ascii_digit()
    }

    /// Allowed in enforced Gurbani output: Gurmukhi, whitelisted punctuation
    /// or an ASCII digit.
    pub fn is_allowed(c: char) -> bool {
        Self::is_gurmukhi(c) || Self::is_allowed_punctuation(c) || Self::is_ascii_digit(c)
    }
}
