//! Decoder prompt seeding
//!
//! Prompt-capable engines accept an initial prompt that biases decoding
//! toward authentic Gurbani vocabulary. The Mool Mantar plus high-frequency
//! corpus words anchor the register; scripture-context chunks get verse
//! markers as well.

use katha_config::DomainMode;
use katha_core::Route;

/// Whisper-style prompts cap out near 224 tokens.
const MAX_PROMPT_CHARS: usize = 224;

const MOOL_MANTAR: &str =
    "ੴ ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ ਨਿਰਭਉ ਨਿਰਵੈਰੁ ਅਕਾਲ ਮੂਰਤਿ ਅਜੂਨੀ ਸੈਭੰ ਗੁਰ ਪ੍ਰਸਾਦਿ";

const SGGS_SEED: &str = "ਹਰਿ ਪ੍ਰਭ ਨਾਮੁ ਸਬਦੁ ਗੁਰ ਸਤਿਗੁਰ ਗੁਰਬਾਣੀ ਮਨੁ ਜੀਉ ਹੁਕਮੁ ਭਗਤਿ ਸਿਮਰਨ ਨਾਨਕ ਮਹਲਾ";

const DASAM_SEED: &str = "ਸ੍ਰੀ ਭਗਉਤੀ ਅਕਾਲ ਪੁਰਖ ਖੰਡਾ ਚੰਡੀ ਜੁੱਧ ਵੀਰ ਨਮਸਕਾਰ ਵਾਹਿਗੁਰੂ ਸਤਿ";

const SCRIPTURE_MARKERS: &str = "ਰਹਾਉ ॥ ਪਉੜੀ ॥ ਸਲੋਕ ਮਹਲਾ";

/// Build the initial decoding prompt for a chunk.
pub fn gurbani_prompt(mode: DomainMode, route: Option<Route>) -> String {
    let seed = match mode {
        DomainMode::Sggs | DomainMode::Generic => SGGS_SEED,
        DomainMode::Dasam => DASAM_SEED,
    };

    let mut prompt = format!("{MOOL_MANTAR} {seed}");
    if route == Some(Route::ScriptureQuoteLikely) {
        prompt.push(' ');
        prompt.push_str(SCRIPTURE_MARKERS);
    }

    if prompt.chars().count() > MAX_PROMPT_CHARS {
        prompt = prompt.chars().take(MAX_PROMPT_CHARS).collect();
    }
    prompt
}
