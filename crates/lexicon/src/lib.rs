//! Lexicon and script policy for Gurbani transcription
//!
//! Provides:
//! - Gurmukhi script-range predicates and the allowed character set
//! - Domain modes with per-register priority weights
//! - Curated particle/honorific/raag/theological vocabulary
//! - A buildable, persistable domain lexicon with word frequencies

pub mod data;
pub mod domains;
pub mod lexicon;
pub mod script;

pub use data::{
    common_particles, gurbani_keywords, gurbani_vocabulary, honorifics, raag_names,
    theological_terms,
};
pub use domains::{register_priorities, DomainPriorities, LanguageRegister};
pub use lexicon::{Lexicon, LexiconBuilder};
pub use script::GurmukhiScript;

pub use katha_config::DomainMode;
