//! Gurmukhi text processing
//!
//! Three post-ASR stages that keep output inside the Gurbani domain:
//! - [`ScriptLock`]: per-character script classification, validation and
//!   repair (Devanagari mapping, phonetic Latin transliteration, filtering)
//! - [`DriftDetector`]: multi-signal drift diagnosis with severity and
//!   remediation recommendations
//! - [`DomainCorrector`]: bounded-edit spelling correction constrained to
//!   the scripture lexicon

pub mod corrector;
pub mod drift;
pub mod normalize;
pub mod script_lock;

pub use corrector::{CorrectionCandidate, CorrectionResult, CorrectionStats, DomainCorrector};
pub use drift::{DriftDetector, DriftDiagnostic, DriftSeverity, DriftType};
pub use normalize::{normalize, tokenize_gurmukhi};
pub use script_lock::{ScriptAnalysis, ScriptLock};
