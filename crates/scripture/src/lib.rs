//! Scripture quote detection, matching and tracking
//!
//! Pipeline per candidate: detection (intro phrases, verse markers,
//! vocabulary density) -> multi-stage matching (exact, semantic
//! short-circuit, fuzzy retrieval with verification) -> canonical
//! replacement when confidence warrants. Live sessions additionally track
//! the current shabad to bias matching toward the expected next line.

pub mod context_detector;
pub mod matcher;
pub mod replacement;
pub mod shabad;

pub use context_detector::{QuoteContextDetector, QuoteContextResult, QuoteContextType};
pub use matcher::{AssistedMatcher, MatcherConfig};
pub use replacement::apply_quote_match;
pub use shabad::{AudioMode, ShabadContext, ShabadTracker};
