//! Transcription orchestrator
//!
//! Drives the per-chunk pipeline: (optional) denoise -> VAD chunking ->
//! route identification -> multi-engine fusion -> script lock -> drift
//! detection -> domain correction -> scripture matching. Batch mode
//! aggregates segments and metrics; live mode emits draft and verified
//! events per chunk.

pub mod events;
pub mod orchestrator;
pub mod prompt;
pub mod session;

pub use events::{DraftEvent, ErrorEvent, LiveEvent, VerifiedEvent};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use prompt::gurbani_prompt;
pub use session::{LiveSession, StreamChunk};
