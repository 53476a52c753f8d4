// src/detector/mod.rs — Correction detection engine
//
// Pure and synchronous: (message, optional prior turn) -> DetectionResult.
// Storage and hook plumbing live outside this module.

pub mod context;
pub mod directive;
pub mod extract;
pub mod scorer;
pub mod signals;
pub mod skip;
pub mod types;

pub use context::PriorTurnRecord;
pub use directive::render_directive;
pub use extract::extract_bad_example;
pub use scorer::{Scorer, Thresholds};
pub use signals::{CategoryCue, ContextSignal, Signal, SignalTable, Validator};
pub use skip::is_skip;
pub use types::{Category, ConfidenceLabel, DetectionResult};
