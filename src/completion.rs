//! Two-phase completion: candidate synthesis, then per-item resolve.

pub mod candidate;
pub mod prepare;
pub mod resolve;
pub mod suffix;
pub mod synthesize;

pub use candidate::{CandidateData, CandidateKind, CompletionCandidate};
pub use prepare::{MarkerKind, PreparedSource, prepare};
pub use resolve::resolve;
pub use suffix::resolve_suffix;
pub use synthesize::complete;
