#![deny(unsafe_code)]

//! Fuzzy matching of raw catalog values against controlled vocabularies.
//!
//! Authorities are indexed once per run ([`SearchIndex`]); every lookup then
//! compares against precomputed normalized keys.

pub mod engine;
pub mod index;
pub mod policy;
pub mod score;
pub mod utils;

pub use engine::{ConfidenceLevel, ConfidenceThresholds};
pub use index::{IndexHit, SearchIndex};
pub use policy::{CorrectionPrompt, CorrectionRequest, ResolutionMode, ResolutionPolicy};
pub use utils::{normalize_text, sort_tokens};

/// Minimum similarity for a correction to be offered.
pub const DEFAULT_ACCEPT_THRESHOLD: f32 = 0.6;
/// Candidates computed for an unresolved role.
pub const ROLE_CANDIDATE_LIMIT: usize = 5;
/// Candidates listed per value in a match report.
pub const REPORT_CANDIDATE_LIMIT: usize = 4;
