//! Human-in-the-loop correction protocol.
//!
//! Validation code asks a [`ResolutionPolicy`] whether a proposed substitution
//! may be applied; it never talks to a terminal itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A proposed substitution of a raw value by an authority key.
#[derive(Debug, Clone, Copy)]
pub struct CorrectionRequest<'a> {
    /// Canonical field (or "role") the value belongs to.
    pub field: &'a str,
    pub original: &'a str,
    pub suggestion: &'a str,
    pub score: f32,
    /// Records exhibiting the original value.
    pub unit_ids: &'a [String],
}

/// Answers correction requests, typically by asking an operator.
pub trait CorrectionPrompt {
    fn confirm(&mut self, request: &CorrectionRequest<'_>) -> bool;
}

impl<F> CorrectionPrompt for F
where
    F: FnMut(&CorrectionRequest<'_>) -> bool,
{
    fn confirm(&mut self, request: &CorrectionRequest<'_>) -> bool {
        self(request)
    }
}

/// Configured resolution behaviour, without the prompt handler itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    AutoAccept,
    #[default]
    AutoReject,
    Prompt,
}

/// Decides whether proposed corrections are applied.
pub enum ResolutionPolicy {
    AutoAccept,
    AutoReject,
    Prompt(Box<dyn CorrectionPrompt>),
}

impl ResolutionPolicy {
    pub fn prompt(handler: impl CorrectionPrompt + 'static) -> Self {
        Self::Prompt(Box::new(handler))
    }

    pub fn mode(&self) -> ResolutionMode {
        match self {
            Self::AutoAccept => ResolutionMode::AutoAccept,
            Self::AutoReject => ResolutionMode::AutoReject,
            Self::Prompt(_) => ResolutionMode::Prompt,
        }
    }

    /// Returns true when the substitution should be applied.
    ///
    /// A `Prompt` policy blocks until its handler answers.
    pub fn decide(&mut self, request: &CorrectionRequest<'_>) -> bool {
        let accepted = match self {
            Self::AutoAccept => true,
            Self::AutoReject => false,
            Self::Prompt(handler) => handler.confirm(request),
        };
        debug!(
            field = request.field,
            score = request.score,
            accepted,
            "correction decided"
        );
        accepted
    }
}

impl fmt::Debug for ResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoAccept => f.write_str("AutoAccept"),
            Self::AutoReject => f.write_str("AutoReject"),
            Self::Prompt(_) => f.write_str("Prompt(..)"),
        }
    }
}
