//! Confidence grading of fuzzy matches.

use serde::{Deserialize, Serialize};

/// Confidence level categories for match quality assessment.
///
/// - `High`: near-certain, typically a spelling or spacing variant
/// - `Medium`: plausible, worth a glance before confirming
/// - `Low`: weak, needs a human decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Low confidence (≥ low threshold, < medium threshold).
    Low,
    /// Medium confidence (≥ medium threshold, < high threshold).
    Medium,
    /// High confidence (≥ high threshold).
    High,
}

impl ConfidenceLevel {
    /// Returns a human-readable description of the confidence level.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }
}

/// Configurable thresholds for categorizing match confidence.
///
/// - Below `low`: rejected (no correction is offered)
/// - `low` to `medium`: [`ConfidenceLevel::Low`]
/// - `medium` to `high`: [`ConfidenceLevel::Medium`]
/// - At or above `high`: [`ConfidenceLevel::High`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    /// Minimum similarity for high-quality matches (default: 0.95).
    pub high: f32,
    /// Minimum similarity for medium-quality matches (default: 0.80).
    pub medium: f32,
    /// Minimum similarity for a correction to be offered at all (default: 0.60).
    pub low: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.95,
            medium: 0.80,
            low: crate::DEFAULT_ACCEPT_THRESHOLD,
        }
    }
}

impl ConfidenceThresholds {
    /// Default bands with a custom acceptance floor.
    #[must_use]
    pub fn with_floor(low: f32) -> Self {
        Self {
            low,
            ..Self::default()
        }
    }

    /// Categorizes a similarity score into a confidence level.
    ///
    /// Returns `None` if the score is below the low threshold.
    #[must_use]
    pub fn categorize(&self, score: f32) -> Option<ConfidenceLevel> {
        if score >= self.high {
            Some(ConfidenceLevel::High)
        } else if score >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if score >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }

    pub fn accepts(&self, score: f32) -> bool {
        score >= self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorize_uses_bands() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.categorize(0.97), Some(ConfidenceLevel::High));
        assert_eq!(thresholds.categorize(0.85), Some(ConfidenceLevel::Medium));
        assert_eq!(thresholds.categorize(0.6), Some(ConfidenceLevel::Low));
        assert_eq!(thresholds.categorize(0.59), None);
    }

    #[test]
    fn custom_floor_moves_acceptance() {
        let thresholds = ConfidenceThresholds::with_floor(0.7);
        assert!(!thresholds.accepts(0.65));
        assert!(thresholds.accepts(0.7));
    }
}
