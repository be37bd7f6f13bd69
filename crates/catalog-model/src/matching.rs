use serde::{Deserialize, Serialize};

/// A ranked authority term proposed for a raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub term: String,
    /// Similarity in `0.0..=1.0`.
    pub score: f32,
}

/// Outcome of fuzzy-matching one raw value against an authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub value: String,
    /// Candidates ranked by descending score.
    pub candidates: Vec<MatchCandidate>,
}

impl MatchResult {
    pub fn new(value: impl Into<String>, candidates: Vec<MatchCandidate>) -> Self {
        Self {
            value: value.into(),
            candidates,
        }
    }

    pub fn best(&self) -> Option<&MatchCandidate> {
        self.candidates.first()
    }

    /// True when the single best candidate is the value itself.
    pub fn is_exact(&self) -> bool {
        self.best().is_some_and(|c| c.term == self.value)
    }

    /// Best candidate when its score clears `threshold`.
    pub fn accepted(&self, threshold: f32) -> Option<&MatchCandidate> {
        self.best().filter(|c| c.score >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(term: &str, score: f32) -> MatchCandidate {
        MatchCandidate {
            term: term.to_string(),
            score,
        }
    }

    #[test]
    fn exact_requires_identical_best_term() {
        let result = MatchResult::new("letters", vec![candidate("letters", 1.0)]);
        assert!(result.is_exact());
        let result = MatchResult::new("Letters", vec![candidate("letters", 1.0)]);
        assert!(!result.is_exact());
    }

    #[test]
    fn accepted_applies_threshold() {
        let result = MatchResult::new("leters", vec![candidate("letters", 0.92)]);
        assert!(result.accepted(0.6).is_some());
        assert!(result.accepted(0.95).is_none());
        assert!(MatchResult::new("x", vec![]).accepted(0.0).is_none());
    }
}
