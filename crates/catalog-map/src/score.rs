//! Similarity scoring between a raw value and an authority key.
//!
//! Uses the normalized Indel similarity (the classic edit "ratio") as the base
//! algorithm, and the same ratio over sorted tokens so that reordered phrases
//! ("black and white photo" / "photo black and white") still score high.

use rapidfuzz::distance::indel;

use crate::utils::{normalize_text, sort_tokens};

/// Edit ratio between two already-normalized strings.
fn ratio(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    indel::normalized_similarity(a.chars(), b.chars()) as f32
}

/// A string in both of its compared forms, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Prepared {
    normalized: String,
    sorted: String,
}

impl Prepared {
    pub(crate) fn new(raw: &str) -> Self {
        Self {
            normalized: normalize_text(raw),
            sorted: sort_tokens(raw),
        }
    }

    /// Similarity in `0.0..=1.0`: the better of the plain ratio and the
    /// token-sorted ratio.
    pub(crate) fn similarity(&self, other: &Prepared) -> f32 {
        ratio(&self.normalized, &other.normalized).max(ratio(&self.sorted, &other.sorted))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn similarity(a: &str, b: &str) -> f32 {
        Prepared::new(a).similarity(&Prepared::new(b))
    }

    #[test]
    fn identical_strings_score_one() {
        assert!((similarity("צלם", "צלם") - 1.0).abs() < f32::EPSILON);
        assert!((similarity("Photographer", "photographer") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn token_order_is_ignored() {
        assert!(similarity("black white photo", "photo white black") > 0.99);
    }

    #[test]
    fn typo_scores_above_threshold() {
        assert!(similarity("photografer", "photographer") > 0.6);
        assert!(similarity("photografer", "lyricist") < 0.6);
    }

    proptest! {
        #[test]
        fn similarity_is_bounded_and_symmetric(a in "[a-z ]{0,12}", b in "[a-z ]{0,12}") {
            let ab = similarity(&a, &b);
            let ba = similarity(&b, &a);
            prop_assert!((0.0..=1.0).contains(&ab));
            prop_assert!((ab - ba).abs() < 1e-6);
        }
    }
}
