//! Precomputed search index over one authority.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use catalog_model::MatchCandidate;

use crate::engine::ConfidenceThresholds;
use crate::score::Prepared;

#[derive(Debug, Clone)]
struct IndexEntry {
    key: String,
    canonical: String,
    prepared: Prepared,
}

/// A scored authority key.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    /// Searchable key (a term or one of its synonyms), verbatim.
    pub key: String,
    /// Canonical term the key resolves to.
    pub canonical: String,
    pub score: f32,
}

impl IndexHit {
    pub fn to_candidate(&self) -> MatchCandidate {
        MatchCandidate {
            term: self.key.clone(),
            score: self.score,
        }
    }
}

/// Authority keys with their normalized forms computed once.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    exact: BTreeMap<String, usize>,
}

impl SearchIndex {
    /// Builds an index from `(key, canonical)` pairs. Later duplicates of a key are ignored.
    pub fn new<I, K, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        K: Into<String>,
        C: Into<String>,
    {
        let mut index = Self::default();
        for (key, canonical) in pairs {
            let key = key.into();
            if key.is_empty() || index.exact.contains_key(&key) {
                continue;
            }
            index.exact.insert(key.clone(), index.entries.len());
            index.entries.push(IndexEntry {
                prepared: Prepared::new(&key),
                canonical: canonical.into(),
                key,
            });
        }
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `value` is verbatim one of the keys.
    pub fn contains_key(&self, value: &str) -> bool {
        self.exact.contains_key(value)
    }

    /// Canonical term for a verbatim key.
    pub fn canonical(&self, value: &str) -> Option<&str> {
        self.exact
            .get(value)
            .map(|&i| self.entries[i].canonical.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Up to `limit` keys ranked by descending similarity.
    ///
    /// Ties keep a verbatim match first, then order keys alphabetically, so
    /// rankings are deterministic.
    pub fn extract(&self, value: &str, limit: usize) -> Vec<IndexHit> {
        let prepared = Prepared::new(value);
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| {
                let score = if entry.key == value {
                    1.0
                } else {
                    prepared.similarity(&entry.prepared)
                };
                (score, entry)
            })
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| (b.1.key == value).cmp(&(a.1.key == value)))
                .then_with(|| a.1.key.cmp(&b.1.key))
        });
        scored
            .into_iter()
            .take(limit)
            .map(|(score, entry)| IndexHit {
                key: entry.key.clone(),
                canonical: entry.canonical.clone(),
                score,
            })
            .collect()
    }

    /// The single best key.
    pub fn extract_one(&self, value: &str) -> Option<IndexHit> {
        self.extract(value, 1).into_iter().next()
    }

    /// The best key when its similarity reaches `cutoff` (inclusive).
    pub fn closest(&self, value: &str, cutoff: f32) -> Option<IndexHit> {
        let thresholds = ConfidenceThresholds::with_floor(cutoff);
        self.extract_one(value)
            .filter(|hit| thresholds.accepts(hit.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> SearchIndex {
        SearchIndex::new([
            ("צלם", "צלם"),
            ("צלמת", "צלם"),
            ("photographer", "צלם"),
            ("כותב", "כותב"),
            ("author", "כותב"),
        ])
    }

    #[test]
    fn verbatim_key_ranks_first() {
        let hits = roles().extract("צלם", 3);
        assert_eq!(hits[0].key, "צלם");
        assert!((hits[0].score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn synonym_resolves_to_canonical() {
        let index = roles();
        assert_eq!(index.canonical("צלמת"), Some("צלם"));
        assert_eq!(index.canonical("author"), Some("כותב"));
        assert_eq!(index.canonical("editor"), None);
    }

    #[test]
    fn closest_respects_cutoff() {
        let index = roles();
        let hit = index.closest("photografer", 0.6).expect("close match");
        assert_eq!(hit.key, "photographer");
        assert_eq!(hit.canonical, "צלם");
        assert!(index.closest("zzzz", 0.6).is_none());
    }

    #[test]
    fn cutoff_is_inclusive() {
        let index = roles();
        let hit = index.extract_one("photografer").expect("some match");
        assert!(index.closest("photografer", hit.score).is_some());
        assert!(index.closest("photografer", hit.score + 0.001).is_none());
    }

    #[test]
    fn extract_is_limited_and_sorted() {
        let hits = roles().extract("autor", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].key, "author");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn case_variant_is_not_verbatim() {
        let index = SearchIndex::new([("Letters", "Letters")]);
        let hit = index.extract_one("letters").unwrap();
        assert_eq!(hit.key, "Letters");
        assert!(!index.contains_key("letters"));
    }
}
