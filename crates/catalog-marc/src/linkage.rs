use std::collections::BTreeMap;

/// Subfield code holding the number of digitized files.
pub const FILE_COUNT_SUBFIELD: &str = "i";

/// Source of digitization linkage sub-values, keyed by record identifier.
pub trait DigitizationLinkage {
    /// `(code, value)` subfields of the record's `907` field, in source order.
    fn subfields(&self, unit_id: &str) -> Option<&[(String, String)]>;

    fn file_count(&self, unit_id: &str) -> Option<u32> {
        self.subfields(unit_id)?
            .iter()
            .find(|(code, _)| code == FILE_COUNT_SUBFIELD)
            .and_then(|(_, value)| value.trim().parse().ok())
    }
}

/// In-memory linkage lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkageMap {
    entries: BTreeMap<String, Vec<(String, String)>>,
}

impl LinkageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit_id: impl Into<String>, subfields: Vec<(String, String)>) {
        self.entries.insert(unit_id.into(), subfields);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DigitizationLinkage for LinkageMap {
    fn subfields(&self, unit_id: &str) -> Option<&[(String, String)]> {
        self.entries.get(unit_id).map(Vec::as_slice)
    }
}

/// `$$<code><value>` for every subfield; empty when any value is empty.
pub fn encode_907(subfields: &[(String, String)]) -> String {
    if subfields.is_empty() || subfields.iter().any(|(_, v)| v.is_empty()) {
        return String::new();
    }
    subfields
        .iter()
        .map(|(code, value)| format!("$${code}{value}"))
        .collect()
}
