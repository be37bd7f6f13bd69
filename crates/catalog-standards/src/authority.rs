//! Controlled vocabularies (authority tables).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use catalog_map::SearchIndex;

/// Code columns carried by the authority CSVs.
pub mod columns {
    /// Hebrew relator term of a role.
    pub const RELATOR_HEB: &str = "relator_heb";
    /// English relator term of a role.
    pub const RELATOR_ENG: &str = "relator_eng";
    /// Encoded genre/form (655 7) value of an archival material term.
    pub const GENRE_FORM: &str = "marc655";
    /// RDA content type (336) of an archival material term.
    pub const CONTENT_TYPE: &str = "rdacontent336";
    /// Original carrier description (534) of a media/format term.
    pub const ORIGINAL_CARRIER: &str = "marc534";
    /// MARC country or language code.
    pub const MARC_CODE: &str = "marc";
    /// Encoded access restriction (506) value.
    pub const RESTRICTION: &str = "marc506";
}

/// The reference sets a run loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorityKind {
    PersonRole,
    CorporateRole,
    ArchivalMaterial,
    MediaFormat,
    Country,
    Language,
    AccessRestriction,
}

impl AuthorityKind {
    pub const ALL: [AuthorityKind; 7] = [
        AuthorityKind::PersonRole,
        AuthorityKind::CorporateRole,
        AuthorityKind::ArchivalMaterial,
        AuthorityKind::MediaFormat,
        AuthorityKind::Country,
        AuthorityKind::Language,
        AuthorityKind::AccessRestriction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorityKind::PersonRole => "person-role",
            AuthorityKind::CorporateRole => "corporate-role",
            AuthorityKind::ArchivalMaterial => "archival-material",
            AuthorityKind::MediaFormat => "media-format",
            AuthorityKind::Country => "country",
            AuthorityKind::Language => "language",
            AuthorityKind::AccessRestriction => "access-restriction",
        }
    }
}

impl fmt::Display for AuthorityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuthorityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| format!("unknown authority kind: {s}"))
    }
}

/// One canonical term with its synonyms and coded forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityEntry {
    pub term: String,
    /// Alternative raw phrasings searchable as this term.
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Coded forms keyed by column name (see [`columns`]).
    #[serde(default)]
    pub codes: BTreeMap<String, String>,
}

impl AuthorityEntry {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            synonyms: Vec::new(),
            codes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.push(synonym.into());
        self
    }

    #[must_use]
    pub fn with_code(mut self, column: &str, value: impl Into<String>) -> Self {
        self.codes.insert(column.to_string(), value.into());
        self
    }

    pub fn code(&self, column: &str) -> Option<&str> {
        self.codes
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// A read-only controlled vocabulary.
///
/// Exposes the canonical term set, the raw-to-canonical mapping (terms and
/// synonyms), and the coded forms of each term.
#[derive(Debug, Clone)]
pub struct AuthorityTable {
    kind: AuthorityKind,
    entries: Vec<AuthorityEntry>,
    lookup: BTreeMap<String, usize>,
}

impl AuthorityTable {
    /// Builds a table. A raw key listed twice resolves to its first entry.
    pub fn new(kind: AuthorityKind, entries: Vec<AuthorityEntry>) -> Self {
        let mut lookup = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            lookup.entry(entry.term.clone()).or_insert(idx);
        }
        for (idx, entry) in entries.iter().enumerate() {
            for synonym in &entry.synonyms {
                lookup.entry(synonym.clone()).or_insert(idx);
            }
        }
        Self {
            kind,
            entries,
            lookup,
        }
    }

    pub fn kind(&self) -> AuthorityKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AuthorityEntry] {
        &self.entries
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.term.as_str())
    }

    /// True when `raw` is verbatim a term or synonym.
    pub fn contains(&self, raw: &str) -> bool {
        self.lookup.contains_key(raw)
    }

    pub fn entry(&self, raw: &str) -> Option<&AuthorityEntry> {
        self.lookup.get(raw).map(|&idx| &self.entries[idx])
    }

    /// Canonical term for a raw term or synonym.
    pub fn canonical(&self, raw: &str) -> Option<&str> {
        self.entry(raw).map(|e| e.term.as_str())
    }

    /// Coded form of a raw term or synonym in `column`.
    pub fn code(&self, raw: &str, column: &str) -> Option<&str> {
        self.entry(raw).and_then(|e| e.code(column))
    }

    /// Every searchable key paired with its canonical term.
    pub fn search_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lookup
            .iter()
            .map(|(key, &idx)| (key.as_str(), self.entries[idx].term.as_str()))
    }

    pub fn build_index(&self) -> SearchIndex {
        SearchIndex::new(self.search_keys())
    }
}
