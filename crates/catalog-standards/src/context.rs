//! The immutable set of authorities shared by every pipeline stage.

use std::collections::{BTreeMap, BTreeSet};

use catalog_map::SearchIndex;
use tracing::debug;

use crate::authority::{AuthorityKind, AuthorityTable};
use crate::error::StandardsError;

/// Authorities and their search indexes, built once per run and passed by reference.
#[derive(Debug, Clone)]
pub struct AuthorityContext {
    tables: BTreeMap<AuthorityKind, AuthorityTable>,
    indexes: BTreeMap<AuthorityKind, SearchIndex>,
    role_index: SearchIndex,
}

impl AuthorityContext {
    /// Builds the context from loaded tables.
    ///
    /// Both role authorities are required, and must not share a key, so that
    /// every role classifies to at most one kind.
    pub fn new(tables: Vec<AuthorityTable>) -> Result<Self, StandardsError> {
        let mut by_kind = BTreeMap::new();
        for table in tables {
            let kind = table.kind();
            if by_kind.insert(kind, table).is_some() {
                return Err(StandardsError::DuplicateKind {
                    kind: kind.to_string(),
                });
            }
        }
        for kind in [AuthorityKind::PersonRole, AuthorityKind::CorporateRole] {
            if !by_kind.contains_key(&kind) {
                return Err(StandardsError::MissingAuthority {
                    kind: kind.to_string(),
                });
            }
        }

        let person: BTreeSet<&str> = by_kind[&AuthorityKind::PersonRole]
            .search_keys()
            .map(|(key, _)| key)
            .collect();
        let overlap: Vec<String> = by_kind[&AuthorityKind::CorporateRole]
            .search_keys()
            .map(|(key, _)| key)
            .filter(|key| person.contains(key))
            .map(String::from)
            .collect();
        if !overlap.is_empty() {
            return Err(StandardsError::OverlappingRoles { roles: overlap });
        }

        let indexes: BTreeMap<AuthorityKind, SearchIndex> = by_kind
            .iter()
            .map(|(kind, table)| (*kind, table.build_index()))
            .collect();
        let role_index = SearchIndex::new(
            [AuthorityKind::PersonRole, AuthorityKind::CorporateRole]
                .iter()
                .flat_map(|kind| by_kind[kind].search_keys()),
        );
        debug!(
            authorities = by_kind.len(),
            role_keys = role_index.len(),
            "authority context built"
        );

        Ok(Self {
            tables: by_kind,
            indexes,
            role_index,
        })
    }

    pub fn table(&self, kind: AuthorityKind) -> Option<&AuthorityTable> {
        self.tables.get(&kind)
    }

    pub fn require(&self, kind: AuthorityKind) -> Result<&AuthorityTable, StandardsError> {
        self.table(kind)
            .ok_or_else(|| StandardsError::MissingAuthority {
                kind: kind.to_string(),
            })
    }

    pub fn index(&self, kind: AuthorityKind) -> Option<&SearchIndex> {
        self.indexes.get(&kind)
    }

    /// Index over the union of person and corporate role keys.
    pub fn role_index(&self) -> &SearchIndex {
        &self.role_index
    }

    pub fn person_roles(&self) -> &AuthorityTable {
        &self.tables[&AuthorityKind::PersonRole]
    }

    pub fn corporate_roles(&self) -> &AuthorityTable {
        &self.tables[&AuthorityKind::CorporateRole]
    }

    pub fn kinds(&self) -> impl Iterator<Item = AuthorityKind> + '_ {
        self.tables.keys().copied()
    }
}
