//! Hierarchy Resolver.
//!
//! Composite identifiers encode their ancestry (`X-1-1` lives under `X-1`).
//! The resolver derives missing root identifiers, pins the Section Record at
//! the top and checks that every reference lands on a known record.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use catalog_model::{Batch, CatalogError, HierarchyEntry, Level, Orphan, RootSource};

/// Root identifier implied by a composite identifier: everything before the
/// last `-`, or `""` when there is no `-`.
pub fn derive_root_id(unit_id: &str) -> String {
    unit_id
        .rsplit_once('-')
        .map(|(root, _)| root.to_string())
        .unwrap_or_default()
}

/// Resolves root identifiers for the whole batch.
///
/// Explicit roots are kept. The Section Record's root is forced empty; zero or
/// several Section Records fail immediately. Unresolvable roots are gathered
/// over the full batch and reported together.
pub fn resolve_hierarchy(batch: &mut Batch) -> Result<Vec<HierarchyEntry>, CatalogError> {
    let sections: Vec<String> = batch
        .records
        .iter()
        .filter(|r| r.level == Level::Section)
        .map(|r| r.unit_id.clone())
        .collect();
    if sections.len() != 1 {
        return Err(CatalogError::SectionRecordCardinality(sections));
    }

    let mut entries = Vec::with_capacity(batch.records.len());
    for record in &mut batch.records {
        let source = if record.level == Level::Section {
            if !record.root_id.is_empty() {
                debug!(unit_id = %record.unit_id, root_id = %record.root_id, "clearing Section Record root");
            }
            record.root_id.clear();
            RootSource::ForcedEmpty
        } else if record.root_id.is_empty() {
            record.root_id = derive_root_id(&record.unit_id);
            RootSource::Derived
        } else {
            RootSource::Explicit
        };
        entries.push(HierarchyEntry {
            unit_id: record.unit_id.clone(),
            root_id: record.root_id.clone(),
            source,
        });
    }

    let known: BTreeSet<&str> = batch.records.iter().map(|r| r.unit_id.as_str()).collect();
    let collection_id = batch.collection.id.as_str();
    let orphans: Vec<Orphan> = batch
        .records
        .iter()
        .filter(|r| r.level != Level::Section)
        .filter(|r| {
            let root = r.root_id.as_str();
            root.is_empty()
                || root == r.unit_id
                || !(known.contains(root) || root == collection_id)
        })
        .map(|r| Orphan {
            unit_id: r.unit_id.clone(),
            root_id: r.root_id.clone(),
        })
        .collect();
    if !orphans.is_empty() {
        warn!(count = orphans.len(), "unresolved root identifiers");
        return Err(CatalogError::OrphanReference(orphans));
    }

    let derived = entries
        .iter()
        .filter(|e| e.source == RootSource::Derived)
        .count();
    info!(records = entries.len(), derived, "hierarchy resolved");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{Collection, Record};

    fn batch(records: Vec<Record>) -> Batch {
        Batch::new(Collection::new("X"), records)
    }

    #[test]
    fn derive_strips_last_segment() {
        assert_eq!(derive_root_id("X-1-1"), "X-1");
        assert_eq!(derive_root_id("X-1"), "X");
        assert_eq!(derive_root_id("X"), "");
    }

    #[test]
    fn explicit_roots_are_kept() {
        let mut explicit = Record::new("X-1-1", Level::File);
        explicit.root_id = "X".to_string();
        let mut b = batch(vec![
            Record::new("X", Level::Section),
            Record::new("X-1", Level::Series),
            explicit,
        ]);
        let entries = resolve_hierarchy(&mut b).unwrap();
        assert_eq!(b.records[2].root_id, "X");
        assert_eq!(entries[2].source, RootSource::Explicit);
        assert_eq!(entries[1].source, RootSource::Derived);
        assert_eq!(entries[0].source, RootSource::ForcedEmpty);
    }

    #[test]
    fn section_root_is_forced_empty() {
        let mut section = Record::new("X", Level::Section);
        section.root_id = "ROOT".to_string();
        let mut b = batch(vec![section]);
        resolve_hierarchy(&mut b).unwrap();
        assert_eq!(b.records[0].root_id, "");
    }

    #[test]
    fn section_cardinality_is_checked() {
        let mut none = batch(vec![Record::new("X-1", Level::File)]);
        assert_eq!(
            resolve_hierarchy(&mut none),
            Err(CatalogError::SectionRecordCardinality(vec![]))
        );
        let mut two = batch(vec![
            Record::new("X", Level::Section),
            Record::new("Y", Level::Section),
        ]);
        assert_eq!(resolve_hierarchy(&mut two).unwrap_err().offender_count(), 2);
    }

    #[test]
    fn every_orphan_is_reported() {
        let mut b = batch(vec![
            Record::new("X", Level::Section),
            Record::new("X-9", Level::Series),
            Record::new("X-1-1", Level::File),
            Record::new("X-2-1", Level::File),
            Record::new("LOOSE", Level::Item),
        ]);
        let Err(CatalogError::OrphanReference(orphans)) = resolve_hierarchy(&mut b) else {
            panic!("expected OrphanReference");
        };
        let ids: Vec<&str> = orphans.iter().map(|o| o.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["X-1-1", "X-2-1", "LOOSE"]);
        assert_eq!(orphans[2].root_id, "");
    }

    #[test]
    fn collection_id_is_a_valid_root() {
        let mut b = Batch::new(
            Collection::new("COLL"),
            vec![
                Record::new("X", Level::Section),
                Record::new("COLL-1", Level::File),
            ],
        );
        assert!(resolve_hierarchy(&mut b).is_ok());
    }
}
