//! Tests for hierarchy resolution over whole batches.

use catalog_core::{derive_root_id, resolve_hierarchy};
use catalog_model::{Batch, CatalogError, Collection, Level, Record};
use proptest::prelude::*;

fn batch(ids: &[(&str, Level)]) -> Batch {
    Batch::new(
        Collection::new("X"),
        ids.iter()
            .map(|(id, level)| Record::new(*id, *level))
            .collect(),
    )
}

// =========================================================================
// End-to-end behaviour
// =========================================================================

#[test]
fn three_level_batch_resolves() {
    let mut b = batch(&[
        ("X", Level::Section),
        ("X-1", Level::Series),
        ("X-1-1", Level::File),
    ]);
    resolve_hierarchy(&mut b).unwrap();
    let roots: Vec<&str> = b.records.iter().map(|r| r.root_id.as_str()).collect();
    assert_eq!(roots, vec!["", "X", "X-1"]);
}

#[test]
fn renamed_parent_orphans_its_children() {
    let mut b = batch(&[
        ("X", Level::Section),
        ("X-9", Level::Series),
        ("X-1-1", Level::File),
    ]);
    let Err(CatalogError::OrphanReference(orphans)) = resolve_hierarchy(&mut b) else {
        panic!("expected OrphanReference");
    };
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].unit_id, "X-1-1");
    assert_eq!(orphans[0].root_id, "X-1");
}

// =========================================================================
// Properties
// =========================================================================

fn segment() -> impl Strategy<Value = String> {
    "[A-Z0-9]{1,4}"
}

proptest! {
    #[test]
    fn derived_root_is_identifier_minus_last_segment(
        segments in proptest::collection::vec(segment(), 1..6)
    ) {
        let id = segments.join("-");
        let root = derive_root_id(&id);
        let expected = segments[..segments.len() - 1].join("-");
        prop_assert_eq!(root, expected);
    }

    #[test]
    fn complete_trees_have_no_orphans(depth in 1usize..6, width in 1usize..4) {
        let mut records = vec![Record::new("X", Level::Section)];
        let mut frontier = vec!["X".to_string()];
        for _ in 0..depth {
            let mut next = Vec::new();
            for parent in &frontier {
                for n in 1..=width {
                    let id = format!("{parent}-{n}");
                    records.push(Record::new(id.clone(), Level::File));
                    next.push(id);
                }
            }
            frontier = next;
        }
        let mut b = Batch::new(Collection::new("X"), records);
        let entries = resolve_hierarchy(&mut b).unwrap();
        prop_assert_eq!(entries.len(), b.records.len());
        for record in b.records.iter().skip(1) {
            prop_assert_eq!(&record.root_id, &derive_root_id(&record.unit_id));
            prop_assert!(b.find(&record.root_id).is_some());
        }
    }
}
