use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use catalog_model::{CatalogError, FieldName, Level, Record};

use crate::normalize::{NormalizedRow, NormalizedTable};

/// Materializes typed records from normalized rows.
///
/// Identifiers are trimmed. Duplicate identifiers and unknown level labels are
/// fatal; both are reported in full, together when both occur.
pub fn materialize_records(table: &NormalizedTable) -> Result<Vec<Record>, CatalogError> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut duplicates = Vec::new();
    let mut unknown_levels = Vec::new();
    let mut records = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let unit_id = row.get(FieldName::UnitId).trim().to_string();
        let count = seen.entry(unit_id.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(unit_id.clone());
        }
        let label = row.get(FieldName::Level);
        let Some(level) = Level::from_label(label) else {
            unknown_levels.push((row.label(), label.to_string()));
            continue;
        };
        records.push(build_record(unit_id, level, row));
    }

    let mut errors = Vec::new();
    if !duplicates.is_empty() {
        errors.push(CatalogError::DuplicateIdentifier(duplicates));
    }
    if !unknown_levels.is_empty() {
        errors.push(CatalogError::UnknownLevel(unknown_levels));
    }
    if let Some(error) = CatalogError::combine(errors) {
        return Err(error);
    }
    let levels: BTreeSet<Level> = records.iter().map(|r| r.level).collect();
    info!(records = records.len(), levels = levels.len(), "records materialized");
    Ok(records)
}

fn build_record(unit_id: String, level: Level, row: &NormalizedRow) -> Record {
    let mut record = Record::new(unit_id, level);
    record.root_id = row.get(FieldName::RootId).trim().to_string();
    for (field, value) in &row.values {
        if matches!(
            field,
            FieldName::UnitId | FieldName::RootId | FieldName::Level
        ) {
            continue;
        }
        record.set(*field, value.clone());
    }
    record
}
