use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use catalog_model::{CatalogError, FieldGap, FieldName};

use crate::csv_table::RawTable;
use crate::header::resolve_header;
use crate::schema::SchemaVersion;

/// Marker found in the identifier cell of a template definition row.
const DEFINITION_ROW_MARKER: &str = "שדה חובה";

/// One data row keyed by canonical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRow {
    /// Spreadsheet row number (the header is row 1).
    pub row_number: usize,
    pub values: BTreeMap<FieldName, String>,
}

impl NormalizedRow {
    pub fn get(&self, field: FieldName) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    /// Identifier for reports: the unit id, or the row number when it is missing.
    pub fn label(&self) -> String {
        let unit_id = self.get(FieldName::UnitId).trim();
        if unit_id.is_empty() {
            format!("row {}", self.row_number)
        } else {
            unit_id.to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub schema: SchemaVersion,
    /// Canonical fields with at least one mapped column.
    pub fields: Vec<FieldName>,
    /// Raw headers with no canonical mapping.
    pub dropped_headers: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

/// Maps raw headers to canonical fields without checking mandatory fields.
///
/// For each field, the first non-empty value among its aliased columns wins,
/// in alias priority order. The template definition row is removed.
pub fn map_rows(raw: &RawTable) -> (Vec<FieldName>, Vec<String>, Vec<NormalizedRow>) {
    let mut columns: BTreeMap<FieldName, Vec<(usize, usize)>> = BTreeMap::new();
    let mut dropped = Vec::new();
    for (idx, header) in raw.headers.iter().enumerate() {
        match resolve_header(header) {
            Some((field, rank)) => columns.entry(field).or_default().push((rank, idx)),
            None => dropped.push(header.clone()),
        }
    }
    for sources in columns.values_mut() {
        sources.sort_unstable();
    }
    if !dropped.is_empty() {
        debug!(headers = ?dropped, "dropping unmapped headers");
    }

    let mut rows = Vec::with_capacity(raw.rows.len());
    for (row_idx, _) in raw.rows.iter().enumerate() {
        let mut row = NormalizedRow {
            row_number: row_idx + 2,
            values: BTreeMap::new(),
        };
        for (field, sources) in &columns {
            let value = sources
                .iter()
                .map(|(_, col)| raw.cell(row_idx, *col))
                .find(|v| !v.is_empty());
            if let Some(value) = value {
                row.values.insert(*field, value.to_string());
            }
        }
        if row.get(FieldName::UnitId).contains(DEFINITION_ROW_MARKER) {
            info!(row = row.row_number, "removing template definition row");
            continue;
        }
        rows.push(row);
    }
    (columns.into_keys().collect(), dropped, rows)
}

/// Every record lacking a mandatory field, grouped by field.
pub fn missing_fields(
    fields: &[FieldName],
    rows: &[NormalizedRow],
    schema: SchemaVersion,
) -> Vec<FieldGap> {
    let present: BTreeSet<FieldName> = fields.iter().copied().collect();
    schema
        .mandatory_fields()
        .into_iter()
        .filter_map(|field| {
            let unit_ids: Vec<String> = rows
                .iter()
                .filter(|row| !present.contains(&field) || row.get(field).trim().is_empty())
                .map(NormalizedRow::label)
                .collect();
            let absent_column = !present.contains(&field) && rows.is_empty();
            if unit_ids.is_empty() && !absent_column {
                None
            } else {
                Some(FieldGap { field, unit_ids })
            }
        })
        .collect()
}

/// Field Normalizer entry point: canonical rows, with every mandatory-field
/// violation reported at once.
pub fn normalize_table(
    raw: &RawTable,
    schema: Option<SchemaVersion>,
) -> Result<NormalizedTable, CatalogError> {
    let (fields, dropped_headers, rows) = map_rows(raw);
    let schema = schema.unwrap_or_else(|| SchemaVersion::detect(&fields));
    let gaps = missing_fields(&fields, &rows, schema);
    if !gaps.is_empty() {
        return Err(CatalogError::MissingField(gaps));
    }
    info!(
        schema = ?schema,
        fields = fields.len(),
        rows = rows.len(),
        dropped = dropped_headers.len(),
        "headers normalized"
    );
    Ok(NormalizedTable {
        schema,
        fields,
        dropped_headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn first_non_empty_alias_wins() {
        let raw = table(
            &["UNITITLE", "כותרת", "שם"],
            &[&["", "כותרת עברית", "שם"], &["Title", "כותרת", ""]],
        );
        let (_, _, rows) = map_rows(&raw);
        assert_eq!(rows[0].get(FieldName::UnitTitle), "כותרת עברית");
        assert_eq!(rows[1].get(FieldName::UnitTitle), "Title");
    }

    #[test]
    fn unmapped_headers_are_dropped() {
        let raw = table(&["סימול", "Unnamed: 4"], &[&["X", "junk"]]);
        let (fields, dropped, rows) = map_rows(&raw);
        assert_eq!(fields, vec![FieldName::UnitId]);
        assert_eq!(dropped, vec!["Unnamed: 4"]);
        assert_eq!(rows[0].values.len(), 1);
    }

    #[test]
    fn definition_row_is_removed() {
        let raw = table(&["סימול"], &[&["שדה חובה"], &["X"]]);
        let (_, _, rows) = map_rows(&raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 3);
    }

    #[test]
    fn missing_field_lists_every_record() {
        let raw = table(
            &[
                "סימול",
                "רמת תיאור",
                "כותרת",
                "היקף",
                "שם הרושם",
                "תאריך הרישום",
            ],
            &[
                &["X", "אוסף", "t", "", "c", "2020"],
                &["X-1", "תיק", "t", "", "c", "2020"],
                &["", "תיק", "t", "1", "c", "2020"],
            ],
        );
        let error = normalize_table(&raw, Some(SchemaVersion::V1)).unwrap_err();
        let CatalogError::MissingField(gaps) = error else {
            panic!("expected MissingField");
        };
        let extent = gaps.iter().find(|g| g.field == FieldName::Extent).unwrap();
        assert_eq!(extent.unit_ids, vec!["X", "X-1"]);
        let unit_id = gaps.iter().find(|g| g.field == FieldName::UnitId).unwrap();
        assert_eq!(unit_id.unit_ids, vec!["row 4"]);
        let creators = gaps
            .iter()
            .find(|g| g.field == FieldName::CombinedCreators)
            .unwrap();
        assert_eq!(creators.unit_ids.len(), 3);
    }

    #[test]
    fn v2_catalog_passes_without_combined_creators() {
        let raw = table(
            &[
                "UNITID",
                "LEVEL",
                "UNITITLE",
                "EXTENT",
                "CATALOGUER",
                "DATE_CATALOGING",
                "FIRST_CREATOR_PERS",
            ],
            &[&["X", "אוסף", "t", "1", "c", "2020", "Levi"]],
        );
        let normalized = normalize_table(&raw, None).unwrap();
        assert_eq!(normalized.schema, SchemaVersion::V2);
    }
}
