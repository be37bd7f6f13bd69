use tracing::info;

use catalog_model::Collection;

use crate::csv_table::RawTable;
use crate::error::IngestError;
use crate::header::clean_header;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollectionField {
    Id,
    Branch,
    NameHeb,
    NameEng,
    CreditHeb,
    CreditEng,
    Owner,
    Date,
}

/// Collection-table headers as they appear in the sheet; compared cleaned.
const COLLECTION_ALIASES: &[(&str, CollectionField)] = &[
    ("collection_id", CollectionField::Id),
    ("סימול הארכיון", CollectionField::Id),
    ("סימול האוסף", CollectionField::Id),
    ("branch", CollectionField::Branch),
    ("אשכול", CollectionField::Branch),
    ("name_heb", CollectionField::NameHeb),
    ("שם הארכיון", CollectionField::NameHeb),
    ("שם האוסף", CollectionField::NameHeb),
    ("name_eng", CollectionField::NameEng),
    ("שם הארכיון באנגלית", CollectionField::NameEng),
    ("שם האוסף באנגלית", CollectionField::NameEng),
    ("credit_heb", CollectionField::CreditHeb),
    ("קרדיט עברית", CollectionField::CreditHeb),
    ("credit_eng", CollectionField::CreditEng),
    ("קרדיט אנגלית", CollectionField::CreditEng),
    ("current_owner", CollectionField::Owner),
    ("owner", CollectionField::Owner),
    ("בעלים נוכחי", CollectionField::Owner),
    ("מיקום הפקדה עבור בעלים נוכחי", CollectionField::Owner),
    ("date", CollectionField::Date),
    ("תאריך חופשי", CollectionField::Date),
];

fn resolve(raw: &str) -> Option<CollectionField> {
    let cleaned = clean_header(raw);
    COLLECTION_ALIASES
        .iter()
        .find(|(alias, _)| clean_header(alias) == cleaned)
        .map(|(_, field)| *field)
}

/// Reads collection-root metadata from its one-row table.
///
/// The first row with a non-empty collection identifier is used; for every
/// attribute, the first non-empty aliased column wins.
pub fn normalize_collection(raw: &RawTable) -> Result<Collection, IngestError> {
    let columns: Vec<(usize, CollectionField)> = raw
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| resolve(header).map(|field| (idx, field)))
        .collect();
    let value = |row: usize, wanted: CollectionField| -> String {
        columns
            .iter()
            .filter(|(_, field)| *field == wanted)
            .map(|(col, _)| raw.cell(row, *col))
            .find(|v| !v.is_empty())
            .unwrap_or_default()
            .to_string()
    };

    let row = (0..raw.rows.len())
        .find(|row| !value(*row, CollectionField::Id).is_empty())
        .ok_or(IngestError::MissingCollectionRow)?;
    let collection = Collection {
        id: value(row, CollectionField::Id),
        branch: value(row, CollectionField::Branch),
        name_heb: value(row, CollectionField::NameHeb),
        name_eng: value(row, CollectionField::NameEng),
        credit_heb: value(row, CollectionField::CreditHeb),
        credit_eng: value(row, CollectionField::CreditEng),
        owner: value(row, CollectionField::Owner),
        date: value(row, CollectionField::Date),
    };
    info!(collection = %collection.id, branch = %collection.branch, "collection metadata read");
    Ok(collection)
}
