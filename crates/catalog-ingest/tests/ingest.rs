#![allow(missing_docs)]

use std::fs;

use catalog_ingest::{
    IngestError, SchemaVersion, materialize_records, normalize_collection, normalize_table,
    read_raw_table,
};
use catalog_model::{CatalogError, FieldName, Level};

const CATALOG: &str = "\u{feff}סימול,סימול אב,רמת תיאור,כותרת,היקף,שם הרושם,תאריך הרישום,יוצרים,מילות מפתח_מקומות,Unnamed: 9\n\
שדה חובה,,שדה חובה,שדה חובה,שדה חובה,שדה חובה,שדה חובה,שדה חובה,,\n\
X,,אוסף,ארכיון,3 קופסאות,ישראלי,2020-01-05,לוי [צלם],,\n\
X-1, ,סדרה,מכתבים,1 קופסה,ישראלי,2020-01-05,לוי [צלם],תל אביב;חיפה,\n\
X-1-1,X-1,תיק,\"מכתב, 1950\",1 תיק,ישראלי,2020-01-05,לוי [צלם],,\n";

#[test]
fn reads_normalizes_and_materializes_a_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    fs::write(&path, CATALOG).unwrap();

    let raw = read_raw_table(&path).unwrap();
    let table = normalize_table(&raw, None).unwrap();
    assert_eq!(table.schema, SchemaVersion::V1);
    assert_eq!(table.dropped_headers, vec!["Unnamed: 9"]);
    assert_eq!(table.rows.len(), 3);

    let records = materialize_records(&table).unwrap();
    assert_eq!(records[0].level, Level::Section);
    assert_eq!(records[1].level, Level::Series);
    assert_eq!(records[1].root_id, "");
    assert_eq!(records[1].list(FieldName::GeogName), vec!["תל אביב", "חיפה"]);
    assert_eq!(records[2].root_id, "X-1");
    assert_eq!(records[2].title(), "מכתב, 1950");
}

#[test]
fn missing_mandatory_column_is_reported_for_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    fs::write(&path, "UNITID,LEVEL,UNITITLE\nX,אוסף,t\nX-1,תיק,t\n").unwrap();
    let raw = read_raw_table(&path).unwrap();
    let error = normalize_table(&raw, Some(SchemaVersion::V2)).unwrap_err();
    let CatalogError::MissingField(gaps) = error else {
        panic!("expected MissingField");
    };
    assert_eq!(gaps.len(), 3);
    assert!(gaps.iter().all(|gap| gap.unit_ids == vec!["X", "X-1"]));
}

#[test]
fn collection_table_round_trip_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.csv");
    fs::write(
        &path,
        "סימול הארכיון,שם הארכיון,שם הארכיון באנגלית,תאריך חופשי\nX,ארכיון,Archive,1930-1990\n",
    )
    .unwrap();
    let collection = normalize_collection(&read_raw_table(&path).unwrap()).unwrap();
    assert_eq!(collection.id, "X");
    assert_eq!(collection.date, "1930-1990");
}

#[test]
fn unreadable_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = read_raw_table(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(error, IngestError::Io { .. }));
}
