use tracing::info;

use catalog_model::{Batch, FieldName};

/// Access restriction given to File and Item records that carry none.
pub const DEFAULT_ACCESS_RESTRICTION: &str = "אין מגבלות פרטיות";

/// Title cleanup: the first comma becomes `" -"`, newlines become spaces and
/// leading whitespace is dropped.
pub fn clean_title(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    raw.replacen(',', " -", 1)
        .trim_start()
        .replace('\n', " ")
}

/// Fills an empty access restriction on every File/Item record. Returns the
/// number of records changed.
pub fn apply_access_default(batch: &mut Batch, default_term: &str) -> usize {
    let mut filled = 0;
    for record in batch.records.iter_mut().filter(|r| r.level.is_unit()) {
        if !record.has(FieldName::AccessRestrict) {
            record.set(FieldName::AccessRestrict, default_term);
            filled += 1;
        }
    }
    filled
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultsSummary {
    pub titles_cleaned: usize,
    pub access_filled: usize,
}

/// Title cleanup and the access-restriction default, in one pass over the batch.
pub fn apply_record_defaults(batch: &mut Batch, default_access: &str) -> DefaultsSummary {
    let mut summary = DefaultsSummary::default();
    for record in &mut batch.records {
        for field in [FieldName::UnitTitle, FieldName::UnitTitleEng] {
            let cleaned = clean_title(record.get(field));
            if cleaned != record.get(field) {
                record.set(field, cleaned);
                summary.titles_cleaned += 1;
            }
        }
    }
    summary.access_filled = apply_access_default(batch, default_access);
    info!(
        titles = summary.titles_cleaned,
        access = summary.access_filled,
        "record defaults applied"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{Collection, Level, Record};

    #[test]
    fn title_cleanup() {
        assert_eq!(clean_title(" מכתב, 1950, תל אביב"), "מכתב - 1950, תל אביב");
        assert_eq!(clean_title("שורה\nשנייה"), "שורה שנייה");
        assert_eq!(clean_title("  "), "");
    }

    #[test]
    fn only_units_receive_the_access_default() {
        let mut batch = Batch::new(
            Collection::new("X"),
            vec![
                Record::new("X", Level::Section),
                Record::new("X-1", Level::Series),
                Record::new("X-1-1", Level::File),
                Record::new("X-1-2", Level::Item).with(FieldName::AccessRestrict, "פרטיות"),
            ],
        );
        assert_eq!(apply_access_default(&mut batch, DEFAULT_ACCESS_RESTRICTION), 1);
        assert_eq!(
            batch.records[2].get(FieldName::AccessRestrict),
            DEFAULT_ACCESS_RESTRICTION
        );
        assert!(!batch.records[0].has(FieldName::AccessRestrict));
        assert_eq!(batch.records[3].get(FieldName::AccessRestrict), "פרטיות");
    }
}
