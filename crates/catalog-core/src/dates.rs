//! Year extraction and start/end normalization.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use catalog_model::{Batch, CatalogError, DateIssue, FieldName, Record};

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("Invalid year regex"));

/// Every 4-digit run in `text`, sorted. A single year is returned twice so
/// callers can always read a start and an end.
pub fn extract_years_from_text(text: &str) -> Vec<String> {
    let mut years: Vec<String> = YEAR_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    years.sort();
    if years.len() == 1 {
        years.push(years[0].clone());
    }
    years
}

fn explicit_year(raw: &str) -> Option<u16> {
    let prefix: String = raw.trim().chars().take(4).collect();
    if prefix.len() == 4 && prefix.chars().all(|c| c.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

/// Fills `start_year`/`end_year` from explicit columns, falling back to the
/// free-text date. Returns an issue when no year can be derived.
fn normalize_record(record: &mut Record, fallback_text: &str) -> Option<DateIssue> {
    let text = if record.date_text().is_empty() {
        fallback_text.to_string()
    } else {
        record.date_text().to_string()
    };
    let years = extract_years_from_text(&text);
    let from_text = |pick_last: bool| -> Option<u16> {
        let year = if pick_last { years.last() } else { years.first() };
        year.and_then(|y| y.parse().ok())
    };

    let start = explicit_year(record.get(FieldName::DateStart)).or_else(|| from_text(false));
    let end = explicit_year(record.get(FieldName::DateEnd)).or_else(|| from_text(true));
    let (start, end) = match (start, end) {
        (Some(s), None) => (Some(s), Some(s)),
        (None, Some(e)) => (Some(e), Some(e)),
        other => other,
    };
    record.start_year = start;
    record.end_year = end;
    if let (Some(start), Some(end)) = (start, end) {
        record.set(FieldName::DateStart, start.to_string());
        record.set(FieldName::DateEnd, end.to_string());
    }

    date_issue(record, &text)
}

fn date_issue(record: &Record, text: &str) -> Option<DateIssue> {
    let reason = match (record.start_year, record.end_year) {
        (None, _) | (_, None) => "no year could be extracted".to_string(),
        (Some(start), Some(end)) if start > end => format!("start year {start} after end year {end}"),
        _ => return None,
    };
    Some(DateIssue {
        unit_id: record.unit_id.clone(),
        value: text.to_string(),
        reason,
    })
}

/// Normalizes the years of every record. Problems are advisory here.
///
/// The Section Record falls back to the collection's free-text date.
pub fn normalize_dates(batch: &mut Batch) -> Vec<DateIssue> {
    let collection_date = batch.collection.date.clone();
    let mut issues = Vec::new();
    for record in &mut batch.records {
        let fallback = if record.is_section() {
            collection_date.as_str()
        } else {
            ""
        };
        if let Some(issue) = normalize_record(record, fallback) {
            debug!(unit_id = %issue.unit_id, reason = %issue.reason, "date issue");
            issues.push(issue);
        }
    }
    if issues.is_empty() {
        info!(records = batch.records.len(), "dates normalized");
    } else {
        warn!(count = issues.len(), "records with unusable dates");
    }
    issues
}

/// Escalates every remaining date problem to a fatal, batched error.
pub fn final_date_validation(batch: &Batch) -> Result<(), CatalogError> {
    let issues: Vec<DateIssue> = batch
        .records
        .iter()
        .filter_map(|record| {
            let text = if record.date_text().is_empty() && record.is_section() {
                batch.collection.date.as_str()
            } else {
                record.date_text()
            };
            date_issue(record, text)
        })
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::MalformedDate(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::{Collection, Level};

    #[test]
    fn years_are_extracted_and_sorted() {
        assert_eq!(extract_years_from_text("1930/1990"), vec!["1930", "1990"]);
        assert_eq!(
            extract_years_from_text("[around 1940-2018]"),
            vec!["1940", "2018"]
        );
        assert_eq!(extract_years_from_text("1990, 1950"), vec!["1950", "1990"]);
        assert_eq!(extract_years_from_text("1950"), vec!["1950", "1950"]);
        assert!(extract_years_from_text("לא ידוע").is_empty());
    }

    #[test]
    fn explicit_columns_win_over_free_text() {
        let mut batch = Batch::new(
            Collection::new("X"),
            vec![
                Record::new("X-1", Level::File)
                    .with(FieldName::Date, "1930-1990")
                    .with(FieldName::DateStart, "1935-04-01"),
            ],
        );
        assert!(normalize_dates(&mut batch).is_empty());
        let record = &batch.records[0];
        assert_eq!(record.start_year, Some(1935));
        assert_eq!(record.end_year, Some(1990));
        assert_eq!(record.get(FieldName::DateStart), "1935");
    }

    #[test]
    fn section_uses_collection_date() {
        let mut collection = Collection::new("X");
        collection.date = "1920-1960".to_string();
        let mut batch = Batch::new(collection, vec![Record::new("X", Level::Section)]);
        assert!(normalize_dates(&mut batch).is_empty());
        assert_eq!(batch.records[0].start_year, Some(1920));
        assert_eq!(batch.records[0].end_year, Some(1960));
    }

    #[test]
    fn problems_are_advisory_until_final_validation() {
        let mut batch = Batch::new(
            Collection::new("X"),
            vec![
                Record::new("X-1", Level::File).with(FieldName::Date, "ללא תאריך"),
                Record::new("X-2", Level::File)
                    .with(FieldName::DateStart, "1990")
                    .with(FieldName::DateEnd, "1950"),
                Record::new("X-3", Level::File).with(FieldName::Date, "1950"),
            ],
        );
        let issues = normalize_dates(&mut batch);
        assert_eq!(issues.len(), 2);
        let Err(CatalogError::MalformedDate(fatal)) = final_date_validation(&batch) else {
            panic!("expected MalformedDate");
        };
        assert_eq!(fatal.len(), 2);
        assert!(fatal[1].reason.contains("after end year"));
    }
}
