use catalog_map::SearchIndex;
use catalog_model::{FieldName, MatchReport, MatchReportRow, MatchResult};

/// Ranked match report for one field: every distinct value with up to
/// `limit` candidate terms.
pub fn build_match_report(
    field: FieldName,
    values: &[(String, Vec<String>)],
    index: &SearchIndex,
    limit: usize,
) -> MatchReport {
    let rows = values
        .iter()
        .map(|(value, unit_ids)| {
            let candidates = index
                .extract(value, limit.max(1))
                .iter()
                .map(|hit| hit.to_candidate())
                .collect();
            let result = MatchResult::new(value.clone(), candidates);
            MatchReportRow {
                exact: result.is_exact(),
                value: result.value,
                count: unit_ids.len(),
                unit_ids: unit_ids.clone(),
                candidates: result.candidates.into_iter().take(limit).collect(),
            }
        })
        .collect();
    MatchReport { field, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_value_order_and_limit_candidates() {
        let index = SearchIndex::new([
            ("מכתבים", "מכתבים"),
            ("מכתב", "מכתבים"),
            ("תצלומים", "תצלומים"),
            ("כרזות", "כרזות"),
            ("תוכניות", "תוכניות"),
            ("שרטוטים", "שרטוטים"),
        ]);
        let values = vec![
            ("תצלומים".to_string(), vec!["X-1".to_string()]),
            ("מיכתבים".to_string(), vec!["X-1".to_string(), "X-2".to_string()]),
        ];
        let report = build_match_report(FieldName::ArchivalMaterial, &values, &index, 4);
        assert_eq!(report.rows[0].value, "תצלומים");
        assert!(report.rows[0].exact);
        assert!(!report.rows[1].exact);
        assert_eq!(report.rows[1].count, 2);
        assert_eq!(report.rows[1].candidates.len(), 4);
        assert_eq!(report.rows[1].candidates[0].term, "מכתבים");
        assert_eq!(report.mismatch_count(), 1);
    }
}
