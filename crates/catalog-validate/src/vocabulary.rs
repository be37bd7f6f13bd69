use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use catalog_map::{
    CorrectionRequest, DEFAULT_ACCEPT_THRESHOLD, REPORT_CANDIDATE_LIMIT, ResolutionPolicy,
    SearchIndex,
};
use catalog_model::{Batch, FieldName, MatchReport, MatchResult, VocabularyIssue};
use catalog_standards::AuthorityContext;

use crate::fields::VALIDATED_FIELDS;
use crate::report::build_match_report;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Minimum similarity for a correction to be offered.
    pub accept_threshold: f32,
    /// Candidate terms listed per value in match reports.
    pub report_candidates: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            report_candidates: REPORT_CANDIDATE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub issues: Vec<VocabularyIssue>,
    pub reports: Vec<MatchReport>,
}

impl ValidationOutcome {
    pub fn corrected(&self) -> usize {
        self.issues.iter().filter(|i| i.is_resolved()).count()
    }

    pub fn unresolved(&self) -> usize {
        self.issues.len() - self.corrected()
    }
}

/// Distinct values of a field across the batch, in first-seen order, each
/// with the records holding it.
pub fn distinct_values(batch: &Batch, field: FieldName) -> Vec<(String, Vec<String>)> {
    let mut values: Vec<(String, Vec<String>)> = Vec::new();
    for record in &batch.records {
        for value in record.list(field) {
            match values.iter_mut().find(|(v, _)| *v == value) {
                Some((_, ids)) => {
                    if !ids.contains(&record.unit_id) {
                        ids.push(record.unit_id.clone());
                    }
                }
                None => values.push((value, vec![record.unit_id.clone()])),
            }
        }
    }
    values
}

/// Values whose single best match is not the value itself.
pub fn find_mismatches<'a>(
    values: impl IntoIterator<Item = &'a str>,
    index: &SearchIndex,
    limit: usize,
) -> Vec<MatchResult> {
    values
        .into_iter()
        .map(|value| {
            let candidates = index
                .extract(value, limit.max(1))
                .iter()
                .map(|hit| hit.to_candidate())
                .collect();
            MatchResult::new(value, candidates)
        })
        .filter(|result| !result.is_exact())
        .collect()
}

/// Replaces `from` by `to` in every record's `field` list. Returns the number
/// of records changed.
pub fn replace_value(batch: &mut Batch, field: FieldName, from: &str, to: &str) -> usize {
    let mut changed = 0;
    for record in &mut batch.records {
        let values = record.list(field);
        if !values.iter().any(|v| v == from) {
            continue;
        }
        let replaced: Vec<String> = values
            .into_iter()
            .map(|v| if v == from { to.to_string() } else { v })
            .collect();
        record.set_list(field, &replaced);
        changed += 1;
    }
    changed
}

/// Validates one field against its authority index.
pub fn validate_field(
    batch: &mut Batch,
    field: FieldName,
    index: &SearchIndex,
    policy: &mut ResolutionPolicy,
    options: &ValidationOptions,
) -> (Vec<VocabularyIssue>, MatchReport) {
    let values = distinct_values(batch, field);
    let report = build_match_report(field, &values, index, options.report_candidates);
    let field_name = field.as_str();

    let mismatches = find_mismatches(values.iter().map(|(v, _)| v.as_str()), index, 1);
    let mut issues = Vec::new();
    for result in mismatches {
        let unit_ids = values
            .iter()
            .find(|(v, _)| *v == result.value)
            .map(|(_, ids)| ids.clone())
            .unwrap_or_default();
        let suggestion = result.accepted(options.accept_threshold).cloned();
        let corrected_to = match &suggestion {
            Some(candidate) => {
                let request = CorrectionRequest {
                    field: field_name,
                    original: &result.value,
                    suggestion: &candidate.term,
                    score: candidate.score,
                    unit_ids: &unit_ids,
                };
                if policy.decide(&request) {
                    let records = replace_value(batch, field, &result.value, &candidate.term);
                    info!(field = field_name, corrected = %candidate.term, records, "vocabulary value corrected");
                    Some(candidate.term.clone())
                } else {
                    warn!(field = field_name, suggestion = %candidate.term, "correction declined, value kept");
                    None
                }
            }
            None => {
                warn!(
                    field = field_name,
                    records = unit_ids.len(),
                    "no authority term close enough, value kept"
                );
                None
            }
        };
        debug!(field = field_name, value = %result.value, "vocabulary mismatch");
        issues.push(VocabularyIssue {
            field,
            value: result.value,
            unit_ids,
            suggestion,
            corrected_to,
        });
    }
    (issues, report)
}

/// Validates every controlled field that has both values and an authority.
pub fn validate_vocabulary(
    batch: &mut Batch,
    authorities: &AuthorityContext,
    policy: &mut ResolutionPolicy,
    options: &ValidationOptions,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    for (field, kind) in VALIDATED_FIELDS {
        let span = info_span!("field", field = field.as_str());
        let _guard = span.enter();
        if !batch.records.iter().any(|r| r.has(*field)) {
            continue;
        }
        let Some(index) = authorities.index(*kind) else {
            warn!(authority = %kind, "authority not loaded, field not validated");
            continue;
        };
        let (issues, report) = validate_field(batch, *field, index, policy, options);
        info!(
            values = report.rows.len(),
            mismatches = report.mismatch_count(),
            "field validated"
        );
        outcome.issues.extend(issues);
        outcome.reports.push(report);
    }
    outcome
}
