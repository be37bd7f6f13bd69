//! Advisory report values produced by the pipeline stages.
//!
//! None of these halt a run. They are collected into [`RunDiagnostics`] and
//! written out for offline review.

use serde::{Deserialize, Serialize};

use crate::field::FieldName;
use crate::matching::MatchCandidate;

/// How a record's root identifier was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootSource {
    Explicit,
    Derived,
    ForcedEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    pub unit_id: String,
    pub root_id: String,
    pub source: RootSource,
}

/// A date that yielded no usable year, or an inverted range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateIssue {
    pub unit_id: String,
    pub value: String,
    pub reason: String,
}

/// A role string found in neither role authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDiscrepancy {
    pub role: String,
    pub unit_ids: Vec<String>,
    pub candidates: Vec<MatchCandidate>,
}

/// Every unresolved role of a run, emitted once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleReport {
    pub discrepancies: Vec<RoleDiscrepancy>,
}

impl RoleReport {
    pub fn len(&self) -> usize {
        self.discrepancies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn affected_records(&self) -> usize {
        self.discrepancies.iter().map(|d| d.unit_ids.len()).sum()
    }
}

/// One distinct value of a validated field and its closest authority terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReportRow {
    pub value: String,
    pub count: usize,
    pub unit_ids: Vec<String>,
    pub exact: bool,
    pub candidates: Vec<MatchCandidate>,
}

/// Ranked match report for one validated field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub field: FieldName,
    pub rows: Vec<MatchReportRow>,
}

impl MatchReport {
    pub fn mismatch_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.exact).count()
    }
}

/// A vocabulary value with no exact authority match, and what became of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyIssue {
    pub field: FieldName,
    pub value: String,
    pub unit_ids: Vec<String>,
    /// Closest authority key, when one cleared the acceptance threshold.
    pub suggestion: Option<MatchCandidate>,
    /// Replacement applied across the batch, if the correction was confirmed.
    pub corrected_to: Option<String>,
}

impl VocabularyIssue {
    pub fn is_resolved(&self) -> bool {
        self.corrected_to.is_some()
    }
}

/// Everything advisory a run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub hierarchy: Vec<HierarchyEntry>,
    pub roles: RoleReport,
    pub role_corrections: Vec<(String, String)>,
    pub vocabulary: Vec<VocabularyIssue>,
    pub match_reports: Vec<MatchReport>,
    pub dates: Vec<DateIssue>,
}

impl RunDiagnostics {
    pub fn unresolved_terms(&self) -> usize {
        self.vocabulary.iter().filter(|i| !i.is_resolved()).count()
    }
}
