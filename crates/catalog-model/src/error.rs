use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::DateIssue;
use crate::field::FieldName;

/// A root identifier with no target record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orphan {
    pub unit_id: String,
    pub root_id: String,
}

/// Records lacking a mandatory field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGap {
    pub field: FieldName,
    /// Offending records; the row number stands in when the identifier itself is missing.
    pub unit_ids: Vec<String>,
}

/// Fatal batch errors. Every variant carries the complete offender list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("missing mandatory fields: {}", render_gaps(.0))]
    MissingField(Vec<FieldGap>),

    #[error("duplicate record identifiers: {}", .0.join(", "))]
    DuplicateIdentifier(Vec<String>),

    #[error("root identifiers with no target record: {}", render_orphans(.0))]
    OrphanReference(Vec<Orphan>),

    #[error("expected exactly one Section Record, found {}: [{}]", .0.len(), .0.join(", "))]
    SectionRecordCardinality(Vec<String>),

    #[error("malformed dates: {}", render_dates(.0))]
    MalformedDate(Vec<DateIssue>),

    #[error("unknown level labels: {}", render_levels(.0))]
    UnknownLevel(Vec<(String, String)>),

    /// Independent defects found in the same pass.
    #[error("{}", render_several(.0))]
    Several(Vec<CatalogError>),
}

impl CatalogError {
    /// Number of offending entries carried by the error.
    pub fn offender_count(&self) -> usize {
        match self {
            Self::MissingField(gaps) => gaps.iter().map(|g| g.unit_ids.len()).sum(),
            Self::DuplicateIdentifier(ids) | Self::SectionRecordCardinality(ids) => ids.len(),
            Self::OrphanReference(orphans) => orphans.len(),
            Self::MalformedDate(issues) => issues.len(),
            Self::UnknownLevel(labels) => labels.len(),
            Self::Several(errors) => errors.iter().map(Self::offender_count).sum(),
        }
    }

    /// Folds the defects of one pass into a single error, if there are any.
    pub fn combine(mut errors: Vec<CatalogError>) -> Option<CatalogError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Several(errors)),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

fn render_gaps(gaps: &[FieldGap]) -> String {
    gaps.iter()
        .map(|g| format!("{} ({})", g.field, g.unit_ids.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn render_orphans(orphans: &[Orphan]) -> String {
    orphans
        .iter()
        .map(|o| format!("{} -> '{}'", o.unit_id, o.root_id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_dates(issues: &[DateIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{} ({})", i.unit_id, i.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_levels(labels: &[(String, String)]) -> String {
    labels
        .iter()
        .map(|(id, label)| format!("{id}: '{label}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_several(errors: &[CatalogError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orphan_message_lists_every_offender() {
        let error = CatalogError::OrphanReference(vec![
            Orphan {
                unit_id: "X-1-1".to_string(),
                root_id: "X-1".to_string(),
            },
            Orphan {
                unit_id: "X-2-1".to_string(),
                root_id: "X-2".to_string(),
            },
        ]);
        let message = error.to_string();
        assert!(message.contains("X-1-1 -> 'X-1'"));
        assert!(message.contains("X-2-1 -> 'X-2'"));
        assert_eq!(error.offender_count(), 2);
    }

    #[test]
    fn missing_field_counts_records() {
        let error = CatalogError::MissingField(vec![FieldGap {
            field: FieldName::Extent,
            unit_ids: vec!["A".to_string(), "B".to_string()],
        }]);
        assert_eq!(error.offender_count(), 2);
        assert_eq!(error.to_string(), "missing mandatory fields: EXTENT (A, B)");
    }

    #[test]
    fn combined_errors_keep_every_offender() {
        assert_eq!(CatalogError::combine(vec![]), None);
        let single = CatalogError::DuplicateIdentifier(vec!["X-1".to_string()]);
        assert_eq!(CatalogError::combine(vec![single.clone()]), Some(single.clone()));

        let levels = CatalogError::UnknownLevel(vec![("X-2".to_string(), "קופסה".to_string())]);
        let error = CatalogError::combine(vec![single, levels]).unwrap();
        assert_eq!(error.offender_count(), 2);
        assert_eq!(
            error.to_string(),
            "duplicate record identifiers: X-1; unknown level labels: X-2: 'קופסה'"
        );
    }
}
