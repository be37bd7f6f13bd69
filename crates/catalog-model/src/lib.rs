pub mod collection;
pub mod creator;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod level;
pub mod matching;
pub mod record;

pub use collection::{Batch, Collection};
pub use creator::{Creator, CreatorKind};
pub use diagnostics::{
    DateIssue, HierarchyEntry, MatchReport, MatchReportRow, RoleDiscrepancy, RoleReport,
    RootSource, RunDiagnostics, VocabularyIssue,
};
pub use error::{CatalogError, FieldGap, Orphan, Result};
pub use field::FieldName;
pub use level::Level;
pub use matching::{MatchCandidate, MatchResult};
pub use record::{Record, VALUE_DELIMITER, split_values};
