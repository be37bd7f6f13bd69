//! Run artifacts: the encoded table as CSV and diagnostic reports as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use catalog_marc::OutputTable;
use catalog_model::{CatalogError, RunDiagnostics};

pub const OUTPUT_TABLE_FILE: &str = "catalog_marc.csv";
pub const ROLE_REPORT_FILE: &str = "role_discrepancies.json";
pub const MATCH_REPORT_FILE: &str = "vocabulary_matches.json";
pub const DIAGNOSTICS_FILE: &str = "diagnostics.json";
pub const FAILURE_REPORT_FILE: &str = "failure_report.json";

/// Paths written by one run.
#[derive(Debug, Clone, Default)]
pub struct WrittenArtifacts {
    pub table: Option<PathBuf>,
    pub reports: Vec<PathBuf>,
}

pub fn write_output_table(path: &Path, table: &OutputTable) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(table.columns())
        .with_context(|| format!("write header to {}", path.display()))?;
    for row in table.rows() {
        writer
            .write_record(&row)
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    info!(path = %path.display(), records = table.len(), "output table written");
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize report")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Writes the role report, the per-field match reports and the full
/// diagnostics into `dir`.
pub fn write_diagnostics(dir: &Path, diagnostics: &RunDiagnostics) -> Result<Vec<PathBuf>> {
    let reports = [
        (ROLE_REPORT_FILE, serde_json::to_value(&diagnostics.roles)?),
        (
            MATCH_REPORT_FILE,
            serde_json::to_value(&diagnostics.match_reports)?,
        ),
        (DIAGNOSTICS_FILE, serde_json::to_value(diagnostics)?),
    ];
    let mut written = Vec::new();
    for (name, value) in reports {
        let path = dir.join(name);
        write_json(&path, &value)?;
        written.push(path);
    }
    info!(dir = %dir.display(), reports = written.len(), "diagnostics written");
    Ok(written)
}

/// JSON form of a fatal batch error, offenders included.
pub fn failure_report(error: &CatalogError) -> Result<Value> {
    let (kind, offenders) = match error {
        CatalogError::MissingField(gaps) => ("missing-field", serde_json::to_value(gaps)?),
        CatalogError::DuplicateIdentifier(ids) => {
            ("duplicate-identifier", serde_json::to_value(ids)?)
        }
        CatalogError::OrphanReference(orphans) => {
            ("orphan-reference", serde_json::to_value(orphans)?)
        }
        CatalogError::SectionRecordCardinality(ids) => {
            ("section-record-cardinality", serde_json::to_value(ids)?)
        }
        CatalogError::MalformedDate(issues) => ("malformed-date", serde_json::to_value(issues)?),
        CatalogError::UnknownLevel(labels) => ("unknown-level", serde_json::to_value(labels)?),
        CatalogError::Several(errors) => (
            "several",
            Value::Array(errors.iter().map(failure_report).collect::<Result<_>>()?),
        ),
    };
    Ok(json!({
        "error": kind,
        "message": error.to_string(),
        "offender_count": error.offender_count(),
        "offenders": offenders,
    }))
}

pub fn write_failure_report(dir: &Path, error: &CatalogError) -> Result<PathBuf> {
    let path = dir.join(FAILURE_REPORT_FILE);
    write_json(&path, &failure_report(error)?)?;
    Ok(path)
}
