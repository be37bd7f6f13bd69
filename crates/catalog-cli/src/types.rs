use std::path::PathBuf;

use catalog_cli::io::WrittenArtifacts;
use catalog_core::DefaultsSummary;
use catalog_ingest::SchemaVersion;
use catalog_model::RunDiagnostics;

#[derive(Debug)]
pub struct RunResult {
    pub collection_id: String,
    pub output_dir: PathBuf,
    pub artifacts: WrittenArtifacts,
    pub records: usize,
    pub columns: usize,
    pub schema: Option<SchemaVersion>,
    pub defaults: Option<DefaultsSummary>,
    pub diagnostics: RunDiagnostics,
    /// Fatal batch error that stopped the run.
    pub failure: Option<String>,
}

impl RunResult {
    pub fn failed(
        output_dir: PathBuf,
        artifacts: WrittenArtifacts,
        diagnostics: RunDiagnostics,
        failure: String,
    ) -> Self {
        Self {
            collection_id: String::new(),
            output_dir,
            artifacts,
            records: 0,
            columns: 0,
            schema: None,
            defaults: None,
            diagnostics,
            failure: Some(failure),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.failure.is_some()
    }
}
