use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{error, info, info_span, warn};

use catalog_cli::config::PipelineConfig;
use catalog_cli::io::{
    OUTPUT_TABLE_FILE, WrittenArtifacts, write_diagnostics, write_failure_report,
    write_output_table,
};
use catalog_cli::linkage::read_linkage;
use catalog_cli::pipeline::{PipelineInputs, run_pipeline};
use catalog_ingest::SchemaVersion;
use catalog_map::{ResolutionMode, ResolutionPolicy};
use catalog_marc::DigitizationLinkage;
use catalog_model::{CatalogError, RunDiagnostics};
use catalog_standards::load_authorities;

use crate::cli::{AuthoritiesArgs, ResolutionArg, RunArgs, SchemaArg};
use crate::prompt::TerminalPrompt;
use crate::summary::apply_table_style;
use crate::types::RunResult;

pub fn run_authorities(args: &AuthoritiesArgs) -> Result<()> {
    let (context, summaries) = load_authorities(&args.dir)
        .with_context(|| format!("load authorities from {}", args.dir.display()))?;
    let mut table = Table::new();
    table.set_header(vec!["Authority", "File", "Terms", "Synonyms", "SHA-256"]);
    apply_table_style(&mut table);
    for summary in &summaries {
        let file = summary
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        table.add_row(vec![
            summary.kind.to_string(),
            file,
            summary.terms.to_string(),
            summary.synonyms.to_string(),
            summary.sha256.chars().take(12).collect(),
        ]);
    }
    println!("{table}");
    println!(
        "{} authorities verified ({} role keys)",
        summaries.len(),
        context.role_index().len()
    );
    Ok(())
}

pub fn run_catalog(args: &RunArgs) -> Result<RunResult> {
    let run_span = info_span!("run", catalog = %args.catalog.display());
    let _run_guard = run_span.enter();
    let started = Instant::now();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(resolution) = args.resolution {
        config.resolution = match resolution {
            ResolutionArg::AutoAccept => ResolutionMode::AutoAccept,
            ResolutionArg::AutoReject => ResolutionMode::AutoReject,
            ResolutionArg::Prompt => ResolutionMode::Prompt,
        };
    }
    if let Some(schema) = args.schema {
        config.schema = Some(match schema {
            SchemaArg::V1 => SchemaVersion::V1,
            SchemaArg::V2 => SchemaVersion::V2,
        });
    }

    let output_dir = output_dir_for(args);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;

    let (authorities, _) = load_authorities(&args.authorities)
        .with_context(|| format!("load authorities from {}", args.authorities.display()))?;
    let linkage = args.linkage.as_deref().map(read_linkage).transpose()?;
    let mut policy = match config.resolution {
        ResolutionMode::AutoAccept => ResolutionPolicy::AutoAccept,
        ResolutionMode::AutoReject => ResolutionPolicy::AutoReject,
        ResolutionMode::Prompt => ResolutionPolicy::prompt(TerminalPrompt),
    };

    let inputs = PipelineInputs {
        catalog: &args.catalog,
        collection: &args.collection,
    };
    let mut diagnostics = RunDiagnostics::default();
    let outcome = run_pipeline(
        inputs,
        &authorities,
        &config,
        &mut policy,
        linkage.as_ref().map(|l| l as &dyn DigitizationLinkage),
        &mut diagnostics,
    );

    let mut artifacts = WrittenArtifacts {
        reports: write_diagnostics(&output_dir, &diagnostics)?,
        ..WrittenArtifacts::default()
    };
    let output = match outcome {
        Ok(output) => output,
        Err(failure) => {
            let Some(catalog_error) = failure.downcast_ref::<CatalogError>() else {
                return Err(failure);
            };
            error!(offenders = catalog_error.offender_count(), "{catalog_error}");
            artifacts
                .reports
                .push(write_failure_report(&output_dir, catalog_error)?);
            return Ok(RunResult::failed(
                output_dir,
                artifacts,
                diagnostics,
                catalog_error.to_string(),
            ));
        }
    };

    if args.dry_run {
        info!("dry run, encoded table not written");
    } else {
        let path = output_dir.join(OUTPUT_TABLE_FILE);
        write_output_table(&path, &output.table)?;
        artifacts.table = Some(path);
    }
    if diagnostics.unresolved_terms() > 0 || !diagnostics.roles.is_empty() {
        warn!(
            roles = diagnostics.roles.len(),
            terms = diagnostics.unresolved_terms(),
            "run finished with unresolved values"
        );
    }
    info!(
        records = output.batch.len(),
        duration_ms = started.elapsed().as_millis(),
        "run complete"
    );

    Ok(RunResult {
        collection_id: output.batch.collection.id.clone(),
        output_dir,
        artifacts,
        records: output.batch.len(),
        columns: output.table.columns().len(),
        schema: Some(output.schema),
        defaults: Some(output.defaults),
        diagnostics,
        failure: None,
    })
}

fn output_dir_for(args: &RunArgs) -> PathBuf {
    args.output_dir.clone().unwrap_or_else(|| {
        args.catalog
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("output")
    })
}
