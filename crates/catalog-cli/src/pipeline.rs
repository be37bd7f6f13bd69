//! Pipeline orchestration: collection, normalize, hierarchy, creators,
//! vocabulary, encode.
//!
//! Each stage runs inside its own `info_span!`. Fatal batch errors surface as
//! [`CatalogError`] inside the returned `anyhow::Error`, so callers can
//! downcast them to write a failure report.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use catalog_core::{
    DefaultsSummary, apply_record_defaults, classify_creators, final_date_validation,
    normalize_dates, resolve_hierarchy,
};
use catalog_ingest::{
    SchemaVersion, materialize_records, normalize_collection, normalize_table, read_raw_table,
};
use catalog_map::ResolutionPolicy;
use catalog_marc::{DigitizationLinkage, MarcEncoder, OutputTable};
use catalog_model::{Batch, Collection, RunDiagnostics};
use catalog_standards::AuthorityContext;
use catalog_validate::validate_vocabulary;

use crate::config::PipelineConfig;
use crate::logging::redact_value;

/// Files read by one run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInputs<'a> {
    pub catalog: &'a Path,
    pub collection: &'a Path,
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub batch: Batch,
    pub schema: SchemaVersion,
    pub defaults: DefaultsSummary,
    pub table: OutputTable,
}

/// Reads and normalizes the collection metadata table.
pub fn load_collection(path: &Path) -> Result<Collection> {
    let span = info_span!("collection", path = %path.display());
    let _guard = span.enter();
    let raw = read_raw_table(path)?;
    let collection = normalize_collection(&raw)
        .with_context(|| format!("normalize collection table {}", path.display()))?;
    info!(collection_id = %collection.id, "collection loaded");
    Ok(collection)
}

/// Reads the catalog and builds the batch: canonical fields, typed records,
/// title cleanup, the access default and advisory date normalization.
pub fn load_batch(
    path: &Path,
    collection: Collection,
    config: &PipelineConfig,
    diagnostics: &mut RunDiagnostics,
) -> Result<(Batch, SchemaVersion, DefaultsSummary)> {
    let span = info_span!("normalize", path = %path.display());
    let _guard = span.enter();
    let start = Instant::now();
    let raw = read_raw_table(path)?;
    let table = normalize_table(&raw, config.schema)?;
    let records = materialize_records(&table)?;
    let mut batch = Batch::new(collection, records);
    let defaults = apply_record_defaults(&mut batch, &config.default_access_restriction);
    diagnostics.dates = normalize_dates(&mut batch);
    info!(
        records = batch.len(),
        duration_ms = start.elapsed().as_millis(),
        "catalog normalized"
    );
    Ok((batch, table.schema, defaults))
}

/// Runs every stage on already-loaded inputs.
pub fn process_batch(
    batch: &mut Batch,
    authorities: &AuthorityContext,
    config: &PipelineConfig,
    policy: &mut ResolutionPolicy,
    linkage: Option<&dyn DigitizationLinkage>,
    diagnostics: &mut RunDiagnostics,
) -> Result<OutputTable> {
    diagnostics.hierarchy = info_span!("hierarchy").in_scope(|| resolve_hierarchy(batch))?;

    let creators = info_span!("creators").in_scope(|| {
        let start = Instant::now();
        let outcome = classify_creators(batch, authorities, policy, &config.creator_options());
        for (from, to) in &outcome.corrections {
            debug!(from = redact_value(from), to = %to, "role rewrite");
        }
        info!(
            unresolved = outcome.report.len(),
            corrected = outcome.corrections.len(),
            assembled = outcome.assembled,
            keywords_removed = outcome.keywords_removed,
            duration_ms = start.elapsed().as_millis(),
            "creators classified"
        );
        outcome
    });
    diagnostics.roles = creators.report;
    diagnostics.role_corrections = creators.corrections;

    let vocabulary = info_span!("vocabulary").in_scope(|| {
        validate_vocabulary(batch, authorities, policy, &config.validation_options())
    });
    info!(
        corrected = vocabulary.corrected(),
        unresolved = vocabulary.unresolved(),
        "vocabulary validated"
    );
    diagnostics.vocabulary = vocabulary.issues;
    diagnostics.match_reports = vocabulary.reports;

    final_date_validation(batch)?;

    let encoder = MarcEncoder::new(authorities, &config.marc);
    let encoder = match linkage {
        Some(linkage) => encoder.with_linkage(linkage),
        None => encoder,
    };
    let start = Instant::now();
    let table = encoder.encode_batch(batch);
    info!(
        records = table.len(),
        duration_ms = start.elapsed().as_millis(),
        "records encoded"
    );
    Ok(table)
}

/// Full run from files on disk.
///
/// On a fatal error the diagnostics gathered so far are kept in
/// `diagnostics`, so the caller can still write them out.
pub fn run_pipeline(
    inputs: PipelineInputs<'_>,
    authorities: &AuthorityContext,
    config: &PipelineConfig,
    policy: &mut ResolutionPolicy,
    linkage: Option<&dyn DigitizationLinkage>,
    diagnostics: &mut RunDiagnostics,
) -> Result<PipelineOutput> {
    let collection = load_collection(inputs.collection)?;
    let (mut batch, schema, defaults) =
        load_batch(inputs.catalog, collection, config, diagnostics)?;
    let table = process_batch(
        &mut batch,
        authorities,
        config,
        policy,
        linkage,
        diagnostics,
    )?;
    Ok(PipelineOutput {
        batch,
        schema,
        defaults,
        table,
    })
}
