//! Export pipeline with explicit stages.
//!
//! 1. **Plan**: resolve the output format and structure, before any I/O
//! 2. **Load**: read the run cache when asked to, otherwise
//! 3. **Fetch**: read identifiers, authenticate, retrieve value sets, save
//!    the cache
//! 4. **Normalize**: drop unusable value sets, make names unique
//! 5. **Build + Write**: assign surrogate ids, write each table
//!
//! An unsupported export fails in the plan stage and touches no file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use vsac_client::{TerminologyClient, download_sheet_csv};
use vsac_ingest::{
    OidList, cache_path, load_cache, parse_sheet_csv, read_csv_oids, read_txt_oids, save_cache,
};
use vsac_model::{ExportPlan, InputSourceType, RawValueSet, ValueSet};
use vsac_output::{DelimitedWriter, OUTPUT_NAME, WrittenTable, output_dir};
use vsac_transform::{
    IdentifierLookup, NormalizeReport, RunStamp, export_palantir_tables, normalize_value_sets,
    resolve_identifiers,
};

use crate::types::{InputSource, RunConfig, RunSummary};

// ============================================================================
// Stage 1: Plan
// ============================================================================

/// Resolve the requested export.
pub fn resolve_plan(config: &RunConfig) -> Result<ExportPlan> {
    let plan = ExportPlan::resolve(config.output_format, config.output_structure)?;
    Ok(plan)
}

// ============================================================================
// Stage 2: Load
// ============================================================================

/// Read the cache at `path`. A missing or unreadable cache is a miss.
pub fn load(path: &Path) -> Option<Vec<RawValueSet>> {
    match load_cache(path) {
        Ok(Some(value_sets)) => Some(value_sets),
        Ok(None) => {
            info!(path = %path.display(), "no cache file; fetching");
            None
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unusable cache; fetching");
            None
        }
    }
}

// ============================================================================
// Stage 3: Fetch
// ============================================================================

/// Read value set identifiers from the configured input.
pub fn read_identifiers(input: &InputSource) -> Result<OidList> {
    let list = match input.source_type {
        InputSourceType::Txt => read_txt_oids(Path::new(&input.location))
            .with_context(|| format!("read identifiers from {}", input.location))?,
        InputSourceType::Csv => read_csv_oids(Path::new(&input.location))
            .with_context(|| format!("read identifiers from {}", input.location))?,
        InputSourceType::GoogleSheet => {
            let text = download_sheet_csv(&input.location)
                .with_context(|| format!("download sheet {}", input.location))?;
            parse_sheet_csv(&text, input.cache_name())
                .with_context(|| format!("parse sheet {}", input.location))?
        }
    };
    info!(
        source = %input.location,
        oids = list.len(),
        skipped_do_not_load = list.skipped_do_not_load,
        duplicates = list.duplicates,
        "read value set identifiers"
    );
    Ok(list)
}

/// Authenticate and retrieve one value set per identifier, in order.
pub fn fetch<C: TerminologyClient>(
    client: &C,
    oids: &[String],
    show_progress: bool,
) -> Result<Vec<RawValueSet>> {
    let ticket = client.authenticate().context("authenticate with VSAC")?;
    let progress = if show_progress {
        ProgressBar::new(oids.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_prefix("VSAC");
    apply_fetch_progress_style(&progress);
    progress.enable_steady_tick(Duration::from_millis(250));

    let value_sets = client
        .fetch(oids, &ticket, |value_set| {
            progress.set_message(value_set.oid.clone());
            progress.inc(1);
        })
        .context("fetch value sets")?;
    progress.finish_and_clear();
    info!(value_sets = value_sets.len(), "retrieved value sets");
    Ok(value_sets)
}

fn apply_fetch_progress_style(progress: &ProgressBar) {
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {prefix:.bold} [{elapsed_precise}] [{bar:32.cyan/blue}] \
{pos}/{len} eta {eta} {msg}",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }
}

// ============================================================================
// Stage 4: Normalize
// ============================================================================

pub fn normalize(raw: Vec<RawValueSet>) -> Result<NormalizeReport> {
    let report = normalize_value_sets(raw).context("normalize value sets")?;
    info!(
        value_sets = report.value_sets.len(),
        dropped = report.dropped.len(),
        renamed = report.renamed.len(),
        "normalized value sets"
    );
    Ok(report)
}

// ============================================================================
// Stage 5: Build + Write
// ============================================================================

/// Result of the build and write stage.
#[derive(Debug)]
pub struct OutputResult {
    pub output_dir: PathBuf,
    pub lookup: IdentifierLookup,
    pub tables: Vec<WrittenTable>,
}

/// Resolve surrogate ids and write the tables of `plan`.
pub fn output(
    config: &RunConfig,
    plan: ExportPlan,
    value_sets: &[ValueSet],
) -> Result<OutputResult> {
    let lookup = resolve_identifiers(&config.id_map_path, value_sets, &config.input.location)
        .with_context(|| format!("resolve identifiers with {}", config.id_map_path.display()))?;
    let dir = output_dir(
        &config.data_dir,
        OUTPUT_NAME,
        &config.source_name,
        config.output_date,
    );
    let mut writer = DelimitedWriter::new(&dir, config.field_delimiter);
    let stamp = RunStamp::now();
    match plan {
        ExportPlan::PalantirConceptSetTables => {
            export_palantir_tables(
                value_sets,
                &lookup,
                &stamp,
                &config.table_options,
                &mut writer,
            )
            .with_context(|| format!("write tables to {}", dir.display()))?;
        }
    }
    Ok(OutputResult {
        output_dir: dir,
        lookup,
        tables: writer.into_written(),
    })
}

// ============================================================================
// Run
// ============================================================================

/// Run every stage.
///
/// `connect` is only called when value sets have to be fetched, so a cache
/// hit needs no credentials.
pub fn run_export<C, F>(config: &RunConfig, connect: F) -> Result<RunSummary>
where
    C: TerminologyClient,
    F: FnOnce() -> Result<C>,
{
    let plan = resolve_plan(config)?;
    let source = config.input.location.clone();
    let cache_file = cache_path(
        &config.cache_dir,
        config.input.source_type,
        config.input.cache_name(),
    );

    let cached = if config.use_cache {
        let _span = info_span!("load", cache = %cache_file.display()).entered();
        load(&cache_file)
    } else {
        None
    };
    let from_cache = cached.is_some();

    let (raw, requested) = match cached {
        Some(raw) => (raw, 0),
        None => {
            let _span = info_span!("fetch", source = %source).entered();
            let identifiers = read_identifiers(&config.input)?;
            let client = connect().context("create terminology client")?;
            let raw = fetch(&client, &identifiers.oids, config.show_progress)?;
            save_cache(&cache_file, config.input.cache_name(), &raw)
                .with_context(|| format!("save cache {}", cache_file.display()))?;
            (raw, identifiers.len())
        }
    };
    let retrieved = raw.len();

    let report = {
        let _span = info_span!("normalize").entered();
        normalize(raw)?
    };

    let result = {
        let _span = info_span!("output", plan = ?plan).entered();
        output(config, plan, &report.value_sets)?
    };

    Ok(RunSummary {
        output_format: plan.output_format(),
        output_structure: plan.output_structure(),
        source,
        from_cache,
        cache_path: cache_file,
        requested,
        retrieved,
        exported: report.value_sets.len(),
        dropped: report.dropped,
        renamed: report.renamed,
        new_ids: result.lookup.newly_assigned().to_vec(),
        output_dir: result.output_dir,
        tables: result.tables,
    })
}
