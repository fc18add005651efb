//! Lab job pipeline with explicit stages.
//!
//! 1. **Setup**: load catalogs and the cache baseline
//! 2. **Discover**: list the lab's export files
//! 3. **Process**: load, reconcile and post-process each file
//! 4. **Aggregate**: fold cache and file tables, collapse duplicates, sort
//! 5. **Output**: write the combined TSV
//!
//! Each file yields its own table; the tables are combined only in stage 4.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use respat_core::{
    CtRescale, FileOutcome, LabProcessor, ReconcileContext, SeenSamples, default_registry,
};
use respat_ingest::{
    lab_directory, list_lab_files, load_correction_catalog, load_rename_catalog, load_table,
};
use respat_model::{LabId, Table, TextEncoding};
use respat_output::{aggregate, duplicates_path, write_tsv};
use respat_transform::{Catalogs, postprocess, project};

use crate::types::{FileSummary, JobResult};

/// Everything a lab job needs, as given on the command line.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub lab: LabId,
    pub datadir: PathBuf,
    pub rename: Option<PathBuf>,
    pub correction: Option<PathBuf>,
    pub cache: Option<PathBuf>,
    pub output: PathBuf,
    pub ct: CtRescale,
}

// ============================================================================
// Stage 1: Setup
// ============================================================================

#[derive(Debug, Default)]
pub struct JobInputs {
    pub catalogs: Catalogs,
    /// Cache rows projected to the canonical columns.
    pub cache: Table,
    pub seen: SeenSamples,
}

/// Load the optional rename and correction catalogs and the cache table.
pub fn setup(config: &JobConfig) -> Result<JobInputs> {
    let mut inputs = JobInputs::default();
    if let Some(path) = &config.rename {
        inputs.catalogs.renames = load_rename_catalog(path)
            .with_context(|| format!("load rename catalog {}", path.display()))?;
    }
    if let Some(path) = &config.correction {
        inputs.catalogs.corrections = load_correction_catalog(path)
            .with_context(|| format!("load correction catalog {}", path.display()))?;
    }
    if let Some(path) = &config.cache {
        let raw = load_table(path, TextEncoding::Utf8)
            .with_context(|| format!("load cache {}", path.display()))?;
        inputs.cache = project(&raw);
        inputs.seen = SeenSamples::from_table(&inputs.cache);
        info!(
            path = %path.display(),
            rows = inputs.cache.len(),
            samples = inputs.seen.len(),
            "loaded cache"
        );
    }
    Ok(inputs)
}

// ============================================================================
// Stage 2: Discover
// ============================================================================

/// Export files of the job's lab, in file name order.
///
/// A missing lab directory is not an error: the job then only rewrites the cache.
pub fn discover(datadir: &Path, lab: LabId) -> Result<Vec<PathBuf>> {
    let dir = lab_directory(datadir, lab);
    if !dir.is_dir() {
        warn!(lab = %lab, dir = %dir.display(), "lab directory not found; no files to process");
        return Ok(Vec::new());
    }
    let files = list_lab_files(&dir).with_context(|| format!("list {}", dir.display()))?;
    info!(lab = %lab, files = files.len(), "discovered export files");
    Ok(files)
}

// ============================================================================
// Stage 3: Process
// ============================================================================

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Load, reconcile and post-process one file.
///
/// Returns the file's canonical table, or `None` when the file was skipped or
/// holds nothing new.
pub fn process_file(
    path: &Path,
    processor: &dyn LabProcessor,
    ctx: &ReconcileContext<'_>,
    catalogs: &Catalogs,
) -> Result<(FileSummary, Option<Table>)> {
    let lab = processor.lab();
    let file = file_label(path);
    let span = info_span!("file", lab = %lab, file = %file);
    let _guard = span.enter();
    let start = Instant::now();

    let raw = load_table(path, lab.encoding()).with_context(|| format!("load {}", path.display()))?;
    let outcome = processor
        .process(raw, ctx)
        .with_context(|| format!("reconcile {}", path.display()))?;

    let reconciled = match outcome {
        FileOutcome::Reconciled(reconciled) => reconciled,
        FileOutcome::Skipped { reason } => {
            let summary = FileSummary {
                file,
                layout: None,
                rows_in: 0,
                seen: 0,
                new: 0,
                records: 0,
                skipped: Some(reason),
            };
            return Ok((summary, None));
        }
    };

    let (seen, new) = reconciled.dedup.counts();
    let mut summary = FileSummary {
        file,
        layout: Some(reconciled.layout),
        rows_in: reconciled.rows_in,
        seen,
        new,
        records: 0,
        skipped: None,
    };
    if reconciled.records.is_empty() {
        debug!(layout = reconciled.layout, "nothing new in file");
        return Ok((summary, None));
    }

    let table = postprocess(reconciled.into_table(), lab, catalogs);
    summary.records = table.len();
    info!(
        layout = summary.layout.unwrap_or_default(),
        seen,
        new,
        records = summary.records,
        duration_ms = start.elapsed().as_millis(),
        "file processed"
    );
    Ok((summary, Some(table)))
}

// ============================================================================
// Job
// ============================================================================

/// Run one lab job end to end and write its output.
pub fn run_job(config: &JobConfig) -> Result<JobResult> {
    let lab = config.lab;
    let job_span = info_span!("job", lab = %lab);
    let _job_guard = job_span.enter();

    let setup_start = Instant::now();
    let inputs = info_span!("setup").in_scope(|| setup(config))?;
    info!(duration_ms = setup_start.elapsed().as_millis(), "setup complete");

    let files = info_span!("discover").in_scope(|| discover(&config.datadir, lab))?;

    let processor = default_registry().get(lab)?;
    let ctx = ReconcileContext {
        seen: &inputs.seen,
        ct: &config.ct,
    };
    let process_start = Instant::now();
    let mut summaries = Vec::with_capacity(files.len());
    let mut tables = Vec::with_capacity(files.len());
    for path in &files {
        let (summary, table) = process_file(path, processor, &ctx, &inputs.catalogs)?;
        summaries.push(summary);
        tables.extend(table);
    }
    info!(
        files = summaries.len(),
        duration_ms = process_start.elapsed().as_millis(),
        "process complete"
    );

    let cache_rows = inputs.cache.len();
    let side_file = duplicates_path(&config.datadir);
    let combined = aggregate(std::iter::once(inputs.cache).chain(tables), &side_file)
        .context("aggregate tables")?;

    let output_start = Instant::now();
    info_span!("output").in_scope(|| write_tsv(&combined.table, &config.output))
        .with_context(|| format!("write {}", config.output.display()))?;
    info!(
        path = %config.output.display(),
        rows = combined.table.len(),
        duration_ms = output_start.elapsed().as_millis(),
        "output complete"
    );

    Ok(JobResult {
        lab,
        output: config.output.clone(),
        files: summaries,
        cache_rows,
        output_rows: combined.table.len(),
        duplicates_dropped: combined.dropped,
        duplicates_file: (!combined.duplicates.is_empty()).then_some(side_file),
    })
}
