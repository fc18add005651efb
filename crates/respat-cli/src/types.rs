use std::path::PathBuf;

use respat_model::LabId;

/// What one raw file contributed to the job.
#[derive(Debug, Clone)]
pub struct FileSummary {
    pub file: String,
    pub layout: Option<&'static str>,
    pub rows_in: usize,
    pub seen: usize,
    pub new: usize,
    /// Canonical records emitted after post-processing.
    pub records: usize,
    pub skipped: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JobResult {
    pub lab: LabId,
    pub output: PathBuf,
    pub files: Vec<FileSummary>,
    pub cache_rows: usize,
    pub output_rows: usize,
    pub duplicates_dropped: usize,
    /// Set when duplicate rows were written to the side file.
    pub duplicates_file: Option<PathBuf>,
}

impl JobResult {
    pub fn new_records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    /// Every processed file was fully covered by the cache.
    pub fn all_previously_processed(&self) -> bool {
        self.files
            .iter()
            .filter(|f| f.skipped.is_none())
            .all(|f| f.new == 0)
    }
}
