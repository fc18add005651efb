//! Fold per-file tables into the final output table.
//!
//! The fold keeps input order: cache rows first, then each file in the order it
//! was processed. Full-row duplicates are reported through a side file and
//! collapsed to their last occurrence before the stable sort.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use respat_model::schema::{CANONICAL_COLUMNS, SORT_COLUMNS};
use respat_model::Table;
use tracing::{info, info_span, warn};

use crate::error::Result;
use crate::tsv::write_tsv;

/// File name of the duplicate side file, written under the data directory.
pub const DUPLICATES_FILE: &str = "duplicates.tsv";

pub fn duplicates_path(datadir: &Path) -> PathBuf {
    datadir.join(DUPLICATES_FILE)
}

/// Final table plus what the duplicate pass found.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub table: Table,
    /// Every member row of every duplicate group, in input order.
    pub duplicates: Table,
    /// Rows removed by keep-last.
    pub dropped: usize,
}

/// Concatenate tables under the canonical columns.
pub fn concat<I>(tables: I) -> Table
where
    I: IntoIterator<Item = Table>,
{
    let mut combined = Table::new(CANONICAL_COLUMNS.iter().map(|c| (*c).to_string()).collect());
    for table in tables {
        let aligned = if table.headers == combined.headers {
            table
        } else {
            table.select(&CANONICAL_COLUMNS)
        };
        combined.rows.extend(aligned.rows);
    }
    combined
}

/// Indexes of rows whose full content appears more than once.
pub fn duplicate_rows(table: &Table) -> Vec<usize> {
    let mut counts: HashMap<&[String], usize> = HashMap::new();
    for row in &table.rows {
        *counts.entry(row.as_slice()).or_default() += 1;
    }
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| counts.get(row.as_slice()).copied().unwrap_or_default() > 1)
        .map(|(idx, _)| idx)
        .collect()
}

/// Drop all but the last occurrence of each identical row. Returns the number dropped.
pub fn keep_last(table: &mut Table) -> usize {
    let mut last: HashMap<&[String], usize> = HashMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        last.insert(row.as_slice(), idx);
    }
    let mut keep: Vec<bool> = vec![false; table.rows.len()];
    for idx in last.into_values() {
        keep[idx] = true;
    }

    let before = table.rows.len();
    let mut flags = keep.into_iter();
    table.rows.retain(|_| flags.next().unwrap_or(false));
    before - table.rows.len()
}

/// Stable sort by lab, test id and test date, comparing strings byte-wise.
pub fn sort_rows(table: &mut Table) {
    let keys: Vec<Option<usize>> = SORT_COLUMNS
        .iter()
        .map(|column| table.column_index(column))
        .collect();
    table.rows.sort_by(|a, b| {
        keys.iter()
            .flatten()
            .map(|&idx| a[idx].cmp(&b[idx]))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Run the duplicate pass and sort, writing the side file when duplicates exist.
///
/// # Errors
///
/// Fails when the duplicate side file cannot be written.
pub fn aggregate<I>(tables: I, duplicates_file: &Path) -> Result<Aggregate>
where
    I: IntoIterator<Item = Table>,
{
    let span = info_span!("aggregate");
    let _guard = span.enter();
    let start = Instant::now();

    let mut table = concat(tables);
    let members = duplicate_rows(&table);
    let duplicates = Table::from_rows(
        table.headers.clone(),
        members.iter().map(|&idx| table.rows[idx].clone()).collect(),
    );

    let dropped = if duplicates.is_empty() {
        0
    } else {
        write_tsv(&duplicates, duplicates_file)?;
        let dropped = keep_last(&mut table);
        warn!(
            path = %duplicates_file.display(),
            rows = duplicates.len(),
            dropped,
            "duplicated rows found; keeping the last occurrence"
        );
        dropped
    };

    sort_rows(&mut table);
    info!(
        rows = table.len(),
        dropped,
        duration_ms = start.elapsed().as_millis(),
        "aggregate complete"
    );
    Ok(Aggregate {
        table,
        duplicates,
        dropped,
    })
}
