//! Tab-separated writer for string tables.

use std::fs;
use std::path::Path;

use csv::WriterBuilder;
use respat_model::Table;
use tracing::debug;

use crate::error::{OutputError, Result};

/// Write `table` with a header row, creating parent directories as needed.
pub fn write_tsv(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_error = |source: csv::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(write_error)?;
    writer.write_record(&table.headers).map_err(write_error)?;
    for row in &table.rows {
        writer.write_record(row).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|e| write_error(csv::Error::from(e)))?;

    debug!(path = %path.display(), rows = table.len(), "wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/out/combined.tsv");
        let table = Table::from_rows(
            vec!["lab_id".into(), "test_id".into()],
            vec![vec!["SABIN".into(), "R1".into()]],
        );
        write_tsv(&table, &path).expect("write");
        let text = fs::read_to_string(&path).expect("read back");
        assert_eq!(text, "lab_id\ttest_id\nSABIN\tR1\n");
    }
}
