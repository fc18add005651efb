//! Table Loader: any supported export file into a string [`Table`].
//!
//! Nothing is type-inferred here. Every cell stays a string, nulls become "",
//! and values are trimmed. Downstream code does explicit conversions.

use std::fs::{self, File};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use polars::prelude::{ParquetReader, SerReader};
use respat_model::{Table, TextEncoding};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::polars_utils::{format_numeric, frame_to_table};
use crate::text::decode_text;

/// File formats the loader understands, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Tsv,
    Csv,
    Excel,
    Parquet,
}

impl FileFormat {
    pub const EXTENSIONS: [&'static str; 5] = ["tsv", "csv", "xls", "xlsx", "parquet"];

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "tsv" => Some(FileFormat::Tsv),
            "csv" => Some(FileFormat::Csv),
            "xls" | "xlsx" => Some(FileFormat::Excel),
            "parquet" => Some(FileFormat::Parquet),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

pub(crate) fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Load a file into a [`Table`], dispatching on its extension.
///
/// `encoding` applies to TSV and CSV only.
pub fn load_table(path: &Path, encoding: TextEncoding) -> Result<Table> {
    let format = FileFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string(),
    })?;
    let table = match format {
        FileFormat::Tsv => read_delimited(path, b'\t', encoding)?,
        FileFormat::Csv => read_delimited(path, b',', encoding)?,
        FileFormat::Excel => read_workbook(path)?,
        FileFormat::Parquet => read_parquet(path)?,
    };
    debug!(
        path = %path.display(),
        ?format,
        rows = table.len(),
        columns = table.headers.len(),
        "loaded table"
    );
    Ok(table)
}

fn read_delimited(path: &Path, delimiter: u8, encoding: TextEncoding) -> Result<Table> {
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_text(&bytes, encoding);
    let parsed = parse_records(&text, delimiter).map_err(|source| IngestError::Delimited {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(first) = parsed.overlong_lines.first() {
        warn!(
            path = %path.display(),
            rows = parsed.overlong_lines.len(),
            first_line = first,
            columns = parsed.table.headers.len(),
            "rows with more cells than the header; extra cells dropped"
        );
    }
    Ok(parsed.table)
}

/// Parse already-decoded delimited text. The first record is the header.
///
/// Short rows are padded with empty cells. Cells beyond the header width are
/// dropped.
pub fn parse_delimited(text: &str, delimiter: u8) -> std::result::Result<Table, csv::Error> {
    parse_records(text, delimiter).map(|parsed| parsed.table)
}

struct ParsedText {
    table: Table,
    /// 1-based line numbers of rows wider than the header.
    overlong_lines: Vec<u64>,
}

fn parse_records(text: &str, delimiter: u8) -> std::result::Result<ParsedText, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(normalize_header).collect(),
        None => {
            return Ok(ParsedText {
                table: Table::default(),
                overlong_lines: Vec::new(),
            });
        }
    };
    let mut rows = Vec::new();
    let mut overlong_lines = Vec::new();
    for record in records {
        let record = record?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        if row.len() > headers.len() && row[headers.len()..].iter().any(|cell| !cell.is_empty()) {
            overlong_lines.push(record.position().map_or(0, |pos| pos.line()));
        }
        rows.push(row);
    }
    Ok(ParsedText {
        table: Table::from_rows(headers, rows),
        overlong_lines,
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => normalize_cell(s),
        Data::Float(f) => format_numeric(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.time() == chrono::NaiveTime::MIN => {
                value.format("%Y-%m-%d").to_string()
            }
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_numeric(dt.as_f64()),
        },
        other => other.to_string(),
    }
}

fn read_workbook(path: &Path) -> Result<Table> {
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(first_sheet) = sheet_names.first() else {
        return Err(workbook_error("workbook has no sheets".to_string()));
    };
    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| workbook_error(e.to_string()))?;
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(row) => row
            .iter()
            .map(|cell| normalize_header(&cell_to_string(cell)))
            .collect(),
        None => return Ok(Table::default()),
    };
    let body = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();
    Ok(Table::from_rows(headers, body))
}

fn read_parquet(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|source| IngestError::Parquet {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(frame_to_table(&df))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_whitespace_collapses() {
        assert_eq!(normalize_header("\u{feff} Gene   S "), "Gene S");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(FileFormat::from_extension("XLSX"), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_extension("json"), None);
    }

    #[test]
    fn delimited_pads_short_rows() {
        let table = parse_delimited("a\tb\tc\n1\t2\n\n", b'\t').expect("parse");
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.rows, vec![vec!["1", "2", ""]]);
    }

    #[test]
    fn overlong_rows_are_reported_by_line() {
        let text = "a\tb\n1\t2\n3\t4\t5\n6\t7\t\n";
        let parsed = parse_records(text, b'\t').expect("parse");
        assert_eq!(parsed.overlong_lines, vec![3]);
        assert_eq!(parsed.table.rows[1], vec!["3", "4"]);
        assert_eq!(parsed.table.rows[2], vec!["6", "7"]);
    }
}
