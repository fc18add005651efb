//! Error types for lab export ingestion.

use std::path::PathBuf;

use respat_model::ModelError;
use thiserror::Error;

/// Errors that can occur while loading lab exports and catalogs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Format Errors ===
    /// Extension is not one of tsv, csv, xls, xlsx, parquet.
    #[error("unsupported file format '{extension}' for {path}: expected TSV, CSV, XLS, XLSX or Parquet")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Delimited text could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Delimited {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Spreadsheet could not be opened or has no readable sheet.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Parquet file could not be read.
    #[error("failed to read parquet {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },

    // === Catalog Errors ===
    /// Catalog table is missing a required column.
    #[error("invalid catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
