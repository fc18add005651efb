//! Output generation for the combined respiratory pathogen table.
//!
//! - **aggregate**: fold cache and per-file tables, report and collapse
//!   full-row duplicates, stable sort
//! - **tsv**: tab-separated writer

pub mod aggregate;
pub mod error;
pub mod tsv;

pub use aggregate::{
    Aggregate, DUPLICATES_FILE, aggregate, concat, duplicate_rows, duplicates_path, keep_last,
    sort_rows,
};
pub use error::{OutputError, Result};
pub use tsv::write_tsv;
