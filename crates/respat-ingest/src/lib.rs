pub mod catalog;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod polars_utils;
pub mod text;

pub use catalog::{load_correction_catalog, load_rename_catalog};
pub use discovery::{lab_directory, list_lab_files};
pub use error::{IngestError, Result};
pub use loader::{FileFormat, load_table, parse_delimited};
pub use polars_utils::{any_to_string, format_numeric};
pub use text::decode_text;
