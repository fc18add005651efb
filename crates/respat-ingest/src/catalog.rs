//! Catalog file loading.

use std::path::Path;

use respat_model::{CorrectionCatalog, RenameCatalog, TextEncoding};
use tracing::info;

use crate::error::{IngestError, Result};
use crate::loader::load_table;

/// Load the rename catalog (`lab_id`, `column_name`, `new_name`).
pub fn load_rename_catalog(path: &Path) -> Result<RenameCatalog> {
    let table = load_table(path, TextEncoding::Utf8)?;
    let catalog = RenameCatalog::from_table(&table).map_err(|source| IngestError::Catalog {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), entries = table.len(), "loaded rename catalog");
    Ok(catalog)
}

/// Load the correction catalog (`lab_id`, `column_name`, `old_data`, `new_data`).
pub fn load_correction_catalog(path: &Path) -> Result<CorrectionCatalog> {
    let table = load_table(path, TextEncoding::Utf8)?;
    let catalog =
        CorrectionCatalog::from_table(&table).map_err(|source| IngestError::Catalog {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), entries = table.len(), "loaded correction catalog");
    Ok(catalog)
}
