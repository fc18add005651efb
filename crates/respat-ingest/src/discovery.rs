//! Lab directory discovery.

use std::path::{Path, PathBuf};

use respat_model::LabId;

use crate::error::{IngestError, Result};
use crate::loader::FileFormat;

/// Directory holding a lab's exports: `<datadir>/<lab id>`.
pub fn lab_directory(datadir: &Path, lab: LabId) -> PathBuf {
    datadir.join(lab.as_str())
}

fn is_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('~') || name.starts_with('_') {
        return false;
    }
    FileFormat::from_path(path).is_some()
}

/// Lists loadable export files in a lab directory.
///
/// Returns files sorted by file name. Lock files (`~...`) and files prefixed
/// with `_` are skipped, as are extensions the loader does not know.
pub fn list_lab_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && is_candidate(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
