//! Apply rename and correction catalogs to a lab's table.

use std::collections::HashSet;

use respat_model::{CorrectionCatalog, LabId, RenameCatalog, Table};
use tracing::{debug, info};

/// Rename columns for `lab`.
///
/// All renames happen at once, so `a -> b` and `b -> c` do not chain. When a
/// renamed column collides with an existing one, the renamed column wins.
pub fn apply_renames(table: Table, lab: LabId, catalog: &RenameCatalog) -> Table {
    let Some(renames) = catalog.renames_for(lab.as_str()) else {
        return table;
    };

    let mapped: Vec<(String, bool)> = table
        .headers
        .iter()
        .map(|header| match renames.get(header) {
            Some(new_name) => (new_name.clone(), true),
            None => (header.clone(), false),
        })
        .collect();
    let renamed_targets: HashSet<&str> = mapped
        .iter()
        .filter(|(_, renamed)| *renamed)
        .map(|(name, _)| name.as_str())
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut keep = Vec::with_capacity(mapped.len());
    for (idx, (name, renamed)) in mapped.iter().enumerate() {
        let shadowed = !renamed && renamed_targets.contains(name.as_str());
        if shadowed || !seen.insert(name.as_str()) {
            debug!(lab = %lab, column = %name, "dropping column shadowed by a rename");
            continue;
        }
        keep.push(idx);
    }

    let headers = keep.iter().map(|&idx| mapped[idx].0.clone()).collect();
    let rows = table
        .rows
        .into_iter()
        .map(|row| keep.iter().map(|&idx| row[idx].clone()).collect())
        .collect();
    Table::from_rows(headers, rows)
}

/// Replace catalogued values for `lab`, falling back to the `any` entries.
///
/// Returns the number of cells changed.
pub fn apply_corrections(table: &mut Table, lab: LabId, catalog: &CorrectionCatalog) -> usize {
    let mut changed = 0;
    for column in catalog.columns_for(lab.as_str()) {
        table.map_column(column, |value| {
            match catalog.correct(lab.as_str(), column, value) {
                Some(fixed) if fixed != value => {
                    changed += 1;
                    fixed.to_string()
                }
                _ => value.to_string(),
            }
        });
    }
    if changed > 0 {
        info!(lab = %lab, cells = changed, "applied value corrections");
    }
    changed
}
