//! Sample identity: content hashes over a layout's identity columns.

use respat_model::schema::SAMPLE_ID;
use respat_model::{LabId, ModelError, SampleId, Table};
use sha1::{Digest, Sha1};
use tracing::warn;

/// Hash an identity string into a [`SampleId`] of `len` hex characters.
pub fn sample_id(identity: &str, len: usize) -> Result<SampleId, ModelError> {
    let mut hasher = Sha1::new();
    hasher.update(identity.as_bytes());
    let digest = hex::encode(hasher.finalize());
    SampleId::new(digest.chars().take(len).collect::<String>())
}

/// Concatenate the identity column values of one row, in column order.
pub fn identity_string(table: &Table, row: usize, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|column| table.value(row, column))
        .collect()
}

/// Add any missing identity column as an empty column, warning once per column.
pub fn ensure_identity_columns(table: &mut Table, lab: LabId, columns: &[&str]) {
    for column in columns {
        if table.ensure_column(column) {
            warn!(
                lab = %lab,
                column,
                "identity column missing; added an empty column, check the export for inconsistencies"
            );
        }
    }
}

/// Fill `sample_id` for every row from the identity columns.
pub fn assign_sample_ids(
    table: &mut Table,
    lab: LabId,
    columns: &[&str],
) -> Result<(), ModelError> {
    ensure_identity_columns(table, lab, columns);
    let ids = (0..table.len())
        .map(|row| sample_id(&identity_string(table, row, columns), lab.sample_id_len()))
        .collect::<Result<Vec<_>, _>>()?;
    table.ensure_column(SAMPLE_ID);
    for (row, id) in ids.into_iter().enumerate() {
        table.set_value(row, SAMPLE_ID, id.as_str());
    }
    Ok(())
}
