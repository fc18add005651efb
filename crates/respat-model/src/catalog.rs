//! Rename and value-correction catalogs.
//!
//! Both are keyed first by lab identifier. Corrections additionally accept the
//! wildcard lab [`ANY_LAB`]; a lab's own entry always wins over the wildcard.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::table::Table;

/// Lab identifier whose corrections apply to every lab.
pub const ANY_LAB: &str = "any";

fn require_column(table: &Table, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| ModelError::MissingCatalogColumn {
            column: column.to_string(),
        })
}

/// lab -> raw column -> canonical column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameCatalog {
    labs: BTreeMap<String, BTreeMap<String, String>>,
}

impl RenameCatalog {
    /// Build from a table with `lab_id`, `column_name`, `new_name` columns.
    pub fn from_table(table: &Table) -> Result<Self> {
        let lab = require_column(table, "lab_id")?;
        let column = require_column(table, "column_name")?;
        let new_name = require_column(table, "new_name")?;
        let mut catalog = Self::default();
        for row in &table.rows {
            catalog.insert(&row[lab], &row[column], &row[new_name]);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, lab: &str, column: &str, new_name: &str) {
        self.labs
            .entry(lab.to_string())
            .or_default()
            .insert(column.to_string(), new_name.to_string());
    }

    pub fn renames_for(&self, lab: &str) -> Option<&BTreeMap<String, String>> {
        self.labs.get(lab)
    }

    pub fn rename(&self, lab: &str, column: &str) -> Option<&str> {
        self.labs
            .get(lab)
            .and_then(|columns| columns.get(column))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.labs.is_empty()
    }
}

/// lab -> column -> old value -> new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionCatalog {
    labs: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
}

impl CorrectionCatalog {
    /// Build from a table with `lab_id`, `column_name`, `old_data`, `new_data` columns.
    ///
    /// Rows where both `old_data` and `new_data` are empty are ignored.
    pub fn from_table(table: &Table) -> Result<Self> {
        let lab = require_column(table, "lab_id")?;
        let column = require_column(table, "column_name")?;
        let old = require_column(table, "old_data")?;
        let new = require_column(table, "new_data")?;
        let mut catalog = Self::default();
        for row in &table.rows {
            catalog.insert(&row[lab], &row[column], &row[old], &row[new]);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, lab: &str, column: &str, old_value: &str, new_value: &str) {
        if old_value.is_empty() && new_value.is_empty() {
            return;
        }
        self.labs
            .entry(lab.to_string())
            .or_default()
            .entry(column.to_string())
            .or_default()
            .insert(old_value.to_string(), new_value.to_string());
    }

    /// Replacement for `value` in `column` for `lab`, if any.
    pub fn correct(&self, lab: &str, column: &str, value: &str) -> Option<&str> {
        self.lookup(lab, column, value)
            .or_else(|| self.lookup(ANY_LAB, column, value))
    }

    fn lookup(&self, lab: &str, column: &str, value: &str) -> Option<&str> {
        self.labs
            .get(lab)
            .and_then(|columns| columns.get(column))
            .and_then(|values| values.get(value))
            .map(String::as_str)
    }

    /// Columns that have at least one correction for `lab` or the wildcard.
    pub fn columns_for(&self, lab: &str) -> Vec<&str> {
        let mut columns: Vec<&str> = [lab, ANY_LAB]
            .iter()
            .filter_map(|id| self.labs.get(*id))
            .flat_map(|columns| columns.keys().map(String::as_str))
            .collect();
        columns.sort_unstable();
        columns.dedup();
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.labs.is_empty()
    }
}
