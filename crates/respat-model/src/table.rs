//! String-typed tables and records.
//!
//! Every cell is a `String`; the empty string stands for an absent value.

use std::collections::BTreeMap;

/// A rectangular table of string cells.
///
/// Rows always have exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from headers and rows, padding short rows with "" and
    /// truncating long ones.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build a table whose header is the union of record keys, in first-seen order.
    pub fn from_records(records: &[Record]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.to_string());
                }
            }
        }
        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| record.value(h).to_string())
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value of `name` in row `row`, or "" when the column is absent.
    pub fn value(&self, row: usize, name: &str) -> &str {
        self.column_index(name)
            .and_then(|idx| self.rows.get(row).map(|r| r[idx].as_str()))
            .unwrap_or("")
    }

    /// All values of a column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Append an empty column unless it already exists. Returns `true` when added.
    pub fn ensure_column(&mut self, name: &str) -> bool {
        if self.has_column(name) {
            return false;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        true
    }

    /// Set every cell of `name` to `value`, adding the column if needed.
    pub fn fill_column(&mut self, name: &str, value: &str) {
        self.ensure_column(name);
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                row[idx] = value.to_string();
            }
        }
    }

    pub fn set_value(&mut self, row: usize, name: &str, value: impl Into<String>) {
        self.ensure_column(name);
        if let (Some(idx), Some(cells)) = (self.column_index(name), self.rows.get_mut(row)) {
            cells[idx] = value.into();
        }
    }

    /// Rename a column. Returns `false` when `from` does not exist.
    ///
    /// If `to` already exists, the old `to` column is dropped so header names stay unique.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        let Some(idx) = self.column_index(from) else {
            return false;
        };
        if from == to {
            return true;
        }
        if let Some(existing) = self.column_index(to) {
            self.drop_column_at(existing);
            let idx = if existing < idx { idx - 1 } else { idx };
            self.headers[idx] = to.to_string();
        } else {
            self.headers[idx] = to.to_string();
        }
        true
    }

    fn drop_column_at(&mut self, idx: usize) {
        self.headers.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
    }

    /// Rewrite every cell of a column in place.
    pub fn map_column<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                row[idx] = f(&row[idx]);
            }
        }
    }

    /// Keep only rows for which `keep` returns `true`.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Project onto `columns` in that order; absent columns become empty.
    pub fn select(&self, columns: &[&str]) -> Table {
        let indices: Vec<Option<usize>> = columns.iter().map(|c| self.column_index(c)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| idx.map(|i| row[i].clone()).unwrap_or_default())
                    .collect()
            })
            .collect();
        Table {
            headers: columns.iter().map(|c| (*c).to_string()).collect(),
            rows,
        }
    }

    /// Row `index` as a record.
    ///
    /// A repeated header keeps its first column, matching [`Table::value`].
    pub fn record(&self, index: usize) -> Record {
        let mut record = Record::new();
        if let Some(row) = self.rows.get(index) {
            for (header, value) in self.headers.iter().zip(row) {
                record.set_default(header, value.clone());
            }
        }
        record
    }

    pub fn records(&self) -> Vec<Record> {
        (0..self.len()).map(|idx| self.record(idx)).collect()
    }
}

/// One row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value of `column`, or "" when absent.
    pub fn value(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        self.fields.insert(column.to_string(), value.into());
    }

    /// Insert only if the column is not present yet.
    pub fn set_default(&mut self, column: &str, value: impl Into<String>) {
        self.fields
            .entry(column.to_string())
            .or_insert_with(|| value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
