//! Group-and-resolve helpers shared by the lab reconcilers.

use std::collections::HashMap;

use respat_model::{CallSheet, Record, Table};

/// Rows sharing one request/sample key, in first-appearance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroup {
    pub key: String,
    pub rows: Vec<usize>,
}

/// Group row indices by the value of `key_column`.
///
/// Groups are returned in the order their key first appears.
pub fn group_rows(table: &Table, key_column: &str) -> Vec<RowGroup> {
    let mut groups: Vec<RowGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in 0..table.len() {
        let key = table.value(row, key_column).to_string();
        match index.get(&key) {
            Some(&slot) => groups[slot].rows.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(RowGroup {
                    key,
                    rows: vec![row],
                });
            }
        }
    }
    groups
}

/// Seed a record from a group.
///
/// Every column whose value is identical across the group is copied. Columns
/// in `pinned` are always copied from the first row.
pub fn seed_record(table: &Table, rows: &[usize], pinned: &[&str]) -> Record {
    let mut record = Record::new();
    let Some((&first, rest)) = rows.split_first() else {
        return record;
    };
    for (col, header) in table.headers.iter().enumerate() {
        let value = &table.rows[first][col];
        let constant = rest.iter().all(|&row| &table.rows[row][col] == value);
        if constant || pinned.contains(&header.as_str()) {
            record.set(header, value.clone());
        }
    }
    record
}

/// Write every pathogen call into its result column.
pub fn write_calls(record: &mut Record, calls: &CallSheet) {
    for (pathogen, call) in calls.iter() {
        record.set(pathogen.result_column(), call.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_rows(
            vec!["req".into(), "code".into(), "city".into()],
            vec![
                vec!["R2".into(), "FLUA".into(), "Recife".into()],
                vec!["R1".into(), "FLUA".into(), "Natal".into()],
                vec!["R2".into(), "FLUB".into(), "Recife".into()],
            ],
        )
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let groups = group_rows(&table(), "req");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "R2");
        assert_eq!(groups[0].rows, vec![0, 2]);
        assert_eq!(groups[1].rows, vec![1]);
    }

    #[test]
    fn seed_keeps_constant_columns_only() {
        let t = table();
        let record = seed_record(&t, &[0, 2], &["req"]);
        assert_eq!(record.get("city"), Some("Recife"));
        assert_eq!(record.get("req"), Some("R2"));
        assert_eq!(record.get("code"), None);
    }
}
