//! Per-file post-processing of reconciled tables.
//!
//! Steps run in a fixed order: lab id, renames, corrections, test date,
//! epiweek, age, sex, S-gene detection, date formatting, projection.

use chrono::NaiveDate;
use respat_model::schema::{
    AGE, BIRTHDATE, CANONICAL_COLUMNS, CT_GENE_S, DATE_TESTING, EPIWEEK, GENE_S_DETECTION, LAB_ID,
    MISSING_DATE, SEX,
};
use respat_model::{CorrectionCatalog, LabId, RenameCatalog, Table};
use tracing::{debug, warn};

use crate::catalog::{apply_corrections, apply_renames};
use crate::datetime::{epiweek_end, format_iso, parse_date};
use crate::derive::{age_between, clean_age_text, gene_detection, normalize_sex};

/// Rename and correction catalogs shared by every file of a job.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub renames: RenameCatalog,
    pub corrections: CorrectionCatalog,
}

/// Post-process one reconciled table into the canonical schema.
pub fn postprocess(mut table: Table, lab: LabId, catalogs: &Catalogs) -> Table {
    table.fill_column(LAB_ID, lab.as_str());
    let mut table = apply_renames(table, lab, &catalogs.renames);
    apply_corrections(&mut table, lab, &catalogs.corrections);

    let dates = parse_test_dates(&table, lab);
    fill_epiweeks(&mut table, &dates);
    derive_ages(&mut table, lab, &dates);
    if lab.has_unit_suffixed_age() {
        table.map_column(AGE, clean_age_text);
    }
    table.map_column(SEX, normalize_sex);
    derive_gene_detection(&mut table);
    format_test_dates(&mut table, &dates);

    project(&table)
}

fn parse_test_dates(table: &Table, lab: LabId) -> Vec<Option<NaiveDate>> {
    let order = lab.date_order();
    let dates: Vec<Option<NaiveDate>> = (0..table.len())
        .map(|row| parse_date(table.value(row, DATE_TESTING), order))
        .collect();
    let unparsed = dates.iter().filter(|d| d.is_none()).count();
    if unparsed > 0 {
        warn!(lab = %lab, rows = unparsed, "test dates could not be parsed; written as {MISSING_DATE}");
    }
    dates
}

fn fill_epiweeks(table: &mut Table, dates: &[Option<NaiveDate>]) {
    for (row, date) in dates.iter().enumerate() {
        let epiweek = date.map(|d| format_iso(epiweek_end(d))).unwrap_or_default();
        table.set_value(row, EPIWEEK, epiweek);
    }
}

/// Replace `age` with the age derived from `birthdate` where both dates parse.
fn derive_ages(table: &mut Table, lab: LabId, dates: &[Option<NaiveDate>]) {
    if !table.has_column(BIRTHDATE) {
        return;
    }
    let policy = lab.age_policy();
    let mut derived = 0;
    for (row, tested) in dates.iter().enumerate() {
        let born = parse_date(table.value(row, BIRTHDATE), lab.date_order());
        if let (Some(born), Some(tested)) = (born, *tested) {
            table.set_value(row, AGE, age_between(born, tested, policy));
            derived += 1;
        }
    }
    debug!(lab = %lab, rows = derived, policy = %policy, "derived ages from birthdate");
}

fn derive_gene_detection(table: &mut Table) {
    if !table.has_column(CT_GENE_S) {
        return;
    }
    for row in 0..table.len() {
        let call = gene_detection(table.value(row, CT_GENE_S));
        table.set_value(row, GENE_S_DETECTION, call);
    }
}

fn format_test_dates(table: &mut Table, dates: &[Option<NaiveDate>]) {
    for (row, date) in dates.iter().enumerate() {
        let text = date.map_or_else(|| MISSING_DATE.to_string(), format_iso);
        table.set_value(row, DATE_TESTING, text);
    }
}

/// Keep exactly the canonical columns, in canonical order.
pub fn project(table: &Table) -> Table {
    table.select(&CANONICAL_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_date_gets_sentinel_and_empty_epiweek() {
        let table = Table::from_rows(
            vec![DATE_TESTING.into(), "sample_id".into()],
            vec![vec!["sem data".into(), "abc".into()]],
        );
        let out = postprocess(table, LabId::Sabin, &Catalogs::default());
        assert_eq!(out.value(0, DATE_TESTING), MISSING_DATE);
        assert_eq!(out.value(0, EPIWEEK), "");
        assert_eq!(out.value(0, LAB_ID), "SABIN");
    }
}
