//! SABIN exports: one covid result per row, keyed by `OS`.

use respat_model::{CallSheet, LabId, Pathogen, Table};

use super::{prepare, row_record};
use crate::classify::classify_result_text;
use crate::error::Result;
use crate::processor::{FileOutcome, LabProcessor, ReconcileContext, Reconciled, unrecognized};

const LAB: LabId = LabId::Sabin;
const LAYOUT: &str = "covid";

pub const IDENTITY: [&str; 7] = [
    "OS",
    "Estado",
    "Municipio",
    "DataAtendimento",
    "Sexo",
    "Descricao",
    "Resultado",
];

/// Parametro code of the antigen test.
const ANTIGEN_PARAMETER: &str = "COVIDECO";

pub fn is_recognized(table: &Table) -> bool {
    table.has_column("OS")
}

pub fn test_kit(parametro: &str) -> &'static str {
    if parametro == ANTIGEN_PARAMETER {
        "covid_antigen"
    } else {
        "covid"
    }
}

pub struct SabinProcessor;

impl LabProcessor for SabinProcessor {
    fn lab(&self) -> LabId {
        LAB
    }

    fn layouts(&self) -> &'static [&'static str] {
        &[LAYOUT]
    }

    fn process(&self, table: Table, ctx: &ReconcileContext<'_>) -> Result<FileOutcome> {
        if !is_recognized(&table) {
            return unrecognized(LAB, &table);
        }
        reconcile(table, ctx).map(FileOutcome::Reconciled)
    }
}

pub fn reconcile(mut table: Table, ctx: &ReconcileContext<'_>) -> Result<Reconciled> {
    let rows_in = table.len();
    let dedup = prepare(&mut table, LAB, LAYOUT, &IDENTITY, ctx)?;
    if dedup.is_all_seen() {
        return Ok(Reconciled::already_processed(LAYOUT, rows_in, dedup));
    }

    let records = (0..table.len())
        .map(|row| {
            let mut calls = CallSheet::new();
            calls.apply(Pathogen::Sc2, classify_result_text(table.value(row, "Resultado")));
            row_record(&table, row, test_kit(table.value(row, "Parametro")), &calls)
        })
        .collect();

    Ok(Reconciled {
        layout: LAYOUT,
        rows_in,
        dedup,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antigen_kit_by_parameter() {
        assert_eq!(test_kit("COVIDECO"), "covid_antigen");
        assert_eq!(test_kit("COVIDPCR"), "covid");
        assert_eq!(test_kit(""), "covid");
    }
}
