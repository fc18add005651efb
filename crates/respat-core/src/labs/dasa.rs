//! DASA exports.
//!
//! Two layouts: a long viral panel with one row per target (`codigo` column),
//! and a Thermo Fisher covid export with one row per sample (`Gene S` column).

use respat_model::schema::{SAMPLE_ID, TEST_KIT};
use respat_model::{CallSheet, LabId, Pathogen, TargetOutcome, Table};

use super::{Anomalies, lookup, prepare, row_record};
use crate::classify::classify_result_text;
use crate::error::{CoreError, Result};
use crate::group::{group_rows, seed_record, write_calls};
use crate::processor::{FileOutcome, LabProcessor, ReconcileContext, Reconciled, unrecognized};

const LAB: LabId = LabId::Dasa;

pub const PANEL_IDENTITY: [&str; 6] = [
    "codigorequisicao",
    "idade",
    "sexo",
    "data_exame",
    "cidade",
    "uf",
];

pub const THERMO_IDENTITY: [&str; 9] = [
    "requisicao",
    "data",
    "idade",
    "sexo",
    "cidade_norm",
    "uf_norm",
    "Gene N",
    "Gene ORF",
    "Gene S",
];

const PANEL_TARGETS: [(&str, Pathogen); 4] = [
    ("FLUA", Pathogen::FluA),
    ("FLUB", Pathogen::FluB),
    ("VSR", Pathogen::Vsr),
    ("COVID", Pathogen::Sc2),
];

const GEO_BLANKS: [&str; 4] = ["SEM CIDADE", "MUDOU", "NAO_INFORMADO", "NAOINFORMADO"];
const THERMO_GENES: [&str; 3] = ["Gene N", "Gene ORF", "Gene S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DasaLayout {
    ViralPanel,
    ThermoCovid,
    Unrecognized,
}

impl DasaLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            DasaLayout::ViralPanel => "viral panel",
            DasaLayout::ThermoCovid => "thermo covid",
            DasaLayout::Unrecognized => "unrecognized",
        }
    }
}

pub fn classify(table: &Table) -> DasaLayout {
    if table.has_column("codigo") {
        DasaLayout::ViralPanel
    } else if table.has_column("Gene S") {
        DasaLayout::ThermoCovid
    } else {
        DasaLayout::Unrecognized
    }
}

pub struct DasaProcessor;

impl LabProcessor for DasaProcessor {
    fn lab(&self) -> LabId {
        LAB
    }

    fn layouts(&self) -> &'static [&'static str] {
        &["viral panel", "thermo covid"]
    }

    fn process(&self, table: Table, ctx: &ReconcileContext<'_>) -> Result<FileOutcome> {
        match classify(&table) {
            DasaLayout::ViralPanel => reconcile_viral_panel(table, ctx).map(FileOutcome::Reconciled),
            DasaLayout::ThermoCovid => reconcile_thermo(table, ctx).map(FileOutcome::Reconciled),
            DasaLayout::Unrecognized => unrecognized(LAB, &table),
        }
    }
}

/// Viral panel: `positivo == "1"` means detected, anything else not detected.
pub fn reconcile_viral_panel(mut table: Table, ctx: &ReconcileContext<'_>) -> Result<Reconciled> {
    let layout = DasaLayout::ViralPanel.as_str();
    let rows_in = table.len();
    table.fill_column(TEST_KIT, "test_4");
    let dedup = prepare(&mut table, LAB, layout, &PANEL_IDENTITY, ctx)?;
    if dedup.is_all_seen() {
        return Ok(Reconciled::already_processed(layout, rows_in, dedup));
    }

    let mut pinned = vec![SAMPLE_ID, TEST_KIT];
    pinned.extend(PANEL_IDENTITY);
    let mut anomalies = Anomalies::default();
    let mut records = Vec::new();
    for group in group_rows(&table, "codigorequisicao") {
        let mut record = seed_record(&table, &group.rows, &pinned);
        let mut calls = CallSheet::new();
        for &row in &group.rows {
            let code = table.value(row, "codigo");
            let Some(pathogen) = lookup(&PANEL_TARGETS, code) else {
                anomalies.record(code);
                continue;
            };
            let positivo = table.value(row, "positivo");
            record.set_default(code, positivo);
            let outcome = if positivo.trim() == "1" {
                TargetOutcome::Detected
            } else {
                TargetOutcome::NotDetected
            };
            calls.apply(pathogen, outcome);
        }
        write_calls(&mut record, &calls);
        records.push(record);
    }
    anomalies.flush(LAB, layout);

    Ok(Reconciled {
        layout,
        rows_in,
        dedup,
        records,
    })
}

/// Pick the result column, normalizing the fallback columns to detection text.
fn resolve_result_column(table: &mut Table) -> Result<()> {
    if table.has_column("resultado") {
        return Ok(());
    }
    if table.rename_column("resultado_norm", "resultado") {
        table.map_column("resultado", |v| {
            let text = if v == "NEGATIVO" { "NAO DETECTADO" } else { "DETECTADO" };
            text.to_string()
        });
        return Ok(());
    }
    if table.rename_column("resultado_original", "resultado") {
        table.map_column("resultado", |v| {
            let text = if v == "NDT" { "NAO DETECTADO" } else { "DETECTADO" };
            text.to_string()
        });
        return Ok(());
    }
    Err(CoreError::MissingResultColumn {
        lab: LAB,
        candidates: "resultado, resultado_norm, resultado_original".to_string(),
    })
}

fn blank_geo(value: &str) -> String {
    if GEO_BLANKS.contains(&value) {
        String::new()
    } else {
        value.to_string()
    }
}

/// Thermo Fisher covid export: one record per row, SC2 from `resultado`.
pub fn reconcile_thermo(mut table: Table, ctx: &ReconcileContext<'_>) -> Result<Reconciled> {
    let layout = DasaLayout::ThermoCovid.as_str();
    let rows_in = table.len();
    resolve_result_column(&mut table)?;
    if !table.has_column("requisicao") {
        // When neither exists the identity step adds it empty.
        table.rename_column("codigo_externo_do_paciente", "requisicao");
    }
    let dedup = prepare(&mut table, LAB, layout, &THERMO_IDENTITY, ctx)?;
    if dedup.is_all_seen() {
        return Ok(Reconciled::already_processed(layout, rows_in, dedup));
    }

    table.map_column("cidade_norm", blank_geo);
    table.map_column("uf_norm", blank_geo);

    let mut records = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let outcome = classify_result_text(table.value(row, "resultado"));
        if outcome == TargetOutcome::NotDetected {
            for gene in THERMO_GENES {
                table.set_value(row, gene, "");
            }
        }
        let mut calls = CallSheet::new();
        calls.apply(Pathogen::Sc2, outcome);
        records.push(row_record(&table, row, "thermo", &calls));
    }

    Ok(Reconciled {
        layout,
        rows_in,
        dedup,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str]) -> Table {
        Table::new(headers.iter().map(|h| (*h).to_string()).collect())
    }

    #[test]
    fn classifies_by_marker_column() {
        assert_eq!(classify(&table(&["codigorequisicao", "codigo"])), DasaLayout::ViralPanel);
        assert_eq!(classify(&table(&["requisicao", "Gene S"])), DasaLayout::ThermoCovid);
        assert_eq!(classify(&table(&["foo"])), DasaLayout::Unrecognized);
    }

    #[test]
    fn result_falls_back_to_normalized_column() {
        let mut t = Table::from_rows(
            vec!["resultado_norm".into()],
            vec![vec!["NEGATIVO".into()], vec!["POSITIVO".into()]],
        );
        resolve_result_column(&mut t).expect("fallback");
        assert_eq!(t.column("resultado"), Some(vec!["NAO DETECTADO", "DETECTADO"]));
    }

    #[test]
    fn missing_result_column_is_fatal() {
        let mut t = table(&["Gene S"]);
        assert!(matches!(
            resolve_result_column(&mut t),
            Err(CoreError::MissingResultColumn { .. })
        ));
    }
}
