//! DB Molecular exports.
//!
//! All layouts are long (one row per target) and grouped by `NumeroPedido`:
//! a respiratory panel, a Thermo Fisher omicron assay and an older covid-19
//! assay keyed by `ParametroLIS`.

use respat_model::schema::{SAMPLE_ID, TEST_KIT};
use respat_model::{CallSheet, LabId, Pathogen, Record, TargetOutcome, Table};

use super::{Anomalies, lookup, prepare};
use crate::classify::classify_result_text;
use crate::ct::{CtRescale, format_ct};
use crate::error::Result;
use crate::group::{group_rows, seed_record, write_calls};
use crate::processor::{FileOutcome, LabProcessor, ReconcileContext, Reconciled, unrecognized};

const LAB: LabId = LabId::DbMolecular;
const GROUP_KEY: &str = "NumeroPedido";

pub const IDENTITY: [&str; 6] = [
    "NumeroPedido",
    "ServicoSolicitante",
    "Cidade",
    "UF",
    "Sexo",
    "DataHoraLiberacaoClinica",
];

const PANEL_CONTROLS: [&str; 4] = ["ZZFLUA", "ZZFLUB", "ZZRSV", "ZZSARS"];

const PANEL_TARGETS: [(&str, Pathogen); 7] = [
    ("NGRV", Pathogen::Sc2),
    ("SGRV", Pathogen::Sc2),
    ("RDRPGRV", Pathogen::Sc2),
    ("EGENERV", Pathogen::Sc2),
    ("FLUARV", Pathogen::FluA),
    ("FLUBRV", Pathogen::FluB),
    ("RSVRV", Pathogen::Vsr),
];

/// Targets whose presence makes a request a 4-plex panel rather than covid only.
const PANEL_NON_COVID: [&str; 3] = ["FLUARV", "FLUBRV", "RSVRV"];

/// Ct at or above which a panel target counts as not detected.
pub const PANEL_CT_THRESHOLD: f64 = 40.0;

const OMICRON_GENES: [&str; 3] = ["NGENE", "SGENE", "ORF1AB"];

const COVID_CONTROLS: [&str; 7] = ["SPCCT", "ZZZIC", "ZZZCI", "PCOV19", "UPCOV", "ZZZMS2", "ING"];
const COVID_TARGETS: [&str; 7] = ["ZZZE", "ECT", "ZZZN", "N2CT", "ZZZRD", "ZZZS", "ZZZORF"];
const COVID_DEFAULTS: [&str; 5] = ["ZZZE", "ZZZN", "ZZZRD", "ZZZS", "ZZZORF"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbLayout {
    RespiratoryPanel,
    ThermoOmicron,
    Covid19,
    Unrecognized,
}

impl DbLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbLayout::RespiratoryPanel => "respiratory panel",
            DbLayout::ThermoOmicron => "thermo omicron",
            DbLayout::Covid19 => "covid-19",
            DbLayout::Unrecognized => "unrecognized",
        }
    }
}

fn column_has_value(table: &Table, column: &str, values: &[&str]) -> bool {
    table
        .column(column)
        .is_some_and(|cells| cells.iter().any(|cell| values.contains(cell)))
}

pub fn classify(table: &Table) -> DbLayout {
    if column_has_value(table, "Codigo", &["RESP4"]) {
        DbLayout::RespiratoryPanel
    } else if column_has_value(table, "Parametro", &["C", "CT"]) {
        DbLayout::ThermoOmicron
    } else if table.has_column("ParametroLIS") {
        DbLayout::Covid19
    } else {
        DbLayout::Unrecognized
    }
}

pub struct DbMolecularProcessor;

impl LabProcessor for DbMolecularProcessor {
    fn lab(&self) -> LabId {
        LAB
    }

    fn layouts(&self) -> &'static [&'static str] {
        &["respiratory panel", "thermo omicron", "covid-19"]
    }

    fn process(&self, table: Table, ctx: &ReconcileContext<'_>) -> Result<FileOutcome> {
        let reconciled = match classify(&table) {
            DbLayout::RespiratoryPanel => reconcile_panel(table, ctx)?,
            DbLayout::ThermoOmicron => reconcile_omicron(table, ctx)?,
            DbLayout::Covid19 => reconcile_covid(table, ctx)?,
            DbLayout::Unrecognized => return unrecognized(LAB, &table),
        };
        Ok(FileOutcome::Reconciled(reconciled))
    }
}

fn pinned() -> Vec<&'static str> {
    let mut pinned = vec![SAMPLE_ID, TEST_KIT];
    pinned.extend(IDENTITY);
    pinned
}

fn drop_codes(table: &mut Table, column: &str, codes: &[&str]) {
    if let Some(idx) = table.column_index(column) {
        table.retain_rows(|row| !codes.contains(&row[idx].as_str()));
    }
}

/// Outcome of a panel target from its rescaled Ct.
pub fn panel_outcome(ct: Option<f64>) -> TargetOutcome {
    match ct {
        Some(value) if value < PANEL_CT_THRESHOLD => TargetOutcome::Detected,
        Some(_) => TargetOutcome::NotDetected,
        None => TargetOutcome::NoResult,
    }
}

/// Respiratory panel: Ct thresholds decide each target.
pub fn reconcile_panel(mut table: Table, ctx: &ReconcileContext<'_>) -> Result<Reconciled> {
    let layout = DbLayout::RespiratoryPanel.as_str();
    let rows_in = table.len();
    table.rename_column("Resultado", "Results_All");
    let dedup = prepare(&mut table, LAB, layout, &IDENTITY, ctx)?;
    if dedup.is_all_seen() {
        return Ok(Reconciled::already_processed(layout, rows_in, dedup));
    }
    drop_codes(&mut table, "Parametro", &PANEL_CONTROLS);
    table.map_column("Parametro", |code| {
        if code == "NGENERV" { "NGRV".to_string() } else { code.to_string() }
    });

    let pinned = pinned();
    let mut anomalies = Anomalies::default();
    let mut records = Vec::new();
    for group in group_rows(&table, GROUP_KEY) {
        let mut record = seed_record(&table, &group.rows, &pinned);
        let mut calls = CallSheet::new();
        let mut four_plex = false;
        for &row in &group.rows {
            let code = table.value(row, "Parametro");
            let Some(pathogen) = lookup(&PANEL_TARGETS, code) else {
                anomalies.record(code);
                continue;
            };
            four_plex |= PANEL_NON_COVID.contains(&code);
            let ct = ctx.ct.rescale(table.value(row, "ResultadoLIS"));
            record.set_default(code, ct.map(format_ct).unwrap_or_default());
            calls.apply(pathogen, panel_outcome(ct));
        }
        record.set(TEST_KIT, if four_plex { "test_4" } else { "covid" });
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

/// Thermo Fisher omicron assay: gene Cts rescaled, SC2 from the result text.
pub fn reconcile_omicron(mut table: Table, ctx: &ReconcileContext<'_>) -> Result<Reconciled> {
    let layout = DbLayout::ThermoOmicron.as_str();
    let rows_in = table.len();
    table.fill_column(TEST_KIT, "thermo");
    let dedup = prepare(&mut table, LAB, layout, &IDENTITY, ctx)?;
    if dedup.is_all_seen() {
        return Ok(Reconciled::already_processed(layout, rows_in, dedup));
    }

    let pinned = pinned();
    let records = group_rows(&table, GROUP_KEY)
        .iter()
        .map(|group| omicron_record(&table, &group.rows, &pinned, ctx.ct))
        .collect();

    Ok(Reconciled {
        layout,
        rows_in,
        dedup,
        records,
    })
}

fn omicron_record(table: &Table, rows: &[usize], pinned: &[&str], ct: &CtRescale) -> Record {
    let mut record = seed_record(table, rows, pinned);
    let mut calls = CallSheet::new();

    // An S-gene dropout with a detected result still counts as S-gene detected.
    let has_sgene = rows.iter().any(|&row| table.value(row, "Exame") == "SGENE");
    let detected = rows
        .iter()
        .any(|&row| table.value(row, "Resultado").to_lowercase() == "detectado");
    let synthetic_sgene = !has_sgene && detected;

    for &row in rows {
        let exame = table.value(row, "Exame");
        if OMICRON_GENES.contains(&exame) {
            record.set(exame, ct.rescale_text(table.value(row, "ResultadoLIS")));
        }
        let resultado = if synthetic_sgene {
            "Detectado"
        } else {
            table.value(row, "Resultado")
        };
        calls.apply(Pathogen::Sc2, classify_result_text(resultado));
    }
    if synthetic_sgene {
        record.set("SGENE", ct.rescale_text("0.0"));
        record.set("Resultado", "Detectado");
        calls.apply(Pathogen::Sc2, TargetOutcome::Detected);
    }

    write_calls(&mut record, &calls);
    record
}

/// Older covid-19 assay keyed by `ParametroLIS`.
pub fn reconcile_covid(mut table: Table, ctx: &ReconcileContext<'_>) -> Result<Reconciled> {
    let layout = DbLayout::Covid19.as_str();
    let rows_in = table.len();
    table.fill_column(TEST_KIT, "covid");
    let dedup = prepare(&mut table, LAB, layout, &IDENTITY, ctx)?;
    if dedup.is_all_seen() {
        return Ok(Reconciled::already_processed(layout, rows_in, dedup));
    }
    drop_codes(&mut table, "ParametroLIS", &COVID_CONTROLS);

    let pinned = pinned();
    let has_result = table.has_column("Resultado");
    let mut anomalies = Anomalies::default();
    let mut records = Vec::new();
    for group in group_rows(&table, GROUP_KEY) {
        let mut record = seed_record(&table, &group.rows, &pinned);
        let mut calls = CallSheet::new();
        for &row in &group.rows {
            let code = table.value(row, "ParametroLIS");
            if COVID_TARGETS.contains(&code) {
                record.set_default(code, ctx.ct.rescale_text(table.value(row, "ResultadoLIS")));
            } else {
                anomalies.record(code);
            }
            if has_result {
                calls.apply(Pathogen::Sc2, classify_result_text(table.value(row, "Resultado")));
            }
        }
        for code in COVID_DEFAULTS {
            record.set_default(code, "");
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

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            headers.iter().map(|h| (*h).to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn classifies_by_marker_values() {
        let panel = table(&["Codigo", "Parametro"], &[&["RESP4", "FLUARV"]]);
        assert_eq!(classify(&panel), DbLayout::RespiratoryPanel);
        let omicron = table(&["Codigo", "Parametro"], &[&["COV", "CT"]]);
        assert_eq!(classify(&omicron), DbLayout::ThermoOmicron);
        let covid = table(&["ParametroLIS"], &[&["ZZZN"]]);
        assert_eq!(classify(&covid), DbLayout::Covid19);
        let other = table(&["Codigo"], &[&["RESP"]]);
        assert_eq!(classify(&other), DbLayout::Unrecognized);
    }

    #[test]
    fn panel_threshold_is_exclusive() {
        assert_eq!(panel_outcome(Some(39.99)), TargetOutcome::Detected);
        assert_eq!(panel_outcome(Some(40.0)), TargetOutcome::NotDetected);
        assert_eq!(panel_outcome(None), TargetOutcome::NoResult);
    }

    #[test]
    fn synthetic_sgene_when_dropout_detected() {
        let t = table(
            &["NumeroPedido", "Exame", "ResultadoLIS", "Resultado"],
            &[
                &["P1", "NGENE", "25.3", "detectado"],
                &["P1", "ORF1AB", "24.1", "detectado"],
            ],
        );
        let record = omicron_record(&t, &[0, 1], &["NumeroPedido"], &CtRescale::default());
        assert_eq!(record.get("SGENE"), Some("0"));
        assert_eq!(record.get("NGENE"), Some("25.3"));
        assert_eq!(record.get("Resultado"), Some("Detectado"));
        assert_eq!(record.get("SC2_test_result"), Some("Pos"));
        assert_eq!(record.get("FLUA_test_result"), Some("NA"));
    }
}
