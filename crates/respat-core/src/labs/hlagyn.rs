//! HLAGyn exports.
//!
//! Wide layouts carry one column per target and one row per sample. The
//! panel is recognized from the joined header text, since the 24-target
//! panel ships with either named or coded column headers.

use respat_model::{CallSheet, LabId, Pathogen, TargetOutcome, Table};
use tracing::warn;

use super::{lookup, prepare, row_record};
use crate::classify::classify_result_text;
use crate::error::Result;
use crate::processor::{FileOutcome, LabProcessor, ReconcileContext, Reconciled, unrecognized};

const LAB: LabId = LabId::HlaGyn;

pub const WIDE_IDENTITY: [&str; 6] = ["Pedido", "Idade", "Sexo", "Data Coleta", "Cidade", "UF"];

pub const COVID_IDENTITY: [&str; 9] = [
    "Pedido",
    "Idade",
    "Sexo",
    "Data Coleta",
    "Cidade",
    "UF",
    "CT_I",
    "CT_N",
    "CT_ORF1AB",
];

const NAMED_COLUMNS: [&str; 24] = [
    "VIRUS_Influenza A",
    "VIRUS_Influenza H1N1",
    "VIRUS_Influenza H3",
    "VIRUS_Influenza B",
    "VIRUS_Metapneumovírus",
    "VIRUS_Sincicial A",
    "VIRUS_Sincicial B",
    "VIRUS_Rinovírus",
    "VIRUS_Parainfluenza 1",
    "VIRUS_Parainfluenza 2",
    "VIRUS_Parainfluenza 3",
    "VIRUS_Parainfluenza 4",
    "VIRUS_Adenovirus",
    "VIRUS_Bocavirus",
    "VIRUS_CoV-229E",
    "VIRUS_CoV-HKU",
    "VIRUS_CoV-NL63",
    "VIRUS_CoV-OC43",
    "VIRUS_SARS_Like",
    "VIRUS_SARS-CoV-2",
    "VIRUS_Enterovírus",
    "BACTE_Bordetella pertussis",
    "BACTE_Bordetella parapertussis",
    "BACTE_Mycoplasma pneumoniae",
];

const CODED_COLUMNS: [&str; 24] = [
    "VIRUS_IA",
    "VIRUS_H1N1",
    "VIRUS_AH3",
    "VIRUS_B",
    "VIRUS_MH",
    "VIRUS_SA",
    "VIRUS_SB",
    "VIRUS_RH",
    "VIRUS_PH",
    "VIRUS_PH2",
    "VIRUS_PH3",
    "VIRUS_PH4",
    "VIRUS_ADE",
    "VIRUS_BOC",
    "VIRUS_229E",
    "VIRUS_HKU",
    "VIRUS_NL63",
    "VIRUS_OC43",
    "VIRUS_SARS",
    "VIRUS_COV2",
    "VIRUS_EV",
    "BACTE_BP",
    "BACTE_BPAR",
    "BACTE_MP",
];

const PANEL4_COLUMNS: [&str; 4] = [
    "Vírus Influenza A",
    "Vírus Influenza B",
    "Vírus Sincicial Respiratório A/B",
    "Coronavírus SARS-CoV-2",
];

/// Target column to pathogen, covering all three wide layouts.
pub const TARGET_CATALOG: [(&str, Pathogen); 52] = [
    ("VIRUS_SARS_Like", Pathogen::Sc2),
    ("VIRUS_SARS-CoV-2", Pathogen::Sc2),
    ("Coronavírus SARS-CoV-2", Pathogen::Sc2),
    ("VIRUS_SARS", Pathogen::Sc2),
    ("VIRUS_COV2", Pathogen::Sc2),
    ("VIRUS_Influenza A", Pathogen::FluA),
    ("VIRUS_Influenza H1N1", Pathogen::FluA),
    ("VIRUS_Influenza H3", Pathogen::FluA),
    ("Vírus Influenza A", Pathogen::FluA),
    ("VIRUS_IA", Pathogen::FluA),
    ("VIRUS_H1N1", Pathogen::FluA),
    ("VIRUS_AH3", Pathogen::FluA),
    ("VIRUS_Influenza B", Pathogen::FluB),
    ("Vírus Influenza B", Pathogen::FluB),
    ("VIRUS_B", Pathogen::FluB),
    ("VIRUS_Sincicial A", Pathogen::Vsr),
    ("VIRUS_Sincicial B", Pathogen::Vsr),
    ("Vírus Sincicial Respiratório A/B", Pathogen::Vsr),
    ("VIRUS_SA", Pathogen::Vsr),
    ("VIRUS_SB", Pathogen::Vsr),
    ("VIRUS_Metapneumovírus", Pathogen::Meta),
    ("VIRUS_MH", Pathogen::Meta),
    ("VIRUS_Rinovírus", Pathogen::Rino),
    ("VIRUS_RH", Pathogen::Rino),
    ("VIRUS_Parainfluenza 1", Pathogen::Para),
    ("VIRUS_Parainfluenza 2", Pathogen::Para),
    ("VIRUS_Parainfluenza 3", Pathogen::Para),
    ("VIRUS_Parainfluenza 4", Pathogen::Para),
    ("VIRUS_PH", Pathogen::Para),
    ("VIRUS_PH2", Pathogen::Para),
    ("VIRUS_PH3", Pathogen::Para),
    ("VIRUS_PH4", Pathogen::Para),
    ("VIRUS_Adenovirus", Pathogen::Adeno),
    ("VIRUS_ADE", Pathogen::Adeno),
    ("VIRUS_Bocavirus", Pathogen::Boca),
    ("VIRUS_BOC", Pathogen::Boca),
    ("VIRUS_CoV-229E", Pathogen::Covs),
    ("VIRUS_CoV-HKU", Pathogen::Covs),
    ("VIRUS_CoV-NL63", Pathogen::Covs),
    ("VIRUS_CoV-OC43", Pathogen::Covs),
    ("VIRUS_229E", Pathogen::Covs),
    ("VIRUS_HKU", Pathogen::Covs),
    ("VIRUS_NL63", Pathogen::Covs),
    ("VIRUS_OC43", Pathogen::Covs),
    ("VIRUS_Enterovírus", Pathogen::Entero),
    ("VIRUS_EV", Pathogen::Entero),
    ("BACTE_Bordetella pertussis", Pathogen::Bac),
    ("BACTE_Bordetella parapertussis", Pathogen::Bac),
    ("BACTE_Mycoplasma pneumoniae", Pathogen::Bac),
    ("BACTE_BP", Pathogen::Bac),
    ("BACTE_BPAR", Pathogen::Bac),
    ("BACTE_MP", Pathogen::Bac),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HlaGynLayout {
    Panel24Named,
    Panel24Coded,
    Panel4,
    Covid,
    Unrecognized,
}

impl HlaGynLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            HlaGynLayout::Panel24Named => "24-target panel (named)",
            HlaGynLayout::Panel24Coded => "24-target panel (coded)",
            HlaGynLayout::Panel4 => "4-target panel",
            HlaGynLayout::Covid => "covid",
            HlaGynLayout::Unrecognized => "unrecognized",
        }
    }

    /// Test kit and target columns of a wide layout.
    pub fn wide_targets(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            HlaGynLayout::Panel24Named => Some(("test_24", &NAMED_COLUMNS)),
            HlaGynLayout::Panel24Coded => Some(("test_24", &CODED_COLUMNS)),
            HlaGynLayout::Panel4 => Some(("test_4", &PANEL4_COLUMNS)),
            HlaGynLayout::Covid | HlaGynLayout::Unrecognized => None,
        }
    }
}

pub fn classify(table: &Table) -> HlaGynLayout {
    let joined = table.headers.concat();
    if joined.contains("H1N1") || joined.contains("Influenza") {
        if joined.contains("Parainfluenza") {
            HlaGynLayout::Panel24Named
        } else if joined.contains("PH4") {
            HlaGynLayout::Panel24Coded
        } else if joined.contains("SARS-CoV-2") {
            HlaGynLayout::Panel4
        } else {
            HlaGynLayout::Unrecognized
        }
    } else if table.has_column("CT_N") {
        HlaGynLayout::Covid
    } else {
        HlaGynLayout::Unrecognized
    }
}

/// Outcome of one wide-panel cell.
pub fn target_outcome(cell: &str) -> TargetOutcome {
    match cell.trim().to_lowercase().as_str() {
        "detectado" => TargetOutcome::Detected,
        "não detectado" => TargetOutcome::NotDetected,
        _ => TargetOutcome::NoResult,
    }
}

pub struct HlaGynProcessor;

impl LabProcessor for HlaGynProcessor {
    fn lab(&self) -> LabId {
        LAB
    }

    fn layouts(&self) -> &'static [&'static str] {
        &[
            "24-target panel (named)",
            "24-target panel (coded)",
            "4-target panel",
            "covid",
        ]
    }

    fn process(&self, table: Table, ctx: &ReconcileContext<'_>) -> Result<FileOutcome> {
        let layout = classify(&table);
        let reconciled = match (layout, layout.wide_targets()) {
            (HlaGynLayout::Covid, _) => reconcile_covid(table, ctx)?,
            (_, Some((test_kit, columns))) => {
                reconcile_wide(table, layout.as_str(), test_kit, columns, ctx)?
            }
            (_, None) => return unrecognized(LAB, &table),
        };
        Ok(FileOutcome::Reconciled(reconciled))
    }
}

/// One record per row; every listed column is a target.
pub fn reconcile_wide(
    mut table: Table,
    name: &'static str,
    test_kit: &str,
    columns: &[&str],
    ctx: &ReconcileContext<'_>,
) -> Result<Reconciled> {
    let rows_in = table.len();
    for column in columns {
        if table.ensure_column(column) {
            warn!(lab = %LAB, layout = name, column, "test column missing; added an empty column");
        }
    }
    let dedup = prepare(&mut table, LAB, name, &WIDE_IDENTITY, ctx)?;
    if dedup.is_all_seen() {
        return Ok(Reconciled::already_processed(name, rows_in, dedup));
    }

    let records = (0..table.len())
        .map(|row| {
            let mut calls = CallSheet::new();
            for column in columns {
                if let Some(pathogen) = lookup(&TARGET_CATALOG, column) {
                    calls.apply(pathogen, target_outcome(table.value(row, column)));
                }
            }
            row_record(&table, row, test_kit, &calls)
        })
        .collect();

    Ok(Reconciled {
        layout: name,
        rows_in,
        dedup,
        records,
    })
}

pub fn reconcile_covid(mut table: Table, ctx: &ReconcileContext<'_>) -> Result<Reconciled> {
    let layout = HlaGynLayout::Covid.as_str();
    let rows_in = table.len();
    let dedup = prepare(&mut table, LAB, layout, &COVID_IDENTITY, ctx)?;
    if dedup.is_all_seen() {
        return Ok(Reconciled::already_processed(layout, rows_in, dedup));
    }
    for column in ["CT_N", "CT_ORF1AB"] {
        table.map_column(column, |value| value.replace(',', "."));
    }

    let has_result = table.has_column("Resultado");
    let records = (0..table.len())
        .map(|row| {
            let mut calls = CallSheet::new();
            if has_result {
                calls.apply(Pathogen::Sc2, classify_result_text(table.value(row, "Resultado")));
            }
            row_record(&table, row, "covid", &calls)
        })
        .collect();

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

    fn headers(names: &[&str]) -> Table {
        Table::new(names.iter().map(|h| (*h).to_string()).collect())
    }

    #[test]
    fn classifies_wide_layouts_from_joined_headers() {
        assert_eq!(
            classify(&headers(&["Pedido", "VIRUS_Influenza A", "VIRUS_Parainfluenza 1"])),
            HlaGynLayout::Panel24Named
        );
        assert_eq!(
            classify(&headers(&["Pedido", "VIRUS_H1N1", "VIRUS_PH4"])),
            HlaGynLayout::Panel24Coded
        );
        assert_eq!(
            classify(&headers(&["Vírus Influenza A", "Coronavírus SARS-CoV-2"])),
            HlaGynLayout::Panel4
        );
        assert_eq!(classify(&headers(&["VIRUS_H1N1"])), HlaGynLayout::Unrecognized);
        assert_eq!(classify(&headers(&["Pedido", "CT_N"])), HlaGynLayout::Covid);
        assert_eq!(classify(&headers(&["Pedido"])), HlaGynLayout::Unrecognized);
    }

    #[test]
    fn cell_outcomes() {
        assert_eq!(target_outcome(" Detectado "), TargetOutcome::Detected);
        assert_eq!(target_outcome("NÃO DETECTADO"), TargetOutcome::NotDetected);
        assert_eq!(target_outcome("Inválido"), TargetOutcome::NoResult);
        assert_eq!(target_outcome(""), TargetOutcome::NoResult);
    }

    #[test]
    fn every_wide_column_is_catalogued() {
        for column in NAMED_COLUMNS.iter().chain(&CODED_COLUMNS).chain(&PANEL4_COLUMNS) {
            assert!(lookup(&TARGET_CATALOG, column).is_some(), "{column}");
        }
    }
}
