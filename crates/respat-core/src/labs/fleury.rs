//! Fleury exports.
//!
//! One long layout with a row per (request, pathogen). The exam code in
//! `EXAME` decides the test kit and how the rows of a request are read.
//! Files are Latin-1, so mojibake variants of accented pathogen names are
//! catalogued next to the clean ones.

use respat_model::schema::{SAMPLE_ID, TEST_KIT};
use respat_model::{CallSheet, LabId, Pathogen, Record, TargetOutcome, Table};

use super::{Anomalies, lookup, prepare};
use crate::error::Result;
use crate::group::{group_rows, seed_record, write_calls};
use crate::processor::{FileOutcome, LabProcessor, ReconcileContext, Reconciled, unrecognized};

const LAB: LabId = LabId::Fleury;
const LAYOUT: &str = "exam requests";
const GROUP_KEY: &str = "CODIGO REQUISICAO";

pub const IDENTITY: [&str; 7] = [
    "CODIGO REQUISICAO",
    "PACIENTE",
    "IDADE",
    "SEXO",
    "DATA COLETA",
    "MUNICIPIO",
    "ESTADO",
];

const REQUIRED: [&str; 3] = ["PATOGENO", "RESULTADO", "EXAME"];

/// Panel header rows and unusable results.
const IGNORED: [&str; 4] = [
    "Vírus respiratórios - detecção",
    "Vï¿½rus respiratï¿½rios - detecï¿½ï¿½o",
    "INCONCLUSIVO",
    "",
];

const POSITIVES: [&str; 5] = [
    "DETECTADO (POSITIVO)",
    "Influenza A - POSITIVO",
    "Influenza B - POSITIVO",
    "P O S I T I V O",
    "POSITIVO",
];

const SINGLE_TESTS: [(&str, &str); 8] = [
    ("2019NCOV", "covid_pcr"),
    ("AGCOVIDNS", "covid_antigen"),
    ("COVID19GX", "covid_pcr"),
    ("COVID19POCT", "covid_pcr"),
    ("COVID19SALI", "covid_pcr"),
    ("INFLUENZAPCR", "flu_pcr"),
    ("AGSINCURG", "vsr_antigen"),
    ("VRSAG", "vsr_antigen"),
];

pub const PATHOGEN_CATALOG: [(&str, Pathogen); 52] = [
    ("Covidflursvgx - Influenza A", Pathogen::FluA),
    ("Virusmol, Influenza A", Pathogen::FluA),
    ("Virusmol, Influenza A/H1", Pathogen::FluA),
    ("Virusmol, Influenza A/H1-2009", Pathogen::FluA),
    ("Virusmol, Influenza A/H3", Pathogen::FluA),
    ("Vírus Influenza A (Sazonal)", Pathogen::FluA),
    ("Vï¿½rus Influenza A (Sazonal)", Pathogen::FluA),
    ("Vírus respiratórios - Influenzavirus A", Pathogen::FluA),
    ("Covidflursvgx - Influenza B", Pathogen::FluB),
    ("Virusmol, Influenza B", Pathogen::FluB),
    ("Vírus respiratórios - Influenzavirus B", Pathogen::FluB),
    ("Covidflursvgx - Vírus Sincicial Respiratório", Pathogen::Vsr),
    ("Covidflursvgx - Vï¿½rus Sincicial Respiratï¿½rio", Pathogen::Vsr),
    ("Virusmol, Vírus Sincicial Respiratório", Pathogen::Vsr),
    ("Virusmol, Vï¿½rus Sincicial Respiratï¿½rio", Pathogen::Vsr),
    ("Vírus Sincial Respiratório", Pathogen::Vsr),
    ("Vírus respiratório - Sincicial", Pathogen::Vsr),
    ("Vï¿½rus respiratï¿½rio - Sincicial", Pathogen::Vsr),
    ("Vírus respiratórios - Vírus Sincicial Respira", Pathogen::Vsr),
    ("Covid 19, Antígeno, teste rápido", Pathogen::Sc2),
    ("Covid 19, Antï¿½geno, teste rï¿½pido", Pathogen::Sc2),
    ("Covid 19, Detecção por PCR", Pathogen::Sc2),
    ("Covid 19, Detecï¿½ï¿½o por PCR", Pathogen::Sc2),
    ("Covidflursvgx - SARS-CoV-2", Pathogen::Sc2),
    ("Virusmol, SARS-CoV-2", Pathogen::Sc2),
    ("Virusmol, Metapneumovírus Humano", Pathogen::Meta),
    ("Virusmol, Metapneumovï¿½rus Humano", Pathogen::Meta),
    ("Virusmol, Parainfluenza 1", Pathogen::Para),
    ("Virusmol, Parainfluenza 2", Pathogen::Para),
    ("Virusmol, Parainfluenza 3", Pathogen::Para),
    ("Virusmol, Parainfluenza 4", Pathogen::Para),
    ("Vírus respiratórios - Parainfluenzavirus 1", Pathogen::Para),
    ("Vírus respiratórios - Parainfluenzavirus 2", Pathogen::Para),
    ("Vírus respiratórios - Parainfluenzavirus 3", Pathogen::Para),
    ("Vírus respiratórios - Parainfluenzavirus 4", Pathogen::Para),
    ("Virusmol, Adenovírus", Pathogen::Adeno),
    ("Virusmol, Adenovï¿½rus", Pathogen::Adeno),
    ("Vírus respiratórios - Adenovírus", Pathogen::Adeno),
    ("Virusmol, Coronavírus 229E", Pathogen::Covs),
    ("Virusmol, Coronavï¿½rus 229E", Pathogen::Covs),
    ("Virusmol, Coronavírus HKU1", Pathogen::Covs),
    ("Virusmol, Coronavï¿½rus HKU1", Pathogen::Covs),
    ("Virusmol, Coronavírus NL63", Pathogen::Covs),
    ("Virusmol, Coronavï¿½rus NL63", Pathogen::Covs),
    ("Virusmol, Coronavírus OC43", Pathogen::Covs),
    ("Virusmol, Coronavï¿½rus OC43", Pathogen::Covs),
    ("Virusmol, Rinovï¿½rus/Enterovï¿½rus", Pathogen::Rino),
    ("Virusmol, Rinovírus/Enterovírus", Pathogen::Rino),
    ("Virusmol, Bordetella parapertussis", Pathogen::Bac),
    ("Virusmol, Bordetella pertussis", Pathogen::Bac),
    ("Virusmol, Chlamydophila pneumoniae", Pathogen::Bac),
    ("Virusmol, Mycoplasma pneumoniae", Pathogen::Bac),
];

/// How the rows of one request are read, decided by its exam code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exam {
    /// One pathogen, one result.
    Single { test_kit: &'static str },
    /// Influenza antigen test reporting A and B in one result text.
    FluAntigen,
    /// Multiplex panel with one row per pathogen.
    Panel { test_kit: &'static str },
    /// Exams that are not reconciled yet, including AGRESPVIR.
    Unsupported,
}

impl Exam {
    pub fn from_code(code: &str) -> Self {
        if let Some((_, kit)) = SINGLE_TESTS.iter().find(|(exam, _)| *exam == code) {
            return Exam::Single { test_kit: *kit };
        }
        match code {
            "AGINFLU" => Exam::FluAntigen,
            "COVIDFLURSVGX" => Exam::Panel { test_kit: "test_4" },
            "VIRUSMOL" => Exam::Panel { test_kit: "test_21" },
            _ => Exam::Unsupported,
        }
    }

    pub fn test_kit(&self) -> &'static str {
        match self {
            Exam::Single { test_kit } | Exam::Panel { test_kit } => *test_kit,
            Exam::FluAntigen => "flu_antigen",
            Exam::Unsupported => "",
        }
    }
}

fn outcome(result: &str) -> TargetOutcome {
    if POSITIVES.contains(&result) {
        TargetOutcome::Detected
    } else {
        TargetOutcome::NotDetected
    }
}

/// Split an influenza antigen result into (A, B) outcomes.
pub fn flu_antigen_outcomes(result: &str) -> (TargetOutcome, TargetOutcome) {
    use TargetOutcome::{Detected, NotDetected};
    match result {
        "Influenza A e B - POSITIVO" => (Detected, Detected),
        "Influenza A - POSITIVO" => (Detected, NotDetected),
        "Influenza B - POSITIVO" => (NotDetected, Detected),
        _ => (NotDetected, NotDetected),
    }
}

pub fn is_recognized(table: &Table) -> bool {
    REQUIRED.iter().all(|column| table.has_column(column))
}

pub struct FleuryProcessor;

impl LabProcessor for FleuryProcessor {
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

fn drop_ignored_rows(table: &mut Table) {
    let indices: Vec<usize> = ["PATOGENO", "RESULTADO"]
        .iter()
        .filter_map(|column| table.column_index(column))
        .collect();
    table.retain_rows(|row| {
        indices
            .iter()
            .all(|&idx| !IGNORED.contains(&row[idx].as_str()))
    });
}

pub fn reconcile(mut table: Table, ctx: &ReconcileContext<'_>) -> Result<Reconciled> {
    let rows_in = table.len();
    drop_ignored_rows(&mut table);
    let dedup = prepare(&mut table, LAB, LAYOUT, &IDENTITY, ctx)?;
    if dedup.is_all_seen() {
        return Ok(Reconciled::already_processed(LAYOUT, rows_in, dedup));
    }

    let mut pinned = vec![SAMPLE_ID, "EXAME"];
    pinned.extend(IDENTITY);
    let mut anomalies = Anomalies::default();
    let records = group_rows(&table, GROUP_KEY)
        .iter()
        .map(|group| request_record(&table, &group.rows, &pinned, &mut anomalies))
        .collect();
    anomalies.flush(LAB, LAYOUT);

    Ok(Reconciled {
        layout: LAYOUT,
        rows_in,
        dedup,
        records,
    })
}

fn request_record(
    table: &Table,
    rows: &[usize],
    pinned: &[&str],
    anomalies: &mut Anomalies,
) -> Record {
    let mut record = seed_record(table, rows, pinned);
    let mut calls = CallSheet::new();
    let exam = rows
        .first()
        .map(|&row| Exam::from_code(table.value(row, "EXAME")))
        .unwrap_or(Exam::Unsupported);

    match exam {
        Exam::Single { .. } | Exam::Panel { .. } => {
            for &row in rows {
                let patogeno = table.value(row, "PATOGENO");
                match lookup(&PATHOGEN_CATALOG, patogeno) {
                    Some(pathogen) => calls.apply(pathogen, outcome(table.value(row, "RESULTADO"))),
                    None => anomalies.record(patogeno),
                }
            }
        }
        Exam::FluAntigen => {
            for &row in rows {
                let (flu_a, flu_b) = flu_antigen_outcomes(table.value(row, "RESULTADO"));
                calls.apply(Pathogen::FluA, flu_a);
                calls.apply(Pathogen::FluB, flu_b);
            }
        }
        Exam::Unsupported => {}
    }

    record.set(TEST_KIT, exam.test_kit());
    write_calls(&mut record, &calls);
    record
}
