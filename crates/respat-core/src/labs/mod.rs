//! Per-lab layout classifiers and reconcilers.
//!
//! | Lab | Layouts | Unknown layout |
//! |-----|---------|----------------|
//! | DASA | viral panel, Thermo covid | fail |
//! | DB Molecular | respiratory panel, Thermo omicron, covid-19 | skip |
//! | Fleury | exam requests | fail |
//! | HLAGyn | 24-target panel (named, coded), 4-target panel, covid | skip |
//! | SABIN | covid | skip |

pub mod dasa;
pub mod db;
pub mod fleury;
pub mod hlagyn;
pub mod sabin;

use std::collections::BTreeSet;

use respat_model::schema::TEST_KIT;
use respat_model::{CallSheet, LabId, Pathogen, Record, Table};
use tracing::warn;

use crate::dedup::{DedupOutcome, filter_unseen};
use crate::error::Result;
use crate::group::write_calls;
use crate::identity::assign_sample_ids;
use crate::processor::ReconcileContext;

/// Hash identity columns and drop rows already present in the cache.
pub(crate) fn prepare(
    table: &mut Table,
    lab: LabId,
    layout: &'static str,
    identity: &[&str],
    ctx: &ReconcileContext<'_>,
) -> Result<DedupOutcome> {
    assign_sample_ids(table, lab, identity)?;
    Ok(filter_unseen(table, ctx.seen, layout))
}

/// Map a target code through a `(code, pathogen)` catalog.
pub(crate) fn lookup(catalog: &[(&str, Pathogen)], code: &str) -> Option<Pathogen> {
    catalog
        .iter()
        .find(|(target, _)| *target == code)
        .map(|(_, pathogen)| *pathogen)
}

/// Target codes seen in a file that no catalog knows about.
///
/// Each distinct code is reported once when the collector is flushed.
#[derive(Debug, Default)]
pub(crate) struct Anomalies {
    codes: BTreeSet<String>,
}

impl Anomalies {
    pub(crate) fn record(&mut self, code: &str) {
        self.codes.insert(code.to_string());
    }

    pub(crate) fn flush(self, lab: LabId, layout: &str) {
        for code in self.codes {
            warn!(lab = %lab, layout, code, "target code is an anomaly; check for inconsistencies");
        }
    }
}

/// One record per raw row, with its test kit and calls.
pub(crate) fn row_record(table: &Table, row: usize, test_kit: &str, calls: &CallSheet) -> Record {
    let mut record = table.record(row);
    record.set(TEST_KIT, test_kit);
    write_calls(&mut record, calls);
    record
}
