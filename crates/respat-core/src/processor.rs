//! Lab processor trait and registry.
//!
//! Each lab implements [`LabProcessor`]: classify a raw table into one of the
//! lab's known layouts, then reconcile it into one record per test request.
//! Processors are looked up by [`LabId`] in a [`ProcessorRegistry`].

use std::collections::HashMap;
use std::sync::OnceLock;

use respat_model::{LabId, Record, Table, UnknownLayoutPolicy};
use tracing::warn;

use crate::ct::CtRescale;
use crate::dedup::{DedupOutcome, SeenSamples};
use crate::error::{CoreError, Result};
use crate::labs;

/// Inputs shared by every file of a job.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileContext<'a> {
    pub seen: &'a SeenSamples,
    pub ct: &'a CtRescale,
}

/// A file reconciled under a recognized layout.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub layout: &'static str,
    pub rows_in: usize,
    pub dedup: DedupOutcome,
    pub records: Vec<Record>,
}

impl Reconciled {
    /// Nothing new in this file.
    pub fn already_processed(layout: &'static str, rows_in: usize, dedup: DedupOutcome) -> Self {
        Self {
            layout,
            rows_in,
            dedup,
            records: Vec::new(),
        }
    }

    pub fn into_table(self) -> Table {
        Table::from_records(&self.records)
    }
}

/// What happened to one raw file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Reconciled(Reconciled),
    /// The layout was not recognized and the lab's policy is to drop the file.
    Skipped { reason: String },
}

/// Trait for lab-specific layout detection and reconciliation.
pub trait LabProcessor: Send + Sync {
    fn lab(&self) -> LabId;

    /// Names of the layouts this processor recognizes.
    fn layouts(&self) -> &'static [&'static str];

    /// Reconcile one raw table.
    ///
    /// # Errors
    ///
    /// Fails when the layout is unrecognized and the lab's policy is
    /// [`UnknownLayoutPolicy::Fail`], or when a layout's required result
    /// column has no fallback.
    fn process(&self, table: Table, ctx: &ReconcileContext<'_>) -> Result<FileOutcome>;
}

/// Apply the lab's unknown-layout policy.
pub(crate) fn unrecognized(lab: LabId, table: &Table) -> Result<FileOutcome> {
    let columns = table.headers.join(", ");
    match lab.unknown_layout_policy() {
        UnknownLayoutPolicy::Fail => Err(CoreError::UnrecognizedLayout { lab, columns }),
        UnknownLayoutPolicy::Skip => {
            warn!(lab = %lab, %columns, "unknown file format; skipping file, check for inconsistencies");
            Ok(FileOutcome::Skipped {
                reason: "unrecognized layout".to_string(),
            })
        }
    }
}

/// Registry of lab processors indexed by lab.
pub struct ProcessorRegistry {
    processors: HashMap<LabId, Box<dyn LabProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self {
            processors: HashMap::new(),
        }
    }

    /// Registers a processor, replacing any previous one for the same lab.
    pub fn register(&mut self, processor: Box<dyn LabProcessor>) {
        self.processors.insert(processor.lab(), processor);
    }

    pub fn get(&self, lab: LabId) -> Result<&dyn LabProcessor> {
        self.processors
            .get(&lab)
            .map(|p| p.as_ref())
            .ok_or(CoreError::UnknownLab(lab))
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: OnceLock<ProcessorRegistry> = OnceLock::new();

/// Registry with the processors of all supported labs.
pub fn default_registry() -> &'static ProcessorRegistry {
    DEFAULT_REGISTRY.get_or_init(build_default_registry)
}

fn build_default_registry() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    registry.register(Box::new(labs::dasa::DasaProcessor));
    registry.register(Box::new(labs::db::DbMolecularProcessor));
    registry.register(Box::new(labs::fleury::FleuryProcessor));
    registry.register(Box::new(labs::hlagyn::HlaGynProcessor));
    registry.register(Box::new(labs::sabin::SabinProcessor));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_all_labs() {
        let registry = default_registry();
        assert_eq!(registry.len(), LabId::ALL.len());
        for lab in LabId::ALL {
            let processor = registry.get(lab).expect("registered");
            assert_eq!(processor.lab(), lab);
            assert!(!processor.layouts().is_empty());
        }
    }
}
