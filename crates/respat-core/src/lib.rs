//! Layout detection and record reconciliation for lab exports.
//!
//! - **identity**: SHA-1 sample ids over a layout's identity columns
//! - **dedup**: cache-based filtering of already processed samples
//! - **ct**: Ct value rescaling for instruments that drop the decimal point
//! - **classify**: free-text result classification
//! - **group**: group-and-resolve helpers shared by the lab reconcilers
//! - **labs**: one processor per lab
//! - **processor**: the `LabProcessor` trait and registry

pub mod classify;
pub mod ct;
pub mod dedup;
pub mod error;
pub mod group;
pub mod identity;
pub mod labs;
pub mod processor;

pub use classify::classify_result_text;
pub use ct::{CtRescale, format_ct};
pub use dedup::{DedupOutcome, SeenSamples, filter_unseen};
pub use error::{CoreError, Result};
pub use identity::{assign_sample_ids, sample_id};
pub use processor::{
    FileOutcome, LabProcessor, ProcessorRegistry, ReconcileContext, Reconciled, default_registry,
};
