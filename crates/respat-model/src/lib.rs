#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod ids;
pub mod lab;
pub mod pathogen;
pub mod schema;
pub mod table;

pub use catalog::{ANY_LAB, CorrectionCatalog, RenameCatalog};
pub use error::{ModelError, Result};
pub use ids::SampleId;
pub use lab::{AgePolicy, DateOrder, LabId, TextEncoding, UnknownLayoutPolicy};
pub use pathogen::{CallSheet, Pathogen, PathogenCall, TargetOutcome};
pub use schema::CANONICAL_COLUMNS;
pub use table::{Record, Table};
