//! Post-processing of reconciled lab records.
//!
//! - **catalog**: column renames and value corrections
//! - **datetime**: test-date parsing, epiweeks and ISO formatting
//! - **derive**: age, sex and S-gene detection
//! - **pipeline**: the per-file post-processing order and canonical projection

pub mod catalog;
pub mod datetime;
pub mod derive;
pub mod pipeline;

pub use catalog::{apply_corrections, apply_renames};
pub use datetime::{epiweek_end, parse_date};
pub use pipeline::{Catalogs, postprocess, project};
