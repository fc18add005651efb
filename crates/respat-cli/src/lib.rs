//! Library side of the `respat` binary.
//!
//! - **logging**: tracing subscriber setup
//! - **pipeline**: staged lab job (setup, discover, process, aggregate, write)
//! - **types**: job and per-file results

pub mod logging;
pub mod pipeline;
pub mod types;
