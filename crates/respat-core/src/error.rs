use respat_model::{LabId, ModelError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{lab}: unrecognized file layout (columns: {columns})")]
    UnrecognizedLayout { lab: LabId, columns: String },
    #[error("{lab}: no result column found (tried {candidates})")]
    MissingResultColumn { lab: LabId, candidates: String },
    #[error("no processor registered for lab {0}")]
    UnknownLab(LabId),
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
