use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown pathogen code: {0}")]
    UnknownPathogen(String),
    #[error("unknown lab: {0}")]
    UnknownLab(String),
    #[error("invalid sample id '{0}': expected 16 or 40 lowercase hex characters")]
    InvalidSampleId(String),
    #[error("catalog is missing required column '{column}'")]
    MissingCatalogColumn { column: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
