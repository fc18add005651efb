use std::fmt;

use crate::ModelError;

/// Lowercase hex content hash identifying one physical sample.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SampleId(String);

impl SampleId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let valid_len = matches!(value.len(), 16 | 40);
        let valid_chars = value
            .chars()
            .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch));
        if !valid_len || !valid_chars {
            return Err(ModelError::InvalidSampleId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
