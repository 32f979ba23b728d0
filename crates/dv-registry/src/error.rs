//! Registry error types.

use std::path::PathBuf;

use dv_spec::{SpecError, ValidationErrors};

/// Error returned by the fallible [`DocRegistry`](crate::DocRegistry) constructors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Spec file could not be read.
    #[error("Failed to read docs spec {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Spec text is not JSON.
    #[error("Invalid docs spec JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Spec failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

impl From<SpecError> for RegistryError {
    fn from(err: SpecError) -> Self {
        match err {
            SpecError::Json(e) => Self::Json(e),
            SpecError::Invalid(e) => Self::Invalid(e),
        }
    }
}

impl RegistryError {
    /// Validation problems, if this error came from validation.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
