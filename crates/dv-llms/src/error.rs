use std::path::PathBuf;

use dv_storage::StorageError;

/// Errors raised while assembling or writing bundles.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A document body could not be loaded; the bundle is not built.
    #[error("Failed to load document `{path}`: {source}")]
    Load {
        path: String,
        #[source]
        source: StorageError,
    },

    #[error("Unknown document `{0}`")]
    UnknownDocument(String),

    #[error("Bundle `{bundle}` references unknown bundle `{reference}`")]
    UnknownBundle { bundle: String, reference: String },

    #[error("Duplicate bundle slug `{0}`")]
    DuplicateBundle(String),

    #[error("Bundle reference cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("Invalid bundle route `{0}`")]
    InvalidRoute(String),

    #[error("Invalid bundle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
