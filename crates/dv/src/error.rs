//! CLI error types.

use dv_build::BuildError;
use dv_config::ConfigError;
use dv_registry::RegistryError;
use dv_storage::StorageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Validation(String),
}
