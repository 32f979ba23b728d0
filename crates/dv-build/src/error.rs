use std::path::PathBuf;

use dv_llms::LlmError;
use dv_registry::RegistryError;
use dv_sitemap::SitemapError;

/// Failure of one build step.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Sitemap(#[from] SitemapError),

    #[error("Failed to serialize docs spec: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
