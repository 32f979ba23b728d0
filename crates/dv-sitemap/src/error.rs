use std::path::PathBuf;

/// Errors raised while compiling routes or rendering the sitemap.
#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid route pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Route manifest not found in {}", path.display())]
    ManifestMissing { path: PathBuf },

    #[error("Failed to render sitemap XML: {0}")]
    Xml(String),
}
