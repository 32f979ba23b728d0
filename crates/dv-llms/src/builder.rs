//! Loading document bodies into bundle leaves.

use dv_registry::DocRegistry;
use dv_spec::DocInfo;
use dv_storage::Storage;
use rayon::prelude::*;

use crate::content::{ContentMeta, LlmContent};
use crate::error::LlmError;

/// Builds bundles from registry documents and a body source.
///
/// Bodies are loaded in parallel and reassembled in registry order, so the
/// result does not depend on load timing.
pub struct LlmContentBuilder<'a> {
    registry: &'a DocRegistry,
    storage: &'a dyn Storage,
}

impl<'a> LlmContentBuilder<'a> {
    #[must_use]
    pub fn new(registry: &'a DocRegistry, storage: &'a dyn Storage) -> Self {
        Self { registry, storage }
    }

    /// Registry the builder resolves documents against.
    #[must_use]
    pub fn registry(&self) -> &'a DocRegistry {
        self.registry
    }

    /// Bundle of every document at or below `prefix`, in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Load`] if any body cannot be loaded.
    pub fn include_directory(&self, meta: ContentMeta, prefix: &str) -> Result<LlmContent, LlmError> {
        Ok(LlmContent::from_children(meta, self.load_directory(prefix)?))
    }

    /// Bundle of an explicit list of content paths, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::UnknownDocument`] for a path the registry doesn't
    /// know and [`LlmError::Load`] if a body cannot be loaded.
    pub fn include_paths<S: AsRef<str>>(
        &self,
        meta: ContentMeta,
        paths: &[S],
    ) -> Result<LlmContent, LlmError> {
        Ok(LlmContent::from_children(meta, self.load_paths(paths)?))
    }

    /// Leaves for every document at or below `prefix`.
    ///
    /// A document that only groups children is included when it has a body
    /// of its own and skipped otherwise.
    pub(crate) fn load_directory(&self, prefix: &str) -> Result<Vec<LlmContent>, LlmError> {
        let docs: Vec<&DocInfo> = self
            .registry
            .docs_under(prefix)
            .into_iter()
            .filter(|doc| !doc.has_children || self.storage.exists(&doc.path))
            .collect();

        if docs.is_empty() {
            tracing::warn!(prefix, "No documents found for bundle directory");
        }
        self.load_all(&docs)
    }

    pub(crate) fn load_paths<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<LlmContent>, LlmError> {
        let docs = paths
            .iter()
            .map(|p| {
                let path = p.as_ref();
                self.registry
                    .get_by_path(path)
                    .ok_or_else(|| LlmError::UnknownDocument(path.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.load_all(&docs)
    }

    /// Load a single document as a leaf.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Load`] if the body cannot be loaded.
    pub fn load_document(&self, doc: &DocInfo) -> Result<LlmContent, LlmError> {
        let body = self.storage.read(&doc.path).map_err(|source| LlmError::Load {
            path: doc.path.clone(),
            source,
        })?;
        Ok(LlmContent::from_document(doc, &body))
    }

    fn load_all(&self, docs: &[&DocInfo]) -> Result<Vec<LlmContent>, LlmError> {
        tracing::debug!(count = docs.len(), "Loading document bodies");
        // Indexed collect keeps input order
        docs.par_iter().map(|doc| self.load_document(doc)).collect()
    }
}
