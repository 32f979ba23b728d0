//! Path and route lookups over a validated spec.
//!
//! Documents are stored once in a flat `Vec<DocInfo>` in canonical order;
//! the path and route indexes hold positions into it:
//! - O(1) lookup by content path (`mirascope/calls`)
//! - O(1) lookup by route (`/docs/mirascope/calls`, trailing slash ignored)
//! - O(n) prefix and product scans that preserve canonical order

use std::collections::HashMap;
use std::path::Path;

use dv_spec::{
    DocInfo, FullDocsSpec, ProductName, ProductSpec, ValidatedSpec, flatten_section, flatten_spec,
    normalize_route, parse_and_validate, validate_spec,
};

use crate::error::RegistryError;

/// Immutable index of every document in a docs spec.
#[derive(Debug)]
pub struct DocRegistry {
    spec: ValidatedSpec,
    docs: Vec<DocInfo>,
    path_index: HashMap<String, usize>,
    route_index: HashMap<String, usize>,
    product_index: HashMap<ProductName, usize>,
}

impl DocRegistry {
    /// Build a registry from a validated spec.
    ///
    /// Validation already guarantees that paths and routes are unique, so
    /// construction cannot fail.
    #[must_use]
    pub fn new(spec: ValidatedSpec) -> Self {
        let docs = flatten_spec(&spec);

        let mut path_index = HashMap::with_capacity(docs.len());
        let mut route_index = HashMap::with_capacity(docs.len());
        for (idx, doc) in docs.iter().enumerate() {
            path_index.insert(doc.path.clone(), idx);
            route_index.insert(normalize_route(&doc.route_path).to_owned(), idx);
        }

        let product_index = spec
            .products()
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.product, idx))
            .collect();

        tracing::debug!(
            docs = docs.len(),
            products = spec.products().len(),
            "Built doc registry"
        );

        Self {
            spec,
            docs,
            path_index,
            route_index,
            product_index,
        }
    }

    /// Validate a typed spec and build a registry from it.
    pub fn from_spec(spec: FullDocsSpec) -> Result<Self, RegistryError> {
        Ok(Self::new(validate_spec(spec)?))
    }

    /// Parse, validate and index spec JSON.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Ok(Self::new(parse_and_validate(json)?))
    }

    /// Read, validate and index a spec file (usually `content/docs/_meta.json`).
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loading docs spec");
        Self::from_json(&json)
    }

    /// All documents in canonical order.
    #[must_use]
    pub fn all_docs(&self) -> &[DocInfo] {
        &self.docs
    }

    /// Look up a document by content path.
    #[must_use]
    pub fn get_by_path(&self, path: &str) -> Option<&DocInfo> {
        self.path_index.get(path).map(|&idx| &self.docs[idx])
    }

    /// Look up a document by route. `/docs/x` and `/docs/x/` are equivalent.
    #[must_use]
    pub fn get_by_route(&self, route: &str) -> Option<&DocInfo> {
        self.route_index
            .get(normalize_route(route))
            .map(|&idx| &self.docs[idx])
    }

    /// Documents of one product in canonical order.
    #[must_use]
    pub fn docs_by_product(&self, product: ProductName) -> Vec<&DocInfo> {
        self.docs.iter().filter(|d| d.product == product).collect()
    }

    /// Documents of one section, derived on demand.
    ///
    /// Returns an empty list for an unknown product or section.
    #[must_use]
    pub fn docs_in_section(&self, product: ProductName, section: &str) -> Vec<DocInfo> {
        self.product_spec(product)
            .and_then(|p| p.section(section))
            .map(|s| flatten_section(product, s))
            .unwrap_or_default()
    }

    /// Documents whose path is `prefix` or lies below it.
    ///
    /// Matching is on whole segments: `mirascope/api` matches
    /// `mirascope/api/llm` but not `mirascope/apis`. Leading and trailing
    /// slashes on the prefix are ignored; an empty prefix matches everything.
    #[must_use]
    pub fn docs_under(&self, prefix: &str) -> Vec<&DocInfo> {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            return self.docs.iter().collect();
        }
        self.docs
            .iter()
            .filter(|d| {
                d.path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            })
            .collect()
    }

    /// Spec of one product.
    #[must_use]
    pub fn product_spec(&self, product: ProductName) -> Option<&ProductSpec> {
        self.product_index
            .get(&product)
            .map(|&idx| &self.spec.products()[idx])
    }

    /// Products present in the docs spec, in declaration order.
    #[must_use]
    pub fn product_names(&self) -> Vec<ProductName> {
        self.spec.products().iter().map(|p| p.product).collect()
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True if the docs spec declares no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// The validated spec this registry was built from.
    #[must_use]
    pub fn spec(&self) -> &ValidatedSpec {
        &self.spec
    }
}
