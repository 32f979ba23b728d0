//! Spec tree types and the flattened [`DocInfo`] record.
//!
//! The authored tree is `FullDocsSpec -> ProductSpec -> SectionSpec -> DocSpec*`.
//! Field names follow the JSON wire format (`camelCase`), so a spec written by
//! hand or produced by another tool deserializes directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reserved slug for landing content.
///
/// A section with this slug contributes its children directly under the
/// product prefix; a document with this slug is the landing page of its prefix.
pub const INDEX_SLUG: &str = "index";

/// Closed set of documented products.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductName {
    Mirascope,
    Lilypad,
}

impl ProductName {
    /// All known products, in declaration order.
    pub const ALL: [Self; 2] = [Self::Mirascope, Self::Lilypad];

    /// Identifier used in content paths and routes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mirascope => "mirascope",
            Self::Lilypad => "lilypad",
        }
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown product identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product `{0}` (expected one of: mirascope, lilypad)")]
pub struct UnknownProductError(pub String);

impl FromStr for ProductName {
    type Err = UnknownProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownProductError(s.to_owned()))
    }
}

/// A document node in the docs tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocSpec {
    /// Path segment, unique among siblings.
    pub slug: String,
    /// Display name.
    pub label: String,
    /// Sort key among siblings. Defaults to the declaration position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Nested documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DocSpec>>,
}

/// Leaf/group view of a [`DocSpec`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DocKind<'a> {
    /// A document without nested documents.
    Leaf,
    /// A document that also groups nested documents.
    Group(&'a [DocSpec]),
}

impl DocSpec {
    /// Create a leaf document.
    #[must_use]
    pub fn leaf(slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            weight: None,
            children: None,
        }
    }

    /// Create a document with nested documents.
    #[must_use]
    pub fn group(slug: impl Into<String>, label: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            weight: None,
            children: Some(children),
        }
    }

    /// Set an explicit weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Classify this node. An empty children list counts as a leaf.
    #[must_use]
    pub fn kind(&self) -> DocKind<'_> {
        match self.children.as_deref() {
            Some(children) if !children.is_empty() => DocKind::Group(children),
            _ => DocKind::Leaf,
        }
    }
}

/// A top-level grouping of documents inside a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub slug: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub children: Vec<DocSpec>,
}

impl SectionSpec {
    /// Create a section.
    #[must_use]
    pub fn new(slug: impl Into<String>, label: impl Into<String>, children: Vec<DocSpec>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            weight: None,
            children,
        }
    }

    /// Set an explicit weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// True for the product's root section.
    #[must_use]
    pub fn is_index(&self) -> bool {
        self.slug == INDEX_SLUG
    }
}

/// Documentation of a single product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub product: ProductName,
    pub sections: Vec<SectionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl ProductSpec {
    /// Create a product spec.
    #[must_use]
    pub fn new(product: ProductName, sections: Vec<SectionSpec>) -> Self {
        Self {
            product,
            sections,
            weight: None,
        }
    }

    /// Find a section by slug.
    #[must_use]
    pub fn section(&self, slug: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.slug == slug)
    }
}

/// Root of the documentation index, as authored.
pub type FullDocsSpec = Vec<ProductSpec>;

/// A [`FullDocsSpec`] that passed validation.
///
/// Only the validator constructs this type, so holding one is proof that
/// slugs, weights and resolved paths are sound.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedSpec(FullDocsSpec);

impl ValidatedSpec {
    pub(crate) fn new(spec: FullDocsSpec) -> Self {
        Self(spec)
    }

    /// Validated products in declaration order.
    #[must_use]
    pub fn products(&self) -> &[ProductSpec] {
        &self.0
    }

    /// Unwrap into the underlying spec.
    #[must_use]
    pub fn into_inner(self) -> FullDocsSpec {
        self.0
    }
}

/// Resolved record for one addressable document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocInfo {
    /// Display name.
    pub label: String,
    /// Last path segment.
    pub slug: String,
    /// Owning product.
    pub product: ProductName,
    /// Slug of the owning section.
    pub section: String,
    /// Content path used to load the body (e.g. `mirascope/calls`).
    pub path: String,
    /// Public route, normalized without trailing slash (e.g. `/docs/mirascope/calls`).
    pub route_path: String,
    /// Resolved sort key among siblings.
    pub weight: f64,
    /// True if the node groups nested documents.
    pub has_children: bool,
}
