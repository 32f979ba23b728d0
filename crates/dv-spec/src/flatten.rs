//! Flattening of the docs tree into ordered [`DocInfo`] records.
//!
//! # Ordering
//!
//! Every sibling list (products, sections, documents) is ordered by resolved
//! weight: an explicit weight is used verbatim, an absent weight defaults to
//! the node's zero-based declaration position. The sort is stable, so ties
//! keep declaration order and slugs are never compared. The walk is
//! depth-first pre-order: a document comes before its children.
//!
//! # Paths
//!
//! | Node | `path` | `route_path` |
//! |------|--------|--------------|
//! | `calls` in section `index` | `mirascope/calls` | `/docs/mirascope/calls` |
//! | `index` in section `index` | `mirascope/index` | `/docs/mirascope` |
//! | `llm` in section `api` | `mirascope/api/llm` | `/docs/mirascope/api/llm` |
//! | `index` in section `api` | `mirascope/api/index` | `/docs/mirascope/api` |

use crate::model::{
    DocInfo, DocKind, DocSpec, INDEX_SLUG, ProductName, ProductSpec, SectionSpec, ValidatedSpec,
};
use crate::route::{DOCS_ROUTE_PREFIX, normalize_route};

/// Flatten a validated spec into documents in canonical order.
#[must_use]
pub fn flatten_spec(spec: &ValidatedSpec) -> Vec<DocInfo> {
    flatten_products(spec.products())
}

/// Flatten a single section of a product.
///
/// This is the same routine [`flatten_spec`] uses for each section, so
/// per-section queries always agree with the full flattening.
#[must_use]
pub fn flatten_section(product: ProductName, section: &SectionSpec) -> Vec<DocInfo> {
    let prefix = section_prefix(product, &section.slug);
    let mut docs = Vec::new();
    push_docs(&section.children, product, &section.slug, &prefix, &mut docs);
    docs
}

/// Content path prefix for a section's children.
#[must_use]
pub fn section_prefix(product: ProductName, section_slug: &str) -> String {
    if section_slug == INDEX_SLUG {
        product.as_str().to_owned()
    } else {
        format!("{product}/{section_slug}")
    }
}

/// Flatten products without requiring validation (used by the validator).
pub(crate) fn flatten_products(products: &[ProductSpec]) -> Vec<DocInfo> {
    let mut docs = Vec::new();
    for (idx, _) in canonical_order(products, |p| p.weight) {
        let product = &products[idx];
        for (section_idx, _) in canonical_order(&product.sections, |s| s.weight) {
            docs.extend(flatten_section(
                product.product,
                &product.sections[section_idx],
            ));
        }
    }
    docs
}

/// Resolve weights and return `(declaration index, resolved weight)` pairs
/// sorted into canonical order.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn canonical_order<T>(items: &[T], weight: impl Fn(&T) -> Option<f64>) -> Vec<(usize, f64)> {
    let mut order: Vec<(usize, f64)> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| (idx, weight(item).unwrap_or(idx as f64)))
        .collect();
    // `sort_by` is stable: equal weights keep declaration order
    order.sort_by(|a, b| a.1.total_cmp(&b.1));
    order
}

fn push_docs(
    nodes: &[DocSpec],
    product: ProductName,
    section: &str,
    prefix: &str,
    out: &mut Vec<DocInfo>,
) {
    for (idx, weight) in canonical_order(nodes, |n| n.weight) {
        let node = &nodes[idx];
        let path = format!("{prefix}/{}", node.slug);
        let route_path = if node.slug == INDEX_SLUG {
            format!("{DOCS_ROUTE_PREFIX}/{prefix}")
        } else {
            format!("{DOCS_ROUTE_PREFIX}/{path}")
        };
        let kind = node.kind();

        out.push(DocInfo {
            label: node.label.clone(),
            slug: node.slug.clone(),
            product,
            section: section.to_owned(),
            route_path: normalize_route(&route_path).to_owned(),
            path: path.clone(),
            weight,
            has_children: matches!(kind, DocKind::Group(_)),
        });

        if let DocKind::Group(children) = kind {
            push_docs(children, product, section, &path, out);
        }
    }
}
