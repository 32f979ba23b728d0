//! Spec validation.
//!
//! Validation runs in two passes and collects every problem it finds:
//!
//! 1. **Shape**: the raw JSON value must match the recursive schema (arrays
//!    where lists are expected, string slugs and labels, numeric weights,
//!    known product identifiers).
//! 2. **Semantics**: on the typed tree, slugs must be non-blank, free of `/`,
//!    other than `.` or `..`, and unique among siblings; weights must be finite and non-negative; an
//!    `index` document cannot have children; and resolved content paths and
//!    routes must be unique across the whole corpus.
//!
//! Data problems never panic. They are returned as [`ValidationErrors`],
//! each carrying a location such as `[0].sections[1].children[2].slug`.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::flatten::flatten_products;
use crate::model::{DocKind, DocSpec, FullDocsSpec, INDEX_SLUG, ProductName, ProductSpec, ValidatedSpec};

/// A single validation problem.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{location}: {message}")]
pub struct ValidationError {
    /// Where the problem is (`[0].sections[1].slug`, or a content path for
    /// corpus-wide collisions).
    pub location: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Non-empty list of validation problems.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid docs specification: {}", joined(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// All problems, in discovery order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Number of problems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: an empty list is never returned as an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over problems.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

fn joined(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error returned when parsing and validating a spec from JSON text.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// The input is not JSON at all.
    #[error("Invalid spec JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON does not describe a valid spec.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// Parse JSON text and validate it.
pub fn parse_and_validate(json: &str) -> Result<ValidatedSpec, SpecError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(validate_value(&value)?)
}

/// Validate a raw `_meta.json` value against the schema and rules.
pub fn validate_value(value: &Value) -> Result<ValidatedSpec, ValidationErrors> {
    let mut collector = Collector::default();
    check_root_shape(value, &mut collector);
    collector.finish()?;

    let spec = FullDocsSpec::deserialize(value)
        .map_err(|e| ValidationErrors(vec![ValidationError::new("$", e.to_string())]))?;
    validate_spec(spec)
}

/// Validate an already-typed spec (semantic checks only).
pub fn validate_spec(spec: FullDocsSpec) -> Result<ValidatedSpec, ValidationErrors> {
    let mut collector = Collector::default();
    check_products(&spec, &mut collector);
    // Path collisions are only meaningful once siblings are sound
    if collector.is_empty() {
        check_resolved_paths(&spec, &mut collector);
    }
    collector.finish()?;
    Ok(ValidatedSpec::new(spec))
}

#[derive(Default)]
struct Collector(Vec<ValidationError>);

impl Collector {
    fn push(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError::new(location, message));
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

// Shape pass

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn check_root_shape(value: &Value, c: &mut Collector) {
    let Some(products) = value.as_array() else {
        c.push(
            "$",
            format!("expected an array of products, found {}", type_name(value)),
        );
        return;
    };
    for (i, product) in products.iter().enumerate() {
        check_product_shape(product, &format!("[{i}]"), c);
    }
}

fn as_object<'a>(value: &'a Value, loc: &str, c: &mut Collector) -> Option<&'a Map<String, Value>> {
    let obj = value.as_object();
    if obj.is_none() {
        c.push(loc, format!("expected an object, found {}", type_name(value)));
    }
    obj
}

fn require_string(obj: &Map<String, Value>, key: &str, loc: &str, c: &mut Collector) {
    match obj.get(key) {
        Some(Value::String(_)) => {}
        Some(other) => c.push(
            format!("{loc}.{key}"),
            format!("expected a string, found {}", type_name(other)),
        ),
        None => c.push(format!("{loc}.{key}"), "missing required field"),
    }
}

fn check_optional_number(obj: &Map<String, Value>, key: &str, loc: &str, c: &mut Collector) {
    match obj.get(key) {
        None | Some(Value::Number(_)) => {}
        Some(other) => c.push(
            format!("{loc}.{key}"),
            format!("expected a number, found {}", type_name(other)),
        ),
    }
}

fn get_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    required: bool,
    loc: &str,
    c: &mut Collector,
) -> Option<&'a Vec<Value>> {
    match obj.get(key) {
        Some(Value::Array(items)) => Some(items),
        Some(other) => {
            c.push(
                format!("{loc}.{key}"),
                format!("expected an array, found {}", type_name(other)),
            );
            None
        }
        None => {
            if required {
                c.push(format!("{loc}.{key}"), "missing required field");
            }
            None
        }
    }
}

fn check_product_shape(value: &Value, loc: &str, c: &mut Collector) {
    let Some(obj) = as_object(value, loc, c) else {
        return;
    };

    match obj.get("product") {
        Some(Value::String(name)) => {
            if let Err(e) = name.parse::<ProductName>() {
                c.push(format!("{loc}.product"), e.to_string());
            }
        }
        Some(other) => c.push(
            format!("{loc}.product"),
            format!("expected a string, found {}", type_name(other)),
        ),
        None => c.push(format!("{loc}.product"), "missing required field"),
    }
    check_optional_number(obj, "weight", loc, c);

    if let Some(sections) = get_array(obj, "sections", true, loc, c) {
        for (i, section) in sections.iter().enumerate() {
            check_node_shape(section, &format!("{loc}.sections[{i}]"), true, c);
        }
    }
}

fn check_node_shape(value: &Value, loc: &str, is_section: bool, c: &mut Collector) {
    let Some(obj) = as_object(value, loc, c) else {
        return;
    };

    require_string(obj, "slug", loc, c);
    require_string(obj, "label", loc, c);
    check_optional_number(obj, "weight", loc, c);

    if let Some(children) = get_array(obj, "children", is_section, loc, c) {
        for (i, child) in children.iter().enumerate() {
            check_node_shape(child, &format!("{loc}.children[{i}]"), false, c);
        }
    }
}

// Semantic pass

fn check_products(spec: &[ProductSpec], c: &mut Collector) {
    let mut seen: HashMap<ProductName, usize> = HashMap::new();

    for (i, product) in spec.iter().enumerate() {
        let loc = format!("[{i}]");
        match seen.entry(product.product) {
            Entry::Occupied(first) => c.push(
                format!("{loc}.product"),
                format!(
                    "duplicate product `{}` (first declared at [{}])",
                    product.product,
                    first.get()
                ),
            ),
            Entry::Vacant(entry) => {
                entry.insert(i);
            }
        }
        check_weight(product.weight, &loc, c);

        check_siblings(
            product.sections.iter().map(|s| s.slug.as_str()),
            |j| format!("{loc}.sections[{j}]"),
            c,
        );
        for (j, section) in product.sections.iter().enumerate() {
            let section_loc = format!("{loc}.sections[{j}]");
            check_slug_and_label(&section.slug, &section.label, &section_loc, c);
            check_weight(section.weight, &section_loc, c);
            check_docs(&section.children, &section_loc, c);
        }
    }
}

fn check_docs(nodes: &[DocSpec], parent_loc: &str, c: &mut Collector) {
    check_siblings(
        nodes.iter().map(|n| n.slug.as_str()),
        |i| format!("{parent_loc}.children[{i}]"),
        c,
    );

    for (i, node) in nodes.iter().enumerate() {
        let loc = format!("{parent_loc}.children[{i}]");
        check_slug_and_label(&node.slug, &node.label, &loc, c);
        check_weight(node.weight, &loc, c);

        if let DocKind::Group(children) = node.kind() {
            if node.slug == INDEX_SLUG {
                c.push(
                    format!("{loc}.children"),
                    "an `index` document is a landing page and cannot have children",
                );
            }
            check_docs(children, &loc, c);
        }
    }
}

fn check_siblings<'a>(
    slugs: impl Iterator<Item = &'a str>,
    loc: impl Fn(usize) -> String,
    c: &mut Collector,
) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (i, slug) in slugs.enumerate() {
        if slug.trim().is_empty() {
            // Reported by check_slug_and_label
            continue;
        }
        match seen.entry(slug) {
            Entry::Occupied(first) => {
                let message = if slug == INDEX_SLUG {
                    format!(
                        "duplicate landing page `index` (first declared at index {})",
                        first.get()
                    )
                } else {
                    format!(
                        "duplicate slug `{slug}` (first declared at index {})",
                        first.get()
                    )
                };
                c.push(format!("{}.slug", loc(i)), message);
            }
            Entry::Vacant(entry) => {
                entry.insert(i);
            }
        }
    }
}

fn check_slug_and_label(slug: &str, label: &str, loc: &str, c: &mut Collector) {
    if slug.trim().is_empty() {
        c.push(format!("{loc}.slug"), "slug cannot be empty");
    } else if slug.contains('/') {
        c.push(
            format!("{loc}.slug"),
            format!("slug `{slug}` cannot contain `/`"),
        );
    } else if slug == "." || slug == ".." {
        c.push(
            format!("{loc}.slug"),
            format!("slug `{slug}` is not a path segment"),
        );
    }
    if label.trim().is_empty() {
        c.push(format!("{loc}.label"), "label cannot be empty");
    }
}

fn check_weight(weight: Option<f64>, loc: &str, c: &mut Collector) {
    let Some(weight) = weight else {
        return;
    };
    if !weight.is_finite() {
        c.push(format!("{loc}.weight"), "weight must be a finite number");
    } else if weight < 0.0 {
        c.push(
            format!("{loc}.weight"),
            format!("weight cannot be negative (found {weight})"),
        );
    }
}

fn check_resolved_paths(spec: &[ProductSpec], c: &mut Collector) {
    let docs = flatten_products(spec);
    let mut paths: HashSet<&str> = HashSet::new();
    let mut routes: HashMap<&str, &str> = HashMap::new();

    for doc in &docs {
        if !paths.insert(doc.path.as_str()) {
            c.push(doc.path.as_str(), "content path is declared more than once");
        }
        match routes.entry(doc.route_path.as_str()) {
            Entry::Occupied(other) => c.push(
                doc.path.as_str(),
                format!(
                    "route `{}` is already claimed by `{}`",
                    doc.route_path,
                    other.get()
                ),
            ),
            Entry::Vacant(entry) => {
                entry.insert(doc.path.as_str());
            }
        }
    }
}
