//! Declared bundles and their resolution.
//!
//! Bundles are declared in configuration:
//!
//! ```toml
//! [[llms]]
//! slug = "mirascope"
//! title = "Mirascope"
//! route = "/docs/mirascope/llms-full"
//! sources = [{ dir = "mirascope" }]
//!
//! [[llms]]
//! slug = "llms-full"
//! title = "llms-full.txt"
//! route = "/llms-full"
//! sources = [{ bundle = "mirascope" }]
//! ```
//!
//! A `dir` source contributes every document below a content prefix, a
//! `docs` source an explicit list of content paths, and a `bundle` source
//! nests another declared bundle as a single child.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::builder::LlmContentBuilder;
use crate::content::{ContentMeta, LlmContent};
use crate::error::LlmError;

/// One declared bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSpec {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub route: String,
    pub sources: Vec<BundleSource>,
}

impl BundleSpec {
    #[must_use]
    pub fn meta(&self) -> ContentMeta {
        ContentMeta::new(&self.slug, &self.title, &self.description, &self.route)
    }
}

/// Where a bundle's children come from.
///
/// Each source table carries exactly one key; `{ dir = .., docs = .. }` is
/// rejected rather than read as one of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum BundleSource {
    /// Every document at or below a content prefix (e.g. `mirascope/api`).
    Directory { dir: String },
    /// Explicit content paths.
    Documents { docs: Vec<String> },
    /// Another declared bundle, nested as one child.
    Bundle { bundle: String },
}

/// Resolve every declared bundle, in declaration order.
///
/// Each bundle is built once even when several bundles nest it.
///
/// # Errors
///
/// Fails on duplicate slugs, references to undeclared bundles, reference
/// cycles, and any document loading error.
pub fn compile_bundles(
    specs: &[BundleSpec],
    builder: &LlmContentBuilder<'_>,
) -> Result<Vec<LlmContent>, LlmError> {
    let mut index = HashMap::with_capacity(specs.len());
    for (idx, spec) in specs.iter().enumerate() {
        if index.insert(spec.slug.as_str(), idx).is_some() {
            return Err(LlmError::DuplicateBundle(spec.slug.clone()));
        }
    }

    let mut resolver = Resolver {
        specs,
        index,
        builder,
        built: HashMap::new(),
        stack: Vec::new(),
    };
    (0..specs.len()).map(|idx| resolver.resolve(idx)).collect()
}

struct Resolver<'s, 'b> {
    specs: &'s [BundleSpec],
    index: HashMap<&'s str, usize>,
    builder: &'b LlmContentBuilder<'b>,
    built: HashMap<usize, LlmContent>,
    /// Bundles currently being resolved, outermost first.
    stack: Vec<usize>,
}

impl Resolver<'_, '_> {
    fn resolve(&mut self, idx: usize) -> Result<LlmContent, LlmError> {
        if let Some(content) = self.built.get(&idx) {
            return Ok(content.clone());
        }
        if let Some(start) = self.stack.iter().position(|&s| s == idx) {
            let mut cycle: Vec<String> = self.stack[start..]
                .iter()
                .map(|&s| self.specs[s].slug.clone())
                .collect();
            cycle.push(self.specs[idx].slug.clone());
            return Err(LlmError::Cycle(cycle));
        }

        let specs = self.specs;
        let spec = &specs[idx];
        self.stack.push(idx);

        let mut children = Vec::new();
        for source in &spec.sources {
            match source {
                BundleSource::Directory { dir } => {
                    children.extend(self.builder.load_directory(dir)?);
                }
                BundleSource::Documents { docs } => {
                    children.extend(self.builder.load_paths(docs)?);
                }
                BundleSource::Bundle { bundle } => {
                    let nested = self.index.get(bundle.as_str()).copied().ok_or_else(|| {
                        LlmError::UnknownBundle {
                            bundle: spec.slug.clone(),
                            reference: bundle.clone(),
                        }
                    })?;
                    children.push(self.resolve(nested)?);
                }
            }
        }

        self.stack.pop();
        let content = LlmContent::from_children(spec.meta(), children);
        tracing::debug!(
            bundle = %spec.slug,
            route = %spec.route,
            tokens = content.tokens(),
            "Compiled bundle"
        );
        self.built.insert(idx, content.clone());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use dv_registry::DocRegistry;
    use dv_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn registry() -> DocRegistry {
        DocRegistry::from_json(
            r#"[
                {"product": "mirascope", "sections": [
                    {"slug": "index", "label": "Docs", "children": [
                        {"slug": "index", "label": "Welcome"},
                        {"slug": "calls", "label": "Calls"}
                    ]}
                ]},
                {"product": "lilypad", "sections": [
                    {"slug": "index", "label": "Docs", "children": [
                        {"slug": "tracing", "label": "Tracing"}
                    ]}
                ]}
            ]"#,
        )
        .unwrap()
    }

    fn storage() -> MockStorage {
        MockStorage::new()
            .with_content("mirascope/index", "Welcome")
            .with_content("mirascope/calls", "Calls")
            .with_content("lilypad/tracing", "Tracing")
    }

    fn spec(slug: &str, route: &str, sources: Vec<BundleSource>) -> BundleSpec {
        BundleSpec {
            slug: slug.to_owned(),
            title: slug.to_owned(),
            description: String::new(),
            route: route.to_owned(),
            sources,
        }
    }

    fn dir(prefix: &str) -> BundleSource {
        BundleSource::Directory {
            dir: prefix.to_owned(),
        }
    }

    fn bundle(slug: &str) -> BundleSource {
        BundleSource::Bundle {
            bundle: slug.to_owned(),
        }
    }

    #[test]
    fn test_nested_bundle_text_matches_product_bundle() {
        let registry = registry();
        let storage = storage();
        let builder = LlmContentBuilder::new(&registry, &storage);
        let specs = vec![
            spec("llms-full", "/llms-full", vec![bundle("mirascope")]),
            spec("mirascope", "/docs/mirascope/llms-full", vec![dir("mirascope")]),
        ];

        let bundles = compile_bundles(&specs, &builder).unwrap();

        assert_eq!(bundles.len(), 2);
        assert_eq!(bundles[0].slug(), "llms-full");
        assert_eq!(bundles[0].children().len(), 1);
        assert_eq!(bundles[0].children()[0], bundles[1]);
        assert_eq!(bundles[0].text(), bundles[1].text());
    }

    #[test]
    fn test_shared_bundle_loaded_once() {
        let registry = registry();
        let storage = storage();
        let builder = LlmContentBuilder::new(&registry, &storage);
        let specs = vec![
            spec("mirascope", "/docs/mirascope/llms-full", vec![dir("mirascope")]),
            spec("a", "/a", vec![bundle("mirascope")]),
            spec("b", "/b", vec![bundle("mirascope")]),
        ];

        compile_bundles(&specs, &builder).unwrap();

        assert_eq!(storage.reads().len(), 2);
    }

    #[test]
    fn test_mixed_sources_in_declared_order() {
        let registry = registry();
        let storage = storage();
        let builder = LlmContentBuilder::new(&registry, &storage);
        let specs = vec![spec(
            "mixed",
            "/mixed",
            vec![
                dir("lilypad"),
                BundleSource::Documents {
                    docs: vec!["mirascope/calls".to_owned()],
                },
            ],
        )];

        let bundles = compile_bundles(&specs, &builder).unwrap();
        let slugs: Vec<&str> = bundles[0].children().iter().map(LlmContent::slug).collect();
        assert_eq!(slugs, vec!["lilypad/tracing", "mirascope/calls"]);
    }

    #[test]
    fn test_duplicate_slug() {
        let registry = registry();
        let storage = storage();
        let builder = LlmContentBuilder::new(&registry, &storage);
        let specs = vec![spec("x", "/x", vec![]), spec("x", "/y", vec![])];

        let err = compile_bundles(&specs, &builder).unwrap_err();
        assert!(matches!(err, LlmError::DuplicateBundle(ref s) if s == "x"));
    }

    #[test]
    fn test_unknown_reference() {
        let registry = registry();
        let storage = storage();
        let builder = LlmContentBuilder::new(&registry, &storage);
        let specs = vec![spec("full", "/full", vec![bundle("ghost")])];

        let err = compile_bundles(&specs, &builder).unwrap_err();
        assert_eq!(err.to_string(), "Bundle `full` references unknown bundle `ghost`");
    }

    #[test]
    fn test_cycle_detected() {
        let registry = registry();
        let storage = storage();
        let builder = LlmContentBuilder::new(&registry, &storage);
        let specs = vec![
            spec("a", "/a", vec![bundle("b")]),
            spec("b", "/b", vec![bundle("c")]),
            spec("c", "/c", vec![bundle("a")]),
        ];

        let err = compile_bundles(&specs, &builder).unwrap_err();
        assert_eq!(err.to_string(), "Bundle reference cycle: a -> b -> c -> a");
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let registry = registry();
        let storage = storage();
        let builder = LlmContentBuilder::new(&registry, &storage);
        let specs = vec![spec("a", "/a", vec![bundle("a")])];

        assert!(matches!(
            compile_bundles(&specs, &builder).unwrap_err(),
            LlmError::Cycle(_)
        ));
    }

    #[test]
    fn test_sources_deserialize_untagged() {
        let json = r#"{
            "slug": "mirascope",
            "title": "Mirascope",
            "route": "/docs/mirascope/llms-full",
            "sources": [{"dir": "mirascope"}, {"docs": ["lilypad/tracing"]}, {"bundle": "other"}]
        }"#;
        let spec: BundleSpec = serde_json::from_str(json).unwrap();

        assert_eq!(
            spec.sources,
            vec![
                dir("mirascope"),
                BundleSource::Documents {
                    docs: vec!["lilypad/tracing".to_owned()]
                },
                bundle("other"),
            ]
        );
        assert_eq!(spec.description, "");
    }

    #[test]
    fn test_source_with_two_keys_rejected() {
        for json in [
            r#"{"dir": "mirascope", "docs": ["lilypad/tracing"]}"#,
            r#"{"bundle": "other", "dir": "mirascope"}"#,
            r#"{"dir": "mirascope", "title": "Extra"}"#,
        ] {
            assert!(serde_json::from_str::<BundleSource>(json).is_err(), "{json}");
        }
    }
}
