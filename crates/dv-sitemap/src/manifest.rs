//! Sources of site-declared routes.
//!
//! Besides documentation, a site has hand-written pages (home, blog, pricing).
//! A [`RouteManifest`] lists them. They come either from configuration
//! ([`StaticRoutes`]) or from a router's generated route tree
//! ([`RouteTreeManifest`]).

use std::path::{Path, PathBuf};

use regex::Regex;

use dv_spec::normalize_route;

use crate::error::SitemapError;

/// Routes that only redirect elsewhere and are never published.
pub const REDIRECT_ROUTES: &[&str] = &["/docs/", "/terms/"];

const ROOT_ROUTE_ID: &str = "__root__";

/// Source of site-declared routes.
pub trait RouteManifest {
    /// Static routes, normalized without trailing slash.
    fn declared_routes(&self) -> Result<Vec<String>, SitemapError>;
}

/// Routes listed in configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticRoutes(pub Vec<String>);

impl RouteManifest for StaticRoutes {
    fn declared_routes(&self) -> Result<Vec<String>, SitemapError> {
        Ok(self
            .0
            .iter()
            .map(|r| normalize_route(r).to_owned())
            .collect())
    }
}

/// Routes extracted from a generated route tree source file.
///
/// The file embeds a JSON manifest between `ROUTE_MANIFEST_START` and
/// `ROUTE_MANIFEST_END` markers:
///
/// ```text
/// /* ROUTE_MANIFEST_START
/// {"routes": {"__root__": {...}, "/": {...}, "/blog/": {...}, "/blog/$slug": {...}}}
/// ROUTE_MANIFEST_END */
/// ```
///
/// When the markers are missing or the JSON is unreadable, route keys of the
/// `FileRoutesByPath` interface (`'/blog/': {`) are scanned instead.
#[derive(Clone, Debug)]
pub struct RouteTreeManifest {
    path: PathBuf,
}

impl RouteTreeManifest {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract static routes from route tree source.
    pub fn parse(source: &str) -> Result<Option<Vec<String>>, SitemapError> {
        let markers = Regex::new(r"ROUTE_MANIFEST_START\s*(\{[\s\S]*?\})\s*ROUTE_MANIFEST_END")?;

        if let Some(json) = markers.captures(source).and_then(|c| c.get(1)) {
            match serde_json::from_str::<serde_json::Value>(json.as_str()) {
                Ok(manifest) => {
                    if let Some(routes) = manifest.get("routes").and_then(|r| r.as_object()) {
                        return Ok(Some(collect_static(routes.keys().map(String::as_str))));
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse route manifest, scanning route keys");
                }
            }
        }

        let keys = Regex::new(r"\s+'(/[^']*)':\s+\{")?;
        let found: Vec<&str> = keys
            .captures_iter(source)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(collect_static(found)))
        }
    }
}

impl RouteManifest for RouteTreeManifest {
    fn declared_routes(&self) -> Result<Vec<String>, SitemapError> {
        let source = std::fs::read_to_string(&self.path).map_err(|source| SitemapError::Io {
            path: self.path.clone(),
            source,
        })?;
        Self::parse(&source)?.ok_or_else(|| SitemapError::ManifestMissing {
            path: self.path.clone(),
        })
    }
}

/// Drop the root id, dynamic (`$param`) and redirect-only routes; normalize
/// the rest and sort.
fn collect_static<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut routes: Vec<String> = ids
        .into_iter()
        .filter(|id| *id != ROOT_ROUTE_ID && !id.contains('$') && !REDIRECT_ROUTES.contains(id))
        .map(|id| normalize_route(id).to_owned())
        .collect();
    routes.sort();
    routes.dedup();
    routes
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ROUTE_TREE: &str = r#"
export interface FileRoutesByPath {
  '/': {
    id: '/'
  }
}

/* ROUTE_MANIFEST_START
{
  "routes": {
    "__root__": {"filePath": "__root.tsx"},
    "/": {"filePath": "index.tsx"},
    "/blog/": {"filePath": "blog.index.tsx"},
    "/blog/$slug": {"filePath": "blog.$slug.tsx"},
    "/docs/": {"filePath": "docs.index.tsx"},
    "/terms/": {"filePath": "terms.index.tsx"},
    "/terms/use": {"filePath": "terms.use.tsx"},
    "/pricing": {"filePath": "pricing.tsx"},
    "/dev/colors": {"filePath": "dev.colors.tsx"}
  }
}
ROUTE_MANIFEST_END */
"#;

    #[test]
    fn test_parse_manifest() {
        let routes = RouteTreeManifest::parse(ROUTE_TREE).unwrap().unwrap();
        assert_eq!(
            routes,
            vec!["/", "/blog", "/dev/colors", "/pricing", "/terms/use"]
        );
    }

    #[test]
    fn test_parse_falls_back_to_route_keys() {
        let source = r"
export interface FileRoutesByPath {
  '/': {
    id: '/'
  }
  '/blog/': {
    id: '/blog/'
  }
  '/blog/$slug': {
    id: '/blog/$slug'
  }
  '/pricing': {
    id: '/pricing'
  }
}
";
        let routes = RouteTreeManifest::parse(source).unwrap().unwrap();
        assert_eq!(routes, vec!["/", "/blog", "/pricing"]);
    }

    #[test]
    fn test_parse_without_routes() {
        assert!(RouteTreeManifest::parse("const x = 1;").unwrap().is_none());
    }

    #[test]
    fn test_route_tree_manifest_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routeTree.gen.ts");
        std::fs::write(&path, ROUTE_TREE).unwrap();

        let routes = RouteTreeManifest::new(&path).declared_routes().unwrap();
        assert_eq!(routes.len(), 5);
    }

    #[test]
    fn test_route_tree_manifest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RouteTreeManifest::new(dir.path().join("nope.ts"))
            .declared_routes()
            .unwrap_err();
        assert!(matches!(err, SitemapError::Io { .. }));
    }

    #[test]
    fn test_route_tree_manifest_without_routes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routeTree.gen.ts");
        std::fs::write(&path, "export {}").unwrap();

        let err = RouteTreeManifest::new(&path).declared_routes().unwrap_err();
        assert!(matches!(err, SitemapError::ManifestMissing { .. }));
    }

    #[test]
    fn test_static_routes_normalized() {
        let routes = StaticRoutes(vec!["/".to_owned(), "/blog/".to_owned()]);
        assert_eq!(routes.declared_routes().unwrap(), vec!["/", "/blog"]);
    }
}
