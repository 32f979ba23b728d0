//! Build orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use dv_llms::{LlmContent, LlmContentBuilder, compile_bundles, write_bundle};
use dv_registry::DocRegistry;
use dv_sitemap::{
    BlogDates, HiddenRoutes, RouteManifest, RouteSet, RouteTreeManifest, Sitemap, StaticRoutes,
};
use dv_spec::normalize_route;
use dv_storage::Storage;

use crate::config::BuildConfig;
use crate::error::BuildError;

const SPEC_OUTPUT: &str = "static/docs-spec.json";
const SITEMAP_OUTPUT: &str = "sitemap.xml";

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// One written bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleSummary {
    pub slug: String,
    pub route: String,
    pub tokens: usize,
}

/// Outcome of a successful build.
#[derive(Clone, Debug)]
pub struct BuildReport {
    /// Documents in the registry.
    pub docs: usize,
    pub bundles: Vec<BundleSummary>,
    /// Routes listed in the sitemap, including bundle `.txt` variants.
    pub sitemap_entries: usize,
    pub sitemap_path: PathBuf,
}

/// Runs the build pipeline against a body source.
pub struct SiteBuilder {
    config: BuildConfig,
    storage: Arc<dyn Storage>,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(config: BuildConfig, storage: Arc<dyn Storage>) -> Self {
        Self { config, storage }
    }

    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Load the registry, then write the docs spec, every bundle and the
    /// sitemap.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step. An invalid docs spec yields
    /// [`BuildError::Registry`] carrying every validation error.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let out = &self.config.output_dir;

        let registry = self.load_registry()?;

        let spec_path = out.join(SPEC_OUTPUT);
        write_output(&spec_path, &serde_json::to_string_pretty(registry.spec())?)?;

        let builder = LlmContentBuilder::new(&registry, self.storage.as_ref());
        let bundles = compile_bundles(&self.config.bundles, &builder)?;
        for bundle in &bundles {
            write_bundle(bundle, out)?;
        }

        let routes = self.compile_routes(&registry, false)?;
        let sitemap = self.sitemap(&routes, &bundles)?;
        let sitemap_path = out.join(SITEMAP_OUTPUT);
        write_output(&sitemap_path, &sitemap.to_xml()?)?;

        let report = BuildReport {
            docs: registry.len(),
            bundles: bundles
                .iter()
                .map(|b| BundleSummary {
                    slug: b.slug().to_owned(),
                    route: b.route().to_owned(),
                    tokens: b.tokens(),
                })
                .collect(),
            sitemap_entries: sitemap.entries().len(),
            sitemap_path,
        };
        tracing::info!(
            docs = report.docs,
            bundles = report.bundles.len(),
            sitemap_entries = report.sitemap_entries,
            elapsed_ms = elapsed_ms(start),
            "Build complete"
        );
        Ok(report)
    }

    /// Public route set without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the docs spec, route manifest, blog index or
    /// hidden patterns cannot be loaded.
    pub fn routes(&self, include_hidden: bool) -> Result<RouteSet, BuildError> {
        let registry = self.load_registry()?;
        self.compile_routes(&registry, include_hidden)
    }

    fn load_registry(&self) -> Result<DocRegistry, BuildError> {
        let registry = DocRegistry::load(&self.config.spec_file)?;
        tracing::info!(
            path = %self.config.spec_file.display(),
            docs = registry.len(),
            "Loaded docs registry"
        );
        Ok(registry)
    }

    fn compile_routes(
        &self,
        registry: &DocRegistry,
        include_hidden: bool,
    ) -> Result<RouteSet, BuildError> {
        let mut declared = StaticRoutes(self.config.routes.clone()).declared_routes()?;
        if let Some(path) = &self.config.route_manifest {
            let manifest_routes = RouteTreeManifest::new(path).declared_routes()?;
            tracing::debug!(
                path = %path.display(),
                routes = manifest_routes.len(),
                "Read route manifest"
            );
            declared.extend(manifest_routes);
        }
        declared.extend(self.blog_dates()?.routes());

        let hidden = HiddenRoutes::new(&self.config.hidden_patterns)?;
        let routes = RouteSet::compile(
            declared.iter().map(String::as_str),
            registry.all_docs().iter().map(|doc| doc.route_path.as_str()),
            self.config.bundles.iter().map(|b| b.route.as_str()),
            &hidden,
            include_hidden,
        );
        tracing::debug!(routes = routes.len(), include_hidden, "Compiled routes");
        Ok(routes)
    }

    fn sitemap(&self, routes: &RouteSet, bundles: &[LlmContent]) -> Result<Sitemap, BuildError> {
        let blog = self.blog_dates()?;
        let mut sitemap = Sitemap::new(&self.config.site_url, self.today());
        // a bundle's `.txt` is published only alongside its page
        for bundle in bundles.iter().filter(|b| routes.contains(b.route())) {
            sitemap.add_text_variant(normalize_route(bundle.route()));
        }
        sitemap.add_routes(routes, &self.config.sitemap_exclude, &blog);
        Ok(sitemap)
    }

    fn blog_dates(&self) -> Result<BlogDates, BuildError> {
        Ok(self
            .config
            .blog_index
            .as_deref()
            .map(BlogDates::load)
            .transpose()?
            .unwrap_or_default())
    }

    fn today(&self) -> NaiveDate {
        self.config
            .today
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

fn write_output(path: &Path, contents: &str) -> Result<(), BuildError> {
    let write = || {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)
    };
    write().map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Wrote output");
    Ok(())
}
