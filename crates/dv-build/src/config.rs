use std::path::PathBuf;

use chrono::NaiveDate;
use dv_config::Config;
use dv_llms::BundleSpec;

/// Inputs of one build.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Docs spec (`<content>/docs/_meta.json`).
    pub spec_file: PathBuf,
    pub output_dir: PathBuf,
    /// Absolute site URL for sitemap entries.
    pub site_url: String,
    pub bundles: Vec<BundleSpec>,
    /// Routes declared in configuration.
    pub routes: Vec<String>,
    /// Generated route tree providing further declared routes.
    pub route_manifest: Option<PathBuf>,
    pub hidden_patterns: Vec<String>,
    /// Routes left out of the sitemap.
    pub sitemap_exclude: Vec<String>,
    pub blog_index: Option<PathBuf>,
    /// Default `lastmod`; the local date when unset.
    pub today: Option<NaiveDate>,
}

impl BuildConfig {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let sitemap = &config.sitemap_resolved;
        Self {
            spec_file: config.paths.spec_file(),
            output_dir: config.paths.output_dir.clone(),
            site_url: config.site.url.clone(),
            bundles: config.llms.clone(),
            routes: sitemap.routes.clone(),
            route_manifest: sitemap.route_manifest.clone(),
            hidden_patterns: sitemap.hidden_patterns.clone(),
            sitemap_exclude: sitemap.exclude.clone(),
            blog_index: sitemap.blog_index.clone(),
            today: None,
        }
    }
}
