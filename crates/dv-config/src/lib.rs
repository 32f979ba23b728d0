//! Configuration management for dv.
//!
//! Parses `dv.toml` with serde and discovers it in the current directory or
//! its parents. CLI settings are applied during load via [`CliSettings`].
//!
//! ```toml
//! [site]
//! url = "${SITE_URL:-https://mirascope.com}"
//!
//! [content]
//! dir = "content"
//!
//! [output]
//! dir = "dist"
//!
//! [sitemap]
//! route_manifest = "src/routeTree.gen.ts"
//! blog_index = "content/blog/index.json"
//!
//! [[llms]]
//! slug = "mirascope"
//! title = "Mirascope"
//! route = "/docs/mirascope/llms-full"
//! sources = [{ dir = "mirascope" }]
//! ```
//!
//! Relative paths resolve against the directory holding the config file.
//! `site.url` supports `${VAR}` and `${VAR:-default}` expansion.

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use dv_llms::BundleSpec;
use dv_sitemap::{DEFAULT_HIDDEN_PATTERNS, HiddenRoutes};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub content_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub site_url: Option<String>,
}

const CONFIG_FILENAME: &str = "dv.toml";

const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    content: DirConfigRaw,
    output: DirConfigRaw,
    sitemap: SitemapConfigRaw,
    pub watch: WatchConfig,
    /// Declared LLM bundles, in declaration order.
    pub llms: Vec<BundleSpec>,

    /// Resolved input and output directories (set after loading).
    #[serde(skip)]
    pub paths: PathsConfig,
    /// Resolved sitemap configuration (set after loading).
    #[serde(skip)]
    pub sitemap_resolved: SitemapConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute site URL prefixed to every sitemap entry.
    pub url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SITE_URL.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DirConfigRaw {
    dir: Option<String>,
}

/// Resolved directories.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// Content root; documents live under `<content_dir>/docs`.
    pub content_dir: PathBuf,
    /// Build output directory.
    pub output_dir: PathBuf,
}

impl PathsConfig {
    /// Directory holding `_meta.json` and the document bodies.
    #[must_use]
    pub fn docs_dir(&self) -> PathBuf {
        self.content_dir.join("docs")
    }

    /// Location of the docs spec (`_meta.json`).
    #[must_use]
    pub fn spec_file(&self) -> PathBuf {
        self.docs_dir().join("_meta.json")
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SitemapConfigRaw {
    routes: Vec<String>,
    route_manifest: Option<String>,
    hidden_patterns: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    blog_index: Option<String>,
}

/// Resolved sitemap configuration.
#[derive(Debug)]
pub struct SitemapConfig {
    /// Routes declared directly in the config file.
    pub routes: Vec<String>,
    /// Generated route tree to read declared routes from.
    pub route_manifest: Option<PathBuf>,
    /// Regex patterns of routes kept out of the sitemap.
    pub hidden_patterns: Vec<String>,
    /// Routes published but never listed in the sitemap.
    pub exclude: Vec<String>,
    /// Blog index JSON (`[{slug, date, lastUpdated}]`).
    pub blog_index: Option<PathBuf>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            route_manifest: None,
            hidden_patterns: DEFAULT_HIDDEN_PATTERNS.iter().map(|&p| p.to_owned()).collect(),
            exclude: default_exclude(),
            blog_index: None,
        }
    }
}

fn default_exclude() -> Vec<String> {
    vec!["/404".to_owned()]
}

/// Watch mode configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Glob patterns (relative to the docs directory) that trigger a rebuild.
    pub patterns: Option<Vec<String>>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

impl Config {
    /// Load configuration, then apply CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `dv.toml` in the current directory and its parents, falling back
    /// to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing
    /// fails, or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_dir) = &settings.content_dir {
            self.paths.content_dir.clone_from(content_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.paths.output_dir.clone_from(output_dir);
        }
        if let Some(site_url) = &settings.site_url {
            self.site.url.clone_from(site_url);
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            content: DirConfigRaw::default(),
            output: DirConfigRaw::default(),
            sitemap: SitemapConfigRaw::default(),
            watch: WatchConfig::default(),
            llms: Vec::new(),
            paths: PathsConfig {
                content_dir: base.join("content"),
                output_dir: base.join("dist"),
            },
            sitemap_resolved: SitemapConfig::default(),
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.site.url = expand::expand_env(&config.site.url, "site.url")?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths = PathsConfig {
            content_dir: resolve(self.content.dir.as_deref(), "content"),
            output_dir: resolve(self.output.dir.as_deref(), "dist"),
        };

        let defaults = SitemapConfig::default();
        self.sitemap_resolved = SitemapConfig {
            routes: self.sitemap.routes.clone(),
            route_manifest: self.sitemap.route_manifest.as_deref().map(|p| config_dir.join(p)),
            hidden_patterns: self
                .sitemap
                .hidden_patterns
                .clone()
                .unwrap_or(defaults.hidden_patterns),
            exclude: self.sitemap.exclude.clone().unwrap_or(defaults.exclude),
            blog_index: self.sitemap.blog_index.as_deref().map(|p| config_dir.join(p)),
        };
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for a non-http(s) site URL, a hidden
    /// pattern that is not a valid regex, or a malformed bundle declaration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_sitemap()?;
        self.validate_llms()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        let url = &self.site.url;
        if url.is_empty() {
            return Err(ConfigError::Validation("site.url cannot be empty".to_owned()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "site.url must start with http:// or https://".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_sitemap(&self) -> Result<(), ConfigError> {
        self.hidden_routes().map(|_| ())
    }

    fn validate_llms(&self) -> Result<(), ConfigError> {
        let mut slugs = HashSet::new();
        for bundle in &self.llms {
            if bundle.slug.is_empty() {
                return Err(ConfigError::Validation("llms.slug cannot be empty".to_owned()));
            }
            if !slugs.insert(bundle.slug.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate llms bundle `{}`",
                    bundle.slug
                )));
            }
            if !bundle.route.starts_with('/') || bundle.route.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "llms bundle `{}`: route must be an absolute path, got `{}`",
                    bundle.slug, bundle.route
                )));
            }
        }
        Ok(())
    }

    /// Compiled hidden-route predicate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a pattern is not a valid regex.
    pub fn hidden_routes(&self) -> Result<HiddenRoutes, ConfigError> {
        HiddenRoutes::new(&self.sitemap_resolved.hidden_patterns)
            .map_err(|e| ConfigError::Validation(format!("sitemap.hidden_patterns: {e}")))
    }
}
