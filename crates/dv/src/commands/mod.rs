//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod routes;
pub(crate) mod validate;
pub(crate) mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dv_build::{BuildConfig, BuildReport, SiteBuilder};
use dv_config::{CliSettings, Config};
use dv_storage::FsStorage;

pub(crate) use build::BuildArgs;
pub(crate) use routes::RoutesArgs;
pub(crate) use validate::ValidateArgs;
pub(crate) use watch::WatchArgs;

use crate::error::CliError;
use crate::output::{Output, Tone};

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover dv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory holding `docs/_meta.json` (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Absolute site URL used in the sitemap (overrides config).
    #[arg(long, env = "DV_SITE_URL")]
    site_url: Option<String>,

    /// Enable verbose output (build step logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    fn load_config(&self) -> Result<Config, CliError> {
        let settings = CliSettings {
            content_dir: self.content_dir.clone(),
            output_dir: self.output_dir.clone(),
            site_url: self.site_url.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

fn storage(config: &Config) -> Result<Arc<FsStorage>, CliError> {
    let docs_dir = config.paths.docs_dir();
    let storage = match &config.watch.patterns {
        Some(patterns) => FsStorage::with_patterns(docs_dir, patterns)?,
        None => FsStorage::new(docs_dir),
    };
    Ok(Arc::new(storage))
}

fn site_builder(config: &Config) -> Result<(SiteBuilder, Arc<FsStorage>), CliError> {
    let storage = storage(config)?;
    let builder = SiteBuilder::new(BuildConfig::from_config(config), Arc::<FsStorage>::clone(&storage));
    Ok((builder, storage))
}

fn print_report(output: &Output, report: &BuildReport) {
    output.line(Tone::Plain, format_args!("Documents: {}", report.docs));
    for bundle in &report.bundles {
        output.line(
            Tone::Plain,
            format_args!("  {} ({} tokens)", bundle.route, bundle.tokens),
        );
    }
    output.line(
        Tone::Plain,
        format_args!(
            "Sitemap: {} ({} entries)",
            report.sitemap_path.display(),
            report.sitemap_entries
        ),
    );
}
