//! `dv build` command implementation.

use clap::Args;

use super::{SiteArgs, print_report, site_builder};
use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl BuildArgs {
    /// Build the docs spec, LLM bundles and sitemap.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;

        output.line(
            Tone::Plain,
            format_args!(
                "Content directory: {}",
                config.paths.content_dir.display()
            ),
        );
        output.line(
            Tone::Plain,
            format_args!(
                "Output directory: {}",
                config.paths.output_dir.display()
            ),
        );

        let (builder, _storage) = site_builder(&config)?;
        let report = builder.build()?;

        print_report(&output, &report);
        output.line(Tone::Done, "Build complete");
        Ok(())
    }
}
