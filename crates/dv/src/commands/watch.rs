//! `dv watch` command implementation.

use clap::Args;
use dv_storage::Storage;

use super::{SiteArgs, print_report, site_builder};
use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the watch command.
#[derive(Args)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl WatchArgs {
    /// Build, then rebuild whenever content changes.
    ///
    /// A failed rebuild is reported and the previous output is left in place
    /// until the next successful one.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;
        let (builder, storage) = site_builder(&config)?;

        match builder.build() {
            Ok(report) => print_report(&output, &report),
            Err(err) => output.line(Tone::Failed, format_args!("Build failed: {err}")),
        }

        let (events, _handle) = storage.watch()?;
        output.line(
            Tone::Heading,
            format_args!(
                "Watching {} for changes",
                config.paths.docs_dir().display()
            ),
        );

        while let Some(batch) = events.recv_batch() {
            let changed: Vec<String> = batch
                .iter()
                .map(|event| {
                    event
                        .content_path()
                        .unwrap_or_else(|| event.path.display().to_string())
                })
                .collect();
            tracing::info!(files = ?changed, "Content changed");
            if batch.iter().any(|event| event.is_file_named("_meta.json")) {
                output.line(Tone::Plain, "Docs spec changed");
            }
            output.line(Tone::Plain, format_args!("Changed: {}", changed.join(", ")));

            match builder.build() {
                Ok(report) => {
                    output.line(
                        Tone::Done,
                        format_args!(
                            "Rebuilt {} documents, {} bundles",
                            report.docs,
                            report.bundles.len()
                        ),
                    );
                }
                Err(err) => output.line(Tone::Failed, format_args!("Rebuild failed: {err}")),
            }
        }
        Ok(())
    }
}
