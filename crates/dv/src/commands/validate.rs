//! `dv validate` command implementation.

use clap::Args;
use dv_registry::{DocRegistry, RegistryError};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the validate command.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl ValidateArgs {
    /// Validate the docs spec, listing every problem found.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;
        let spec_file = config.paths.spec_file();

        match DocRegistry::load(&spec_file) {
            Ok(registry) => {
                output.line(
                    Tone::Done,
                    format_args!(
                        "{} is valid ({} documents, {} products)",
                        spec_file.display(),
                        registry.len(),
                        registry.product_names().len()
                    ),
                );
                Ok(())
            }
            Err(RegistryError::Invalid(errors)) => {
                output.line(Tone::Heading, format_args!("{}:", spec_file.display()));
                for error in errors.iter() {
                    output.line(Tone::Warn, format_args!("  {error}"));
                }
                Err(CliError::Validation(format!(
                    "{} validation error(s) in docs spec",
                    errors.len()
                )))
            }
            Err(err) => Err(err.into()),
        }
    }
}
