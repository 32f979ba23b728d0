//! `dv routes` command implementation.

use clap::Args;
use console::Term;

use super::{SiteArgs, site_builder};
use crate::error::CliError;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Also list routes matching the hidden patterns.
    #[arg(long)]
    include_hidden: bool,
}

impl RoutesArgs {
    /// Print the compiled public route set, one route per line, to stdout.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.site.load_config()?;
        let (builder, _storage) = site_builder(&config)?;
        let routes = builder.routes(self.include_hidden)?;

        let stdout = Term::stdout();
        for route in routes.iter() {
            stdout.write_line(route)?;
        }
        Ok(())
    }
}
