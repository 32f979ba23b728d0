//! dv CLI - docs registry, LLM bundle and sitemap builder.
//!
//! Provides commands for:
//! - `build`: Write the docs spec, LLM bundles and `sitemap.xml`
//! - `validate`: Check the docs spec and list every problem
//! - `routes`: Print the compiled route set
//! - `watch`: Build, then rebuild on content changes

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, RoutesArgs, SiteArgs, ValidateArgs, WatchArgs};
use output::{Output, Tone};

/// dv - docs registry, LLM bundle and sitemap builder.
#[derive(Parser)]
#[command(name = "dv", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the docs spec, LLM bundles and sitemap.
    Build(BuildArgs),
    /// Validate the docs spec.
    Validate(ValidateArgs),
    /// List public routes.
    Routes(RoutesArgs),
    /// Build and rebuild on content changes.
    Watch(WatchArgs),
}

impl Commands {
    fn site(&self) -> &SiteArgs {
        match self {
            Self::Build(args) => &args.site,
            Self::Validate(args) => &args.site,
            Self::Routes(args) => &args.site,
            Self::Watch(args) => &args.site,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.site().verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Validate(args) => args.execute(),
        Commands::Routes(args) => args.execute(),
        Commands::Watch(args) => args.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.line(Tone::Failed, format_args!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
