//! hotstuff-installer - installs the prebuilt hotstuff binary
//!
//! Invoked by the package manager's install and uninstall hooks.

mod commands;
mod error;
mod logging;

use std::process;

use clap::{Parser, Subcommand};

use commands::install::{self, InstallArgs};
use commands::uninstall::{self, UninstallArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "hotstuff-installer",
    version,
    about = "Install the hotstuff release for this platform"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download and extract the release for this platform
    Install(InstallArgs),
    /// Remove the installed binary
    Uninstall(UninstallArgs),
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Install(args) => install::run(args),
        Commands::Uninstall(args) => uninstall::run(args).map(|_| ()),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
