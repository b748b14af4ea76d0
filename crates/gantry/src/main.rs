mod cli;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Gantry: start and stop interdependent components in dependency order
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the order components start in
    Order {
        /// Path to the system manifest (.json, .toml, .yaml)
        manifest: PathBuf,
        /// Print the stop order instead
        #[arg(long)]
        reverse: bool,
    },
    /// Check the manifest and its dependency wiring
    Check {
        /// Path to the system manifest
        manifest: PathBuf,
    },
    /// Start the system, then stop it
    Run {
        /// Path to the system manifest
        manifest: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match args.command {
        Commands::Order { manifest, reverse } => cli::order(&manifest, reverse),
        Commands::Check { manifest } => cli::check(&manifest),
        Commands::Run { manifest } => cli::run(&manifest).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
