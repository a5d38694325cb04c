//! mbcomp CLI - offline front end for the three-band compressor.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mbcomp")]
#[command(author, version, about = "Three-band compressor", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a WAV file
    Process(commands::process::ProcessArgs),

    /// List every parameter with its unit, range and default
    Params(commands::params::ParamsArgs),

    /// Write the default state as a TOML file
    InitState(commands::init_state::InitStateArgs),

    /// List saved state files
    States(commands::states::StatesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::InitState(args) => commands::init_state::run(args),
        Commands::States(args) => commands::states::run(args),
    }
}
