//! Walsh CLI - offline host for the sequency-domain spectral editor.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "walsh")]
#[command(author, version, about = "Sequency-domain spectral editor", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an audio file through the editor
    Process(commands::process::ProcessArgs),

    /// Print the strongest sequency coefficients of one window
    Inspect(commands::inspect::InspectArgs),

    /// Show or create parameter presets
    Preset(commands::preset::PresetArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Preset(args) => commands::preset::run(args),
    }
}
