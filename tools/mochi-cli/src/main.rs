//! Mochi CLI: add voiceovers and text overlays to a video.
//!
//! Usage:
//!   mochi process <VIDEO> [--audio PATH[@DELAY]]... [--overlay SPEC]...
//!   mochi plan <VIDEO> [...]       Show the requests without sending them
//!   mochi config [--save]          Show (or write) the configuration

use clap::{Parser, Subcommand};

mod commands;

use commands::EditArgs;

#[derive(Parser)]
#[command(
    name = "mochi",
    about = "Add voiceovers and text overlays to a video through a processing server",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a video with voiceover segments and/or text overlays
    Process {
        #[command(flatten)]
        edit: EditArgs,
    },

    /// Print the requests `process` would send, without sending them
    Plan {
        #[command(flatten)]
        edit: EditArgs,
    },

    /// Show the effective configuration
    Config {
        /// Write the configuration to the standard location
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = mochi_common::AppConfig::load();

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    mochi_common::logging::init_logging(&config.logging);
    tracing::debug!(server = %config.server.base_url, "Configuration loaded");

    match cli.command {
        Commands::Process { edit } => commands::process::run(edit, config).await,
        Commands::Plan { edit } => commands::plan::run(edit, config),
        Commands::Config { save } => commands::config::run(config, save),
    }
}
