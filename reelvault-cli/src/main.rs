//! Reelvault CLI - Command-line interface
//!
//! Provides command-line access to the Reelvault video library server.

mod commands;

use clap::Parser;
use reelvault_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "reelvault")]
#[command(about = "A personal video library and editing server")]
struct Cli {
    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), None)?;
    commands::handle_command(cli.command).await?;

    Ok(())
}
