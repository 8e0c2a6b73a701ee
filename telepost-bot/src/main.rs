//! TelePost server binary.

use anyhow::Result;
use clap::{Parser, Subcommand};

use telepost_bot::config::AppConfig;
use telepost_bot::runner::run_server;

#[derive(Parser)]
#[command(name = "telepost", about = "AI post generation and publishing for Telegram")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web wizard and webhook server.
    Serve {
        /// Telegram bot token; falls back to BOT_TOKEN.
        #[arg(long)]
        token: Option<String>,
    },
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { token } => {
            let config = AppConfig::load(token)?;
            telepost_core::init_tracing(&config.log_file)?;
            run_server(config).await
        }
    }
}
