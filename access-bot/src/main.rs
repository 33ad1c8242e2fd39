//! Binary for the access request bot.

use access_bot::{load_config, run_console, run_server, Cli, Commands};
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => run_server(load_config(port)?).await,
        Commands::Console => run_console(load_config(None)?).await,
    }
}
