//! Sales Insights CLI — company research reports from web search and an LLM.
//!
//! Runs targeted searches for a company, flags notable business events,
//! and generates a structured sales-intelligence report with text and PDF
//! exports.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
