//! Sales Insights TUI — interactive terminal interface for generating
//! sales reports.
//!
//! Provides screens for entering a company, reading the generated report
//! and browsing this session's history, built with `ratatui` + `crossterm`.

mod app;
mod screens;
mod widgets;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    app::run()
}
