//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use salesinsights_artifacts::{TextToPdfSerializer, write_pdf_export, write_text_export};
use salesinsights_core::composer::ReportComposer;
use salesinsights_core::llm::GroqChatClient;
use salesinsights_core::pipeline::{GenerateResult, ProgressReporter, ReportOutcome};
use salesinsights_core::session::{RECENT_LIMIT, SessionHistory};
use salesinsights_search::{MultiQuerySearchAggregator, TavilyClient};
use salesinsights_shared::{AppConfig, ReportRequest, init_config, load_config, validate_api_keys};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Sales Insights — research a company and generate a sales report.
#[derive(Parser)]
#[command(
    name = "salesinsights",
    version,
    about = "Generate sales-intelligence reports from web search and an LLM.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Research a company and generate a sales insights report.
    Generate {
        /// Company name (e.g., Microsoft, Apple, Tesla).
        #[arg(short, long)]
        company: String,

        /// Company URL (e.g., microsoft.com).
        #[arg(short, long)]
        url: String,

        /// Product you are selling (e.g., Office 365, CRM Software).
        #[arg(short, long, default_value = "")]
        product: String,

        /// Known competitors (e.g., Salesforce, HubSpot).
        #[arg(long, default_value = "")]
        competitors: String,

        /// Directory for export files (defaults to [export].output_dir).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip the PDF export.
        #[arg(long)]
        no_pdf: bool,

        /// Skip the plain-text export.
        #[arg(long)]
        no_text: bool,
    },

    /// Launch the interactive TUI.
    Tui,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "salesinsights=info",
        1 => "salesinsights=debug",
        _ => "salesinsights=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            company,
            url,
            product,
            competitors,
            out,
            no_pdf,
            no_text,
        } => {
            let request = ReportRequest::new(company, url, product, competitors);
            let exports = ExportChoice {
                out,
                text: !no_text,
                pdf: !no_pdf,
            };
            cmd_generate(request, exports).await
        }
        Command::Tui => cmd_tui(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

struct ExportChoice {
    out: Option<PathBuf>,
    text: bool,
    pdf: bool,
}

async fn cmd_generate(request: ReportRequest, exports: ExportChoice) -> Result<()> {
    request.validate()?;

    let config = load_config()?;
    validate_api_keys(&config)?;

    let search = TavilyClient::from_env(&config.search)?;
    let generator = GroqChatClient::from_env(&config.llm)?;
    let aggregator =
        MultiQuerySearchAggregator::new(search, Duration::from_millis(config.search.pause_ms));
    let composer = ReportComposer::new(aggregator, generator);

    info!(
        company = %request.company_name,
        product = %request.product_name,
        model = %config.llm.model,
        "analyzing company"
    );

    let mut session = SessionHistory::new();
    let reporter = CliProgress::new();
    let result =
        salesinsights_core::pipeline::generate_report(&composer, &request, &mut session, &reporter)
            .await?;

    for warning in &result.warnings {
        eprintln!("  warning: {warning}");
    }

    println!();
    println!("## Sales Insights Report");
    println!();
    println!("{}", result.outcome.display_text());
    println!();

    print_alerts(&session);

    if let ReportOutcome::Generated(report) = &result.outcome {
        let dir = export_dir(&config, exports.out.as_ref());
        if exports.text {
            let path = write_text_export(&dir, &report.company, &report.content)?;
            println!("  Text:  {}", path.display());
        }
        if exports.pdf {
            match TextToPdfSerializer.render(&report.content, &report.company) {
                Some(bytes) => {
                    let path = write_pdf_export(&dir, &report.company, &bytes)?;
                    println!("  PDF:   {}", path.display());
                }
                None => eprintln!("  PDF export unavailable: document could not be created"),
            }
        }
        println!("  Time:  {:.1}s", result.elapsed.as_secs_f64());
        println!();
        Ok(())
    } else {
        Err(eyre!("no report generated"))
    }
}

fn print_alerts(session: &SessionHistory) {
    let recent = session.recent_alerts(RECENT_LIMIT);
    if recent.is_empty() {
        println!("  No alerts yet");
        println!();
        return;
    }

    println!("  Recent alerts ({} total):", session.alerts().len());
    for alert in recent {
        println!(
            "    {}: {} detected ({})",
            alert.company,
            alert.keyword,
            alert.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
    println!();
}

fn export_dir(config: &AppConfig, out: Option<&PathBuf>) -> PathBuf {
    out.cloned()
        .unwrap_or_else(|| PathBuf::from(&config.export.output_dir))
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// tui
// ---------------------------------------------------------------------------

const TUI_BIN: &str = "salesinsights-tui";

/// Run the TUI binary, preferring the one installed next to this executable.
fn cmd_tui() -> Result<()> {
    info!("launching TUI");

    let sibling = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TUI_BIN)))
        .filter(|path| path.exists());
    let program = sibling.unwrap_or_else(|| PathBuf::from(TUI_BIN));

    let status = std::process::Command::new(&program)
        .status()
        .map_err(|e| eyre!("failed to launch {}: {e}", program.display()))?;

    if status.success() {
        Ok(())
    } else {
        Err(eyre!("{TUI_BIN} exited with {status}"))
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
