//! Core TUI application state and event loop.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use salesinsights_artifacts::{TextToPdfSerializer, write_pdf_export, write_text_export};
use salesinsights_core::composer::ReportComposer;
use salesinsights_core::llm::GroqChatClient;
use salesinsights_core::pipeline::{ReportOutcome, SilentProgress, generate_report};
use salesinsights_core::session::SessionHistory;
use salesinsights_search::{MultiQuerySearchAggregator, TavilyClient};
use salesinsights_shared::{AppConfig, ReportId, ReportRequest, load_config, validate_api_keys};

use crate::screens::{Action, ScreenId, Screens};
use crate::widgets::{alerts_panel, history_panel, status_bar};

/// Width of the alerts/history sidebar.
const SIDEBAR_WIDTH: u16 = 40;

/// Service clients and the runtime that drives them.
pub(crate) struct Backend {
    runtime: tokio::runtime::Runtime,
    composer: ReportComposer<TavilyClient, GroqChatClient>,
}

impl Backend {
    fn from_config(config: &AppConfig) -> Result<Self> {
        validate_api_keys(config)?;
        let search = TavilyClient::from_env(&config.search)?;
        let generator = GroqChatClient::from_env(&config.llm)?;
        let aggregator =
            MultiQuerySearchAggregator::new(search, Duration::from_millis(config.search.pause_ms));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            runtime,
            composer: ReportComposer::new(aggregator, generator),
        })
    }
}

/// Application state.
pub(crate) struct App {
    /// Currently active screen tab.
    pub active_tab: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Status message shown in bottom bar.
    pub status: String,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Per-screen state.
    pub screens: Screens,
    /// Alerts and report history for this run.
    pub session: SessionHistory,
    /// Request waiting for the next frame to be drawn before it runs.
    pending: Option<ReportRequest>,
    backend: std::result::Result<Backend, String>,
    export_dir: PathBuf,
}

impl App {
    pub(crate) fn new(backend: std::result::Result<Backend, String>, export_dir: PathBuf) -> Self {
        let status = match &backend {
            Ok(_) => "Ready — press ? for help".to_string(),
            Err(e) => format!("Offline: {e}"),
        };

        Self {
            active_tab: 0,
            should_quit: false,
            status,
            show_help: false,
            screens: Screens::new(),
            session: SessionHistory::new(),
            pending: None,
            backend,
            export_dir,
        }
    }

    /// Build the app from the loaded config. A config that fails to load
    /// leaves the app offline with the load error in the status bar.
    pub(crate) fn from_config(config: salesinsights_shared::Result<AppConfig>) -> Self {
        match config {
            Ok(config) => {
                let backend = Backend::from_config(&config).map_err(|e| e.to_string());
                Self::new(backend, PathBuf::from(&config.export.output_dir))
            }
            Err(e) => {
                let defaults = AppConfig::default();
                Self::new(
                    Err(format!("config could not be loaded: {e}")),
                    PathBuf::from(&defaults.export.output_dir),
                )
            }
        }
    }

    fn current_screen(&self) -> ScreenId {
        ScreenId::ALL[self.active_tab]
    }

    fn switch_to(&mut self, id: ScreenId) {
        if let Some(idx) = ScreenId::ALL.iter().position(|s| *s == id) {
            self.active_tab = idx;
        }
    }

    /// Apply a screen action to the session.
    pub(crate) fn apply(&mut self, action: Action) {
        match action {
            Action::Generate(request) => {
                if let Err(e) = request.validate() {
                    self.screens.generate.set_status(format!("⚠️ {e}"));
                    return;
                }
                if let Err(e) = &self.backend {
                    self.screens.generate.set_status(format!("Cannot generate: {e}"));
                    return;
                }
                self.screens.generate.set_status(format!(
                    "🔍 Searching for company information...\nAnalyzing {}...",
                    request.company_name
                ));
                self.status = "Generating report…".to_string();
                self.pending = Some(request);
            }
            Action::SelectReport(id) => {
                if self.session.select_report(id) {
                    self.status = "Showing historical report".to_string();
                }
            }
            Action::ClearHistoricalView => {
                self.session.clear_selection();
                self.status = "Historical view cleared".to_string();
            }
            Action::ClearAlerts => {
                self.session.clear_alerts();
                self.status = "Alerts cleared".to_string();
            }
            Action::Export(id) => self.export(id),
        }
    }

    /// Run a pending generation, blocking until it completes.
    fn run_pending(&mut self) {
        let Some(request) = self.pending.take() else {
            return;
        };
        let Ok(backend) = &self.backend else {
            return;
        };

        let result = backend.runtime.block_on(generate_report(
            &backend.composer,
            &request,
            &mut self.session,
            &SilentProgress,
        ));

        match result {
            Ok(result) => {
                let mut lines: Vec<String> =
                    result.warnings.iter().map(|w| format!("⚠️ {w}")).collect();
                lines.push(match &result.outcome {
                    ReportOutcome::Generated(_) => format!(
                        "Report ready in {:.1}s ({} new alerts).",
                        result.elapsed.as_secs_f64(),
                        result.new_alerts
                    ),
                    other => other.display_text().to_string(),
                });
                self.screens.generate.set_status(lines.join("\n"));
                self.status = match &result.outcome {
                    ReportOutcome::Generated(report) => format!("Report generated for {}", report.company),
                    _ => "No report generated".to_string(),
                };
                self.screens.report.show(result.outcome);
                self.switch_to(ScreenId::Report);
            }
            Err(e) => {
                self.screens.generate.set_status(format!("⚠️ {e}"));
                self.status = "No report generated".to_string();
            }
        }
    }

    fn export(&mut self, id: ReportId) {
        let Some(report) = self.session.reports().iter().find(|r| r.id == id) else {
            return;
        };

        let mut written = Vec::new();
        match write_text_export(&self.export_dir, &report.company, &report.content) {
            Ok(path) => written.push(path.display().to_string()),
            Err(e) => {
                self.status = format!("Text export failed: {e}");
                return;
            }
        }

        match TextToPdfSerializer.render(&report.content, &report.company) {
            Some(bytes) => match write_pdf_export(&self.export_dir, &report.company, &bytes) {
                Ok(path) => written.push(path.display().to_string()),
                Err(e) => {
                    self.status = format!("PDF export failed: {e}");
                    return;
                }
            },
            None => {
                self.status = format!("Exported {} (PDF unavailable)", written.join(", "));
                return;
            }
        }

        self.status = format!("Exported {}", written.join(", "));
    }
}

/// Entry point — sets up terminal, runs event loop, restores terminal.
pub(crate) fn run() -> Result<()> {
    let app = App::from_config(load_config());

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, &app))?;

        if app.pending.is_some() {
            app.run_pending();
            continue;
        }

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key.code, key.modifiers);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let editing = app.screens.is_editing(app.current_screen());
    let tabs = ScreenId::ALL.len();

    // Global keybindings (always active)
    match code {
        KeyCode::Char('q') | KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') if !editing => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') if !editing => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return;
        }
        KeyCode::Char('x') if !editing => {
            app.apply(Action::ClearAlerts);
            return;
        }
        // Tab navigation with number keys
        KeyCode::Char(c @ '1'..='3') if !editing => {
            let idx = (c as usize) - ('1' as usize);
            if idx < tabs {
                app.active_tab = idx;
                app.status = format!("{}", ScreenId::ALL[idx]);
            }
            return;
        }
        KeyCode::Right if !editing => {
            app.active_tab = (app.active_tab + 1) % tabs;
            app.status = format!("{}", ScreenId::ALL[app.active_tab]);
            return;
        }
        KeyCode::Left if !editing => {
            app.active_tab = if app.active_tab == 0 {
                tabs - 1
            } else {
                app.active_tab - 1
            };
            app.status = format!("{}", ScreenId::ALL[app.active_tab]);
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Delegate to current screen
    let id = app.current_screen();
    if let Some(action) = app.screens.handle_key(id, code, modifiers, &app.session) {
        app.apply(action);
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Content + sidebar
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // Tab bar
    let tab_titles: Vec<Line> = ScreenId::ALL
        .iter()
        .map(|s| Line::from(format!("{s}")))
        .collect();

    let tabs = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" 🎯 Sales Insights Agent "),
        )
        .select(app.active_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(SIDEBAR_WIDTH)])
        .split(chunks[1]);

    // Content area — delegate to screen
    app.screens
        .draw(app.current_screen(), f, body[0], &app.session);

    // Sidebar
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body[1]);
    f.render_widget(alerts_panel(&app.session), sidebar[0]);
    f.render_widget(history_panel(&app.session), sidebar[1]);

    // Status bar
    let bar = status_bar(&app.status);
    f.render_widget(bar, chunks[2]);

    // Help overlay
    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  1-3          Switch to screen"),
        Line::from("  ←/→          Previous/next screen"),
        Line::from("  x            Clear alerts"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
        Line::from(""),
        Line::from("Screen-specific:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  Enter        Edit field / view historical report"),
        Line::from("  Tab          Next input field"),
        Line::from("  g / F5       Generate report"),
        Line::from("  ↑/↓          Navigate lists / scroll report"),
        Line::from("  e            Export as text + PDF"),
        Line::from("  c            Clear historical view"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help — press any key to close ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use salesinsights_shared::{Alert, Report, SalesInsightsError};

    use super::*;

    fn offline_app() -> App {
        App::new(Err("no keys".into()), std::env::temp_dir())
    }

    #[test]
    fn config_load_error_is_shown() {
        let app = App::from_config(Err(SalesInsightsError::config("invalid TOML at line 3")));
        assert!(app.status.contains("invalid TOML at line 3"));
        assert!(app.backend.is_err());
    }

    #[test]
    fn clear_alerts_keeps_history() {
        let mut app = offline_app();
        let report = Report::new("Acme", "Widget", "body".into());
        let id = report.id;
        app.session.push_report(report);
        app.session.extend_alerts([Alert::new("Acme", "merger", "merger news")]);
        app.apply(Action::SelectReport(id));

        handle_key(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);

        assert!(app.session.alerts().is_empty());
        assert_eq!(app.session.reports().len(), 1);
        assert_eq!(app.session.selected_report().map(|r| r.id), Some(id));
    }

    #[test]
    fn clear_historical_view_keeps_alerts() {
        let mut app = offline_app();
        let report = Report::new("Acme", "Widget", "body".into());
        let id = report.id;
        app.session.push_report(report);
        app.session.extend_alerts([Alert::new("Acme", "funding", "funding round")]);
        app.apply(Action::SelectReport(id));

        app.apply(Action::ClearHistoricalView);

        assert!(app.session.selected_report().is_none());
        assert_eq!(app.session.alerts().len(), 1);
        assert_eq!(app.session.reports().len(), 1);
    }

    #[test]
    fn generate_without_backend_does_not_queue() {
        let mut app = offline_app();
        app.apply(Action::Generate(ReportRequest::new("Acme", "acme.com", "Widget", "")));
        assert!(app.pending.is_none());
    }

    #[test]
    fn generate_with_missing_url_is_rejected() {
        let mut app = offline_app();
        app.apply(Action::Generate(ReportRequest::new("Acme", "", "", "")));
        assert!(app.pending.is_none());
    }

    #[test]
    fn export_writes_both_files() {
        let dir = std::env::temp_dir().join(format!("si_tui_{}", ReportId::new()));
        let mut app = App::new(Err("offline".into()), dir.clone());
        let report = Report::new("Acme Corp", "Widget", "## Executive Summary\nGood.".into());
        let id = report.id;
        app.session.push_report(report);

        app.apply(Action::Export(id));

        assert!(dir.join("sales_report_Acme_Corp.txt").exists());
        assert!(dir.join("sales_report_Acme_Corp.pdf").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
