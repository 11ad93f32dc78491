//! "Report" screen — the most recently generated report.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use salesinsights_core::pipeline::ReportOutcome;

use super::Action;

pub(crate) struct ReportScreen {
    outcome: Option<ReportOutcome>,
    scroll: u16,
}

impl ReportScreen {
    pub(crate) fn new() -> Self {
        Self {
            outcome: None,
            scroll: 0,
        }
    }

    pub(crate) fn show(&mut self, outcome: ReportOutcome) {
        self.outcome = Some(outcome);
        self.scroll = 0;
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(1),    // Report body
                Constraint::Length(1), // Hint
            ])
            .split(area);

        let (title, body) = match &self.outcome {
            Some(ReportOutcome::Generated(report)) => (
                format!(" Sales Insights Report - {} ", report.company),
                report.content.as_str(),
            ),
            Some(other) => (" Sales Insights Report ".to_string(), other.display_text()),
            None => (
                " Sales Insights Report ".to_string(),
                "No report yet. Use the Generate tab to create one.",
            ),
        };

        let report = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(report, chunks[0]);

        let hint = Paragraph::new("↑/↓ scroll · e export as text + PDF")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint, chunks[1]);
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> Option<Action> {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::Char('e') => {
                if let Some(ReportOutcome::Generated(report)) = &self.outcome {
                    return Some(Action::Export(report.id));
                }
            }
            _ => {}
        }
        None
    }
}
