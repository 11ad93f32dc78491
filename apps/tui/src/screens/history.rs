//! "History" screen — recent reports and the selected historical report.

use chrono::Local;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use salesinsights_core::session::{RECENT_LIMIT, SessionHistory};

use super::Action;

pub(crate) struct HistoryScreen {
    /// Index into the newest-first recent report list.
    cursor: usize,
}

impl HistoryScreen {
    pub(crate) fn new() -> Self {
        Self { cursor: 0 }
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, session: &SessionHistory) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .margin(1)
            .constraints([
                Constraint::Length(30), // Report list
                Constraint::Min(1),     // Historical report
            ])
            .split(area);

        let recent = session.recent_reports(RECENT_LIMIT);
        let items: Vec<ListItem> = recent
            .iter()
            .enumerate()
            .map(|(i, report)| {
                let style = if i == self.cursor {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let prefix = if i == self.cursor { "▸ " } else { "  " };
                let stamp = report.timestamp.with_timezone(&Local).format("%m/%d %H:%M");
                ListItem::new(format!("{prefix}{} - {stamp}", report.company)).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Report History "),
        );
        f.render_widget(list, chunks[0]);

        let body = match session.selected_report() {
            Some(report) => format!(
                "**Company:** {}\n**Generated:** {}\n\n{}",
                report.company,
                report.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                report.content
            ),
            None if recent.is_empty() => "No reports generated yet".to_string(),
            None => "Enter to view · c to clear the historical view · e export".to_string(),
        };
        let preview = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Historical Report "),
            );
        f.render_widget(preview, chunks[1]);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
        session: &SessionHistory,
    ) -> Option<Action> {
        let recent = session.recent_reports(RECENT_LIMIT);
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < recent.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => {
                return recent.get(self.cursor).map(|r| Action::SelectReport(r.id));
            }
            KeyCode::Char('c') => return Some(Action::ClearHistoricalView),
            KeyCode::Char('e') => {
                return session.selected_report().map(|r| Action::Export(r.id));
            }
            _ => {}
        }
        None
    }
}
