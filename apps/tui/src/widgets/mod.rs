//! Reusable TUI widgets.

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use salesinsights_core::session::{RECENT_LIMIT, SessionHistory};

/// Bottom status bar.
pub(crate) fn status_bar(msg: &str) -> Paragraph<'_> {
    Paragraph::new(format!(" {msg}")).style(Style::default().bg(Color::DarkGray).fg(Color::White))
}

/// Sidebar panel with the most recent alerts, newest first.
pub(crate) fn alerts_panel(session: &SessionHistory) -> List<'static> {
    let recent = session.recent_alerts(RECENT_LIMIT);
    let items: Vec<ListItem<'static>> = if recent.is_empty() {
        vec![ListItem::new("No alerts yet").style(Style::default().fg(Color::DarkGray))]
    } else {
        recent
            .iter()
            .map(|alert| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            alert.company.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!(": {} detected", alert.keyword)),
                    ])
                    .style(Style::default().fg(Color::Yellow)),
                    Line::from(
                        alert
                            .timestamp
                            .with_timezone(&Local)
                            .format("%Y-%m-%d %H:%M")
                            .to_string(),
                    )
                    .style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect()
    };

    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recent Alerts (x to clear) "),
    )
}

/// Sidebar panel with the most recent reports, newest first.
pub(crate) fn history_panel(session: &SessionHistory) -> List<'static> {
    let selected = session.selected_report().map(|r| r.id);
    let recent = session.recent_reports(RECENT_LIMIT);
    let items: Vec<ListItem<'static>> = if recent.is_empty() {
        vec![ListItem::new("No reports generated yet").style(Style::default().fg(Color::DarkGray))]
    } else {
        recent
            .iter()
            .map(|report| {
                let style = if Some(report.id) == selected {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!(
                    "{} - {}",
                    report.company,
                    report.timestamp.with_timezone(&Local).format("%m/%d %H:%M")
                ))
                .style(style)
            })
            .collect()
    };

    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Report History "),
    )
}
