//! "Generate" screen — company/product inputs and the generate action.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use salesinsights_shared::ReportRequest;

use super::Action;

/// Which input field is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Company,
    Url,
    Product,
    Competitors,
}

impl Field {
    const ALL: [Field; 4] = [Field::Company, Field::Url, Field::Product, Field::Competitors];

    fn title(self) -> &'static str {
        match self {
            Self::Company => " Company Name ",
            Self::Url => " Company URL ",
            Self::Product => " Product Name ",
            Self::Competitors => " Company Competitors ",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::Company => "e.g., Microsoft, Apple, Tesla",
            Self::Url => "e.g., microsoft.com",
            Self::Product => "e.g., Office 365, CRM Software",
            Self::Competitors => "e.g., Salesforce, HubSpot",
        }
    }
}

pub(crate) struct GenerateScreen {
    company: String,
    url: String,
    product: String,
    competitors: String,
    focused: Field,
    editing: bool,
    status: String,
}

impl GenerateScreen {
    pub(crate) fn new() -> Self {
        Self {
            company: String::new(),
            url: String::new(),
            product: String::new(),
            competitors: String::new(),
            focused: Field::Company,
            editing: false,
            status: "Fill in the company details and press g to generate a report.".to_string(),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub(crate) fn request(&self) -> ReportRequest {
        ReportRequest::new(
            self.company.trim(),
            self.url.trim(),
            self.product.trim(),
            self.competitors.trim(),
        )
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Company / URL
                Constraint::Length(3), // Product / Competitors
                Constraint::Length(3), // Generate button
                Constraint::Length(1), // Action hint
                Constraint::Min(1),    // Status
            ])
            .split(area);

        for (row, pair) in Field::ALL.chunks(2).enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[row]);
            for (col, field) in pair.iter().enumerate() {
                f.render_widget(self.field_widget(*field), cols[col]);
            }
        }

        let button = Paragraph::new(" Generate Report ")
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(button, chunks[2]);

        let hint = if self.editing {
            "Type to edit · Esc to stop editing · Tab to next field"
        } else {
            "Enter to edit · Tab to next field · g to generate"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[3]);

        let status_block = Block::default().borders(Borders::ALL).title(" Status ");
        let status_text = Paragraph::new(self.status.as_str())
            .wrap(Wrap { trim: false })
            .block(status_block);
        f.render_widget(status_text, chunks[4]);
    }

    fn field_widget(&self, field: Field) -> Paragraph<'_> {
        let style = if self.focused == field && self.editing {
            Style::default().fg(Color::Yellow)
        } else if self.focused == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(field.title())
            .border_style(style);

        let value = self.field(field);
        if value.is_empty() && !(self.editing && self.focused == field) {
            Paragraph::new(field.placeholder())
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
        } else {
            Paragraph::new(value).block(block)
        }
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        if self.editing {
            match code {
                KeyCode::Esc => {
                    self.editing = false;
                }
                KeyCode::Tab => {
                    self.editing = false;
                    self.next_field();
                }
                KeyCode::Enter => {
                    self.editing = false;
                }
                KeyCode::Backspace => {
                    self.current_field_mut().pop();
                }
                KeyCode::Char('g') if modifiers.contains(KeyModifiers::CONTROL) => {
                    self.editing = false;
                    return Some(Action::Generate(self.request()));
                }
                KeyCode::Char(c) => {
                    self.current_field_mut().push(c);
                }
                _ => {}
            }
        } else {
            match code {
                KeyCode::Enter => self.editing = true,
                KeyCode::Char('g') | KeyCode::F(5) => {
                    return Some(Action::Generate(self.request()));
                }
                KeyCode::Tab | KeyCode::Down => self.next_field(),
                KeyCode::BackTab | KeyCode::Up => self.prev_field(),
                _ => {}
            }
        }
        None
    }

    fn field(&self, field: Field) -> &str {
        match field {
            Field::Company => &self.company,
            Field::Url => &self.url,
            Field::Product => &self.product,
            Field::Competitors => &self.competitors,
        }
    }

    fn current_field_mut(&mut self) -> &mut String {
        match self.focused {
            Field::Company => &mut self.company,
            Field::Url => &mut self.url,
            Field::Product => &mut self.product,
            Field::Competitors => &mut self.competitors,
        }
    }

    fn next_field(&mut self) {
        self.focused = match self.focused {
            Field::Company => Field::Url,
            Field::Url => Field::Product,
            Field::Product => Field::Competitors,
            Field::Competitors => Field::Company,
        };
    }

    fn prev_field(&mut self) {
        self.focused = match self.focused {
            Field::Company => Field::Competitors,
            Field::Url => Field::Company,
            Field::Product => Field::Url,
            Field::Competitors => Field::Product,
        };
    }
}
