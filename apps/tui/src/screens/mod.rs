//! TUI screen definitions.
//!
//! Each screen corresponds to a tab in the TUI and encapsulates its
//! own state and rendering logic. Screens never touch the session
//! directly; they return an [`Action`] for the app to apply.

mod generate;
mod history;
mod report;

use std::fmt;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use salesinsights_core::session::SessionHistory;
use salesinsights_shared::{ReportId, ReportRequest};

pub(crate) use generate::GenerateScreen;
pub(crate) use history::HistoryScreen;
pub(crate) use report::ReportScreen;

/// Screen identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    Generate,
    Report,
    History,
}

impl ScreenId {
    pub(crate) const ALL: [ScreenId; 3] = [ScreenId::Generate, ScreenId::Report, ScreenId::History];
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate => write!(f, "Generate"),
            Self::Report => write!(f, "Report"),
            Self::History => write!(f, "History"),
        }
    }
}

/// Something a screen asks the app to do.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    Generate(ReportRequest),
    SelectReport(ReportId),
    ClearHistoricalView,
    ClearAlerts,
    Export(ReportId),
}

/// State of every screen.
pub(crate) struct Screens {
    pub generate: GenerateScreen,
    pub report: ReportScreen,
    pub history: HistoryScreen,
}

impl Screens {
    pub(crate) fn new() -> Self {
        Self {
            generate: GenerateScreen::new(),
            report: ReportScreen::new(),
            history: HistoryScreen::new(),
        }
    }

    /// Whether the given screen has an active text input field.
    pub(crate) fn is_editing(&self, id: ScreenId) -> bool {
        match id {
            ScreenId::Generate => self.generate.is_editing(),
            _ => false,
        }
    }

    pub(crate) fn draw(&self, id: ScreenId, f: &mut Frame, area: Rect, session: &SessionHistory) {
        match id {
            ScreenId::Generate => self.generate.draw(f, area),
            ScreenId::Report => self.report.draw(f, area),
            ScreenId::History => self.history.draw(f, area, session),
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        id: ScreenId,
        code: KeyCode,
        modifiers: KeyModifiers,
        session: &SessionHistory,
    ) -> Option<Action> {
        match id {
            ScreenId::Generate => self.generate.handle_key(code, modifiers),
            ScreenId::Report => self.report.handle_key(code, modifiers),
            ScreenId::History => self.history.handle_key(code, modifiers, session),
        }
    }
}
