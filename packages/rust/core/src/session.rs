//! Process-lifetime alert and report history.
//!
//! Both lists are append-only. The only other mutations are clearing all
//! alerts and clearing the historical-report selection, and neither touches
//! the other list.

use salesinsights_shared::{Alert, Report, ReportId};

/// Number of entries shown in the alert and history panels.
pub const RECENT_LIMIT: usize = 5;

/// Alerts, generated reports, and the currently selected historical report.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    alerts: Vec<Alert>,
    reports: Vec<Report>,
    selected: Option<ReportId>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_alerts(&mut self, alerts: impl IntoIterator<Item = Alert>) {
        self.alerts.extend(alerts);
    }

    pub fn push_report(&mut self, report: Report) {
        self.reports.push(report);
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Up to `limit` alerts, newest timestamp first. Alerts sharing a
    /// timestamp keep the most recently appended first.
    pub fn recent_alerts(&self, limit: usize) -> Vec<&Alert> {
        let mut recent: Vec<&Alert> = self.alerts.iter().rev().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        recent
    }

    /// The last `limit` reports, newest first.
    pub fn recent_reports(&self, limit: usize) -> Vec<&Report> {
        self.reports.iter().rev().take(limit).collect()
    }

    /// Select a historical report for display. Returns `false` when the id
    /// is not in the history.
    pub fn select_report(&mut self, id: ReportId) -> bool {
        if self.reports.iter().any(|r| r.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn selected_report(&self) -> Option<&Report> {
        let id = self.selected?;
        self.reports.iter().find(|r| r.id == id)
    }

    /// Empty the alert list.
    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }

    /// Deselect the displayed historical report.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn report(company: &str) -> Report {
        Report::new(company, "Widget", format!("report for {company}"))
    }

    fn alert_at(keyword: &str, minutes_ago: i64) -> Alert {
        let mut a = Alert::new("Acme", keyword, "text");
        a.timestamp = Utc::now() - Duration::minutes(minutes_ago);
        a
    }

    #[test]
    fn recent_reports_are_newest_first_and_capped() {
        let mut s = SessionHistory::new();
        for i in 0..7 {
            s.push_report(report(&format!("Co{i}")));
        }
        let recent: Vec<&str> = s
            .recent_reports(RECENT_LIMIT)
            .iter()
            .map(|r| r.company.as_str())
            .collect();
        assert_eq!(recent, vec!["Co6", "Co5", "Co4", "Co3", "Co2"]);
    }

    #[test]
    fn recent_alerts_sorted_by_timestamp() {
        let mut s = SessionHistory::new();
        s.extend_alerts([alert_at("merger", 10), alert_at("funding", 1), alert_at("expansion", 5)]);
        let kws: Vec<&str> = s
            .recent_alerts(2)
            .iter()
            .map(|a| a.keyword.as_str())
            .collect();
        assert_eq!(kws, vec!["funding", "expansion"]);
    }

    #[test]
    fn clearing_alerts_leaves_history_and_selection() {
        let mut s = SessionHistory::new();
        let r = report("Acme");
        let id = r.id;
        s.push_report(r);
        s.extend_alerts([alert_at("merger", 0)]);
        assert!(s.select_report(id));

        s.clear_alerts();

        assert!(s.alerts().is_empty());
        assert_eq!(s.reports().len(), 1);
        assert_eq!(s.selected_report().map(|r| r.id), Some(id));
    }

    #[test]
    fn clearing_selection_leaves_alerts_and_history() {
        let mut s = SessionHistory::new();
        let r = report("Acme");
        let id = r.id;
        s.push_report(r);
        s.extend_alerts([alert_at("merger", 0), alert_at("funding", 0)]);
        s.select_report(id);

        s.clear_selection();

        assert!(s.selected_report().is_none());
        assert_eq!(s.alerts().len(), 2);
        assert_eq!(s.reports().len(), 1);
    }

    #[test]
    fn selecting_unknown_report_is_rejected() {
        let mut s = SessionHistory::new();
        s.push_report(report("Acme"));
        assert!(!s.select_report(ReportId::new()));
        assert!(s.selected_report().is_none());
    }
}
