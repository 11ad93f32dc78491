//! End-to-end `generate` pipeline: request → search → alerts → report → history.

use std::time::Instant;

use salesinsights_search::{SearchService, SearchWarning};
use salesinsights_shared::{Report, ReportRequest, Result};
use tracing::{info, instrument};

use crate::alerts::KeywordAlertScanner;
use crate::composer::{Composed, ReportComposer};
use crate::llm::TextGenerator;
use crate::session::SessionHistory;

/// Final outcome of one generation attempt.
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    /// A report was generated and appended to history.
    Generated(Report),
    /// Search found nothing; carries the user-facing message.
    NoResults(String),
    /// Generation failed; carries the user-facing error message.
    Failed(String),
}

impl ReportOutcome {
    /// Text to display: the report content or the message.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Generated(report) => &report.content,
            Self::NoResults(msg) | Self::Failed(msg) => msg,
        }
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Generated(report) => Some(report),
            _ => None,
        }
    }
}

/// Result of [`generate_report`].
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub outcome: ReportOutcome,
    /// Non-fatal per-query search failures.
    pub warnings: Vec<SearchWarning>,
    /// Number of alerts appended to the session by this run.
    pub new_alerts: usize,
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Run the full `generate` pipeline.
///
/// 1. Validate the request
/// 2. Search and compose (generation is skipped when search is empty)
/// 3. Scan results for alerts and append them to the session
/// 4. Append the report to history on success
///
/// Only request validation returns `Err`; every later failure is reported
/// through [`ReportOutcome`].
#[instrument(skip_all, fields(company = %request.company_name))]
pub async fn generate_report<S, G>(
    composer: &ReportComposer<S, G>,
    request: &ReportRequest,
    session: &mut SessionHistory,
    progress: &dyn ProgressReporter,
) -> Result<GenerateResult>
where
    S: SearchService,
    G: TextGenerator,
{
    request.validate()?;
    let start = Instant::now();

    info!(company = %request.company_name, product = %request.product_name, "generating report");

    progress.phase("Searching for company information");
    let composition = composer.compose(request).await;

    progress.phase("Scanning for alerts");
    let alerts = KeywordAlertScanner.scan(&composition.results, &request.company_name);
    let new_alerts = alerts.len();
    session.extend_alerts(alerts);

    let outcome = match composition.composed {
        Composed::Report(content) => {
            let report = Report::new(&request.company_name, &request.product_name, content);
            session.push_report(report.clone());
            ReportOutcome::Generated(report)
        }
        other @ Composed::NoResults => ReportOutcome::NoResults(other.message()),
        other @ Composed::Failed(_) => ReportOutcome::Failed(other.message()),
    };

    let result = GenerateResult {
        outcome,
        warnings: composition.warnings,
        new_alerts,
        elapsed: start.elapsed(),
    };

    info!(
        new_alerts,
        warnings = result.warnings.len(),
        generated = result.outcome.report().is_some(),
        "pipeline complete"
    );
    progress.done(&result);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use salesinsights_shared::SearchResult;

    use super::*;
    use crate::composer::tests::{RecordingGenerator, StaticSearch, composer};

    #[tokio::test]
    async fn end_to_end_generates_report_and_alerts() {
        let search = StaticSearch::returning(vec![SearchResult::text(
            "Acme closes Series B funding to scale Widget",
        )]);
        let generator = RecordingGenerator::replying("## Executive Summary\nGood fit.");
        let composer = composer(&search, &generator);
        let mut session = SessionHistory::new();
        let request = ReportRequest::new("Acme", "acme.com", "Widget", "Beta Corp");

        let result = generate_report(&composer, &request, &mut session, &SilentProgress)
            .await
            .unwrap();

        let queries = search.queries.lock().unwrap().clone();
        assert_eq!(queries.len(), 5);
        assert!(queries.iter().any(|q| q.contains("Acme")));
        assert!(queries.iter().any(|q| q.contains("Widget")));

        assert!(
            session
                .alerts()
                .iter()
                .any(|a| a.keyword == "funding" && a.company == "Acme")
        );
        // One matching result per query.
        assert_eq!(result.new_alerts, 5);

        let report = result.outcome.report().expect("report generated");
        assert_eq!(report.company, "Acme");
        assert_eq!(report.product, "Widget");
        assert_eq!(session.reports().len(), 1);
        assert_eq!(session.reports()[0].id, report.id);
    }

    #[tokio::test]
    async fn no_results_adds_nothing_to_history() {
        let search = StaticSearch::failing();
        let generator = RecordingGenerator::replying("unused");
        let composer = composer(&search, &generator);
        let mut session = SessionHistory::new();
        let request = ReportRequest::new("Acme", "acme.com", "Widget", "");

        let result = generate_report(&composer, &request, &mut session, &SilentProgress)
            .await
            .unwrap();

        assert!(matches!(result.outcome, ReportOutcome::NoResults(_)));
        assert_eq!(result.warnings.len(), 5);
        assert!(session.reports().is_empty());
        assert!(session.alerts().is_empty());
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn generation_failure_keeps_alerts_but_not_report() {
        let search = StaticSearch::returning(vec![SearchResult::text("merger rumours")]);
        let generator = RecordingGenerator::failing("timeout");
        let composer = composer(&search, &generator);
        let mut session = SessionHistory::new();
        let request = ReportRequest::new("Acme", "acme.com", "", "");

        let result = generate_report(&composer, &request, &mut session, &SilentProgress)
            .await
            .unwrap();

        match &result.outcome {
            ReportOutcome::Failed(msg) => assert!(msg.contains("timeout")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(session.reports().is_empty());
        assert_eq!(session.alerts().len(), 5);
    }

    #[tokio::test]
    async fn invalid_request_runs_nothing() {
        let search = StaticSearch::returning(vec![SearchResult::text("x")]);
        let generator = RecordingGenerator::replying("unused");
        let composer = composer(&search, &generator);
        let mut session = SessionHistory::new();
        let request = ReportRequest::new("Acme", "", "Widget", "");

        let err = generate_report(&composer, &request, &mut session, &SilentProgress)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("company name and URL"));
        assert!(search.queries.lock().unwrap().is_empty());
    }
}
