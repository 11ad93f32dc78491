//! Multi-query web search for sales research.
//!
//! A report is grounded in five targeted searches derived from the company
//! and product names. Queries run one after another with a short pause in
//! between; a failing query is skipped with a warning and never aborts the
//! batch.

mod tavily;

use std::future::Future;
use std::time::Duration;

use salesinsights_shared::{Result, SearchPayload, SearchResult};
use tracing::{debug, info, instrument, warn};

pub use tavily::TavilyClient;

/// Number of characters of a failed query echoed back in its warning.
const WARNING_QUERY_PREVIEW: usize = 50;

// ---------------------------------------------------------------------------
// SearchService
// ---------------------------------------------------------------------------

/// A web search backend: one query in, one record or a sequence out.
pub trait SearchService {
    fn invoke(&self, query: &str) -> impl Future<Output = Result<SearchPayload>> + Send;
}

impl<S: SearchService + Sync> SearchService for &S {
    fn invoke(&self, query: &str) -> impl Future<Output = Result<SearchPayload>> + Send {
        (**self).invoke(query)
    }
}

// ---------------------------------------------------------------------------
// Query construction
// ---------------------------------------------------------------------------

/// Build the five research queries, in fixed order.
///
/// The company URL is deliberately not part of any query.
pub fn build_queries(company_name: &str, product_name: &str) -> [String; 5] {
    [
        format!("{company_name} recent news business strategy"),
        format!("\"{company_name}\" competitors partnerships {product_name}"),
        format!("\"{company_name}\" funding acquisition merger 2024 2025"),
        format!("\"{company_name}\" leadership team executives"),
        format!("{product_name} market trends competitive landscape"),
    ]
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// A query that failed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWarning {
    pub query: String,
    pub error: String,
}

impl std::fmt::Display for SearchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview: String = self.query.chars().take(WARNING_QUERY_PREVIEW).collect();
        write!(f, "Search query failed: {preview}... Error: {}", self.error)
    }
}

/// Results of all successful queries plus a warning per failed one.
#[derive(Debug, Clone, Default)]
pub struct AggregatedResults {
    /// Query order, then intra-query order. Duplicates are kept.
    pub results: Vec<SearchResult>,
    pub warnings: Vec<SearchWarning>,
}

impl AggregatedResults {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Runs the fixed query set against a [`SearchService`] and concatenates
/// whatever comes back.
pub struct MultiQuerySearchAggregator<S> {
    service: S,
    pause: Duration,
}

impl<S: SearchService> MultiQuerySearchAggregator<S> {
    pub fn new(service: S, pause: Duration) -> Self {
        Self { service, pause }
    }

    /// Run all five queries sequentially.
    ///
    /// `company_url` is accepted for interface symmetry with the report
    /// request but does not influence the queries.
    #[instrument(skip_all, fields(company = %company_name, product = %product_name))]
    pub async fn search(
        &self,
        company_name: &str,
        _company_url: &str,
        product_name: &str,
    ) -> AggregatedResults {
        let mut aggregated = AggregatedResults::default();

        for (i, query) in build_queries(company_name, product_name).iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            info!(%query, "searching");
            match self.service.invoke(query).await {
                Ok(payload) => {
                    let before = aggregated.results.len();
                    aggregated
                        .results
                        .extend(payload.into_results().into_iter().filter(|r| !r.is_empty()));
                    if aggregated.results.len() == before {
                        debug!(%query, "no results");
                    }
                }
                Err(e) => {
                    warn!(%query, error = %e, "search query failed, skipping");
                    aggregated.warnings.push(SearchWarning {
                        query: query.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            total = aggregated.results.len(),
            failed = aggregated.warnings.len(),
            "search complete"
        );
        aggregated
    }
}
