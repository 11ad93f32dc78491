//! Core domain types for Sales Insights reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SalesInsightsError};

/// Maximum number of characters of a search result kept in an alert snippet.
pub const SNIPPET_MAX_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// ReportId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for report identifiers (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub Uuid);

impl ReportId {
    /// Generate a new time-sortable report identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// One opaque record returned by the search service.
///
/// The record is only ever treated as text: scanned for keywords and
/// serialized into the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResult(pub serde_json::Value);

impl SearchResult {
    /// Wrap a plain string result.
    pub fn text(s: impl Into<String>) -> Self {
        Self(serde_json::Value::String(s.into()))
    }

    /// Whether the record carries nothing: `null`, `""`, `{}` or `[]`.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.is_empty(),
            serde_json::Value::Array(a) => a.is_empty(),
            serde_json::Value::Object(o) => o.is_empty(),
            _ => false,
        }
    }

    /// Textual form of the record. Strings are returned as-is, anything
    /// else as compact JSON.
    pub fn raw(&self) -> String {
        match &self.0 {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// What a single search invocation returns: one record or a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPayload {
    Single(SearchResult),
    Many(Vec<SearchResult>),
}

impl SearchPayload {
    /// Flatten into an ordered sequence; a single record becomes a
    /// one-element sequence.
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            Self::Single(result) => vec![result],
            Self::Many(results) => results,
        }
    }
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// A business-event keyword detected in a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub company: String,
    pub keyword: String,
    pub timestamp: DateTime<Utc>,
    /// First [`SNIPPET_MAX_CHARS`] characters of the result, followed by `...`.
    pub snippet: String,
}

impl Alert {
    pub fn new(company: &str, keyword: &str, raw: &str) -> Self {
        let mut snippet: String = raw.chars().take(SNIPPET_MAX_CHARS).collect();
        snippet.push_str("...");
        Self {
            company: company.to_string(),
            keyword: keyword.to_string(),
            timestamp: Utc::now(),
            snippet,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A generated sales-intelligence report for one company/product pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub company: String,
    pub product: String,
    /// Markdown-structured report text, verbatim from the model.
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Report {
    pub fn new(company: &str, product: &str, content: String) -> Self {
        Self {
            id: ReportId::new(),
            company: company.to_string(),
            product: product.to_string(),
            content,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReportRequest
// ---------------------------------------------------------------------------

/// User input for one report generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub company_name: String,
    pub company_url: String,
    pub product_name: String,
    pub competitors: String,
}

impl ReportRequest {
    pub fn new(
        company_name: impl Into<String>,
        company_url: impl Into<String>,
        product_name: impl Into<String>,
        competitors: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            company_url: company_url.into(),
            product_name: product_name.into(),
            competitors: competitors.into(),
        }
    }

    /// Both company name and company URL are required. Product and
    /// competitors may be empty.
    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() || self.company_url.trim().is_empty() {
            return Err(SalesInsightsError::validation(
                "please enter both company name and URL to generate a report",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_id_display_roundtrip() {
        let id = ReportId::new();
        let s = id.to_string();
        assert_eq!(ReportId(Uuid::parse_str(&s).unwrap()), id);
    }

    #[test]
    fn single_payload_flattens_to_one_element() {
        let payload = SearchPayload::Single(SearchResult::text("only"));
        assert_eq!(payload.into_results(), vec![SearchResult::text("only")]);
    }

    #[test]
    fn raw_keeps_strings_verbatim_and_serializes_objects() {
        assert_eq!(SearchResult::text("plain text").raw(), "plain text");
        let obj = SearchResult(serde_json::json!({"title": "Acme"}));
        assert_eq!(obj.raw(), r#"{"title":"Acme"}"#);
    }

    #[test]
    fn alert_snippet_is_truncated_with_ellipsis() {
        let long = "x".repeat(500);
        let alert = Alert::new("Acme", "merger", &long);
        assert_eq!(alert.snippet.chars().count(), SNIPPET_MAX_CHARS + 3);
        assert!(alert.snippet.ends_with("..."));

        let short = Alert::new("Acme", "merger", "merger talk");
        assert_eq!(short.snippet, "merger talk...");
    }

    #[test]
    fn snippet_truncation_counts_chars_not_bytes() {
        let text = "é".repeat(300);
        let alert = Alert::new("Acme", "funding", &text);
        assert_eq!(alert.snippet.chars().count(), SNIPPET_MAX_CHARS + 3);
    }

    #[test]
    fn request_requires_company_and_url() {
        let ok = ReportRequest::new("Acme", "acme.com", "Widget", "Beta Corp");
        assert!(ok.validate().is_ok());

        let no_url = ReportRequest::new("Acme", "  ", "Widget", "");
        assert!(no_url.validate().is_err());

        let no_name = ReportRequest::new("", "acme.com", "", "");
        assert!(no_name.validate().is_err());
    }

    #[test]
    fn free_form_url_is_accepted() {
        let req = ReportRequest::new("Acme", "Acme Inc site", "", "");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_records_are_detected() {
        assert!(SearchResult(serde_json::Value::Null).is_empty());
        assert!(SearchResult::text("").is_empty());
        assert!(SearchResult(serde_json::json!({})).is_empty());
        assert!(SearchResult(serde_json::json!([])).is_empty());
        assert!(!SearchResult::text("news").is_empty());
        assert!(!SearchResult(serde_json::json!(0)).is_empty());
    }
}
