//! Business-event keyword scanning over search results.

use salesinsights_shared::{Alert, SearchResult};
use tracing::debug;

/// Keywords that mark a search result as a notable business event.
pub const ALERT_KEYWORDS: [&str; 7] = [
    "acquisition",
    "merger",
    "funding",
    "partnership",
    "expansion",
    "new product",
    "leadership change",
];

/// Case-insensitive substring scanner over a fixed keyword vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAlertScanner;

impl KeywordAlertScanner {
    /// One alert per (result, keyword) match, in result order then keyword
    /// order. Duplicate results yield duplicate alerts.
    pub fn scan(&self, results: &[SearchResult], company_name: &str) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for result in results {
            let raw = result.raw();
            let haystack = raw.to_lowercase();
            for keyword in ALERT_KEYWORDS {
                if haystack.contains(keyword) {
                    alerts.push(Alert::new(company_name, keyword, &raw));
                }
            }
        }

        debug!(results = results.len(), alerts = alerts.len(), "alert scan complete");
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_keyword_case_insensitively() {
        let results = vec![SearchResult::text("... a major ACQUISITION was announced ...")];
        let alerts = KeywordAlertScanner.scan(&results, "Acme");
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].keyword, "acquisition");
        assert_eq!(alerts[0].company, "Acme");
        assert!(alerts[0].snippet.starts_with("... a major ACQUISITION"));
    }

    #[test]
    fn no_keywords_no_alerts() {
        let results = vec![SearchResult::text("quarterly results were flat")];
        assert!(KeywordAlertScanner.scan(&results, "Acme").is_empty());
    }

    #[test]
    fn multiple_keywords_and_duplicates_are_not_deduplicated() {
        let r = SearchResult::text("Merger talks follow a new funding round and a new product launch");
        let alerts = KeywordAlertScanner.scan(&[r.clone(), r], "Acme");
        let keywords: Vec<&str> = alerts.iter().map(|a| a.keyword.as_str()).collect();
        assert_eq!(
            keywords,
            vec!["merger", "funding", "new product", "merger", "funding", "new product"]
        );
    }

    #[test]
    fn scans_structured_records_as_text() {
        let r = SearchResult(serde_json::json!({
            "title": "Acme announces Partnership",
            "url": "https://news.example/acme"
        }));
        let alerts = KeywordAlertScanner.scan(&[r], "Acme");
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].keyword, "partnership");
    }
}
