//! Tavily web search client.

use std::time::Duration;

use reqwest::Client;
use salesinsights_shared::{Result, SalesInsightsError, SearchConfig, SearchPayload, SearchResult};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::SearchService;

/// Default timeout in seconds for a single search request.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("SalesInsights/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    topic: &'a str,
    max_results: u32,
}

/// HTTP client for the Tavily search API.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    topic: String,
    max_results: u32,
}

impl TavilyClient {
    /// Create a client from the `[search]` config and an explicit API key.
    pub fn new(config: &SearchConfig, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            SalesInsightsError::config(format!("invalid search endpoint '{}': {e}", config.endpoint))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SalesInsightsError::Search(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            topic: config.topic.clone(),
            max_results: config.max_results,
        })
    }

    /// Create a client reading the API key from the env var named in config.
    pub fn from_env(config: &SearchConfig) -> Result<Self> {
        let key = std::env::var(&config.api_key_env).map_err(|_| {
            SalesInsightsError::config(format!(
                "Search API key not found. Set the {} environment variable.",
                config.api_key_env
            ))
        })?;
        Self::new(config, key)
    }
}

impl SearchService for TavilyClient {
    async fn invoke(&self, query: &str) -> Result<SearchPayload> {
        let body = TavilySearchRequest {
            query,
            topic: &self.topic,
            max_results: self.max_results,
        };

        let resp = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SalesInsightsError::Search(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SalesInsightsError::Search(format!("HTTP {status}: {text}")));
        }

        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SalesInsightsError::Search(format!("invalid response body: {e}")))?;

        Ok(into_payload(value))
    }
}

/// A body with a `results` array yields one record per element; any other
/// body is kept whole as a single record.
fn into_payload(value: serde_json::Value) -> SearchPayload {
    match value {
        serde_json::Value::Object(mut map) => match map.remove("results") {
            Some(serde_json::Value::Array(items)) => {
                debug!(count = items.len(), "search returned result list");
                SearchPayload::Many(items.into_iter().map(SearchResult).collect())
            }
            Some(other) => {
                map.insert("results".into(), other);
                SearchPayload::Single(SearchResult(serde_json::Value::Object(map)))
            }
            None => SearchPayload::Single(SearchResult(serde_json::Value::Object(map))),
        },
        serde_json::Value::Array(items) => {
            SearchPayload::Many(items.into_iter().map(SearchResult).collect())
        }
        other => SearchPayload::Single(SearchResult(other)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config_for(server: &MockServer) -> SearchConfig {
        SearchConfig {
            endpoint: format!("{}/search", server.uri()),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn results_array_becomes_many() {
        let payload = into_payload(json!({
            "query": "acme",
            "results": [{"title": "a"}, {"title": "b"}]
        }));
        match payload {
            SearchPayload::Many(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].0["title"], "b");
            }
            SearchPayload::Single(_) => panic!("expected Many"),
        }
    }

    #[test]
    fn object_without_results_becomes_single() {
        let payload = into_payload(json!({"answer": "nothing to list"}));
        assert!(matches!(payload, SearchPayload::Single(_)));

        let payload = into_payload(json!("plain string"));
        assert_eq!(payload, SearchPayload::Single(SearchResult::text("plain string")));
    }

    #[tokio::test]
    async fn sends_topic_cap_and_bearer_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "query": "Acme recent news business strategy",
                "topic": "general",
                "max_results": 4
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"title": "Acme raises funding", "url": "https://news.example/acme", "content": "..."}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TavilyClient::new(&config_for(&server), "test-key").unwrap();
        let payload = client
            .invoke("Acme recent news business strategy")
            .await
            .unwrap();

        let results = payload.into_results();
        assert_eq!(results.len(), 1);
        assert!(results[0].raw().contains("Acme raises funding"));
    }

    #[tokio::test]
    async fn error_status_is_search_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = TavilyClient::new(&config_for(&server), "k").unwrap();
        let err = client.invoke("anything").await.unwrap_err();
        assert!(matches!(err, SalesInsightsError::Search(_)));
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn invalid_endpoint_is_config_error() {
        let config = SearchConfig {
            endpoint: "not a url".into(),
            ..SearchConfig::default()
        };
        let err = TavilyClient::new(&config, "k").unwrap_err();
        assert!(matches!(err, SalesInsightsError::Config { .. }));
    }
}
