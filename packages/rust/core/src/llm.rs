//! Text-generation client.
//!
//! Reports are generated through an OpenAI-compatible chat completions
//! endpoint (Groq by default). The model is fixed by configuration.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use salesinsights_shared::{LlmConfig, Result, SalesInsightsError};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use url::Url;

/// User-Agent string for generation requests.
const USER_AGENT: &str = concat!("SalesInsights/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TextGenerator
// ---------------------------------------------------------------------------

/// A text-generation backend: messages in, reply text out.
pub trait TextGenerator {
    fn generate(&self, messages: &[ChatMessage]) -> impl Future<Output = Result<String>> + Send;
}

impl<G: TextGenerator + Sync> TextGenerator for &G {
    fn generate(&self, messages: &[ChatMessage]) -> impl Future<Output = Result<String>> + Send {
        (**self).generate(messages)
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible chat client
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client for Groq's OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct GroqChatClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GroqChatClient {
    /// Create a client from the `[llm]` config and an explicit API key.
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let base = config.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/chat/completions")).map_err(|e| {
            SalesInsightsError::config(format!("invalid llm base_url '{}': {e}", config.base_url))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SalesInsightsError::Generation(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model: config.model.clone(),
        })
    }

    /// Create a client reading the API key from the env var named in config.
    pub fn from_env(config: &LlmConfig) -> Result<Self> {
        let key = std::env::var(&config.api_key_env).map_err(|_| {
            SalesInsightsError::config(format!(
                "Text-generation API key not found. Set the {} environment variable.",
                config.api_key_env
            ))
        })?;
        Self::new(config, key)
    }
}

impl TextGenerator for GroqChatClient {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
        };

        info!("sending request to LLM");
        let resp = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SalesInsightsError::Generation(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SalesInsightsError::Generation(format!(
                "HTTP {status}: {text}"
            )));
        }

        let data: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| SalesInsightsError::Generation(format!("invalid response body: {e}")))?;

        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SalesInsightsError::Generation("response contained no content".into()))?;

        info!(chars = content.chars().count(), "model response received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config_for(server: &MockServer) -> LlmConfig {
        LlmConfig {
            base_url: format!("{}/openai/v1/", server.uri()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn roles_serialize_lowercase() {
        let msg = ChatMessage::system("be helpful");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v, json!({"role": "system", "content": "be helpful"}));
    }

    #[tokio::test]
    async fn posts_model_and_messages() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("authorization", "Bearer groq-key"))
            .and(body_partial_json(json!({
                "model": "openai/gpt-oss-20b",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "usr"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "## Executive Summary\nok"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GroqChatClient::new(&config_for(&server), "groq-key").unwrap();
        let out = client
            .generate(&[ChatMessage::system("sys"), ChatMessage::user("usr")])
            .await
            .unwrap();
        assert_eq!(out, "## Executive Summary\nok");
    }

    #[tokio::test]
    async fn error_status_is_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = GroqChatClient::new(&config_for(&server), "k").unwrap();
        let err = client.generate(&[ChatMessage::user("x")]).await.unwrap_err();
        assert!(matches!(err, SalesInsightsError::Generation(_)));
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn empty_choices_is_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = GroqChatClient::new(&config_for(&server), "k").unwrap();
        let err = client.generate(&[ChatMessage::user("x")]).await.unwrap_err();
        assert!(err.to_string().contains("no content"));
    }
}
