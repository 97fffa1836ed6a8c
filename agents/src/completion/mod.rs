//! Client for the external text-completion service.
//!
//! The transport is abstracted behind [`CompletionBackend`], which moves raw JSON bodies. The
//! [`CompletionClient`] owns everything else: request encoding, per-attempt timeout, retry
//! with exponential backoff, response validation and classification into
//! [`AiIntegrationError`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use retry::*;

#[cfg(test)]
pub(crate) mod mock;
mod retry;
pub mod wire;

pub const DEFAULT_MODEL_ID: &str = "amazon.nova-lite-v1:0";

/// Failure reported by a transport before any body parsing happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error {code}: {message}")]
    Provider { code: String, message: String },
}

/// The completion service failed and the caller should degrade gracefully.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AiIntegrationError {
    message: String,
    #[source]
    cause: Option<BackendError>,
}

impl AiIntegrationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: BackendError) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause),
        }
    }

    pub fn cause(&self) -> Option<&BackendError> {
        self.cause.as_ref()
    }
}

/// Raw transport to a model endpoint. Implementations send `body` to `model_id` and return the
/// response body bytes unchanged.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, BackendError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub model_id: String,
    pub max_attempts: u32,
    pub timeout: Duration,
    pub base_delay: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.into(),
            max_attempts: 3,
            timeout: Duration::from_secs(60),
            base_delay: Duration::from_secs(1),
            max_tokens: 1000,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl CompletionConfig {
    /// Defaults overridden by `BLUFFSWEEPER_MODEL_ID`, `BLUFFSWEEPER_TIMEOUT_SECS` and
    /// `BLUFFSWEEPER_MAX_ATTEMPTS` when present and parseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(model_id) = lookup("BLUFFSWEEPER_MODEL_ID").filter(|v| !v.trim().is_empty()) {
            config.model_id = model_id.trim().into();
        }
        if let Some(secs) = lookup("BLUFFSWEEPER_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = lookup("BLUFFSWEEPER_MAX_ATTEMPTS")
            .and_then(|v| v.trim().parse().ok())
            .filter(|&n: &u32| n > 0)
        {
            config.max_attempts = attempts;
        }
        config
    }
}

/// Which agent is asking for a last-resort canned string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionContext {
    Advisor,
    Narrator,
}

#[derive(Clone)]
pub struct CompletionClient {
    backend: Arc<dyn CompletionBackend>,
    config: CompletionConfig,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: CompletionConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Sends one prompt and returns the model's text.
    pub async fn invoke(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, AiIntegrationError> {
        if prompt.trim().is_empty() {
            return Err(AiIntegrationError::new("Prompt cannot be empty"));
        }

        let request = wire::InvokeRequest {
            messages: [wire::RequestMessage {
                role: "user",
                content: [wire::TextBlock { text: prompt }],
            }],
            system: system_prompt.map(|text| [wire::TextBlock { text }]),
            inference_config: wire::InferenceConfig {
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| AiIntegrationError::new(format!("Failed to encode request: {e}")))?;

        let response = self
            .invoke_with_retries(body)
            .await
            .map_err(Self::classify_failure)?;

        if response.is_empty() {
            return Err(AiIntegrationError::new("Empty response from completion service"));
        }

        let parsed: wire::InvokeResponse = serde_json::from_slice(&response).map_err(|e| {
            AiIntegrationError::new(format!("Malformed response from completion service: {e}"))
        })?;

        parsed
            .into_text()
            .ok_or_else(|| AiIntegrationError::new("Invalid response format from completion service"))
    }

    /// Attempts a trivial completion.
    pub async fn health_check(&self) -> bool {
        match self
            .invoke("Test connection", Some("Respond with \"OK\" only."))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Completion service health check failed: {e}");
                false
            }
        }
    }

    /// Canned text for when the service is unavailable. Plain prose, not structured data.
    pub fn fallback_response(context: CompletionContext) -> &'static str {
        match context {
            CompletionContext::Advisor => {
                "This tile appears statistically safe based on standard probability analysis."
            }
            CompletionContext::Narrator => {
                "Analysis unavailable. The AI system encountered technical difficulties during post-game evaluation."
            }
        }
    }

    async fn invoke_with_retries(&self, body: Vec<u8>) -> Result<Vec<u8>, BackendError> {
        let max_attempts = self.config.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            let result = tokio::time::timeout(
                self.config.timeout,
                self.backend.invoke(&self.config.model_id, body.clone()),
            )
            .await
            .unwrap_or(Err(BackendError::Timeout));

            match result {
                Ok(response) => {
                    if attempt > 1 {
                        log::info!("Completion succeeded after {} attempts", attempt);
                    }
                    return Ok(response);
                }
                Err(e) if !e.is_retryable() => {
                    log::warn!("Completion failed with non-retryable error, not retrying: {e}");
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    log::warn!("Completion failed after {attempt} attempts: {e}");
                    return Err(e);
                }
                Err(e) => {
                    let delay = backoff_delay(self.config.base_delay, attempt);
                    log::debug!(
                        "Completion attempt {}/{} failed ({}), retrying in {:?}",
                        attempt,
                        max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn classify_failure(error: BackendError) -> AiIntegrationError {
        let message = match &error {
            BackendError::Timeout => "Completion request timed out".to_string(),
            BackendError::Network(_) => "Network error connecting to completion service".to_string(),
            BackendError::Provider { message, .. } => format!("Completion service error: {message}"),
        };
        AiIntegrationError::with_cause(message, error)
    }
}

#[cfg(test)]
mod tests {
    use super::mock::ScriptedBackend;
    use super::*;

    fn client(backend: &Arc<ScriptedBackend>) -> CompletionClient {
        CompletionClient::new(backend.clone(), ScriptedBackend::fast_config())
    }

    #[tokio::test]
    async fn returns_first_content_block_text() {
        let backend = Arc::new(ScriptedBackend::new().reply_text("Looks safe to me."));
        let text = client(&backend).invoke("tile 1,1?", Some("be bold")).await.unwrap();

        assert_eq!(text, "Looks safe to me.");
        assert_eq!(backend.calls(), 1);

        let request = backend.last_request().unwrap();
        assert_eq!(request["messages"][0]["role"], "user");
        assert_eq!(request["messages"][0]["content"][0]["text"], "tile 1,1?");
        assert_eq!(request["system"][0]["text"], "be bold");
        assert_eq!(request["inferenceConfig"]["maxTokens"], 1000);
    }

    #[tokio::test]
    async fn system_prompt_is_optional() {
        let backend = Arc::new(ScriptedBackend::new().reply_text("ok"));
        client(&backend).invoke("hello", None).await.unwrap();
        assert!(backend.last_request().unwrap().get("system").is_none());
    }

    #[tokio::test]
    async fn empty_prompt_fails_without_calling_backend() {
        let backend = Arc::new(ScriptedBackend::new());
        let err = client(&backend).invoke("   ", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Prompt cannot be empty");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn retries_transient_failures_then_succeeds() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .fail(BackendError::Network("reset".into()))
                .fail(BackendError::Timeout)
                .reply_text("third time lucky"),
        );
        let text = client(&backend).invoke("p", None).await.unwrap();
        assert_eq!(text, "third time lucky");
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let backend = Arc::new(ScriptedBackend::new());
        let err = client(&backend).invoke("p", None).await.unwrap_err();
        assert_eq!(backend.calls(), 3);
        assert!(matches!(err.cause(), Some(BackendError::Network(_))));
    }

    #[tokio::test]
    async fn non_retryable_codes_fail_fast() {
        let backend = Arc::new(ScriptedBackend::new().fail(BackendError::Provider {
            code: "AccessDeniedException".into(),
            message: "no".into(),
        }));
        let err = client(&backend).invoke("p", None).await.unwrap_err();
        assert_eq!(backend.calls(), 1);
        assert_eq!(err.to_string(), "Completion service error: no");
    }

    #[tokio::test]
    async fn rejects_empty_and_malformed_bodies() {
        let bodies: [&[u8]; 4] = [
            b"",
            b"not json",
            b"{}",
            br#"{"output":{"message":{"content":[]}}}"#,
        ];
        for raw in bodies {
            let backend = Arc::new(ScriptedBackend::new().reply_raw(raw.to_vec()));
            let result = client(&backend).invoke("p", None).await;
            assert!(result.is_err(), "{:?}", String::from_utf8_lossy(raw));
            assert_eq!(backend.calls(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_waits_one_then_two_seconds() {
        let backend = Arc::new(ScriptedBackend::new());
        let config = CompletionConfig {
            base_delay: Duration::from_secs(1),
            ..ScriptedBackend::fast_config()
        };
        let client = CompletionClient::new(backend.clone(), config);

        let started = tokio::time::Instant::now();
        client.invoke("p", None).await.unwrap_err();

        assert_eq!(backend.calls(), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() {
        let backend = Arc::new(ScriptedBackend::new().with_latency(Duration::from_secs(10)));
        let config = CompletionConfig {
            timeout: Duration::from_secs(2),
            max_attempts: 1,
            ..ScriptedBackend::fast_config()
        };
        let err = CompletionClient::new(backend, config)
            .invoke("p", None)
            .await
            .unwrap_err();
        assert_eq!(err.cause(), Some(&BackendError::Timeout));
        assert_eq!(err.to_string(), "Completion request timed out");
    }

    #[tokio::test]
    async fn health_check_reports_reachability() {
        let up = Arc::new(ScriptedBackend::new().reply_text("OK"));
        assert!(client(&up).health_check().await);

        let down = Arc::new(ScriptedBackend::new());
        assert!(!client(&down).health_check().await);
    }

    #[test]
    fn env_overrides() {
        let config = CompletionConfig::from_lookup(|key| match key {
            "BLUFFSWEEPER_MODEL_ID" => Some("local-model".into()),
            "BLUFFSWEEPER_TIMEOUT_SECS" => Some("5".into()),
            "BLUFFSWEEPER_MAX_ATTEMPTS" => Some("zero".into()),
            _ => None,
        });
        assert_eq!(config.model_id, "local-model");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn fallback_text_is_context_keyed() {
        assert_ne!(
            CompletionClient::fallback_response(CompletionContext::Advisor),
            CompletionClient::fallback_response(CompletionContext::Narrator)
        );
    }
}
