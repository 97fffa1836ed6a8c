//! Scripted transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{BackendError, CompletionBackend, CompletionConfig};

/// Replays queued replies in order. Once the queue runs dry every call fails with a network
/// error, so an empty script models an unreachable service.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<Vec<u8>, BackendError>>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<Vec<u8>>>,
    latency: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with no backoff so retry tests run instantly.
    pub fn fast_config() -> CompletionConfig {
        CompletionConfig {
            base_delay: Duration::ZERO,
            timeout: Duration::from_secs(5),
            ..CompletionConfig::default()
        }
    }

    pub fn reply_text(self, text: &str) -> Self {
        let body = serde_json::json!({
            "output": { "message": { "role": "assistant", "content": [{ "text": text }] } }
        });
        self.reply_raw(body.to_string().into_bytes())
    }

    pub fn reply_raw(self, body: Vec<u8>) -> Self {
        self.push(Ok(body))
    }

    pub fn fail(self, error: BackendError) -> Self {
        self.push(Err(error))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<serde_json::Value> {
        let body = self.last_request.lock().unwrap().clone()?;
        serde_json::from_slice(&body).ok()
    }

    fn push(self, reply: Result<Vec<u8>, BackendError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn invoke(&self, _model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(body);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Network("no scripted reply".into())))
    }
}
