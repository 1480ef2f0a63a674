//! LlmClient trait definition and shared HTTP plumbing

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Maximum number of retries for transient errors
pub(crate) const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
pub(crate) const INITIAL_BACKOFF_MS: u64 = 1000;

/// Stateless LLM client - each call is independent (fresh context)
///
/// Every stage of the pipeline is one request with its own system prompt and
/// a single user message; no conversation state is kept between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model identifier used for requests (for logging and cost estimates)
    fn model(&self) -> &str;
}

/// POST a JSON body, retrying transient failures with exponential backoff
///
/// `build` is called once per attempt. Returns the first successful response.
/// A 429 is retried after the server's `retry-after` delay.
pub(crate) async fn post_with_retry<F>(build: F) -> Result<reqwest::Response, LlmError>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    post_with_backoff(build, Duration::from_millis(INITIAL_BACKOFF_MS)).await
}

async fn post_with_backoff<F>(build: F, initial_backoff: Duration) -> Result<reqwest::Response, LlmError>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let mut attempt = 0;
    loop {
        let err = match build().send().await {
            Ok(response) if response.status().is_success() => {
                debug!(attempt, status = response.status().as_u16(), "post_with_retry: success");
                return Ok(response);
            }
            Ok(response) => error_from_response(response).await,
            Err(e) => LlmError::Network(e),
        };

        if !err.is_retryable() || attempt >= MAX_RETRIES {
            debug!(attempt, error = %err, "post_with_retry: giving up");
            return Err(err);
        }

        let delay = match &err {
            LlmError::RateLimited { retry_after } => *retry_after,
            _ => initial_backoff * 2u32.pow(attempt),
        };
        attempt += 1;
        warn!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "post_with_retry: retrying after transient error");
        tokio::time::sleep(delay).await;
    }
}

async fn error_from_response(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        debug!(retry_after, "post_with_retry: rate limited");
        return LlmError::RateLimited {
            retry_after: Duration::from_secs(retry_after),
        };
    }

    let message = response.text().await.unwrap_or_default();
    LlmError::ApiError { status, message }
}


#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock LLM client for unit tests
    ///
    /// Hands out the given responses in order and keeps every request it saw.
    pub struct MockLlmClient {
        responses: Vec<CompletionResponse>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<CompletionResponse>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(idx)
                .cloned()
                .ok_or_else(|| LlmError::InvalidResponse("No more mock responses".to_string()))
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::llm::{Message, StopReason, TokenUsage};

        fn request() -> CompletionRequest {
            CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![Message::user("hi")],
                tools: vec![],
                forced_tool: None,
                max_tokens: 1000,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let response = CompletionResponse {
                content: Some("Response 1".to_string()),
                tool_calls: vec![],
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            };
            let client = MockLlmClient::new(vec![response]);

            let resp = client.complete(request()).await.unwrap();
            assert_eq!(resp.content, Some("Response 1".to_string()));
            assert_eq!(client.call_count(), 1);
            assert_eq!(client.requests()[0].messages[0].content, "hi");
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            assert!(client.complete(request()).await.is_err());
        }
    }
}
