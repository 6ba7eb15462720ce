use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use rfqmatch_common::{AppConfig, Result, RfqMatchError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::embedder::{prepare_input, Embedder};
use crate::types::{EmbedRequest, EmbedResponse};

/// OpenAI-compatible embeddings client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    endpoint: String,
    model: String,
    max_retries: u32,
    client: Client,
}

/// Outcome of a single request attempt
enum Attempt {
    Done(Vec<f32>),
    Retry(RfqMatchError),
    Fail(RfqMatchError),
}

impl OpenAiClient {
    /// Create new embeddings client
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(RfqMatchError::config("missing embedding provider API key"));
        }

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| RfqMatchError::config("API key is not a valid header value"))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        let endpoint = format!("{}/embeddings", base_url.trim_end_matches('/'));
        let model = model.into();

        info!("Embedding client initialized: {} (model={})", endpoint, model);
        Ok(Self {
            endpoint,
            model,
            max_retries: max_retries.max(1),
            client,
        })
    }

    /// Create client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.openai_api_key,
            &config.openai_base_url,
            config.embedding_model.clone(),
            config.embed_timeout(),
            config.embed_max_retries,
        )
    }

    /// Embeddings endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate embedding for text (with retry logic)
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: self.model.clone(),
            input: vec![prepare_input(text)],
        };

        debug!("Generating embedding - Model: {}, Text length: {}", self.model, text.len());

        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.try_embed(&request).await {
                Attempt::Done(embedding) => {
                    debug!("Received embedding - Dimension: {}", embedding.len());
                    return Ok(embedding);
                }
                Attempt::Fail(e) => return Err(e),
                Attempt::Retry(e) => {
                    if attempt < self.max_retries {
                        let delay = retry_backoff(attempt);
                        warn!(
                            "Embedding request failed (attempt {}/{}): {}. Retrying in {:?}...",
                            attempt, self.max_retries, e, delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| RfqMatchError::embedding("All retries failed")))
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, request: &EmbedRequest) -> Attempt {
        let response = match self.client.post(&self.endpoint).json(request).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() || e.is_connect() => {
                return Attempt::Retry(RfqMatchError::network(format!(
                    "Failed to reach embedding provider: {}",
                    e
                )));
            }
            Err(e) => {
                return Attempt::Fail(RfqMatchError::network(format!(
                    "Failed to send embedding request: {}",
                    e
                )));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            let err = RfqMatchError::embedding(format!(
                "Embedding API error ({}): {}",
                status, body
            ));
            return if should_retry(status) {
                Attempt::Retry(err)
            } else {
                Attempt::Fail(err)
            };
        }

        let parsed: EmbedResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                return Attempt::Fail(RfqMatchError::embedding(format!(
                    "Failed to parse embedding response: {}",
                    e
                )));
            }
        };

        match parsed.into_first() {
            Some(embedding) if !embedding.is_empty() => Attempt::Done(embedding),
            _ => Attempt::Fail(RfqMatchError::embedding("Empty embedding from provider")),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_text(text).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Rate limits and server-side errors are transient
fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Exponential backoff: 1s, 2s, 4s, ... capped at 32s
fn retry_backoff(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(5);
    Duration::from_secs(2u64.pow(exp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Drain one HTTP request (headers plus content-length body)
    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body_len = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    /// Serve one canned response per connection, in order; returns base URL and hit count
    async fn serve_canned(responses: Vec<String>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            for response in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                counter.fetch_add(1, Ordering::SeqCst);
                read_request(&mut stream).await;
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });

        (format!("http://{}/v1", addr), hits)
    }

    fn local_client(base_url: &str, max_retries: u32) -> OpenAiClient {
        OpenAiClient::new(
            "sk-test",
            base_url,
            "text-embedding-ada-002",
            Duration::from_secs(5),
            max_retries,
        )
        .unwrap()
    }

    #[test]
    fn test_should_retry() {
        assert!(should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry(StatusCode::BAD_GATEWAY));
        assert!(!should_retry(StatusCode::UNAUTHORIZED));
        assert!(!should_retry(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_retry_backoff() {
        assert_eq!(retry_backoff(1), Duration::from_secs(1));
        assert_eq!(retry_backoff(2), Duration::from_secs(2));
        assert_eq!(retry_backoff(3), Duration::from_secs(4));
        assert_eq!(retry_backoff(40), Duration::from_secs(32));
    }

    #[test]
    fn test_missing_api_key() {
        let result = OpenAiClient::new(
            "  ",
            "https://api.openai.com/v1",
            "text-embedding-ada-002",
            Duration::from_secs(5),
            3,
        );
        assert!(matches!(result, Err(RfqMatchError::Config(_))));
    }

    #[test]
    fn test_endpoint_and_model() {
        let client = OpenAiClient::new(
            "sk-test",
            "http://localhost:8081/v1/",
            "text-embedding-3-small",
            Duration::from_secs(5),
            3,
        )
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8081/v1/embeddings");
        assert_eq!(client.model(), "text-embedding-3-small");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_embedding_failure() {
        // Nothing listens on port 9 (discard) on test hosts
        let client = OpenAiClient::new(
            "sk-test",
            "http://127.0.0.1:9/v1",
            "text-embedding-ada-002",
            Duration::from_millis(200),
            1,
        )
        .unwrap();
        let err = client.embed("Acme Steel Bolt").await.unwrap_err();
        assert!(err.is_embedding_failure());
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let (base_url, hits) = serve_canned(vec![
            http_response("503 Service Unavailable", r#"{"error":"overloaded"}"#),
            http_response("200 OK", r#"{"data":[{"index":0,"embedding":[0.1,0.2]}]}"#),
        ])
        .await;

        let embedding = local_client(&base_url, 3).embed("Acme Steel Bolt").await.unwrap();
        assert_eq!(embedding, vec![0.1, 0.2]);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let (base_url, hits) = serve_canned(vec![
            http_response("401 Unauthorized", r#"{"error":"invalid api key"}"#),
            http_response("200 OK", r#"{"data":[{"index":0,"embedding":[0.1,0.2]}]}"#),
        ])
        .await;

        let err = local_client(&base_url, 3).embed("Acme Steel Bolt").await.unwrap_err();
        assert!(matches!(err, RfqMatchError::Embedding(_)));
        assert!(err.to_string().contains("401"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_data_is_not_retried() {
        let (base_url, hits) = serve_canned(vec![
            http_response("200 OK", r#"{"data":[]}"#),
            http_response("200 OK", r#"{"data":[{"index":0,"embedding":[0.1,0.2]}]}"#),
        ])
        .await;

        let err = local_client(&base_url, 3).embed("Acme Steel Bolt").await.unwrap_err();
        assert!(matches!(err, RfqMatchError::Embedding(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
