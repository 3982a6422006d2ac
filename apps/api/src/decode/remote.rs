//! Posts raw document bytes to an external text-extraction service and reads
//! back `{"text": "..."}`.
//!
//! Transport errors, 429 and 5xx responses are retried with exponential
//! backoff. Any other 4xx means the service rejected the document itself.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::decode::{BinaryFormat, DecodeError, DocumentDecoder, MAX_EXPANDED_BYTES};

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 500;

#[derive(Debug, Deserialize)]
struct DecodeResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct DecodeErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct RemoteDecoder {
    client: Client,
    endpoint: String,
    max_response_bytes: usize,
}

impl RemoteDecoder {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            max_response_bytes: MAX_EXPANDED_BYTES,
        })
    }
}

/// Buffers the response body, refusing anything over `limit` bytes.
async fn read_capped(mut response: Response, limit: usize) -> Result<Vec<u8>, DecodeError> {
    let too_large = || {
        DecodeError::Malformed(format!(
            "Decoded text exceeds {limit} bytes; the file is too large to process"
        ))
    };

    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| DecodeError::Unavailable(format!("Failed to read decoder response: {e}")))?
    {
        if body.len() + chunk.len() > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[async_trait]
impl DocumentDecoder for RemoteDecoder {
    async fn decode(&self, format: BinaryFormat, data: Bytes) -> Result<String, DecodeError> {
        let mut last_error = String::new();

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = Duration::from_millis(BASE_BACKOFF_MS * (1 << (attempt - 1)));
                warn!(
                    "Decoder call attempt {} failed ({}), retrying after {}ms...",
                    attempt,
                    last_error,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .header("content-type", format.mime())
                .body(data.clone())
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() || status.as_u16() == 429 {
                last_error = format!("decoder service returned {status}");
                continue;
            }

            if !status.is_success() {
                let body = read_capped(response, self.max_response_bytes)
                    .await
                    .unwrap_or_default();
                let body = String::from_utf8_lossy(&body).into_owned();
                let message = serde_json::from_str::<DecodeErrorBody>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(DecodeError::Malformed(message));
            }

            let body = read_capped(response, self.max_response_bytes).await?;
            let decoded: DecodeResponse = serde_json::from_slice(&body)
                .map_err(|e| DecodeError::Unavailable(format!("Bad decoder response: {e}")))?;

            debug!(chars = decoded.text.len(), "remote decode succeeded");
            return Ok(decoded.text);
        }

        Err(DecodeError::Unavailable(format!(
            "Decoder unavailable after {MAX_ATTEMPTS} attempts: {last_error}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
    use serde_json::{json, Value};

    /// Serves `router` on an ephemeral port and returns its decode URL.
    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/decode")
    }

    #[tokio::test]
    async fn test_successful_decode() {
        let router = Router::new().route(
            "/decode",
            post(|body: axum::body::Bytes| async move {
                Json(json!({ "text": format!("got {} bytes", body.len()) }))
            }),
        );
        let url = spawn_service(router).await;
        let decoder = RemoteDecoder::new(url, Duration::from_secs(5)).unwrap();

        let text = decoder
            .decode(BinaryFormat::Docx, Bytes::from_static(b"12345"))
            .await
            .unwrap();
        assert_eq!(text, "got 5 bytes");
    }

    #[tokio::test]
    async fn test_client_error_is_malformed_with_service_message() {
        let router = Router::new().route(
            "/decode",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json::<Value>(json!({ "error": "password-protected file" })),
                )
            }),
        );
        let url = spawn_service(router).await;
        let decoder = RemoteDecoder::new(url, Duration::from_secs(5)).unwrap();

        let err = decoder
            .decode(BinaryFormat::Pdf, Bytes::from_static(b"%PDF"))
            .await
            .unwrap_err();
        match err {
            DecodeError::Malformed(msg) => assert_eq!(msg, "password-protected file"),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_retries() {
        let router = Router::new().route(
            "/decode",
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let url = spawn_service(router).await;
        let decoder = RemoteDecoder::new(url, Duration::from_secs(5)).unwrap();

        let err = decoder
            .decode(BinaryFormat::Pdf, Bytes::from_static(b"%PDF"))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::Unavailable(_)));
        assert!(err.to_string().contains("3 attempts"));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/decode",
            post(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        StatusCode::TOO_MANY_REQUESTS.into_response()
                    } else {
                        Json(json!({ "text": "Jane Doe" })).into_response()
                    }
                }
            }),
        );
        let url = spawn_service(router).await;
        let decoder = RemoteDecoder::new(url, Duration::from_secs(5)).unwrap();

        let text = decoder
            .decode(BinaryFormat::Pdf, Bytes::from_static(b"%PDF"))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_oversized_response_rejected() {
        let router = Router::new().route(
            "/decode",
            post(|| async { Json(json!({ "text": "x".repeat(4096) })) }),
        );
        let url = spawn_service(router).await;
        let mut decoder = RemoteDecoder::new(url, Duration::from_secs(5)).unwrap();
        decoder.max_response_bytes = 1024;

        let err = decoder
            .decode(BinaryFormat::Pdf, Bytes::from_static(b"%PDF"))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(ref m) if m.contains("too large")));
    }
}
