//! Production HTTP transport over reqwest.
//!
//! [`HttpTransport`] speaks the OpenAI-compatible chat completion protocol
//! of Nebius AI Studio: a JSON POST for buffered calls, SSE for streaming
//! ones. One call performs exactly one exchange; retry and classification
//! live above this layer, in [`NebiusClient`](crate::NebiusClient).

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::sse::{SseEvent, parse_sse_line};
use crate::transport::Transport;
use crate::types::{ChatChunk, ChatRequest, ChatResponse};

/// The transport used by default: reqwest against a Nebius-style endpoint.
///
/// Configured to talk to any endpoint that accepts the OpenAI request format
/// by changing the `base_url` in [`ClientConfig`].
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Create a transport from configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Returns the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Turn a non-success response into a [`TransportError`] carrying
    /// status, body and headers.
    async fn error_for(response: reqwest::Response) -> TransportError {
        let status = response.status();
        let headers = header_map(response.headers());
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body).unwrap_or_else(|| format!("HTTP {status}"));
        TransportError {
            message,
            status: Some(status.as_u16()),
            body: Some(body),
            headers: Some(headers),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let url = self.completions_url();

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            TransportError::network(format!("failed to parse response: {e}"))
        })?;

        debug!(
            model = %chat_response.model,
            choices = chat_response.choices.len(),
            "chat completion response received"
        );

        Ok(chat_response)
    }

    async fn complete_stream(
        &self,
        request: &ChatRequest,
        tx: mpsc::Sender<ChatChunk>,
    ) -> Result<(), TransportError> {
        let url = self.completions_url();

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending streaming chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        // Read the SSE stream line by line. Bytes accumulate raw and are
        // decoded per complete line; a multi-byte character can span two
        // network reads.
        let mut byte_stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let bytes = chunk_result
                .map_err(|e| TransportError::network(format!("stream read error: {e}")))?;
            buffer.extend_from_slice(&bytes);

            while let Some(line) = next_line(&mut buffer) {
                let event = match parse_sse_line(&line) {
                    Ok(e) => e,
                    Err(e) => {
                        warn!(error = %e, "SSE parse error, skipping line");
                        continue;
                    }
                };

                match event {
                    Some(SseEvent::Chunk(chunk)) => {
                        trace!(chunk = ?chunk, "streaming chunk");
                        // If the receiver is dropped, stop processing
                        if tx.send(chunk).await.is_err() {
                            debug!("stream receiver dropped, stopping");
                            return Ok(());
                        }
                    }
                    Some(SseEvent::Done) => {
                        debug!("streaming complete");
                        return Ok(());
                    }
                    None => {}
                }
            }
        }

        // Process any remaining data in the buffer
        let tail = String::from_utf8_lossy(&buffer);
        if !tail.trim().is_empty()
            && let Ok(Some(SseEvent::Chunk(chunk))) = parse_sse_line(&tail)
        {
            let _ = tx.send(chunk).await;
        }

        debug!("stream ended without sentinel");

        Ok(())
    }
}

/// Remove and decode the next newline-terminated line from `buf`. A partial
/// trailing line, which may end mid-character, stays buffered.
fn next_line(buf: &mut Vec<u8>) -> Option<String> {
    let pos = buf.iter().position(|&b| b == b'\n')?;
    let mut line: Vec<u8> = buf.drain(..=pos).collect();
    line.pop();
    Some(String::from_utf8_lossy(&line).into_owned())
}

/// Copy response headers into an owned map, replacing non-UTF-8 bytes.
fn header_map(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Extract a human-readable error message from a JSON error response body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|v| {
        // OpenAI format: {"error": {"message": "..."}}
        v.get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            // Bare-string format: {"error": "..."}
            .or_else(|| v.as_str().map(String::from))
    })
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}
