//! The Nebius chat client.
//!
//! [`NebiusClient`] wraps a [`Transport`] with the crate's retry policy:
//! transient failures are retried with fixed backoff, 4xx responses are
//! captured for operator inspection, and the buffered and streaming entry
//! points share the same classification rules.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result, TransportError};
use crate::failure::FailureRecord;
use crate::http::HttpTransport;
use crate::log::LogSink;
use crate::model::Model;
use crate::retry::{MAX_RETRIES, backoff_delay, is_retryable};
use crate::transport::Transport;
use crate::types::{ChatChunk, ChatMessage, ChatRequest, ChatResponse, ToolDefinition};

/// Serialized payloads above this size get an extra warning line.
const LARGE_PAYLOAD_BYTES: usize = 100_000;

/// Capacity of the chunk channels on the streaming path.
const CHUNK_CHANNEL_CAPACITY: usize = 32;

/// A client for the Nebius AI Studio chat completion API.
///
/// Cheap to clone; clones share the current model, the failure slot and the
/// log sink.
///
/// # Example
///
/// ```rust,ignore
/// use nebius_client::{ChatMessage, ClientConfig, NebiusClient};
///
/// let client = NebiusClient::new(ClientConfig::from_env(api_key));
/// let response = client
///     .chat(vec![ChatMessage::user("What is 2+2?")], None, None)
///     .await?;
/// ```
#[derive(Clone)]
pub struct NebiusClient {
    inner: Arc<ClientShared>,
}

/// State shared by all clones of a client and its streaming drivers.
struct ClientShared {
    transport: Arc<dyn Transport>,
    model: Mutex<Model>,
    last_failure: Mutex<Option<FailureRecord>>,
    log: LogSink,
}

impl ClientShared {
    fn record_failure(&self, err: &TransportError, payload: &ChatRequest) {
        if let Some(record) = FailureRecord::capture(err, payload) {
            *self.last_failure.lock() = Some(record);
        }
    }
}

impl NebiusClient {
    /// Build a client backed by the production HTTP transport.
    ///
    /// A configured model identifier outside the supported set is ignored
    /// in favor of the default model; use [`NebiusClient::set_model`] for
    /// validated switching.
    pub fn new(config: ClientConfig) -> Self {
        let model = config
            .model
            .as_deref()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default();
        Self::with_transport(Arc::new(HttpTransport::new(&config)), model)
    }

    /// Build a client over a custom transport.
    pub fn with_transport(transport: Arc<dyn Transport>, model: Model) -> Self {
        Self {
            inner: Arc::new(ClientShared {
                transport,
                model: Mutex::new(model),
                last_failure: Mutex::new(None),
                log: LogSink::default(),
            }),
        }
    }

    /// Switch the default model.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidModel`] for an identifier outside the
    /// supported set; the current model is left unchanged.
    pub fn set_model(&self, model: &str) -> Result<()> {
        let parsed: Model = model.parse()?;
        *self.inner.model.lock() = parsed;
        Ok(())
    }

    /// The model used when a call carries no override.
    pub fn current_model(&self) -> Model {
        *self.inner.model.lock()
    }

    /// Every model available on the provider.
    pub fn available_models(&self) -> &'static [Model] {
        Model::all()
    }

    /// The most recent 4xx failure, if one has been captured.
    pub fn last_failure(&self) -> Option<FailureRecord> {
        self.inner.last_failure.lock().clone()
    }

    /// Discard the stored failure record.
    pub fn clear_last_failure(&self) {
        *self.inner.last_failure.lock() = None;
    }

    /// Route diagnostic lines into `sink` instead of stderr.
    pub fn set_log_sink(&self, sink: impl Fn(&str) + Send + Sync + 'static) {
        self.inner.log.set(sink);
    }

    /// Execute a buffered completion call.
    ///
    /// Blocks until final success or retry exhaustion. `model` overrides the
    /// client's current model for this call only.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RequestFailed`] once classification has
    /// exhausted retries or hit a non-retryable status.
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
        model: Option<Model>,
    ) -> Result<ChatResponse> {
        let model = model.unwrap_or_else(|| self.current_model());
        let payload = ChatRequest::new(model, messages, tools, false);
        let payload_bytes = payload_size(&payload);
        let total = MAX_RETRIES + 1;
        let mut retries: u32 = 0;

        loop {
            let attempt = retries + 1;
            self.inner.log.emit(&format!("[chat] attempt {attempt}/{total}"));
            self.inner.log.emit(&format!("[chat] payload size: {payload_bytes} bytes"));
            if payload_bytes > LARGE_PAYLOAD_BYTES {
                self.inner
                    .log
                    .emit(&format!("[chat] large payload detected: {payload_bytes} bytes"));
            }
            debug!(
                attempt,
                model = %payload.model,
                messages = payload.messages.len(),
                "starting chat completion attempt"
            );

            match self.inner.transport.complete(&payload).await {
                Ok(response) => {
                    if retries > 0 {
                        debug!(retries, "chat completion succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(err) => {
                    retries += 1;
                    let message = classified_message("Nebius API error", &err);
                    self.inner
                        .log
                        .emit(&format!("[chat] error on attempt {retries}/{total}: {message}"));
                    warn!(
                        attempt = retries,
                        status = ?err.status,
                        error = %err,
                        "chat completion attempt failed"
                    );
                    self.inner.record_failure(&err, &payload);

                    if is_retryable(&err) && retries <= MAX_RETRIES {
                        let delay = backoff_delay(retries);
                        self.inner
                            .log
                            .emit(&format!("[chat] retrying in {}ms...", delay.as_millis()));
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(ClientError::RequestFailed(message));
                }
            }
        }
    }

    /// Execute a streaming completion call.
    ///
    /// Returns as soon as the driver task is running; chunks arrive through
    /// the returned [`ChatStream`] as the transport produces them. A failure
    /// before the first forwarded chunk is retried per policy; once any
    /// chunk has been forwarded the attempt is committed and a later failure
    /// surfaces as a terminal `Err` item instead. Dropping the stream stops
    /// the exchange.
    pub async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<ToolDefinition>>,
        model: Option<Model>,
    ) -> ChatStream {
        let model = model.unwrap_or_else(|| self.current_model());
        let payload = ChatRequest::new(model, messages, tools, true);
        let (tx, rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);
        let shared = self.inner.clone();
        tokio::spawn(run_stream(shared, payload, tx));
        ChatStream { rx }
    }
}

impl std::fmt::Debug for NebiusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NebiusClient")
            .field("model", &self.current_model())
            .field("last_failure", &self.inner.last_failure.lock().is_some())
            .finish()
    }
}

/// A finite sequence of completion chunks from one streaming call.
///
/// Yields `Ok` chunks as they arrive and at most one terminal `Err`, then
/// ends. Not restartable. Dropping it mid-sequence releases the underlying
/// exchange without affecting the client.
#[derive(Debug)]
pub struct ChatStream {
    rx: mpsc::Receiver<Result<ChatChunk>>,
}

impl ChatStream {
    /// Receive the next item, or `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<Result<ChatChunk>> {
        self.rx.recv().await
    }
}

impl Stream for ChatStream {
    type Item = Result<ChatChunk>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// The streaming retry driver. Owns the whole lifecycle of one
/// `chat_stream` call on its own task.
async fn run_stream(
    shared: Arc<ClientShared>,
    payload: ChatRequest,
    tx: mpsc::Sender<Result<ChatChunk>>,
) {
    let payload_bytes = payload_size(&payload);
    let tool_count = payload.tools.as_ref().map_or(0, Vec::len);
    let total = MAX_RETRIES + 1;
    let mut retries: u32 = 0;

    loop {
        let attempt = retries + 1;
        shared.log.emit(&format!("[stream] attempt {attempt}/{total}"));
        shared.log.emit(&format!("[stream] payload size: {payload_bytes} bytes"));
        shared.log.emit(&format!("[stream] messages count: {}", payload.messages.len()));
        shared.log.emit(&format!("[stream] model: {}", payload.model));
        shared.log.emit(&format!("[stream] tools count: {tool_count}"));
        if payload_bytes > LARGE_PAYLOAD_BYTES {
            shared.log.emit(&format!("[stream] large payload detected: {payload_bytes} bytes"));
        }
        debug!(attempt, model = %payload.model, "starting streaming attempt");

        // Relay each attempt through its own channel so chunks can be
        // counted on the way to the consumer. An attempt with zero
        // forwarded chunks may be retried; one that has already delivered
        // output is committed.
        let (attempt_tx, mut attempt_rx) = mpsc::channel::<ChatChunk>(CHUNK_CHANNEL_CAPACITY);
        let consumer = &tx;
        let pump = async move {
            let mut forwarded: u32 = 0;
            let mut receiver_gone = false;
            while let Some(chunk) = attempt_rx.recv().await {
                if consumer.send(Ok(chunk)).await.is_err() {
                    receiver_gone = true;
                    break;
                }
                forwarded += 1;
            }
            // Closing the relay stops the transport if it is still sending
            drop(attempt_rx);
            (forwarded, receiver_gone)
        };

        let (result, (forwarded, receiver_gone)) =
            tokio::join!(shared.transport.complete_stream(&payload, attempt_tx), pump);

        match result {
            Ok(()) => {
                if !receiver_gone {
                    debug!(forwarded, "stream finished");
                }
                return;
            }
            Err(err) => {
                retries += 1;
                let message = classified_message("Nebius API streaming error", &err);
                shared.log.emit(&format!("[stream] error on attempt {retries}/{total}: {message}"));
                warn!(
                    attempt = retries,
                    status = ?err.status,
                    forwarded,
                    error = %err,
                    "streaming attempt failed"
                );
                shared.record_failure(&err, &payload);

                if receiver_gone {
                    // Consumer went away; nothing left to deliver or retry for
                    return;
                }

                let committed = forwarded > 0;
                if !committed && is_retryable(&err) && retries <= MAX_RETRIES {
                    let delay = backoff_delay(retries);
                    shared.log.emit(&format!("[stream] retrying in {}ms...", delay.as_millis()));
                    tokio::time::sleep(delay).await;
                    continue;
                }

                let _ = tx.send(Err(ClientError::RequestFailed(message))).await;
                return;
            }
        }
    }
}

/// Size of the payload as it will appear on the wire, for the log lines.
fn payload_size(payload: &ChatRequest) -> usize {
    serde_json::to_string(payload).map(|s| s.len()).unwrap_or(0)
}

/// The terminal failure message: transport message enriched with status and
/// response body when available.
fn classified_message(prefix: &str, err: &TransportError) -> String {
    let mut message = format!("{prefix}: {}", err.message);
    if let Some(status) = err.status {
        message.push_str(&format!(" (status: {status})"));
    }
    if let Some(body) = &err.body
        && !body.is_empty()
    {
        message.push_str(&format!(" - {body}"));
    }
    message
}
