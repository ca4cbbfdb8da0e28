//! The [`Transport`] capability trait.
//!
//! The client's retry loop is written against this trait rather than a
//! concrete HTTP stack, so tests and embedders can substitute their own
//! exchange mechanism. The production implementation is
//! [`HttpTransport`](crate::http::HttpTransport).

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::types::{ChatChunk, ChatRequest, ChatResponse};

/// A capability that performs one request/response exchange with the API.
///
/// Implementations handle the wire-level details (authentication, request
/// framing, response parsing) for a single attempt. Retry, classification
/// and failure capture all live above this seam, in
/// [`NebiusClient`](crate::NebiusClient).
///
/// # Example
///
/// ```rust,ignore
/// use nebius_client::{Transport, ChatRequest, ChatMessage, Model};
///
/// async fn one_shot(transport: &dyn Transport) -> Option<String> {
///     let request = ChatRequest::new(
///         Model::default(),
///         vec![ChatMessage::user("What is 2+2?")],
///         None,
///         false,
///     );
///     let response = transport.complete(&request).await.ok()?;
///     response.choices.first()?.message.content.clone()
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one buffered exchange and return the aggregated response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] carrying whatever status, body and
    /// header detail the exchange produced.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;

    /// Execute one streaming exchange, sending each chunk into `tx` as it
    /// arrives.
    ///
    /// Returns `Ok(())` once the upstream stream ends. Implementations must
    /// stop promptly, without error, when the receiving side of `tx` is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the exchange fails before or during
    /// the stream. Chunks already sent stay sent; the caller decides what a
    /// partial stream means.
    async fn complete_stream(
        &self,
        request: &ChatRequest,
        tx: mpsc::Sender<ChatChunk>,
    ) -> Result<(), TransportError>;
}
