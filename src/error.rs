//! Error types for the Nebius client.
//!
//! Client operations return [`Result<T>`] which uses [`ClientError`] as the
//! error type. Transport implementations report [`TransportError`], which the
//! retry loop absorbs and classifies before anything reaches the caller.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::Model;

/// Errors surfaced to callers of [`NebiusClient`](crate::NebiusClient).
#[derive(Error, Debug)]
pub enum ClientError {
    /// The model identifier is not in the supported set.
    #[error("invalid model: {0}. available models: {supported}", supported = Model::supported_list())]
    InvalidModel(String),

    /// The terminal failure of a call, raised once classification has
    /// exhausted retries or hit a non-retryable status. The message carries
    /// the status code and response detail when available.
    #[error("{0}")]
    RequestFailed(String),
}

/// A failure reported by a [`Transport`](crate::Transport) implementation.
///
/// Carries whatever diagnostic detail the transport could recover from the
/// exchange. Never crosses the client boundary directly: the retry loop
/// absorbs it and surfaces [`ClientError::RequestFailed`] instead.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct TransportError {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// HTTP status code, when a response was received.
    pub status: Option<u16>,
    /// Raw response body, when one was received.
    pub body: Option<String>,
    /// Response headers, when a response was received.
    pub headers: Option<HashMap<String, String>>,
}

impl TransportError {
    /// A transport failure with no HTTP response attached (connection
    /// refused, DNS failure, decode error and the like).
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
            headers: None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            body: None,
            headers: None,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::network(format!("json error: {err}"))
    }
}

/// A convenience type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
