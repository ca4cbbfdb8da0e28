//! Diagnostic capture of the most recent 4xx failure.
//!
//! Operators debugging rejected requests want the full picture: what was
//! sent, what came back, and when. [`FailureRecord`] keeps exactly one such
//! snapshot per client instance, refreshed on every 4xx from either entry
//! point, independent of whether the call eventually succeeded on retry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::TransportError;
use crate::types::ChatRequest;

/// Snapshot of the most recent 4xx failure, retained for operator
/// inspection.
///
/// Overwritten by every new 4xx; cleared explicitly via
/// [`NebiusClient::clear_last_failure`](crate::NebiusClient::clear_last_failure).
/// Never created for non-4xx failures or successful calls.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    /// When the failing attempt was classified.
    pub timestamp: DateTime<Utc>,
    /// The HTTP status code. Always in 400..=499.
    pub status: u16,
    /// The transport's failure message.
    pub message: String,
    /// Raw response body, when one was received.
    pub body: Option<String>,
    /// Response headers, when a response was received.
    pub headers: Option<HashMap<String, String>>,
    /// The payload that produced the failure, stream flag as issued.
    pub payload: ChatRequest,
}

impl FailureRecord {
    /// Capture a record from a failed attempt, if its status is 4xx.
    pub(crate) fn capture(err: &TransportError, payload: &ChatRequest) -> Option<Self> {
        let status = err.status?;
        if !(400..=499).contains(&status) {
            return None;
        }
        Some(Self {
            timestamp: Utc::now(),
            status,
            message: err.message.clone(),
            body: err.body.clone(),
            headers: err.headers.clone(),
            payload: payload.clone(),
        })
    }
}
