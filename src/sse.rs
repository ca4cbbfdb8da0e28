//! SSE (Server-Sent Events) line parser for the streaming completion path.
//!
//! Parses the `data:` lines of an SSE stream into [`SseEvent`] values. The
//! OpenAI-compatible streaming format sends lines like:
//!
//! ```text
//! data: {"id":"...","choices":[{"delta":{"content":"Hello"},...}],...}
//!
//! data: {"id":"...","choices":[{"delta":{"content":" world"},...}],...}
//!
//! data: [DONE]
//! ```
//!
//! Each non-empty `data:` line is either a JSON `chat.completion.chunk`
//! object or the literal `[DONE]` sentinel marking end of stream. Chunks are
//! passed through whole; nothing is aggregated or filtered here.

use crate::error::TransportError;
use crate::types::ChatChunk;

/// The sentinel value that marks the end of an SSE stream.
const DONE_SENTINEL: &str = "[DONE]";

/// One parsed SSE event.
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// A completion chunk to forward to the consumer.
    Chunk(ChatChunk),
    /// The end-of-stream sentinel.
    Done,
}

/// Parse a single SSE line into at most one [`SseEvent`].
///
/// Returns `Ok(None)` for:
/// - Empty lines (SSE event boundaries)
/// - Comment lines and non-`data:` fields (`event:`, `id:`, `retry:`)
/// - `data:` lines with empty payloads
///
/// # Errors
///
/// Returns a [`TransportError`] if a `data:` line carries JSON that cannot
/// be parsed as a completion chunk.
pub fn parse_sse_line(line: &str) -> Result<Option<SseEvent>, TransportError> {
    let line = line.trim_end();

    // Skip empty lines (SSE event boundaries) and comment lines
    if line.is_empty() || line.starts_with(':') {
        return Ok(None);
    }

    // Must be a data: line
    let payload = if let Some(rest) = line.strip_prefix("data:") {
        rest.trim_start()
    } else {
        // event:, id:, retry: lines -- skip
        return Ok(None);
    };

    // Empty data payload
    if payload.is_empty() {
        return Ok(None);
    }

    // [DONE] sentinel
    if payload == DONE_SENTINEL {
        return Ok(Some(SseEvent::Done));
    }

    let chunk: ChatChunk = serde_json::from_str(payload)
        .map_err(|e| TransportError::network(format!("failed to parse SSE chunk: {e}")))?;

    Ok(Some(SseEvent::Chunk(chunk)))
}
