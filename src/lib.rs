//! Client for the Nebius AI Studio chat completion API.
//!
//! This crate adapts an OpenAI-compatible remote endpoint behind a typed
//! client: buffered and streaming completion calls, a bounded retry policy
//! with fixed exponential backoff, and structured capture of 4xx failures
//! for later inspection. It is a standalone library.
//!
//! # Architecture
//!
//! - [`NebiusClient`] is the entry point: retry loop, failure capture and
//!   model management
//! - [`Transport`] trait defines the exchange with the remote endpoint
//! - [`HttpTransport`] implements it over HTTPS, including SSE streaming
//! - [`ClientConfig`] describes how to connect
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use nebius_client::{ChatMessage, ClientConfig, NebiusClient};
//!
//! let client = NebiusClient::new(ClientConfig::from_env(api_key));
//!
//! let response = client
//!     .chat(
//!         vec![
//!             ChatMessage::system("You are a helpful assistant."),
//!             ChatMessage::user("What is Rust?"),
//!         ],
//!         None,
//!         None,
//!     )
//!     .await?;
//! println!("{}", response.choices[0].message.content.as_deref().unwrap_or(""));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod failure;
pub mod http;
mod log;
pub mod model;
pub mod retry;
pub mod sse;
pub mod transport;
pub mod types;

pub use client::{ChatStream, NebiusClient};
pub use config::ClientConfig;
pub use error::{ClientError, Result, TransportError};
pub use failure::FailureRecord;
pub use http::HttpTransport;
pub use model::Model;
pub use sse::parse_sse_line;
pub use transport::Transport;
pub use types::{
    ChatChunk, ChatMessage, ChatRequest, ChatResponse, ToolCall, ToolDefinition, Usage,
};
