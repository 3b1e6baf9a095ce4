//! # Supervisor-bot client
//!
//! One request per user message, no retries:
//!
//! ```text
//! user text → send.rs (POST { q }) → receive.rs (decode { reply }) → reply text
//! ```
//!
//! Failures never reach the formatting pipeline as errors. [`reply_text`]
//! turns them into the fixed fallback strings, which are then rendered like
//! any other bot message.

pub mod receive;
pub mod send;

pub use receive::*;
pub use send::*;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Request timeout - the supervisor-bot took too long to respond")]
    Timeout,

    #[error("Connection error - unable to reach {endpoint}")]
    Connection { endpoint: String },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Response is not valid JSON (status {status}): {reason}")]
    InvalidBody { status: u16, reason: String },
}

/// Anything that can answer a user question with a supervisor-style reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(&self, question: &str) -> Result<SupervisorReply, ClientError>;
}
