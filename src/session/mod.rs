//! Conversation state owned by the front-end.
//! Holds every chat, which one is active, and the view flags derived from
//! it. Bot messages are stored raw and composed on the way out.

pub mod manager;
pub mod message;

pub use manager::*;
pub use message::*;

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("No chat at index {0}")]
    NoSuchChat(usize),
    #[error("No message with id {0}")]
    NoSuchMessage(Uuid),
    #[error("Feedback is not offered for message {0}")]
    FeedbackNotOffered(Uuid),
}

#[cfg(test)]
mod tests;
