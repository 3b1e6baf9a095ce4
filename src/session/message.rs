//! Chat message structs, with optional display time.

use crate::postprocessing::GREETING;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    /// Local wall-clock time, `HH:MM`. The seed greeting has none.
    pub time: Option<String>,
}

impl ChatMessage {
    fn stamped(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text: text.into(),
            time: Some(chrono::Local::now().format("%H:%M").to_string()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::stamped(Sender::Bot, text)
    }

    pub fn greeting() -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Bot,
            text: GREETING.to_string(),
            time: None,
        }
    }
}

/// One conversation in the side menu.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub title: String,
    pub messages: Vec<ChatMessage>,
}

impl Chat {
    /// `index` is zero-based; titles count from one.
    pub fn new(index: usize) -> Self {
        Self {
            title: format!("Chat {}", index + 1),
            messages: vec![ChatMessage::greeting()],
        }
    }

    /// Anything beyond the greeting means the user has written here.
    pub fn has_started(&self) -> bool {
        self.messages.len() > 1
    }
}
