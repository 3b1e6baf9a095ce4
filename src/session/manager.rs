//! High-level session logic: send, switch, new chat, feedback.

use super::message::{Chat, ChatMessage, Sender};
use super::SessionError;
use crate::llm::{reply_text, ChatBackend};
use crate::postprocessing::{MessageComposer, RenderedMessage, GREETING};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

/// Starter prompts offered on an empty chat.
pub const SUGGESTIONS: &[&str] = &[
    "What are the best ways to travel to Indianapolis?",
    "Can you recommend hotels in Indianapolis?",
    "What is the weather like in Indianapolis this week?",
    "Are there any must-see attractions in Indianapolis?",
    "How do I get from the airport to downtown Indianapolis?",
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Like,
    Dislike,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeedbackAck {
    pub message_id: Uuid,
    pub feedback: Feedback,
}

/// A transcript line ready for display.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "sender", rename_all = "lowercase")]
pub enum TranscriptEntry {
    User {
        id: Uuid,
        text: String,
        time: Option<String>,
    },
    Bot {
        id: Uuid,
        message: RenderedMessage,
        time: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    chats: Vec<Chat>,
    active: usize,
    has_started: bool,
    show_suggestions: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            chats: vec![Chat::new(0)],
            active: 0,
            has_started: false,
            show_suggestions: true,
        }
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_chat(&self) -> &Chat {
        &self.chats[self.active]
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn show_suggestions(&self) -> bool {
        self.show_suggestions
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        SUGGESTIONS
    }

    /// Opens a fresh chat and makes it active. Returns its index.
    pub fn new_chat(&mut self) -> usize {
        let index = self.chats.len();
        self.chats.push(Chat::new(index));
        self.active = index;
        self.has_started = false;
        self.show_suggestions = true;
        info!(chat = index, "New chat opened");
        index
    }

    pub fn select_chat(&mut self, index: usize) -> Result<(), SessionError> {
        let chat = self.chats.get(index).ok_or(SessionError::NoSuchChat(index))?;
        let started = chat.has_started();
        self.active = index;
        self.has_started = started;
        self.show_suggestions = !started;
        Ok(())
    }

    /// Sends `input` to `backend` and records both sides of the exchange in
    /// the active chat. Blank input is ignored.
    #[instrument(skip(self, backend), fields(chat = self.active))]
    pub async fn send<B>(
        &mut self,
        input: &str,
        backend: &B,
        show_agent_header: bool,
    ) -> Option<RenderedMessage>
    where
        B: ChatBackend + ?Sized,
    {
        if input.trim().is_empty() {
            return None;
        }

        let chat = self.active;
        self.show_suggestions = false;
        self.chats[chat].messages.push(ChatMessage::user(input));
        self.has_started = true;

        let result = backend.ask(input).await;
        let text = reply_text(&result);
        self.chats[chat].messages.push(ChatMessage::bot(text.as_str()));

        Some(MessageComposer::compose(&text, show_agent_header))
    }

    /// Every message of the active chat, bot messages composed.
    pub fn render_active(&self, show_agent_header: bool) -> Vec<TranscriptEntry> {
        self.active_chat()
            .messages
            .iter()
            .map(|msg| match msg.sender {
                Sender::User => TranscriptEntry::User {
                    id: msg.id,
                    text: msg.text.clone(),
                    time: msg.time.clone(),
                },
                Sender::Bot => TranscriptEntry::Bot {
                    id: msg.id,
                    message: MessageComposer::compose(&msg.text, show_agent_header),
                    time: msg.time.clone(),
                },
            })
            .collect()
    }

    /// Latest bot message of the active chat that offers feedback controls.
    pub fn last_reply_id(&self) -> Option<Uuid> {
        self.active_chat()
            .messages
            .iter()
            .rev()
            .find(|msg| msg.sender == Sender::Bot && msg.text != GREETING)
            .map(|msg| msg.id)
    }

    /// Acknowledges a like or dislike. Nothing in the session changes.
    pub fn record_feedback(
        &self,
        message_id: Uuid,
        feedback: Feedback,
    ) -> Result<FeedbackAck, SessionError> {
        let message = self
            .chats
            .iter()
            .flat_map(|chat| chat.messages.iter())
            .find(|msg| msg.id == message_id)
            .ok_or(SessionError::NoSuchMessage(message_id))?;

        let composed = MessageComposer::compose(&message.text, false);
        if message.sender != Sender::Bot || !composed.show_feedback {
            return Err(SessionError::FeedbackNotOffered(message_id));
        }

        info!(message = %message_id, feedback = ?feedback, agent = composed.agent.kind.as_str(), "Feedback received");
        Ok(FeedbackAck { message_id, feedback })
    }
}
