use super::*;
use crate::llm::{ChatBackend, ClientError, SupervisorReply, CONNECTION_ERROR, NO_RESPONSE};
use crate::postprocessing::{AgentKind, DisplayBlock, GREETING};
use async_trait::async_trait;
use std::sync::Mutex;

/// Answers every question with the same canned result.
struct CannedBackend {
    reply: Option<String>,
    fail: bool,
    questions: Mutex<Vec<String>>,
}

impl CannedBackend {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            fail: false,
            questions: Mutex::new(Vec::new()),
        }
    }

    fn silent() -> Self {
        Self {
            reply: None,
            fail: false,
            questions: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: None,
            fail: true,
            questions: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatBackend for CannedBackend {
    async fn ask(&self, question: &str) -> Result<SupervisorReply, ClientError> {
        self.questions.lock().unwrap().push(question.to_string());
        if self.fail {
            return Err(ClientError::Timeout);
        }
        Ok(SupervisorReply {
            reply: self.reply.clone(),
            error: None,
        })
    }
}

#[test]
fn fresh_session_shows_greeting_and_suggestions() {
    let session = ChatSession::new();

    assert_eq!(session.chats().len(), 1);
    assert_eq!(session.active_chat().title, "Chat 1");
    assert_eq!(session.active_chat().messages.len(), 1);
    assert_eq!(session.active_chat().messages[0].text, GREETING);
    assert!(session.active_chat().messages[0].time.is_none());
    assert!(!session.has_started());
    assert!(session.show_suggestions());
    assert_eq!(session.suggestions().len(), 5);
    assert!(session.last_reply_id().is_none());
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let mut session = ChatSession::new();
    let backend = CannedBackend::replying("unused");

    assert!(session.send("   \n", &backend, true).await.is_none());
    assert_eq!(session.active_chat().messages.len(), 1);
    assert!(backend.questions.lock().unwrap().is_empty());
    assert!(session.show_suggestions());
}

#[tokio::test]
async fn send_records_both_sides() {
    let mut session = ChatSession::new();
    let backend = CannedBackend::replying("[Medicine Bot] **Dosage:**\n* take 1 tablet");

    let rendered = session.send("How much?", &backend, true).await.unwrap();

    assert_eq!(rendered.agent.kind, AgentKind::Medicine);
    assert!(rendered.header.is_some());
    assert_eq!(rendered.blocks.len(), 2);
    assert_eq!(*backend.questions.lock().unwrap(), vec!["How much?".to_string()]);

    let messages = &session.active_chat().messages;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].sender, Sender::User);
    assert_eq!(messages[1].text, "How much?");
    assert_eq!(messages[2].sender, Sender::Bot);
    assert!(messages[2].text.starts_with("[Medicine Bot]"));
    assert!(messages[2].time.as_deref().is_some_and(|t| t.len() == 5));
    assert!(session.has_started());
    assert!(!session.show_suggestions());
}

#[tokio::test]
async fn failures_are_rendered_as_fallback_text() {
    let mut session = ChatSession::new();

    let rendered = session.send("hi", &CannedBackend::failing(), true).await.unwrap();
    assert_eq!(
        rendered.blocks,
        vec![DisplayBlock::Paragraph { html: CONNECTION_ERROR.into() }]
    );
    assert!(rendered.show_feedback);

    let rendered = session.send("again", &CannedBackend::silent(), true).await.unwrap();
    assert_eq!(rendered.blocks, vec![DisplayBlock::Paragraph { html: NO_RESPONSE.into() }]);
    assert_eq!(session.active_chat().messages.len(), 5);
}

#[tokio::test]
async fn switching_chats_restores_view_flags() {
    let mut session = ChatSession::new();
    session.send("first", &CannedBackend::replying("ok"), false).await;

    let second = session.new_chat();
    assert_eq!(second, 1);
    assert_eq!(session.active_chat().title, "Chat 2");
    assert!(!session.has_started());
    assert!(session.show_suggestions());

    session.select_chat(0).unwrap();
    assert_eq!(session.active_index(), 0);
    assert!(session.has_started());
    assert!(!session.show_suggestions());

    session.select_chat(1).unwrap();
    assert!(!session.has_started());
    assert!(session.show_suggestions());

    assert_eq!(session.select_chat(7), Err(SessionError::NoSuchChat(7)));
    assert_eq!(session.active_index(), 1);
}

#[tokio::test]
async fn transcript_composes_bot_messages() {
    let mut session = ChatSession::new();
    session.send("plan", &CannedBackend::replying("1. Pack\n2. Go"), true).await;

    let transcript = session.render_active(true);
    assert_eq!(transcript.len(), 3);
    match &transcript[0] {
        TranscriptEntry::Bot { message, time, .. } => {
            assert!(!message.show_feedback);
            assert!(time.is_none());
        }
        other => panic!("expected greeting, got {other:?}"),
    }
    assert!(matches!(&transcript[1], TranscriptEntry::User { text, .. } if text == "plan"));
    match &transcript[2] {
        TranscriptEntry::Bot { message, .. } => {
            assert!(matches!(message.blocks[0], DisplayBlock::NumberedList { .. }));
        }
        other => panic!("expected reply, got {other:?}"),
    }
}

#[tokio::test]
async fn feedback_is_acknowledged_without_changes() {
    let mut session = ChatSession::new();
    session.send("hi", &CannedBackend::replying("Hello there."), true).await;

    let reply_id = session.last_reply_id().unwrap();
    let before = session.active_chat().clone();
    let ack = session.record_feedback(reply_id, Feedback::Like).unwrap();

    assert_eq!(ack, FeedbackAck { message_id: reply_id, feedback: Feedback::Like });
    assert_eq!(session.active_chat(), &before);

    let greeting_id = session.active_chat().messages[0].id;
    let user_id = session.active_chat().messages[1].id;
    assert_eq!(
        session.record_feedback(greeting_id, Feedback::Dislike),
        Err(SessionError::FeedbackNotOffered(greeting_id))
    );
    assert_eq!(
        session.record_feedback(user_id, Feedback::Like),
        Err(SessionError::FeedbackNotOffered(user_id))
    );

    let unknown = uuid::Uuid::new_v4();
    assert_eq!(
        session.record_feedback(unknown, Feedback::Like),
        Err(SessionError::NoSuchMessage(unknown))
    );
}
