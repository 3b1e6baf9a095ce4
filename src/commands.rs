use crate::llm::ChatBackend;
use crate::postprocessing::{
    HtmlView, MessageComposer, MessageView, RenderedMessage, TerminalView, GREETING,
};
use crate::session::{ChatSession, Feedback, TranscriptEntry};
use clap::ValueEnum;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text with list markers.
    #[default]
    Terminal,
    /// Markup as injected into the web chat window.
    Html,
    /// The rendered message as JSON.
    Json,
}

pub fn render(message: &RenderedMessage, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Terminal => Ok(TerminalView.render(message)),
        OutputFormat::Html => Ok(HtmlView.render(message)),
        OutputFormat::Json => serde_json::to_string_pretty(message),
    }
}

/* ---------- 1.  OFFLINE ---------- */

pub fn format_reply(
    raw: &str,
    show_agent_header: bool,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    render(&MessageComposer::compose(raw, show_agent_header), format)
}

/* ---------- 2.  ONE-SHOT ---------- */

pub async fn ask_once<B>(
    backend: &B,
    question: &str,
    show_agent_header: bool,
    format: OutputFormat,
) -> anyhow::Result<String>
where
    B: ChatBackend + ?Sized,
{
    let mut session = ChatSession::new();
    let message = session
        .send(question, backend, show_agent_header)
        .await
        .ok_or_else(|| anyhow::anyhow!("Question is empty"))?;
    Ok(render(&message, format)?)
}

/* ---------- 3.  INTERACTIVE ---------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Send(String),
    Suggestion(usize),
    New,
    Chats,
    Switch(usize),
    Feedback(Feedback),
    Help,
    Quit,
    Unknown(String),
}

/// Chat numbers and suggestion numbers are one-based on the command line.
pub fn parse_command(line: &str) -> ChatCommand {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return ChatCommand::Send(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let index = parts
        .next()
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .map(|n| n - 1);

    match (name, index) {
        ("new", _) => ChatCommand::New,
        ("chats", _) => ChatCommand::Chats,
        ("switch", Some(i)) => ChatCommand::Switch(i),
        ("use", Some(i)) => ChatCommand::Suggestion(i),
        ("like", _) => ChatCommand::Feedback(Feedback::Like),
        ("dislike", _) => ChatCommand::Feedback(Feedback::Dislike),
        ("help", _) => ChatCommand::Help,
        ("quit" | "exit", _) => ChatCommand::Quit,
        _ => ChatCommand::Unknown(trimmed.to_string()),
    }
}

const HELP: &str = "Commands: /new, /chats, /switch <n>, /use <n>, /like, /dislike, /help, /quit";
const TYPING: &str = "Supervisor-bot is typing...";

fn write_greeting<W: Write>(session: &ChatSession, out: &mut W, show_agent_header: bool) -> std::io::Result<()> {
    writeln!(out, "{}", TerminalView.render(&MessageComposer::compose(GREETING, show_agent_header)))?;
    if session.show_suggestions() {
        writeln!(out, "Try one of these (/use <n>):")?;
        for (i, suggestion) in session.suggestions().iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, suggestion)?;
        }
    }
    Ok(())
}

fn write_transcript<W: Write>(session: &ChatSession, out: &mut W, show_agent_header: bool) -> std::io::Result<()> {
    if !session.has_started() {
        return write_greeting(session, out, show_agent_header);
    }
    for entry in session.render_active(show_agent_header) {
        match entry {
            TranscriptEntry::User { text, time, .. } => {
                writeln!(out, "> {}{}", text, time.map(|t| format!("  ({t})")).unwrap_or_default())?
            }
            TranscriptEntry::Bot { message, .. } => writeln!(out, "{}\n", TerminalView.render(&message))?,
        }
    }
    Ok(())
}

/// Reads user lines from `input` until EOF or `/quit`, writing rendered
/// replies to `out`.
pub async fn run_chat<B, R, W>(
    backend: &B,
    input: R,
    out: &mut W,
    show_agent_header: bool,
) -> anyhow::Result<ChatSession>
where
    B: ChatBackend + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = ChatSession::new();
    let mut lines = input.lines();

    writeln!(out, "BotBridge. {HELP}")?;
    write_greeting(&session, out, show_agent_header)?;

    while let Some(line) = lines.next_line().await? {
        let question = match parse_command(&line) {
            ChatCommand::Send(text) => text,
            ChatCommand::Suggestion(i) => match session.suggestions().get(i) {
                Some(s) if session.show_suggestions() => s.to_string(),
                _ => {
                    writeln!(out, "No suggestion {} available.", i + 1)?;
                    continue;
                }
            },
            ChatCommand::New => {
                let index = session.new_chat();
                writeln!(out, "Started {}.", session.chats()[index].title)?;
                write_greeting(&session, out, show_agent_header)?;
                continue;
            }
            ChatCommand::Chats => {
                for (i, chat) in session.chats().iter().enumerate() {
                    let marker = if i == session.active_index() { "*" } else { " " };
                    writeln!(out, "{marker} {}) {}", i + 1, chat.title)?;
                }
                continue;
            }
            ChatCommand::Switch(i) => {
                match session.select_chat(i) {
                    Ok(()) => write_transcript(&session, out, show_agent_header)?,
                    Err(e) => writeln!(out, "{e}")?,
                }
                continue;
            }
            ChatCommand::Feedback(feedback) => {
                let result = session
                    .last_reply_id()
                    .map(|id| session.record_feedback(id, feedback));
                match result {
                    Some(Ok(_)) => writeln!(out, "Thanks for the feedback.")?,
                    Some(Err(e)) => writeln!(out, "{e}")?,
                    None => writeln!(out, "Nothing to rate yet.")?,
                }
                continue;
            }
            ChatCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            ChatCommand::Quit => break,
            ChatCommand::Unknown(command) => {
                writeln!(out, "Unknown command {command}. {HELP}")?;
                continue;
            }
        };

        if question.trim().is_empty() {
            continue;
        }
        writeln!(out, "{TYPING}")?;
        out.flush()?;

        if let Some(message) = session.send(&question, backend, show_agent_header).await {
            writeln!(out, "{}\n", TerminalView.render(&message))?;
        }
    }

    info!(chats = session.chats().len(), "Chat ended");
    Ok(session)
}
