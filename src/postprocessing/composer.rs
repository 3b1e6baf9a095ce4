//! Runs extraction, formatting and block rendering for one bot message.

use super::agent::{Agent, AgentExtractor};
use super::formatter::TextFormatter;
use super::renderer::{BlockRenderer, DisplayBlock};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Seed message of every chat. It is shown without feedback controls.
pub const GREETING: &str = "Hello! How can I help you today?";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AgentHeader {
    pub icon: String,
    pub name: String,
    pub badge: String,
}

impl From<&Agent> for AgentHeader {
    fn from(agent: &Agent) -> Self {
        Self {
            icon: agent.icon.clone(),
            name: agent.name.clone(),
            badge: agent.kind.as_str().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub agent: Agent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<AgentHeader>,
    pub blocks: Vec<DisplayBlock>,
    pub show_feedback: bool,
}

pub struct MessageComposer;

impl MessageComposer {
    pub fn compose(raw: &str, show_agent_header: bool) -> RenderedMessage {
        let (agent, remainder) = AgentExtractor::extract(raw);
        let formatted = TextFormatter::format(&remainder);
        let blocks = BlockRenderer::render(&formatted);

        let header = (show_agent_header && !agent.is_default()).then(|| AgentHeader::from(&agent));

        debug!(
            agent = agent.kind.as_str(),
            blocks = blocks.len(),
            header = header.is_some(),
            "Composed bot message"
        );

        RenderedMessage {
            agent,
            header,
            blocks,
            show_feedback: raw != GREETING,
        }
    }
}
