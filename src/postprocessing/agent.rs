//! Detects which specialist bot answered from the optional `[Agent Name]` prefix.

use serde::{Deserialize, Serialize};

cached_regex!(tag_regex, r"^\[([^\]]+)\]\s*");

/// Display name used when a reply carries no tag.
pub const DEFAULT_AGENT_NAME: &str = "Assistant";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Medicine,
    Compliance,
    Regulation,
    Traveller,
    General,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Medicine => "medicine",
            AgentKind::Compliance => "compliance",
            AgentKind::Regulation => "regulation",
            AgentKind::Traveller => "traveller",
            AgentKind::General => "general",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AgentKind::Medicine => "💊",
            AgentKind::Compliance => "📋",
            AgentKind::Regulation => "⚖️",
            AgentKind::Traveller => "✈️",
            AgentKind::General => "🤖",
        }
    }

    /// Fixed display name of the specialist bots. `General` keeps whatever
    /// the tag said, so it has none.
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            AgentKind::Medicine => Some("Medicine Bot"),
            AgentKind::Compliance => Some("Compliance Bot"),
            AgentKind::Regulation => Some("Regulation Bot"),
            AgentKind::Traveller => Some("Traveller Bot"),
            AgentKind::General => None,
        }
    }
}

/// Evaluated top to bottom, first hit wins. Matching is plain substring
/// containment, so "paramedical" still lands on `Medicine`.
const CLASSIFICATION_RULES: &[(&[&str], AgentKind)] = &[
    (&["medicine", "medical"], AgentKind::Medicine),
    (&["compliance", "quality"], AgentKind::Compliance),
    (&["regulation", "regulatory", "legal"], AgentKind::Regulation),
    (&["traveller", "travel", "trip"], AgentKind::Traveller),
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AgentKind,
    pub icon: String,
    pub id: String,
}

impl Agent {
    pub fn new(kind: AgentKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            icon: kind.icon().to_string(),
            id: kind.as_str().to_string(),
        }
    }

    /// The agent used for untagged replies.
    pub fn assistant() -> Self {
        Self::new(AgentKind::General, DEFAULT_AGENT_NAME)
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_AGENT_NAME
    }

    /// Maps a tag such as `Medical Advisor` to its agent.
    pub fn classify(tag: &str) -> Self {
        let lowered = tag.to_lowercase();

        let kind = CLASSIFICATION_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(_, kind)| *kind)
            .unwrap_or(AgentKind::General);

        match kind.display_name() {
            Some(name) => Self::new(kind, name),
            None => Self::new(kind, tag),
        }
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::assistant()
    }
}

pub struct AgentExtractor;

impl AgentExtractor {
    /// Splits a raw reply into its agent and the text that follows the tag.
    pub fn extract(raw: &str) -> (Agent, String) {
        match tag_regex().captures(raw) {
            Some(caps) => {
                let tag = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                let consumed = caps.get(0).map(|m| m.end()).unwrap_or(0);
                (Agent::classify(tag), raw[consumed..].to_string())
            }
            None => (Agent::assistant(), raw.to_string()),
        }
    }
}
