//! Final polish of the assistant response before it reaches the user.
//!
//! ```text
//! raw reply → agent (tag) → formatter (markup) → renderer (blocks) → composer → view
//! ```
//!
//! Every stage is pure; nothing here touches session state or the network.

// Declares `fn $name() -> &'static Regex`, compiled once on first call.
macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            RE.get_or_init(|| ::regex::Regex::new($pattern).expect("Failed to compile regex"))
        }
    };
}

pub mod agent;
pub mod composer;
pub mod formatter;
pub mod renderer;
pub mod traits;
pub mod validator;
pub mod view;

pub use agent::{Agent, AgentExtractor, AgentKind};
pub use composer::{AgentHeader, MessageComposer, RenderedMessage, GREETING};
pub use formatter::TextFormatter;
pub use renderer::{BlockRenderer, DisplayBlock, NumberedItem};
pub use traits::MessageView;
pub use view::{HtmlView, TerminalView};
