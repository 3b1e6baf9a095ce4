//! HTML and terminal renderings of a [`RenderedMessage`].

use super::composer::{AgentHeader, RenderedMessage};
use super::renderer::{strip_markup, DisplayBlock};
use super::traits::MessageView;
use super::validator::{escape, sanitize};

/// Markup for the web chat window.
pub struct HtmlView;

impl HtmlView {
    fn header(header: &AgentHeader) -> String {
        format!(
            "<div class=\"agent-header\"><span class=\"agent-icon\">{}</span><span class=\"agent-name\">{}</span><span class=\"agent-badge\">{}</span></div>",
            escape(&header.icon),
            escape(&header.name),
            escape(&header.badge)
        )
    }

    fn block(block: &DisplayBlock) -> String {
        match block {
            DisplayBlock::Heading { html } => sanitize(html),
            DisplayBlock::Paragraph { html } => {
                format!("<p>{}</p>", sanitize(html).replace('\n', "<br>"))
            }
            DisplayBlock::BulletList { items } => {
                let items: String = items
                    .iter()
                    .map(|item| format!("<li>{}</li>", sanitize(item)))
                    .collect();
                format!("<ul>{items}</ul>")
            }
            DisplayBlock::NumberedList { items } => {
                let items: String = items
                    .iter()
                    .map(|item| {
                        format!("<li value=\"{}\">{}</li>", escape(&item.number), sanitize(&item.content))
                    })
                    .collect();
                format!("<ol>{items}</ol>")
            }
        }
    }
}

impl MessageView for HtmlView {
    fn render(&self, message: &RenderedMessage) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(message.blocks.len() + 1);
        if let Some(header) = &message.header {
            parts.push(Self::header(header));
        }
        parts.extend(message.blocks.iter().map(Self::block));
        format!("<div class=\"formatted-response\">{}</div>", parts.join("\n"))
    }
}

/// Plain text for the command-line chat.
pub struct TerminalView;

impl TerminalView {
    fn block(block: &DisplayBlock) -> String {
        match block {
            DisplayBlock::Heading { html } => strip_markup(html).to_uppercase(),
            DisplayBlock::Paragraph { html } => strip_markup(html),
            DisplayBlock::BulletList { items } => items
                .iter()
                .map(|item| format!("  • {}", strip_markup(item)))
                .collect::<Vec<_>>()
                .join("\n"),
            DisplayBlock::NumberedList { items } => items
                .iter()
                .map(|item| format!("  {}. {}", item.number, strip_markup(&item.content)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl MessageView for TerminalView {
    fn render(&self, message: &RenderedMessage) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(message.blocks.len() + 1);
        if let Some(header) = &message.header {
            parts.push(format!("{} {} [{}]", header.icon, header.name, header.badge));
        }
        parts.extend(message.blocks.iter().map(Self::block));
        parts.join("\n\n")
    }
}
