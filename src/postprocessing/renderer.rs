//! Splits formatted text into typed display blocks.

use serde::{Deserialize, Serialize};

cached_regex!(section_separator, r"\n[ \t]*\n");
cached_regex!(numbered_item, r"^(\d+)\.\s+(.*)$");
cached_regex!(markup_tag, r"</?[a-zA-Z][a-zA-Z0-9]*>");
// `<h4>` is what label promotion emits; explicit `#` headings of the other
// levels are headings too.
cached_regex!(heading_marker, r"<h[1-4]>");

const BULLET: char = '•';

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NumberedItem {
    pub number: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayBlock {
    Heading { html: String },
    BulletList { items: Vec<String> },
    NumberedList { items: Vec<NumberedItem> },
    Paragraph { html: String },
}

impl DisplayBlock {
    /// Block content with markup tags removed, list items one per line.
    pub fn plain_text(&self) -> String {
        match self {
            DisplayBlock::Heading { html } | DisplayBlock::Paragraph { html } => strip_markup(html),
            DisplayBlock::BulletList { items } => items
                .iter()
                .map(|item| strip_markup(item))
                .collect::<Vec<_>>()
                .join("\n"),
            DisplayBlock::NumberedList { items } => items
                .iter()
                .map(|item| format!("{}. {}", item.number, strip_markup(&item.content)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

pub fn strip_markup(html: &str) -> String {
    markup_tag().replace_all(html, "").into_owned()
}

pub struct BlockRenderer;

impl BlockRenderer {
    pub fn render(formatted: &str) -> Vec<DisplayBlock> {
        section_separator()
            .split(formatted)
            .filter(|section| !section.trim().is_empty())
            .map(Self::classify)
            .collect()
    }

    fn classify(section: &str) -> DisplayBlock {
        if heading_marker().is_match(section) {
            DisplayBlock::Heading { html: section.to_string() }
        } else if section.contains(BULLET) {
            DisplayBlock::BulletList { items: bullet_items(section) }
        } else if numbered_item().is_match(first_line(section)) {
            DisplayBlock::NumberedList { items: numbered_items(section) }
        } else {
            DisplayBlock::Paragraph { html: section.to_string() }
        }
    }
}

fn first_line(section: &str) -> &str {
    section.lines().next().unwrap_or_default()
}

fn append(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(line);
}

/// Lines starting with the bullet open an item; anything else continues the
/// open one. Text before the first bullet becomes an item of its own, and
/// bare bullets leave no item behind.
fn bullet_items(section: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line.strip_prefix(BULLET) {
            Some(rest) => items.push(rest.trim_start().to_string()),
            None => match items.last_mut() {
                Some(open) => append(open, line),
                None => items.push(line.to_string()),
            },
        }
    }

    items.retain(|item| !item.is_empty());
    items
}

fn numbered_items(section: &str) -> Vec<NumberedItem> {
    let mut items: Vec<NumberedItem> = Vec::new();

    for line in section.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match numbered_item().captures(line) {
            Some(caps) => items.push(NumberedItem {
                number: caps[1].to_string(),
                content: caps[2].trim_end().to_string(),
            }),
            None => {
                if let Some(open) = items.last_mut() {
                    append(&mut open.content, line);
                }
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(number: &str, content: &str) -> NumberedItem {
        NumberedItem { number: number.into(), content: content.into() }
    }

    #[test]
    fn plain_sentence_is_a_paragraph() {
        assert_eq!(
            BlockRenderer::render("Just a plain sentence."),
            vec![DisplayBlock::Paragraph { html: "Just a plain sentence.".into() }]
        );
    }

    #[test]
    fn blank_sections_are_dropped() {
        assert!(BlockRenderer::render("").is_empty());
        assert_eq!(BlockRenderer::render("a\n\n \n\nb").len(), 2);
    }

    #[test]
    fn heading_takes_priority() {
        let blocks = BlockRenderer::render("<h4>Dosage:</h4>\n\n• Take 1 tablet\n• Twice daily");
        assert_eq!(
            blocks,
            vec![
                DisplayBlock::Heading { html: "<h4>Dosage:</h4>".into() },
                DisplayBlock::BulletList { items: vec!["Take 1 tablet".into(), "Twice daily".into()] },
            ]
        );
    }

    #[test]
    fn explicit_headings_of_any_level() {
        assert_eq!(
            BlockRenderer::render("<h2>Rules</h2>"),
            vec![DisplayBlock::Heading { html: "<h2>Rules</h2>".into() }]
        );
    }

    #[test]
    fn bullet_continuation_lines_join_the_open_item() {
        let blocks = BlockRenderer::render("Options\n• Train to\nthe city\n• Bus");
        assert_eq!(
            blocks,
            vec![DisplayBlock::BulletList {
                items: vec!["Options".into(), "Train to the city".into(), "Bus".into()]
            }]
        );
    }

    #[test]
    fn bare_bullets_are_skipped() {
        assert_eq!(
            BlockRenderer::render("• \n• b\n•"),
            vec![DisplayBlock::BulletList { items: vec!["b".into()] }]
        );
        assert_eq!(
            BlockRenderer::render("•"),
            vec![DisplayBlock::BulletList { items: vec![] }]
        );
        assert_eq!(
            BlockRenderer::render("•\nlate text"),
            vec![DisplayBlock::BulletList { items: vec!["late text".into()] }]
        );
    }

    #[test]
    fn numbered_lists_keep_their_numbers() {
        let blocks = BlockRenderer::render("1. First step\n2. Second step\n   with detail\n5. Fifth");
        assert_eq!(
            blocks,
            vec![DisplayBlock::NumberedList {
                items: vec![
                    item("1", "First step"),
                    item("2", "Second step with detail"),
                    item("5", "Fifth"),
                ]
            }]
        );
    }

    #[test]
    fn numbers_mid_section_do_not_make_a_list() {
        let blocks = BlockRenderer::render("See below\n1. One");
        assert!(matches!(blocks[0], DisplayBlock::Paragraph { .. }));
    }

    #[test]
    fn blocks_serialize_with_type_tags() {
        let json = serde_json::to_value(DisplayBlock::NumberedList { items: vec![item("1", "a")] }).unwrap();
        assert_eq!(json["type"], "numbered_list");
        assert_eq!(json["items"][0]["number"], "1");
    }

    #[test]
    fn no_content_is_dropped() {
        let formatted = "<h4>Plan:</h4>\n\nIntro with <strong>bold</strong> text\n\n• Pack light\ncarry-on only\n• Book early\n\n1. Check in\n2. Board";
        let rendered: Vec<String> = BlockRenderer::render(formatted)
            .iter()
            .map(DisplayBlock::plain_text)
            .collect();

        let words = |s: &str| {
            strip_markup(s)
                .replace(BULLET, " ")
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        assert_eq!(words(&rendered.join("\n")), words(formatted));
    }
}
