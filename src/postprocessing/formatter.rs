//! Normalizes the markdown-ish text bots send back into light HTML markup.
//!
//! Every rule is a standalone pure function so it can be tested on its own;
//! [`TextFormatter::format`] runs them in the order of [`RULES`]. The order is
//! significant: emphasis must be resolved before bullet markers (both use
//! `*`), and headings must be isolated before blank-line runs are collapsed.

use regex::Captures;
use tracing::trace;

/// A single normalization step.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

pub const RULES: &[Rule] = &[
    Rule { name: "normalize_line_endings", apply: normalize_line_endings },
    Rule { name: "strip_asterisk_runs", apply: strip_asterisk_runs },
    Rule { name: "mark_strong", apply: mark_strong },
    Rule { name: "mark_emphasis", apply: mark_emphasis },
    Rule { name: "mark_headings", apply: mark_headings },
    Rule { name: "mark_deep_headings", apply: mark_deep_headings },
    Rule { name: "normalize_bullets", apply: normalize_bullets },
    Rule { name: "normalize_numbering", apply: normalize_numbering },
    Rule { name: "split_inline_numbering", apply: split_inline_numbering },
    Rule { name: "collapse_blank_lines", apply: collapse_blank_lines },
    Rule { name: "collapse_spaces", apply: collapse_spaces },
    Rule { name: "promote_labels", apply: promote_labels },
    Rule { name: "capitalize_items", apply: capitalize_items },
    Rule { name: "trim", apply: trim },
];

pub struct TextFormatter;

impl TextFormatter {
    pub fn format(text: &str) -> String {
        RULES.iter().fold(text.to_string(), |acc, rule| {
            let next = (rule.apply)(&acc);
            if next != acc {
                trace!(rule = rule.name, "formatter rule applied");
            }
            next
        })
    }
}

cached_regex!(asterisk_run_regex, r"\*{3,}");
cached_regex!(strong_regex, r"\*\*([^*\n]+?)\*\*");
cached_regex!(emphasis_regex, r"\*([^*\s](?:[^*\n]*[^*\s])?)\*");
cached_regex!(heading_regex, r"(?m)^(#{1,3})[ \t]+(\S[^\n]*?)[ \t]*$");
cached_regex!(deep_heading_regex, r"(?m)^#{4,}[ \t]+(\S[^\n]*?)[ \t]*$");
cached_regex!(bullet_regex, r"(?m)^[ \t]*[*\-+•][ \t]+");
cached_regex!(numbering_regex, r"(?m)^[ \t]*(\d+)\.[ \t]+");
cached_regex!(numbered_line_regex, r"^\d+\. ");
cached_regex!(inline_number_regex, r"[ \t]+(\d+)\.[ \t]+");
cached_regex!(blank_run_regex, r"\n(?:[ \t]*\n){2,}");
cached_regex!(space_run_regex, r"[^\S\n]{2,}");
cached_regex!(
    label_regex,
    r"^(?:<strong>(\p{Lu}[^<>\n]*:)</strong>|<strong>(\p{Lu}[^<>\n]*)</strong>:|(\p{Lu}[^<>\n]*:))$"
);
cached_regex!(item_start_regex, r"(?m)^(• |\d+\. )(\p{Ll})");

/// Replies occasionally arrive with Windows line endings.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

pub fn strip_asterisk_runs(text: &str) -> String {
    asterisk_run_regex().replace_all(text, "").into_owned()
}

pub fn mark_strong(text: &str) -> String {
    strong_regex()
        .replace_all(text, "<strong>${1}</strong>")
        .into_owned()
}

/// `*text*` becomes emphasis. The delimited text may not start or end with
/// whitespace, which keeps `* item` bullet markers out of it.
pub fn mark_emphasis(text: &str) -> String {
    emphasis_regex().replace_all(text, "<em>${1}</em>").into_owned()
}

fn heading_block(level: usize, content: &str) -> String {
    format!("\n<h{level}>{content}</h{level}>\n")
}

pub fn mark_headings(text: &str) -> String {
    heading_regex()
        .replace_all(text, |caps: &Captures| heading_block(caps[1].len(), &caps[2]))
        .into_owned()
}

pub fn mark_deep_headings(text: &str) -> String {
    deep_heading_regex()
        .replace_all(text, |caps: &Captures| heading_block(4, &caps[1]))
        .into_owned()
}

pub fn normalize_bullets(text: &str) -> String {
    bullet_regex().replace_all(text, "• ").into_owned()
}

pub fn normalize_numbering(text: &str) -> String {
    numbering_regex().replace_all(text, "${1}. ").into_owned()
}

/// `1. Pack 2. Leave` on one line becomes two items.
pub fn split_inline_numbering(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if !numbered_line_regex().is_match(line) {
                return line.to_string();
            }
            let body_start = line.find(". ").map(|i| i + 2).unwrap_or(0);
            let (prefix, body) = line.split_at(body_start);
            let body = inline_number_regex().replace_all(body, "\n${1}. ");
            format!("{prefix}{body}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn collapse_blank_lines(text: &str) -> String {
    blank_run_regex().replace_all(text, "\n\n").into_owned()
}

pub fn collapse_spaces(text: &str) -> String {
    space_run_regex().replace_all(text, " ").into_owned()
}

fn label_heading(line: &str) -> Option<String> {
    let caps = label_regex().captures(line.trim())?;
    let label = match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(inner), _, _) | (_, _, Some(inner)) => inner.as_str().to_string(),
        (_, Some(inner), _) => format!("{}:", inner.as_str()),
        _ => return None,
    };
    Some(format!("<h4>{label}</h4>"))
}

/// A line that is only a capitalized label such as `Dosage:` is turned into a
/// level-4 heading set apart by blank lines. Heuristic: a sentence that
/// happens to end in a colon is promoted too.
pub fn promote_labels(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        match label_heading(line) {
            Some(heading) => {
                if out.last().is_some_and(|prev| !prev.trim().is_empty()) {
                    out.push(String::new());
                }
                out.push(heading);
                if lines.get(i + 1).is_some_and(|next| !next.trim().is_empty()) {
                    out.push(String::new());
                }
            }
            None => out.push(line.to_string()),
        }
    }

    out.join("\n")
}

pub fn capitalize_items(text: &str) -> String {
    item_start_regex()
        .replace_all(text, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].to_uppercase())
        })
        .into_owned()
}

pub fn trim(text: &str) -> String {
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asterisk_runs_disappear() {
        assert_eq!(strip_asterisk_runs("a *** b ****c"), "a  b c");
    }

    #[test]
    fn strong_and_emphasis() {
        assert_eq!(mark_strong("take **two** now"), "take <strong>two</strong> now");
        assert_eq!(mark_emphasis("a *quick* note"), "a <em>quick</em> note");
        assert_eq!(mark_emphasis("* item\n* other"), "* item\n* other");
        assert_eq!(mark_emphasis("2 * 3 * 4"), "2 * 3 * 4");
    }

    #[test]
    fn heading_levels() {
        assert_eq!(mark_headings("# One"), "\n<h1>One</h1>\n");
        assert_eq!(mark_headings("### Three  "), "\n<h3>Three</h3>\n");
        assert_eq!(mark_headings("#### Four"), "#### Four");
        assert_eq!(mark_deep_headings("###### Six"), "\n<h4>Six</h4>\n");
        assert_eq!(mark_headings("#hashtag"), "#hashtag");
    }

    #[test]
    fn bullets_are_unified() {
        assert_eq!(
            normalize_bullets("* a\n- b\n+ c\n•\td\n  - e\n-5 degrees"),
            "• a\n• b\n• c\n• d\n• e\n-5 degrees"
        );
    }

    #[test]
    fn numbering_is_unified() {
        assert_eq!(normalize_numbering("1.   a\n  2.\tb\n3.5 kg"), "1. a\n2. b\n3.5 kg");
    }

    #[test]
    fn run_together_items_are_split() {
        assert_eq!(
            split_inline_numbering("1. Pack 2. Leave  3. Arrive"),
            "1. Pack\n2. Leave\n3. Arrive"
        );
        assert_eq!(split_inline_numbering("Call 1. then 2. later"), "Call 1. then 2. later");
    }

    #[test]
    fn blank_runs_and_spaces_collapse() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\n \n\t\nc"), "a\n\nb\n\nc");
        assert_eq!(collapse_spaces("a   b\t\tc\n\nd"), "a b c\n\nd");
    }

    #[test]
    fn labels_become_headings() {
        assert_eq!(promote_labels("Dosage:\n• One"), "<h4>Dosage:</h4>\n\n• One");
        assert_eq!(promote_labels("<strong>Dosage:</strong>"), "<h4>Dosage:</h4>");
        assert_eq!(promote_labels("Intro\n<strong>Side Effects</strong>:"), "Intro\n\n<h4>Side Effects:</h4>");
        assert_eq!(promote_labels("<em>Note</em> here:"), "<em>Note</em> here:");
        assert_eq!(promote_labels("lowercase:"), "lowercase:");
    }

    #[test]
    fn items_are_capitalized() {
        assert_eq!(capitalize_items("• take\n2. rest\nplain"), "• Take\n2. Rest\nplain");
    }

    #[test]
    fn untouched_text_is_only_trimmed() {
        assert_eq!(TextFormatter::format("  Just a plain sentence.\n"), "Just a plain sentence.");
    }

    #[test]
    fn full_pipeline() {
        let raw = "**Dosage:**\n* take 1 tablet\n*   twice daily\n\n\n\n## Notes\n1. Eat first 2. Drink  water";
        assert_eq!(
            TextFormatter::format(raw),
            "<h4>Dosage:</h4>\n\n• Take 1 tablet\n• Twice daily\n\n<h2>Notes</h2>\n\n1. Eat first\n2. Drink water"
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let samples = [
            "**Dosage:**\n* take 1 tablet\n* twice daily",
            "# Title\nSome *soft* words   here\n\n\n- a\n- b",
            "Steps:\n1. one 2. two\n\n#### Deep\ntext",
            "Intro line\nSummary:\n  + nested",
            "2 * 3 * 4 equals 24",
            "",
        ];
        for sample in samples {
            let once = TextFormatter::format(sample);
            assert_eq!(TextFormatter::format(&once), once, "sample {sample:?}");
        }
    }
}
