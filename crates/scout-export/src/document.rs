//! Paginated plain-text rendering of a version history.
//!
//! Layout: a title block, then one section per version record in input
//! order. Decisions under a record are listed by `made_at` (stable on
//! ties). Text is word-wrapped to the configured width and split into
//! pages of `page_lines` body lines, each followed by a `Page N of M`
//! footer. Pages are separated by a form feed.

use chrono::{DateTime, SecondsFormat, Utc};

use scout_core::defaults::PAGE_BREAK;
use scout_core::{Decision, VersionHistory, VersionRecord};

use crate::config::ExportConfig;

const INDENT: &str = "   ";
const BULLET_INDENT: &str = "     ";
const EMPTY_HEADING: &str = "No decisions recorded";

/// Render the whole document, returning the text and its page count.
pub fn render(history: &VersionHistory, config: &ExportConfig) -> (String, usize) {
    let width = config.line_width;
    let mut lines = title_block(history, width);

    if history.is_empty() {
        lines.push(EMPTY_HEADING.to_string());
        lines.push(rule('-', EMPTY_HEADING.len()));
        lines.extend(wrap("This project has no version history yet.", width, "", ""));
    } else {
        for record in &history.records {
            lines.extend(record_section(record, width));
        }
    }

    paginate(lines, config.page_lines)
}

fn title_block(history: &VersionHistory, width: usize) -> Vec<String> {
    let title = match history.project_id() {
        Some(project) => format!("Version history: {}", project),
        None => "Version history".to_string(),
    };
    let mut lines = wrap(&title, width, "", "");
    let underline = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    lines.push(rule('=', underline));
    lines.push(format!(
        "{} versions, {} decisions",
        history.records.len(),
        history.decision_count()
    ));
    lines.push(String::new());
    lines
}

fn record_section(record: &VersionRecord, width: usize) -> Vec<String> {
    let heading = format!("Version {}: {}", record.sequence, record.label);
    let mut lines = wrap(&heading, width, "", "");
    let underline = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    lines.push(rule('-', underline));
    lines.push(format!("Recorded: {}", timestamp(&record.created_at)));
    if let Some(author) = &record.author {
        lines.extend(wrap(&format!("Author: {}", author), width, "", "  "));
    }
    lines.extend(wrap(&format!("Record ID: {}", record.id), width, "", ""));
    lines.push(String::new());

    if record.decisions.is_empty() {
        lines.push(format!("{}(no decisions in this version)", INDENT));
        lines.push(String::new());
        return lines;
    }

    for (n, decision) in chronological(&record.decisions).into_iter().enumerate() {
        lines.extend(decision_entry(n + 1, decision, width));
    }
    lines
}

fn decision_entry(n: usize, decision: &Decision, width: usize) -> Vec<String> {
    let mut lines = wrap(&format!("{}. {}", n, decision.summary), width, INDENT, BULLET_INDENT);
    lines.extend(wrap(
        &format!("Decision ID: {}", decision.id),
        width,
        BULLET_INDENT,
        INDENT,
    ));

    let made = match &decision.author {
        Some(author) => format!("Made: {} by {}", timestamp(&decision.made_at), author),
        None => format!("Made: {}", timestamp(&decision.made_at)),
    };
    lines.extend(wrap(&made, width, BULLET_INDENT, BULLET_INDENT));

    for point in &decision.rationale {
        let first = format!("{}- ", BULLET_INDENT);
        let rest = format!("{}  ", BULLET_INDENT);
        lines.extend(wrap(point, width, &first, &rest));
    }
    if !decision.tags.is_empty() {
        lines.extend(wrap(
            &format!("Tags: {}", decision.tags.join(", ")),
            width,
            BULLET_INDENT,
            BULLET_INDENT,
        ));
    }
    lines.push(String::new());
    lines
}

/// Decisions ordered by `made_at`; equal timestamps keep input order.
fn chronological(decisions: &[Decision]) -> Vec<&Decision> {
    let mut sorted: Vec<&Decision> = decisions.iter().collect();
    sorted.sort_by_key(|d| d.made_at);
    sorted
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn rule(c: char, len: usize) -> String {
    std::iter::repeat(c).take(len.max(1)).collect()
}

/// Greedy word wrap. Words longer than the available width are split.
fn wrap(text: &str, width: usize, first_indent: &str, rest_indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = first_indent.to_string();
    let mut line_len = first_indent.chars().count();
    let mut has_word = false;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let space = usize::from(has_word);
            if line_len + space + word.len() <= width {
                if has_word {
                    line.push(' ');
                }
                line.extend(word.iter());
                line_len += space + word.len();
                has_word = true;
                break;
            }

            if has_word {
                lines.push(std::mem::take(&mut line));
                line = rest_indent.to_string();
                line_len = rest_indent.chars().count();
                has_word = false;
                continue;
            }

            // The word alone overflows an empty line; split it.
            let room = width.saturating_sub(line_len).max(1);
            let tail = word.split_off(room.min(word.len()));
            line.extend(word.iter());
            lines.push(std::mem::take(&mut line));
            line = rest_indent.to_string();
            line_len = rest_indent.chars().count();
            if tail.is_empty() {
                break;
            }
            word = tail;
        }
    }

    if has_word || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn paginate(lines: Vec<String>, page_lines: usize) -> (String, usize) {
    let page_lines = page_lines.max(1);
    let pages: Vec<&[String]> = lines.chunks(page_lines).collect();
    let total = pages.len().max(1);

    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push(PAGE_BREAK);
            out.push('\n');
        }
        for line in page.iter() {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&format!("Page {} of {}\n", i + 1, total));
    }
    (out, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let text = "walkers cancel at the last minute and owners scramble for backup care";
        let lines = wrap(text, 20, "", "  ");
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 20, "line too long: {:?}", line);
        }
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        assert_eq!(rejoined.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap(&"x".repeat(25), 10, "", "");
        assert_eq!(lines, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn test_wrap_empty_text_keeps_indent_line() {
        assert_eq!(wrap("", 40, "  ", ""), vec!["  ".to_string()]);
    }

    #[test]
    fn test_paginate_counts_pages() {
        let lines: Vec<String> = (0..25).map(|i| format!("line {i}")).collect();
        let (text, pages) = paginate(lines, 10);
        assert_eq!(pages, 3);
        assert_eq!(text.matches(PAGE_BREAK).count(), 2);
        assert!(text.contains("Page 3 of 3"));
    }

    #[test]
    fn test_chronological_is_stable() {
        let at = Utc::now();
        let a = Decision::new("a").made_at(at);
        let b = Decision::new("b").made_at(at - chrono::Duration::seconds(5));
        let c = Decision::new("c").made_at(at);
        let decisions = vec![a, b, c];

        let order: Vec<&str> = chronological(&decisions)
            .iter()
            .map(|d| d.summary.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }
}
