//! Document metadata extraction and resolution.
//!
//! Each document can carry metadata (title, summary, status) from several
//! independent sources, resolved first-non-empty-wins:
//!
//! - **Title**: front-matter `title` → first `# heading` → humanized filename
//! - **Summary**: front-matter `description` → paragraph under an `Overview`
//!   or `Summary` heading → first substantial sentence of the body
//! - **Status**: front-matter `status` → `**Status**:` metadata line →
//!   filename convention → body markers
//!
//! Front matter is authoritative. The later status sources are best-effort
//! heuristics that only run when the author said nothing.

use crate::types::{FrontMatter, Status};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}

/// Tooltip summaries are cut to this many characters.
pub const SUMMARY_MAX_LEN: usize = 150;

static FIRST_H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*#*[ \t]*$").unwrap());
static SUMMARY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^#{1,6}[ \t]+(overview|summary)[ \t]*:?[ \t]*$").unwrap());
static ANY_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s").unwrap());
static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?ms)^(```|~~~).*?^(```|~~~)[^\n]*$").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\*\*|__|\*|~~)").unwrap());
static METADATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(\*\*[^*]{1,40}\*\*\s*:|\*\*[^*]{1,40}:\*\*|(generated|status|verified|last updated|updated|author|version|date)\s*:)",
    )
    .unwrap()
});
static STATUS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^\s*\*\*status\*\*\s*:\s*(.+)$").unwrap());
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([-*+]|\d+[.)])\s+").unwrap());
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?](\s|$)").unwrap());

/// Leading phrases dropped from a fallback summary.
const BOILERPLATE_PREFIXES: &[&str] = &["tl;dr:", "tldr:", "note:", "summary:", "overview:"];

/// Body markers scanned when nothing more explicit sets a status.
/// Ordered; the first marker found wins.
const STATUS_MARKERS: &[(&str, Status)] = &[
    ("❌", Status::Error),
    ("⚠️", Status::Warning),
    ("⚠", Status::Warning),
    ("🚧", Status::Draft),
    ("deprecated", Status::Deprecated),
    ("draft", Status::Draft),
    ("work in progress", Status::Draft),
    ("planning", Status::Planning),
    ("roadmap", Status::Planning),
    ("✅", Status::Complete),
    ("✓", Status::Complete),
];

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value. This is the core merge operation used for
/// title, summary, and description resolution.
///
/// ```text
/// title:   resolve(&[front_matter_title, first_h1, filename_title])
/// summary: resolve(&[front_matter_desc, overview_section, first_sentence])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Split a leading `---` YAML block from the body.
///
/// Returns `(None, raw)` when there is no closed front-matter block.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let Some(rest) = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    else {
        return (None, raw);
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, raw)
}

/// Parse front matter and return it with the remaining body.
pub fn parse_front_matter(raw: &str) -> Result<(FrontMatter, &str), MetadataError> {
    match split_front_matter(raw) {
        (Some(yaml), body) if !yaml.trim().is_empty() => Ok((serde_yaml::from_str(yaml)?, body)),
        (_, body) => Ok((FrontMatter::default(), body)),
    }
}

/// Text of the first level-1 heading, if any.
pub fn first_heading(body: &str) -> Option<String> {
    let without_code = FENCED_CODE.replace_all(body, "");
    FIRST_H1
        .captures(&without_code)
        .map(|c| c[1].trim().to_string())
}

/// Resolve the summary shown in tooltips and used as a description fallback.
pub fn extract_summary(front: &FrontMatter, body: &str, max_len: usize) -> Option<String> {
    let section = section_summary(body);
    let sentence = first_substantial_sentence(body);
    resolve(&[
        front.description.as_deref(),
        section.as_deref(),
        sentence.as_deref(),
    ])
    .map(|s| truncate_at_word(&s, max_len))
}

/// The first paragraph under an `## Overview` or `## Summary` heading.
pub fn section_summary(body: &str) -> Option<String> {
    let body = FENCED_CODE.replace_all(body, "");
    let m = SUMMARY_HEADING.find(&body)?;
    let after = &body[m.end()..];
    let section = match ANY_HEADING.find(after) {
        Some(next) => &after[..next.start()],
        None => after,
    };
    first_paragraph(section)
}

/// The first sentence of the first paragraph that reads like prose.
pub fn first_substantial_sentence(body: &str) -> Option<String> {
    let body = FENCED_CODE.replace_all(body, "");
    let prose: String = body
        .lines()
        .filter(|l| !ANY_HEADING.is_match(l))
        .collect::<Vec<_>>()
        .join("\n");
    prose
        .split("\n\n")
        .filter_map(first_paragraph)
        .find(|p| p.split_whitespace().count() >= 4)
        .map(|p| match SENTENCE_END.find(&p).map(|m| m.start() + 1) {
            Some(end) => p[..end].to_string(),
            None => p,
        })
}

/// Strip markdown from a block and return its first non-empty paragraph.
fn first_paragraph(block: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        if is_noise_line(trimmed) {
            continue;
        }
        lines.push(trimmed);
    }
    let text = strip_markdown(&lines.join(" "));
    let text = strip_boilerplate(&text);
    (!text.is_empty()).then_some(text)
}

fn is_noise_line(line: &str) -> bool {
    METADATA_LINE.is_match(line)
        || line.starts_with('|')
        || line.starts_with("---")
        || line.starts_with("***")
        || line.starts_with("<!--")
}

/// Reduce inline markdown to plain text and collapse whitespace.
pub fn strip_markdown(text: &str) -> String {
    let text = INLINE_CODE.replace_all(text, "");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = HTML_TAG.replace_all(&text, "");
    let text = EMPHASIS.replace_all(&text, "");
    let text = LIST_MARKER.replace_all(&text, "");
    let text = text.trim_start_matches('>');
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_boilerplate(text: &str) -> String {
    let lower = text.to_lowercase();
    for prefix in BOILERPLATE_PREFIXES {
        if lower.starts_with(prefix) {
            return text[prefix.len()..].trim().to_string();
        }
    }
    text.to_string()
}

/// Cut `text` to at most `max_len` characters at a word boundary, adding `...`.
pub fn truncate_at_word(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let budget = max_len.saturating_sub(3);
    let cut: String = text.chars().take(budget).collect();
    let at_word = match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    let at_word = at_word.trim_end_matches(|c: char| c.is_whitespace() || ",;:-".contains(c));
    format!("{at_word}...")
}

/// Detect a document's status; see the module docs for the source order.
pub fn detect_status(front: &FrontMatter, stem: &str, body: &str) -> Status {
    if let Some(status) = front.status.as_deref().and_then(Status::parse) {
        return status;
    }
    if let Some(status) = status_line(body) {
        return status;
    }
    if let Some(status) = status_from_filename(stem) {
        return status;
    }
    status_from_markers(body).unwrap_or_default()
}

/// Parse a `**Status**: Draft – in review` metadata line.
fn status_line(body: &str) -> Option<Status> {
    let caps = STATUS_LINE.captures(body)?;
    let value = strip_markdown(&caps[1]).to_lowercase();
    Status::parse(&value).or_else(|| {
        Status::ALL
            .into_iter()
            .filter(|s| *s != Status::Default)
            .find(|s| value.split(|c: char| !c.is_alphanumeric()).any(|w| w == s.as_str()))
    })
}

fn status_from_filename(stem: &str) -> Option<Status> {
    let lower = stem.to_lowercase();
    if lower == "readme" || lower == "index" {
        Some(Status::Readme)
    } else if lower.contains("troubleshoot") {
        Some(Status::Troubleshoot)
    } else if lower.contains("guide") || lower.contains("tutorial") {
        Some(Status::Guide)
    } else if lower.contains("reference") || lower.starts_with("api") {
        Some(Status::Reference)
    } else {
        None
    }
}

fn status_from_markers(body: &str) -> Option<Status> {
    let body = FENCED_CODE.replace_all(body, "");
    let lower = body.to_lowercase();
    STATUS_MARKERS.iter().find_map(|(marker, status)| {
        let hit = if marker.is_ascii() {
            contains_word(&lower, marker)
        } else {
            lower.contains(marker)
        };
        hit.then_some(*status)
    })
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
