//! Centralized naming rules for source files, URLs, and titles.
//!
//! Every document gets three derived names from its path:
//!
//! - **URL path**: `guides/Setup Guide.md` → `guides/Setup%20Guide.html`.
//!   Each segment is percent-encoded on its own so `/` stays a separator,
//!   and the mapping reverses exactly ([`source_path_for`]).
//! - **Display name**: the filename stem, used for sidebar sorting.
//! - **Fallback title**: the stem with `-`/`_` turned into spaces and each
//!   word capitalized, unless the word already carries an uppercase letter
//!   (`api-FAQ` → "Api FAQ").
//!
//! Title normalization lives here too: a "shouting" title (more than one
//! word, more than half of its letters uppercase) is rewritten to title case.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left literal in a URL path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Words kept lowercase by [`normalize_title`] unless they open the title.
const GLUE_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "nor", "of", "on", "or", "the", "to",
    "with",
];

/// Derive the output URL path from a docs-relative markdown path.
///
/// - `"README.md"` → `"README.html"`
/// - `"guides/setup.md"` → `"guides/setup.html"`
/// - `"my notes/día 1.md"` → `"my%20notes/d%C3%ADa%201.html"`
pub fn url_path_for(relative_path: &str) -> String {
    let without_ext = strip_suffix_ci(relative_path, ".md");
    let encoded: Vec<String> = without_ext
        .split('/')
        .map(|seg| utf8_percent_encode(seg, SEGMENT).to_string())
        .collect();
    format!("{}.html", encoded.join("/"))
}

/// Reverse [`url_path_for`]: decode each segment and swap `.html` for `.md`.
pub fn source_path_for(url_path: &str) -> String {
    let without_ext = url_path.strip_suffix(".html").unwrap_or(url_path);
    let decoded: Vec<String> = without_ext
        .split('/')
        .map(|seg| percent_decode_str(seg).decode_utf8_lossy().into_owned())
        .collect();
    format!("{}.md", decoded.join("/"))
}

/// Percent-encode a docs-relative path of any file type, segment by segment.
pub fn encode_path(relative_path: &str) -> String {
    relative_path
        .split('/')
        .map(|seg| utf8_percent_encode(seg, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> &'a str {
    if s.len() >= suffix.len() && s.is_char_boundary(s.len() - suffix.len()) {
        let (head, tail) = s.split_at(s.len() - suffix.len());
        if tail.eq_ignore_ascii_case(suffix) {
            return head;
        }
    }
    s
}

/// Filename stem of a markdown file: `"setup-guide.md"` → `"setup-guide"`.
pub fn display_name(file_name: &str) -> String {
    strip_suffix_ci(file_name, ".md").to_string()
}

/// Human title from a filename stem.
///
/// - `"setup-guide"` → `"Setup Guide"`
/// - `"api_FAQ"` → `"Api FAQ"` (words with uppercase are kept as-is)
/// - `"iOS-release"` → `"iOS Release"`
pub fn humanize(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            if word.chars().any(char::is_uppercase) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human folder label: `"getting-started"` → `"Getting Started"`.
pub fn folder_display_name(folder: &str) -> String {
    humanize(&percent_decode_str(folder).decode_utf8_lossy())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True when more than one word and more than half the letters are uppercase.
pub fn is_shouting(title: &str) -> bool {
    if title.split_whitespace().count() < 2 {
        return false;
    }
    let (upper, letters) = title
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(u, n), c| {
            (u + usize::from(c.is_uppercase()), n + 1)
        });
    letters > 0 && upper * 2 > letters
}

/// Rewrite a shouting title to title case; leave anything else untouched.
///
/// Idempotent: the output of a rewrite is never itself shouting.
///
/// - `"GETTING STARTED WITH THE API"` → `"Getting Started with the Api"`
/// - `"Getting Started"` → unchanged
pub fn normalize_title(title: &str) -> String {
    if !is_shouting(title) {
        return title.to_string();
    }
    title
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && GLUE_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize(&lower)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
