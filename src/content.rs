//! Markdown → HTML body transformation.
//!
//! One call per document: front matter is split off, title and summary are
//! resolved through [`crate::metadata`], the body goes through pulldown-cmark,
//! and known emoji are swapped for icon markup.
//!
//! ## Mermaid diagrams
//!
//! ````text
//! ```mermaid
//! graph TD["Request flow"]
//! A --> B
//! ```
//! ````
//!
//! becomes a `div.mermaid-wrapper` holding a `div.mermaid-title` ("Request
//! flow") and the diagram source in a `div.mermaid` for the client renderer.
//! The block is intercepted in the parser's event stream so the diagram
//! source never goes through paragraph or inline processing.

use crate::icons::{EmojiTable, IconStyle};
use crate::metadata::{self, MetadataError, SUMMARY_MAX_LEN};
use crate::naming;
use crate::types::FrontMatter;
use maud::html;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html as md_html};
use regex::Regex;
use std::sync::LazyLock;

/// Title used for a diagram that names none of its own.
const DEFAULT_DIAGRAM_TITLE: &str = "Diagram";

/// Title patterns tried in order against the diagram source.
static DIAGRAM_TITLES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?m)^---[ \t]*\n[ \t]*title:[ \t]*([^\n]+?)[ \t]*\n[ \t]*---",
        r"(?mi)^[ \t]*title[ \t]+([^\n]+)",
        r#"graph[ \t]+\w+\[["']([^"']+)["']\]"#,
        r#"flowchart[ \t]+\w+\[["']([^"']+)["']\]"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Switches for one transformation pass.
#[derive(Debug, Clone, Copy)]
pub struct ContentOptions<'a> {
    pub mermaid: bool,
    pub normalize_title: bool,
    /// Emoji substitution table and style; `None` disables substitution.
    pub emoji: Option<(&'a EmojiTable, &'a IconStyle)>,
}

/// Result of transforming one markdown document.
#[derive(Debug, Clone)]
pub struct TransformedContent {
    pub title: String,
    pub summary: Option<String>,
    pub html: String,
    pub front_matter: FrontMatter,
    /// Markdown body with the front matter removed.
    pub body: String,
}

/// Transform a raw markdown document.
///
/// `file_stem` supplies the fallback title when neither front matter nor a
/// level-1 heading names the document.
pub fn transform(
    raw: &str,
    file_stem: &str,
    options: &ContentOptions,
) -> Result<TransformedContent, MetadataError> {
    let (front_matter, body) = metadata::parse_front_matter(raw)?;
    let title = resolve_title(&front_matter, body, file_stem, options.normalize_title);
    let summary = metadata::extract_summary(&front_matter, body, SUMMARY_MAX_LEN);

    let mut html = markdown_to_html(body, options.mermaid);
    if let Some((table, style)) = options.emoji {
        html = table.replace(&html, style);
    }

    Ok(TransformedContent {
        title,
        summary,
        html,
        front_matter,
        body: body.to_string(),
    })
}

/// Document title: front-matter `title`, then the first `# heading`, then
/// the humanized file stem. Shouting authored titles are rewritten when
/// `normalize`; the file-stem fallback keeps its acronyms as written.
pub fn resolve_title(front: &FrontMatter, body: &str, file_stem: &str, normalize: bool) -> String {
    let heading = metadata::first_heading(body);
    match metadata::resolve(&[front.title.as_deref(), heading.as_deref()]) {
        Some(title) if normalize => naming::normalize_title(&title),
        Some(title) => title,
        None => {
            let fallback = naming::humanize(file_stem);
            if fallback.is_empty() { file_stem.to_string() } else { fallback }
        }
    }
}

/// Render markdown to HTML.
///
/// Single newlines become `<br>` so authored line breaks survive. With
/// `mermaid` on, ```` ```mermaid ```` blocks become diagram containers.
pub fn markdown_to_html(markdown: &str, mermaid: bool) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(markdown, options);

    let mut events = Vec::new();
    let mut diagram: Option<String> = None;
    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info)))
                if mermaid && info.split_whitespace().next() == Some("mermaid") =>
            {
                diagram = Some(String::new());
            }
            Event::Text(text) if diagram.is_some() => {
                if let Some(src) = diagram.as_mut() {
                    src.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) if diagram.is_some() => {
                let src = diagram.take().unwrap_or_default();
                events.push(Event::Html(diagram_markup(&src).into()));
            }
            Event::SoftBreak => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut out, events.into_iter());
    out
}

fn diagram_markup(src: &str) -> String {
    let title = diagram_title(src);
    let markup = html! {
        div.mermaid-wrapper {
            div.mermaid-title { (title) }
            div.mermaid { (src.trim()) }
        }
    };
    format!("{}\n", markup.into_string())
}

/// Title for a mermaid diagram, from its own source when it declares one.
pub fn diagram_title(src: &str) -> String {
    DIAGRAM_TITLES
        .iter()
        .find_map(|re| re.captures(src).map(|c| c[1].trim().to_string()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_DIAGRAM_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain() -> ContentOptions<'static> {
        ContentOptions {
            mermaid: true,
            normalize_title: true,
            emoji: None,
        }
    }

    #[test]
    fn title_prefers_front_matter() {
        let out = transform("---\ntitle: \"X\"\n---\n# Other\n\nBody text.\n", "file", &plain()).unwrap();
        assert_eq!(out.title, "X");
        assert!(out.html.contains("<h1>Other</h1>"));
        assert!(!out.html.contains("title:"));
    }

    #[test]
    fn title_from_first_heading() {
        let out = transform("# Other\n\nBody text.\n", "file", &plain()).unwrap();
        assert_eq!(out.title, "Other");
    }

    #[test]
    fn title_from_file_name() {
        let out = transform("Just some text.\n", "setup-guide", &plain()).unwrap();
        assert_eq!(out.title, "Setup Guide");
        let out = transform("Just some text.\n", "api-FAQ", &plain()).unwrap();
        assert_eq!(out.title, "Api FAQ");
    }

    #[test]
    fn shouting_title_normalized_when_enabled() {
        let out = transform("# GETTING STARTED WITH THE API\n", "x", &plain()).unwrap();
        assert_eq!(out.title, "Getting Started with the Api");

        let raw = ContentOptions {
            normalize_title: false,
            ..plain()
        };
        let out = transform("# GETTING STARTED WITH THE API\n", "x", &raw).unwrap();
        assert_eq!(out.title, "GETTING STARTED WITH THE API");
    }

    #[test]
    fn summary_resolved() {
        let out = transform("# Setup Guide\n\nFollow these steps carefully please.\n", "setup", &plain()).unwrap();
        assert_eq!(out.summary.as_deref(), Some("Follow these steps carefully please."));
    }

    #[test]
    fn mermaid_block_becomes_wrapper() {
        let md = "Intro.\n\n```mermaid\ngraph TD[\"Request flow\"]\nA --> B\n```\n\nAfter.\n";
        let html = markdown_to_html(md, true);
        assert!(html.contains(r#"<div class="mermaid-wrapper">"#), "{html}");
        assert!(html.contains(r#"<div class="mermaid-title">Request flow</div>"#), "{html}");
        assert!(html.contains("A --&gt; B"), "{html}");
        assert!(!html.contains("<pre><code class=\"language-mermaid\">"));
        assert!(!html.contains("<p><div"), "diagram wrapped in a paragraph: {html}");
    }

    #[test]
    fn mermaid_disabled_leaves_code_block() {
        let html = markdown_to_html("```mermaid\nA --> B\n```\n", false);
        assert!(html.contains("language-mermaid"));
        assert!(!html.contains("mermaid-wrapper"));
    }

    #[test]
    fn diagram_titles() {
        assert_eq!(diagram_title("gantt\n    title Release plan\n"), "Release plan");
        assert_eq!(diagram_title("---\ntitle: Data flow\n---\ngraph LR\n"), "Data flow");
        assert_eq!(diagram_title("flowchart LR['Pipeline']\n"), "Pipeline");
        assert_eq!(diagram_title("graph TD\nA-->B\n"), "Diagram");
    }

    #[test]
    fn diagram_title_is_escaped() {
        let html = markdown_to_html("```mermaid\ngantt\ntitle <b>x</b>\n```\n", true);
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }

    #[test]
    fn soft_breaks_become_line_breaks() {
        let html = markdown_to_html("line one\nline two\n", false);
        assert!(html.contains("line one<br />"), "{html}");
    }

    #[test]
    fn gfm_extensions_enabled() {
        let html = markdown_to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done\n\n~~gone~~\n", false);
        assert!(html.contains("<table>"));
        assert!(html.contains("checkbox"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn emoji_substituted_when_table_given() {
        let table = EmojiTable::default();
        let style = IconStyle::default();
        let options = ContentOptions {
            emoji: Some((&table, &style)),
            ..plain()
        };
        let out = transform("# Done\n\nShipped ✅ today.\n", "x", &options).unwrap();
        assert!(out.html.contains("ph-check-circle"));
        assert!(!out.html.contains('✅'));

        let out = transform("# Done\n\nShipped ✅ today.\n", "x", &plain()).unwrap();
        assert!(out.html.contains('✅'));
    }

    #[test]
    fn bad_front_matter_is_an_error() {
        assert!(transform("---\ntitle: [oops\n---\n# T\n", "x", &plain()).is_err());
    }
}
