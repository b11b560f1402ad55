//! Search-engine metadata.
//!
//! Pure functions: keyword extraction, description and title shaping, meta
//! tags, JSON-LD, breadcrumbs, `sitemap.xml`, `robots.txt`, and the checks
//! behind `doc-builder seo-check`. Nothing here touches global state; the
//! only filesystem access is [`sitemap_pages`] and [`check_path`], which read
//! a finished output tree.

use crate::config::Config;
use crate::metadata::{self, truncate_at_word};
use crate::naming;
use crate::types::FrontMatter;
use maud::{Markup, PreEscaped, html};
use regex::Regex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Search results cut titles beyond this.
pub const MAX_TITLE_LEN: usize = 60;
/// Search results cut descriptions beyond this.
pub const MAX_DESCRIPTION_LEN: usize = 160;

/// Generated pages that never belong in a sitemap.
pub const EXCLUDED_PAGES: &[&str] = &["login.html", "logout.html", "404.html"];

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to", "for",
    "of", "as", "by", "that", "this", "it", "from", "be", "are", "been", "was", "were", "being",
    "you", "your", "can", "will", "not", "have", "has", "all", "any", "use", "using", "into",
    "when", "then", "than", "also", "each", "more", "its", "our", "their", "there", "these",
    "those", "what", "how", "should", "would", "could",
];

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]*`").unwrap());
static HEADING_MARK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s+(.+)$").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_~]").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-z]{3,}\b").unwrap());
static FIRST_SENTENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^.!?]+[.!?]").unwrap());

// =============================================================================
// Text shaping
// =============================================================================

/// Most frequent non-stop-words of three or more letters, ties in order of
/// first appearance.
pub fn extract_keywords(markdown: &str, max: usize) -> Vec<String> {
    let text = CODE_BLOCK.replace_all(markdown, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = HEADING_MARK.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = EMPHASIS.replace_all(&text, "").to_lowercase();

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (i, m) in WORD.find_iter(&text).enumerate() {
        let word = m.as_str();
        if STOP_WORDS.contains(&word) {
            continue;
        }
        counts.entry(word).or_insert((0, i)).0 += 1;
    }
    let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
    ranked.into_iter().take(max).map(|(w, _)| w.to_string()).collect()
}

/// First sentence of the plain text, headings read as sentences, cut to `max_len`.
pub fn generate_description(markdown: &str, max_len: usize) -> String {
    let text = CODE_BLOCK.replace_all(markdown, "");
    let text = HEADING_MARK.replace_all(&text, "$1. ");
    let text = LINK.replace_all(&text, "$1");
    let text = EMPHASIS.replace_all(&text, "");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let sentence = FIRST_SENTENCE
        .find(&text)
        .map_or(text.as_str(), |m| m.as_str());
    truncate_at_word(sentence.trim(), max_len)
}

/// Meta description for a page.
///
/// Front-matter `description` wins. Otherwise `smart` uses the document
/// summary rules and `first-paragraph` takes the opening sentence. The site
/// description is the last resort.
pub fn page_description(front: &FrontMatter, body: &str, config: &Config) -> String {
    let derived = match config.seo.description_fallback.as_str() {
        "first-paragraph" => Some(generate_description(body, MAX_DESCRIPTION_LEN)),
        _ => metadata::extract_summary(front, body, MAX_DESCRIPTION_LEN),
    };
    metadata::resolve(&[
        front.description.as_deref(),
        derived.as_deref(),
        Some(config.site_description.as_str()),
    ])
    .map(|d| truncate_at_word(&d, MAX_DESCRIPTION_LEN))
    .unwrap_or_default()
}

/// Global keywords, then front-matter keywords, then auto-extracted ones,
/// deduplicated case-insensitively and capped at `limit`.
pub fn merge_keywords(global: &[String], front: &[String], auto: &[String], limit: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for kw in global.iter().chain(front).chain(auto) {
        let kw = kw.trim();
        if kw.is_empty() || out.iter().any(|k| k.eq_ignore_ascii_case(kw)) {
            continue;
        }
        out.push(kw.to_string());
        if out.len() == limit {
            break;
        }
    }
    out
}

/// Fill the title template, keeping the result within [`MAX_TITLE_LEN`].
///
/// When the filled template is too long the page title is kept on its own;
/// when even that is too long it is cut at a word boundary.
pub fn page_title(template: &str, page_title: &str, site_name: &str) -> String {
    let full = template
        .replace("{pageTitle}", page_title)
        .replace("{siteName}", site_name);
    if full.chars().count() <= MAX_TITLE_LEN {
        return full;
    }
    truncate_at_word(page_title, MAX_TITLE_LEN)
}

// =============================================================================
// Breadcrumbs
// =============================================================================

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    pub name: String,
    /// Site-root-relative target; `Some("")` is the home page, `None` when
    /// the folder has no page of its own.
    pub path: Option<String>,
}

/// Home › folder › … › page for the page at `url_path`.
///
/// `has_page` reports whether a URL path is generated, so folder crumbs can
/// link to their README when there is one.
pub fn breadcrumbs(
    url_path: &str,
    title: &str,
    home_label: &str,
    has_page: impl Fn(&str) -> bool,
) -> Vec<Breadcrumb> {
    let mut trail = vec![Breadcrumb {
        name: home_label.to_string(),
        path: Some(String::new()),
    }];
    if url_path == "index.html" {
        return trail;
    }
    let parts: Vec<&str> = url_path.split('/').collect();
    let Some((page, folders)) = parts.split_last() else {
        return trail;
    };
    let mut prefix = String::new();
    for folder in folders {
        prefix.push_str(folder);
        prefix.push('/');
        let readme = format!("{prefix}README.html");
        let path = has_page(&readme).then_some(readme);
        trail.push(Breadcrumb {
            name: naming::folder_display_name(folder),
            path,
        });
    }
    if !page.is_empty() {
        trail.push(Breadcrumb {
            name: title.to_string(),
            path: Some(url_path.to_string()),
        });
    }
    trail
}

// =============================================================================
// Head markup
// =============================================================================

/// Everything the head needs to describe one page.
#[derive(Debug, Clone)]
pub struct PageSeo {
    /// Final `<title>` text.
    pub title: String,
    /// Document title, used as the article headline.
    pub headline: String,
    pub description: String,
    /// Absolute canonical URL.
    pub canonical: String,
    pub keywords: Vec<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    /// RFC 3339 modification time of the source.
    pub modified: Option<String>,
}

/// Canonical URL of a page: site URL plus URL path; the home page maps to `/`.
pub fn canonical_url(site_url: &str, url_path: &str) -> String {
    let site = site_url.trim_end_matches('/');
    if url_path == "index.html" {
        format!("{site}/")
    } else {
        format!("{site}/{url_path}")
    }
}

fn absolute_url(site_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}/{}", site_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Keywords, robots, canonical, Open Graph, Twitter Card, and custom tags.
pub fn meta_tags(page: &PageSeo, config: &Config, site_url: &str) -> Markup {
    let seo = &config.seo;
    let og_image = seo.og_image.as_deref().map(|img| absolute_url(site_url, img));
    let handle = seo.twitter_handle.as_deref().map(|h| {
        if h.starts_with('@') {
            h.to_string()
        } else {
            format!("@{h}")
        }
    });
    html! {
        @if let Some(author) = &seo.author {
            meta name="author" content=(author);
        }
        @if !page.keywords.is_empty() {
            meta name="keywords" content=(page.keywords.join(", "));
        }
        meta name="robots" content="index, follow";
        link rel="canonical" href=(page.canonical);

        meta property="og:type" content="article";
        meta property="og:url" content=(page.canonical);
        meta property="og:title" content=(page.title);
        meta property="og:description" content=(page.description);
        @if let Some(image) = &og_image {
            meta property="og:image" content=(image);
        }
        meta property="og:site_name" content=(config.site_name);
        meta property="og:locale" content=(seo.language.replace('-', "_"));

        @if handle.is_some() || og_image.is_some() {
            meta name="twitter:card" content="summary_large_image";
            @if let Some(handle) = &handle {
                meta name="twitter:site" content=(handle);
                meta name="twitter:creator" content=(handle);
            }
            meta name="twitter:title" content=(page.title);
            meta name="twitter:description" content=(page.description);
            @if let Some(image) = &og_image {
                meta name="twitter:image" content=(image);
            }
        }

        @for tag in &seo.custom_meta_tags {
            @if let Some(name) = &tag.name {
                meta name=(name) content=(tag.content);
            } @else if let Some(property) = &tag.property {
                meta property=(property) content=(tag.content);
            }
        }
    }
}

/// schema.org `TechArticle` with publisher and breadcrumb trail.
pub fn json_ld(page: &PageSeo, config: &Config, site_url: &str) -> Value {
    let mut doc = json!({
        "@context": "https://schema.org",
        "@type": "TechArticle",
        "headline": page.headline,
        "description": page.description,
        "mainEntityOfPage": { "@type": "WebPage", "@id": page.canonical },
    });
    if let Some(author) = &config.seo.author {
        doc["author"] = json!({ "@type": "Person", "name": author });
    }
    if let Some(org) = &config.seo.organization {
        let mut publisher = json!({ "@type": "Organization", "name": org.name });
        if let Some(url) = &org.url {
            publisher["url"] = json!(url);
        }
        if let Some(logo) = &org.logo {
            publisher["logo"] = json!({ "@type": "ImageObject", "url": logo });
        }
        doc["publisher"] = publisher;
    }
    if let Some(modified) = &page.modified {
        doc["dateModified"] = json!(modified);
    }
    if !page.breadcrumbs.is_empty() {
        let items: Vec<Value> = page
            .breadcrumbs
            .iter()
            .enumerate()
            .map(|(i, crumb)| {
                let mut item = json!({
                    "@type": "ListItem",
                    "position": i + 1,
                    "name": crumb.name,
                });
                if let Some(path) = &crumb.path {
                    let target = if path.is_empty() { "index.html" } else { path.as_str() };
                    item["item"] = json!(canonical_url(site_url, target));
                }
                item
            })
            .collect();
        doc["breadcrumb"] = json!({ "@type": "BreadcrumbList", "itemListElement": items });
    }
    doc
}

/// The JSON-LD block as a `<script>` element.
pub fn json_ld_script(value: &Value) -> Markup {
    let body = serde_json::to_string_pretty(value)
        .unwrap_or_default()
        .replace("</", "<\\/");
    html! {
        script type="application/ld+json" { (PreEscaped(body)) }
    }
}

// =============================================================================
// sitemap.xml / robots.txt
// =============================================================================

/// Every generated HTML page under `output_dir` except [`EXCLUDED_PAGES`],
/// as sorted, percent-encoded URL paths.
pub fn sitemap_pages(output_dir: &Path) -> Result<Vec<String>, walkdir::Error> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(output_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(output_dir) else {
            continue;
        };
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if rel.ends_with(".html") && !EXCLUDED_PAGES.contains(&rel.as_str()) {
            pages.push(naming::encode_path(&rel));
        }
    }
    pages.sort();
    Ok(pages)
}

/// One `<url>` per page. The home page is weekly at priority 1.0, guide
/// pages 0.8, everything else monthly at 0.6.
pub fn sitemap_xml(pages: &[String], site_url: &str, lastmod: &str) -> String {
    let site = site_url.trim_end_matches('/');
    let mut lines = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#.to_string(),
    ];
    for page in pages {
        let (priority, changefreq) = if page == "index.html" {
            ("1.0", "weekly")
        } else if page.contains("guide") {
            ("0.8", "monthly")
        } else {
            ("0.6", "monthly")
        };
        lines.push("  <url>".to_string());
        lines.push(format!("    <loc>{}</loc>", xml_escape(&format!("{site}/{page}"))));
        lines.push(format!("    <lastmod>{lastmod}</lastmod>"));
        lines.push(format!("    <changefreq>{changefreq}</changefreq>"));
        lines.push(format!("    <priority>{priority}</priority>"));
        lines.push("  </url>".to_string());
    }
    lines.push("</urlset>".to_string());
    lines.join("\n") + "\n"
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Allow everything, point at the sitemap, and keep auth pages out of indexes.
pub fn robots_txt(site_url: &str, authentication: bool) -> String {
    let mut lines = vec![
        "User-agent: *".to_string(),
        "Allow: /".to_string(),
        String::new(),
        "# Sitemap location".to_string(),
        format!("Sitemap: {}/sitemap.xml", site_url.trim_end_matches('/')),
    ];
    if authentication {
        lines.push(String::new());
        lines.push("# Authentication pages".to_string());
        lines.push("Disallow: /login.html".to_string());
        lines.push("Disallow: /logout.html".to_string());
    }
    lines.push(String::new());
    lines.join("\n")
}

// =============================================================================
// seo-check
// =============================================================================

static TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<title>(.*?)</title>").unwrap());
static META_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+name="description"\s+content="([^"]*)""#).unwrap()
});
static CANONICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)<link\s+rel="canonical""#).unwrap());
static OG_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)<meta\s+property="og:title""#).unwrap());
static H1_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<h1[\s>]").unwrap());

/// A problem found in one generated page.
#[derive(Debug, Clone, PartialEq)]
pub enum SeoIssue {
    MissingTitle,
    TitleTooLong(usize),
    MissingDescription,
    DescriptionTooLong(usize),
    MissingCanonical,
    MissingOgTitle,
    MissingH1,
    MultipleH1(usize),
}

impl std::fmt::Display for SeoIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeoIssue::MissingTitle => write!(f, "missing <title>"),
            SeoIssue::TitleTooLong(n) => write!(f, "title is {n} characters (max {MAX_TITLE_LEN})"),
            SeoIssue::MissingDescription => write!(f, "missing meta description"),
            SeoIssue::DescriptionTooLong(n) => {
                write!(f, "description is {n} characters (max {MAX_DESCRIPTION_LEN})")
            }
            SeoIssue::MissingCanonical => write!(f, "missing canonical link"),
            SeoIssue::MissingOgTitle => write!(f, "missing og:title"),
            SeoIssue::MissingH1 => write!(f, "no <h1> heading"),
            SeoIssue::MultipleH1(n) => write!(f, "{n} <h1> headings (expected 1)"),
        }
    }
}

/// Inspect one HTML document.
pub fn check_html(html: &str) -> Vec<SeoIssue> {
    let mut issues = Vec::new();
    match TITLE_TAG.captures(html) {
        None => issues.push(SeoIssue::MissingTitle),
        Some(c) => {
            let len = decode_entities(c[1].trim()).chars().count();
            if len > MAX_TITLE_LEN {
                issues.push(SeoIssue::TitleTooLong(len));
            }
        }
    }
    match META_DESCRIPTION.captures(html) {
        Some(c) if !c[1].trim().is_empty() => {
            let len = decode_entities(&c[1]).chars().count();
            if len > MAX_DESCRIPTION_LEN {
                issues.push(SeoIssue::DescriptionTooLong(len));
            }
        }
        _ => issues.push(SeoIssue::MissingDescription),
    }
    if !CANONICAL.is_match(html) {
        issues.push(SeoIssue::MissingCanonical);
    }
    if !OG_TITLE.is_match(html) {
        issues.push(SeoIssue::MissingOgTitle);
    }
    match H1_OPEN.find_iter(html).count() {
        0 => issues.push(SeoIssue::MissingH1),
        1 => {}
        n => issues.push(SeoIssue::MultipleH1(n)),
    }
    issues
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Issues for one file, or for every non-excluded HTML file under a directory.
pub fn check_path(path: &Path) -> std::io::Result<Vec<(String, Vec<SeoIssue>)>> {
    if path.is_file() {
        let html = std::fs::read_to_string(path)?;
        return Ok(vec![(path.display().to_string(), check_html(&html))]);
    }
    let pages = sitemap_pages(path).map_err(std::io::Error::other)?;
    let mut reports = Vec::with_capacity(pages.len());
    for page in pages {
        let rel = naming::source_path_for(&page);
        let rel = rel.strip_suffix(".md").unwrap_or(&rel);
        let html = std::fs::read_to_string(path.join(format!("{rel}.html")))?;
        reports.push((page, check_html(&html)));
    }
    Ok(reports)
}
