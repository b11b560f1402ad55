//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output lists what was produced, page by page, with the filesystem path as
//! the secondary detail after `→`. A build report reads as a content
//! inventory of the site.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 Documentation → README.html
//! 002 Setup Guide → guides/setup.html
//! 003 Notes → private/notes.html (private)
//!
//! Site
//!     index.html: README copy
//!     login.html, logout.html, auth.js
//!     changelog.html
//!     sitemap.xml, robots.txt
//!     Attachments: 2 files (1.5 KB)
//!
//! Generated 3 pages in html/
//! Static mirror: 2 pages in html-static/
//! ```
//!
//! ## SEO check
//!
//! ```text
//! guides/setup.html
//!     title is 72 characters (max 60)
//!     missing meta description
//!
//! Checked 5 pages: 1 with issues, 2 issues total
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::deploy::DeployOutcome;
use crate::generate::{BuildReport, IndexSource, PassReport};
use crate::project::InitReport;
use crate::seo::SeoIssue;
use crate::types::RenderMode;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count: `512 B`, `1.5 KB`, `2.0 MB`.
fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn index_label(source: IndexSource) -> &'static str {
    match source {
        IndexSource::Markdown => "from index.md",
        IndexSource::Readme => "README copy",
        IndexSource::Synthesized => "default landing page",
    }
}

// ============================================================================
// build
// ============================================================================

fn format_pass_summary(pass: &PassReport) -> String {
    let label = match pass.mode {
        RenderMode::Normal => "Generated",
        RenderMode::Static => "Static mirror:",
    };
    format!(
        "{label} {} in {}/",
        plural(pass.pages.len(), "page"),
        pass.output_dir.display()
    )
}

fn format_pass_site(pass: &PassReport) -> Vec<String> {
    let detail = indent(1);
    let mut lines = vec![format!("{detail}index.html: {}", index_label(pass.index))];
    if pass.auth_pages {
        lines.push(format!("{detail}login.html, logout.html, auth.js"));
    }
    if pass.changelog {
        lines.push(format!("{detail}changelog.html"));
    }
    match (pass.sitemap, pass.robots) {
        (true, true) => lines.push(format!("{detail}sitemap.xml, robots.txt")),
        (true, false) => lines.push(format!("{detail}sitemap.xml")),
        (false, true) => lines.push(format!("{detail}robots.txt")),
        (false, false) => {}
    }
    if pass.attachments > 0 {
        lines.push(format!(
            "{detail}Attachments: {} ({})",
            plural(pass.attachments, "file"),
            human_bytes(pass.attachment_bytes)
        ));
    }
    lines
}

/// Format the report of a `build`.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.placeholder_created {
        lines.push("Created placeholder README.md in the docs directory".to_string());
        lines.push(String::new());
    }

    lines.push("Pages".to_string());
    for (i, page) in report.main.pages.iter().enumerate() {
        let private = if page.is_private { " (private)" } else { "" };
        lines.push(format!(
            "{} {} \u{2192} {}{private}",
            format_index(i + 1),
            page.title,
            page.url_path
        ));
    }

    lines.push(String::new());
    lines.push("Site".to_string());
    lines.extend(format_pass_site(&report.main));

    lines.push(String::new());
    lines.push(format_pass_summary(&report.main));
    if let Some(mirror) = &report.static_mirror {
        lines.push(format_pass_summary(mirror));
    }
    lines
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// seo-check
// ============================================================================

/// Format `seo-check` results: each page with problems, then a tally.
pub fn format_seo_report(results: &[(String, Vec<SeoIssue>)]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut flagged = 0;
    let mut total = 0;
    for (page, issues) in results.iter().filter(|(_, issues)| !issues.is_empty()) {
        flagged += 1;
        total += issues.len();
        lines.push(page.clone());
        for issue in issues {
            lines.push(format!("{}{issue}", indent(1)));
        }
        lines.push(String::new());
    }

    if flagged == 0 {
        lines.push(format!(
            "Checked {}: no issues found",
            plural(results.len(), "page")
        ));
    } else {
        lines.push(format!(
            "Checked {}: {} with issues, {} total",
            plural(results.len(), "page"),
            flagged,
            plural(total, "issue")
        ));
    }
    lines
}

/// Print the SEO report to stdout.
pub fn print_seo_report(results: &[(String, Vec<SeoIssue>)]) {
    for line in format_seo_report(results) {
        println!("{}", line);
    }
}

// ============================================================================
// deploy
// ============================================================================

/// Format the result of a successful deploy.
pub fn format_deploy_output(outcome: &DeployOutcome) -> Vec<String> {
    let mut lines = vec![format_pass_summary(&outcome.build.main)];
    let kind = if outcome.prod { "production" } else { "preview" };
    match &outcome.url {
        Some(url) => lines.push(format!("Deployed ({kind}): {url}")),
        None => lines.push(format!("Deployed ({kind})")),
    }
    if let Some(url) = &outcome.production_url {
        lines.push(format!("Production URL: {url}"));
    }
    lines
}

/// Print deploy output to stdout.
pub fn print_deploy_output(outcome: &DeployOutcome) {
    for line in format_deploy_output(outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// init
// ============================================================================

/// Format the files `init` wrote and skipped.
pub fn format_init_output(report: &InitReport) -> Vec<String> {
    let mut lines = Vec::new();
    for path in &report.written {
        lines.push(format!("Created {}", path.display()));
    }
    for path in &report.skipped {
        lines.push(format!("Skipped {} (already exists)", path.display()));
    }
    if lines.is_empty() {
        lines.push("Nothing to do. Pass --config and/or --example".to_string());
    }
    lines
}

/// Print init output to stdout.
pub fn print_init_output(report: &InitReport) {
    for line in format_init_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::GeneratedPage;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn page(url_path: &str, title: &str, is_private: bool) -> GeneratedPage {
        GeneratedPage {
            url_path: url_path.to_string(),
            title: title.to_string(),
            is_private,
        }
    }

    fn pass(mode: RenderMode, dir: &str, pages: Vec<GeneratedPage>) -> PassReport {
        PassReport {
            mode,
            output_dir: PathBuf::from(dir),
            pages,
            index: IndexSource::Readme,
            auth_pages: false,
            changelog: true,
            sitemap: true,
            robots: true,
            attachments: 0,
            attachment_bytes: 0,
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_padding() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn human_bytes_units() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(1023), "1023 B");
        assert_eq!(human_bytes(1536), "1.5 KB");
        assert_eq!(human_bytes(2 * 1024 * 1024), "2.0 MB");
    }

    #[test]
    fn plural_words() {
        assert_eq!(plural(1, "page"), "1 page");
        assert_eq!(plural(0, "page"), "0 pages");
    }

    // =========================================================================
    // build
    // =========================================================================

    #[test]
    fn build_output_lists_pages_and_site_files() {
        let mut main = pass(
            RenderMode::Normal,
            "html",
            vec![
                page("README.html", "Documentation", false),
                page("private/notes.html", "Notes", true),
            ],
        );
        main.auth_pages = true;
        main.attachments = 2;
        main.attachment_bytes = 1536;
        let report = BuildReport {
            placeholder_created: false,
            main,
            static_mirror: None,
        };

        assert_eq!(
            format_build_output(&report),
            vec![
                "Pages",
                "001 Documentation \u{2192} README.html",
                "002 Notes \u{2192} private/notes.html (private)",
                "",
                "Site",
                "    index.html: README copy",
                "    login.html, logout.html, auth.js",
                "    changelog.html",
                "    sitemap.xml, robots.txt",
                "    Attachments: 2 files (1.5 KB)",
                "",
                "Generated 2 pages in html/",
            ]
        );
    }

    #[test]
    fn build_output_mentions_placeholder_and_mirror() {
        let mut main = pass(RenderMode::Normal, "html", vec![page("README.html", "Docs", false)]);
        main.index = IndexSource::Synthesized;
        main.changelog = false;
        main.robots = false;
        let report = BuildReport {
            placeholder_created: true,
            main,
            static_mirror: Some(pass(
                RenderMode::Static,
                "html-static",
                vec![page("README.html", "Docs", false)],
            )),
        };

        let lines = format_build_output(&report);
        assert!(lines[0].contains("placeholder README.md"));
        assert!(lines.contains(&"    index.html: default landing page".to_string()));
        assert!(lines.contains(&"    sitemap.xml".to_string()));
        assert!(!lines.iter().any(|l| l.contains("changelog")));
        assert_eq!(lines.last().unwrap(), "Static mirror: 1 page in html-static/");
    }

    // =========================================================================
    // seo-check
    // =========================================================================

    #[test]
    fn seo_report_groups_issues_by_page() {
        let results = vec![
            ("index.html".to_string(), vec![]),
            (
                "guides/setup.html".to_string(),
                vec![SeoIssue::TitleTooLong(72), SeoIssue::MissingDescription],
            ),
        ];
        assert_eq!(
            format_seo_report(&results),
            vec![
                "guides/setup.html",
                "    title is 72 characters (max 60)",
                "    missing meta description",
                "",
                "Checked 2 pages: 1 with issues, 2 issues total",
            ]
        );
    }

    #[test]
    fn seo_report_clean() {
        let results = vec![("index.html".to_string(), vec![])];
        assert_eq!(format_seo_report(&results), vec!["Checked 1 page: no issues found"]);
    }

    // =========================================================================
    // deploy and init
    // =========================================================================

    #[test]
    fn deploy_output_shows_urls() {
        let outcome = DeployOutcome {
            build: BuildReport {
                placeholder_created: false,
                main: pass(RenderMode::Normal, "html", vec![page("README.html", "Docs", false)]),
                static_mirror: None,
            },
            url: Some("https://docs-abc.vercel.app".to_string()),
            production_url: Some("https://docs.acme.dev".to_string()),
            prod: true,
        };
        assert_eq!(
            format_deploy_output(&outcome),
            vec![
                "Generated 1 page in html/",
                "Deployed (production): https://docs-abc.vercel.app",
                "Production URL: https://docs.acme.dev",
            ]
        );
    }

    #[test]
    fn init_output_written_and_skipped() {
        let report = InitReport {
            written: vec![PathBuf::from("docs/README.md")],
            skipped: vec![PathBuf::from("doc-builder.toml")],
        };
        assert_eq!(
            format_init_output(&report),
            vec![
                "Created docs/README.md",
                "Skipped doc-builder.toml (already exists)",
            ]
        );
        assert_eq!(format_init_output(&InitReport::default()).len(), 1);
    }
}
