//! Site building.
//!
//! The orchestrator: one linear pass per output tree, with nothing carried
//! between files except the immutable navigation tree and lookup tables.
//!
//! ## Pass Steps
//!
//! 1. Synthesize a placeholder `README.md` when the docs have no home source
//! 2. Scan docs and attachments ([`crate::scan`])
//! 3. Per document: transform, render navigation, render page, write the
//!    `.html` and copy the `.md` next to it
//! 4. Write the stylesheet and client script; with authentication, the
//!    login/logout pages and `auth.js`
//! 5. Write `changelog.html` and `404.html`, then resolve `index.html`
//! 6. With an SEO site URL, write `sitemap.xml` and `robots.txt`
//! 7. Copy attachments
//!
//! With a static mirror configured, steps 2–7 run again into the mirror
//! directory in [`RenderMode::Static`], without private content.
//!
//! ## Output Structure
//!
//! ```text
//! html/
//! ├── index.html              # From index.md, else a copy of README.html, else synthesized
//! ├── README.html
//! ├── README.md               # Source copy for download
//! ├── guides/
//! │   ├── setup.html
//! │   └── setup.md
//! ├── css/notion-style.css
//! ├── js/main.js
//! ├── changelog.html          # features.changelog
//! ├── 404.html
//! ├── login.html, logout.html, auth.js   # features.authentication
//! ├── sitemap.xml, robots.txt            # seo.siteUrl
//! └── ...attachments mirrored from docs/
//! ```
//!
//! Any failure aborts the build; partially written output stays on disk.

use crate::auth::{self, AUTH_SCRIPT_FILE, AuthError, AuthSettings, LOGIN_PAGE, LOGOUT_PAGE};
use crate::config::{Config, ConfigError};
use crate::content::{self, ContentOptions};
use crate::icons::{EmojiTable, IconStyle, StatusIcons};
use crate::metadata::MetadataError;
use crate::navigation::{HOME_PAGE, NavContext, NavFolder, render_navigation};
use crate::render::{
    self, CHANGELOG_PAGE, CSS_FILE, JS_FILE, MAIN_SCRIPT, NOT_FOUND_PAGE, Page, PageLink,
    RenderContext, STYLESHEET,
};
use crate::scan::{self, ScanError, ScanOptions};
use crate::seo;
use crate::types::{DocFile, RenderMode};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("{path}: {source}")]
    Content {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },
    #[error("Cannot read output directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Where the site's `index.html` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// Generated from `index.md`.
    Markdown,
    /// Copy of the root `README.html`.
    Readme,
    /// Default landing page listing every page.
    Synthesized,
}

/// One generated document page.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub url_path: String,
    pub title: String,
    pub is_private: bool,
}

/// What one pass wrote.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub mode: RenderMode,
    pub output_dir: PathBuf,
    pub pages: Vec<GeneratedPage>,
    pub index: IndexSource,
    pub auth_pages: bool,
    pub changelog: bool,
    pub sitemap: bool,
    pub robots: bool,
    pub attachments: usize,
    pub attachment_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    /// A placeholder `README.md` was written into the docs directory.
    pub placeholder_created: bool,
    pub main: PassReport,
    pub static_mirror: Option<PassReport>,
}

/// Build the site described by `config`.
pub fn build(config: &Config) -> Result<BuildReport, GenerateError> {
    config.validate()?;
    let auth = if config.features.authentication {
        Some(AuthSettings::from_config(&config.auth)?)
    } else {
        None
    };

    let built_at = Utc::now();
    let placeholder_created = ensure_home_source(&config.docs_dir, &config.site_name, built_at)?;

    let main = build_pass(config, &config.output_dir, RenderMode::Normal, auth, built_at)?;
    let static_mirror = if config.static_output.enabled {
        Some(build_pass(
            config,
            &config.static_output.output_dir,
            RenderMode::Static,
            None,
            built_at,
        )?)
    } else {
        None
    };

    Ok(BuildReport {
        placeholder_created,
        main,
        static_mirror,
    })
}

/// Write a placeholder `README.md` when the docs root has neither a README
/// nor an `index.md`. Returns whether one was written.
pub fn ensure_home_source(
    docs_dir: &Path,
    site_name: &str,
    now: DateTime<Utc>,
) -> std::io::Result<bool> {
    fs::create_dir_all(docs_dir)?;
    if docs_dir.join("README.md").exists() || docs_dir.join("index.md").exists() {
        return Ok(false);
    }
    fs::write(docs_dir.join("README.md"), placeholder_readme(site_name, now))?;
    info!(docs = %docs_dir.display(), "created placeholder README.md");
    Ok(true)
}

pub fn placeholder_readme(site_name: &str, now: DateTime<Utc>) -> String {
    format!(
        r#"# Welcome to {site_name}

**Generated**: {date} UTC
**Status**: Placeholder - Ready for customization
**Verified**: ❓ (Auto-generated content)

## Overview

This documentation site was generated with doc-builder. This placeholder page
appears because the docs directory has no `README.md` or `index.md` yet.

## Getting Started

1. Replace this file with your own `README.md`
2. Add markdown files and folders to the docs directory
3. Run `doc-builder build` to regenerate the site
4. Run `doc-builder dev` to preview with live rebuilds

## Documentation Structure

- Each folder becomes a section in the navigation menu
- `README.md` in a folder becomes that section's overview page
- Files under `private/` are only published behind authentication

## Next Steps

- Set `siteName` and `siteDescription` in `doc-builder.toml`
- Run `doc-builder deploy` to publish the site

## Documentation Standards

```mermaid
graph TD
    A[Write markdown] --> B[doc-builder build]
    B --> C[Review locally with doc-builder dev]
    C --> D[doc-builder deploy]
```

Start every document with a `# Title`, keep one topic per file, and add a
`description` in front matter to control the page summary.

## Support

Run `doc-builder --help` for the list of commands and options.
"#,
        date = now.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// One build pass into `output_dir`.
fn build_pass(
    config: &Config,
    output_dir: &Path,
    mode: RenderMode,
    auth: Option<AuthSettings>,
    built_at: DateTime<Utc>,
) -> Result<PassReport, GenerateError> {
    let features = &config.features;
    let auth = auth.filter(|_| mode.allows_auth());
    info!(?mode, output = %output_dir.display(), "building site");

    let scanned = scan::scan(
        &config.docs_dir,
        &ScanOptions {
            attachment_types: &config.attachment_types,
            attachments: features.attachments,
            exclude_private: auth.is_none(),
            normalize_titles: features.normalize_title,
        },
    )?;
    info!(
        docs = scanned.docs.len(),
        attachments = scanned.attachments.len(),
        "scanned docs"
    );

    let emoji = EmojiTable::default();
    let icon_style = IconStyle::from_features(features);
    let status_icons = StatusIcons::default();
    let content_options = ContentOptions {
        mermaid: features.mermaid,
        normalize_title: features.normalize_title,
        emoji: features.phosphor_icons.then_some((&emoji, &icon_style)),
    };

    let tree = NavFolder::build(&scanned.docs);
    let nav_ctx = NavContext {
        folder_order: &config.folder_order,
        folder_descriptions: &config.folder_descriptions,
        folder_icons: &config.folder_icons,
        status_icons: &status_icons,
        mode,
    };
    let known_pages: BTreeSet<String> = scanned
        .docs
        .iter()
        .map(|d| d.url_path.clone())
        .chain([HOME_PAGE, NOT_FOUND_PAGE, CHANGELOG_PAGE].map(String::from))
        .collect();
    let ctx = RenderContext::new(config, mode, &known_pages, built_at);

    fs::create_dir_all(output_dir)?;

    // Documents
    let mut pages = Vec::with_capacity(scanned.docs.len());
    for doc in &scanned.docs {
        let raw = fs::read_to_string(&doc.path)?;
        let transformed = content::transform(&raw, &doc.display_name, &content_options)
            .map_err(|source| GenerateError::Content {
                path: doc.path.clone(),
                source,
            })?;
        let navigation = render_navigation(&tree, &doc.url_path, &nav_ctx);
        let html = render::render_page(
            &Page {
                url_path: &doc.url_path,
                title: &transformed.title,
                body_html: &transformed.html,
                markdown: &transformed.body,
                front_matter: &transformed.front_matter,
                navigation: &navigation,
                modified: doc.modified,
            },
            &ctx,
        );

        let html_path = output_dir.join(output_path_for(&doc.relative_path));
        if let Some(parent) = html_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&html_path, html.into_string())?;
        fs::copy(&doc.path, output_dir.join(&doc.relative_path))?;
        debug!(page = %doc.url_path, "generated");

        pages.push(GeneratedPage {
            url_path: doc.url_path.clone(),
            title: transformed.title,
            is_private: doc.is_private,
        });
    }
    info!(pages = pages.len(), "generated pages");

    // Assets
    write_file(&output_dir.join(CSS_FILE), STYLESHEET)?;
    write_file(&output_dir.join(JS_FILE), MAIN_SCRIPT)?;
    debug!("wrote stylesheet and client script");

    // Authentication
    let auth_pages = match auth {
        Some(settings) => {
            let css = format!("/{CSS_FILE}");
            write_file(
                &output_dir.join(LOGIN_PAGE),
                &auth::login_page(&config.site_name, &css).into_string(),
            )?;
            write_file(
                &output_dir.join(LOGOUT_PAGE),
                &auth::logout_page(&config.site_name, &css).into_string(),
            )?;
            write_file(
                &output_dir.join(AUTH_SCRIPT_FILE),
                &auth::auth_script(&settings),
            )?;
            info!("generated authentication pages");
            true
        }
        None => {
            remove_stale(output_dir, &[LOGIN_PAGE, LOGOUT_PAGE, AUTH_SCRIPT_FILE])?;
            false
        }
    };

    // Changelog and 404
    let changelog = features.changelog;
    if changelog {
        let entries = changelog_entries(&scanned.docs, config.changelog.days_back, built_at);
        let navigation = render_navigation(&tree, CHANGELOG_PAGE, &nav_ctx);
        let html = render::changelog_page(&entries, config.changelog.days_back, &navigation, &ctx);
        write_file(&output_dir.join(CHANGELOG_PAGE), &html.into_string())?;
        info!(entries = entries.len(), "generated changelog");
    } else {
        remove_stale(output_dir, &[CHANGELOG_PAGE])?;
    }
    let navigation = render_navigation(&tree, NOT_FOUND_PAGE, &nav_ctx);
    write_file(
        &output_dir.join(NOT_FOUND_PAGE),
        &render::not_found_page(&navigation, &ctx).into_string(),
    )?;

    // Index
    let index = resolve_index(output_dir, &scanned.docs, &tree, &nav_ctx, &ctx)?;
    info!(?index, "resolved index.html");

    // SEO
    let (mut sitemap, mut robots) = (false, false);
    if let Some(site_url) = config.seo_site_url() {
        if config.seo.generate_sitemap {
            let urls = seo::sitemap_pages(output_dir)?;
            let lastmod = built_at.format("%Y-%m-%d").to_string();
            write_file(
                &output_dir.join("sitemap.xml"),
                &seo::sitemap_xml(&urls, site_url, &lastmod),
            )?;
            info!(urls = urls.len(), "generated sitemap.xml");
            sitemap = true;
        }
        if config.seo.generate_robots_txt {
            write_file(
                &output_dir.join("robots.txt"),
                &seo::robots_txt(site_url, auth_pages),
            )?;
            robots = true;
        }
    }

    // Attachments
    for attachment in &scanned.attachments {
        let dest = output_dir.join(&attachment.relative_path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&attachment.source, &dest)?;
    }
    let attachment_bytes = scanned.attachment_bytes();
    if !scanned.attachments.is_empty() {
        info!(
            count = scanned.attachments.len(),
            bytes = attachment_bytes,
            "copied attachments"
        );
    }

    Ok(PassReport {
        mode,
        output_dir: output_dir.to_path_buf(),
        pages,
        index,
        auth_pages,
        changelog,
        sitemap,
        robots,
        attachments: scanned.attachments.len(),
        attachment_bytes,
    })
}

/// `index.md` output wins; otherwise the root README is copied; otherwise a
/// landing page is synthesized.
fn resolve_index(
    output_dir: &Path,
    docs: &[DocFile],
    tree: &NavFolder,
    nav_ctx: &NavContext,
    ctx: &RenderContext,
) -> Result<IndexSource, GenerateError> {
    let index_path = output_dir.join(HOME_PAGE);
    if docs.iter().any(|d| d.url_path == HOME_PAGE) {
        return Ok(IndexSource::Markdown);
    }
    if let Some(readme) = docs.iter().find(|d| d.depth() == 0 && d.is_readme()) {
        fs::copy(
            output_dir.join(output_path_for(&readme.relative_path)),
            &index_path,
        )?;
        return Ok(IndexSource::Readme);
    }

    let links: Vec<PageLink> = docs
        .iter()
        .map(|d| PageLink {
            title: d.title.clone(),
            url_path: d.url_path.clone(),
            modified: None,
        })
        .collect();
    let navigation = render_navigation(tree, HOME_PAGE, nav_ctx);
    write_file(
        &index_path,
        &render::default_index(&links, &navigation, ctx).into_string(),
    )?;
    Ok(IndexSource::Synthesized)
}

/// Documents modified within `days_back` days of `now`, newest first.
pub fn changelog_entries(docs: &[DocFile], days_back: u32, now: DateTime<Utc>) -> Vec<PageLink> {
    let cutoff = now - Duration::days(i64::from(days_back));
    let mut entries: Vec<PageLink> = docs
        .iter()
        .filter_map(|d| {
            let modified = DateTime::<Utc>::from(d.modified?);
            (modified >= cutoff).then(|| PageLink {
                title: d.title.clone(),
                url_path: d.url_path.clone(),
                modified: Some(modified),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.url_path.cmp(&b.url_path)));
    entries
}

/// Output file for a docs-relative markdown path: `guides/setup.md` → `guides/setup.html`.
pub fn output_path_for(relative_path: &str) -> PathBuf {
    Path::new(relative_path).with_extension("html")
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

fn remove_stale(output_dir: &Path, names: &[&str]) -> std::io::Result<()> {
    for name in names {
        let path = output_dir.join(name);
        if path.is_file() {
            fs::remove_file(&path)?;
            debug!(file = name, "removed stale output");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn config_for(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.docs_dir = tmp.path().join("docs");
        config.output_dir = tmp.path().join("html");
        config.static_output.output_dir = tmp.path().join("html-static");
        config
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
    }

    #[test]
    fn builds_fixture_site() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(&tmp);
        copy_fixtures_to(&config.docs_dir);

        let report = build(&config).unwrap();
        assert!(!report.placeholder_created);
        assert_eq!(report.main.index, IndexSource::Readme);
        assert!(config.output_dir.join("guides/setup.html").is_file());
        assert!(config.output_dir.join("guides/setup.md").is_file());
        assert!(config.output_dir.join(CSS_FILE).is_file());
        assert!(config.output_dir.join(JS_FILE).is_file());
        assert!(config.output_dir.join(NOT_FOUND_PAGE).is_file());
        assert_eq!(
            read(config.output_dir.join("index.html")),
            read(config.output_dir.join("README.html"))
        );
    }

    #[test]
    fn private_docs_skipped_without_auth() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(&tmp);
        copy_fixtures_to(&config.docs_dir);

        let report = build(&config).unwrap();
        assert!(report.main.pages.iter().all(|p| !p.is_private));
        assert!(!config.output_dir.join("private/notes.html").exists());
        assert!(!report.main.auth_pages);
    }

    #[test]
    fn auth_build_includes_private_and_auth_pages() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_for(&tmp);
        config.features.authentication = true;
        config.auth.supabase_url = Some("https://abc.supabase.co".into());
        config.auth.supabase_anon_key = Some("anon".into());
        config.auth.site_id = Some("site".into());
        config.static_output.enabled = true;
        copy_fixtures_to(&config.docs_dir);

        let report = build(&config).unwrap();
        assert!(report.main.auth_pages);
        assert!(config.output_dir.join("private/notes.html").is_file());
        assert!(config.output_dir.join(LOGIN_PAGE).is_file());
        assert!(read(config.output_dir.join(AUTH_SCRIPT_FILE)).contains("https://abc.supabase.co"));

        let mirror = report.static_mirror.unwrap();
        assert!(!mirror.auth_pages);
        assert!(mirror.pages.iter().all(|p| !p.is_private));
        let mirror_dir = &config.static_output.output_dir;
        assert!(!mirror_dir.join("private/notes.html").exists());
        assert!(!mirror_dir.join(LOGIN_PAGE).exists());
        let setup = read(mirror_dir.join("guides/setup.html"));
        assert!(setup.contains(r#"href="../css/notion-style.css?v="#));
        assert!(!setup.contains("auth.js"));
    }

    #[test]
    fn missing_auth_settings_abort_before_output() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_for(&tmp);
        config.features.authentication = true;
        assert!(build(&config).is_err());
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn empty_docs_get_placeholder() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(&tmp);
        let report = build(&config).unwrap();
        assert!(report.placeholder_created);
        assert!(config.docs_dir.join("README.md").is_file());
        let index = read(config.output_dir.join("index.html"));
        assert!(index.contains("Welcome to Documentation"));
    }

    #[test]
    fn index_md_is_authoritative() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(&tmp);
        write_doc(&config.docs_dir, "index.md", "# Home Page\n\nCustom landing.\n");
        write_doc(&config.docs_dir, "README.md", "# Readme\n\nReadme text.\n");
        let report = build(&config).unwrap();
        assert_eq!(report.main.index, IndexSource::Markdown);
        assert!(read(config.output_dir.join("index.html")).contains("Custom landing."));
    }

    #[test]
    fn stale_index_replaced() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(&tmp);
        write_doc(&config.docs_dir, "README.md", "# Readme\n\nReadme text.\n");
        fs::create_dir_all(&config.output_dir).unwrap();
        fs::write(config.output_dir.join("index.html"), "<title>Index of /</title>").unwrap();
        build(&config).unwrap();
        assert!(read(config.output_dir.join("index.html")).contains("Readme text."));
    }

    #[test]
    fn synthesized_index_when_only_nested_docs() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(&tmp);
        write_doc(&config.docs_dir, "guides/setup.md", "# Setup Guide\n\nFollow these steps.\n");
        // A full build would write the placeholder README first.
        let docs = scan::scan(
            &config.docs_dir,
            &ScanOptions {
                attachment_types: &[],
                attachments: false,
                exclude_private: true,
                normalize_titles: true,
            },
        )
        .unwrap()
        .docs;
        let tree = NavFolder::build(&docs);
        let icons = StatusIcons::default();
        let nav_ctx = NavContext {
            folder_order: &config.folder_order,
            folder_descriptions: &config.folder_descriptions,
            folder_icons: &config.folder_icons,
            status_icons: &icons,
            mode: RenderMode::Normal,
        };
        let pages = BTreeSet::new();
        let ctx = RenderContext::new(&config, RenderMode::Normal, &pages, Utc::now());
        fs::create_dir_all(&config.output_dir).unwrap();
        let index = resolve_index(&config.output_dir, &docs, &tree, &nav_ctx, &ctx).unwrap();
        assert_eq!(index, IndexSource::Synthesized);
        let html = read(config.output_dir.join("index.html"));
        assert!(html.contains("welcome-container"));
        assert!(html.contains("Setup Guide"));
    }

    #[test]
    fn sitemap_and_robots_with_site_url() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_for(&tmp);
        config.seo.site_url = Some("https://docs.acme.dev".into());
        copy_fixtures_to(&config.docs_dir);
        let report = build(&config).unwrap();
        assert!(report.main.sitemap && report.main.robots);
        let sitemap = read(config.output_dir.join("sitemap.xml"));
        assert!(sitemap.contains("<loc>https://docs.acme.dev/guides/setup.html</loc>"));
        assert!(!sitemap.contains("login.html"));
        assert!(!sitemap.contains("404.html"));
    }

    #[test]
    fn no_sitemap_without_site_url() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(&tmp);
        copy_fixtures_to(&config.docs_dir);
        let report = build(&config).unwrap();
        assert!(!report.main.sitemap);
        assert!(!config.output_dir.join("sitemap.xml").exists());
    }

    #[test]
    fn attachments_copied_with_byte_total() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(&tmp);
        write_doc(&config.docs_dir, "README.md", "# Home\n");
        fs::create_dir_all(config.docs_dir.join("assets")).unwrap();
        fs::write(config.docs_dir.join("assets/diagram.png"), [0u8; 32]).unwrap();
        let report = build(&config).unwrap();
        assert_eq!(report.main.attachments, 1);
        assert_eq!(report.main.attachment_bytes, 32);
        assert!(config.output_dir.join("assets/diagram.png").is_file());
    }

    #[test]
    fn changelog_toggle() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_for(&tmp);
        write_doc(&config.docs_dir, "README.md", "# Home\n");
        build(&config).unwrap();
        assert!(read(config.output_dir.join(CHANGELOG_PAGE)).contains("Home"));

        config.features.changelog = false;
        build(&config).unwrap();
        assert!(!config.output_dir.join(CHANGELOG_PAGE).exists());
    }

    #[test]
    fn changelog_entries_filter_and_sort() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        let at = |day: u32| SystemTime::from(Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap());
        let mut old = doc("old.md", "Old");
        old.modified = Some(SystemTime::from(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));
        let mut recent = doc("recent.md", "Recent");
        recent.modified = Some(at(8));
        let mut newest = doc("newest.md", "Newest");
        newest.modified = Some(at(9));
        let undated = doc("undated.md", "Undated");

        let entries = changelog_entries(&[old, recent, newest, undated], 30, now);
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Recent"]);
    }

    #[test]
    fn output_paths_mirror_sources() {
        assert_eq!(output_path_for("guides/setup.md"), PathBuf::from("guides/setup.html"));
        assert_eq!(output_path_for("my notes/día 1.md"), PathBuf::from("my notes/día 1.html"));
    }

    #[test]
    fn placeholder_mentions_site() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 9, 30, 0).unwrap();
        let text = placeholder_readme("Acme Docs", now);
        assert!(text.starts_with("# Welcome to Acme Docs\n"));
        assert!(text.contains("**Generated**: 2026-03-04 09:30:00 UTC"));
        assert!(text.contains("```mermaid"));
    }
}
