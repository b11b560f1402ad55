//! End-to-end builds through the public API: a config file on disk, loaded
//! with the same layering the CLI uses, then `generate::build`.

use doc_builder::config::{self, CliOverrides, Config};
use doc_builder::generate::{self, IndexSource};
use doc_builder::seo;
use pretty_assertions::assert_eq;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Site {
    tmp: TempDir,
}

impl Site {
    fn new() -> Self {
        let site = Site {
            tmp: TempDir::new().unwrap(),
        };
        fs::create_dir_all(site.docs()).unwrap();
        site
    }

    fn docs(&self) -> PathBuf {
        self.tmp.path().join("docs")
    }

    fn html(&self) -> PathBuf {
        self.tmp.path().join("html")
    }

    fn mirror(&self) -> PathBuf {
        self.tmp.path().join("html-static")
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.docs().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Write `doc-builder.toml` with the site directories plus `extra`, and load it.
    ///
    /// Top-level keys in `extra` go before the first table so they stay top-level.
    fn config(&self, extra: &str) -> Config {
        let path = self.tmp.path().join(config::DEFAULT_CONFIG_FILE);
        let split = extra
            .match_indices('\n')
            .map(|(i, _)| i + 1)
            .chain([0])
            .filter(|&i| extra[i..].starts_with('['))
            .min()
            .unwrap_or(extra.len());
        let (top, tables) = extra.split_at(split);
        let toml = format!(
            "{top}\ndocsDir = '{}'\noutputDir = '{}'\n\n[staticOutput]\noutputDir = '{}'\n{tables}",
            self.docs().display(),
            self.html().display(),
            self.mirror().display(),
        );
        fs::write(&path, toml).unwrap();
        config::load_config(&path, &CliOverrides::default()).unwrap()
    }

    fn read(&self, path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
    }
}

const AUTH: &str = "
[features]
authentication = true

[auth]
supabaseUrl = 'https://abc.supabase.co'
supabaseAnonKey = 'public-anon-key'
siteId = 'docs-site'
";

const SEO: &str = "
[seo]
enabled = true
siteUrl = 'https://docs.acme.dev'
";

fn nav_labels(html: &str) -> Vec<String> {
    let link = Regex::new(r#"(?s)<a class="nav-(?:title|item)[^"]*"[^>]*>(.*?)</a>"#).unwrap();
    let tag = Regex::new(r"<[^>]+>").unwrap();
    link.captures_iter(html)
        .map(|c| tag.replace_all(&c[1], "").trim().to_string())
        .collect()
}

fn title_of(html: &str) -> String {
    let title = Regex::new(r"(?s)<title>(.*?)</title>").unwrap();
    title.captures(html).unwrap()[1].trim().to_string()
}

#[test]
fn single_guide_gets_title_and_section() {
    let site = Site::new();
    site.write("guides/setup.md", "# Setup Guide\n\nFollow these steps.");
    let config = site.config("");

    generate::build(&config).unwrap();

    let html = site.read(site.html().join("guides/setup.html"));
    assert!(title_of(&html).starts_with("Setup Guide"));
    let labels = nav_labels(&html);
    let guides = labels.iter().position(|l| l == "Guides").expect("Guides section");
    assert!(labels[guides + 1..].contains(&"Setup Guide".to_string()));
}

#[test]
fn empty_docs_still_produce_index() {
    let site = Site::new();
    let config = site.config("");

    let report = generate::build(&config).unwrap();

    assert!(report.placeholder_created);
    assert!(site.docs().join("README.md").is_file());
    let index = site.read(site.html().join("index.html"));
    assert!(!index.trim().is_empty());
    assert!(index.contains("<html"));
}

#[test]
fn readme_sorts_before_overview() {
    let site = Site::new();
    site.write("overview.md", "# Overview Notes\n");
    site.write("README.md", "# Home\n");
    let config = site.config("");

    generate::build(&config).unwrap();

    let labels = nav_labels(&site.read(site.html().join("overview.html")));
    let readme = labels.iter().position(|l| l == "Overview").unwrap();
    let overview = labels.iter().position(|l| l == "Overview Notes").unwrap();
    assert!(readme < overview, "{labels:?}");
}

#[test]
fn every_public_doc_in_navigation_once() {
    let site = Site::new();
    site.write("README.md", "# Home\n");
    site.write("a/one.md", "# One\n");
    site.write("a/b/two.md", "# Two\n");
    site.write("c/three.md", "# Three\n");
    site.write("empty/.keep.md", "# Hidden\n");
    let config = site.config("");

    let report = generate::build(&config).unwrap();

    let labels = nav_labels(&site.read(site.html().join("a/b/two.html")));
    for title in ["One", "Two", "Three"] {
        assert_eq!(labels.iter().filter(|l| *l == title).count(), 1, "{title}: {labels:?}");
    }
    assert!(!labels.iter().any(|l| l == "Empty"));
    assert!(!labels.contains(&"Hidden".to_string()));
    assert_eq!(report.main.pages.len(), 4);
}

#[test]
fn private_notes_only_with_auth() {
    let site = Site::new();
    site.write("README.md", "# Home\n");
    site.write("private/notes.md", "# Team Notes\n");

    let public = site.config("");
    generate::build(&public).unwrap();
    assert!(!site.html().join("private/notes.html").exists());
    let labels = nav_labels(&site.read(site.html().join("index.html")));
    assert!(!labels.contains(&"Team Notes".to_string()));

    let gated = site.config(AUTH);
    generate::build(&gated).unwrap();
    assert!(site.html().join("private/notes.html").is_file());
    let labels = nav_labels(&site.read(site.html().join("index.html")));
    assert!(labels.contains(&"Team Notes".to_string()));
}

#[test]
fn private_notes_absent_from_static_mirror() {
    let site = Site::new();
    site.write("README.md", "# Home\n");
    site.write("private/notes.md", "# Team Notes\n");
    let mut config = site.config(AUTH);
    config.static_output.enabled = true;

    let report = generate::build(&config).unwrap();

    assert!(site.html().join("login.html").is_file());

    let mirror = report.static_mirror.expect("static mirror");
    assert!(mirror.pages.iter().all(|p| !p.is_private));
    assert!(!site.mirror().join("private").exists());
    assert!(!site.mirror().join("login.html").exists());
    let mirror_index = site.read(site.mirror().join("index.html"));
    assert!(!nav_labels(&mirror_index).contains(&"Team Notes".to_string()));
    assert!(!mirror_index.contains("supabase"));
}

#[test]
fn sitemap_lists_each_page_once_without_auth_pages() {
    let site = Site::new();
    site.write("README.md", "# Home\n\nWelcome to the docs.\n");
    site.write("guides/setup.md", "# Setup Guide\n\nFollow these steps.\n");
    site.write("private/notes.md", "# Team Notes\n");
    let config = site.config(&format!("{AUTH}{SEO}"));

    let report = generate::build(&config).unwrap();

    let sitemap = site.read(site.html().join("sitemap.xml"));
    assert!(!sitemap.contains("login.html"));
    assert!(!sitemap.contains("logout.html"));
    let locs: Vec<&str> = sitemap
        .lines()
        .filter_map(|l| l.trim().strip_prefix("<loc>")?.strip_suffix("</loc>"))
        .collect();
    let mut unique = locs.clone();
    unique.dedup();
    assert_eq!(locs, unique);
    for page in &report.main.pages {
        let loc = format!("https://docs.acme.dev/{}", page.url_path);
        assert!(locs.contains(&loc.as_str()), "{loc} missing");
    }
    assert!(locs.contains(&"https://docs.acme.dev/index.html"));
}

#[test]
fn seo_titles_fit_sixty_characters() {
    let site = Site::new();
    site.write("README.md", "# Home\n");
    site.write(
        "guides/long.md",
        "# A Remarkably Long Guide Title That Keeps Going Well Past Any Reasonable Limit\n\nBody.\n",
    );
    let config = site.config(&format!("siteName = 'Acme Platform Documentation'\n{SEO}"));

    generate::build(&config).unwrap();

    for page in ["guides/long.html", "README.html", "index.html"] {
        let title = title_of(&site.read(site.html().join(page)));
        assert!(title.chars().count() <= 60, "{page}: {title}");
    }
    let checked = seo::check_path(&site.html()).unwrap();
    assert!(
        checked
            .iter()
            .flat_map(|(_, issues)| issues)
            .all(|i| !matches!(i, seo::SeoIssue::TitleTooLong(_)))
    );
}

#[test]
fn top_level_keys_mix_with_tables() {
    let site = Site::new();
    let config = site.config(&format!("siteName = 'Acme'\n{AUTH}"));

    assert_eq!(config.site_name, "Acme");
    assert!(config.features.authentication);
    assert_eq!(config.static_output.output_dir, site.mirror());
}

#[test]
fn home_page_from_readme_expands_top_level_folders() {
    let site = Site::new();
    site.write("README.md", "# Home\n");
    site.write("guides/setup.md", "# Setup Guide\n");
    site.write("reference/api.md", "# Api\n");
    let config = site.config("");

    let report = generate::build(&config).unwrap();

    assert_eq!(report.main.index, IndexSource::Readme);
    let index = site.read(site.html().join("index.html"));
    assert!(index.contains(r#"class="nav-content" id="nav-guides-1""#), "{index}");
    assert!(index.contains(r#"class="nav-content" id="nav-reference-1""#), "{index}");
    assert!(!index.contains("nav-content collapsed"), "{index}");
}

#[test]
fn index_md_wins_over_readme() {
    let site = Site::new();
    site.write("README.md", "# Readme Home\n");
    site.write("index.md", "# Landing\n");
    let config = site.config("");

    let report = generate::build(&config).unwrap();

    assert_eq!(report.main.index, IndexSource::Markdown);
    assert!(title_of(&site.read(site.html().join("index.html"))).starts_with("Landing"));
}

#[test]
fn preset_applies_before_config_file() {
    let site = Site::new();
    site.write("README.md", "# Home\n");
    let path = site.tmp.path().join(config::DEFAULT_CONFIG_FILE);
    fs::write(
        &path,
        format!("docsDir = '{}'\nsiteName = 'Acme'\n", site.docs().display()),
    )
    .unwrap();
    let overrides = CliOverrides {
        preset: Some("notion-inspired".to_string()),
        output: Some(site.html()),
        ..Default::default()
    };

    let config = config::load_config(&path, &overrides).unwrap();

    assert_eq!(config.site_name, "Acme");
    assert_eq!(config.output_dir, site.html());
    assert!(!config.folder_order.is_empty());
}
