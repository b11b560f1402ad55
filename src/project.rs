//! Project setup and config-editing commands.
//!
//! `init`, `set-production-url`, `google-verify` and `claude-hints`. The
//! config edits load `doc-builder.toml` as a raw table, change one key, and
//! write the table back; a missing file is created with just that key.

use crate::config::{self, ConfigError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Meta tag name Google Search Console looks for.
pub const GOOGLE_VERIFICATION_META: &str = "google-site-verification";

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("{path} is not a TOML table")]
    NotATable { path: PathBuf },
    #[error("Invalid {what}: '{value}'")]
    InvalidValue { what: &'static str, value: String },
}

// =============================================================================
// Config edits
// =============================================================================

fn edit_config(
    path: &Path,
    edit: impl FnOnce(&mut toml::Table) -> Result<(), ProjectError>,
) -> Result<(), ProjectError> {
    let mut table = match config::load_raw_config(path)? {
        Some(toml::Value::Table(table)) => table,
        Some(_) => {
            return Err(ProjectError::NotATable {
                path: path.to_path_buf(),
            });
        }
        None => toml::Table::new(),
    };
    edit(&mut table)?;
    // Round-trip through Config so a bad edit never lands on disk.
    config::merge_toml(config::stock_defaults_value(), toml::Value::Table(table.clone()))
        .try_into::<config::Config>()
        .map_err(ConfigError::from)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(&table)?)?;
    Ok(())
}

fn subtable<'a>(table: &'a mut toml::Table, key: &str) -> Result<&'a mut toml::Table, ProjectError> {
    table
        .entry(key)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .ok_or(ProjectError::InvalidValue {
            what: "config section",
            value: key.to_string(),
        })
}

/// Store the URL reported after production deploys.
pub fn set_production_url(config_path: &Path, url: &str) -> Result<String, ProjectError> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(ProjectError::InvalidValue {
            what: "production URL",
            value: url.to_string(),
        });
    }
    let stored = url.to_string();
    edit_config(config_path, |table| {
        table.insert("productionUrl".into(), toml::Value::String(stored.clone()));
        Ok(())
    })?;
    info!(url = %stored, path = %config_path.display(), "set production URL");
    Ok(stored)
}

/// Add or replace the Google site verification meta tag.
///
/// Accepts the bare code or the full `<meta ... content="...">` tag that
/// Search Console hands out.
pub fn google_verify(config_path: &Path, code: &str) -> Result<String, ProjectError> {
    let code = verification_code(code).ok_or_else(|| ProjectError::InvalidValue {
        what: "verification code",
        value: code.to_string(),
    })?;
    edit_config(config_path, |table| {
        let seo = subtable(table, "seo")?;
        let tags = seo
            .entry("customMetaTags")
            .or_insert_with(|| toml::Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or(ProjectError::InvalidValue {
                what: "config section",
                value: "seo.customMetaTags".to_string(),
            })?;
        tags.retain(|tag| {
            tag.get("name").and_then(toml::Value::as_str) != Some(GOOGLE_VERIFICATION_META)
        });
        let mut tag = toml::Table::new();
        tag.insert("name".into(), GOOGLE_VERIFICATION_META.into());
        tag.insert("content".into(), code.clone().into());
        tags.push(toml::Value::Table(tag));
        Ok(())
    })?;
    info!(path = %config_path.display(), "set Google site verification");
    Ok(code)
}

fn verification_code(input: &str) -> Option<String> {
    let input = input.trim();
    let code = match input.find("content=\"") {
        Some(start) => {
            let rest = &input[start + "content=\"".len()..];
            &rest[..rest.find('"')?]
        }
        None => input,
    };
    let valid = !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| code.to_string())
}

// =============================================================================
// init
// =============================================================================

/// Files written and skipped by `init`.
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<PathBuf>,
    /// Already present; never overwritten.
    pub skipped: Vec<PathBuf>,
}

impl InitReport {
    fn write(&mut self, path: PathBuf, contents: &str) -> std::io::Result<()> {
        if path.exists() {
            self.skipped.push(path);
            return Ok(());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        self.written.push(path);
        Ok(())
    }
}

const EXAMPLE_DOCS: &[(&str, &str)] = &[
    (
        "README.md",
        "# Project Documentation\n\n## Overview\n\nThis is the home page of your documentation site. Edit `docs/README.md` to change it.\n\n- [Getting Started](guides/getting-started.md)\n- [Configuration](reference/configuration.md)\n",
    ),
    (
        "guides/README.md",
        "# Guides\n\nTask-oriented walkthroughs. Each file in this folder becomes an entry in the Guides section.\n",
    ),
    (
        "guides/getting-started.md",
        "---\ndescription: Install doc-builder, write a first page, and preview the site.\n---\n\n# Getting Started\n\nWrite markdown under `docs/`, then run `doc-builder dev` to preview it.\n\n## Build\n\n```bash\ndoc-builder build\n```\n\n## Diagrams\n\n```mermaid\ngraph LR\n    A[Markdown] --> B[doc-builder] --> C[HTML]\n```\n\n✅ Pages with a checkmark show a complete status icon.\n",
    ),
    (
        "reference/configuration.md",
        "---\ntitle: Configuration Reference\nstatus: reference\n---\n\n# Configuration\n\nSettings live in `doc-builder.toml`. Run `doc-builder init --config` to write a commented copy with every key.\n\n| Key | Purpose |\n|-----|---------|\n| `siteName` | Header and title text |\n| `docsDir` | Markdown source directory |\n| `outputDir` | Generated site directory |\n",
    ),
];

/// Write the stock config and/or an example docs tree. Existing files are
/// left alone and reported as skipped.
pub fn init(
    config_path: &Path,
    docs_dir: &Path,
    write_config: bool,
    write_example: bool,
) -> Result<InitReport, ProjectError> {
    let mut report = InitReport::default();
    if write_config {
        report.write(config_path.to_path_buf(), config::stock_config_toml())?;
    }
    if write_example {
        for (rel, contents) in EXAMPLE_DOCS {
            report.write(docs_dir.join(rel), contents)?;
        }
    }
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "init complete"
    );
    Ok(report)
}

// =============================================================================
// claude-hints
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HintsFormat {
    #[default]
    Markdown,
    Text,
}

impl std::str::FromStr for HintsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(HintsFormat::Markdown),
            "text" | "txt" => Ok(HintsFormat::Text),
            other => Err(format!("unknown format '{other}' (expected markdown or text)")),
        }
    }
}

const HINTS: &str = r#"# Writing documentation for doc-builder

These conventions keep generated pages, navigation, and search metadata accurate.

## File layout

- Put every page under the docs directory (default `docs/`) as a `.md` file.
- Each folder becomes a navigation section; a `README.md` in a folder is its overview page.
- Files and folders starting with `.` or `_` are ignored.
- Anything under a top-level `private/` folder is only published when authentication is on.

## Front matter

Start pages with a YAML block when you need control over metadata:

```yaml
---
title: Deployment Guide
description: How to ship the site to production in five minutes.
keywords: [deploy, vercel]
status: complete
---
```

- `title` overrides the first `# Heading`.
- `description` becomes the page summary, sidebar tooltip, and meta description.
- `status` sets the sidebar icon: draft, complete, warning, error, planning, deprecated, guide, readme, troubleshoot, reference.

## Content

- Use exactly one `# Heading` per page; it is the page title when front matter has none.
- Avoid ALL-CAPS titles; they are rewritten to title case.
- Add an `## Overview` section or a clear first sentence; it is used as the summary.
- Use fenced ```` ```mermaid ```` blocks for diagrams; a `title` line names the diagram.
- Link between pages with relative `.md` paths.

## Commands

- `doc-builder build` generates the site.
- `doc-builder dev` serves it with rebuilds on save.
- `doc-builder seo-check` reports title, description, and heading problems.
"#;

/// Authoring hints for AI assistants.
pub fn claude_hints(format: HintsFormat) -> String {
    match format {
        HintsFormat::Markdown => HINTS.to_string(),
        HintsFormat::Text => markdown_to_text(HINTS),
    }
}

fn markdown_to_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    for line in markdown.lines() {
        let trimmed = line.trim_start_matches('#').trim_start();
        let line = if trimmed.len() != line.len() {
            trimmed.to_uppercase()
        } else {
            line.replace('`', "")
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
