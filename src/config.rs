//! Site configuration module.
//!
//! Handles loading, validating, and merging `doc-builder.toml`. Configuration
//! is layered: stock defaults are overridden by an optional named preset, then
//! by the user's config file, then by command-line flags.
//!
//! ```text
//! stock defaults  →  --preset  →  doc-builder.toml  →  CLI flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! docsDir = "docs"
//! outputDir = "html"
//! siteName = "Documentation"
//! siteDescription = "Documentation site built with doc-builder"
//! favicon = "✨"
//! # productionUrl = "https://docs.example.com"
//! attachmentTypes = [".pdf", ".png", ...]
//! folderOrder = []
//!
//! [features]
//! authentication = false
//! changelog = true
//! mermaid = true
//! darkMode = true
//! phosphorIcons = true
//! phosphorWeight = "regular"   # thin, light, regular, bold, fill, duotone
//! phosphorSize = "1.2em"
//! normalizeTitle = true
//! showPdfDownload = true
//! menuDefaultOpen = true
//! attachments = true
//!
//! [auth]                      # required when features.authentication = true
//! # supabaseUrl = "https://xyz.supabase.co"
//! # supabaseAnonKey = "..."
//! # siteId = "..."
//!
//! [seo]
//! enabled = true
//! # siteUrl = "https://docs.example.com"   # SEO output needs this
//! language = "en-US"
//! titleTemplate = "{pageTitle} | {siteName}"
//! autoKeywords = true
//! keywordLimit = 7
//!
//! [changelog]
//! daysBack = 14
//!
//! [staticOutput]
//! enabled = false
//! outputDir = "html-static"
//! ```
//!
//! Keys are camelCase. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "doc-builder.toml";

/// Names accepted by `--preset`.
pub const PRESETS: &[&str] = &["notion-inspired"];

/// Phosphor icon weights understood by the stylesheet CDN.
const PHOSPHOR_WEIGHTS: &[&str] = &["thin", "light", "regular", "bold", "fill", "duotone"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Unknown preset '{0}' (available: notion-inspired)")]
    UnknownPreset(String),
}

/// Site configuration loaded from `doc-builder.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Config {
    /// Markdown source directory.
    pub docs_dir: PathBuf,
    /// Generated site directory.
    pub output_dir: PathBuf,
    pub site_name: String,
    pub site_description: String,
    /// Emoji or image path used for the tab icon.
    pub favicon: String,
    /// Stable public URL reported after production deploys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_url: Option<String>,
    pub features: FeaturesConfig,
    pub auth: AuthConfig,
    pub seo: SeoConfig,
    /// Extensions (with or without the leading dot) copied verbatim to output.
    pub attachment_types: Vec<String>,
    pub changelog: ChangelogConfig,
    /// Top-level folders listed first in the sidebar, in this order.
    pub folder_order: Vec<String>,
    /// Folder name → tooltip text.
    pub folder_descriptions: BTreeMap<String, String>,
    /// Folder name → icon class.
    pub folder_icons: BTreeMap<String, String>,
    pub static_output: StaticOutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            output_dir: PathBuf::from("html"),
            site_name: "Documentation".to_string(),
            site_description: "Documentation site built with doc-builder".to_string(),
            favicon: "✨".to_string(),
            production_url: None,
            features: FeaturesConfig::default(),
            auth: AuthConfig::default(),
            seo: SeoConfig::default(),
            attachment_types: default_attachment_types(),
            changelog: ChangelogConfig::default(),
            folder_order: Vec::new(),
            folder_descriptions: BTreeMap::new(),
            folder_icons: BTreeMap::new(),
            static_output: StaticOutputConfig::default(),
        }
    }
}

fn default_attachment_types() -> Vec<String> {
    [
        ".pdf", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".zip", ".csv", ".xlsx",
        ".docx", ".pptx", ".txt", ".json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Validate config values before any output is written.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.features.authentication {
            let missing: Vec<&str> = [
                ("auth.supabaseUrl", &self.auth.supabase_url),
                ("auth.supabaseAnonKey", &self.auth.supabase_anon_key),
                ("auth.siteId", &self.auth.site_id),
            ]
            .into_iter()
            .filter(|(_, v)| v.as_deref().is_none_or(|s| s.trim().is_empty()))
            .map(|(k, _)| k)
            .collect();
            if !missing.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "authentication is enabled but {} not set (disable it with --no-auth)",
                    missing.join(", ")
                )));
            }
        }
        if self.seo.keyword_limit == 0 {
            return Err(ConfigError::Validation(
                "seo.keywordLimit must be greater than 0".into(),
            ));
        }
        if !PHOSPHOR_WEIGHTS.contains(&self.features.phosphor_weight.as_str()) {
            return Err(ConfigError::Validation(format!(
                "features.phosphorWeight must be one of {}",
                PHOSPHOR_WEIGHTS.join(", ")
            )));
        }
        if self.static_output.enabled && self.static_output.output_dir == self.output_dir {
            return Err(ConfigError::Validation(
                "staticOutput.outputDir must differ from outputDir".into(),
            ));
        }
        Ok(())
    }

    /// True when pages need SEO metadata: enabled and a site URL to anchor it.
    pub fn seo_site_url(&self) -> Option<&str> {
        if !self.seo.enabled {
            return None;
        }
        self.seo
            .site_url
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .filter(|s| !s.is_empty())
    }
}

/// Feature toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct FeaturesConfig {
    pub authentication: bool,
    pub changelog: bool,
    pub mermaid: bool,
    pub dark_mode: bool,
    /// Substitute known emoji with Phosphor icon markup.
    pub phosphor_icons: bool,
    pub phosphor_weight: String,
    pub phosphor_size: String,
    /// Rewrite shouting titles to title case.
    pub normalize_title: bool,
    pub show_pdf_download: bool,
    pub menu_default_open: bool,
    pub attachments: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            authentication: false,
            changelog: true,
            mermaid: true,
            dark_mode: true,
            phosphor_icons: true,
            phosphor_weight: "regular".to_string(),
            phosphor_size: "1.2em".to_string(),
            normalize_title: true,
            show_pdf_download: true,
            menu_default_open: true,
            attachments: true,
        }
    }
}

/// Supabase credentials for the authentication gate.
///
/// All unset by default; validation demands them only when
/// `features.authentication` is on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_anon_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
}

/// Search-engine metadata settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SeoConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
    pub language: String,
    /// Site-wide keywords, placed before page keywords.
    pub keywords: Vec<String>,
    /// `{pageTitle}` and `{siteName}` are substituted.
    pub title_template: String,
    pub auto_keywords: bool,
    pub keyword_limit: usize,
    /// `smart` or `first-paragraph`.
    pub description_fallback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    pub generate_sitemap: bool,
    pub generate_robots_txt: bool,
    pub custom_meta_tags: Vec<CustomMetaTag>,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            site_url: None,
            author: None,
            twitter_handle: None,
            language: "en-US".to_string(),
            keywords: Vec::new(),
            title_template: "{pageTitle} | {siteName}".to_string(),
            auto_keywords: true,
            keyword_limit: 7,
            description_fallback: "smart".to_string(),
            organization: None,
            og_image: None,
            generate_sitemap: true,
            generate_robots_txt: true,
            custom_meta_tags: Vec::new(),
        }
    }
}

/// Publisher shown in JSON-LD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct OrganizationConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// An extra `<meta>` tag keyed by either `name` or `property`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CustomMetaTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    pub content: String,
}

/// Recently-changed page listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ChangelogConfig {
    pub days_back: u32,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self { days_back: 14 }
    }
}

/// Public, unauthenticated mirror with relative asset paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct StaticOutputConfig {
    pub enabled: bool,
    pub output_dir: PathBuf,
}

impl Default for StaticOutputConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: PathBuf::from("html-static"),
        }
    }
}

// =============================================================================
// Command-line overrides
// =============================================================================

/// Flags from the command line that take precedence over every file layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub preset: Option<String>,
    /// Auto-detect a `docs/` + `html/` pair under `base_dir`.
    pub legacy: bool,
    pub no_auth: bool,
    pub no_changelog: bool,
    pub production_url: Option<String>,
}

impl CliOverrides {
    /// Render the overrides as a sparse TOML table for the final merge layer.
    pub fn to_value(&self, base_dir: &Path) -> toml::Value {
        let mut table = toml::map::Map::new();
        let mut features = toml::map::Map::new();

        if self.legacy && base_dir.join("docs").is_dir() && base_dir.join("html").is_dir() {
            tracing::info!("legacy mode: detected docs/ and html/ structure");
            table.insert("docsDir".into(), path_value(&base_dir.join("docs")));
            table.insert("outputDir".into(), path_value(&base_dir.join("html")));
        }
        if let Some(input) = &self.input {
            table.insert("docsDir".into(), path_value(input));
        }
        if let Some(output) = &self.output {
            table.insert("outputDir".into(), path_value(output));
        }
        if let Some(url) = &self.production_url {
            table.insert("productionUrl".into(), toml::Value::String(url.clone()));
        }
        if self.no_auth {
            features.insert("authentication".into(), toml::Value::Boolean(false));
        }
        if self.no_changelog {
            features.insert("changelog".into(), toml::Value::Boolean(false));
        }
        if !features.is_empty() {
            table.insert("features".into(), toml::Value::Table(features));
        }
        toml::Value::Table(table)
    }
}

fn path_value(path: &Path) -> toml::Value {
    toml::Value::String(path.to_string_lossy().into_owned())
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Returns the named preset as a sparse overlay.
pub fn preset_value(name: &str) -> Result<toml::Value, ConfigError> {
    match name {
        "notion-inspired" => Ok(toml::from_str(NOTION_INSPIRED_PRESET)?),
        other => Err(ConfigError::UnknownPreset(other.to_string())),
    }
}

const NOTION_INSPIRED_PRESET: &str = r#"
siteDescription = "Clean, modern documentation"
folderOrder = ["product-roadmap", "product-requirements", "architecture", "system-analysis", "team"]

[features]
changelog = true
mermaid = true
darkMode = true
phosphorIcons = true
normalizeTitle = true
menuDefaultOpen = true

[seo]
keywords = ["documentation", "api", "guide"]

[folderDescriptions]
product-roadmap = "Strategic vision, timeline, and feature planning"
product-requirements = "Detailed product specifications, requirements documents, and feature definitions"
architecture = "System design, data flows, and technical infrastructure documentation"
system-analysis = "Comprehensive system analysis, functional requirements, and cross-component documentation"
team = "Team roles, responsibilities, and task assignments"
testing = "Testing procedures, checklists, and quality assurance"

[folderIcons]
product-roadmap = "ph ph-road-horizon"
product-requirements = "ph ph-clipboard-text"
architecture = "ph ph-tree-structure"
system-analysis = "ph ph-chart-line"
team = "ph ph-users"
testing = "ph ph-flask"
"#;

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the fully layered config: defaults → preset → file → CLI flags.
///
/// `config_path` may point at a file that does not exist; defaults are used then.
/// Relative `--legacy` detection is anchored at the config file's directory.
pub fn load_config(config_path: &Path, overrides: &CliOverrides) -> Result<Config, ConfigError> {
    let mut merged = stock_defaults_value();
    if let Some(name) = &overrides.preset {
        merged = merge_toml(merged, preset_value(name)?);
        tracing::debug!(preset = %name, "applied preset");
    }
    match load_raw_config(config_path)? {
        Some(user) => {
            tracing::debug!(path = %config_path.display(), "loaded config file");
            merged = merge_toml(merged, user);
        }
        None => tracing::debug!(path = %config_path.display(), "no config file, using defaults"),
    }
    let base_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    resolve_config(merged, Some(overrides.to_value(base_dir)))
}

/// Returns a fully-commented stock `doc-builder.toml` with all keys and explanations.
///
/// Used by `doc-builder init --config`.
pub fn stock_config_toml() -> &'static str {
    r##"# doc-builder Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Markdown source directory and generated site directory.
docsDir = "docs"
outputDir = "html"

# Site metadata shown in the header and page titles.
siteName = "Documentation"
siteDescription = "Documentation site built with doc-builder"

# Emoji or path to an image used as the browser tab icon.
favicon = "✨"

# Stable URL reported after `doc-builder deploy` to production.
# productionUrl = "https://docs.example.com"

# Non-markdown files copied verbatim into the output tree.
attachmentTypes = [".pdf", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".zip", ".csv", ".xlsx", ".docx", ".pptx", ".txt", ".json"]

# Top-level folders listed first in the sidebar, in this order.
folderOrder = []

# ---------------------------------------------------------------------------
# Features
# ---------------------------------------------------------------------------
[features]
# Gate the site behind a Supabase login (requires the [auth] section).
authentication = false
# Generate changelog.html listing recently modified pages.
changelog = true
# Render ```mermaid fenced blocks as diagrams.
mermaid = true
darkMode = true
# Replace known emoji with Phosphor icons.
phosphorIcons = true
phosphorWeight = "regular"   # thin, light, regular, bold, fill, duotone
phosphorSize = "1.2em"
# Rewrite ALL-CAPS titles to Title Case.
normalizeTitle = true
showPdfDownload = true
menuDefaultOpen = true
# Copy files matching attachmentTypes.
attachments = true

# ---------------------------------------------------------------------------
# Authentication (only read when features.authentication = true)
# ---------------------------------------------------------------------------
[auth]
# supabaseUrl = "https://your-project.supabase.co"
# supabaseAnonKey = "your-anon-key"
# siteId = "your-site-id"

# ---------------------------------------------------------------------------
# SEO (meta tags, JSON-LD, sitemap.xml and robots.txt need siteUrl)
# ---------------------------------------------------------------------------
[seo]
enabled = true
# siteUrl = "https://docs.example.com"
# author = "Your Name"
# twitterHandle = "@handle"
language = "en-US"
keywords = []
titleTemplate = "{pageTitle} | {siteName}"
autoKeywords = true
keywordLimit = 7
descriptionFallback = "smart"   # smart or first-paragraph
# ogImage = "/og-default.png"
generateSitemap = true
generateRobotsTxt = true
customMetaTags = []

# [seo.organization]
# name = "Example Ltd"
# url = "https://example.com"
# logo = "https://example.com/logo.png"

# ---------------------------------------------------------------------------
# Changelog
# ---------------------------------------------------------------------------
[changelog]
daysBack = 14

# ---------------------------------------------------------------------------
# Sidebar folder metadata
# ---------------------------------------------------------------------------
[folderDescriptions]
# guides = "Step-by-step tutorials"

[folderIcons]
# guides = "ph ph-book-open"

# ---------------------------------------------------------------------------
# Public static mirror (no auth, relative asset paths)
# ---------------------------------------------------------------------------
[staticOutput]
enabled = false
outputDir = "html-static"
"##
}
