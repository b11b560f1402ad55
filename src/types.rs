//! Shared types passed between pipeline stages.
//!
//! A build constructs these once during the scan and treats them as
//! read-only afterward; every later stage borrows them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// One source markdown file and everything derived from it without rendering.
#[derive(Debug, Clone)]
pub struct DocFile {
    /// Absolute (or docs-root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the docs root, `/`-separated.
    pub relative_path: String,
    /// Output path relative to the site root, `.html` suffix, each segment
    /// percent-encoded. Also the navigation key.
    pub url_path: String,
    /// Filename stem, used for sidebar ordering.
    pub display_name: String,
    /// Resolved document title: front matter, first `# heading`, or filename.
    pub title: String,
    /// Tooltip text.
    pub summary: Option<String>,
    pub status: Status,
    /// First path segment is `private`.
    pub is_private: bool,
    pub front_matter: FrontMatter,
    pub modified: Option<SystemTime>,
}

impl DocFile {
    /// Directory depth of the generated page below the site root.
    pub fn depth(&self) -> usize {
        self.url_path.matches('/').count()
    }

    /// True for `README.md` at any level.
    pub fn is_readme(&self) -> bool {
        self.display_name == "README"
    }
}

/// How a build pass links pages and assets.
///
/// Chosen once per pass and passed down to every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Site-root absolute links, optional authentication, live header.
    Normal,
    /// Depth-relative links, no authentication; opens from any directory.
    Static,
}

impl RenderMode {
    /// Prefix that reaches the site root from a page `depth` directories down.
    pub fn root_prefix(self, depth: usize) -> String {
        match self {
            RenderMode::Normal => "/".to_string(),
            RenderMode::Static => "../".repeat(depth),
        }
    }

    pub fn allows_auth(self) -> bool {
        matches!(self, RenderMode::Normal)
    }
}

/// A non-markdown file copied verbatim to the output tree.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentFile {
    pub source: PathBuf,
    /// Path relative to the docs root, `/`-separated.
    pub relative_path: String,
    pub size: u64,
}

/// YAML front matter recognised at the top of a document.
///
/// Unrecognised keys are kept in `extra` so authors can annotate freely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "keywords_list_or_csv")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Accept `keywords: [a, b]` as well as `keywords: "a, b"`.
fn keywords_list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Keywords {
        List(Vec<String>),
        Csv(String),
        None(()),
    }
    Ok(match Keywords::deserialize(deserializer)? {
        Keywords::List(list) => list,
        Keywords::Csv(s) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect(),
        Keywords::None(()) => Vec::new(),
    })
}

/// Document status, shown as the sidebar icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Complete,
    Warning,
    Error,
    Planning,
    Deprecated,
    Guide,
    Readme,
    Troubleshoot,
    Reference,
    #[default]
    Default,
}

impl Status {
    pub const ALL: [Status; 11] = [
        Status::Draft,
        Status::Complete,
        Status::Warning,
        Status::Error,
        Status::Planning,
        Status::Deprecated,
        Status::Guide,
        Status::Readme,
        Status::Troubleshoot,
        Status::Reference,
        Status::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Complete => "complete",
            Status::Warning => "warning",
            Status::Error => "error",
            Status::Planning => "planning",
            Status::Deprecated => "deprecated",
            Status::Guide => "guide",
            Status::Readme => "readme",
            Status::Troubleshoot => "troubleshoot",
            Status::Reference => "reference",
            Status::Default => "default",
        }
    }

    /// Parse an author-supplied status, tolerating case and common synonyms.
    pub fn parse(raw: &str) -> Option<Status> {
        let lower = raw.trim().to_lowercase();
        let status = match lower.as_str() {
            "draft" | "wip" | "in progress" | "in-progress" => Status::Draft,
            "complete" | "completed" | "done" | "final" | "published" => Status::Complete,
            "warning" => Status::Warning,
            "error" | "broken" => Status::Error,
            "planning" | "planned" | "proposal" => Status::Planning,
            "deprecated" | "archived" | "obsolete" => Status::Deprecated,
            "guide" => Status::Guide,
            "readme" => Status::Readme,
            "troubleshoot" | "troubleshooting" => Status::Troubleshoot,
            "reference" => Status::Reference,
            "default" => Status::Default,
            _ => return None,
        };
        Some(status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
