//! Filesystem scanning.
//!
//! Stage 1 of the build. Walks the docs directory and classifies every file
//! as a markdown document, an attachment, or ignored.
//!
//! ## Directory Structure
//!
//! ```text
//! docs/
//! ├── README.md                # Root overview (sorted first in its folder)
//! ├── index.md                 # Optional explicit home page
//! ├── guides/
//! │   ├── README.md
//! │   ├── setup.md
//! │   └── diagram.png          # Attachment (extension in attachmentTypes)
//! ├── private/                 # Only published behind authentication
//! │   └── notes.md
//! ├── _drafts/                 # Underscore prefix: skipped
//! └── .obsidian/               # Dot prefix: skipped
//! ```
//!
//! ## Rules
//!
//! - Dot-prefixed and underscore-prefixed files and directories are skipped.
//! - Names containing control characters are skipped with a warning.
//! - With `exclude_private`, everything under a top-level `private/` is omitted.
//! - A missing docs root is created empty.
//!
//! Results come back sorted by relative path, so the order is stable across
//! platforms and runs.

use crate::content;
use crate::metadata::{self, MetadataError, SUMMARY_MAX_LEN};
use crate::naming;
use crate::types::{AttachmentFile, DocFile};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// First path segment that marks content as private.
pub const PRIVATE_SEGMENT: &str = "private";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },
}

/// What to collect during a scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions<'a> {
    /// File extensions treated as attachments, with or without the leading dot.
    pub attachment_types: &'a [String],
    /// Collect attachments at all.
    pub attachments: bool,
    /// Omit everything under a top-level `private/` directory.
    pub exclude_private: bool,
    /// Rewrite shouting titles to title case.
    pub normalize_titles: bool,
}

/// Markdown documents and attachments found under the docs root.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub docs: Vec<DocFile>,
    pub attachments: Vec<AttachmentFile>,
}

impl ScanResult {
    pub fn attachment_bytes(&self) -> u64 {
        self.attachments.iter().map(|a| a.size).sum()
    }
}

pub fn scan(root: &Path, options: &ScanOptions) -> Result<ScanResult, ScanError> {
    if !root.exists() {
        fs::create_dir_all(root)?;
        debug!(root = %root.display(), "created missing docs directory");
    }

    let mut result = ScanResult::default();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_name(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative_path = to_slash(rel);

        if has_control_chars(&relative_path) {
            warn!(path = %relative_path.escape_debug(), "skipping file with control characters in its name");
            continue;
        }
        if options.exclude_private && is_private(&relative_path) {
            continue;
        }

        if is_markdown(entry.path()) {
            result
                .docs
                .push(read_doc(entry.path(), relative_path, options.normalize_titles)?);
        } else if options.attachments && is_attachment(entry.path(), options.attachment_types) {
            let size = entry.metadata()?.len();
            result.attachments.push(AttachmentFile {
                source: entry.path().to_path_buf(),
                relative_path,
                size,
            });
        }
    }

    result.docs.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    result
        .attachments
        .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    debug!(
        docs = result.docs.len(),
        attachments = result.attachments.len(),
        "scan complete"
    );
    Ok(result)
}

/// Build a [`DocFile`] from one markdown file on disk.
pub fn read_doc(
    path: &Path,
    relative_path: String,
    normalize_titles: bool,
) -> Result<DocFile, ScanError> {
    let raw = fs::read_to_string(path)?;
    let (front_matter, body) =
        metadata::parse_front_matter(&raw).map_err(|source| ScanError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = relative_path.rsplit('/').next().unwrap_or(&relative_path);
    let display_name = naming::display_name(file_name);
    let title = content::resolve_title(&front_matter, body, &display_name, normalize_titles);
    let summary = metadata::extract_summary(&front_matter, body, SUMMARY_MAX_LEN);
    let status = metadata::detect_status(&front_matter, &display_name, body);
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok();

    Ok(DocFile {
        path: path.to_path_buf(),
        url_path: naming::url_path_for(&relative_path),
        is_private: is_private(&relative_path),
        relative_path,
        display_name,
        title,
        summary,
        status,
        front_matter,
        modified,
    })
}

fn is_skipped_name(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_')
}

fn has_control_chars(s: &str) -> bool {
    s.chars().any(char::is_control)
}

/// True when the first path segment is `private`.
pub fn is_private(relative_path: &str) -> bool {
    relative_path.split('/').next() == Some(PRIVATE_SEGMENT)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

fn is_attachment(path: &Path, types: &[String]) -> bool {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
        return false;
    };
    types
        .iter()
        .any(|t| t.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

fn to_slash(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
