//! Shared test utilities for the doc-builder test suite.
//!
//! Provides fixture setup, document builders, lookup helpers, and a
//! navigation extractor that works on rendered sidebar HTML.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let result = scan(tmp.path(), &options).unwrap();
//!
//! let setup = find_doc(&result.docs, "guides/setup.md");
//! assert_eq!(setup.title, "Setup Guide");
//!
//! let html = render_navigation(&NavFolder::build(&docs), "index.html", &ctx);
//! assert_eq!(nav_titles(&html), vec!["Documentation", "Overview"]);
//! ```

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tempfile::TempDir;

use crate::naming;
use crate::scan::is_private;
use crate::types::{DocFile, FrontMatter, Status};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/docs/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    copy_fixtures_to(tmp.path());
    tmp
}

/// Copy `fixtures/docs/` into `dest`, creating it.
pub fn copy_fixtures_to(dest: &Path) {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/docs");
    std::fs::create_dir_all(dest).unwrap();
    copy_dir_recursive(&fixtures, dest).unwrap();
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a markdown file under `root`, creating parent directories.
pub fn write_doc(root: &Path, relative_path: &str, content: &str) {
    let path = root.join(relative_path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

// =========================================================================
// Document builders and lookups
// =========================================================================

/// An in-memory [`DocFile`] with derived paths and the given title.
pub fn doc(relative_path: &str, title: &str) -> DocFile {
    let file_name = relative_path.rsplit('/').next().unwrap();
    DocFile {
        path: Path::new("/docs").join(relative_path),
        relative_path: relative_path.to_string(),
        url_path: naming::url_path_for(relative_path),
        display_name: naming::display_name(file_name),
        title: title.to_string(),
        summary: None,
        status: Status::Default,
        is_private: is_private(relative_path),
        front_matter: FrontMatter::default(),
        modified: None,
    }
}

/// Find a document by relative path. Panics if not found.
pub fn find_doc<'a>(docs: &'a [DocFile], relative_path: &str) -> &'a DocFile {
    docs.iter()
        .find(|d| d.relative_path == relative_path)
        .unwrap_or_else(|| {
            let available = doc_paths(docs);
            panic!("doc '{relative_path}' not found. Available: {available:?}")
        })
}

/// Relative paths of every document, in order.
pub fn doc_paths(docs: &[DocFile]) -> Vec<&str> {
    docs.iter().map(|d| d.relative_path.as_str()).collect()
}

// =========================================================================
// Navigation extraction
// =========================================================================

static NAV_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a class="nav-(?:title|item)[^"]*"[^>]*>(.*?)</a>"#).unwrap()
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Labels of every section title and item link in rendered navigation HTML,
/// in document order.
pub fn nav_titles(html: &str) -> Vec<String> {
    NAV_LINK
        .captures_iter(html)
        .map(|c| TAG.replace_all(&c[1], "").trim().to_string())
        .collect()
}
