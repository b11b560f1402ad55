//! Sidebar navigation.
//!
//! Two steps, kept apart so each can be tested on its own:
//!
//! 1. [`NavFolder::build`] turns the flat document list into a folder tree,
//!    one node per URL path segment. Documents inside a folder are ordered
//!    README first, then by display name.
//! 2. [`render_navigation`] serializes the tree for one page. It is a pure
//!    function of (tree, current page, context).
//!
//! ## Rendered shape
//!
//! Sections are emitted flat, parent before children, each carrying its
//! nesting level:
//!
//! ```text
//! div.nav-section[data-level=0]        root files ("Documentation")
//! div.nav-section[data-level=1]        guides/
//! div.nav-section[data-level=2]        guides/advanced/
//! div.nav-section[data-level=1]        reference/
//! ```
//!
//! Top-level folders listed in `folderOrder` come first, the rest follow
//! alphabetically. A folder section is expanded when it holds the current
//! page anywhere in its subtree, or when the current page is the home page.
//! The root README page expands the top-level folders, since it doubles as
//! the home page when there is no `index.md`.

use crate::icons::{StatusIcons, folder_icon};
use crate::naming;
use crate::types::{DocFile, RenderMode};
use maud::{Markup, html};
use std::collections::BTreeMap;

/// Site home page, relative to the output root.
pub const HOME_PAGE: &str = "index.html";

/// Root README page; copied over the home page when there is no `index.md`.
const ROOT_README_PAGE: &str = "README.html";

/// Label of the synthetic root section.
const ROOT_LABEL: &str = "Documentation";
const ROOT_ICON: &str = "ph ph-house";

/// One folder in the navigation tree.
#[derive(Debug, Default)]
pub struct NavFolder<'a> {
    /// Raw (percent-encoded) URL segment; empty for the root.
    pub name: String,
    /// Segments from the root to this folder.
    pub segments: Vec<String>,
    /// Documents directly in this folder, README first then by display name.
    pub docs: Vec<&'a DocFile>,
    pub folders: BTreeMap<String, NavFolder<'a>>,
}

impl<'a> NavFolder<'a> {
    /// Build the tree from a flat document list.
    pub fn build(docs: &'a [DocFile]) -> Self {
        let mut root = NavFolder::default();
        for doc in docs {
            let parts: Vec<&str> = doc.url_path.split('/').collect();
            let mut node = &mut root;
            for part in &parts[..parts.len() - 1] {
                let mut segments = node.segments.clone();
                segments.push(part.to_string());
                node = node
                    .folders
                    .entry(part.to_string())
                    .or_insert_with(|| NavFolder {
                        name: part.to_string(),
                        segments,
                        ..NavFolder::default()
                    });
            }
            node.docs.push(doc);
        }
        root.sort();
        root
    }

    fn sort(&mut self) {
        self.docs.sort_by(|a, b| {
            b.is_readme()
                .cmp(&a.is_readme())
                .then_with(|| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()))
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        for folder in self.folders.values_mut() {
            folder.sort();
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Nesting level: 0 for the root, 1 for top-level folders.
    pub fn level(&self) -> usize {
        self.segments.len()
    }

    /// True when no document exists anywhere in this subtree.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty() && self.folders.values().all(NavFolder::is_empty)
    }

    /// True when `url_path` is a document anywhere in this subtree.
    pub fn contains(&self, url_path: &str) -> bool {
        self.docs.iter().any(|d| d.url_path == url_path)
            || self.folders.values().any(|f| f.contains(url_path))
    }

    /// Number of documents in this subtree.
    pub fn doc_count(&self) -> usize {
        self.docs.len() + self.folders.values().map(NavFolder::doc_count).sum::<usize>()
    }

    /// Human label: "Documentation" for the root, else the humanized name.
    pub fn display_name(&self) -> String {
        if self.is_root() {
            ROOT_LABEL.to_string()
        } else {
            naming::folder_display_name(&self.name)
        }
    }

    fn readme(&self) -> Option<&'a DocFile> {
        self.docs.iter().copied().find(|d| d.is_readme())
    }

    /// Children in render order: `order` entries first (top level only),
    /// then the rest alphabetically.
    fn ordered_children(&self, order: &[String]) -> Vec<&NavFolder<'a>> {
        let mut out: Vec<&NavFolder<'a>> = Vec::with_capacity(self.folders.len());
        if self.is_root() {
            for name in order {
                if let Some(folder) = self.folders.get(name) {
                    out.push(folder);
                }
            }
        }
        for (name, folder) in &self.folders {
            if !(self.is_root() && order.contains(name)) {
                out.push(folder);
            }
        }
        out
    }
}

/// Lookup tables and link mode used while rendering.
#[derive(Debug, Clone, Copy)]
pub struct NavContext<'a> {
    pub folder_order: &'a [String],
    pub folder_descriptions: &'a BTreeMap<String, String>,
    pub folder_icons: &'a BTreeMap<String, String>,
    pub status_icons: &'a StatusIcons,
    pub mode: RenderMode,
}

/// Render the full navigation for the page at `current` (a URL path).
pub fn render_navigation(tree: &NavFolder, current: &str, ctx: &NavContext) -> String {
    let prefix = ctx.mode.root_prefix(current.matches('/').count());
    let mut out = String::new();
    render_folder(tree, current, &prefix, ctx, &mut out);
    out
}

fn render_folder(folder: &NavFolder, current: &str, prefix: &str, ctx: &NavContext, out: &mut String) {
    if folder.is_empty() {
        return;
    }
    // The root section only exists to hold root-level files.
    if !folder.is_root() || !folder.docs.is_empty() {
        out.push_str(&render_section(folder, current, prefix, ctx).into_string());
    }
    for child in folder.ordered_children(ctx.folder_order) {
        render_folder(child, current, prefix, ctx, out);
    }
}

fn render_section(folder: &NavFolder, current: &str, prefix: &str, ctx: &NavContext) -> Markup {
    let level = folder.level();
    let label = folder.display_name();
    let collapsible = !folder.is_root();
    let expanded = folder.contains(current)
        || current == HOME_PAGE
        || (current == ROOT_README_PAGE && level == 1);
    let section_id = collapsible.then(|| section_id(folder));
    let icon = if folder.is_root() {
        ROOT_ICON
    } else {
        folder_icon(ctx.folder_icons, &folder.name)
    };
    let href = if folder.is_root() {
        format!("{prefix}{HOME_PAGE}")
    } else {
        folder
            .readme()
            .map_or_else(|| "#".to_string(), |r| format!("{prefix}{}", r.url_path))
    };
    let tooltip = ctx.folder_descriptions.get(&folder.name);

    html! {
        div.nav-section data-level=(level) {
            a.nav-title.collapsible[collapsible].expanded[collapsible && expanded]
                href=(href)
                data-target=[section_id.as_deref()]
                data-tooltip=[tooltip] {
                @if collapsible {
                    i.ph.ph-caret-right.collapse-icon {}
                }
                i class=(icon) {}
                " " (label)
            }
            div.nav-content.collapsed[collapsible && !expanded] id=[section_id.as_deref()] {
                @for doc in &folder.docs {
                    @let active = doc.url_path == current
                        || (current == HOME_PAGE && folder.is_root() && doc.is_readme());
                    a.nav-item.active[active]
                        href={ (prefix) (doc.url_path) }
                        data-tooltip=[doc.summary.as_deref()] {
                        i class=(ctx.status_icons.icon_for(doc.status)) {}
                        " " (doc_label(doc, folder, &label))
                    }
                }
            }
        }
    }
}

/// Sidebar label of a document: README becomes "Overview" (or
/// "{Folder} Overview" inside a folder), everything else uses its title.
pub fn doc_label(doc: &DocFile, folder: &NavFolder, folder_label: &str) -> String {
    if doc.is_readme() {
        if folder.is_root() {
            "Overview".to_string()
        } else {
            format!("{folder_label} Overview")
        }
    } else {
        doc.title.clone()
    }
}

/// `nav-{segments joined by -}-{level}`, reduced to id-safe characters.
fn section_id(folder: &NavFolder) -> String {
    let joined: String = folder
        .segments
        .join("-")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    format!("nav-{joined}-{}", folder.level())
}
