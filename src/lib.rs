//! # doc-builder
//!
//! A static site generator for documentation. A directory of markdown files
//! becomes a navigable HTML site: folders are sidebar sections, `README.md`
//! is a folder's overview page, and every page gets SEO metadata, a status
//! icon, and breadcrumbs.
//!
//! # Architecture: One Build, Two Passes
//!
//! ```text
//! docs/  →  scan  →  DocFile list  →  render (Normal)  →  html/
//!                                  →  render (Static)  →  html-static/   (optional)
//! ```
//!
//! A build scans once per pass, transforms each markdown file, builds the
//! navigation tree, and writes one page per document plus the site-wide
//! files (`index.html`, `404.html`, `sitemap.xml`, ...). The static pass
//! renders the same documents with relative links and no authentication so
//! the tree can be opened straight from disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the docs directory, filters private and hidden files, collects attachments |
//! | [`content`] | Front matter, title resolution, markdown to HTML, mermaid blocks |
//! | [`metadata`] | Summaries and status detection from markdown text |
//! | [`navigation`] | Folder tree and sidebar HTML |
//! | [`render`] | Page templates with Maud: document pages, landing page, changelog, 404 |
//! | [`seo`] | Meta tags, JSON-LD, sitemap, robots.txt, the SEO checker |
//! | [`auth`] | Login/logout pages and the client auth script |
//! | [`generate`] | Orchestrates a build: passes, index resolution, asset and attachment copy |
//! | [`config`] | Layered `doc-builder.toml` loading: defaults, preset, file, CLI flags |
//! | [`server`] | Dev server with rebuild on change |
//! | [`deploy`] | Vercel CLI wrapper |
//! | [`project`] | `init` and the config-editing commands |
//! | [`naming`] | URL paths, display names, title normalization |
//! | [`icons`] | Emoji, status, and folder icon tables |
//! | [`types`] | Shared types: `DocFile`, `RenderMode`, `FrontMatter`, `Status` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed templates are build errors, interpolation is
//! escaped by default, and there is no template directory to ship.
//!
//! ## Render Mode Is a Value
//!
//! Absolute versus relative links, and whether authentication may appear,
//! are decided by [`types::RenderMode`] once per pass and passed down. No
//! template checks a global flag.
//!
//! ## Lookup Tables Are Passed In
//!
//! Emoji replacements, status icons, folder descriptions and folder icons
//! are plain values built from config. Tests substitute their own tables.
//!
//! ## Index Precedence
//!
//! `index.html` comes from `index.md` when present, otherwise from the root
//! `README.md` page, otherwise a generated landing page listing every page.
//! Any other `index.html` left in the output directory is overwritten.

pub mod auth;
pub mod config;
pub mod content;
pub mod deploy;
pub mod generate;
pub mod icons;
pub mod metadata;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod project;
pub mod render;
pub mod scan;
pub mod seo;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
