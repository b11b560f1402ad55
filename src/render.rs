//! Page rendering.
//!
//! Every generated page shares one document shell: head (meta, SEO, assets),
//! header, breadcrumbs, sidebar with the rendered navigation, and the content
//! column. [`RenderMode`] picks how links reach the site root and whether the
//! authentication gate is wired in; it is chosen once per build pass.
//!
//! ## Head contents
//!
//! - description and generator meta
//! - with an SEO site URL: keywords, canonical, Open Graph, Twitter Card, JSON-LD
//! - web fonts, Phosphor icons (optional), mermaid (optional)
//! - the stylesheet, fingerprinted with `?v=` so deploys bust caches
//! - normal mode with authentication: the Supabase client plus `/auth.js`
//! - static mode: a blue accent override so the public mirror is recognizable

use crate::auth::{AUTH_SCRIPT_FILE, LOGOUT_PAGE, SUPABASE_CDN};
use crate::config::Config;
use crate::naming;
use crate::navigation::HOME_PAGE;
use crate::seo::{self, Breadcrumb, PageSeo};
use crate::types::{FrontMatter, RenderMode};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::time::SystemTime;

pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CSS_FILE: &str = "css/notion-style.css";
pub const JS_FILE: &str = "js/main.js";
pub const NOT_FOUND_PAGE: &str = "404.html";
pub const CHANGELOG_PAGE: &str = "changelog.html";

pub const STYLESHEET: &str = include_str!("../static/css/notion-style.css");
pub const MAIN_SCRIPT: &str = include_str!("../static/js/main.js");

const FONTS_URL: &str = "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&family=JetBrains+Mono:wght@400;500&display=swap";
const PHOSPHOR_URL: &str = "https://unpkg.com/@phosphor-icons/web@2.1.1";
const MERMAID_URL: &str = "https://cdn.jsdelivr.net/npm/mermaid@10.6.1/dist/mermaid.min.js";

const STATIC_THEME: &str = ":root { --color-primary: #2563eb; --color-primary-hover: #1d4ed8; --color-link: #2563eb; }\n[data-theme=\"dark\"] { --color-primary: #60a5fa; --color-primary-hover: #93c5fd; --color-link: #60a5fa; }";

/// First eight hex digits of the SHA-256 of an asset.
pub fn asset_version(content: &str) -> String {
    let mut hex = format!("{:x}", Sha256::digest(content.as_bytes()));
    hex.truncate(8);
    hex
}

/// Everything that stays fixed across the pages of one build pass.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub config: &'a Config,
    pub mode: RenderMode,
    /// URL paths of every page generated in this pass.
    pub pages: &'a BTreeSet<String>,
    pub built_at: DateTime<Utc>,
    css_version: String,
    js_version: String,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        config: &'a Config,
        mode: RenderMode,
        pages: &'a BTreeSet<String>,
        built_at: DateTime<Utc>,
    ) -> Self {
        Self {
            config,
            mode,
            pages,
            built_at,
            css_version: asset_version(STYLESHEET),
            js_version: asset_version(MAIN_SCRIPT),
        }
    }

    fn auth_enabled(&self) -> bool {
        self.mode.allows_auth() && self.config.features.authentication
    }

    fn has_page(&self, url_path: &str) -> bool {
        self.pages.contains(url_path)
    }
}

/// One markdown document ready to be wrapped in the page shell.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub url_path: &'a str,
    pub title: &'a str,
    pub body_html: &'a str,
    /// Markdown body without front matter; feeds descriptions and keywords.
    pub markdown: &'a str,
    pub front_matter: &'a FrontMatter,
    pub navigation: &'a str,
    pub modified: Option<SystemTime>,
}

/// Parts of the shell that differ from page to page.
struct Shell<'a> {
    url_path: &'a str,
    title: String,
    description: String,
    seo: Option<Markup>,
    navigation: &'a str,
    breadcrumbs: Vec<Breadcrumb>,
    actions: Option<Markup>,
    content: Markup,
}

/// Render a markdown document page.
pub fn render_page(page: &Page, ctx: &RenderContext) -> Markup {
    let config = ctx.config;
    let description = seo::page_description(page.front_matter, page.markdown, config);
    let crumbs = seo::breadcrumbs(page.url_path, page.title, &config.site_name, |p| {
        ctx.has_page(p)
    });

    let (title, seo_markup) = match config.seo_site_url() {
        Some(site_url) => {
            let title = seo::page_title(&config.seo.title_template, page.title, &config.site_name);
            let auto = if config.seo.auto_keywords {
                seo::extract_keywords(page.markdown, config.seo.keyword_limit)
            } else {
                Vec::new()
            };
            let page_seo = PageSeo {
                title: title.clone(),
                headline: page.title.to_string(),
                description: description.clone(),
                canonical: seo::canonical_url(site_url, page.url_path),
                keywords: seo::merge_keywords(
                    &config.seo.keywords,
                    &page.front_matter.keywords,
                    &auto,
                    config.seo.keyword_limit,
                ),
                breadcrumbs: crumbs.clone(),
                modified: page
                    .modified
                    .map(|m| DateTime::<Utc>::from(m).to_rfc3339()),
            };
            let markup = html! {
                (seo::meta_tags(&page_seo, config, site_url))
                (seo::json_ld_script(&seo::json_ld(&page_seo, config, site_url)))
            };
            (title, Some(markup))
        }
        None => (format!("{} - {}", page.title, config.site_name), None),
    };

    let source = naming::source_path_for(page.url_path);
    let source_name = source.rsplit('/').next().unwrap_or(&source).to_string();
    let actions = html! {
        div.content-actions {
            @if config.features.show_pdf_download {
                button.pdf-download-btn #pdf-download type="button" title="Download as PDF" {
                    i.ph.ph-file-pdf {} " PDF"
                }
            }
            a.source-download-btn href=(naming::encode_path(&source_name)) download title="Download markdown source" {
                i.ph.ph-file-md {} " Markdown"
            }
        }
    };

    document(
        Shell {
            url_path: page.url_path,
            title,
            description,
            seo: seo_markup,
            navigation: page.navigation,
            breadcrumbs: crumbs,
            actions: Some(actions),
            content: html! { (PreEscaped(page.body_html)) },
        },
        ctx,
    )
}

fn document(shell: Shell, ctx: &RenderContext) -> Markup {
    let config = ctx.config;
    let features = &config.features;
    let prefix = ctx.mode.root_prefix(shell.url_path.matches('/').count());
    let auth = ctx.auth_enabled();
    let favicon = format!(
        "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>{}</text></svg>",
        config.favicon
    );

    html! {
        (DOCTYPE)
        html lang=(config.seo.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(shell.description);
                meta name="generator" content={ "doc-builder v" (TOOL_VERSION) };
                title { (shell.title) }
                @if let Some(seo) = &shell.seo {
                    (seo)
                }
                link rel="preconnect" href="https://fonts.googleapis.com";
                link rel="preconnect" href="https://fonts.gstatic.com" crossorigin;
                link rel="stylesheet" href=(FONTS_URL);
                @if features.phosphor_icons {
                    script src=(PHOSPHOR_URL) {}
                }
                @if features.mermaid {
                    script src=(MERMAID_URL) {}
                }
                link rel="stylesheet" href={ (prefix) (CSS_FILE) "?v=" (ctx.css_version) };
                link rel="icon" href=(favicon);
                @if ctx.mode == RenderMode::Static {
                    style { (PreEscaped(STATIC_THEME)) }
                }
                @if auth {
                    script src=(SUPABASE_CDN) {}
                    script src={ "/" (AUTH_SCRIPT_FILE) } {}
                }
            }
            body {
                header.header {
                    div.header-content {
                        a.logo href={ (prefix) (HOME_PAGE) } { (config.site_name) }
                        div.header-actions {
                            @if ctx.mode == RenderMode::Normal {
                                div.deployment-info {
                                    span.deployment-date title={ "Built with doc-builder v" (TOOL_VERSION) } {
                                        "Last updated: " (ctx.built_at.format("%B %-d, %Y at %H:%M")) " UTC"
                                    }
                                }
                            }
                            @if auth {
                                a.logout-btn href={ "/" (LOGOUT_PAGE) } title="Logout" {
                                    i.ph.ph-sign-out {}
                                }
                            }
                            @if features.dark_mode {
                                button.theme-toggle #theme-toggle type="button" aria-label="Toggle dark mode" {
                                    i.ph.ph-moon {}
                                }
                            }
                            button.menu-toggle #menu-toggle type="button" aria-label="Toggle menu" {
                                i.ph.ph-list {}
                            }
                        }
                    }
                }
                nav.breadcrumbs #breadcrumbs aria-label="Breadcrumb" {
                    (render_breadcrumbs(&shell.breadcrumbs, &prefix))
                }
                div.main-wrapper {
                    aside.sidebar.open[features.menu_default_open] {
                        div.sidebar-header {
                            div.filter-box {
                                i.ph.ph-magnifying-glass.filter-icon {}
                                input.filter-input #nav-filter type="text" placeholder="Filter items..." aria-label="Filter navigation";
                            }
                        }
                        nav.navigation {
                            (PreEscaped(shell.navigation))
                        }
                        div.resize-handle {}
                    }
                    main.content {
                        div.content-inner {
                            @if let Some(actions) = &shell.actions {
                                (actions)
                            }
                            (shell.content)
                        }
                    }
                }
                script src={ (prefix) (JS_FILE) "?v=" (ctx.js_version) } {}
            }
        }
    }
}

fn render_breadcrumbs(crumbs: &[Breadcrumb], prefix: &str) -> Markup {
    let last = crumbs.len().saturating_sub(1);
    html! {
        @for (i, crumb) in crumbs.iter().enumerate() {
            @if i > 0 {
                i.ph.ph-caret-right.breadcrumb-separator {}
            }
            @if i == last {
                span.breadcrumb-current { (crumb.name) }
            } @else if let Some(path) = &crumb.path {
                @let target = if path.is_empty() { HOME_PAGE } else { path.as_str() };
                a href={ (prefix) (target) } {
                    @if i == 0 {
                        i.ph.ph-house {} " "
                    }
                    (crumb.name)
                }
            } @else {
                span.breadcrumb-folder { (crumb.name) }
            }
        }
    }
}

// =============================================================================
// Generated pages
// =============================================================================

/// A page listed on the landing page or the changelog.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub title: String,
    pub url_path: String,
    pub modified: Option<DateTime<Utc>>,
}

/// Landing page used when the docs have neither `index.md` nor a README.
pub fn default_index(pages: &[PageLink], navigation: &str, ctx: &RenderContext) -> Markup {
    let config = ctx.config;
    let prefix = ctx.mode.root_prefix(0);
    let content = html! {
        div.welcome-container {
            h1 { "Welcome to " (config.site_name) }
            p.lead { (config.site_description) }
            div.getting-started {
                h2 { "Getting Started" }
                ol {
                    li { "Add a " code { "README.md" } " or " code { "index.md" } " to " code { (config.docs_dir.display()) } " for a custom home page." }
                    li { "Organize documents in folders; each folder becomes a navigation section." }
                    li { "Run " code { "doc-builder build" } " again to regenerate the site." }
                }
            }
            @if !pages.is_empty() {
                div.page-list {
                    h2 { "Available Pages" }
                    ul {
                        @for page in pages {
                            li { a href={ (prefix) (page.url_path) } { (page.title) } }
                        }
                    }
                }
            }
            p.version-info { "Generated by doc-builder v" (TOOL_VERSION) }
        }
    };
    document(
        Shell {
            url_path: HOME_PAGE,
            title: config.site_name.clone(),
            description: config.site_description.clone(),
            seo: None,
            navigation,
            breadcrumbs: Vec::new(),
            actions: None,
            content,
        },
        ctx,
    )
}

/// Documents modified in the last `days_back` days, newest first.
pub fn changelog_page(
    entries: &[PageLink],
    days_back: u32,
    navigation: &str,
    ctx: &RenderContext,
) -> Markup {
    let config = ctx.config;
    let prefix = ctx.mode.root_prefix(0);
    let content = html! {
        h1 { "Changelog" }
        p.changelog-intro { "Documents updated in the last " (days_back) " days." }
        @if entries.is_empty() {
            p.changelog-empty { "No documents were updated in this period." }
        } @else {
            ul.changelog-list {
                @for entry in entries {
                    li.changelog-entry {
                        a href={ (prefix) (entry.url_path) } { (entry.title) }
                        @if let Some(modified) = entry.modified {
                            " "
                            time.changelog-date datetime=(modified.to_rfc3339()) {
                                (modified.format("%Y-%m-%d"))
                            }
                        }
                    }
                }
            }
        }
    };
    document(
        Shell {
            url_path: CHANGELOG_PAGE,
            title: format!("Changelog - {}", config.site_name),
            description: format!("Recent changes to {}", config.site_name),
            seo: None,
            navigation,
            breadcrumbs: vec![
                Breadcrumb {
                    name: config.site_name.clone(),
                    path: Some(String::new()),
                },
                Breadcrumb {
                    name: "Changelog".to_string(),
                    path: Some(CHANGELOG_PAGE.to_string()),
                },
            ],
            actions: None,
            content,
        },
        ctx,
    )
}

pub fn not_found_page(navigation: &str, ctx: &RenderContext) -> Markup {
    let config = ctx.config;
    let prefix = ctx.mode.root_prefix(0);
    let content = html! {
        div.not-found {
            h1 { "Page Not Found" }
            p { "The page you are looking for does not exist or has been moved." }
            a.back-home href={ (prefix) (HOME_PAGE) } {
                i.ph.ph-house {} " Back to home"
            }
        }
    };
    document(
        Shell {
            url_path: NOT_FOUND_PAGE,
            title: format!("Page Not Found - {}", config.site_name),
            description: config.site_description.clone(),
            seo: None,
            navigation,
            breadcrumbs: Vec::new(),
            actions: None,
            content,
        },
        ctx,
    )
}
