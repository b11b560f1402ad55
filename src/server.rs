//! Development server.
//!
//! Builds once, serves the output directory over HTTP, and rebuilds the
//! whole site when a markdown file or attachment under the docs directory
//! changes. Rebuilds run serially on a blocking thread; requests only read
//! what is already on disk.
//!
//! ## Request mapping
//!
//! | Request | File |
//! |---------|------|
//! | `/` | `index.html` |
//! | `/guides/` | `guides/index.html` |
//! | `/guides/setup` | `guides/setup.html` |
//! | `/css/notion-style.css` | as is |
//! | anything with `..` | 403 |
//! | missing | `404.html` with status 404 |

use crate::config::Config;
use crate::generate::{self, GenerateError};
use crate::render::NOT_FOUND_PAGE;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Quiet period that coalesces editor save bursts into one rebuild.
const DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
    #[error(transparent)]
    Build(#[from] GenerateError),
}

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    /// Open the site in the default browser once listening.
    pub open: bool,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            open: true,
        }
    }
}

/// Build, watch, and serve until Ctrl-C.
pub async fn serve(config: Config, options: ServeOptions) -> Result<(), ServeError> {
    let config = Arc::new(config);
    let report = {
        let config = Arc::clone(&config);
        tokio::task::spawn_blocking(move || generate::build(&config))
            .await
            .map_err(std::io::Error::other)??
    };
    info!(pages = report.main.pages.len(), "initial build complete");

    let (tx, rx) = mpsc::channel::<()>(16);
    let attachment_types = config.attachment_types.clone();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res
            && is_rebuild_trigger(&event, &attachment_types)
        {
            // A full channel already has a rebuild queued.
            let _ = tx.try_send(());
        }
    })?;
    watcher.watch(&config.docs_dir, RecursiveMode::Recursive)?;
    info!(docs = %config.docs_dir.display(), "watching for changes");
    tokio::spawn(rebuild_loop(Arc::clone(&config), rx));

    let app = Router::new()
        .fallback(serve_file)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(config.output_dir.clone()));

    let listener = tokio::net::TcpListener::bind((options.host.as_str(), options.port)).await?;
    let url = format!("http://{}:{}", options.host, listener.local_addr()?.port());
    info!(%url, "serving");
    println!("Serving {} at {url}", config.output_dir.display());
    if options.open {
        open_browser(&url);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    drop(watcher);
    Ok(())
}

async fn rebuild_loop(config: Arc<Config>, mut rx: mpsc::Receiver<()>) {
    while rx.recv().await.is_some() {
        tokio::time::sleep(DEBOUNCE).await;
        while rx.try_recv().is_ok() {}

        let config = Arc::clone(&config);
        match tokio::task::spawn_blocking(move || generate::build(&config)).await {
            Ok(Ok(report)) => info!(pages = report.main.pages.len(), "rebuilt site"),
            Ok(Err(err)) => error!(%err, "rebuild failed"),
            Err(err) => error!(%err, "rebuild task failed"),
        }
    }
}

/// True for create/modify/remove events touching markdown or an attachment type.
fn is_rebuild_trigger(event: &Event, attachment_types: &[String]) -> bool {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }
    event.paths.iter().any(|path| {
        path.extension().is_some_and(|ext| {
            let ext = ext.to_string_lossy();
            ext.eq_ignore_ascii_case("md")
                || attachment_types
                    .iter()
                    .any(|t| t.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        })
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn open_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg(url).spawn();
    #[cfg(target_os = "windows")]
    let result = Command::new("cmd").args(["/C", "start", "", url]).spawn();
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let result = Command::new("xdg-open").arg(url).spawn();

    if let Err(err) = result {
        warn!(%err, "could not open a browser; visit {url}");
    }
}

// =============================================================================
// Request handling
// =============================================================================

async fn serve_file(State(root): State<Arc<PathBuf>>, req: Request<Body>) -> Response {
    let Some(path) = resolve_request_path(&root, req.uri().path()) else {
        debug!(path = req.uri().path(), "rejected path");
        return StatusCode::FORBIDDEN.into_response();
    };

    if let Ok(content) = tokio::fs::read(&path).await {
        return file_response(StatusCode::OK, mime_for(&path), content);
    }
    match tokio::fs::read(root.join(NOT_FOUND_PAGE)).await {
        Ok(content) => file_response(StatusCode::NOT_FOUND, mime_for(Path::new(NOT_FOUND_PAGE)), content),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn file_response(status: StatusCode, mime: &'static str, content: Vec<u8>) -> Response {
    (status, [(header::CONTENT_TYPE, mime)], Body::from(content)).into_response()
}

/// Map a request path onto a file under `root`, or `None` when it tries to
/// leave the root.
pub fn resolve_request_path(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(uri_path).decode_utf8_lossy();
    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') || s.contains(':') => return None,
            s => segments.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(&segments);
    if segments.is_empty() || decoded.ends_with('/') {
        return Some(path.join("index.html"));
    }
    if path.extension().is_none() {
        if path.is_dir() {
            return Some(path.join("index.html"));
        }
        path.set_extension("html");
    }
    Some(path)
}

/// Content type by file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn root_maps_to_index() {
        let root = Path::new("/site");
        assert_eq!(resolve_request_path(root, "/"), Some(PathBuf::from("/site/index.html")));
        assert_eq!(resolve_request_path(root, ""), Some(PathBuf::from("/site/index.html")));
    }

    #[test]
    fn trailing_slash_maps_to_folder_index() {
        let root = Path::new("/site");
        assert_eq!(
            resolve_request_path(root, "/guides/"),
            Some(PathBuf::from("/site/guides/index.html"))
        );
    }

    #[test]
    fn extensionless_paths_get_html() {
        let root = Path::new("/site");
        assert_eq!(
            resolve_request_path(root, "/guides/setup"),
            Some(PathBuf::from("/site/guides/setup.html"))
        );
        assert_eq!(
            resolve_request_path(root, "/css/notion-style.css"),
            Some(PathBuf::from("/site/css/notion-style.css"))
        );
    }

    #[test]
    fn existing_directory_without_slash_gets_index() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("guides")).unwrap();
        assert_eq!(
            resolve_request_path(tmp.path(), "/guides"),
            Some(tmp.path().join("guides/index.html"))
        );
    }

    #[test]
    fn encoded_segments_decoded() {
        let root = Path::new("/site");
        assert_eq!(
            resolve_request_path(root, "/my%20notes/d%C3%ADa%201.html"),
            Some(PathBuf::from("/site/my notes/día 1.html"))
        );
    }

    #[test]
    fn traversal_rejected() {
        let root = Path::new("/site");
        assert_eq!(resolve_request_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_request_path(root, "/guides/%2e%2e/%2e%2e/secret"), None);
        assert_eq!(resolve_request_path(root, "/a\\..\\b"), None);
    }

    #[test]
    fn mime_types_by_extension() {
        assert_eq!(mime_for(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(mime_for(Path::new("a.CSS")), "text/css; charset=utf-8");
        assert_eq!(mime_for(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(mime_for(Path::new("a.unknown")), "application/octet-stream");
    }

    #[test]
    fn rebuild_triggers() {
        let types = vec![".pdf".to_string()];
        let md = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("docs/a.md"));
        let pdf = Event::new(EventKind::Create(CreateKind::File)).add_path(PathBuf::from("docs/b.PDF"));
        let swap = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("docs/.a.md.swp"));
        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(PathBuf::from("docs/a.md"));
        assert!(is_rebuild_trigger(&md, &types));
        assert!(is_rebuild_trigger(&pdf, &types));
        assert!(!is_rebuild_trigger(&swap, &types));
        assert!(!is_rebuild_trigger(&access, &types));
    }
}
