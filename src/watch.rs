// ABOUTME: Serve mode for the big-deck application
// ABOUTME: Serves the generated deck over HTTP and regenerates it when the markdown changes

use log::{debug, error, info};
use parking_lot::RwLock;
use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use tiny_http::{Header, Request, Response, Server, StatusCode};
use url::Url;

use crate::errors::{DeckError, Result};
use crate::html::{self, GeneratorOptions};
use crate::images::{self, PROXY_PATH};
use crate::resources;
use crate::utils;

/// Path that reports the current publication counter.
pub const VERSION_PATH: &str = "/_version";

/// Number of threads answering HTTP requests.
const WORKER_THREADS: usize = 4;

/// Reloads the page once the served deck has been regenerated.
pub const LIVE_RELOAD_SCRIPT: &str = r#"<script>
(function () {
  var seen = null;
  setInterval(function () {
    fetch("/_version", { cache: "no-store" })
      .then(function (response) { return response.text(); })
      .then(function (version) {
        if (seen === null) {
          seen = version;
        } else if (version !== seen) {
          window.location.reload();
        }
      })
      .catch(function () {});
  }, 1000);
})();
</script>"#;

/// Configuration for serve mode
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Path to the markdown file to serve
    pub markdown_path: PathBuf,

    /// Port for the local web server
    pub port: u16,

    /// Whether to regenerate when the markdown file changes
    pub watch: bool,

    /// How often the markdown file's modification time is checked
    pub poll_interval: Duration,

    /// Options used for every regeneration
    pub generator: GeneratorOptions,
}

/// Latest published state of the deck.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub html: String,
    /// Message of the last failed regeneration, cleared by the next success
    pub error: Option<String>,
    pub version: u64,
}

/// Shared slot holding the served document.
///
/// Request handlers read concurrently; a regeneration replaces the whole
/// snapshot under the write lock so readers never see half an update.
#[derive(Debug, Default)]
pub struct DeckSlot {
    inner: RwLock<Snapshot>,
}

impl DeckSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a freshly generated document.
    pub fn publish(&self, html: String) {
        let mut snapshot = self.inner.write();
        snapshot.html = html;
        snapshot.error = None;
        snapshot.version += 1;
    }

    /// Record a failed regeneration. The previous document is kept.
    pub fn publish_error(&self, message: String) {
        self.inner.write().error = Some(message);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().clone()
    }

    pub fn version(&self) -> u64 {
        self.inner.read().version
    }
}

/// Detects changes to a file by polling its modification time.
#[derive(Debug)]
pub struct FileWatcher {
    path: PathBuf,
    last_modified: SystemTime,
}

impl FileWatcher {
    pub fn new(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            last_modified: modified_time(path)?,
        })
    }

    /// Check the file once. Returns true when it is newer than last seen.
    pub fn poll(&mut self) -> Result<bool> {
        let modified = modified_time(&self.path)?;
        if modified > self.last_modified {
            self.last_modified = modified;
            return Ok(true);
        }
        Ok(false)
    }
}

fn modified_time(path: &Path) -> Result<SystemTime> {
    let metadata = fs::metadata(path).map_err(DeckError::FileReadError)?;
    metadata.modified().map_err(DeckError::FileReadError)
}

/// Regenerate the deck and publish the result
pub fn regenerate(config: &ServeConfig, slot: &DeckSlot) -> Result<()> {
    info!("Regenerating presentation...");

    match html::generate_html(&config.markdown_path, &config.generator) {
        Ok(html) => {
            slot.publish(html);
            Ok(())
        }
        Err(e) => {
            slot.publish_error(e.to_string());
            Err(e)
        }
    }
}

/// Serve a markdown file as a live presentation until the process is stopped
pub fn serve_markdown(mut config: ServeConfig) -> Result<()> {
    utils::validate_file_exists(&config.markdown_path)?;

    let static_root = utils::get_absolute_path(utils::parent_dir(&config.markdown_path))?;

    if config.watch {
        config.generator.auto_reload_script = Some(LIVE_RELOAD_SCRIPT.to_string());
    }

    // Initial generation
    let slot = Arc::new(DeckSlot::new());
    regenerate(&config, &slot)?;

    info!("Serving presentation from {:?}", config.markdown_path);
    info!("Serving static files from {:?}", static_root);

    let config = Arc::new(config);
    if config.watch {
        let watcher = FileWatcher::new(&config.markdown_path)?;
        spawn_watcher(Arc::clone(&config), Arc::clone(&slot), watcher);
        info!("Watching {:?} for changes...", config.markdown_path);
    }

    let server = Server::http(format!("0.0.0.0:{}", config.port))
        .map_err(|e| DeckError::ServeError(format!("Failed to start HTTP server: {}", e)))?;
    let server = Arc::new(server);

    info!("Server listening on http://localhost:{}", config.port);
    eprintln!(
        "Server listening on http://localhost:{} (Press Ctrl+C to stop)",
        config.port
    );

    let workers: Vec<_> = (0..WORKER_THREADS)
        .map(|_| {
            let server = Arc::clone(&server);
            let slot = Arc::clone(&slot);
            let root = static_root.clone();
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    handle_request(request, &slot, &root);
                }
            })
        })
        .collect();

    for worker in workers {
        if worker.join().is_err() {
            error!("HTTP worker thread panicked");
        }
    }

    Ok(())
}

fn spawn_watcher(config: Arc<ServeConfig>, slot: Arc<DeckSlot>, mut watcher: FileWatcher) {
    thread::spawn(move || loop {
        thread::sleep(config.poll_interval);

        match watcher.poll() {
            Ok(true) => {
                info!("File changed, regenerating...");
                match regenerate(&config, &slot) {
                    Ok(()) => info!("Presentation regenerated successfully"),
                    Err(e) => error!("Error regenerating: {}", e),
                }
            }
            Ok(false) => {}
            Err(e) => error!("Error checking file: {}", e),
        }
    });
}

/// A response before it is handed to the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    fn text(status: u16, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::new(status, "text/plain; charset=utf-8", message)
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        for (name, value) in &self.headers {
            match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => error!("Dropping invalid header {}: {}", name, value),
            }
        }
        response
    }
}

fn handle_request(request: Request, slot: &DeckSlot, static_root: &Path) {
    debug!("{} {}", request.method(), request.url());

    let reply = route(request.url(), slot, static_root);
    if let Err(e) = request.respond(reply.into_response()) {
        error!("Failed to send response: {}", e);
    }
}

/// Answer a request for `url` (path plus optional query).
pub fn route(url: &str, slot: &DeckSlot, static_root: &Path) -> Reply {
    let url = match Url::parse("http://localhost").and_then(|base| base.join(url)) {
        Ok(url) => url,
        Err(_) => return Reply::text(400, "Bad request"),
    };

    match url.path() {
        "/" => serve_deck(slot),
        VERSION_PATH => Reply::text(200, slot.version().to_string())
            .with_header("Cache-Control", "no-store"),
        path if path.starts_with(PROXY_PATH) => serve_proxy(&url),
        _ => serve_static(&url, static_root),
    }
}

fn serve_deck(slot: &DeckSlot) -> Reply {
    let snapshot = slot.snapshot();
    match snapshot.error {
        Some(message) => Reply::text(500, format!("Error generating presentation: {}", message)),
        None => Reply::new(200, "text/html; charset=utf-8", snapshot.html),
    }
}

fn serve_proxy(url: &Url) -> Reply {
    let target = match url.query_pairs().find(|(key, _)| key == "url") {
        Some((_, value)) if !value.is_empty() => value.into_owned(),
        _ => return Reply::text(400, "Missing url parameter"),
    };

    match Url::parse(&target) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
        _ => return Reply::text(400, "Invalid URL"),
    }

    let remote = match resources::fetch_remote(&target) {
        Ok(remote) => remote,
        Err(e) => {
            error!("Failed to fetch image {}: {}", target, e);
            return Reply::text(502, "Failed to fetch image");
        }
    };

    if remote.status != 200 {
        return Reply::text(
            remote.status,
            format!("Remote server returned {}", remote.status),
        );
    }

    let content_type = remote
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Reply::new(200, &content_type, remote.bytes)
        .with_header("Cache-Control", "public, max-age=31536000")
        .with_header("Access-Control-Allow-Origin", "*")
}

fn serve_static(url: &Url, static_root: &Path) -> Reply {
    let file_path = match resolve_static_path(url, static_root) {
        Some(path) => path,
        None => return Reply::text(404, "404 Not Found"),
    };

    debug!("Request for {:?} -> {:?}", url.path(), file_path);

    if !file_path.is_file() {
        return Reply::text(404, "404 Not Found");
    }

    match fs::read(&file_path) {
        Ok(content) => Reply::new(200, static_content_type(&file_path), content),
        Err(e) => {
            error!("Failed to read file {:?}: {}", file_path, e);
            Reply::text(500, format!("Failed to read file: {}", e))
        }
    }
}

/// Map a request path onto a file below the static root.
///
/// Percent escapes are decoded; anything resolving outside the root is refused.
/// `static_root` must be canonical.
fn resolve_static_path(url: &Url, static_root: &Path) -> Option<PathBuf> {
    let root_url = Url::from_directory_path(static_root).ok()?;
    let relative = url.path().trim_start_matches('/');
    let path = root_url.join(relative).ok()?.to_file_path().ok()?;

    // Decoding can turn `..%2F` into a parent component the URL join never saw
    let inside = path.strip_prefix(static_root).ok()?;
    if !inside
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return None;
    }

    let canonical = fs::canonicalize(&path).ok()?;
    canonical.starts_with(static_root).then_some(canonical)
}

fn static_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "md" | "txt" => "text/plain; charset=utf-8",
        _ => images::detect_content_type(path),
    }
}
