// ABOUTME: Resource handling for the big-deck application
// ABOUTME: Handles extra local and remote stylesheets/scripts and remote image fetches

use crate::errors::{DeckError, Result};
use log::info;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::fs;
use std::path::Path;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// What kind of tag a resource becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Css,
    Js,
}

/// Represents a resource file that can be either local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ResourceFile {
    /// Create a new ResourceFile from a path string.
    /// The path can be either a local file path or a URL.
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// Get the content of the resource file.
    /// If the file is remote, it will be fetched from the URL.
    /// If the file is local, it will be read from the filesystem.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content()
        } else {
            self.read_local_content()
        }
    }

    /// Fetch content from a remote URL with retry capability
    fn fetch_remote_content(&self) -> Result<String> {
        info!("Fetching remote resource: {}", self.path);

        let client = http_client()?;

        // Try up to 3 times with increasing backoff
        let mut retry_delay = 1000; // Start with 1 second
        let mut last_error = None;

        for attempt in 1..=3 {
            match client.get(&self.path).send() {
                Ok(response) => {
                    if response.status().is_success() {
                        return response.text().map_err(DeckError::FetchError);
                    }
                    let status = response.status();
                    last_error = Some(DeckError::ValidationError(format!("HTTP error: {}", status)));
                }
                Err(e) => {
                    last_error = Some(DeckError::FetchError(e));
                }
            }

            if attempt < 3 {
                info!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2; // Exponential backoff
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::ValidationError("Unknown error fetching resource".to_string())
        }))
    }

    /// Read content from a local file
    fn read_local_content(&self) -> Result<String> {
        info!("Reading local resource: {}", self.path);
        if !Path::new(&self.path).exists() {
            return Err(DeckError::PathNotFoundError(
                Path::new(&self.path).to_path_buf(),
            ));
        }

        fs::read_to_string(&self.path).map_err(DeckError::FileReadError)
    }

    /// Generate the HTML tag for the resource, either embedding or linking the content.
    /// Remote resources are always linked.
    pub fn tag(&self, kind: ResourceKind, embed: bool) -> Result<String> {
        if self.is_remote || !embed {
            Ok(match kind {
                ResourceKind::Css => format!(r#"<link rel="stylesheet" href="{}">"#, self.path),
                ResourceKind::Js => format!(r#"<script src="{}"></script>"#, self.path),
            })
        } else {
            let content = self.content()?;
            Ok(match kind {
                ResourceKind::Css => format!("<style>{}</style>", content),
                ResourceKind::Js => format!("<script>{}</script>", content),
            })
        }
    }
}

/// A remote resource relayed by the image proxy.
#[derive(Debug, Clone)]
pub struct RemoteBody {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fetch a remote URL once, keeping its status and content type.
pub fn fetch_remote(url: &str) -> Result<RemoteBody> {
    info!("Proxying remote resource: {}", url);

    let response = http_client()?.get(url).send()?;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes()?.to_vec();

    Ok(RemoteBody {
        status,
        content_type,
        bytes,
    })
}

fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(DeckError::FetchError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_remote_resources_are_linked() {
        let css = ResourceFile::new("https://example.com/style.css");
        assert!(css.is_remote);
        assert_eq!(
            css.tag(ResourceKind::Css, true).unwrap(),
            r#"<link rel="stylesheet" href="https://example.com/style.css">"#
        );

        let js = ResourceFile::new("http://example.com/script.js");
        assert_eq!(
            js.tag(ResourceKind::Js, true).unwrap(),
            r#"<script src="http://example.com/script.js"></script>"#
        );
    }

    #[test]
    fn test_local_resource_embedded() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"h1 { color: red; }")
            .expect("Failed to write to temp file");

        let resource = ResourceFile::new(file.path().to_str().unwrap());
        assert!(!resource.is_remote);
        assert_eq!(
            resource.tag(ResourceKind::Css, true).unwrap(),
            "<style>h1 { color: red; }</style>"
        );
    }

    #[test]
    fn test_local_resource_linked() {
        let resource = ResourceFile::new("theme/extra.css");
        assert_eq!(
            resource.tag(ResourceKind::Css, false).unwrap(),
            r#"<link rel="stylesheet" href="theme/extra.css">"#
        );
    }

    #[test]
    fn test_missing_local_resource() {
        let resource = ResourceFile::new("/no/such/file.css");
        assert!(matches!(
            resource.tag(ResourceKind::Css, true),
            Err(DeckError::PathNotFoundError(_))
        ));
    }
}
