// ABOUTME: Image handling for generated slide HTML
// ABOUTME: Inlines local images as data URIs and routes remote images through the proxy

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use url::Url;

/// Path of the serve-mode image proxy.
pub const PROXY_PATH: &str = "/_proxy/";

static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(<img\b[^>]*?\ssrc=")([^"]+)(")"#).expect("valid img regex"));

/// Replace local image sources with base64 data URIs.
///
/// Sources are resolved against `base_dir`, which must be absolute. Remote
/// URLs, existing data URIs and unreadable files are left alone.
pub fn inline_local_images(html: &str, base_dir: &Path) -> String {
    let base_url = match Url::from_directory_path(base_dir) {
        Ok(url) => url,
        Err(()) => {
            warn!("Cannot inline images relative to {:?}", base_dir);
            return html.to_string();
        }
    };

    IMG_SRC
        .replace_all(html, |caps: &Captures| {
            let src = &caps[2];
            match to_data_uri(&base_url, src) {
                Some(data_uri) => format!("{}{}{}", &caps[1], data_uri, &caps[3]),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn to_data_uri(base_url: &Url, src: &str) -> Option<String> {
    if is_remote(src) || src.starts_with("data:") {
        return None;
    }

    // Absolute sources are still looked up below the base directory
    let src = unescape_attr(src);
    let path = base_url
        .join(src.trim_start_matches('/'))
        .ok()?
        .to_file_path()
        .ok()?;
    match fs::read(&path) {
        Ok(data) => {
            debug!("Inlining image {:?}", path);
            Some(format!(
                "data:{};base64,{}",
                detect_content_type(&path),
                STANDARD.encode(data)
            ))
        }
        Err(e) => {
            debug!("Leaving image {:?} as a link: {}", path, e);
            None
        }
    }
}

/// Point remote image sources at the local proxy.
pub fn proxy_remote_images(html: &str) -> String {
    IMG_SRC
        .replace_all(html, |caps: &Captures| {
            let src = unescape_attr(&caps[2]);
            if !is_remote(&src) {
                return caps[0].to_string();
            }
            let encoded: String = url::form_urlencoded::byte_serialize(src.as_bytes()).collect();
            format!("{}{}?url={}{}", &caps[1], PROXY_PATH, encoded, &caps[3])
        })
        .into_owned()
}

/// MIME type from a file extension.
pub fn detect_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

fn unescape_attr(value: &str) -> String {
    value.replace("&amp;", "&")
}
