// ABOUTME: Page-source side of the comparison: build-dir walking, URL mapping, live fetch.
// ABOUTME: Decodes response bodies charset-aware and treats 404s as absent pages.

//! Page discovery and retrieval.
//!
//! The build directory defines the page set: every `.html`/`.htm` file under
//! it, identified by its forward-slash relative path. The live side is
//! fetched over HTTP with the directory-index convention (`a/b/index.html`
//! maps to `<base>/a/b/`). A page the live site answers with 404 or another
//! non-2xx status is absent, not an error; transport failures are errors.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

/// Collect page identifiers (forward-slash relative paths of `.html`/`.htm`
/// files) under the build directory, sorted for deterministic output.
pub fn collect(build_dir: &Path) -> Result<Vec<String>> {
    let mut pages = Vec::new();
    walk(build_dir, build_dir, &mut pages)?;
    pages.sort();
    Ok(pages)
}

fn walk(root: &Path, dir: &Path, pages: &mut Vec<String>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {:?}", dir))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("reading directory {:?}", dir))?;
        let path = entry.path();
        if path.is_dir() {
            walk(root, &path, pages)?;
        } else if is_html(&path) {
            let rel = path
                .strip_prefix(root)
                .expect("walked path is under the walk root");
            pages.push(identifier(rel));
        }
    }
    Ok(())
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

/// Relative path with forward slashes regardless of platform.
fn identifier(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Map a page identifier to its live URL.
///
/// `index.html` files map to their directory URL with a trailing slash;
/// everything else maps to `<base>/<identifier>`.
pub fn page_url(base: &Url, identifier: &str) -> Result<Url> {
    // A base without a trailing slash would drop its last path segment on
    // join, so normalize first.
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    let rel = if identifier == "index.html" {
        String::new()
    } else if let Some(dir) = identifier.strip_suffix("/index.html") {
        format!("{}/", dir)
    } else {
        identifier.to_string()
    };
    base.join(&rel)
        .with_context(|| format!("mapping page {:?} to a URL", identifier))
}

/// Blocking HTTP fetcher for live pages.
pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch one page. Returns `None` when the live side has no such page
    /// (404 or any other non-2xx status); transport errors propagate.
    pub fn fetch(&self, url: &Url) -> Result<Option<String>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("fetching {}", url))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} answered {}; treating page as absent", url, status);
            return Ok(None);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .with_context(|| format!("reading body of {}", url))?;
        Ok(Some(decode_body(&body, content_type.as_deref())))
    }
}

/// Decode a response body using the content-type charset when present,
/// otherwise by detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from a Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_finds_nested_html() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("blog/post")).unwrap();
        fs::write(dir.path().join("index.html"), "<p>a</p>").unwrap();
        fs::write(dir.path().join("blog/post/index.html"), "<p>b</p>").unwrap();
        fs::write(dir.path().join("about.htm"), "<p>c</p>").unwrap();
        fs::write(dir.path().join("style.css"), "body {}").unwrap();

        let pages = collect(dir.path()).unwrap();
        assert_eq!(
            pages,
            vec![
                "about.htm".to_string(),
                "blog/post/index.html".to_string(),
                "index.html".to_string(),
            ]
        );
    }

    #[test]
    fn test_index_maps_to_directory_url() {
        let base = Url::parse("https://example.com/site").unwrap();
        assert_eq!(
            page_url(&base, "index.html").unwrap().as_str(),
            "https://example.com/site/"
        );
        assert_eq!(
            page_url(&base, "a/b/index.html").unwrap().as_str(),
            "https://example.com/site/a/b/"
        );
    }

    #[test]
    fn test_plain_page_maps_to_file_url() {
        let base = Url::parse("https://example.com/").unwrap();
        assert_eq!(
            page_url(&base, "about.html").unwrap().as_str(),
            "https://example.com/about.html"
        );
    }

    #[test]
    fn test_decode_body_honors_content_type_charset() {
        // "café" in ISO-8859-1.
        let bytes = b"caf\xe9";
        let decoded = decode_body(bytes, Some("text/html; charset=iso-8859-1"));
        assert_eq!(decoded, "café");
    }

    #[test]
    fn test_decode_body_detects_without_charset() {
        let decoded = decode_body("résumé".as_bytes(), None);
        assert_eq!(decoded, "résumé");
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=UTF-8").as_deref(),
            Some("utf-8")
        );
        assert_eq!(
            extract_charset("text/html; charset=\"utf-8\"").as_deref(),
            Some("utf-8")
        );
        assert_eq!(extract_charset("text/html"), None);
    }
}
