//! Active-page context acquisition.
//!
//! Mirrors the side panel's behavior: browser-internal pages are refused up
//! front with a distinct marker, and extraction failures degrade to an empty
//! context so page-less chat keeps working.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use shared::page::{ActiveDocument, DocumentInfo};
use std::time::Duration;

/// Schemes belonging to the browser itself; extraction is never attempted.
const RESTRICTED_SCHEMES: &[&str] = &["chrome://", "edge://"];

/// Page text is capped so the single-turn prompt stays bounded.
const MAX_CONTEXT_BYTES: usize = 16 * 1024;

/// Host-side query for the active document of the focused window.
#[async_trait]
pub trait DocumentQuery: Send + Sync {
    /// The active document, or None when the host has nothing to report.
    async fn active_document(&self) -> Option<DocumentInfo>;
}

/// Outcome of a context load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStatus {
    /// Page text extracted.
    Loaded,
    /// Browser-internal page; extraction refused. Surfaced as a notice,
    /// not an error.
    Restricted,
    /// Extraction failed or produced nothing. Silent.
    Empty,
}

/// Document snapshot plus whatever text could be pulled from it.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub document: Option<ActiveDocument>,
    pub text: String,
    pub status: ContextStatus,
}

/// Fetches the active page and converts it to prompt-ready text.
/// Re-invocable on demand (explicit reload).
pub struct PageContextProvider {
    http: Client,
}

impl PageContextProvider {
    pub fn new() -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0 (compatible; PageChat/0.1)")
            .build()?;
        Ok(Self { http })
    }

    /// Query the active document and pull its text.
    pub async fn load(&self, query: &dyn DocumentQuery) -> PageSnapshot {
        let Some(info) = query.active_document().await else {
            return PageSnapshot {
                document: None,
                text: String::new(),
                status: ContextStatus::Empty,
            };
        };

        if is_restricted_scheme(&info.url) {
            return PageSnapshot {
                document: Some(ActiveDocument::from(&info)),
                text: String::new(),
                status: ContextStatus::Restricted,
            };
        }

        let (text, title) = match self.fetch_page(&info.url).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::debug!(url = %info.url, error = %e, "page extraction failed");
                (String::new(), None)
            }
        };

        let mut document = ActiveDocument::from(&info);
        if document.title.is_empty() {
            if let Some(title) = title {
                document.title = title;
            }
        }

        let status = if text.is_empty() {
            ContextStatus::Empty
        } else {
            ContextStatus::Loaded
        };
        PageSnapshot {
            document: Some(document),
            text,
            status,
        }
    }

    async fn fetch_page(&self, url: &str) -> anyhow::Result<(String, Option<String>)> {
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("HTTP error: {}", resp.status());
        }
        let html = resp.text().await?;
        let title = extract_title(&html);
        let text = extract_text(&html);
        Ok((text, title))
    }
}

/// Whether the URL points at a browser-internal page.
pub fn is_restricted_scheme(url: &str) -> bool {
    RESTRICTED_SCHEMES.iter().any(|s| url.starts_with(s))
}

/// Convert page HTML to plain text, capped to the context size limit.
fn extract_text(html: &str) -> String {
    let text = html2text::from_read(html.as_bytes(), 120);
    truncate_on_char_boundary(text.trim().to_string(), MAX_CONTEXT_BYTES)
}

fn truncate_on_char_boundary(mut s: String, max: usize) -> String {
    if s.len() <= max {
        return s;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
    s
}

/// Extract <title> from HTML.
fn extract_title(html: &str) -> Option<String> {
    let re = Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").ok()?;
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
}

/// Simple HTML entity decoding for title text.
fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}
