//! Aurora accessibility checklist retrieval
//!
//! The checklist page is fetched live, reduced to plain text and cached.
//! When the page cannot be fetched the last cached copy is served.

use crate::cache::PackageCache;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ChecklistError {
    #[error("Could not fetch Aurora checklist and no cached version available: {reason}")]
    Unavailable { reason: String },
}

pub struct ChecklistFetcher {
    http_client: Client,
    url: String,
    cache: PackageCache,
}

impl ChecklistFetcher {
    pub fn new(url: impl Into<String>, cache: PackageCache) -> Result<Self, ChecklistError> {
        let http_client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| ChecklistError::Unavailable {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            url: url.into(),
            cache,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Live checklist text, falling back to the cached copy.
    pub async fn fetch(&self) -> Result<String, ChecklistError> {
        let reason = match self.fetch_live().await {
            Ok(text) => {
                if let Err(e) = self.cache.write_checklist(&text) {
                    warn!("Failed to cache checklist: {}", e);
                }
                return Ok(text);
            }
            Err(reason) => reason,
        };

        warn!("Failed to fetch Aurora checklist: {}", reason);

        match self.cache.read_checklist() {
            Ok(text) => {
                info!("Using cached Aurora checklist");
                Ok(text)
            }
            Err(e) => {
                debug!("No cached checklist: {}", e);
                Err(ChecklistError::Unavailable { reason })
            }
        }
    }

    async fn fetch_live(&self) -> Result<String, String> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        let html = response
            .text()
            .await
            .map_err(|e| format!("Failed to read body: {}", e))?;

        checklist_document(&html, &self.url).ok_or_else(|| "Page contained no text".to_string())
    }
}

/// Header plus page text, or `None` when the page has no visible text.
pub fn checklist_document(html: &str, source_url: &str) -> Option<String> {
    let body = html_to_text(html);
    if body.is_empty() {
        return None;
    }
    Some(format!(
        "# Appian A11y Checklist (Aurora Design System)\n\
         # Source: {}\n\
         # This is the authoritative checklist maintained by the Appian Accessibility team.\n\n{}",
        source_url, body
    ))
}

/// Reduces an HTML page to its text, one non-empty line per block.
pub fn html_to_text(html: &str) -> String {
    let patterns = patterns();

    let text = patterns.script.replace_all(html, "");
    let text = patterns.style.replace_all(&text, "");
    let text = patterns.line_break.replace_all(&text, "\n");
    let text = patterns.block_end.replace_all(&text, "\n");
    let text = patterns.tag.replace_all(&text, " ");
    let text = decode_entities(&text);

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

struct Patterns {
    script: Regex,
    style: Regex,
    line_break: Regex,
    block_end: Regex,
    tag: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        script: Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid script pattern"),
        style: Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid style pattern"),
        line_break: Regex::new(r"(?i)<br\s*/?>").expect("valid line break pattern"),
        block_end: Regex::new(r"(?i)</(div|p|li|tr|h[1-6])>").expect("valid block pattern"),
        tag: Regex::new(r"<[^>]+>").expect("valid tag pattern"),
    })
}
