/// Data structures for Tab Yard
use serde::{Deserialize, Serialize};
use url::Url;

/// Title stored for links that arrive without one
pub const UNTITLED: &str = "(untitled)";

/// Where a link entered the pool
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Imported,
    Captured,
}

/// A saved link in the pool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkEntry {
    pub title: String,
    pub url: String,
    /// Milliseconds since the epoch, as returned by `Date.now()`
    pub saved: f64,
    pub source: Source,
}

impl LinkEntry {
    pub fn new(title: String, url: String, saved: f64, source: Source) -> LinkEntry {
        let title = if title.is_empty() { UNTITLED.to_string() } else { title };
        LinkEntry {
            title,
            url,
            saved,
            source,
        }
    }

    /// Host (with port, if any) shown under the card title
    pub fn host(&self) -> String {
        Url::parse(&self.url)
            .ok()
            .and_then(|url| {
                let host = url.host_str()?.to_string();
                Some(match url.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host,
                })
            })
            .unwrap_or_default()
    }

    /// Conventional favicon location for the entry's origin
    pub fn favicon_url(&self) -> Option<String> {
        let url = Url::parse(&self.url).ok()?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return None;
        }
        Some(format!("{}/favicon.ico", origin.ascii_serialization()))
    }
}

/// A link found by the extractor or read from a tab, not yet in the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub url: String,
    pub title: String,
}

impl LinkCandidate {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> LinkCandidate {
        LinkCandidate {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Cumulative totals of links added per source
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Counters {
    pub imported: u64,
    pub captured: u64,
}

impl Counters {
    pub fn get(&self, kind: Source) -> u64 {
        match kind {
            Source::Imported => self.imported,
            Source::Captured => self.captured,
        }
    }

    pub fn add(&mut self, kind: Source, by: u64) {
        let slot = match kind {
            Source::Imported => &mut self.imported,
            Source::Captured => &mut self.captured,
        };
        *slot = slot.saturating_add(by);
    }
}

/// Information about a browser tab, as reported by `chrome.tabs.query`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl TabInfo {
    pub fn new(url: &str, title: &str) -> TabInfo {
        TabInfo {
            url: url.to_string(),
            title: title.to_string(),
        }
    }
}
