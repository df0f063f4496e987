//! Article domain entity
//!
//! One Wikipedia page surfaced in the feed. Articles are only ever built
//! from pages that carry a thumbnail, so `thumbnail` is not optional here.

use serde::{Deserialize, Serialize};

/// Wikipedia page id, stable per page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Thumbnail metadata as returned by the page-images query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// An article in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub page_id: PageId,
    pub title: String,
    /// Short plain-text summary from the batch query
    pub extract_short: Option<String>,
    pub thumbnail: Thumbnail,
}

impl Article {
    /// The short extract, if it has any visible text
    pub fn summary(&self) -> Option<&str> {
        self.extract_short
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Permanent link to a page by id: `https://<host>/?curid=<id>`
pub fn canonical_url(wiki_host: &str, page_id: PageId) -> String {
    format!("https://{}/?curid={}", wiki_host, page_id)
}

/// Human-readable article link: `https://<host>/wiki/<Title_With_Underscores>`
pub fn article_url(wiki_host: &str, title: &str) -> String {
    let slug = title.trim().replace(' ', "_");
    format!("https://{}/wiki/{}", wiki_host, urlencoding::encode(&slug))
}
