//! Wikipedia client port trait
//!
//! Defines the interface for the two queries the feed needs, plus the
//! wire shape of the query API's `pages` response.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Article, PageId, Thumbnail};
use crate::error::WikipediaError;

/// Thumbnail as returned by `prop=pageimages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiThumbnail {
    pub source: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// One page object from a `query.pages` mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikiPage {
    /// Missing for invalid titles
    pub pageid: Option<u64>,
    #[serde(default)]
    pub title: String,
    pub extract: Option<String>,
    pub thumbnail: Option<WikiThumbnail>,
    /// Position assigned by generators that order their output
    pub index: Option<u32>,
}

impl WikiPage {
    /// Convert to a feed article; pages without a usable thumbnail yield `None`
    pub fn into_article(self) -> Option<Article> {
        let page_id = PageId(self.pageid?);
        let thumbnail = self.thumbnail.filter(|t| !t.source.trim().is_empty())?;

        Some(Article {
            page_id,
            title: self.title,
            extract_short: self.extract,
            thumbnail: Thumbnail {
                url: thumbnail.source,
                width: thumbnail.width,
                height: thumbnail.height,
            },
        })
    }
}

/// API-level error object (`{"error": {"code": .., "info": ..}}`)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryPages {
    #[serde(default)]
    pub pages: HashMap<String, WikiPage>,
}

/// Top-level query response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    pub query: Option<QueryPages>,
    pub error: Option<ApiErrorBody>,
}

impl QueryResponse {
    /// Flatten the keyed mapping into a list.
    ///
    /// Ordered by generator `index` when present, then by numeric page id,
    /// which matches how a keyed JSON object with integer keys enumerates.
    pub fn into_pages(self) -> Result<Vec<WikiPage>, WikipediaError> {
        if let Some(error) = self.error {
            return Err(WikipediaError::Remote {
                code: error.code,
                info: error.info,
            });
        }

        let mut pages: Vec<WikiPage> = self
            .query
            .map(|q| q.pages.into_values().collect())
            .unwrap_or_default();
        pages.sort_by_key(|p| (p.index.unwrap_or(u32::MAX), p.pageid.unwrap_or(u64::MAX)));
        Ok(pages)
    }
}

/// Port for the Wikipedia query API
#[async_trait]
pub trait WikipediaClient: Send + Sync {
    /// Fetch up to `limit` random main-namespace pages with short extracts and thumbnails
    async fn random_pages(&self, limit: u32) -> Result<Vec<WikiPage>, WikipediaError>;

    /// Fetch the sentence-capped plain-text intro of one page
    async fn intro_extract(&self, page_id: PageId) -> Result<Option<String>, WikipediaError>;
}
