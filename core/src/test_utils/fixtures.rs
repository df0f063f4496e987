//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use crate::config::Config;
use crate::domain::entities::{Article, PageId, Thumbnail};
use crate::domain::ports::{WikiPage, WikiThumbnail};

/// Thumbnail URL used by the page and article fixtures
pub fn thumb_url(page_id: u64) -> String {
    format!("https://upload.wikimedia.org/thumb/{}.jpg", page_id)
}

/// Create a raw API page that carries a thumbnail
pub fn test_page(page_id: u64, title: &str) -> WikiPage {
    WikiPage {
        pageid: Some(page_id),
        title: title.to_string(),
        extract: Some(format!("{} is a test article.", title)),
        thumbnail: Some(WikiThumbnail {
            source: thumb_url(page_id),
            width: 400,
            height: 300,
        }),
        index: None,
    }
}

/// Create a raw API page with no thumbnail; it never reaches the feed
pub fn test_page_without_thumbnail(page_id: u64, title: &str) -> WikiPage {
    WikiPage {
        thumbnail: None,
        ..test_page(page_id, title)
    }
}

/// Create `count` consecutive pages starting at `first_id`
pub fn test_pages(first_id: u64, count: u64) -> Vec<WikiPage> {
    (first_id..first_id + count)
        .map(|id| test_page(id, &format!("Article {}", id)))
        .collect()
}

/// Create a feed article with default values
pub fn test_article(page_id: u64) -> Article {
    Article {
        page_id: PageId(page_id),
        title: format!("Article {}", page_id),
        extract_short: Some("A short summary.".to_string()),
        thumbnail: Thumbnail {
            url: thumb_url(page_id),
            width: 400,
            height: 300,
        },
    }
}

/// Config with every value at its default
pub fn test_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}
