//! Article card service
//!
//! Side effects a single card performs: fetching its longer intro, loading
//! its thumbnail, sharing its link and opening it on Wikipedia.

use std::sync::Arc;

use crate::domain::entities::{
    article_url, canonical_url, Article, ImageState, IntroState, PageId, Thumbnail,
};
use crate::domain::ports::{
    Clipboard, ImageLoader, Launcher, SharePayload, ShareTarget, WikipediaClient,
};
use crate::error::AppError;

/// Platform capabilities available to cards
#[derive(Clone)]
pub struct Platform {
    /// `None` when the platform has no share capability
    pub share: Option<Arc<dyn ShareTarget>>,
    pub clipboard: Arc<dyn Clipboard>,
    pub launcher: Arc<dyn Launcher>,
}

pub const COPIED_NOTICE: &str = "Link copied to clipboard!";

/// Result of a share action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The share target failed or the user cancelled; nothing else was tried
    ShareFailed,
    /// No share target, so the canonical URL went to the clipboard
    Copied { url: String },
}

impl ShareOutcome {
    /// Confirmation to show the user. Only a clipboard copy gets one.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            ShareOutcome::Copied { .. } => Some(COPIED_NOTICE),
            ShareOutcome::Shared | ShareOutcome::ShareFailed => None,
        }
    }
}

/// Confirmation for a finished share attempt; a failed copy shows nothing
pub fn share_notice(result: &Result<ShareOutcome, AppError>) -> Option<&'static str> {
    result.as_ref().ok().and_then(ShareOutcome::notice)
}

pub struct CardService<W, I>
where
    W: WikipediaClient,
    I: ImageLoader,
{
    wikipedia: Arc<W>,
    images: Arc<I>,
    platform: Platform,
    wiki_host: String,
}

impl<W, I> CardService<W, I>
where
    W: WikipediaClient,
    I: ImageLoader,
{
    pub fn new(
        wikipedia: Arc<W>,
        images: Arc<I>,
        platform: Platform,
        wiki_host: impl Into<String>,
    ) -> Self {
        Self {
            wikipedia,
            images,
            platform,
            wiki_host: wiki_host.into(),
        }
    }

    pub fn can_share(&self) -> bool {
        self.platform.share.is_some()
    }

    /// Fetch the sentence-capped intro for a page. Never retried.
    pub async fn fetch_intro(&self, page_id: PageId) -> IntroState {
        match self.wikipedia.intro_extract(page_id).await {
            Ok(Some(text)) => IntroState::Loaded(text),
            Ok(None) => {
                tracing::debug!(%page_id, "Intro came back empty");
                IntroState::Unavailable
            }
            Err(e) => {
                tracing::warn!(%page_id, "Intro fetch failed: {}", e);
                IntroState::Unavailable
            }
        }
    }

    /// Load a thumbnail. Errors settle the image just like a success does.
    pub async fn load_image(&self, thumbnail: &Thumbnail) -> ImageState {
        match self.images.load(&thumbnail.url).await {
            Ok(_) => ImageState::Loaded,
            Err(e) => {
                tracing::debug!(url = %thumbnail.url, "Thumbnail failed to load: {}", e);
                ImageState::Errored
            }
        }
    }

    /// Share an article, or copy its link when there is no share target.
    ///
    /// Share failures are logged and reported as `ShareFailed`. Clipboard
    /// failures are returned to the caller.
    pub async fn share(
        &self,
        article: &Article,
        intro: Option<&str>,
    ) -> Result<ShareOutcome, AppError> {
        let url = self.canonical_url(article.page_id);

        let Some(target) = &self.platform.share else {
            self.platform.clipboard.write_text(&url).await?;
            tracing::info!(page_id = %article.page_id, "Copied link to clipboard");
            return Ok(ShareOutcome::Copied { url });
        };

        let payload = SharePayload {
            title: article.title.clone(),
            text: intro.unwrap_or_default().to_string(),
            url,
        };

        match target.share(&payload).await {
            Ok(()) => {
                tracing::info!(page_id = %article.page_id, "Shared article");
                Ok(ShareOutcome::Shared)
            }
            Err(e) => {
                tracing::warn!(page_id = %article.page_id, "Share failed: {}", e);
                Ok(ShareOutcome::ShareFailed)
            }
        }
    }

    /// Open the article on Wikipedia. Returns whether the launcher succeeded.
    pub async fn open(&self, article: &Article) -> bool {
        let url = self.article_url(&article.title);
        match self.platform.launcher.open_url(&url).await {
            Ok(()) => {
                tracing::debug!("Opened {}", url);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", url, e);
                false
            }
        }
    }

    pub fn canonical_url(&self, page_id: PageId) -> String {
        canonical_url(&self.wiki_host, page_id)
    }

    pub fn article_url(&self, title: &str) -> String {
        article_url(&self.wiki_host, title)
    }
}
