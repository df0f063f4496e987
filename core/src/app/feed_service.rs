//! Feed service
//!
//! Owns the articles shown in the feed and the loading flag. Batches of
//! random pages are fetched one at a time, thumbnails are preloaded, and
//! the survivors are appended in arrival order. Everything else only ever
//! sees read-only snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::join_all;
use uuid::Uuid;

use crate::domain::entities::Article;
use crate::domain::ports::{ImageLoader, WikiPage, WikipediaClient};

/// Mutable feed state, only reachable through `FeedService`
#[derive(Debug, Default)]
struct FeedState {
    /// Append-only, arrival order, duplicates across batches allowed
    articles: Vec<Article>,
    /// True exactly while a batch fetch is outstanding
    loading: bool,
}

/// Point-in-time copy of the feed state
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub articles: Vec<Article>,
    pub loading: bool,
}

/// What a single `fetch_batch` call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Appended {
        batch_id: Uuid,
        appended: usize,
        dropped_without_thumbnail: usize,
        preload_failures: usize,
    },
    /// The request or response parsing failed; nothing was appended
    Failed { batch_id: Uuid },
    /// Another batch was already being fetched; no request was made
    AlreadyInFlight,
}

impl BatchOutcome {
    /// Number of articles this batch added to the feed
    pub fn appended(&self) -> usize {
        match self {
            BatchOutcome::Appended { appended, .. } => *appended,
            BatchOutcome::Failed { .. } | BatchOutcome::AlreadyInFlight => 0,
        }
    }
}

/// Clears `loading` and releases the in-flight claim when dropped, so both
/// reset on success, failure and cancellation alike.
struct InFlightGuard<'a> {
    in_flight: &'a AtomicBool,
    state: &'a RwLock<FeedState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .loading = false;
        self.in_flight.store(false, Ordering::Release);
    }
}

/// Service for fetching and accumulating feed articles
pub struct FeedService<W, I>
where
    W: WikipediaClient,
    I: ImageLoader,
{
    wikipedia: Arc<W>,
    images: Arc<I>,
    batch_size: u32,
    state: RwLock<FeedState>,
    in_flight: AtomicBool,
}

impl<W, I> FeedService<W, I>
where
    W: WikipediaClient,
    I: ImageLoader,
{
    pub fn new(wikipedia: Arc<W>, images: Arc<I>, batch_size: u32) -> Self {
        Self {
            wikipedia,
            images,
            batch_size,
            state: RwLock::new(FeedState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, FeedState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FeedState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.write().loading = true;

        Some(InFlightGuard {
            in_flight: &self.in_flight,
            state: &self.state,
        })
    }

    /// Fetch one batch of random articles and append the ones with thumbnails.
    ///
    /// Failures are logged and swallowed; the feed is left unchanged and
    /// `loading` is cleared either way.
    pub async fn fetch_batch(&self) -> BatchOutcome {
        let Some(_guard) = self.claim() else {
            tracing::debug!("Batch already in flight, skipping fetch");
            return BatchOutcome::AlreadyInFlight;
        };

        let batch_id = Uuid::new_v4();
        tracing::debug!(%batch_id, "Fetching {} random pages", self.batch_size);

        let pages = match self.wikipedia.random_pages(self.batch_size).await {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!(%batch_id, "Batch fetch failed: {}", e);
                return BatchOutcome::Failed { batch_id };
            }
        };

        let received = pages.len();
        let articles: Vec<Article> = pages
            .into_iter()
            .filter_map(WikiPage::into_article)
            .collect();
        let dropped_without_thumbnail = received - articles.len();

        let preload_failures = self.preload(batch_id, &articles).await;

        let appended = articles.len();
        let total = {
            let mut state = self.write();
            state.articles.extend(articles);
            state.articles.len()
        };

        tracing::info!(
            %batch_id,
            appended,
            dropped_without_thumbnail,
            preload_failures,
            total,
            "Batch appended"
        );

        BatchOutcome::Appended {
            batch_id,
            appended,
            dropped_without_thumbnail,
            preload_failures,
        }
    }

    /// Start every thumbnail load at once and wait for all of them to settle.
    /// Returns the number of loads that failed.
    async fn preload(&self, batch_id: Uuid, articles: &[Article]) -> usize {
        let loads = articles
            .iter()
            .map(|article| self.images.load(&article.thumbnail.url));
        let results = join_all(loads).await;

        results
            .iter()
            .zip(articles)
            .filter(|(result, article)| match result {
                Ok(_) => false,
                Err(e) => {
                    tracing::debug!(
                        %batch_id,
                        page_id = %article.page_id,
                        "Thumbnail preload failed: {}",
                        e
                    );
                    true
                }
            })
            .count()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.read();
        FeedSnapshot {
            articles: state.articles.clone(),
            loading: state.loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn len(&self) -> usize {
        self.read().articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn article(&self, index: usize) -> Option<Article> {
        self.read().articles.get(index).cloned()
    }
}
