//! Feed container
//!
//! Owns the scroll surface and the sentinel observer, decides when the
//! next batch is fetched, and keeps cards mounted around the current
//! position. Background work reports back as `FeedEvent`s which the front
//! end feeds into `apply`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{AbortHandle, JoinHandle};

use crate::app::{share_notice, BatchOutcome, CardService, FeedService};
use crate::domain::entities::{Article, ImageState, IntroState, PageId};
use crate::domain::ports::{ImageLoader, WikipediaClient};
use crate::feed::card::{Card, CardScope, MountedCard};
use crate::feed::viewport::{ObserverState, SentinelObserver, Viewport};

/// Results reported by background tasks
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    BatchSettled(BatchOutcome),
    IntroLoaded { page_id: PageId, intro: IntroState },
    ImageSettled { page_id: PageId, image: ImageState },
    /// A share finished; `notice` is the confirmation to show, if any
    ShareSettled { notice: Option<&'static str> },
}

/// What occupies the screen at the current scroll position
#[derive(Debug)]
pub enum Screen<'a> {
    Card(&'a Card),
    /// Past the last card: the sentinel, plus the loading indicator while
    /// a batch is being fetched
    End { loading: bool },
}

/// Render order of the scroll surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Card(PageId),
    Sentinel,
    Loading,
}

pub struct FeedContainer<W, I>
where
    W: WikipediaClient + 'static,
    I: ImageLoader + 'static,
{
    feed: Arc<FeedService<W, I>>,
    cards: Arc<CardService<W, I>>,
    viewport: Viewport,
    observer: SentinelObserver,
    prefetch_screens: u16,
    mounted: HashMap<PageId, MountedCard>,
    pending_fetch: Option<AbortHandle>,
    /// Blocking confirmation; the next key press dismisses it
    notice: Option<&'static str>,
    events: UnboundedSender<FeedEvent>,
}

impl<W, I> FeedContainer<W, I>
where
    W: WikipediaClient + 'static,
    I: ImageLoader + 'static,
{
    pub fn new(
        feed: Arc<FeedService<W, I>>,
        cards: Arc<CardService<W, I>>,
        viewport: Viewport,
        prefetch_screens: u16,
    ) -> (Self, UnboundedReceiver<FeedEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let container = Self {
            feed,
            cards,
            viewport,
            observer: SentinelObserver::default(),
            prefetch_screens,
            mounted: HashMap::new(),
            pending_fetch: None,
            notice: None,
            events,
        };
        (container, rx)
    }

    /// Start observing and fetch the first batch unconditionally
    pub fn mount(&mut self) -> JoinHandle<()> {
        self.observer.attach();
        tracing::info!("Feed mounted");
        self.spawn_fetch()
    }

    /// Stop observing and cancel every card's in-flight work. Results that
    /// arrive afterwards are not applied.
    pub fn unmount(&mut self) {
        self.observer.detach();
        self.mounted.clear();
        tracing::info!("Feed unmounted");
    }

    fn spawn_fetch(&mut self) -> JoinHandle<()> {
        let feed = Arc::clone(&self.feed);
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            let outcome = feed.fetch_batch().await;
            let _ = events.send(FeedEvent::BatchSettled(outcome));
        });
        self.pending_fetch = Some(handle.abort_handle());
        handle
    }

    fn is_watching(&self) -> bool {
        self.observer.state() == ObserverState::Watching
    }

    fn fetch_pending(&self) -> bool {
        self.pending_fetch
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Handle an intersection report for the sentinel.
    ///
    /// Spawns exactly one batch fetch when the ratio passes the threshold
    /// and nothing is loading. Reports while loading are dropped.
    pub fn on_sentinel_visibility(&mut self, ratio: f32) -> Option<JoinHandle<()>> {
        if !self.observer.is_triggered(ratio) {
            return None;
        }
        if self.feed.is_loading() || self.fetch_pending() {
            tracing::trace!("Sentinel visible while loading, ignored");
            return None;
        }

        tracing::debug!("Sentinel visible ({:.2}), fetching next batch", ratio);
        Some(self.spawn_fetch())
    }

    /// Recompute the sentinel's intersection at the current position
    pub fn evaluate_sentinel(&mut self) -> Option<JoinHandle<()>> {
        let ratio = self
            .viewport
            .sentinel_ratio(self.feed.len(), self.prefetch_screens);
        self.on_sentinel_visibility(ratio)
    }

    pub fn scroll_next(&mut self) -> Option<JoinHandle<()>> {
        self.scroll_to(self.viewport.index.saturating_add(1))
    }

    pub fn scroll_prev(&mut self) -> Option<JoinHandle<()>> {
        self.scroll_to(self.viewport.index.saturating_sub(1))
    }

    /// Move to a card; indexes past the end land on the sentinel screen
    pub fn scroll_to(&mut self, index: usize) -> Option<JoinHandle<()>> {
        if !self.is_watching() {
            return None;
        }
        self.viewport.index = index.min(self.feed.len());
        self.sync_cards();
        self.evaluate_sentinel()
    }

    pub fn resize(&mut self, cols: u16, rows: u16) -> Option<JoinHandle<()>> {
        self.viewport.resize(cols, rows);
        self.evaluate_sentinel()
    }

    /// Apply a background result. Returns true when the screen changed.
    pub fn apply(&mut self, event: FeedEvent) -> bool {
        match event {
            FeedEvent::BatchSettled(outcome) => {
                self.pending_fetch = None;
                if !self.is_watching() {
                    tracing::debug!("Batch settled after unmount, not applied");
                    return false;
                }
                match outcome {
                    BatchOutcome::Appended { appended, .. } => {
                        self.sync_cards();
                        if appended > 0 {
                            self.evaluate_sentinel();
                        }
                        true
                    }
                    // Only a scroll or resize re-evaluates after a batch
                    // that added nothing
                    BatchOutcome::Failed { .. } => true,
                    BatchOutcome::AlreadyInFlight => false,
                }
            }
            FeedEvent::IntroLoaded { page_id, intro } => match self.mounted.get_mut(&page_id) {
                Some(mounted) => {
                    mounted.card.intro = intro;
                    true
                }
                None => {
                    tracing::trace!(%page_id, "Discarding intro for unmounted card");
                    false
                }
            },
            FeedEvent::ShareSettled { notice } => match notice {
                Some(message) if self.is_watching() => {
                    self.notice = Some(message);
                    true
                }
                _ => false,
            },
            FeedEvent::ImageSettled { page_id, image } => match self.mounted.get_mut(&page_id) {
                Some(mounted) => {
                    mounted.card.image = image;
                    true
                }
                None => {
                    tracing::trace!(%page_id, "Discarding image state for unmounted card");
                    false
                }
            },
        }
    }

    /// Share the card on screen in the background. The result comes back as
    /// a `ShareSettled` event.
    pub fn share_current(&self) -> Option<JoinHandle<()>> {
        let Screen::Card(card) = self.screen() else {
            return None;
        };
        let article = card.article.clone();
        let intro = card.intro.text().map(str::to_string);

        let cards = Arc::clone(&self.cards);
        let events = self.events.clone();
        Some(tokio::spawn(async move {
            let result = cards.share(&article, intro.as_deref()).await;
            if let Err(e) = &result {
                tracing::error!("Copying link to clipboard failed: {}", e);
            }
            let _ = events.send(FeedEvent::ShareSettled {
                notice: share_notice(&result),
            });
        }))
    }

    /// Open the current article on Wikipedia in the background
    pub fn open_current(&self) -> Option<JoinHandle<()>> {
        let article = self.current_article()?;
        let cards = Arc::clone(&self.cards);
        Some(tokio::spawn(async move {
            cards.open(&article).await;
        }))
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Returns true when a notice was showing
    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    /// Mount the current card and its neighbours, unmount everything else
    fn sync_cards(&mut self) {
        if !self.is_watching() {
            return;
        }
        let index = self.viewport.index;
        let wanted: Vec<Article> = (index.saturating_sub(1)..=index.saturating_add(1))
            .filter_map(|i| self.feed.article(i))
            .collect();

        self.mounted
            .retain(|page_id, _| wanted.iter().any(|a| a.page_id == *page_id));

        for article in wanted {
            if !self.mounted.contains_key(&article.page_id) {
                let page_id = article.page_id;
                let mounted = self.mount_card(article);
                self.mounted.insert(page_id, mounted);
            }
        }
    }

    fn mount_card(&self, article: Article) -> MountedCard {
        let page_id = article.page_id;
        let mut scope = CardScope::default();

        let cards = Arc::clone(&self.cards);
        let events = self.events.clone();
        scope.spawn(async move {
            let intro = cards.fetch_intro(page_id).await;
            let _ = events.send(FeedEvent::IntroLoaded { page_id, intro });
        });

        let cards = Arc::clone(&self.cards);
        let events = self.events.clone();
        let thumbnail = article.thumbnail.clone();
        scope.spawn(async move {
            let image = cards.load_image(&thumbnail).await;
            let _ = events.send(FeedEvent::ImageSettled { page_id, image });
        });

        tracing::trace!(%page_id, "Card mounted");
        MountedCard::new(Card::new(article), scope)
    }

    pub fn screen(&self) -> Screen<'_> {
        self.feed
            .article(self.viewport.index)
            .and_then(|article| self.mounted.get(&article.page_id))
            .map(|mounted| Screen::Card(&mounted.card))
            .unwrap_or(Screen::End {
                loading: self.feed.is_loading(),
            })
    }

    /// Every card in arrival order, then the sentinel, then the loading
    /// indicator while a batch is being fetched
    pub fn slots(&self) -> Vec<Slot> {
        let snapshot = self.feed.snapshot();
        let mut slots: Vec<Slot> = snapshot
            .articles
            .iter()
            .map(|a| Slot::Card(a.page_id))
            .collect();
        slots.push(Slot::Sentinel);
        if snapshot.loading {
            slots.push(Slot::Loading);
        }
        slots
    }

    pub fn card(&self, page_id: PageId) -> Option<&Card> {
        self.mounted.get(&page_id).map(|m| &m.card)
    }

    pub fn is_mounted(&self, page_id: PageId) -> bool {
        self.mounted.contains_key(&page_id)
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    /// Intro and image loads still running for mounted cards
    pub fn pending_card_loads(&self) -> usize {
        self.mounted.values().map(MountedCard::pending_loads).sum()
    }

    pub fn current_article(&self) -> Option<Article> {
        self.feed.article(self.viewport.index)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn observer_state(&self) -> ObserverState {
        self.observer.state()
    }

    pub fn feed(&self) -> &FeedService<W, I> {
        &self.feed
    }

    pub fn card_service(&self) -> &Arc<CardService<W, I>> {
        &self.cards
    }
}
