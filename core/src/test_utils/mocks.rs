//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They record every call so tests can verify behavior.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use tokio::sync::{Notify, Semaphore};

use crate::domain::entities::PageId;
use crate::domain::ports::{
    Clipboard, ImageLoader, Launcher, LoadedImage, SharePayload, ShareTarget, WikiPage,
    WikipediaClient,
};
use crate::error::{ImageError, PlatformError, WikipediaError};

// ============================================================================
// Mock Wikipedia Client
// ============================================================================

enum IntroReply {
    Text(String),
    Fail,
    Hang,
}

#[derive(Default)]
pub struct MockWikipediaClient {
    batches: Mutex<VecDeque<Result<Vec<WikiPage>, u16>>>,
    intros: RwLock<HashMap<PageId, IntroReply>>,
    batch_calls: AtomicUsize,
    intro_calls: AtomicUsize,
    cancelled_intros: AtomicUsize,
    batch_started: Notify,
    gate: Option<Semaphore>,
}

impl MockWikipediaClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful batch response
    pub fn with_batch(self, pages: Vec<WikiPage>) -> Self {
        self.batches.lock().unwrap().push_back(Ok(pages));
        self
    }

    /// Queue a batch that fails with an HTTP 500
    pub fn with_failing_batch(self) -> Self {
        self.batches.lock().unwrap().push_back(Err(500));
        self
    }

    pub fn with_intro(self, page_id: u64, text: &str) -> Self {
        self.intros
            .write()
            .unwrap()
            .insert(PageId(page_id), IntroReply::Text(text.to_string()));
        self
    }

    pub fn with_failing_intro(self, page_id: u64) -> Self {
        self.intros
            .write()
            .unwrap()
            .insert(PageId(page_id), IntroReply::Fail);
        self
    }

    /// The intro request for this page never completes
    pub fn with_hanging_intro(self, page_id: u64) -> Self {
        self.intros
            .write()
            .unwrap()
            .insert(PageId(page_id), IntroReply::Hang);
        self
    }

    /// Batch requests block until `release` is called once per request
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Wait until a batch request has reached the client
    pub async fn wait_for_batch_call(&self) {
        self.batch_started.notified().await;
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn intro_calls(&self) -> usize {
        self.intro_calls.load(Ordering::SeqCst)
    }

    /// Hanging intro requests that were dropped before completing
    pub fn cancelled_intros(&self) -> usize {
        self.cancelled_intros.load(Ordering::SeqCst)
    }
}

/// Counts a request as cancelled when its future is dropped
struct CancelCounter<'a>(&'a AtomicUsize);

impl Drop for CancelCounter<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WikipediaClient for MockWikipediaClient {
    async fn random_pages(&self, _limit: u32) -> Result<Vec<WikiPage>, WikipediaError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.batch_started.notify_one();

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(Ok(pages)) => Ok(pages),
            Some(Err(status)) => Err(WikipediaError::Api {
                status,
                message: "mock failure".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn intro_extract(&self, page_id: PageId) -> Result<Option<String>, WikipediaError> {
        self.intro_calls.fetch_add(1, Ordering::SeqCst);

        let hang = matches!(
            self.intros.read().unwrap().get(&page_id),
            Some(IntroReply::Hang)
        );
        if hang {
            let _cancelled = CancelCounter(&self.cancelled_intros);
            std::future::pending::<()>().await;
        }

        match self.intros.read().unwrap().get(&page_id) {
            Some(IntroReply::Text(text)) => Ok(Some(text.clone())),
            Some(IntroReply::Fail) => Err(WikipediaError::Api {
                status: 500,
                message: "mock intro failure".to_string(),
            }),
            _ => Ok(None),
        }
    }
}

// ============================================================================
// Mock Image Loader
// ============================================================================

#[derive(Default)]
pub struct MockImageLoader {
    failing: HashSet<String>,
    slow: HashSet<String>,
    requested: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
}

impl MockImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// This URL finishes after the others started in the same batch
    pub fn with_slow(mut self, url: &str) -> Self {
        self.slow.insert(url.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageLoader for MockImageLoader {
    async fn load(&self, url: &str) -> Result<LoadedImage, ImageError> {
        self.requested.lock().unwrap().push(url.to_string());

        if self.slow.contains(url) {
            for _ in 0..8 {
                tokio::task::yield_now().await;
            }
        }
        self.completed.lock().unwrap().push(url.to_string());

        if self.failing.contains(url) {
            return Err(ImageError::Status(404));
        }

        Ok(LoadedImage {
            url: url.to_string(),
            content_type: Some("image/jpeg".to_string()),
            size: 3,
        })
    }
}

// ============================================================================
// Mock Platform Capabilities
// ============================================================================

#[derive(Default)]
pub struct MockShareTarget {
    fail: bool,
    /// When set, each share waits for a permit, like a share sheet left open
    gate: Option<Semaphore>,
    shared: Mutex<Vec<SharePayload>>,
}

impl MockShareTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every share reports a cancellation
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn shared(&self) -> Vec<SharePayload> {
        self.shared.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShareTarget for MockShareTarget {
    async fn share(&self, payload: &SharePayload) -> Result<(), PlatformError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.shared.lock().unwrap().push(payload.clone());
        if self.fail {
            return Err(PlatformError::Command {
                program: "share".to_string(),
                message: "cancelled by user".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    fail: bool,
    texts: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<(), PlatformError> {
        if self.fail {
            return Err(PlatformError::Unavailable("clipboard".to_string()));
        }
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    fail: bool,
    opened: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        self.opened.lock().unwrap().push(url.to_string());
        if self.fail {
            return Err(PlatformError::Command {
                program: "xdg-open".to_string(),
                message: "exit status: 3".to_string(),
            });
        }
        Ok(())
    }
}
