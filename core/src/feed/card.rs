//! Card-local state and the task scope tied to a mounted card

use std::future::Future;

use tokio::task::AbortHandle;

use crate::domain::entities::{Article, ImageState, IntroState, PageId};

/// One article as currently displayed
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub article: Article,
    pub intro: IntroState,
    pub image: ImageState,
}

impl Card {
    pub fn new(article: Article) -> Self {
        Self {
            article,
            intro: IntroState::Loading,
            image: ImageState::Pending,
        }
    }

    pub fn page_id(&self) -> PageId {
        self.article.page_id
    }
}

/// Background tasks owned by a mounted card; aborted when the scope drops
#[derive(Debug, Default)]
pub struct CardScope {
    tasks: Vec<AbortHandle>,
}

impl CardScope {
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        self.tasks.push(handle.abort_handle());
    }

    /// Tasks spawned in this scope that have not finished yet
    pub fn running(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }
}

impl Drop for CardScope {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// A card plus the scope its loads run in
#[derive(Debug)]
pub struct MountedCard {
    pub card: Card,
    scope: CardScope,
}

impl MountedCard {
    pub fn new(card: Card, scope: CardScope) -> Self {
        Self { card, scope }
    }

    pub fn pending_loads(&self) -> usize {
        self.scope.running()
    }
}
