//! Application layer
//!
//! Services coordinate between domain entities and ports.

pub mod card_service;
pub mod feed_service;

pub use card_service::{share_notice, CardService, Platform, ShareOutcome, COPIED_NOTICE};
pub use feed_service::{BatchOutcome, FeedService, FeedSnapshot};
