//! Domain entities

pub mod article;
pub mod card;

pub use article::{article_url, canonical_url, Article, PageId, Thumbnail};
pub use card::{ImageState, IntroState};
