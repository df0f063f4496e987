//! WikiTok core
//!
//! A feed of random Wikipedia articles: the data source, the scrollable
//! container with its load-more sentinel, and the per-article cards.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;

#[cfg(test)]
pub mod test_utils;
