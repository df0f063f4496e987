//! Thumbnail loading adapter

pub mod http;

pub use http::HttpImageLoader;
