//! Wikipedia query API adapter

pub mod client;

pub use client::WikipediaClientImpl;
