//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod images;
pub mod terminal;
pub mod wikipedia;

pub use images::HttpImageLoader;
pub use terminal::{CommandLauncher, CommandLine, CommandShareTarget, Osc52Clipboard};
pub use wikipedia::WikipediaClientImpl;
