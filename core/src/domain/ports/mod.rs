//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod images;
pub mod platform;
pub mod wikipedia;

pub use images::{ImageLoader, LoadedImage};
pub use platform::{Clipboard, Launcher, SharePayload, ShareTarget};
pub use wikipedia::{QueryResponse, WikiPage, WikiThumbnail, WikipediaClient};
