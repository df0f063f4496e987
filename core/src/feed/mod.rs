//! Feed presentation
//!
//! The scrollable container, card-local state and the text renderer.

pub mod card;
pub mod container;
pub mod renderer;
pub mod viewport;

pub use card::{Card, CardScope, MountedCard};
pub use container::{FeedContainer, FeedEvent, Screen, Slot};
pub use renderer::{render_notice, render_screen, Line, Position, Tone};
pub use viewport::{ObserverState, SentinelObserver, Viewport, SENTINEL_ROWS};
