//! Terminal platform adapters
//!
//! Share, clipboard and launcher capabilities for a terminal session.

pub mod clipboard;
pub mod command;

pub use clipboard::Osc52Clipboard;
pub use command::{CommandLauncher, CommandLine, CommandShareTarget};
