//! Platform capability ports
//!
//! Share, clipboard and URL opening. The share capability is optional;
//! callers hold it as `Option<Arc<dyn ShareTarget>>`.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::PlatformError;

/// What gets handed to the share capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Share the payload. Cancellation by the user is reported as an error.
    async fn share(&self, payload: &SharePayload) -> Result<(), PlatformError>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), PlatformError>;
}

#[async_trait]
pub trait Launcher: Send + Sync {
    async fn open_url(&self, url: &str) -> Result<(), PlatformError>;
}
