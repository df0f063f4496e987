//! Image loader port trait

use async_trait::async_trait;

use crate::error::ImageError;

/// A thumbnail that downloaded to completion. The bytes themselves are not
/// kept; the terminal only shows that the image arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub url: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Port for loading thumbnail images to completion
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<LoadedImage, ImageError>;
}
