//! HTTP thumbnail loader
//!
//! Downloads images to completion and remembers which URLs arrived, so a
//! card mounting after the batch preload settles without a second
//! download. Only metadata is kept; the bytes are dropped once counted.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::config::Config;
use crate::domain::ports::{ImageLoader, LoadedImage};
use crate::error::ImageError;

pub struct HttpImageLoader {
    http: Client,
    loaded: RwLock<HashMap<String, LoadedImage>>,
}

impl HttpImageLoader {
    pub fn new(config: &Config) -> Result<Self, ImageError> {
        let http = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self {
            http,
            loaded: RwLock::new(HashMap::new()),
        })
    }

    fn cached(&self, url: &str) -> Option<LoadedImage> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    fn remember(&self, image: LoadedImage) {
        self.loaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(image.url.clone(), image);
    }
}

/// Accept missing content types; reject anything that is clearly not an image
fn check_content_type(url: &str, content_type: Option<&str>) -> Result<(), ImageError> {
    match content_type {
        Some(ct) if !ct.trim().to_ascii_lowercase().starts_with("image/") => {
            Err(ImageError::NotAnImage {
                url: url.to_string(),
                content_type: ct.to_string(),
            })
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<LoadedImage, ImageError> {
        if let Some(image) = self.cached(url) {
            return Ok(image);
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        check_content_type(url, content_type.as_deref())?;

        let size = response.bytes().await?.len();
        let image = LoadedImage {
            url: url.to_string(),
            content_type,
            size,
        };
        tracing::trace!("Loaded {} ({} bytes)", url, size);

        self.remember(image.clone());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> HttpImageLoader {
        HttpImageLoader::new(&Config::from_lookup(|_| None).unwrap()).unwrap()
    }

    #[test]
    fn content_type_check() {
        assert!(check_content_type("u", Some("image/jpeg")).is_ok());
        assert!(check_content_type("u", Some("Image/PNG")).is_ok());
        assert!(check_content_type("u", None).is_ok());
        assert!(matches!(
            check_content_type("u", Some("text/html; charset=utf-8")),
            Err(ImageError::NotAnImage { .. })
        ));
    }

    #[tokio::test]
    async fn cached_images_skip_the_network() {
        let loader = loader();
        // Unroutable URL: only the cache can satisfy this load
        let url = "http://127.0.0.1:9/thumb.png";
        loader.remember(LoadedImage {
            url: url.to_string(),
            content_type: Some("image/png".to_string()),
            size: 4,
        });

        let image = loader.load(url).await.unwrap();
        assert_eq!(image.size, 4);
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn cache_keeps_one_metadata_entry_per_url() {
        let loader = loader();
        let image = LoadedImage {
            url: "https://upload.wikimedia.org/a.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            size: 48_213,
        };
        loader.remember(image.clone());
        loader.remember(image.clone());

        assert_eq!(loader.loaded.read().unwrap().len(), 1);
        assert_eq!(loader.cached(&image.url), Some(image));
    }
}
