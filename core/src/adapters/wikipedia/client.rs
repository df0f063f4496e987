//! Wikipedia query API client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::domain::entities::PageId;
use crate::domain::ports::{QueryResponse, WikiPage, WikipediaClient};
use crate::error::WikipediaError;

/// Implementation of the Wikipedia client over reqwest
pub struct WikipediaClientImpl {
    http: Client,
    api_url: String,
    extract_chars: u32,
    thumb_size: u32,
    intro_sentences: u32,
}

impl WikipediaClientImpl {
    pub fn new(config: &Config) -> Result<Self, WikipediaError> {
        let http = Client::builder().user_agent(&config.user_agent).build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            extract_chars: config.extract_chars,
            thumb_size: config.thumb_size,
            intro_sentences: config.intro_sentences,
        })
    }

    /// Query parameters for a batch of random pages
    fn batch_params(&self, limit: u32) -> Vec<(&'static str, String)> {
        vec![
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("generator", "random".to_string()),
            ("grnnamespace", "0".to_string()),
            ("grnlimit", limit.to_string()),
            ("prop", "extracts|pageimages".to_string()),
            ("exintro", "1".to_string()),
            ("exchars", self.extract_chars.to_string()),
            ("explaintext", "1".to_string()),
            ("exlimit", "max".to_string()),
            ("piprop", "thumbnail".to_string()),
            ("pithumbsize", self.thumb_size.to_string()),
            ("origin", "*".to_string()),
        ]
    }

    /// Query parameters for one page's intro
    fn intro_params(&self, page_id: PageId) -> Vec<(&'static str, String)> {
        vec![
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("prop", "extracts".to_string()),
            ("pageids", page_id.to_string()),
            ("exintro", "1".to_string()),
            ("explaintext", "1".to_string()),
            ("exsentences", self.intro_sentences.to_string()),
            ("origin", "*".to_string()),
        ]
    }

    async fn query(&self, params: &[(&'static str, String)]) -> Result<Vec<WikiPage>, WikipediaError> {
        let response = self.http.get(&self.api_url).query(params).send().await?;
        let body: QueryResponse = self.handle_response(response).await?;
        body.into_pages()
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WikipediaError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WikipediaError::Deserialization(e.to_string()))
        } else if status.as_u16() == 429 {
            Err(WikipediaError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(WikipediaError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl WikipediaClient for WikipediaClientImpl {
    async fn random_pages(&self, limit: u32) -> Result<Vec<WikiPage>, WikipediaError> {
        let pages = self.query(&self.batch_params(limit)).await?;
        tracing::debug!("Wikipedia returned {} random pages", pages.len());
        Ok(pages)
    }

    async fn intro_extract(&self, page_id: PageId) -> Result<Option<String>, WikipediaError> {
        let pages = self.query(&self.intro_params(page_id)).await?;

        Ok(pages
            .into_iter()
            .find(|p| p.pageid == Some(page_id.0))
            .and_then(|p| p.extract)
            .filter(|text| !text.trim().is_empty()))
    }
}
