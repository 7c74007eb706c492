use crate::error::{Result, StudioError};
use async_trait::async_trait;
use reqwest::Client;

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<Vec<u8>>;
}

#[derive(Clone, Default)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, address: &str) -> Result<Vec<u8>> {
        log::debug!("Fetching image bytes from {}", address);

        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|e| StudioError::RequestError(format!("Image request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StudioError::ResponseError(format!(
                "Image service returned {}: {}",
                status, error_text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StudioError::ResponseError(format!("Unreadable image body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}
