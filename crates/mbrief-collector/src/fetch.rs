use std::time::Duration;

use reqwest::Client;

use crate::error::CollectorError;

/// HTTP client for source pages.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a page and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::UnexpectedStatus`] for any non-2xx response
    /// and [`CollectorError::Http`] on network failure.
    pub async fn fetch(&self, url: &str) -> Result<String, CollectorError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CollectorError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
