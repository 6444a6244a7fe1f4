//! TEI (Text Embeddings Inference) client for vector generation.

use std::time::Duration;

use serde::Serialize;

use crate::error::IndexError;

/// Maximum number of texts per /embed call.
const BATCH_SIZE: usize = 64;

/// TEI HTTP client.
pub struct TeiClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

impl TeiClient {
    /// Create a new `TeiClient` with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(tei_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, IndexError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/embed", tei_url.trim_end_matches('/')),
        })
    }

    /// Generate embeddings for a batch of texts.
    ///
    /// Texts are batched into groups of [`BATCH_SIZE`] (64) per request.
    /// Returns one embedding vector per input text, in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::UnexpectedStatus`] on a non-2xx response,
    /// [`IndexError::Http`] on network failure, or
    /// [`IndexError::EmbeddingCount`] if the service violates its
    /// one-vector-per-input contract.
    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IndexError> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let request = EmbedRequest { inputs: chunk };
            let response = self.client.post(&self.url).json(&request).send().await?;

            if !response.status().is_success() {
                return Err(IndexError::UnexpectedStatus {
                    status: response.status().as_u16(),
                    url: self.url.clone(),
                });
            }

            let embeddings: Vec<Vec<f32>> = response.json().await?;

            if embeddings.len() != chunk.len() {
                return Err(IndexError::EmbeddingCount {
                    expected: chunk.len(),
                    got: embeddings.len(),
                });
            }

            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    /// Embed a single text, returning its vector.
    ///
    /// Used by the retrieval fallback path, which re-queries the index with
    /// a precomputed embedding when the text-native lookup fails.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`TeiClient::embed`].
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, IndexError> {
        let mut embeddings = self.embed(&[text]).await?;
        if embeddings.is_empty() {
            return Err(IndexError::EmbeddingCount {
                expected: 1,
                got: 0,
            });
        }
        Ok(embeddings.swap_remove(0))
    }
}
