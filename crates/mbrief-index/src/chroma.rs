//! Chroma vector index client for the market-news corpus.
//!
//! The index owns storage and ranking; this client only issues collection
//! management calls, bulk-replace rebuilds, and k-NN queries. Queries run
//! either text-native (the index embeds the query itself) or against a
//! precomputed embedding, and return matches sorted ascending by distance.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::IndexError;
use crate::types::{IndexedDocument, ScoredDocument};

/// Chroma HTTP client, bound to one collection.
pub struct ChromaClient {
    client: reqwest::Client,
    base_url: String,
    collection_id: String,
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    ids: Vec<String>,
    embeddings: &'a [Vec<f32>],
    documents: Vec<&'a str>,
    metadatas: Vec<StoredMetadata<'a>>,
}

#[derive(Serialize)]
struct StoredMetadata<'a> {
    source: &'a str,
    timestamp: &'a str,
}

#[derive(Serialize, Default)]
struct GetRequest {
    include: Vec<&'static str>,
}

#[derive(Deserialize)]
struct GetResponse {
    #[serde(default)]
    ids: Vec<String>,
}

#[derive(Serialize)]
struct DeleteRequest {
    ids: Vec<String>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    query_texts: Option<[&'a str; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_embeddings: Option<[&'a [f32]; 1]>,
    n_results: usize,
    include: [&'static str; 3],
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Option<Vec<Vec<String>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<RawMetadata>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f64>>>,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl ChromaClient {
    /// Connect to the index and resolve the collection, creating it if absent.
    ///
    /// The returned client is bound to the resolved collection id for its
    /// lifetime; construct it once at process start and share it by reference.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the HTTP client cannot be built, the index
    /// is unreachable, or the collection cannot be resolved.
    pub async fn connect(
        index_url: &str,
        collection: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, IndexError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let base_url = index_url.trim_end_matches('/').to_string();

        let url = format!("{base_url}/api/v1/collections");
        let body = CreateCollectionRequest {
            name: collection,
            get_or_create: true,
        };
        let response = client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(IndexError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        let info: CollectionInfo = response.json().await?;

        tracing::debug!(collection, id = %info.id, "resolved index collection");
        Ok(Self {
            client,
            base_url,
            collection_id: info.id,
        })
    }

    /// Number of documents currently stored in the collection.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] on network or API failure.
    pub async fn count(&self) -> Result<u64, IndexError> {
        let url = format!(
            "{}/api/v1/collections/{}/count",
            self.base_url, self.collection_id
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(IndexError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }

    /// Query the collection with raw text, letting the index embed it.
    ///
    /// Returns up to `n_results` matches sorted ascending by distance. The
    /// index tolerates `n_results` larger than the stored count and simply
    /// returns fewer.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] on network or API failure.
    pub async fn query_text(
        &self,
        text: &str,
        n_results: usize,
    ) -> Result<Vec<ScoredDocument>, IndexError> {
        self.query(QueryRequest {
            query_texts: Some([text]),
            query_embeddings: None,
            n_results,
            include: INCLUDE,
        })
        .await
    }

    /// Query the collection with a precomputed embedding.
    ///
    /// The fallback lookup path: used when the text-native query fails.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] on network or API failure.
    pub async fn query_embedding(
        &self,
        embedding: &[f32],
        n_results: usize,
    ) -> Result<Vec<ScoredDocument>, IndexError> {
        self.query(QueryRequest {
            query_texts: None,
            query_embeddings: Some([embedding]),
            n_results,
            include: INCLUDE,
        })
        .await
    }

    async fn query(&self, body: QueryRequest<'_>) -> Result<Vec<ScoredDocument>, IndexError> {
        let url = format!(
            "{}/api/v1/collections/{}/query",
            self.base_url, self.collection_id
        );
        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(IndexError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        let parsed: QueryResponse = response.json().await?;

        // Responses carry one inner array per query; we always send exactly one.
        let documents = first_row(parsed.documents);
        let metadatas = first_row(parsed.metadatas);
        let distances = first_row(parsed.distances);

        let matches = documents
            .into_iter()
            .zip(distances)
            .zip(pad_metadata(metadatas))
            .map(|((text, distance), meta)| {
                let meta = meta.flatten();
                ScoredDocument {
                    text,
                    source: meta.as_ref().and_then(|m| m.source.clone()),
                    timestamp: meta.as_ref().and_then(|m| m.timestamp.clone()),
                    distance,
                }
            })
            .collect();
        Ok(matches)
    }

    /// Replace the collection's entire contents with the given documents.
    ///
    /// Bulk-replace semantics: every existing id is deleted before the new
    /// corpus is added, so repeated ingests never accumulate duplicates.
    /// Point ids are derived deterministically from document content via
    /// [`document_point_id`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::EmbeddingCount`] if `embeddings` and `documents`
    /// differ in length, or [`IndexError`] on any API failure.
    pub async fn rebuild(
        &self,
        documents: &[IndexedDocument],
        embeddings: &[Vec<f32>],
    ) -> Result<usize, IndexError> {
        if documents.len() != embeddings.len() {
            return Err(IndexError::EmbeddingCount {
                expected: documents.len(),
                got: embeddings.len(),
            });
        }

        let existing = self.list_ids().await?;
        if !existing.is_empty() {
            tracing::info!(
                cleared = existing.len(),
                "clearing existing documents before rebuild"
            );
            self.delete_ids(existing).await?;
        }

        if documents.is_empty() {
            return Ok(0);
        }

        let url = format!(
            "{}/api/v1/collections/{}/add",
            self.base_url, self.collection_id
        );
        let body = AddRequest {
            ids: documents
                .iter()
                .map(|d| document_point_id(&d.source, &d.timestamp, &d.text))
                .collect(),
            embeddings,
            documents: documents.iter().map(|d| d.text.as_str()).collect(),
            metadatas: documents
                .iter()
                .map(|d| StoredMetadata {
                    source: &d.source,
                    timestamp: &d.timestamp,
                })
                .collect(),
        };
        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(IndexError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(documents.len())
    }

    async fn list_ids(&self) -> Result<Vec<String>, IndexError> {
        let url = format!(
            "{}/api/v1/collections/{}/get",
            self.base_url, self.collection_id
        );
        let response = self
            .client
            .post(&url)
            .json(&GetRequest::default())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IndexError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        let parsed: GetResponse = response.json().await?;
        Ok(parsed.ids)
    }

    async fn delete_ids(&self, ids: Vec<String>) -> Result<(), IndexError> {
        let url = format!(
            "{}/api/v1/collections/{}/delete",
            self.base_url, self.collection_id
        );
        let response = self
            .client
            .post(&url)
            .json(&DeleteRequest { ids })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IndexError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(())
    }
}

const INCLUDE: [&str; 3] = ["documents", "metadatas", "distances"];

fn first_row<T>(rows: Option<Vec<Vec<T>>>) -> Vec<T> {
    rows.unwrap_or_default().into_iter().next().unwrap_or_default()
}

/// Pads the metadata row with `None` so a short or missing row never
/// truncates the document/distance zip.
fn pad_metadata(row: Vec<Option<RawMetadata>>) -> impl Iterator<Item = Option<Option<RawMetadata>>> {
    row.into_iter().map(Some).chain(std::iter::repeat_with(|| None))
}

/// Derive a stable point id from document content.
///
/// Takes the first 8 bytes of SHA-256 over `source`, `timestamp`, and the
/// document text, hex-encoded. The same document always lands on the same id.
#[must_use]
pub fn document_point_id(source: &str, timestamp: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(timestamp.as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash[..8].try_into().expect("SHA256 is at least 8 bytes");
    format!("{:016x}", u64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_point_id_is_stable() {
        let id1 = document_point_id("https://example.com", "2026-08-01", "NIFTY rose today.");
        let id2 = document_point_id("https://example.com", "2026-08-01", "NIFTY rose today.");
        assert_eq!(id1, id2, "same document must produce same point id");
    }

    #[test]
    fn different_documents_produce_different_ids() {
        let id1 = document_point_id("https://example.com/a", "2026-08-01", "text");
        let id2 = document_point_id("https://example.com/b", "2026-08-01", "text");
        assert_ne!(id1, id2);
    }

    #[test]
    fn document_point_id_is_16_hex_chars() {
        let id = document_point_id("s", "t", "x");
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
