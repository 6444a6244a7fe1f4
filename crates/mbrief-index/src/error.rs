use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("embedder returned {got} vectors for {expected} inputs")]
    EmbeddingCount { expected: usize, got: usize },

    #[error("collection error: {0}")]
    Collection(String),
}
