use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("corpus file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
