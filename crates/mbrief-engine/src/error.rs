use thiserror::Error;

use mbrief_index::IndexError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("retrieval failed: {source}")]
    Retrieval {
        #[source]
        source: IndexError,
    },
}
