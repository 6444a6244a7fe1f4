//! HTTP clients for the two external collaborators of the retrieval pipeline:
//! the TEI embedding service and the Chroma vector index.
//!
//! Both are thin wrappers; embedding model internals and the index's storage
//! engine live on the other side of the wire. This crate only speaks their
//! REST contracts and maps failures to typed errors.

mod chroma;
mod error;
mod tei;
mod types;

pub use chroma::{document_point_id, ChromaClient};
pub use error::IndexError;
pub use tei::TeiClient;
pub use types::{IndexedDocument, ScoredDocument};
