//! Retrieval-and-ranking core for the mbrief market-news service.
//!
//! Turns a free-text question into a distance-filtered, relevance-scored
//! set of documents, then layers deterministic post-processing on top:
//! keyword-overlap fact extraction, numeric pooling with summary statistics
//! and risk/trend classification, and templated answer composition.

pub mod answer;
pub mod engine;
pub mod facts;
pub mod retrieval;
pub mod stats;

mod error;
mod types;

pub use engine::{handle_ask, handle_query, SearchContext};
pub use error::EngineError;
pub use facts::FactsOutcome;
pub use retrieval::RetrievalOutcome;
pub use stats::{DocumentAnalysis, MarketStats, RiskTier, Signal, Trend};
pub use types::{AnalysisBlock, QueryRequest, QueryResponse, QueryResult};
