//! Corpus ingestion for the market-news index.
//!
//! Fetches configured source pages, harvests paragraph text from the HTML,
//! cleans it, and renders index-ready documents. Scraping here is
//! deliberately shallow: paragraph tags and a price-token scan, nothing
//! site-specific.

pub mod clean;
pub mod corpus;
pub mod extract;
pub mod fetch;

mod error;

pub use corpus::{CorpusEntry, ProcessedEntry};
pub use error::CollectorError;
pub use fetch::PageFetcher;
