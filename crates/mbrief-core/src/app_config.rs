use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL of the TEI embedding service.
    pub tei_url: String,
    /// Base URL of the vector index HTTP API.
    pub index_url: String,
    /// Collection holding the news corpus. Rebuilt wholesale on ingest.
    pub index_collection: String,
    /// Result count used when a query does not request one.
    pub default_results: usize,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Source page URLs scanned by the collector.
    pub sources: Vec<String>,
    pub corpus_dir: PathBuf,
}
