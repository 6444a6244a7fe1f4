use serde::{Deserialize, Serialize};

use crate::stats::{DocumentAnalysis, RiskTier, Signal, Trend};

/// An incoming question at the service boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Requested result count; falls back to the configured default.
    #[serde(default)]
    pub n_results: Option<usize>,
}

/// One retrieved document as presented to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// Document text, truncated to a 500-char preview.
    pub content: String,
    pub source: String,
    pub date: String,
    /// Bounded relevance percentage derived from the index distance.
    pub relevance: f64,
}

/// Statistical analysis as serialized at the boundary.
///
/// Either the numeric fields and labels are present, or `status` carries the
/// no-data sentinel, never both.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trading_signal: Option<Signal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl AnalysisBlock {
    /// Build the sentinel variant carrying only a status message.
    #[must_use]
    pub fn no_data(status: impl Into<String>) -> Self {
        Self {
            mean_price: None,
            max_price: None,
            min_price: None,
            volatility: None,
            risk_level: None,
            trend: None,
            trading_signal: None,
            status: Some(status.into()),
        }
    }
}

impl From<DocumentAnalysis> for AnalysisBlock {
    fn from(analysis: DocumentAnalysis) -> Self {
        match analysis {
            DocumentAnalysis::NoNumericData => Self::no_data(crate::stats::NO_NUMERIC_DATA_STATUS),
            DocumentAnalysis::Stats(stats) => Self {
                mean_price: Some(stats.mean),
                max_price: Some(stats.max),
                min_price: Some(stats.min),
                volatility: Some(stats.volatility),
                risk_level: Some(stats.risk),
                trend: Some(stats.trend),
                trading_signal: Some(stats.signal),
                status: None,
            },
        }
    }
}

/// The full per-query response. Constructed fresh per request, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub question: String,
    pub answer: String,
    pub results: Vec<QueryResult>,
    pub analysis: AnalysisBlock,
    pub doc_count: usize,
}
