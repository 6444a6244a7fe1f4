//! Distance filtering and the two-step retrieval protocol.

use mbrief_index::ScoredDocument;

use crate::engine::SearchContext;
use crate::error::EngineError;

/// Matches at or beyond this distance are discarded as not relevant.
pub const DISTANCE_THRESHOLD: f64 = 1.8;

/// Convert an index distance into a user-facing relevance percentage.
///
/// `max(0, round((1 - d/2) * 100, 1))`: monotonically decreasing in
/// distance and clamped at zero. Values above 100 are possible only for a
/// negative distance, which a valid metric never produces.
#[must_use]
pub fn relevance_pct(distance: f64) -> f64 {
    let pct = (1.0 - distance / 2.0) * 100.0;
    ((pct * 10.0).round() / 10.0).max(0.0)
}

/// Drop matches whose distance fails the threshold, preserving the index's
/// own ascending-distance order. Never re-sorts.
#[must_use]
pub fn apply_distance_filter(matches: Vec<ScoredDocument>) -> Vec<ScoredDocument> {
    matches
        .into_iter()
        .filter(|m| m.distance < DISTANCE_THRESHOLD)
        .collect()
}

/// How a retrieval was served.
///
/// `Primary` is the text-native index lookup; `Fallback` means the primary
/// call failed and the query was re-run against a freshly embedded vector.
/// Both carry the already-filtered match set.
#[derive(Debug)]
pub enum RetrievalOutcome {
    Primary(Vec<ScoredDocument>),
    Fallback(Vec<ScoredDocument>),
}

impl RetrievalOutcome {
    #[must_use]
    pub fn matches(&self) -> &[ScoredDocument] {
        match self {
            Self::Primary(m) | Self::Fallback(m) => m,
        }
    }

    #[must_use]
    pub fn into_matches(self) -> Vec<ScoredDocument> {
        match self {
            Self::Primary(m) | Self::Fallback(m) => m,
        }
    }

    #[must_use]
    pub fn used_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Fetch up to `n_results` nearest neighbors for `question` and filter them.
///
/// Primary path: text-native index query. If that call fails for any reason,
/// one fallback runs: embed the question via TEI and query by raw vector.
/// This is a different lookup mode, not a retry of the same call. Both paths
/// failing surfaces [`EngineError::Retrieval`] carrying the fallback cause;
/// the primary failure is logged. Zero surviving matches is a valid outcome.
///
/// # Errors
///
/// Returns [`EngineError::Retrieval`] when the primary lookup and the
/// embedding fallback both fail.
pub async fn retrieve(
    ctx: &SearchContext,
    question: &str,
    n_results: usize,
) -> Result<RetrievalOutcome, EngineError> {
    match ctx.index.query_text(question, n_results).await {
        Ok(matches) => Ok(RetrievalOutcome::Primary(apply_distance_filter(matches))),
        Err(primary) => {
            tracing::warn!(
                error = %primary,
                "text-native lookup failed, retrying with raw embedding"
            );
            let embedding = ctx
                .tei
                .embed_one(question)
                .await
                .map_err(|source| EngineError::Retrieval { source })?;
            let matches = ctx
                .index
                .query_embedding(&embedding, n_results)
                .await
                .map_err(|source| EngineError::Retrieval { source })?;
            Ok(RetrievalOutcome::Fallback(apply_distance_filter(matches)))
        }
    }
}
