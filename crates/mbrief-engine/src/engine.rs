//! Query orchestration: validation, retrieval, post-processing, assembly.

use mbrief_core::AppConfig;
use mbrief_index::{ChromaClient, IndexError, ScoredDocument, TeiClient};

use crate::answer::{compose_answer, compose_report, extract_monetary_figures};
use crate::error::EngineError;
use crate::facts::extract_facts;
use crate::retrieval::{relevance_pct, retrieve};
use crate::stats::{analyze_documents, extract_numbers};
use crate::types::{AnalysisBlock, QueryRequest, QueryResponse, QueryResult};

/// Questions shorter than this (trimmed) are rejected.
pub const MIN_QUERY_CHARS: usize = 3;

/// Questions longer than this are rejected.
pub const MAX_QUERY_CHARS: usize = 500;

/// Document text shown per result is cut to this many chars.
const CONTENT_PREVIEW_CHARS: usize = 500;

/// Source attribution used when a stored document carries none.
const DEFAULT_SOURCE: &str = "Market News Data";

/// The shared collaborators of the query pipeline.
///
/// Constructed once at process start and passed by reference to every
/// operation; there is no module-level state. Queries are read-only, so one
/// context serves concurrent requests without locking.
pub struct SearchContext {
    pub tei: TeiClient,
    pub index: ChromaClient,
    /// Result count used when a request does not carry one.
    pub default_results: usize,
}

impl SearchContext {
    /// Build the context from configuration, resolving the index collection.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if either HTTP client cannot be built or the
    /// collection cannot be resolved.
    pub async fn from_config(config: &AppConfig) -> Result<Self, IndexError> {
        let tei = TeiClient::new(
            &config.tei_url,
            config.http_timeout_secs,
            &config.user_agent,
        )?;
        let index = ChromaClient::connect(
            &config.index_url,
            &config.index_collection,
            config.http_timeout_secs,
            &config.user_agent,
        )
        .await?;
        Ok(Self {
            tei,
            index,
            default_results: config.default_results,
        })
    }
}

/// Reject questions outside the 3–500 character window.
///
/// The minimum applies to the trimmed question, the maximum to the raw
/// length. Runs before any retrieval attempt.
///
/// # Errors
///
/// Returns [`EngineError::InvalidQuery`] with a caller-facing message.
pub fn validate_question(query: &str) -> Result<(), EngineError> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        return Err(EngineError::InvalidQuery(format!(
            "query must be at least {MIN_QUERY_CHARS} characters long"
        )));
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(EngineError::InvalidQuery(format!(
            "query is too long (max {MAX_QUERY_CHARS} chars)"
        )));
    }
    Ok(())
}

/// Run the full query pipeline and assemble the boundary response.
///
/// Zero documents after filtering is a valid outcome, returned as a
/// well-formed no-results response with `doc_count == 0`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidQuery`] for malformed questions and
/// [`EngineError::Retrieval`] when both lookup paths fail.
pub async fn handle_query(
    ctx: &SearchContext,
    request: &QueryRequest,
) -> Result<QueryResponse, EngineError> {
    validate_question(&request.query)?;
    let n_results = request.n_results.unwrap_or(ctx.default_results);

    let outcome = retrieve(ctx, &request.query, n_results).await?;
    if outcome.used_fallback() {
        tracing::info!(question = %request.query, "retrieval served via embedding fallback");
    }
    let matches = outcome.into_matches();

    if matches.is_empty() {
        tracing::debug!(question = %request.query, "no sufficiently relevant documents");
        return Ok(no_results_response(&request.query));
    }

    let documents: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
    let facts = extract_facts(&request.query, &documents);
    let sources = known_sources(&matches);
    let answer = compose_answer(&facts, &sources);
    let analysis = AnalysisBlock::from(analyze_documents(&documents));

    let results = matches
        .iter()
        .map(|m| QueryResult {
            content: preview(&m.text),
            source: m
                .source
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            date: m
                .timestamp
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            relevance: relevance_pct(m.distance),
        })
        .collect();

    Ok(QueryResponse {
        question: request.query.clone(),
        answer,
        results,
        analysis,
        doc_count: matches.len(),
    })
}

/// One-shot question flow for the terminal: retrieve, then render the long
/// structured report instead of the boundary response.
///
/// # Errors
///
/// Same failure modes as [`handle_query`].
pub async fn handle_ask(
    ctx: &SearchContext,
    question: &str,
    n_results: Option<usize>,
) -> Result<String, EngineError> {
    validate_question(question)?;
    let n_results = n_results.unwrap_or(ctx.default_results);

    let matches = retrieve(ctx, question, n_results).await?.into_matches();
    if matches.is_empty() {
        return Ok("No relevant data found for this query.".to_string());
    }

    let documents: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
    let facts = extract_facts(question, &documents);
    let figures: Vec<String> = documents
        .iter()
        .flat_map(|d| extract_monetary_figures(d))
        .collect();
    let pooled: Vec<f64> = documents.iter().flat_map(|d| extract_numbers(d)).collect();
    let sources = known_sources(&matches);

    Ok(compose_report(
        question,
        &facts,
        &sources,
        &figures,
        &pooled,
        matches.len(),
    ))
}

fn no_results_response(question: &str) -> QueryResponse {
    QueryResponse {
        question: question.to_string(),
        answer: "No relevant documents found for your query. \
                 Try different keywords related to recent market news."
            .to_string(),
        results: Vec::new(),
        analysis: AnalysisBlock::no_data("No data available"),
        doc_count: 0,
    }
}

fn known_sources(matches: &[ScoredDocument]) -> Vec<String> {
    matches
        .iter()
        .filter_map(|m| m.source.clone())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Truncate to the preview length in characters, then trim.
fn preview(text: &str) -> String {
    match text.char_indices().nth(CONTENT_PREVIEW_CHARS) {
        Some((idx, _)) => text[..idx].trim().to_string(),
        None => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_char_query_is_rejected() {
        let result = validate_question("hi");
        assert!(
            matches!(result, Err(EngineError::InvalidQuery(ref msg)) if msg.contains("at least")),
            "expected too-short rejection, got: {result:?}"
        );
    }

    #[test]
    fn whitespace_padding_does_not_satisfy_minimum() {
        assert!(validate_question("  a  ").is_err());
    }

    #[test]
    fn overlong_query_is_rejected() {
        let long = "x".repeat(501);
        let result = validate_question(&long);
        assert!(
            matches!(result, Err(EngineError::InvalidQuery(ref msg)) if msg.contains("too long")),
            "expected too-long rejection, got: {result:?}"
        );
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        assert!(validate_question("abc").is_ok());
        assert!(validate_question(&"x".repeat(500)).is_ok());
    }

    #[test]
    fn preview_truncates_long_documents() {
        let text = "a".repeat(600);
        assert_eq!(preview(&text).len(), 500);
    }

    #[test]
    fn preview_trims_short_documents() {
        assert_eq!(preview("  hello  "), "hello");
    }

    #[test]
    fn no_results_response_is_well_formed() {
        let response = no_results_response("market trend");
        assert_eq!(response.doc_count, 0);
        assert!(response.results.is_empty());
        assert_eq!(response.analysis.status.as_deref(), Some("No data available"));
        assert!(response.answer.contains("No relevant documents"));
    }
}
