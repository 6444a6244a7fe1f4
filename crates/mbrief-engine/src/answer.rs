//! Templated answer composition.
//!
//! Pure functions of their inputs. Sources and monetary figures are
//! deduplicated in first-seen order, so identical inputs always render
//! identical output.

use std::collections::HashSet;
use std::fmt::Write as _;

use regex::Regex;

use crate::facts::FactsOutcome;
use crate::stats::sma;

/// Monetary figures collected per document for the long report.
const FIGURES_PER_DOCUMENT: usize = 4;

/// Monetary figures rendered in the long report.
const FIGURES_SHOWN: usize = 6;

/// Window for the moving average shown in the long report.
const SMA_WINDOW: usize = 3;

/// Compose the short bulleted answer.
///
/// - No documents retrieved: a fixed apology sentence.
/// - Documents retrieved but no facts extracted: a distinct message asking
///   for a rephrase.
/// - Otherwise one bullet per fact, then a source attribution block when any
///   source is known.
#[must_use]
pub fn compose_answer(facts: &FactsOutcome, sources: &[String]) -> String {
    let facts = match facts {
        FactsOutcome::NoDocuments => {
            return "Sorry, I could not find relevant information to answer your question."
                .to_string();
        }
        FactsOutcome::NoFacts => {
            return "I found some relevant documents but could not extract specific facts. \
                    Please try rephrasing your question."
                .to_string();
        }
        FactsOutcome::Facts(facts) => facts,
    };

    let mut answer = facts
        .iter()
        .map(|fact| format!("• {fact}"))
        .collect::<Vec<_>>()
        .join("\n");

    let unique_sources = dedup_first_seen(sources);
    if !unique_sources.is_empty() {
        let _ = write!(answer, "\n\n**Sources:** {}", unique_sources.join(", "));
    }
    answer
}

/// Scan a document for monetary figures: rupee and USD amounts, percentages,
/// and numbers qualified by Indian or western scale words.
#[must_use]
pub fn extract_monetary_figures(text: &str) -> Vec<String> {
    let re = Regex::new(
        r"Rs\s?[\d,]+(?:\.\d+)?|USD\s?[\d.]+\s?billion|[\d,]+(?:\.\d+)?%|[\d,]+(?:\.\d+)?\s(?:crore|lakh|million|billion)",
    )
    .expect("valid monetary figure regex");
    re.find_iter(text)
        .take(FIGURES_PER_DOCUMENT)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Compose the long structured report shown in the terminal flow.
///
/// Includes the extracted facts, up to six deduplicated monetary figures, the
/// deduplicated source list, a moving average of the pooled numbers when the
/// pool is large enough, and a document-count summary.
#[must_use]
pub fn compose_report(
    question: &str,
    facts: &FactsOutcome,
    sources: &[String],
    figures: &[String],
    pooled: &[f64],
    doc_count: usize,
) -> String {
    let facts_text = match facts.facts() {
        [] => "No specific facts extracted.".to_string(),
        facts => facts.join("\n• "),
    };

    let unique_figures = dedup_first_seen(figures);
    let figures_text = if unique_figures.is_empty() {
        "See facts above".to_string()
    } else {
        unique_figures
            .iter()
            .take(FIGURES_SHOWN)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    let unique_sources = dedup_first_seen(sources);
    let sources_text = if unique_sources.is_empty() {
        "Market News Data".to_string()
    } else {
        unique_sources.join("\n  - ")
    };

    let sma_line = sma(pooled, SMA_WINDOW)
        .map(|value| format!("\n  {SMA_WINDOW}-period SMA of pooled figures: {value}"))
        .unwrap_or_default();

    format!(
        "\n===================================================\n\
         \x20 Market News Answer\n\
         ===================================================\n\
         \n\
         Question: {question}\n\
         \n\
         ---------------------------------------------------\n\
         Key Facts From Retrieved Documents:\n\
         ---------------------------------------------------\n\
         • {facts_text}\n\
         \n\
         ---------------------------------------------------\n\
         Key Numbers & Prices Mentioned:\n\
         ---------------------------------------------------\n\
         \x20 {figures_text}{sma_line}\n\
         \n\
         ---------------------------------------------------\n\
         Sources Used:\n\
         ---------------------------------------------------\n\
         \x20 - {sources_text}\n\
         \n\
         ---------------------------------------------------\n\
         Summary:\n\
         ---------------------------------------------------\n\
         Based on the retrieved market data, the question \"{question}\"\n\
         relates to the above facts. The information is sourced from\n\
         {doc_count} relevant document(s) in the knowledge base.\n\
         ===================================================\n"
    )
}

/// Deduplicate preserving first-seen order.
fn dedup_first_seen(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}
