//! Corpus assembly, persistence, and document templating.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use mbrief_index::IndexedDocument;

use crate::clean::{clean_prices, clean_text, extract_price_tokens};
use crate::error::CollectorError;
use crate::extract::extract_paragraphs;
use crate::fetch::PageFetcher;

/// Raw corpus file name under the corpus directory.
pub const RAW_CORPUS_FILE: &str = "market_corpus.json";

/// Processed corpus file name under the corpus directory.
pub const PROCESSED_CORPUS_FILE: &str = "processed_market_corpus.json";

/// Raw page text kept per source.
const TEXT_LIMIT_CHARS: usize = 2000;

/// One scraped source page before cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub source: String,
    pub timestamp: String,
    pub text: String,
    pub prices_found: Vec<String>,
}

/// One source page after cleaning, ready for templating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedEntry {
    pub source: String,
    pub timestamp: String,
    pub clean_text: String,
    pub clean_prices: Vec<f64>,
}

/// Fetch every source page and assemble raw corpus entries.
///
/// Individual source failures are logged and skipped so one dead page never
/// sinks a collection run; an empty result simply produces an empty corpus.
pub async fn collect(fetcher: &PageFetcher, sources: &[String]) -> Vec<CorpusEntry> {
    let mut entries = Vec::with_capacity(sources.len());

    for url in sources {
        tracing::info!(url = %url, "fetching source page");
        let html = match fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "source fetch failed, skipping");
                continue;
            }
        };

        let text = truncate_chars(&extract_paragraphs(&html), TEXT_LIMIT_CHARS);
        let prices_found = extract_price_tokens(&text);
        entries.push(CorpusEntry {
            source: url.clone(),
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            text,
            prices_found,
        });
    }

    entries
}

/// Clean every raw entry.
#[must_use]
pub fn preprocess(entries: &[CorpusEntry]) -> Vec<ProcessedEntry> {
    entries
        .iter()
        .map(|entry| ProcessedEntry {
            source: entry.source.clone(),
            timestamp: entry.timestamp.clone(),
            clean_text: clean_text(&entry.text),
            clean_prices: clean_prices(&entry.prices_found),
        })
        .collect()
}

/// Render processed entries into index-ready documents.
///
/// Each document embeds its attribution and price readings in the text body
/// so retrieval surfaces them alongside the news copy.
#[must_use]
pub fn to_documents(entries: &[ProcessedEntry]) -> Vec<IndexedDocument> {
    entries
        .iter()
        .map(|entry| IndexedDocument {
            text: format!(
                "Market News Report\n\
                 Source: {}\n\
                 Date: {}\n\
                 Market News: {}\n\
                 Price Values: {:?}",
                entry.source, entry.timestamp, entry.clean_text, entry.clean_prices
            ),
            source: entry.source.clone(),
            timestamp: entry.timestamp.clone(),
        })
        .collect()
}

/// Persist a corpus stage as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CollectorError::Io`] or [`CollectorError::Json`] on failure.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CollectorError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

/// Load a previously persisted corpus stage.
///
/// # Errors
///
/// Returns [`CollectorError::Io`] or [`CollectorError::Json`] on failure.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CollectorError> {
    let file = fs::File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, prices: &[&str]) -> CorpusEntry {
        CorpusEntry {
            source: "https://example.com/markets".to_string(),
            timestamp: "2026-08-01 09:30:00".to_string(),
            text: text.to_string(),
            prices_found: prices.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn preprocess_cleans_text_and_prices() {
        let processed = preprocess(&[entry(
            "NIFTY 50 closed at 22,150.35 today!",
            &["22,150.35", "garbage"],
        )]);
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].clean_text, "nifty closed at today");
        assert_eq!(processed[0].clean_prices, vec![22150.35]);
    }

    #[test]
    fn documents_carry_template_and_attribution() {
        let processed = preprocess(&[entry("markets steady", &["100"])]);
        let documents = to_documents(&processed);
        assert_eq!(documents.len(), 1);
        let doc = &documents[0];
        assert!(doc.text.starts_with("Market News Report"));
        assert!(doc.text.contains("Source: https://example.com/markets"));
        assert!(doc.text.contains("Market News: markets steady"));
        assert!(doc.text.contains("Price Values: [100.0]"));
        assert_eq!(doc.source, "https://example.com/markets");
        assert_eq!(doc.timestamp, "2026-08-01 09:30:00");
    }

    #[test]
    fn truncate_chars_limits_long_text() {
        let long = "x".repeat(3000);
        assert_eq!(truncate_chars(&long, TEXT_LIMIT_CHARS).len(), 2000);
        assert_eq!(truncate_chars("short", TEXT_LIMIT_CHARS), "short");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = std::env::temp_dir().join("mbrief-corpus-test");
        let path = dir.join(RAW_CORPUS_FILE);
        let entries = vec![entry("markets steady", &["100"])];

        save_json(&path, &entries).expect("save");
        let loaded: Vec<CorpusEntry> = load_json(&path).expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].source, entries[0].source);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
