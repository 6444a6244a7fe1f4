//! Keyword-overlap fact extraction.
//!
//! A "fact" is a sentence that shares at least one 4+-character keyword with
//! the question and is longer than 30 characters. No stemming, no scoring
//! model, just case-insensitive substring containment.

use std::collections::HashSet;

use regex::Regex;

/// Maximum number of facts surfaced per query.
const MAX_FACTS: usize = 5;

/// Maximum sentences taken from the first document when no fact matches.
const FALLBACK_SENTENCES: usize = 3;

/// Sentences at or below this length are never facts.
const MIN_SENTENCE_CHARS: usize = 30;

/// Result of fact extraction, distinguishing "nothing retrieved" from
/// "retrieved but nothing extractable".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactsOutcome {
    NoDocuments,
    NoFacts,
    Facts(Vec<String>),
}

impl FactsOutcome {
    #[must_use]
    pub fn facts(&self) -> &[String] {
        match self {
            Self::Facts(facts) => facts,
            Self::NoDocuments | Self::NoFacts => &[],
        }
    }
}

/// Split text into sentences at terminal punctuation followed by whitespace.
///
/// The punctuation mark stays with its sentence; the separating whitespace
/// run is consumed. Periods not followed by whitespace (decimals,
/// abbreviations mid-token) do not split.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(_, next)) = chars.peek() else {
            continue;
        };
        if !next.is_whitespace() {
            continue;
        }
        sentences.push(&text[start..i + c.len_utf8()]);
        // Consume the whitespace run; the next sentence starts after it.
        start = text.len();
        while let Some(&(j, w)) = chars.peek() {
            if w.is_whitespace() {
                chars.next();
            } else {
                start = j;
                break;
            }
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Tokenize a question into lowercase keywords of length >= 4.
#[must_use]
pub fn question_keywords(question: &str) -> Vec<String> {
    let re = Regex::new(r"\b\w{4,}\b").expect("valid keyword regex");
    let lower = question.to_lowercase();
    re.find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extract up to five question-relevant sentences from the documents.
///
/// A sentence qualifies when it contains at least one question keyword
/// (case-insensitive substring) and exceeds 30 characters. Facts are
/// deduplicated by exact text across all documents, first-seen order, and
/// capped at five. When nothing qualifies, the first three sentences of the
/// first document stand in, still subject to the length gate, so the
/// fallback can yield fewer than three, but never sentences from a second
/// document. Deterministic and idempotent for a fixed input pair.
#[must_use]
pub fn extract_facts(question: &str, documents: &[&str]) -> FactsOutcome {
    if documents.is_empty() {
        return FactsOutcome::NoDocuments;
    }

    let keywords = question_keywords(question);
    let mut seen = HashSet::new();
    let mut facts = Vec::new();

    for doc in documents {
        for sentence in split_sentences(doc.trim()) {
            let lower = sentence.to_lowercase();
            let matched = keywords.iter().any(|kw| lower.contains(kw.as_str()));
            if matched && sentence.chars().count() > MIN_SENTENCE_CHARS {
                let fact = sentence.trim();
                if seen.insert(fact.to_string()) {
                    facts.push(fact.to_string());
                }
            }
        }
    }
    facts.truncate(MAX_FACTS);

    if facts.is_empty() {
        facts = split_sentences(documents[0].trim())
            .into_iter()
            .take(FALLBACK_SENTENCES)
            .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
            .map(|s| s.trim().to_string())
            .collect();
    }

    if facts.is_empty() {
        FactsOutcome::NoFacts
    } else {
        FactsOutcome::Facts(facts)
    }
}
