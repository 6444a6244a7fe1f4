//! Text and price normalization applied before indexing.

use regex::Regex;

/// Price-like tokens kept per source page.
const MAX_PRICE_TOKENS: usize = 10;

/// Normalize article text for embedding.
///
/// Lowercases, removes URLs, strips everything but letters and whitespace,
/// and collapses whitespace runs. Digits are dropped here on purpose; the
/// raw price tokens are carried separately by [`extract_price_tokens`].
#[must_use]
pub fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let url_re = Regex::new(r"http\S+|www\S+").expect("valid url regex");
    let no_urls = url_re.replace_all(&lower, "");
    let non_alpha_re = Regex::new(r"[^a-z\s]").expect("valid alpha regex");
    let alpha_only = non_alpha_re.replace_all(&no_urls, "");
    alpha_only.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Scan raw page text for up to ten price-like tokens, in scan order.
#[must_use]
pub fn extract_price_tokens(text: &str) -> Vec<String> {
    let re = Regex::new(r"\d+(?:,\d{3})*(?:\.\d+)?").expect("valid price regex");
    re.find_iter(text)
        .take(MAX_PRICE_TOKENS)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse collected price tokens into floats, dropping any that fail.
#[must_use]
pub fn clean_prices(tokens: &[String]) -> Vec<f64> {
    tokens
        .iter()
        .filter_map(|t| t.replace(',', "").parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_lowercases_and_strips_urls() {
        let cleaned = clean_text("Markets UP today, see https://example.com/report for more");
        assert_eq!(cleaned, "markets up today see for more");
    }

    #[test]
    fn clean_text_drops_digits_and_punctuation() {
        let cleaned = clean_text("NIFTY 50 rose 2% & banks led!");
        assert_eq!(cleaned, "nifty rose banks led");
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("a  lot   of\n\nspace"), "a lot of space");
    }

    #[test]
    fn price_tokens_keep_separators_and_cap_at_ten() {
        let tokens = extract_price_tokens("1,234.56 then 7 8 9 10 11 12 13 14 15 16");
        assert_eq!(tokens.len(), 10);
        assert_eq!(tokens[0], "1,234.56");
    }

    #[test]
    fn clean_prices_parses_and_drops_garbage() {
        let tokens = vec![
            "22,150.35".to_string(),
            "100".to_string(),
            "not-a-number".to_string(),
        ];
        assert_eq!(clean_prices(&tokens), vec![22150.35, 100.0]);
    }
}
