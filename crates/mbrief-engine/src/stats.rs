//! Numeric pooling and the naive statistical market summary.
//!
//! "Volatility" here is the sample standard deviation of every numeric token
//! found in the retrieved documents, not a finance-standard measure. The
//! trend compares the last pooled number against the first in text-scan
//! order, which is an artifact of document concatenation rather than a time
//! series; both behaviors are part of the public contract.

use regex::Regex;
use serde::Serialize;

/// Status message for the no-numeric-data sentinel.
pub const NO_NUMERIC_DATA_STATUS: &str = "No numeric market data found.";

/// Volatility below this is low risk.
const RISK_LOW_CEILING: f64 = 20.0;

/// Volatility below this (and at or above the low ceiling) is medium risk.
const RISK_MEDIUM_CEILING: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
        }
    }
}

/// Summary statistics over the pooled numeric tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Sample standard deviation of the pool; 0.0 for a single value.
    pub volatility: f64,
    pub risk: RiskTier,
    pub trend: Trend,
    pub signal: Signal,
}

/// Analysis result: a no-data sentinel or the full statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentAnalysis {
    NoNumericData,
    Stats(MarketStats),
}

/// Pool every numeric token in `text`, in scan order.
///
/// Matches a generic decimal number with optional thousands separators and an
/// optional decimal part. Percentages, prices, years, and counts all land in
/// the same pool; callers wanting a narrower extraction (currency-only, say)
/// swap this function without touching the analysis.
#[must_use]
pub fn extract_numbers(text: &str) -> Vec<f64> {
    let re = Regex::new(r"\d+(?:,\d{3})*(?:\.\d+)?").expect("valid number regex");
    re.find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .collect()
}

/// Analyze the pooled numbers of the retrieved documents.
///
/// Pooling order is scan order within each document, documents in retrieval
/// order. Returns the sentinel when no token parses; otherwise mean, max,
/// min, and volatility rounded to two decimals, plus the derived risk tier,
/// trend, and trading signal.
#[must_use]
pub fn analyze_documents(documents: &[&str]) -> DocumentAnalysis {
    let pooled: Vec<f64> = documents.iter().flat_map(|d| extract_numbers(d)).collect();
    analyze_pool(&pooled)
}

/// Analyze an already-pooled number sequence. See [`analyze_documents`].
#[must_use]
pub fn analyze_pool(pooled: &[f64]) -> DocumentAnalysis {
    let (Some(&first), Some(&last)) = (pooled.first(), pooled.last()) else {
        return DocumentAnalysis::NoNumericData;
    };

    #[allow(clippy::cast_precision_loss)]
    let mean_raw = pooled.iter().sum::<f64>() / pooled.len() as f64;
    let max = pooled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = pooled.iter().copied().fold(f64::INFINITY, f64::min);

    let volatility = round2(sample_std_dev(pooled, mean_raw));
    let risk = if volatility < RISK_LOW_CEILING {
        RiskTier::Low
    } else if volatility < RISK_MEDIUM_CEILING {
        RiskTier::Medium
    } else {
        RiskTier::High
    };

    let trend = if last > first {
        Trend::Bullish
    } else {
        Trend::Bearish
    };
    let signal = match trend {
        Trend::Bullish => Signal::Buy,
        Trend::Bearish => Signal::Sell,
    };

    DocumentAnalysis::Stats(MarketStats {
        mean: round2(mean_raw),
        max: round2(max),
        min: round2(min),
        volatility,
        risk,
        trend,
        signal,
    })
}

/// Simple moving average over the first `window` values, or `None` when the
/// pool is too small.
#[must_use]
pub fn sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let avg = values[..window].iter().sum::<f64>() / window as f64;
    Some(round2(avg))
}

fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(analysis: DocumentAnalysis) -> MarketStats {
        match analysis {
            DocumentAnalysis::Stats(s) => s,
            DocumentAnalysis::NoNumericData => panic!("expected stats, got no-data sentinel"),
        }
    }

    #[test]
    fn numbers_pool_in_scan_order() {
        assert_eq!(
            extract_numbers("Rose 2% to 22150.35 on volume of 1,200,000"),
            vec![2.0, 22150.35, 1_200_000.0]
        );
    }

    #[test]
    fn thousands_separators_are_stripped() {
        assert_eq!(extract_numbers("worth 1,234.56 today"), vec![1234.56]);
    }

    #[test]
    fn digit_free_text_pools_nothing() {
        assert!(extract_numbers("no digits here at all").is_empty());
    }

    #[test]
    fn digit_free_documents_return_no_data_sentinel() {
        let analysis = analyze_documents(&["all words", "still no digits"]);
        assert_eq!(analysis, DocumentAnalysis::NoNumericData);
    }

    #[test]
    fn empty_document_set_returns_no_data_sentinel() {
        assert_eq!(analyze_documents(&[]), DocumentAnalysis::NoNumericData);
    }

    #[test]
    fn pooled_statistics_across_documents() {
        let s = stats(analyze_documents(&["Price 100", "Cost 200", "Value 150"]));
        assert!((s.mean - 150.0).abs() < f64::EPSILON);
        assert!((s.max - 200.0).abs() < f64::EPSILON);
        assert!((s.min - 100.0).abs() < f64::EPSILON);
        // Sample std dev of [100, 200, 150] = 50.0.
        assert!((s.volatility - 50.0).abs() < f64::EPSILON);
        assert_eq!(s.risk, RiskTier::High);
        // Pooling order is [100, 200, 150]: last 150 > first 100.
        assert_eq!(s.trend, Trend::Bullish);
        assert_eq!(s.signal, Signal::Buy);
    }

    #[test]
    fn single_number_has_zero_volatility_and_bearish_trend() {
        let s = stats(analyze_documents(&["flat at 100 points"]));
        assert!((s.volatility - 0.0).abs() < f64::EPSILON);
        assert_eq!(s.risk, RiskTier::Low);
        // last == first is not a gain.
        assert_eq!(s.trend, Trend::Bearish);
        assert_eq!(s.signal, Signal::Sell);
    }

    #[test]
    fn risk_tier_boundaries() {
        // Volatility just below 20: [100, 128] -> std dev ~19.8.
        let low = stats(analyze_pool(&[100.0, 128.0]));
        assert_eq!(low.risk, RiskTier::Low);

        // [100, 130] -> std dev ~21.2.
        let medium = stats(analyze_pool(&[100.0, 130.0]));
        assert_eq!(medium.risk, RiskTier::Medium);

        // [100, 200] -> std dev ~70.7.
        let high = stats(analyze_pool(&[100.0, 200.0]));
        assert_eq!(high.risk, RiskTier::High);
    }

    #[test]
    fn trend_is_order_sensitive() {
        let falling = stats(analyze_pool(&[200.0, 150.0, 100.0]));
        assert_eq!(falling.trend, Trend::Bearish);

        let rising = stats(analyze_pool(&[100.0, 150.0, 200.0]));
        assert_eq!(rising.trend, Trend::Bullish);
    }

    #[test]
    fn mean_rounds_to_two_decimals() {
        let s = stats(analyze_pool(&[1.0, 2.0, 2.0]));
        assert!((s.mean - 1.67).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_uses_leading_window() {
        assert_eq!(sma(&[100.0, 200.0, 300.0, 999.0], 3), Some(200.0));
    }

    #[test]
    fn sma_requires_enough_values() {
        assert_eq!(sma(&[100.0, 200.0], 3), None);
        assert_eq!(sma(&[], 3), None);
    }
}
