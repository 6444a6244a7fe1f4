/// A document prepared for indexing: rendered text plus its attribution.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub text: String,
    pub source: String,
    pub timestamp: String,
}

/// One k-NN match returned by the index.
///
/// `distance` comes from the index's similarity metric; lower is more
/// similar. Metadata fields are absent when the stored point carried none.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub text: String,
    pub source: Option<String>,
    pub timestamp: Option<String>,
    pub distance: f64,
}
