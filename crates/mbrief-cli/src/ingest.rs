//! Collection run: fetch sources, clean, persist, embed, rebuild the index.

use mbrief_collector::corpus::{
    collect, preprocess, save_json, to_documents, PROCESSED_CORPUS_FILE, RAW_CORPUS_FILE,
};
use mbrief_collector::PageFetcher;
use mbrief_core::AppConfig;
use mbrief_engine::SearchContext;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let fetcher = PageFetcher::new(config.http_timeout_secs, &config.user_agent)?;
    let entries = collect(&fetcher, &config.sources).await;
    if entries.is_empty() {
        anyhow::bail!("no source pages could be collected");
    }

    save_json(&config.corpus_dir.join(RAW_CORPUS_FILE), &entries)?;
    let processed = preprocess(&entries);
    save_json(&config.corpus_dir.join(PROCESSED_CORPUS_FILE), &processed)?;

    let documents = to_documents(&processed);
    let ctx = SearchContext::from_config(config).await?;
    let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
    let embeddings = ctx.tei.embed(&texts).await?;
    let added = ctx.index.rebuild(&documents, &embeddings).await?;

    tracing::info!(documents = added, sources = entries.len(), "vector index rebuilt");
    println!(
        "Indexed {added} document(s) from {} source(s) into '{}'.",
        entries.len(),
        config.index_collection
    );
    Ok(())
}
