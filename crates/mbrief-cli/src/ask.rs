//! One-shot question flow printing the long structured report.

use mbrief_core::AppConfig;
use mbrief_engine::{handle_ask, SearchContext};

pub async fn run(
    config: &AppConfig,
    question: &str,
    results: Option<usize>,
) -> anyhow::Result<()> {
    let ctx = SearchContext::from_config(config).await?;
    let report = handle_ask(&ctx, question, results).await?;
    println!("{report}");
    Ok(())
}
