//! Fetch command - aggregate the stream and apply display filters

use anyhow::Result;
use devpulse_domain::model::{Category, Source};
use devpulse_domain::ports::{Clock, SystemClock, UserStateStore};
use devpulse_domain::usecases::filters;
use std::path::PathBuf;

use crate::args::FetchArgs;
use crate::commands::{build_aggregator, open_store, print_articles};
use crate::config::AppConfig;

pub async fn execute(args: FetchArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    // Validate filters before any network work
    let source_filter: Option<Source> = args
        .source
        .as_deref()
        .map(|s| s.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;
    let category_filter: Option<Category> = args
        .category
        .as_deref()
        .map(|c| c.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;

    let aggregator = build_aggregator(&config)?;
    let mut articles = aggregator.aggregate_all().await;

    if let Some(source) = source_filter {
        articles = filters::by_source(articles, source);
    }
    if let Some(category) = category_filter {
        articles = filters::by_category(articles, category);
    }
    if let Some(search) = &args.search {
        articles = filters::by_search(articles, search);
    }
    articles.truncate(args.limit);

    // Every fetch counts as a daily visit for the streak
    let store = open_store(&config).await?;
    let mut streak = store.streak().await?;
    if streak.record_visit(SystemClock.now().date()) {
        store.put_streak(&streak).await?;
        tracing::info!(
            current = streak.current_streak,
            longest = streak.longest_streak,
            "Recorded daily visit"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
    } else {
        print_articles(&articles);
    }

    Ok(())
}
