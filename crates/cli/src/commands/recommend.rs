//! Recommend command - rank unread articles against reading history

use anyhow::Result;
use devpulse_domain::ports::{Clock, SystemClock, UserStateStore};
use devpulse_domain::usecases::recommend;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::args::RecommendArgs;
use crate::commands::{build_aggregator, open_store, print_recommendations};
use crate::config::AppConfig;

pub async fn execute(args: RecommendArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let aggregator = build_aggregator(&config)?;
    let articles = aggregator.aggregate_all().await;

    let store = open_store(&config).await?;
    let read_ids: HashSet<String> = store
        .read_history()
        .await?
        .into_iter()
        .map(|entry| entry.article_id)
        .collect();
    let bookmark_ids = store.bookmark_ids().await?;

    let recommendations = recommend::personalized(
        &articles,
        &read_ids,
        &bookmark_ids,
        args.limit,
        SystemClock.now(),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_recommendations(&recommendations);
    }

    Ok(())
}
