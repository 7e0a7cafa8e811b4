//! Trending command - topic frequencies across the current stream

use anyhow::Result;
use devpulse_domain::usecases::trending::{topic_font_size, trending_topics};
use std::path::PathBuf;

use crate::args::TrendingArgs;
use crate::commands::build_aggregator;
use crate::config::AppConfig;

pub async fn execute(args: TrendingArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let aggregator = build_aggregator(&config)?;
    let articles = aggregator.aggregate_all().await;

    let topics = trending_topics(&articles, args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&topics)?);
        return Ok(());
    }

    if topics.is_empty() {
        println!("No trending topics.");
        return Ok(());
    }

    let min = topics.iter().map(|t| t.count).min().unwrap_or(0);
    let max = topics.iter().map(|t| t.count).max().unwrap_or(0);

    for topic in &topics {
        let size = topic_font_size(topic.count, min, max);
        let category = topic
            .category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:>4}  {:.2}rem  [{}]",
            topic.topic, topic.count, size, category
        );
    }

    Ok(())
}
