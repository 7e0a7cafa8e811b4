//! Command implementations

pub mod collections;
pub mod config;
pub mod doctor;
pub mod fetch;
pub mod mark;
pub mod recommend;
pub mod similar;
pub mod trending;

use anyhow::Result;
use devpulse_adapters::sources::build_sources;
use devpulse_adapters::state::SqliteUserStateStore;
use devpulse_domain::categorize::Categorizer;
use devpulse_domain::model::{Article, Recommendation};
use devpulse_domain::usecases::aggregate::Aggregator;

use crate::config::AppConfig;

pub(crate) async fn open_store(config: &AppConfig) -> Result<SqliteUserStateStore> {
    Ok(SqliteUserStateStore::new(&config.general.state_db_path).await?)
}

pub(crate) fn build_aggregator(config: &AppConfig) -> Result<Aggregator> {
    let categorizer = Categorizer::new(config.default_category()?);
    let sources = build_sources(
        &config.sources.enabled_sources(),
        categorizer,
        config.sources.newsapi_key(),
        &config.sources.reddit_subreddits,
    );

    Ok(Aggregator::new(sources).with_fetch_timeout(config.fetch_timeout()))
}

pub(crate) fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles.");
        return;
    }

    for article in articles {
        println!(
            "{}  [{}] {} ({})",
            article.id,
            article.category,
            article.title,
            article.source.label()
        );
        println!("    {}", article.url);
    }
    println!();
    println!("{} article(s)", articles.len());
}

pub(crate) fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        println!("No recommendations.");
        return;
    }

    for rec in recommendations {
        println!(
            "{:>3}  {}  {} ({})",
            rec.score,
            rec.article.id,
            rec.article.title,
            rec.article.source.label()
        );
        if !rec.reasons.is_empty() {
            println!("     {}", rec.reasons.join("; "));
        }
    }
}
