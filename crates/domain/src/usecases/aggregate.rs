//! Aggregation use case - concurrent multi-source fetch, merge, sort, dedup

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::model::Article;
use crate::ports::ArticleSource;

/// Default ceiling for a single source fetch. A hung provider must not hang
/// the whole cycle.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Runs every configured source concurrently and merges the results into one
/// deduplicated, recency-sorted stream.
pub struct Aggregator {
    sources: Vec<Arc<dyn ArticleSource>>,
    fetch_timeout: Duration,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn ArticleSource>>) -> Self {
        Self {
            sources,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Fetch from all sources and return the merged stream.
    ///
    /// All-settled semantics: every fetch runs to completion (or times out),
    /// and a failing source contributes zero articles. This never errors;
    /// total failure yields an empty vec.
    pub async fn aggregate_all(&self) -> Vec<Article> {
        let fetches = self.sources.iter().map(|source| {
            let timeout = self.fetch_timeout;
            async move {
                match tokio::time::timeout(timeout, source.fetch()).await {
                    Ok(Ok(articles)) => {
                        tracing::info!(
                            source = %source.source(),
                            count = articles.len(),
                            "Fetched articles"
                        );
                        articles
                    }
                    Ok(Err(error)) => {
                        tracing::warn!(source = %source.source(), error = %error, "Source failed");
                        Vec::new()
                    }
                    Err(_) => {
                        tracing::warn!(
                            source = %source.source(),
                            timeout_secs = timeout.as_secs(),
                            "Source timed out"
                        );
                        Vec::new()
                    }
                }
            }
        });

        let mut articles: Vec<Article> = join_all(fetches).await.into_iter().flatten().collect();

        tracing::info!(count = articles.len(), "Merged articles before dedup");

        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        let deduped = dedup_by_title(articles);

        tracing::info!(count = deduped.len(), "Articles after dedup");

        deduped
    }
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Collapse near-identical titles across sources into one representative
/// per cluster.
///
/// Input must already be sorted by recency; cluster order (and therefore
/// output order) follows it. Each incoming title is compared against every
/// existing cluster key by exact equality or substring containment in either
/// direction, a cheap O(n*k) heuristic for cross-source title variation
/// ("Company X raises $10M" vs "Startup Company X raises $10M in funding").
/// On a match the tie-break picks the representative: an article with an
/// image beats one without; otherwise the strictly longer description wins.
pub fn dedup_by_title(articles: Vec<Article>) -> Vec<Article> {
    let mut clusters: Vec<(String, Article)> = Vec::new();

    'next_article: for article in articles {
        let key = normalize_title(&article.title);

        for idx in 0..clusters.len() {
            let (existing_key, existing) = &clusters[idx];
            let matches = key == *existing_key
                || key.contains(existing_key.as_str())
                || existing_key.contains(key.as_str());

            if matches {
                let incoming_wins = match (existing.image_url.is_some(), article.image_url.is_some())
                {
                    (false, true) => true,
                    (true, false) => false,
                    _ => article.description.len() > existing.description.len(),
                };

                if incoming_wins {
                    clusters.remove(idx);
                    clusters.push((key, article));
                }
                continue 'next_article;
            }
        }

        clusters.push((key, article));
    }

    clusters.into_iter().map(|(_, article)| article).collect()
}
