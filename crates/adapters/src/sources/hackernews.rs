//! Hacker News Firebase API adapter
//!
//! Two-stage fetch: the top-story id list, then a bounded concurrent fan-out
//! over individual items. A failed or linkless item drops out silently; the
//! story list request is the only hard failure point.

use async_trait::async_trait;
use devpulse_domain::categorize::Categorizer;
use devpulse_domain::model::{Article, Source};
use devpulse_domain::ports::{ArticleSource, SourceError};
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::from_unix_or_now;

/// Top stories considered per fetch
const STORY_LIMIT: usize = 20;

pub struct HackerNewsSource {
    client: Client,
    base_url: String,
    categorizer: Categorizer,
}

impl HackerNewsSource {
    pub fn new(categorizer: Categorizer) -> Self {
        Self::with_base_url(categorizer, "https://hacker-news.firebaseio.com".to_string())
    }

    pub fn with_base_url(categorizer: Categorizer, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            categorizer,
        }
    }

    async fn fetch_item(&self, id: u64) -> Option<HackerNewsItem> {
        let url = format!("{}/v0/item/{}.json", self.base_url, id);

        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(id, status = %response.status(), "Skipping story");
                return None;
            }
            Err(error) => {
                tracing::warn!(id, error = %error, "Skipping story");
                return None;
            }
        };

        match response.json::<Option<HackerNewsItem>>().await {
            Ok(item) => item,
            Err(error) => {
                tracing::warn!(id, error = %error, "Skipping undecodable story");
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct HackerNewsItem {
    id: u64,
    title: String,
    url: Option<String>,
    by: String,
    score: i64,
    time: i64,
    descendants: Option<i64>,
}

#[async_trait]
impl ArticleSource for HackerNewsSource {
    fn source(&self) -> Source {
        Source::HackerNews
    }

    async fn fetch(&self) -> Result<Vec<Article>, SourceError> {
        let url = format!("{}/v0/topstories.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "Hacker News returned {}",
                response.status()
            )));
        }

        let story_ids: Vec<u64> = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        let fetches = story_ids
            .into_iter()
            .take(STORY_LIMIT)
            .map(|id| self.fetch_item(id));
        let items = join_all(fetches).await;

        let articles = items
            .into_iter()
            .flatten()
            // Ask HN and similar text posts carry no external link
            .filter_map(|item| {
                let url = item.url?;
                let category = self.categorizer.categorize(&[], &item.title, "");
                let description = format!(
                    "{} points by {} | {} comments",
                    item.score,
                    item.by,
                    item.descendants.unwrap_or(0)
                );

                Some(Article {
                    id: Article::make_id(Source::HackerNews, &item.id.to_string()),
                    title: item.title,
                    description,
                    url,
                    source: Source::HackerNews,
                    category,
                    published_at: from_unix_or_now(item.time),
                    author: Some(item.by),
                    image_url: None,
                    tags: vec![],
                })
            })
            .collect();

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer) -> HackerNewsSource {
        HackerNewsSource::with_base_url(Categorizer::default(), server.uri())
    }

    fn story(id: u64, title: &str, url: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "url": url,
            "by": "commenter",
            "score": 120,
            "time": 1705320000,
            "descendants": 45
        })
    }

    #[tokio::test]
    async fn test_fetch_maps_stories() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/topstories.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/item/1.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(story(
                1,
                "Rust 1.80 released",
                Some("https://blog.rust-lang.org/1.80"),
            )))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/item/2.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(story(
                2,
                "Show HN: my tool",
                Some("https://example.com/tool"),
            )))
            .mount(&mock_server)
            .await;

        let articles = source_for(&mock_server).fetch().await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, "hackernews-1");
        assert_eq!(articles[0].description, "120 points by commenter | 45 comments");
        assert_eq!(articles[0].published_at.unix_timestamp(), 1705320000);
    }

    #[tokio::test]
    async fn test_linkless_and_failed_items_drop_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/topstories.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2, 3])))
            .mount(&mock_server)
            .await;
        // item 1 is a text post without an external url
        Mock::given(method("GET"))
            .and(path("/v0/item/1.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(story(1, "Ask HN: question", None)),
            )
            .mount(&mock_server)
            .await;
        // item 2 errors out
        Mock::given(method("GET"))
            .and(path("/v0/item/2.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/item/3.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(story(
                3,
                "A real link",
                Some("https://example.com/article"),
            )))
            .mount(&mock_server)
            .await;

        let articles = source_for(&mock_server).fetch().await.unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "hackernews-3");
    }

    #[tokio::test]
    async fn test_story_list_failure_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/topstories.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let result = source_for(&mock_server).fetch().await;
        assert!(matches!(result, Err(SourceError::Api(_))));
    }
}
