//! Generic RSS/Atom feed adapter
//!
//! One parameterized adapter covers every blog-style source. Entry guids
//! vary wildly between feeds (urls, uuids, permalinks), so article ids use a
//! short digest of the guid: stable across fetches, uniform in shape.

use async_trait::async_trait;
use devpulse_domain::categorize::Categorizer;
use devpulse_domain::model::{Article, Source};
use devpulse_domain::ports::{ArticleSource, SourceError};
use reqwest::Client;
use std::time::Duration;
use time::OffsetDateTime;

use super::{from_unix_or_now, short_digest};

/// Entries kept per feed
const ENTRY_LIMIT: usize = 15;

pub struct RssFeedSource {
    client: Client,
    source: Source,
    feed_url: String,
    categorizer: Categorizer,
}

impl RssFeedSource {
    pub fn new(source: Source, feed_url: impl Into<String>, categorizer: Categorizer) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("devpulse/0.1")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            source,
            feed_url: feed_url.into(),
            categorizer,
        }
    }
}

#[async_trait]
impl ArticleSource for RssFeedSource {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(&self) -> Result<Vec<Article>, SourceError> {
        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "{} feed returned {}",
                self.source,
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let feed = feed_rs::parser::parse(&body[..])
            .map_err(|e| SourceError::Feed(e.to_string()))?;

        let feed_title = feed.title.map(|t| t.content);

        let articles = feed
            .entries
            .into_iter()
            .take(ENTRY_LIMIT)
            .map(|entry| {
                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "No title".to_string());

                let description = entry
                    .summary
                    .map(|t| t.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .unwrap_or_else(|| "No description".to_string());

                let url = entry
                    .links
                    .first()
                    .map(|link| link.href.clone())
                    .unwrap_or_else(|| self.feed_url.clone());

                let published_at = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| from_unix_or_now(dt.timestamp()))
                    .unwrap_or_else(OffsetDateTime::now_utc);

                let author = entry
                    .authors
                    .first()
                    .map(|person| person.name.clone())
                    .or_else(|| feed_title.clone())
                    .unwrap_or_else(|| self.source.label().to_string());

                let tags: Vec<String> = entry
                    .categories
                    .into_iter()
                    .map(|category| category.term)
                    .collect();

                let category = self.categorizer.categorize(&tags, &title, &description);

                Article {
                    id: Article::make_id(self.source, &short_digest(&entry.id)),
                    title,
                    description,
                    url,
                    source: self.source,
                    category,
                    published_at,
                    author: Some(author),
                    image_url: None,
                    tags,
                }
            })
            .collect();

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devpulse_domain::model::Category;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RSS_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example Engineering</title>
    <link>https://blog.example.com</link>
    <item>
      <guid>https://blog.example.com/posts/edge-caching</guid>
      <title>Caching at the edge</title>
      <description>How our CDN layer caches aggressively</description>
      <link>https://blog.example.com/posts/edge-caching</link>
      <pubDate>Mon, 15 Jan 2024 12:00:00 GMT</pubDate>
      <category>cloud</category>
    </item>
    <item>
      <guid>https://blog.example.com/posts/untitled</guid>
      <title>Second post</title>
      <description>More engineering notes</description>
      <link>https://blog.example.com/posts/second</link>
      <pubDate>Sun, 14 Jan 2024 09:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    async fn mount_feed(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("content-type", "application/rss+xml"),
            )
            .mount(server)
            .await;
    }

    fn source_for(server: &MockServer, source: Source) -> RssFeedSource {
        RssFeedSource::new(source, format!("{}/feed", server.uri()), Categorizer::default())
    }

    #[tokio::test]
    async fn test_fetch_maps_feed_entries() {
        let mock_server = MockServer::start().await;
        mount_feed(&mock_server, RSS_BODY).await;

        let articles = source_for(&mock_server, Source::Cloudflare).fetch().await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Caching at the edge");
        assert_eq!(articles[0].source, Source::Cloudflare);
        assert_eq!(articles[0].url, "https://blog.example.com/posts/edge-caching");
        // "cloud" keyword from the category tag
        assert_eq!(articles[0].category, Category::DevOps);
        assert_eq!(articles[0].tags, vec!["cloud"]);
        // no per-entry author, falls back to the feed title
        assert_eq!(articles[0].author.as_deref(), Some("Example Engineering"));
        assert!(articles[0].id.starts_with("cloudflare-"));
    }

    #[tokio::test]
    async fn test_ids_stable_across_fetches() {
        let mock_server = MockServer::start().await;
        mount_feed(&mock_server, RSS_BODY).await;

        let source = source_for(&mock_server, Source::Vercel);
        let first = source.fetch().await.unwrap();
        let second = source.fetch().await.unwrap();

        assert_eq!(first[0].id, second[0].id);
        assert_ne!(first[0].id, first[1].id);
    }

    #[tokio::test]
    async fn test_unparseable_feed_is_an_error() {
        let mock_server = MockServer::start().await;
        mount_feed(&mock_server, "this is not xml").await;

        let result = source_for(&mock_server, Source::Meta).fetch().await;
        assert!(matches!(result, Err(SourceError::Feed(_))));
    }

    #[tokio::test]
    async fn test_http_error_is_an_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = source_for(&mock_server, Source::Google).fetch().await;
        assert!(matches!(result, Err(SourceError::Api(_))));
    }
}
