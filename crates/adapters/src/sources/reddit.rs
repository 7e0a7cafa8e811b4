//! Reddit hot-posts adapter
//!
//! Fans out over a configurable subreddit list concurrently; a failing
//! subreddit only loses its own posts. Stickied posts (rules, weekly
//! threads) are skipped.

use async_trait::async_trait;
use devpulse_domain::categorize::Categorizer;
use devpulse_domain::model::{Article, Source};
use devpulse_domain::ports::{ArticleSource, SourceError};
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{from_unix_or_now, truncate_chars};

/// Posts requested per subreddit
const POSTS_PER_SUBREDDIT: usize = 10;

/// Total cap across all subreddits
const TOTAL_POST_LIMIT: usize = 30;

/// Self-text snippet length for descriptions
const DESCRIPTION_CHARS: usize = 200;

pub fn default_subreddits() -> Vec<String> {
    ["javascript", "reactjs", "programming", "webdev", "typescript"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub struct RedditSource {
    client: Client,
    base_url: String,
    subreddits: Vec<String>,
    categorizer: Categorizer,
}

impl RedditSource {
    pub fn new(subreddits: Vec<String>, categorizer: Categorizer) -> Self {
        Self::with_base_url(subreddits, categorizer, "https://www.reddit.com".to_string())
    }

    pub fn with_base_url(
        subreddits: Vec<String>,
        categorizer: Categorizer,
        base_url: String,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("devpulse/0.1")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            subreddits,
            categorizer,
        }
    }

    async fn fetch_subreddit(&self, subreddit: &str) -> Vec<Article> {
        let url = format!(
            "{}/r/{}/hot.json?limit={}",
            self.base_url, subreddit, POSTS_PER_SUBREDDIT
        );

        let listing: Listing = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => match response.json().await {
                Ok(listing) => listing,
                Err(error) => {
                    tracing::warn!(subreddit, error = %error, "Skipping undecodable subreddit");
                    return vec![];
                }
            },
            Ok(response) => {
                tracing::warn!(subreddit, status = %response.status(), "Skipping subreddit");
                return vec![];
            }
            Err(error) => {
                tracing::warn!(subreddit, error = %error, "Skipping subreddit");
                return vec![];
            }
        };

        listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .filter(|post| !post.stickied)
            .map(|post| {
                let subreddit_tag = vec![subreddit.to_string()];
                let category =
                    self.categorizer
                        .categorize(&subreddit_tag, &post.title, &post.selftext);

                let description = if post.selftext.is_empty() {
                    format!("Discussion in r/{}", post.subreddit)
                } else {
                    truncate_chars(&post.selftext, DESCRIPTION_CHARS)
                };

                // Self posts link back to the thread itself
                let url = if post.url.starts_with("http") {
                    post.url
                } else {
                    format!("https://reddit.com{}", post.permalink)
                };

                Article {
                    id: Article::make_id(Source::Reddit, &post.id),
                    title: post.title,
                    description,
                    url,
                    source: Source::Reddit,
                    category,
                    published_at: from_unix_or_now(post.created_utc as i64),
                    author: Some(post.author),
                    image_url: None,
                    tags: subreddit_tag,
                }
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Deserialize)]
struct ListingChild {
    data: RedditPost,
}

#[derive(Deserialize)]
struct RedditPost {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    url: String,
    permalink: String,
    author: String,
    subreddit: String,
    created_utc: f64,
    #[serde(default)]
    stickied: bool,
}

#[async_trait]
impl ArticleSource for RedditSource {
    fn source(&self) -> Source {
        Source::Reddit
    }

    async fn fetch(&self) -> Result<Vec<Article>, SourceError> {
        let fetches = self
            .subreddits
            .iter()
            .map(|subreddit| self.fetch_subreddit(subreddit));

        let mut articles: Vec<Article> = join_all(fetches).await.into_iter().flatten().collect();
        articles.truncate(TOTAL_POST_LIMIT);

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer, subreddits: &[&str]) -> RedditSource {
        RedditSource::with_base_url(
            subreddits.iter().map(|s| s.to_string()).collect(),
            Categorizer::default(),
            server.uri(),
        )
    }

    fn post(id: &str, title: &str, selftext: &str, stickied: bool) -> serde_json::Value {
        serde_json::json!({
            "data": {
                "id": id,
                "title": title,
                "selftext": selftext,
                "url": format!("/r/programming/comments/{}/thread/", id),
                "permalink": format!("/r/programming/comments/{}/thread/", id),
                "author": "redditor",
                "subreddit": "programming",
                "created_utc": 1705320000.0,
                "stickied": stickied
            }
        })
    }

    fn listing(posts: Vec<serde_json::Value>) -> serde_json::Value {
        serde_json::json!({"data": {"children": posts}})
    }

    #[tokio::test]
    async fn test_fetch_skips_stickied_and_builds_thread_urls() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/r/programming/hot.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![
                post("aaa", "Weekly thread", "", true),
                post("bbb", "How we scaled", "We moved to a queue-based design", false),
            ])))
            .mount(&mock_server)
            .await;

        let articles = source_for(&mock_server, &["programming"]).fetch().await.unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "reddit-bbb");
        assert_eq!(
            articles[0].url,
            "https://reddit.com/r/programming/comments/bbb/thread/"
        );
        assert_eq!(articles[0].tags, vec!["programming"]);
        assert_eq!(articles[0].description, "We moved to a queue-based design");
    }

    #[tokio::test]
    async fn test_empty_selftext_gets_placeholder_description() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/r/programming/hot.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(listing(vec![post("ccc", "A link post", "", false)])),
            )
            .mount(&mock_server)
            .await;

        let articles = source_for(&mock_server, &["programming"]).fetch().await.unwrap();
        assert_eq!(articles[0].description, "Discussion in r/programming");
    }

    #[tokio::test]
    async fn test_failed_subreddit_loses_only_its_posts() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/r/programming/hot.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(listing(vec![post("ddd", "Surviving post", "text", false)])),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/r/javascript/hot.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let articles = source_for(&mock_server, &["programming", "javascript"])
            .fetch()
            .await
            .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "reddit-ddd");
    }

    #[tokio::test]
    async fn test_long_selftext_truncated() {
        let mock_server = MockServer::start().await;

        let long_text = "x".repeat(500);
        Mock::given(method("GET"))
            .and(path("/r/programming/hot.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(listing(vec![post("eee", "Long post", &long_text, false)])),
            )
            .mount(&mock_server)
            .await;

        let articles = source_for(&mock_server, &["programming"]).fetch().await.unwrap();
        assert_eq!(articles[0].description.chars().count(), 200);
    }
}
