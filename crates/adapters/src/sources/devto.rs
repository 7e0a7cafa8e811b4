//! Dev.to articles API adapter

use async_trait::async_trait;
use devpulse_domain::categorize::Categorizer;
use devpulse_domain::model::{Article, Source};
use devpulse_domain::ports::{ArticleSource, SourceError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::parse_timestamp;

/// Top articles from the past week via the public Dev.to API
pub struct DevtoSource {
    client: Client,
    base_url: String,
    categorizer: Categorizer,
}

impl DevtoSource {
    pub fn new(categorizer: Categorizer) -> Self {
        Self::with_base_url(categorizer, "https://dev.to".to_string())
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
}

#[derive(Deserialize)]
struct DevtoArticle {
    id: u64,
    title: String,
    description: Option<String>,
    url: String,
    published_at: String,
    cover_image: Option<String>,
    tag_list: Vec<String>,
    user: DevtoUser,
}

#[derive(Deserialize)]
struct DevtoUser {
    name: String,
}

#[async_trait]
impl ArticleSource for DevtoSource {
    fn source(&self) -> Source {
        Source::Devto
    }

    async fn fetch(&self) -> Result<Vec<Article>, SourceError> {
        let url = format!("{}/api/articles?per_page=20&top=7", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "Dev.to returned {}",
                response.status()
            )));
        }

        let articles: Vec<DevtoArticle> = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        let articles = articles
            .into_iter()
            .map(|article| {
                let description = article
                    .description
                    .unwrap_or_else(|| "No description available".to_string());
                let category =
                    self.categorizer
                        .categorize(&article.tag_list, &article.title, &description);

                Article {
                    id: Article::make_id(Source::Devto, &article.id.to_string()),
                    title: article.title,
                    description,
                    url: article.url,
                    source: Source::Devto,
                    category,
                    published_at: parse_timestamp(&article.published_at),
                    author: Some(article.user.name),
                    image_url: article.cover_image,
                    tags: article.tag_list,
                }
            })
            .collect();

        Ok(articles)
    }
}
