//! GitHub trending adapter via the repository search API
//!
//! "Trending" here means repositories created in the last week, ordered by
//! stars. Repos categorized as Web Dev are remapped to Open Source: the
//! classifier keys on framework names, but a repo is a project, not an
//! article about one.

use async_trait::async_trait;
use devpulse_domain::categorize::Categorizer;
use devpulse_domain::model::{Article, Category, Source};
use devpulse_domain::ports::{ArticleSource, SourceError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::format_description;

use super::parse_timestamp;

pub struct GithubTrendingSource {
    client: Client,
    base_url: String,
    categorizer: Categorizer,
}

impl GithubTrendingSource {
    pub fn new(categorizer: Categorizer) -> Self {
        Self::with_base_url(categorizer, "https://api.github.com".to_string())
    }

    pub fn with_base_url(categorizer: Categorizer, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("devpulse/0.1")
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
struct SearchResponse {
    #[serde(default)]
    items: Vec<Repository>,
}

#[derive(Deserialize)]
struct Repository {
    id: u64,
    name: String,
    full_name: String,
    description: Option<String>,
    html_url: String,
    updated_at: String,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    owner: Owner,
}

#[derive(Deserialize)]
struct Owner {
    login: String,
}

#[async_trait]
impl ArticleSource for GithubTrendingSource {
    fn source(&self) -> Source {
        Source::Github
    }

    async fn fetch(&self) -> Result<Vec<Article>, SourceError> {
        let last_week = OffsetDateTime::now_utc() - Duration::from_secs(7 * 24 * 60 * 60);
        let date = last_week
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(|e| SourceError::Api(e.to_string()))?;

        let url = format!(
            "{}/search/repositories?q=created:>{}&sort=stars&order=desc&per_page=15",
            self.base_url, date
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "GitHub returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        let articles = body
            .items
            .into_iter()
            .map(|repo| {
                let mut tags = repo.topics;
                if let Some(language) = &repo.language {
                    tags.push(language.to_lowercase());
                }

                let description = repo
                    .description
                    .unwrap_or_else(|| "No description available".to_string());
                let category = match self.categorizer.categorize(&tags, &repo.name, &description) {
                    Category::WebDev => Category::OpenSource,
                    other => other,
                };

                Article {
                    id: Article::make_id(Source::Github, &repo.id.to_string()),
                    title: repo.full_name,
                    description,
                    url: repo.html_url,
                    source: Source::Github,
                    category,
                    published_at: parse_timestamp(&repo.updated_at),
                    author: Some(repo.owner.login),
                    image_url: None,
                    tags,
                }
            })
            .collect();

        Ok(articles)
    }
}
