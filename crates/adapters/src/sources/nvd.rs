//! NVD (NIST vulnerability database) adapter
//!
//! Fetches CVEs modified in the last week. Everything from this source is
//! Security by definition; the classifier is not consulted.

use async_trait::async_trait;
use devpulse_domain::model::{Article, Category, Source};
use devpulse_domain::ports::{ArticleSource, SourceError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::format_description;

use super::{parse_timestamp, truncate_chars};

/// CVEs kept per fetch; the API page is slightly larger
const CVE_LIMIT: usize = 15;

const DESCRIPTION_CHARS: usize = 200;

pub struct NvdSource {
    client: Client,
    base_url: String,
}

impl NvdSource {
    pub fn new() -> Self {
        Self::with_base_url("https://services.nvd.nist.gov".to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }
}

impl Default for NvdSource {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct CveResponse {
    #[serde(default)]
    vulnerabilities: Vec<Vulnerability>,
}

#[derive(Deserialize)]
struct Vulnerability {
    cve: Cve,
}

#[derive(Deserialize)]
struct Cve {
    id: String,
    published: String,
    #[serde(default)]
    descriptions: Vec<CveDescription>,
    metrics: Option<CveMetrics>,
    #[serde(default)]
    references: Vec<CveReference>,
}

#[derive(Deserialize)]
struct CveDescription {
    lang: String,
    value: String,
}

#[derive(Deserialize)]
struct CveMetrics {
    #[serde(rename = "cvssMetricV31", default)]
    cvss_v31: Vec<CvssMetric>,
}

#[derive(Deserialize)]
struct CvssMetric {
    #[serde(rename = "cvssData")]
    cvss_data: CvssData,
}

#[derive(Deserialize)]
struct CvssData {
    #[serde(rename = "baseScore")]
    base_score: f64,
}

#[derive(Deserialize)]
struct CveReference {
    url: String,
}

#[async_trait]
impl ArticleSource for NvdSource {
    fn source(&self) -> Source {
        Source::Nvd
    }

    async fn fetch(&self) -> Result<Vec<Article>, SourceError> {
        let date_format = format_description!("[year]-[month]-[day]");
        let now = OffsetDateTime::now_utc();
        let week_ago = now - Duration::from_secs(7 * 24 * 60 * 60);
        let start = week_ago
            .format(date_format)
            .map_err(|e| SourceError::Api(e.to_string()))?;
        let end = now
            .format(date_format)
            .map_err(|e| SourceError::Api(e.to_string()))?;

        let url = format!(
            "{}/rest/json/cves/2.0?lastModStartDate={}T00:00:00.000&lastModEndDate={}T23:59:59.999&resultsPerPage=20",
            self.base_url, start, end
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "NVD returned {}",
                response.status()
            )));
        }

        let body: CveResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        let articles = body
            .vulnerabilities
            .into_iter()
            .take(CVE_LIMIT)
            .map(|vuln| {
                let cve = vuln.cve;

                let description = cve
                    .descriptions
                    .iter()
                    .find(|d| d.lang == "en")
                    .map(|d| truncate_chars(&d.value, DESCRIPTION_CHARS))
                    .unwrap_or_else(|| "No description".to_string());

                let score = cve
                    .metrics
                    .as_ref()
                    .and_then(|m| m.cvss_v31.first())
                    .map(|m| m.cvss_data.base_score);

                let title = match score {
                    Some(score) => format!("{} - CVE Vulnerability (Score: {})", cve.id, score),
                    None => format!("{} - CVE Vulnerability", cve.id),
                };

                let url = cve
                    .references
                    .first()
                    .map(|r| r.url.clone())
                    .unwrap_or_else(|| format!("https://nvd.nist.gov/vuln/detail/{}", cve.id));

                Article {
                    id: Article::make_id(Source::Nvd, &cve.id),
                    title,
                    description,
                    url,
                    source: Source::Nvd,
                    category: Category::Security,
                    published_at: parse_timestamp(&cve.published),
                    author: Some("NVD/NIST".to_string()),
                    image_url: None,
                    tags: vec![
                        "cve".to_string(),
                        "vulnerability".to_string(),
                        "security".to_string(),
                    ],
                }
            })
            .collect();

        Ok(articles)
    }
}
