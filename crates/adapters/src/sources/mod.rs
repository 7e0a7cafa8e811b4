//! Article source adapters, one per external provider

use std::sync::Arc;

use devpulse_domain::categorize::Categorizer;
use devpulse_domain::model::Source;
use devpulse_domain::ports::ArticleSource;
use secrecy::SecretString;
use sha2::{Digest, Sha256};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

pub mod devto;
pub mod github;
pub mod hackernews;
pub mod newsapi;
pub mod nvd;
pub mod reddit;
pub mod rss;

pub use devto::DevtoSource;
pub use github::GithubTrendingSource;
pub use hackernews::HackerNewsSource;
pub use newsapi::NewsApiSource;
pub use nvd::NvdSource;
pub use reddit::RedditSource;
pub use rss::RssFeedSource;

/// Build the adapter set for the enabled sources.
///
/// The match is exhaustive: adding a `Source` variant forces a registry
/// decision here.
pub fn build_sources(
    enabled: &[Source],
    categorizer: Categorizer,
    mut newsapi_key: Option<SecretString>,
    reddit_subreddits: &[String],
) -> Vec<Arc<dyn ArticleSource>> {
    enabled
        .iter()
        .map(|source| -> Arc<dyn ArticleSource> {
            match source {
                Source::Devto => Arc::new(DevtoSource::new(categorizer)),
                Source::HackerNews => Arc::new(HackerNewsSource::new(categorizer)),
                Source::NewsApi => Arc::new(NewsApiSource::new(newsapi_key.take(), categorizer)),
                Source::Github => Arc::new(GithubTrendingSource::new(categorizer)),
                Source::Reddit => {
                    Arc::new(RedditSource::new(reddit_subreddits.to_vec(), categorizer))
                }
                Source::Nvd => Arc::new(NvdSource::new()),
                Source::Vercel => Arc::new(RssFeedSource::new(
                    Source::Vercel,
                    "https://vercel.com/blog/rss",
                    categorizer,
                )),
                Source::React => Arc::new(RssFeedSource::new(
                    Source::React,
                    "https://react.dev/rss.xml",
                    categorizer,
                )),
                Source::Meta => Arc::new(RssFeedSource::new(
                    Source::Meta,
                    "https://engineering.fb.com/feed/",
                    categorizer,
                )),
                Source::Google => Arc::new(RssFeedSource::new(
                    Source::Google,
                    "https://developers.googleblog.com/feeds/posts/default",
                    categorizer,
                )),
                Source::Cloudflare => Arc::new(RssFeedSource::new(
                    Source::Cloudflare,
                    "https://blog.cloudflare.com/rss/",
                    categorizer,
                )),
                Source::Medium => Arc::new(RssFeedSource::new(
                    Source::Medium,
                    "https://medium.com/feed/javascript-in-plain-english",
                    categorizer,
                )),
            }
        })
        .collect()
}

/// Parse a provider timestamp, tolerating a missing UTC offset. Malformed
/// values coerce to now rather than failing the whole fetch.
pub(crate) fn parse_timestamp(value: &str) -> OffsetDateTime {
    OffsetDateTime::parse(value, &Rfc3339)
        .ok()
        .or_else(|| {
            PrimitiveDateTime::parse(value, &Iso8601::DEFAULT)
                .ok()
                .map(|naive| naive.assume_utc())
        })
        .unwrap_or_else(OffsetDateTime::now_utc)
}

/// Unix seconds to a timestamp, coercing out-of-range values to now
pub(crate) fn from_unix_or_now(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(seconds).unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Short stable digest for providers without a usable native id
pub(crate) fn short_digest(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..12].to_string()
}

/// Char-boundary-safe prefix truncation for description snippets
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_accepts_rfc3339() {
        let parsed = parse_timestamp("2024-01-15T12:00:00Z");
        assert_eq!(parsed.unix_timestamp(), 1705320000);
    }

    #[test]
    fn test_parse_timestamp_accepts_offsetless_iso8601() {
        // NVD emits timestamps without a zone designator
        let parsed = parse_timestamp("2024-01-15T12:00:00.453");
        assert_eq!(parsed.unix_timestamp(), 1705320000);
    }

    #[test]
    fn test_short_digest_is_stable() {
        assert_eq!(short_digest("https://example.com/a"), short_digest("https://example.com/a"));
        assert_ne!(short_digest("https://example.com/a"), short_digest("https://example.com/b"));
        assert_eq!(short_digest("x").len(), 12);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 200), "short");
    }

    #[test]
    fn test_build_sources_covers_every_variant() {
        let sources = build_sources(
            &Source::ALL,
            Categorizer::default(),
            None,
            &["programming".to_string()],
        );
        assert_eq!(sources.len(), Source::ALL.len());
        for (adapter, expected) in sources.iter().zip(Source::ALL) {
            assert_eq!(adapter.source(), expected);
        }
    }
}
