//! Trending topic extraction over the aggregated corpus
//!
//! A fixed tech/security vocabulary is counted with whole-word matching over
//! each article's combined text; literal tags bypass the vocabulary and count
//! once each. The merged frequency table drives a tag-cloud style display,
//! so the font-size interpolation is part of the contract.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{Article, TopicCount};

/// Fixed extraction vocabulary. Languages and frameworks, infrastructure,
/// security terms, engineering concepts.
const TECH_KEYWORDS: &[&str] = &[
    "react", "vue", "angular", "svelte", "nextjs", "nuxt", "remix",
    "typescript", "javascript", "python", "rust", "go", "java", "kotlin", "swift",
    "node", "nodejs", "deno", "bun",
    "docker", "kubernetes", "k8s", "aws", "azure", "gcp", "vercel", "netlify",
    "ai", "ml", "chatgpt", "gpt", "llm", "openai", "anthropic",
    "blockchain", "web3", "crypto",
    "graphql", "rest", "api", "grpc",
    "postgresql", "mysql", "mongodb", "redis",
    "security", "vulnerability", "cve", "exploit", "breach", "hack",
    "malware", "ransomware", "phishing", "zero-day", "0-day",
    "performance", "optimization", "scalability", "serverless",
    "microservices", "monolith", "architecture",
    "testing", "ci/cd", "devops", "deployment",
    "opensource", "open source", "github",
];

static KEYWORD_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TECH_KEYWORDS
        .iter()
        .map(|keyword| {
            let pattern = format!(r"\b{}\b", regex::escape(keyword));
            let regex = Regex::new(&pattern).expect("static keyword pattern");
            (*keyword, regex)
        })
        .collect()
});

/// Count topic occurrences across the corpus and return the `limit` most
/// frequent, descending.
///
/// Keywords are matched whole-word and case-insensitively against
/// title+description+tags; every literal tag additionally counts as one
/// occurrence of itself. The first article that introduces a topic fixes its
/// display form and category.
pub fn trending_topics(articles: &[Article], limit: usize) -> Vec<TopicCount> {
    // (normalized key, entry); insertion order breaks count ties
    let mut topics: Vec<(String, TopicCount)> = Vec::new();

    let mut bump = |key: String, display: &str, count: usize, article: &Article| {
        match topics.iter_mut().find(|(k, _)| *k == key) {
            Some((_, entry)) => entry.count += count,
            None => topics.push((
                key,
                TopicCount {
                    topic: display.to_string(),
                    count,
                    category: Some(article.category),
                },
            )),
        }
    };

    for article in articles {
        let text = format!(
            "{} {} {}",
            article.title,
            article.description,
            article.tags.join(" ")
        )
        .to_lowercase();

        for (keyword, regex) in KEYWORD_PATTERNS.iter() {
            let count = regex.find_iter(&text).count();
            if count > 0 {
                bump(keyword.to_lowercase(), keyword, count, article);
            }
        }

        for tag in &article.tags {
            bump(tag.to_lowercase(), tag, 1, article);
        }
    }

    let mut counts: Vec<TopicCount> = topics.into_iter().map(|(_, entry)| entry).collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

const MIN_FONT_SIZE: f32 = 0.75;
const MAX_FONT_SIZE: f32 = 2.0;

/// Map a topic count to a display font size in rem by linear interpolation
/// over the observed count range. A degenerate range yields the midpoint.
pub fn topic_font_size(count: usize, min: usize, max: usize) -> f32 {
    if max == min {
        return (MIN_FONT_SIZE + MAX_FONT_SIZE) / 2.0;
    }

    let normalized = (count - min) as f32 / (max - min) as f32;
    MIN_FONT_SIZE + normalized * (MAX_FONT_SIZE - MIN_FONT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Source};
    use time::macros::datetime;

    fn article(title: &str, description: &str, tags: &[&str]) -> Article {
        Article {
            id: "devto-1".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            url: "https://example.com".to_string(),
            source: Source::Devto,
            category: Category::WebDev,
            published_at: datetime!(2024-01-15 12:00 UTC),
            author: None,
            image_url: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_higher_count_ranks_first() {
        let articles = vec![
            article("Docker networking deep dive", "docker docker", &["docker"]),
            article("React hooks", "a react walkthrough", &[]),
        ];

        let topics = trending_topics(&articles, 10);
        let docker = topics.iter().find(|t| t.topic == "docker").unwrap();
        let react = topics.iter().find(|t| t.topic == "react").unwrap();

        // 4 keyword hits (title, description twice, joined tag) + 1 literal tag
        assert_eq!(docker.count, 5);
        assert_eq!(react.count, 2);
        assert!(
            topics.iter().position(|t| t.topic == "docker")
                < topics.iter().position(|t| t.topic == "react")
        );
    }

    #[test]
    fn test_whole_word_matching() {
        let articles = vec![article("mlops pipelines", "about mlops", &[])];
        let topics = trending_topics(&articles, 10);
        assert!(topics.iter().all(|t| t.topic != "ml"));
    }

    #[test]
    fn test_literal_tags_bypass_vocabulary() {
        let articles = vec![article("A title", "a description", &["bevy", "bevy"])];
        let topics = trending_topics(&articles, 10);
        let bevy = topics.iter().find(|t| t.topic == "bevy").unwrap();
        assert_eq!(bevy.count, 2);
    }

    #[test]
    fn test_tag_and_keyword_counts_merge() {
        let articles = vec![article("Rust 1.80 is out", "", &["rust"])];
        let topics = trending_topics(&articles, 10);
        let rust = topics.iter().find(|t| t.topic == "rust").unwrap();
        // one keyword hit in title, one in the joined tag text, one literal tag
        assert_eq!(rust.count, 3);
    }

    #[test]
    fn test_limit_truncates() {
        let articles = vec![article("react vue angular svelte", "", &[])];
        assert_eq!(trending_topics(&articles, 2).len(), 2);
    }

    #[test]
    fn test_topic_carries_category() {
        let mut a = article("CVE-2024-1 exploit in the wild", "", &[]);
        a.category = Category::Security;
        let topics = trending_topics(&[a], 10);
        let cve = topics.iter().find(|t| t.topic == "cve").unwrap();
        assert_eq!(cve.category, Some(Category::Security));
    }

    #[test]
    fn test_font_size_interpolation() {
        assert_eq!(topic_font_size(1, 1, 5), 0.75);
        assert_eq!(topic_font_size(5, 1, 5), 2.0);
        assert_eq!(topic_font_size(3, 1, 5), 1.375);
    }

    #[test]
    fn test_font_size_degenerate_range_is_midpoint() {
        assert_eq!(topic_font_size(4, 4, 4), 1.375);
    }
}
