//! Keyword-rule topic classification
//!
//! Categorization is a pure function over the article's text: tags, title and
//! description are joined into one lowercase blob and checked against an
//! ordered rule list. The first matching rule wins, so rule order is part of
//! the contract: a vulnerability write-up that also mentions "react" must
//! classify as Security.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::Category;

/// Ordered rule table. Evaluation order: Security, Web Dev, AI/ML, DevOps,
/// Mobile, Open Source.
static RULES: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    [
        (
            Category::Security,
            r"\b(cve|vulnerability|breach|security|hack|exploit|ransomware|malware|phishing|firewall|encryption|zero-day)\b",
        ),
        (
            Category::WebDev,
            r"\b(react|next\.?js|vue|angular|javascript|typescript|css|html|frontend|backend|fullstack|web development|svelte|tailwind)\b",
        ),
        (
            Category::AiMl,
            r"\b(ai|artificial intelligence|machine learning|neural|tensorflow|pytorch|gpt|llm|deep learning|ml|data science)\b",
        ),
        (
            Category::DevOps,
            r"\b(docker|kubernetes|k8s|ci/cd|devops|aws|azure|gcp|cloud|deployment|terraform|ansible|jenkins)\b",
        ),
        (
            Category::Mobile,
            r"\b(ios|android|react native|flutter|swift|kotlin|mobile|app development)\b",
        ),
        (
            Category::OpenSource,
            r"\b(github|open source|repository|contributions|oss|pull request|fork)\b",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| {
        let regex = Regex::new(pattern).expect("static categorizer pattern");
        (category, regex)
    })
    .collect()
});

/// Classifier with an injectable fallback for text no rule matches.
///
/// The fallback defaults to Web Dev. That mislabels e.g. a DevOps article
/// with no matching keyword, but it is the established behavior; callers
/// that want an explicit catch-all can configure a different default.
#[derive(Debug, Clone, Copy)]
pub struct Categorizer {
    default_category: Category,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self {
            default_category: Category::WebDev,
        }
    }
}

impl Categorizer {
    pub fn new(default_category: Category) -> Self {
        Self { default_category }
    }

    /// Classify an article's text. Deterministic: identical input always
    /// yields an identical category.
    pub fn categorize(&self, tags: &[String], title: &str, description: &str) -> Category {
        let content = format!("{} {} {}", tags.join(" "), title, description).to_lowercase();

        RULES
            .iter()
            .find(|(_, regex)| regex.is_match(&content))
            .map(|(category, _)| *category)
            .unwrap_or(self.default_category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorize(tags: &[&str], title: &str, description: &str) -> Category {
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        Categorizer::default().categorize(&tags, title, description)
    }

    #[test]
    fn test_security_rule_wins_over_web_dev() {
        // Rule order: security is evaluated first even though "react" matches too
        assert_eq!(
            categorize(&[], "CVE-2024-1234 affects React server components", ""),
            Category::Security
        );
    }

    #[test]
    fn test_matches_from_tags_alone() {
        assert_eq!(categorize(&["kubernetes"], "Weekly roundup", ""), Category::DevOps);
    }

    #[test]
    fn test_matches_from_description() {
        assert_eq!(
            categorize(&[], "A quiet title", "Training a neural network from scratch"),
            Category::AiMl
        );
    }

    #[test]
    fn test_word_boundaries_prevent_partial_matches() {
        // "mlops" must not match the standalone "ml" keyword
        assert_eq!(categorize(&[], "thoughts on mlops tooling", ""), Category::WebDev);
    }

    #[test]
    fn test_unmatched_text_falls_back_to_default() {
        assert_eq!(categorize(&[], "A story about gardening", ""), Category::WebDev);
        let custom = Categorizer::new(Category::OpenSource);
        assert_eq!(
            custom.categorize(&[], "A story about gardening", ""),
            Category::OpenSource
        );
    }

    #[test]
    fn test_deterministic() {
        let tags = vec!["rust".to_string()];
        let first = Categorizer::default().categorize(&tags, "Fearless concurrency", "ownership");
        for _ in 0..10 {
            assert_eq!(
                Categorizer::default().categorize(&tags, "Fearless concurrency", "ownership"),
                first
            );
        }
    }

    #[test]
    fn test_mobile_and_open_source_rules() {
        assert_eq!(categorize(&[], "Shipping our Flutter app", ""), Category::Mobile);
        assert_eq!(
            categorize(&[], "How to review a pull request", ""),
            Category::OpenSource
        );
    }
}
