//! Recommendation ranking from implicit interaction signals
//!
//! All rankings are pure functions over the aggregated corpus plus derived
//! user-state sets (read ids, bookmark ids). Scores carry human-readable
//! reasons for display transparency; ties keep input iteration order via
//! stable sorting.

use std::collections::HashSet;

use time::{Duration, OffsetDateTime};

use crate::model::{Article, Category, Recommendation, Source};

/// Articles published within this window get a flat recency bonus
const RECENCY_WINDOW: Duration = Duration::days(7);

const BOOKMARK_BONUS: i32 = 3;
const RECENCY_BONUS: i32 = 2;

/// Rank unread articles for the user.
///
/// With a non-empty read history this scores candidates by source/category
/// affinity plus bookmark and recency bonuses, dropping anything that scores
/// zero; this is a filter, not just a sort. With no history it falls
/// back to [`cold_start`].
pub fn personalized(
    all_articles: &[Article],
    read_ids: &HashSet<String>,
    bookmark_ids: &HashSet<String>,
    limit: usize,
    now: OffsetDateTime,
) -> Vec<Recommendation> {
    let read_articles: Vec<&Article> = all_articles
        .iter()
        .filter(|a| read_ids.contains(&a.id))
        .collect();

    if read_articles.is_empty() {
        return cold_start(all_articles, read_ids, limit);
    }

    let source_ranks = rank_by_frequency(read_articles.iter().map(|a| a.source));
    let category_ranks = rank_by_frequency(read_articles.iter().map(|a| a.category));

    let mut recommendations: Vec<Recommendation> = all_articles
        .iter()
        .filter(|a| !read_ids.contains(&a.id))
        .filter_map(|article| {
            let mut score = 0;
            let mut reasons = Vec::new();

            if let Some(rank) = position_of(&source_ranks, &article.source) {
                let points = 10 - rank as i32;
                if points > 0 {
                    score += points;
                    reasons.push(format!("From {}, a source you read often", article.source.label()));
                }
            }

            if let Some(rank) = position_of(&category_ranks, &article.category) {
                let points = 8 - rank as i32;
                if points > 0 {
                    score += points;
                    reasons.push(format!("More {} like the ones you read", article.category));
                }
            }

            if bookmark_ids.contains(&article.id) {
                score += BOOKMARK_BONUS;
                reasons.push("You bookmarked this".to_string());
            }

            if is_recent(article, now) {
                score += RECENCY_BONUS;
                reasons.push("Published this week".to_string());
            }

            // Zero-score candidates are dropped entirely
            (score > 0).then(|| Recommendation {
                article: article.clone(),
                score,
                reasons,
            })
        })
        .collect();

    recommendations.sort_by(|a, b| b.score.cmp(&a.score));
    recommendations.truncate(limit);

    tracing::debug!(count = recommendations.len(), "Personalized recommendations");

    recommendations
}

/// Ranking for a user with no interaction history: the most recent unread
/// articles, unscored.
pub fn cold_start(
    all_articles: &[Article],
    read_ids: &HashSet<String>,
    limit: usize,
) -> Vec<Recommendation> {
    let mut unread: Vec<&Article> = all_articles
        .iter()
        .filter(|a| !read_ids.contains(&a.id))
        .collect();
    unread.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    unread
        .into_iter()
        .take(limit)
        .map(|article| Recommendation {
            article: article.clone(),
            score: 0,
            reasons: vec!["Among the latest articles".to_string()],
        })
        .collect()
}

/// "More like this": rank candidates by similarity to one reference article.
///
/// The reference itself and already-read articles are excluded; only
/// positive-score results are returned.
pub fn similar_to(
    all_articles: &[Article],
    reference: &Article,
    read_ids: &HashSet<String>,
    bookmark_ids: &HashSet<String>,
    limit: usize,
    now: OffsetDateTime,
) -> Vec<Recommendation> {
    let reference_tags: HashSet<String> =
        reference.tags.iter().map(|t| t.to_lowercase()).collect();
    let reference_keywords = title_keywords(&reference.title);

    let mut recommendations: Vec<Recommendation> = all_articles
        .iter()
        .filter(|a| a.id != reference.id && !read_ids.contains(&a.id))
        .filter_map(|article| {
            let mut score = 0;
            let mut reasons = Vec::new();

            if article.source == reference.source {
                score += 5;
                reasons.push(format!("Also from {}", article.source.label()));
            }

            if article.category == reference.category {
                score += 4;
                reasons.push(format!("Also about {}", article.category));
            }

            let shared_tags = article
                .tags
                .iter()
                .filter(|t| reference_tags.contains(&t.to_lowercase()))
                .count();
            if shared_tags > 0 {
                score += 2 * shared_tags as i32;
                reasons.push(format!("Shares {} tag(s)", shared_tags));
            }

            let shared_keywords = title_keywords(&article.title)
                .intersection(&reference_keywords)
                .count();
            if shared_keywords > 0 {
                score += 3 * shared_keywords as i32;
                reasons.push("Similar headline".to_string());
            }

            if bookmark_ids.contains(&article.id) {
                score += BOOKMARK_BONUS;
                reasons.push("You bookmarked this".to_string());
            }

            if is_recent(article, now) {
                score += RECENCY_BONUS;
                reasons.push("Published this week".to_string());
            }

            (score > 0).then(|| Recommendation {
                article: article.clone(),
                score,
                reasons,
            })
        })
        .collect();

    recommendations.sort_by(|a, b| b.score.cmp(&a.score));
    recommendations.truncate(limit);
    recommendations
}

fn is_recent(article: &Article, now: OffsetDateTime) -> bool {
    now - article.published_at <= RECENCY_WINDOW
}

/// Distinct values ordered by descending visit count. First-encounter order
/// breaks count ties, keeping ranks deterministic.
fn rank_by_frequency<T: PartialEq + Copy>(values: impl Iterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn position_of<T: PartialEq>(ranks: &[(T, usize)], value: &T) -> Option<usize> {
    ranks.iter().position(|(v, _)| v == value)
}

const TITLE_STOPWORDS: &[&str] = &[
    "about", "after", "against", "because", "been", "before", "being", "between", "could",
    "does", "down", "every", "from", "have", "here", "into", "just", "like", "more", "most",
    "only", "other", "over", "should", "some", "than", "that", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "under", "using", "were", "what",
    "when", "where", "which", "while", "will", "with", "would", "your",
];

/// Significant words from a title: lowercased, stopword-filtered, longer
/// than 3 characters.
fn title_keywords(title: &str) -> HashSet<String> {
    title
        .split(|c: char| !c.is_alphanumeric())
        .map(|word| word.to_lowercase())
        .filter(|word| word.len() > 3 && !TITLE_STOPWORDS.contains(&word.as_str()))
        .collect()
}
