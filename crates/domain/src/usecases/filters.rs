//! Display-side filter predicates applied after aggregation

use crate::model::{Article, Category, Source};

pub fn by_source(articles: Vec<Article>, source: Source) -> Vec<Article> {
    articles.into_iter().filter(|a| a.source == source).collect()
}

pub fn by_category(articles: Vec<Article>, category: Category) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|a| a.category == category)
        .collect()
}

/// Case-insensitive substring search over title, description, and tags
pub fn by_search(articles: Vec<Article>, query: &str) -> Vec<Article> {
    let query = query.to_lowercase();
    articles
        .into_iter()
        .filter(|a| {
            a.title.to_lowercase().contains(&query)
                || a.description.to_lowercase().contains(&query)
                || a.tags.iter().any(|t| t.to_lowercase().contains(&query))
        })
        .collect()
}
