//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Origin of an article. Closed set: adding a source means adding an
/// adapter and extending the registry match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Devto,
    HackerNews,
    NewsApi,
    Github,
    Vercel,
    React,
    Meta,
    Google,
    Cloudflare,
    Reddit,
    Medium,
    Nvd,
}

impl Source {
    pub const ALL: [Source; 12] = [
        Source::Devto,
        Source::HackerNews,
        Source::NewsApi,
        Source::Github,
        Source::Vercel,
        Source::React,
        Source::Meta,
        Source::Google,
        Source::Cloudflare,
        Source::Reddit,
        Source::Medium,
        Source::Nvd,
    ];

    /// Stable wire id, used as the article id namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Devto => "devto",
            Source::HackerNews => "hackernews",
            Source::NewsApi => "newsapi",
            Source::Github => "github",
            Source::Vercel => "vercel",
            Source::React => "react",
            Source::Meta => "meta",
            Source::Google => "google",
            Source::Cloudflare => "cloudflare",
            Source::Reddit => "reddit",
            Source::Medium => "medium",
            Source::Nvd => "nvd",
        }
    }

    /// Human-readable label, display only
    pub fn label(&self) -> &'static str {
        match self {
            Source::Devto => "Dev.to",
            Source::HackerNews => "Hacker News",
            Source::NewsApi => "Tech News",
            Source::Github => "GitHub",
            Source::Vercel => "Vercel Blog",
            Source::React => "React Blog",
            Source::Meta => "Meta Engineering",
            Source::Google => "Google Developers",
            Source::Cloudflare => "Cloudflare Blog",
            Source::Reddit => "Reddit",
            Source::Medium => "Medium",
            Source::Nvd => "NVD/NIST",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .iter()
            .find(|source| source.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| format!("unknown source: {}", s))
    }
}

/// Topic category assigned once at ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Security,
    #[serde(rename = "Web Dev")]
    WebDev,
    #[serde(rename = "AI/ML")]
    AiMl,
    DevOps,
    Mobile,
    #[serde(rename = "Open Source")]
    OpenSource,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Security,
        Category::WebDev,
        Category::AiMl,
        Category::DevOps,
        Category::Mobile,
        Category::OpenSource,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Security => "Security",
            Category::WebDev => "Web Dev",
            Category::AiMl => "AI/ML",
            Category::DevOps => "DevOps",
            Category::Mobile => "Mobile",
            Category::OpenSource => "Open Source",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '/', '-'], "").as_str() {
            "security" => Ok(Category::Security),
            "webdev" => Ok(Category::WebDev),
            "aiml" => Ok(Category::AiMl),
            "devops" => Ok(Category::DevOps),
            "mobile" => Ok(Category::Mobile),
            "opensource" => Ok(Category::OpenSource),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

/// A normalized article from any source. Immutable once produced by an
/// adapter; downstream stages only filter, sort, or wrap it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Globally unique, namespaced as `<source>-<native-id>`
    pub id: String,
    pub title: String,
    pub description: String,
    /// Canonical external link; opening target, never a dedup key
    pub url: String,
    pub source: Source,
    pub category: Category,
    /// Authoritative ordering key
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub author: Option<String>,
    pub image_url: Option<String>,
    /// Insertion order preserved for display
    pub tags: Vec<String>,
}

impl Article {
    /// Build a namespaced article id from a source and its native id
    pub fn make_id(source: Source, native_id: &str) -> String {
        format!("{}-{}", source.as_str(), native_id)
    }
}

/// One entry in the user's reading history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadEntry {
    pub article_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub read_at: OffsetDateTime,
    pub url: String,
}

/// Reading history is bounded; stores evict the oldest entries past this
pub const MAX_HISTORY_ENTRIES: usize = 1000;

/// Consecutive-day visit record derived from a date-keyed presence calendar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_visit_date: Option<Date>,
    /// date -> visited
    #[serde(default)]
    pub history: BTreeMap<Date, bool>,
}

impl StreakData {
    /// Record a visit for `today`. Same-day visits are no-ops; a visit the
    /// day after the last one extends the streak, anything else resets it
    /// to 1. Returns whether the record changed.
    pub fn record_visit(&mut self, today: Date) -> bool {
        if self.last_visit_date == Some(today) {
            return false;
        }

        let yesterday = today.previous_day();
        self.current_streak = match self.last_visit_date {
            Some(last) if Some(last) == yesterday => self.current_streak + 1,
            _ => 1,
        };
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_visit_date = Some(today);
        self.history.insert(today, true);
        true
    }
}

/// A named grouping of articles owned by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub color: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub article_ids: Vec<String>,
}

/// An article wrapped with its recommendation score and the signals that
/// produced it. Reasons are display annotations, never tie-breakers.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub article: Article,
    pub score: i32,
    pub reasons: Vec<String>,
}

/// A trending topic with its occurrence count across the corpus
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
    pub category: Option<Category>,
}
