//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::model::{Article, Collection, ReadEntry, Source, StreakData};

/// Error type for source adapter operations. Internal detail for logging;
/// the aggregator collapses any failure to an empty contribution.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Feed parse error: {0}")]
    Feed(String),
    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

/// Port for fetching articles from one external provider.
///
/// A fetch is independently fallible: an `Err` means this source contributes
/// nothing this cycle, never that the cycle aborts.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fixed origin tag for every article this adapter produces
    fn source(&self) -> Source;

    /// Human-readable name, display only
    fn label(&self) -> &'static str {
        self.source().label()
    }

    /// Fetch and normalize the provider's current items
    async fn fetch(&self) -> Result<Vec<Article>, SourceError>;
}

/// Error type for user state store operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for persisting user interaction state across aggregation cycles.
///
/// The recommendation and topic logic only ever read derived sets (read ids,
/// bookmark ids) from this layer; articles themselves are never stored.
#[async_trait]
pub trait UserStateStore: Send + Sync {
    /// Reading history, newest first, bounded to [`crate::model::MAX_HISTORY_ENTRIES`]
    async fn read_history(&self) -> Result<Vec<ReadEntry>, StateError>;

    /// Record an article as read; a second mark for the same id is a no-op
    async fn mark_read(&self, entry: &ReadEntry) -> Result<(), StateError>;

    async fn clear_history(&self) -> Result<(), StateError>;

    async fn bookmark_ids(&self) -> Result<HashSet<String>, StateError>;

    async fn add_bookmark(&self, article_id: &str) -> Result<(), StateError>;

    async fn remove_bookmark(&self, article_id: &str) -> Result<(), StateError>;

    async fn streak(&self) -> Result<StreakData, StateError>;

    async fn put_streak(&self, streak: &StreakData) -> Result<(), StateError>;

    async fn collections(&self) -> Result<Vec<Collection>, StateError>;

    async fn collection(&self, id: Uuid) -> Result<Option<Collection>, StateError>;

    async fn save_collection(&self, collection: &Collection) -> Result<(), StateError>;

    async fn delete_collection(&self, id: Uuid) -> Result<(), StateError>;

    async fn add_to_collection(
        &self,
        collection_id: Uuid,
        article_id: &str,
    ) -> Result<(), StateError>;

    async fn remove_from_collection(
        &self,
        collection_id: Uuid,
        article_id: &str,
    ) -> Result<(), StateError>;

    async fn is_in_collection(
        &self,
        collection_id: Uuid,
        article_id: &str,
    ) -> Result<bool, StateError>;

    async fn collections_for_article(
        &self,
        article_id: &str,
    ) -> Result<Vec<Collection>, StateError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
