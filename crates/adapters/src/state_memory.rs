//! In-memory user state store for testing and offline mode

use async_trait::async_trait;
use devpulse_domain::{
    Collection, MAX_HISTORY_ENTRIES, ReadEntry, StateError, StreakData, UserStateStore,
};
use std::collections::HashSet;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory user state store implementation
pub struct InMemoryUserStateStore {
    /// Newest first
    history: RwLock<Vec<ReadEntry>>,
    bookmarks: RwLock<HashSet<String>>,
    streak: RwLock<StreakData>,
    collections: RwLock<Vec<Collection>>,
}

impl InMemoryUserStateStore {
    pub fn new() -> Self {
        Self {
            history: RwLock::new(Vec::new()),
            bookmarks: RwLock::new(HashSet::new()),
            streak: RwLock::new(StreakData::default()),
            collections: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryUserStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStateStore for InMemoryUserStateStore {
    async fn read_history(&self) -> Result<Vec<ReadEntry>, StateError> {
        let history = self
            .history
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(history.clone())
    }

    async fn mark_read(&self, entry: &ReadEntry) -> Result<(), StateError> {
        let mut history = self
            .history
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;

        if history.iter().any(|e| e.article_id == entry.article_id) {
            return Ok(());
        }

        history.insert(0, entry.clone());
        history.truncate(MAX_HISTORY_ENTRIES);
        Ok(())
    }

    async fn clear_history(&self) -> Result<(), StateError> {
        let mut history = self
            .history
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;
        history.clear();
        Ok(())
    }

    async fn bookmark_ids(&self) -> Result<HashSet<String>, StateError> {
        let bookmarks = self
            .bookmarks
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(bookmarks.clone())
    }

    async fn add_bookmark(&self, article_id: &str) -> Result<(), StateError> {
        let mut bookmarks = self
            .bookmarks
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;
        bookmarks.insert(article_id.to_string());
        Ok(())
    }

    async fn remove_bookmark(&self, article_id: &str) -> Result<(), StateError> {
        let mut bookmarks = self
            .bookmarks
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;
        bookmarks.remove(article_id);
        Ok(())
    }

    async fn streak(&self) -> Result<StreakData, StateError> {
        let streak = self
            .streak
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(streak.clone())
    }

    async fn put_streak(&self, streak: &StreakData) -> Result<(), StateError> {
        let mut stored = self
            .streak
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;
        *stored = streak.clone();
        Ok(())
    }

    async fn collections(&self) -> Result<Vec<Collection>, StateError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(collections.clone())
    }

    async fn collection(&self, id: Uuid) -> Result<Option<Collection>, StateError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(collections.iter().find(|c| c.id == id).cloned())
    }

    async fn save_collection(&self, collection: &Collection) -> Result<(), StateError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;

        match collections.iter_mut().find(|c| c.id == collection.id) {
            Some(existing) => *existing = collection.clone(),
            None => collections.push(collection.clone()),
        }
        Ok(())
    }

    async fn delete_collection(&self, id: Uuid) -> Result<(), StateError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;
        collections.retain(|c| c.id != id);
        Ok(())
    }

    async fn add_to_collection(
        &self,
        collection_id: Uuid,
        article_id: &str,
    ) -> Result<(), StateError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;

        let collection = collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .ok_or_else(|| StateError::NotFound(format!("collection {}", collection_id)))?;

        if !collection.article_ids.iter().any(|id| id == article_id) {
            collection.article_ids.push(article_id.to_string());
        }
        Ok(())
    }

    async fn remove_from_collection(
        &self,
        collection_id: Uuid,
        article_id: &str,
    ) -> Result<(), StateError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;

        let collection = collections
            .iter_mut()
            .find(|c| c.id == collection_id)
            .ok_or_else(|| StateError::NotFound(format!("collection {}", collection_id)))?;

        collection.article_ids.retain(|id| id != article_id);
        Ok(())
    }

    async fn is_in_collection(
        &self,
        collection_id: Uuid,
        article_id: &str,
    ) -> Result<bool, StateError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(collections
            .iter()
            .find(|c| c.id == collection_id)
            .map(|c| c.article_ids.iter().any(|id| id == article_id))
            .unwrap_or(false))
    }

    async fn collections_for_article(
        &self,
        article_id: &str,
    ) -> Result<Vec<Collection>, StateError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(collections
            .iter()
            .filter(|c| c.article_ids.iter().any(|id| id == article_id))
            .cloned()
            .collect())
    }
}
