//! SQLite user state store implementation

use async_trait::async_trait;
use devpulse_domain::{
    Collection, MAX_HISTORY_ENTRIES, ReadEntry, StateError, StreakData, UserStateStore,
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::collections::HashSet;
use std::path::Path;
use time::OffsetDateTime;
use uuid::Uuid;

/// SQLite-backed user state store
pub struct SqliteUserStateStore {
    pool: SqlitePool,
}

impl SqliteUserStateStore {
    /// Open (or create) the state database at the given path
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, StateError> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StateError::Database(format!("Failed to create directory: {}", e)))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub async fn in_memory() -> Result<Self, StateError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StateError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS read_history (
                article_id TEXT PRIMARY KEY,
                read_at TEXT NOT NULL,
                url TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bookmarks (
                article_id TEXT PRIMARY KEY
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS streak (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                data TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                color TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS collection_articles (
                collection_id TEXT NOT NULL,
                article_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                PRIMARY KEY (collection_id, article_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }

    async fn article_ids_for(&self, collection_id: &str) -> Result<Vec<String>, StateError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT article_id FROM collection_articles WHERE collection_id = ? ORDER BY position",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn load_collection_row(
        &self,
        row: (String, String, String, String, String),
    ) -> Result<Collection, StateError> {
        let (id_str, name, description, color, created_at_str) = row;

        let id =
            Uuid::parse_str(&id_str).map_err(|e| StateError::Serialization(e.to_string()))?;
        let created_at = OffsetDateTime::parse(
            &created_at_str,
            &time::format_description::well_known::Rfc3339,
        )
        .map_err(|e| StateError::Serialization(e.to_string()))?;
        let article_ids = self.article_ids_for(&id_str).await?;

        Ok(Collection {
            id,
            name,
            description,
            color,
            created_at,
            article_ids,
        })
    }
}

fn format_rfc3339(ts: OffsetDateTime) -> Result<String, StateError> {
    ts.format(&time::format_description::well_known::Rfc3339)
        .map_err(|e| StateError::Serialization(e.to_string()))
}

#[async_trait]
impl UserStateStore for SqliteUserStateStore {
    async fn read_history(&self) -> Result<Vec<ReadEntry>, StateError> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT article_id, read_at, url FROM read_history ORDER BY read_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|(article_id, read_at_str, url)| {
                let read_at = OffsetDateTime::parse(
                    &read_at_str,
                    &time::format_description::well_known::Rfc3339,
                )
                .map_err(|e| StateError::Serialization(e.to_string()))?;

                Ok(ReadEntry {
                    article_id,
                    read_at,
                    url,
                })
            })
            .collect()
    }

    async fn mark_read(&self, entry: &ReadEntry) -> Result<(), StateError> {
        let read_at_str = format_rfc3339(entry.read_at)?;

        sqlx::query(
            "INSERT OR IGNORE INTO read_history (article_id, read_at, url) VALUES (?, ?, ?)",
        )
        .bind(&entry.article_id)
        .bind(&read_at_str)
        .bind(&entry.url)
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        // Bounded history: evict everything past the newest N entries
        sqlx::query(
            r#"
            DELETE FROM read_history WHERE article_id NOT IN (
                SELECT article_id FROM read_history
                ORDER BY read_at DESC, rowid DESC
                LIMIT ?
            )
            "#,
        )
        .bind(MAX_HISTORY_ENTRIES as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }

    async fn clear_history(&self) -> Result<(), StateError> {
        sqlx::query("DELETE FROM read_history")
            .execute(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(())
    }

    async fn bookmark_ids(&self) -> Result<HashSet<String>, StateError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT article_id FROM bookmarks")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn add_bookmark(&self, article_id: &str) -> Result<(), StateError> {
        sqlx::query("INSERT OR IGNORE INTO bookmarks (article_id) VALUES (?)")
            .bind(article_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(())
    }

    async fn remove_bookmark(&self, article_id: &str) -> Result<(), StateError> {
        sqlx::query("DELETE FROM bookmarks WHERE article_id = ?")
            .bind(article_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(())
    }

    async fn streak(&self) -> Result<StreakData, StateError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT data FROM streak WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        match row {
            Some((data,)) => serde_json::from_str(&data)
                .map_err(|e| StateError::Serialization(e.to_string())),
            None => Ok(StreakData::default()),
        }
    }

    async fn put_streak(&self, streak: &StreakData) -> Result<(), StateError> {
        let data = serde_json::to_string(streak)
            .map_err(|e| StateError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO streak (id, data) VALUES (1, ?)
            ON CONFLICT(id) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }

    async fn collections(&self) -> Result<Vec<Collection>, StateError> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, name, description, color, created_at FROM collections ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        let mut collections = Vec::with_capacity(rows.len());
        for row in rows {
            collections.push(self.load_collection_row(row).await?);
        }
        Ok(collections)
    }

    async fn collection(&self, id: Uuid) -> Result<Option<Collection>, StateError> {
        let row: Option<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, name, description, color, created_at FROM collections WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(self.load_collection_row(row).await?)),
            None => Ok(None),
        }
    }

    async fn save_collection(&self, collection: &Collection) -> Result<(), StateError> {
        let created_at_str = format_rfc3339(collection.created_at)?;
        let id_str = collection.id.to_string();

        sqlx::query(
            r#"
            INSERT INTO collections (id, name, description, color, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                color = excluded.color
            "#,
        )
        .bind(&id_str)
        .bind(&collection.name)
        .bind(&collection.description)
        .bind(&collection.color)
        .bind(&created_at_str)
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        // Memberships are replaced wholesale to mirror the saved order
        sqlx::query("DELETE FROM collection_articles WHERE collection_id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        for (position, article_id) in collection.article_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO collection_articles (collection_id, article_id, position) VALUES (?, ?, ?)",
            )
            .bind(&id_str)
            .bind(article_id)
            .bind(position as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;
        }

        Ok(())
    }

    async fn delete_collection(&self, id: Uuid) -> Result<(), StateError> {
        let id_str = id.to_string();

        sqlx::query("DELETE FROM collection_articles WHERE collection_id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM collections WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }

    async fn add_to_collection(
        &self,
        collection_id: Uuid,
        article_id: &str,
    ) -> Result<(), StateError> {
        let id_str = collection_id.to_string();

        let exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM collections WHERE id = ?")
            .bind(&id_str)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;
        if exists.0 == 0 {
            return Err(StateError::NotFound(format!("collection {}", collection_id)));
        }

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO collection_articles (collection_id, article_id, position)
            VALUES (?, ?, (
                SELECT COALESCE(MAX(position) + 1, 0)
                FROM collection_articles WHERE collection_id = ?
            ))
            "#,
        )
        .bind(&id_str)
        .bind(article_id)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }

    async fn remove_from_collection(
        &self,
        collection_id: Uuid,
        article_id: &str,
    ) -> Result<(), StateError> {
        sqlx::query(
            "DELETE FROM collection_articles WHERE collection_id = ? AND article_id = ?",
        )
        .bind(collection_id.to_string())
        .bind(article_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }

    async fn is_in_collection(
        &self,
        collection_id: Uuid,
        article_id: &str,
    ) -> Result<bool, StateError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM collection_articles WHERE collection_id = ? AND article_id = ?",
        )
        .bind(collection_id.to_string())
        .bind(article_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(count.0 > 0)
    }

    async fn collections_for_article(
        &self,
        article_id: &str,
    ) -> Result<Vec<Collection>, StateError> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            r#"
            SELECT c.id, c.name, c.description, c.color, c.created_at
            FROM collections c
            JOIN collection_articles ca ON ca.collection_id = c.id
            WHERE ca.article_id = ?
            ORDER BY c.created_at
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        let mut collections = Vec::with_capacity(rows.len());
        for row in rows {
            collections.push(self.load_collection_row(row).await?);
        }
        Ok(collections)
    }
}
