//! SQLite-backed collection.
//!
//! Records live in a single `items` table; insertion order is kept through an
//! autoincrement `seq` column. After each write the full table is re-read and
//! published to subscribers, so subscribers always see what is persisted.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tokio::sync::watch;

use pantry_core::ItemId;
use pantry_inventory::{Category, ItemPatch, NewItem, PantryItem};

use super::{ItemCollection, ItemFilter, Snapshot, StorageError, Subscription};

impl From<sqlx::Error> for StorageError {
    fn from(value: sqlx::Error) -> Self {
        StorageError::Backend(value.to_string())
    }
}

#[derive(Debug)]
pub struct SqliteItemCollection {
    pool: SqlitePool,
    tx: watch::Sender<Snapshot>,
}

impl SqliteItemCollection {
    /// Open (or create) the database at `url` and load the current snapshot.
    ///
    /// In-memory URLs are pinned to one long-lived connection, since every
    /// SQLite memory connection is its own database.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let mut options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(5));
        if url.contains(":memory:") || url.contains("mode=memory") {
            options = options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options.connect(url).await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                seq      INTEGER PRIMARY KEY AUTOINCREMENT,
                id       TEXT NOT NULL UNIQUE,
                name     TEXT NOT NULL,
                quantity TEXT NOT NULL,
                category TEXT NOT NULL,
                unit     TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&pool)
        .await?;

        let items = load_all(&pool).await?;
        tracing::debug!(count = items.len(), "loaded pantry items from sqlite");

        let (tx, _rx) = watch::channel(Arc::new(items));
        Ok(Self { pool, tx })
    }

    async fn publish(&self) -> Result<(), StorageError> {
        let items = load_all(&self.pool).await?;
        self.tx.send_replace(Arc::new(items));
        Ok(())
    }
}

async fn load_all(pool: &SqlitePool) -> Result<Vec<PantryItem>, StorageError> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, quantity, category, unit
        FROM items
        ORDER BY seq ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_item).collect()
}

fn row_to_item(row: &SqliteRow) -> Result<PantryItem, StorageError> {
    let id: String = row.try_get("id")?;
    let category: String = row.try_get("category")?;

    Ok(PantryItem {
        id: id
            .parse()
            .map_err(|e| StorageError::backend(format!("bad id column: {e}")))?,
        name: row.try_get("name")?,
        quantity: row.try_get("quantity")?,
        category: category
            .parse::<Category>()
            .map_err(|e| StorageError::backend(format!("bad category column: {e}")))?,
        unit: row.try_get("unit")?,
    })
}

#[async_trait]
impl ItemCollection for SqliteItemCollection {
    async fn create(&self, item: NewItem) -> Result<ItemId, StorageError> {
        let id = ItemId::new();
        sqlx::query(
            r#"
            INSERT INTO items (id, name, quantity, category, unit)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(id.to_string())
        .bind(&item.name)
        .bind(&item.quantity)
        .bind(item.category.label())
        .bind(&item.unit)
        .execute(&self.pool)
        .await?;

        self.publish().await?;
        Ok(id)
    }

    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<(), StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET quantity = COALESCE(?2, quantity),
                unit     = COALESCE(?3, unit)
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .bind(patch.quantity)
        .bind(patch.unit)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }

        self.publish().await
    }

    async fn delete(&self, id: ItemId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        self.publish().await
    }

    fn subscribe(&self, filter: ItemFilter) -> Subscription {
        Subscription::new(self.tx.subscribe(), filter)
    }
}
