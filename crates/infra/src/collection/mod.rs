//! Storage collaborator: a realtime collection of pantry records.
//!
//! The collection is the single source of truth. Writers call
//! `create`/`update`/`delete`; readers hold a [`Subscription`] that always
//! exposes the latest full snapshot. Only the latest snapshot is kept; a slow
//! reader skips intermediate states.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tokio_stream::{Stream, StreamExt, wrappers::WatchStream};

use pantry_core::ItemId;
use pantry_inventory::{Category, ItemPatch, NewItem, PantryItem};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryItemCollection;
pub use sqlite::SqliteItemCollection;

/// Full collection contents as published on every change.
pub type Snapshot = Arc<Vec<PantryItem>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("collection closed")]
    Closed,
}

impl StorageError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Which records a subscription sees.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ItemFilter {
    #[default]
    All,
    Category(Category),
}

impl ItemFilter {
    pub fn matches(&self, item: &PantryItem) -> bool {
        match self {
            ItemFilter::All => true,
            ItemFilter::Category(c) => item.category == *c,
        }
    }

    fn apply(&self, snapshot: &[PantryItem]) -> Vec<PantryItem> {
        snapshot.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

/// Live view of a collection. Dropping it unsubscribes.
#[derive(Debug, Clone)]
pub struct Subscription {
    rx: watch::Receiver<Snapshot>,
    filter: ItemFilter,
}

impl Subscription {
    pub fn new(rx: watch::Receiver<Snapshot>, filter: ItemFilter) -> Self {
        Self { rx, filter }
    }

    pub fn filter(&self) -> ItemFilter {
        self.filter
    }

    /// Whether a snapshot arrived that has not been taken yet.
    ///
    /// A closed collection reports `false`.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Latest matching records without marking them seen.
    pub fn current(&self) -> Vec<PantryItem> {
        self.filter.apply(&self.rx.borrow())
    }

    /// Latest matching records, marking them seen.
    pub fn take(&mut self) -> Vec<PantryItem> {
        let snapshot = self.rx.borrow_and_update().clone();
        self.filter.apply(&snapshot)
    }

    /// Wait for the next change and return the matching records.
    pub async fn changed(&mut self) -> Result<Vec<PantryItem>, StorageError> {
        self.rx.changed().await.map_err(|_| StorageError::Closed)?;
        Ok(self.take())
    }

    /// Current snapshot followed by every later change.
    pub fn into_stream(self) -> impl Stream<Item = Vec<PantryItem>> + Send + 'static {
        let filter = self.filter;
        WatchStream::new(self.rx).map(move |snapshot| filter.apply(&snapshot))
    }
}

/// Realtime record collection (storage collaborator).
///
/// Implementations publish a new snapshot to every subscriber after each
/// successful write, before the write call returns.
#[async_trait]
pub trait ItemCollection: Send + Sync {
    /// Insert a record; the collection assigns its id.
    async fn create(&self, item: NewItem) -> Result<ItemId, StorageError>;

    /// Write the `Some` fields of `patch`. Unknown ids fail with `NotFound`.
    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<(), StorageError>;

    /// Remove a record. Deleting an unknown id is a no-op.
    async fn delete(&self, id: ItemId) -> Result<(), StorageError>;

    fn subscribe(&self, filter: ItemFilter) -> Subscription;
}

#[async_trait]
impl<C> ItemCollection for Arc<C>
where
    C: ItemCollection + ?Sized,
{
    async fn create(&self, item: NewItem) -> Result<ItemId, StorageError> {
        (**self).create(item).await
    }

    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<(), StorageError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: ItemId) -> Result<(), StorageError> {
        (**self).delete(id).await
    }

    fn subscribe(&self, filter: ItemFilter) -> Subscription {
        (**self).subscribe(filter)
    }
}
