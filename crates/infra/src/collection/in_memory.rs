//! In-memory collection for tests/dev.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use pantry_core::ItemId;
use pantry_inventory::{ItemPatch, NewItem, PantryItem};

use super::{ItemCollection, ItemFilter, Snapshot, StorageError, Subscription};

/// In-memory realtime collection.
///
/// - Records keep insertion order
/// - Every write publishes the full snapshot before returning
#[derive(Debug)]
pub struct InMemoryItemCollection {
    items: Mutex<Vec<PantryItem>>,
    tx: watch::Sender<Snapshot>,
}

impl InMemoryItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with existing records (ids kept as given).
    pub fn with_items(items: Vec<PantryItem>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(items.clone()));
        Self {
            items: Mutex::new(items),
            tx,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut Vec<PantryItem>) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| StorageError::backend("in-memory collection lock poisoned"))?;
        let out = f(&mut items)?;
        self.tx.send_replace(Arc::new(items.clone()));
        Ok(out)
    }
}

impl Default for InMemoryItemCollection {
    fn default() -> Self {
        Self::with_items(Vec::new())
    }
}

#[async_trait]
impl ItemCollection for InMemoryItemCollection {
    async fn create(&self, item: NewItem) -> Result<ItemId, StorageError> {
        self.write(|items| {
            let id = ItemId::new();
            items.push(item.into_item(id));
            Ok(id)
        })
    }

    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<(), StorageError> {
        self.write(|items| {
            let item = items
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or(StorageError::NotFound(id))?;
            patch.apply_to(item);
            Ok(())
        })
    }

    async fn delete(&self, id: ItemId) -> Result<(), StorageError> {
        self.write(|items| {
            items.retain(|i| i.id != id);
            Ok(())
        })
    }

    fn subscribe(&self, filter: ItemFilter) -> Subscription {
        Subscription::new(self.tx.subscribe(), filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_inventory::Category;

    fn new_item(name: &str, quantity: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            quantity: quantity.to_string(),
            category: Category::Dairy,
            unit: String::new(),
        }
    }

    #[tokio::test]
    async fn create_publishes_snapshot_before_returning() {
        let collection = InMemoryItemCollection::new();
        let mut sub = collection.subscribe(ItemFilter::All);
        assert!(sub.take().is_empty());

        let id = collection.create(new_item("Milk", "2")).await.unwrap();

        assert!(sub.has_changed());
        let items = sub.take();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, id);
        assert_eq!(items[0].quantity, "2");
    }

    #[tokio::test]
    async fn snapshot_keeps_insertion_order() {
        let collection = InMemoryItemCollection::new();
        for name in ["Milk", "Butter", "Cream"] {
            collection.create(new_item(name, "1")).await.unwrap();
        }
        let names: Vec<_> = collection.snapshot().iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, ["Milk", "Butter", "Cream"]);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let collection = InMemoryItemCollection::new();
        let id = ItemId::new();
        let err = collection.update(id, ItemPatch::quantity(3)).await.unwrap_err();
        assert_eq!(err, StorageError::NotFound(id));
    }

    #[tokio::test]
    async fn update_writes_only_patched_fields() {
        let collection = InMemoryItemCollection::new();
        let id = collection
            .create(NewItem { unit: "l".to_string(), ..new_item("Milk", "1") })
            .await
            .unwrap();

        collection.update(id, ItemPatch::quantity(4)).await.unwrap();

        let item = collection.snapshot()[0].clone();
        assert_eq!(item.quantity, "4");
        assert_eq!(item.unit, "l");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let collection = InMemoryItemCollection::new();
        let id = collection.create(new_item("Milk", "1")).await.unwrap();

        collection.delete(id).await.unwrap();
        collection.delete(id).await.unwrap();

        assert!(collection.snapshot().is_empty());
    }

    #[tokio::test]
    async fn changed_wakes_on_write() {
        let collection = Arc::new(InMemoryItemCollection::new());
        let mut sub = collection.subscribe(ItemFilter::All);

        let writer = collection.clone();
        let handle = tokio::spawn(async move {
            writer.create(new_item("Milk", "1")).await.unwrap();
        });

        let items = sub.changed().await.unwrap();
        handle.await.unwrap();
        assert_eq!(items.len(), 1);
    }
}
