use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::{Mutex, MutexGuard, watch};
use tokio_stream::{StreamExt, wrappers::WatchStream};

use pantry_inventory::PantryItem;
use pantry_infra::{
    HttpRecipeRecommender, InMemoryItemCollection, ItemCollection, ItemFilter, PantryTracker,
    RecipeRecommender, SqliteItemCollection, StorageError,
};

use crate::app::dto;
use crate::config::{ApiConfig, StoreBackend};

pub type DynCollection = Arc<dyn ItemCollection>;
pub type DynRecommender = Arc<dyn RecipeRecommender>;
pub type Tracker = PantryTracker<DynCollection, DynRecommender>;

/// SSE event name carrying a full item snapshot.
pub const SNAPSHOT_EVENT: &str = "items.snapshot";

/// Tells long-lived responses to finish so graceful shutdown can drain
/// connections.
#[derive(Debug, Clone)]
pub struct ShutdownSignal(Arc<watch::Sender<bool>>);

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self(Arc::new(tx))
    }

    pub fn trigger(&self) {
        self.0.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.0.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.0.subscribe()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state behind every handler.
///
/// Tracker commands are serialized by the mutex. The collection and
/// recommender handles are kept alongside so that the recipe request and the
/// SSE stream can run without holding the lock.
pub struct AppServices {
    tracker: Mutex<Tracker>,
    collection: DynCollection,
    recommender: DynRecommender,
    shutdown: ShutdownSignal,
}

impl AppServices {
    pub fn new(collection: DynCollection, recommender: DynRecommender) -> Self {
        let tracker = PantryTracker::new(collection.clone(), recommender.clone());
        Self {
            tracker: Mutex::new(tracker),
            collection,
            recommender,
            shutdown: ShutdownSignal::new(),
        }
    }

    pub async fn tracker(&self) -> MutexGuard<'_, Tracker> {
        self.tracker.lock().await
    }

    pub fn collection(&self) -> &DynCollection {
        &self.collection
    }

    pub fn recommender(&self) -> &DynRecommender {
        &self.recommender
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Hand back the tracker for an orderly shutdown.
    pub fn into_tracker(self) -> Tracker {
        self.tracker.into_inner()
    }
}

pub async fn build_services(config: &ApiConfig) -> Result<AppServices, StorageError> {
    let collection: DynCollection = match config.store {
        StoreBackend::Memory => {
            tracing::info!("using in-memory item collection");
            Arc::new(InMemoryItemCollection::new())
        }
        StoreBackend::Sqlite => {
            tracing::info!(url = %config.sqlite_url, "using sqlite item collection");
            Arc::new(SqliteItemCollection::connect(&config.sqlite_url).await?)
        }
    };

    let recommender: DynRecommender = Arc::new(HttpRecipeRecommender::new(config.recipes_url.clone()));
    tracing::info!(endpoint = %config.recipes_url, "recipe recommender configured");

    Ok(AppServices::new(collection, recommender))
}

enum StreamFrame {
    Items(Vec<PantryItem>),
    Shutdown,
}

/// Push the current snapshot, then one event per collection change, until
/// shutdown is signalled.
pub fn items_sse_stream(
    services: Arc<AppServices>,
    filter: ItemFilter,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let items = services
        .collection()
        .subscribe(filter)
        .into_stream()
        .map(StreamFrame::Items);
    let stop = WatchStream::new(services.shutdown_signal().subscribe())
        .filter(|stopping| *stopping)
        .map(|_| StreamFrame::Shutdown);

    let stream = items
        .merge(stop)
        .take_while(|frame| matches!(frame, StreamFrame::Items(_)))
        .filter_map(|frame| match frame {
            StreamFrame::Items(items) => Some(items),
            StreamFrame::Shutdown => None,
        })
        .map(|items| {
            let views: Vec<dto::ItemView> = items.iter().map(dto::ItemView::from).collect();
            let data = serde_json::to_string(&views).unwrap_or_else(|_| "[]".to_string());
            Ok(SseEvent::default().event(SNAPSHOT_EVENT).data(data))
        });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
