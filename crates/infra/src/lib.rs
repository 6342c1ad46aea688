//! Infrastructure layer: storage collaborator adapters, the recommendation
//! client, and the tracker that composes them.

pub mod collection;
pub mod recommendations;
pub mod tracker;

pub use collection::{
    InMemoryItemCollection, ItemCollection, ItemFilter, Snapshot, SqliteItemCollection,
    StorageError, Subscription,
};
pub use recommendations::{HttpRecipeRecommender, RecipeRecommender, RecommendationError};
pub use tracker::{
    Notification, PantryTracker, RecipeRequest, Severity, TrackerError, TrackerState,
};
