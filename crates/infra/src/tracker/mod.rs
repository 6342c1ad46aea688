//! Inventory list manager.
//!
//! `PantryTracker` owns the application state of the tracker and is the only
//! place that state changes. User commands go through the methods below; the
//! item list itself is replaced only from the storage subscription, never
//! optimistically. Callers are expected to serialize access (one logical
//! thread), e.g. behind a single async mutex.
//!
//! ```text
//! command ──► validate ──► plan (pure) ──► ItemCollection write
//!                                                │
//!             TrackerState.items ◄── Subscription ◄┘ (snapshot push)
//! ```

use chrono::{DateTime, Utc};
use pantry_core::ItemId;
use pantry_inventory::{
    ItemDraft, ItemPatch, PantryItem, QuantityChange, SearchView, UpsertPlan, plan_decrease,
    plan_increase, plan_upsert,
};

use crate::collection::{ItemCollection, ItemFilter, Subscription};
use crate::recommendations::{RecipeRecommender, RecommendationError};

pub mod error;
pub mod notification;

pub use error::TrackerError;
pub use notification::{AUTO_DISMISS_SECS, Notification, Severity};

pub const MSG_ADDED: &str = "Item added successfully!";
pub const MSG_ADD_FAILED: &str = "Failed to add or update item.";
pub const MSG_UPDATE_FAILED: &str = "Failed to update item.";
pub const MSG_DELETE_FAILED: &str = "Failed to delete item.";
pub const MSG_RATE_LIMITED: &str = "Rate limit exceeded. Please try again later.";
pub const MSG_RECIPES_FAILED: &str = "Error fetching recipes.";

pub const RECIPES_PLACEHOLDER: &str = "No recipes available.";
pub const RECIPES_LOADING: &str = "Loading...";

/// Everything the surface renders.
#[derive(Debug, Clone, Default)]
pub struct TrackerState {
    items: Vec<PantryItem>,
    form: ItemDraft,
    search: String,
    notification: Option<Notification>,
    recipes: Option<String>,
    loading: bool,
    recipe_ticket: u64,
}

impl TrackerState {
    /// Records in the order the collection delivered them.
    pub fn items(&self) -> &[PantryItem] {
        &self.items
    }

    pub fn form(&self) -> &ItemDraft {
        &self.form
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last successful recommendation, if any.
    pub fn recipes(&self) -> Option<&str> {
        self.recipes.as_deref()
    }

    /// Text for the recipe panel.
    pub fn recipes_text(&self) -> &str {
        if self.loading {
            return RECIPES_LOADING;
        }
        match self.recipes.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => RECIPES_PLACEHOLDER,
        }
    }
}

/// A recipe request handed out by [`PantryTracker::begin_recipe_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRequest {
    pub ticket: u64,
    pub items: Vec<String>,
}

#[derive(Debug)]
pub struct PantryTracker<C, R> {
    collection: C,
    recommender: R,
    subscription: Subscription,
    state: TrackerState,
}

impl<C, R> PantryTracker<C, R>
where
    C: ItemCollection,
    R: RecipeRecommender,
{
    /// Subscribe to the whole collection and take its current snapshot.
    pub fn new(collection: C, recommender: R) -> Self {
        let mut subscription = collection.subscribe(ItemFilter::All);
        let items = subscription.take();
        tracing::info!(count = items.len(), "pantry subscription established");

        Self {
            collection,
            recommender,
            subscription,
            state: TrackerState {
                items,
                ..TrackerState::default()
            },
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn recommender(&self) -> &R {
        &self.recommender
    }

    /// Apply the latest snapshot if one arrived. Returns whether it did.
    pub fn sync(&mut self) -> bool {
        if !self.subscription.has_changed() {
            return false;
        }
        self.state.items = self.subscription.take();
        tracing::debug!(count = self.state.items.len(), "applied pantry snapshot");
        true
    }

    /// Wait for the collection to change, then apply the new snapshot.
    pub async fn next_change(&mut self) -> Result<(), TrackerError> {
        self.state.items = self.subscription.changed().await?;
        tracing::debug!(count = self.state.items.len(), "applied pantry snapshot");
        Ok(())
    }

    pub fn items(&mut self) -> &[PantryItem] {
        self.sync();
        &self.state.items
    }

    pub fn find(&mut self, id: ItemId) -> Option<&PantryItem> {
        self.sync();
        self.state.items.iter().find(|i| i.id == id)
    }

    // ---------------------------------------------------------------------
    // Form
    // ---------------------------------------------------------------------

    pub fn form(&self) -> &ItemDraft {
        &self.state.form
    }

    pub fn set_form(&mut self, draft: ItemDraft) {
        self.state.form = draft;
    }

    /// Add-or-increment from the current form.
    ///
    /// Validation failures never reach storage. On success the form is
    /// cleared; on any failure it is kept so the user can retry.
    pub async fn submit(&mut self) -> Result<ItemId, TrackerError> {
        self.sync();

        let draft = match self.state.form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                tracing::debug!(reason = %e, "rejected pantry form");
                self.notify(Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        let plan = match plan_upsert(&self.state.items, &draft) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, name = draft.name(), "cannot merge into stored item");
                self.notify(Notification::error(MSG_ADD_FAILED));
                return Err(e.into());
            }
        };

        let written = match plan {
            UpsertPlan::Create(new) => self.collection.create(new).await,
            UpsertPlan::Update { id, patch } => self.collection.update(id, patch).await.map(|()| id),
        };

        match written {
            Ok(id) => {
                tracing::info!(%id, name = draft.name(), delta = draft.delta(), "pantry item added");
                self.state.form = ItemDraft::default();
                self.notify(Notification::success(MSG_ADDED));
                self.sync();
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(error = %e, name = draft.name(), "failed to add or update item");
                self.notify(Notification::error(MSG_ADD_FAILED));
                Err(e.into())
            }
        }
    }

    /// Replace the form with `draft` and submit it.
    pub async fn add(&mut self, draft: ItemDraft) -> Result<ItemId, TrackerError> {
        self.set_form(draft);
        self.submit().await
    }

    // ---------------------------------------------------------------------
    // Per-item controls
    // ---------------------------------------------------------------------

    /// +1 on the quantity the caller rendered (or the local snapshot's when `None`).
    pub async fn increase(
        &mut self,
        id: ItemId,
        rendered: Option<&str>,
    ) -> Result<QuantityChange, TrackerError> {
        let current = self.rendered_quantity(id, rendered)?;
        let change = self.plan_or_notify(plan_increase(id, &current))?;
        self.apply_change(change).await
    }

    /// −1 on the rendered quantity, removing the record when it reaches zero.
    pub async fn decrease(
        &mut self,
        id: ItemId,
        rendered: Option<&str>,
    ) -> Result<QuantityChange, TrackerError> {
        let current = self.rendered_quantity(id, rendered)?;
        let change = self.plan_or_notify(plan_decrease(id, &current))?;
        self.apply_change(change).await
    }

    pub async fn delete(&mut self, id: ItemId) -> Result<(), TrackerError> {
        if let Err(e) = self.collection.delete(id).await {
            tracing::warn!(error = %e, %id, "failed to delete item");
            self.notify(Notification::error(MSG_DELETE_FAILED));
            return Err(e.into());
        }
        tracing::info!(%id, "pantry item deleted");
        self.sync();
        Ok(())
    }

    /// The id must be in the current snapshot even when the caller supplies
    /// the quantity.
    fn rendered_quantity(&mut self, id: ItemId, rendered: Option<&str>) -> Result<String, TrackerError> {
        let Some(stored) = self.find(id).map(|item| item.quantity.clone()) else {
            tracing::warn!(%id, "quantity change for unknown item");
            self.notify(Notification::error(MSG_UPDATE_FAILED));
            return Err(TrackerError::NotFound(id));
        };
        Ok(rendered.map_or(stored, str::to_string))
    }

    fn plan_or_notify(
        &mut self,
        plan: pantry_core::DomainResult<QuantityChange>,
    ) -> Result<QuantityChange, TrackerError> {
        plan.map_err(|e| {
            tracing::warn!(error = %e, "cannot adjust quantity");
            self.notify(Notification::error(MSG_UPDATE_FAILED));
            e.into()
        })
    }

    async fn apply_change(&mut self, change: QuantityChange) -> Result<QuantityChange, TrackerError> {
        let written = match change {
            QuantityChange::Set { id, quantity } => {
                self.collection.update(id, ItemPatch::quantity(quantity)).await
            }
            QuantityChange::Remove { id } => self.collection.delete(id).await,
        };

        if let Err(e) = written {
            tracing::warn!(error = %e, id = %change.id(), "failed to update item quantity");
            self.notify(Notification::error(MSG_UPDATE_FAILED));
            return Err(e.into());
        }

        tracing::info!(?change, "pantry quantity changed");
        self.sync();
        Ok(change)
    }

    // ---------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------

    pub fn search(&self) -> &str {
        &self.state.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
    }

    /// Items matching the stored search string.
    pub fn visible(&mut self) -> SearchView<'_> {
        self.sync();
        SearchView::new(&self.state.items, &self.state.search)
    }

    /// Items matching `search`, leaving the stored search string alone.
    pub fn view(&mut self, search: &str) -> SearchView<'_> {
        self.sync();
        SearchView::new(&self.state.items, search)
    }

    // ---------------------------------------------------------------------
    // Recipes
    // ---------------------------------------------------------------------

    /// Mark a request in flight and return the item names to send.
    ///
    /// Starting a request supersedes any request still in flight.
    pub fn begin_recipe_request(&mut self) -> RecipeRequest {
        self.sync();
        self.state.loading = true;
        self.state.recipe_ticket += 1;
        RecipeRequest {
            ticket: self.state.recipe_ticket,
            items: self.state.items.iter().map(|i| i.name.clone()).collect(),
        }
    }

    /// Record the outcome of a request started with [`Self::begin_recipe_request`].
    ///
    /// Failures never clear previously rendered text. Outcomes of superseded
    /// requests are dropped.
    pub fn finish_recipe_request(
        &mut self,
        ticket: u64,
        result: Result<String, RecommendationError>,
    ) -> Result<(), TrackerError> {
        if ticket != self.state.recipe_ticket {
            tracing::debug!(ticket, latest = self.state.recipe_ticket, "dropping superseded recipe response");
            return Ok(());
        }

        self.state.loading = false;
        match result {
            Ok(text) => {
                tracing::info!(len = text.len(), "recipe recommendations received");
                self.state.recipes = Some(text);
                Ok(())
            }
            Err(RecommendationError::RateLimited) => {
                tracing::warn!("recipe recommendations rate limited");
                self.notify(Notification::error(MSG_RATE_LIMITED));
                Err(TrackerError::RateLimited)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch recipe recommendations");
                self.notify(Notification::error(MSG_RECIPES_FAILED));
                Err(e.into())
            }
        }
    }

    /// Request and record recommendations in one step.
    pub async fn fetch_recipes(&mut self) -> Result<(), TrackerError> {
        let request = self.begin_recipe_request();
        let result = self.recommender.recommend(request.items).await;
        self.finish_recipe_request(request.ticket, result)
    }

    // ---------------------------------------------------------------------
    // Notifications
    // ---------------------------------------------------------------------

    /// The banner, if still within its display window.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification_at(Utc::now())
    }

    pub fn notification_at(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.state
            .notification
            .as_ref()
            .filter(|n| n.is_visible_at(now))
    }

    pub fn dismiss_notification(&mut self) {
        self.state.notification = None;
    }

    fn notify(&mut self, notification: Notification) {
        self.state.notification = Some(notification);
    }

    /// Tear down the storage subscription.
    pub fn shutdown(self) {
        drop(self.subscription);
        tracing::info!("pantry subscription closed");
    }
}

#[cfg(test)]
mod tests;
