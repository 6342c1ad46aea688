use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::TimeDelta;

use pantry_inventory::{Category, NewItem};

use super::*;
use crate::collection::{InMemoryItemCollection, StorageError};

/// Replays canned responses and records what it was asked.
#[derive(Debug, Default)]
struct ScriptedRecommender {
    replies: Mutex<VecDeque<Result<String, RecommendationError>>>,
    requests: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRecommender {
    fn replying(replies: impl IntoIterator<Item = Result<String, RecommendationError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn silent() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecipeRecommender for ScriptedRecommender {
    async fn recommend(&self, items: Vec<String>) -> Result<String, RecommendationError> {
        self.requests.lock().unwrap().push(items);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RecommendationError::Status(500)))
    }
}

/// In-memory collection whose writes can be switched off.
#[derive(Debug, Default)]
struct FlakyCollection {
    inner: InMemoryItemCollection,
    down: AtomicBool,
}

impl FlakyCollection {
    fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StorageError::backend("unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemCollection for FlakyCollection {
    async fn create(&self, item: NewItem) -> Result<ItemId, StorageError> {
        self.check()?;
        self.inner.create(item).await
    }

    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<(), StorageError> {
        self.check()?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: ItemId) -> Result<(), StorageError> {
        self.check()?;
        self.inner.delete(id).await
    }

    fn subscribe(&self, filter: ItemFilter) -> Subscription {
        self.inner.subscribe(filter)
    }
}

type TestTracker = PantryTracker<Arc<FlakyCollection>, Arc<ScriptedRecommender>>;

fn tracker() -> (TestTracker, Arc<FlakyCollection>, Arc<ScriptedRecommender>) {
    tracker_with(ScriptedRecommender::silent())
}

fn tracker_with(
    recommender: Arc<ScriptedRecommender>,
) -> (TestTracker, Arc<FlakyCollection>, Arc<ScriptedRecommender>) {
    let collection = Arc::new(FlakyCollection::default());
    let tracker = PantryTracker::new(collection.clone(), recommender.clone());
    (tracker, collection, recommender)
}

fn names(tracker: &mut TestTracker) -> Vec<String> {
    tracker.items().iter().map(|i| i.name.clone()).collect()
}

#[tokio::test]
async fn beans_added_twice_merge_into_one_record() {
    let (mut tracker, _, _) = tracker();

    tracker.add(ItemDraft::new("Beans", "2", "Canned goods")).await.unwrap();
    tracker.add(ItemDraft::new("beans", "3", "Canned goods")).await.unwrap();

    let items = tracker.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Beans");
    assert_eq!(items[0].quantity, "5");
    assert_eq!(items[0].category, Category::CannedGoods);
}

#[tokio::test]
async fn successful_add_clears_form_and_reports_success() {
    let (mut tracker, _, _) = tracker();

    tracker
        .add(ItemDraft::new("Milk", "1", "Dairy").with_unit("l"))
        .await
        .unwrap();

    assert_eq!(tracker.form(), &ItemDraft::default());
    let n = tracker.notification().unwrap();
    assert_eq!(n.message, MSG_ADDED);
    assert_eq!(n.severity, Severity::Success);
    assert_eq!(tracker.items()[0].unit, "l");
}

#[tokio::test]
async fn non_positive_quantity_is_rejected_without_touching_storage() {
    let (mut tracker, collection, _) = tracker();
    // Storage would fail if reached; the validation error must win.
    collection.set_down(true);

    for quantity in ["0", "-1"] {
        let draft = ItemDraft::new("Milk", quantity, "Dairy");
        let err = tracker.add(draft.clone()).await.unwrap_err();

        assert_eq!(err, TrackerError::Validation("Positive amount only.".to_string()));
        assert_eq!(tracker.notification().unwrap().message, "Positive amount only.");
        assert_eq!(tracker.form(), &draft);
    }
    assert!(tracker.items().is_empty());
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let (mut tracker, _, _) = tracker();

    let err = tracker.add(ItemDraft::new("Milk", "1", "")).await.unwrap_err();

    assert!(matches!(err, TrackerError::Validation(_)));
    assert_eq!(tracker.notification().unwrap().severity, Severity::Error);
    assert!(tracker.items().is_empty());
}

#[tokio::test]
async fn storage_failure_keeps_form_and_reports_error() {
    let (mut tracker, collection, _) = tracker();
    collection.set_down(true);

    let draft = ItemDraft::new("Milk", "1", "Dairy");
    let err = tracker.add(draft.clone()).await.unwrap_err();

    assert!(matches!(err, TrackerError::Storage(_)));
    assert_eq!(tracker.form(), &draft);
    assert_eq!(tracker.notification().unwrap().message, MSG_ADD_FAILED);
    assert!(tracker.items().is_empty());
}

#[tokio::test]
async fn increase_and_decrease_use_the_snapshot_quantity_by_default() {
    let (mut tracker, _, _) = tracker();
    let id = tracker.add(ItemDraft::new("Eggs", "2", "Dairy")).await.unwrap();

    tracker.increase(id, None).await.unwrap();
    assert_eq!(tracker.find(id).unwrap().quantity, "3");

    tracker.decrease(id, None).await.unwrap();
    assert_eq!(tracker.find(id).unwrap().quantity, "2");
}

#[tokio::test]
async fn decrease_at_one_removes_the_record() {
    let (mut tracker, _, _) = tracker();
    let id = tracker.add(ItemDraft::new("Eggs", "1", "Dairy")).await.unwrap();

    let change = tracker.decrease(id, None).await.unwrap();

    assert_eq!(change, QuantityChange::Remove { id });
    assert!(tracker.items().is_empty());
}

#[tokio::test]
async fn decrease_from_rendered_zero_still_removes() {
    let (mut tracker, _, _) = tracker();
    let id = tracker.add(ItemDraft::new("Eggs", "4", "Dairy")).await.unwrap();

    let change = tracker.decrease(id, Some("0")).await.unwrap();

    assert_eq!(change, QuantityChange::Remove { id });
    assert!(tracker.find(id).is_none());
}

#[tokio::test]
async fn stale_rendered_quantity_races() {
    let (mut tracker, _, _) = tracker();
    let id = tracker.add(ItemDraft::new("Eggs", "1", "Dairy")).await.unwrap();

    // Two clicks rendered against the same snapshot both write 2.
    tracker.increase(id, Some("1")).await.unwrap();
    tracker.increase(id, Some("1")).await.unwrap();

    assert_eq!(tracker.find(id).unwrap().quantity, "2");
}

#[tokio::test]
async fn unknown_item_is_not_found() {
    let (mut tracker, _, _) = tracker();
    let id = ItemId::new();

    assert_eq!(tracker.increase(id, None).await.unwrap_err(), TrackerError::NotFound(id));
    assert_eq!(
        tracker.increase(id, Some("3")).await.unwrap_err(),
        TrackerError::NotFound(id)
    );
    assert_eq!(tracker.notification().unwrap().message, MSG_UPDATE_FAILED);
}

#[tokio::test]
async fn decrease_to_zero_on_unknown_item_is_not_found() {
    let (mut tracker, collection, _) = tracker();
    tracker.add(ItemDraft::new("Eggs", "2", "Dairy")).await.unwrap();
    let id = ItemId::new();

    for rendered in [Some("1"), Some("0"), None] {
        assert_eq!(
            tracker.decrease(id, rendered).await.unwrap_err(),
            TrackerError::NotFound(id)
        );
    }
    assert_eq!(tracker.notification().unwrap().message, MSG_UPDATE_FAILED);
    assert_eq!(collection.inner.snapshot().len(), 1);
}

#[tokio::test]
async fn delete_failure_is_reported() {
    let (mut tracker, collection, _) = tracker();
    let id = tracker.add(ItemDraft::new("Eggs", "1", "Dairy")).await.unwrap();
    collection.set_down(true);

    assert!(matches!(tracker.delete(id).await, Err(TrackerError::Storage(_))));
    assert_eq!(tracker.notification().unwrap().message, MSG_DELETE_FAILED);
    assert_eq!(tracker.items().len(), 1);

    collection.set_down(false);
    tracker.delete(id).await.unwrap();
    assert!(tracker.items().is_empty());
}

#[tokio::test]
async fn external_writes_arrive_through_the_subscription() {
    let (mut tracker, collection, _) = tracker();

    collection
        .inner
        .create(NewItem {
            name: "Paprika".to_string(),
            quantity: "1".to_string(),
            category: Category::Spices,
            unit: String::new(),
        })
        .await
        .unwrap();

    assert!(tracker.sync());
    assert_eq!(names(&mut tracker), ["Paprika"]);
    assert!(!tracker.sync());
}

#[tokio::test]
async fn next_change_waits_for_the_collection() {
    let (mut tracker, collection, _) = tracker();

    let writer = collection.clone();
    let handle = tokio::spawn(async move {
        writer
            .create(NewItem {
                name: "Cumin".to_string(),
                quantity: "2".to_string(),
                category: Category::Spices,
                unit: String::new(),
            })
            .await
            .unwrap();
    });

    tracker.next_change().await.unwrap();
    handle.await.unwrap();
    assert_eq!(tracker.state().items().len(), 1);
}

#[tokio::test]
async fn visible_applies_stored_search() {
    let (mut tracker, _, _) = tracker();
    tracker.add(ItemDraft::new("Bagel", "1", "Bread and Bakery")).await.unwrap();
    tracker.add(ItemDraft::new("Bread crumbs", "1", "Canned goods")).await.unwrap();
    tracker.add(ItemDraft::new("Milk", "1", "Dairy")).await.unwrap();

    tracker.set_search("BREAD");
    let visible: Vec<_> = tracker.visible().iter().map(|i| i.name.clone()).collect();
    assert_eq!(visible, ["Bread crumbs", "Bagel"]);

    let all: Vec<_> = tracker.view("").iter().map(|i| i.name.clone()).collect();
    assert_eq!(all, ["Bagel", "Bread crumbs", "Milk"]);
    assert_eq!(tracker.search(), "BREAD");
}

#[tokio::test]
async fn recipes_are_requested_with_item_names() {
    let recommender = ScriptedRecommender::replying([Ok("Bean chili".to_string())]);
    let (mut tracker, _, recommender) = tracker_with(recommender);
    tracker.add(ItemDraft::new("Beans", "2", "Canned goods")).await.unwrap();
    tracker.add(ItemDraft::new("Paprika", "1", "Spices")).await.unwrap();

    assert_eq!(tracker.state().recipes_text(), RECIPES_PLACEHOLDER);
    tracker.fetch_recipes().await.unwrap();

    assert_eq!(recommender.requests(), [vec!["Beans".to_string(), "Paprika".to_string()]]);
    assert_eq!(tracker.state().recipes_text(), "Bean chili");
    assert!(!tracker.state().is_loading());
}

#[tokio::test]
async fn rate_limit_keeps_previous_recipes() {
    let recommender = ScriptedRecommender::replying([
        Ok("Bean chili".to_string()),
        Err(RecommendationError::RateLimited),
    ]);
    let (mut tracker, _, _) = tracker_with(recommender);

    tracker.fetch_recipes().await.unwrap();
    let err = tracker.fetch_recipes().await.unwrap_err();

    assert_eq!(err, TrackerError::RateLimited);
    assert_eq!(
        tracker.notification().unwrap().message,
        "Rate limit exceeded. Please try again later."
    );
    assert_eq!(tracker.state().recipes(), Some("Bean chili"));
    assert!(!tracker.state().is_loading());
}

#[tokio::test]
async fn other_recipe_failures_show_generic_message() {
    let recommender = ScriptedRecommender::replying([
        Ok("Soup".to_string()),
        Err(RecommendationError::Network("connection refused".to_string())),
    ]);
    let (mut tracker, _, _) = tracker_with(recommender);

    tracker.fetch_recipes().await.unwrap();
    let err = tracker.fetch_recipes().await.unwrap_err();

    assert!(matches!(err, TrackerError::Recommendation(RecommendationError::Network(_))));
    assert_eq!(tracker.notification().unwrap().message, MSG_RECIPES_FAILED);
    assert_eq!(tracker.state().recipes_text(), "Soup");
}

#[tokio::test]
async fn loading_text_shows_while_request_is_in_flight() {
    let (mut tracker, _, _) = tracker();

    let request = tracker.begin_recipe_request();
    assert!(request.items.is_empty());
    assert_eq!(tracker.state().recipes_text(), RECIPES_LOADING);

    tracker.finish_recipe_request(request.ticket, Ok("Toast".to_string())).unwrap();
    assert_eq!(tracker.state().recipes_text(), "Toast");
}

#[tokio::test]
async fn superseded_recipe_responses_are_dropped() {
    let (mut tracker, _, _) = tracker();

    let older = tracker.begin_recipe_request();
    let newer = tracker.begin_recipe_request();
    assert!(newer.ticket > older.ticket);

    // The older request finishing first leaves the newer one loading.
    tracker.finish_recipe_request(older.ticket, Ok("Stale soup".to_string())).unwrap();
    assert!(tracker.state().is_loading());
    assert_eq!(tracker.state().recipes(), None);

    tracker.finish_recipe_request(newer.ticket, Ok("Fresh salad".to_string())).unwrap();
    assert!(!tracker.state().is_loading());

    // A late failure from the older request changes nothing either.
    tracker
        .finish_recipe_request(older.ticket, Err(RecommendationError::RateLimited))
        .unwrap();
    assert_eq!(tracker.state().recipes_text(), "Fresh salad");
}

#[tokio::test]
async fn notification_auto_dismisses_and_can_be_closed() {
    let (mut tracker, _, _) = tracker();
    tracker.add(ItemDraft::new("Milk", "1", "Dairy")).await.unwrap();

    let raised = tracker.notification().unwrap().raised_at;
    assert!(tracker.notification_at(raised + TimeDelta::seconds(5)).is_some());
    assert!(tracker.notification_at(raised + TimeDelta::seconds(AUTO_DISMISS_SECS)).is_none());

    tracker.dismiss_notification();
    assert!(tracker.notification().is_none());
}

#[tokio::test]
async fn shutdown_drops_the_subscription() {
    let collection = Arc::new(InMemoryItemCollection::new());
    let tracker = PantryTracker::new(collection.clone(), ScriptedRecommender::silent());
    assert_eq!(collection.subscriber_count(), 1);
    tracker.shutdown();
    assert_eq!(collection.subscriber_count(), 0);

    // Writes keep working with no subscribers left.
    collection
        .create(NewItem {
            name: "Salt".to_string(),
            quantity: "1".to_string(),
            category: Category::Spices,
            unit: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(collection.snapshot().len(), 1);
}
