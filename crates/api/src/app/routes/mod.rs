use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use pantry_core::ItemId;
use pantry_infra::TrackerError;
use pantry_infra::tracker::MSG_ADDED;

use crate::app::{dto, errors, services::Tracker};

pub mod form;
pub mod items;
pub mod notification;
pub mod recipes;
pub mod system;

/// Router for every pantry endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .route("/categories", get(system::categories))
        .route("/stream", get(system::stream))
        .merge(items::router())
        .merge(form::router())
        .merge(recipes::router())
        .merge(notification::router())
}

/// Response for a successful add-or-increment.
fn added(tracker: &mut Tracker, id: ItemId) -> Response {
    let item = tracker.find(id).map(dto::ItemView::from);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "id": id.to_string(),
            "item": item,
            "message": MSG_ADDED,
        })),
    )
        .into_response()
}

/// Error response carrying the banner text the tracker raised for `err`.
fn failure(tracker: &Tracker, err: TrackerError) -> Response {
    let shown = tracker.notification().map(|n| n.message.as_str());
    errors::tracker_error_to_response(err, shown)
}
