use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::app::dto;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/notification", get(get_notification).delete(dismiss_notification))
}

/// Current banner, or `null` once dismissed or expired.
pub async fn get_notification(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let tracker = services.tracker().await;
    Json(dto::notification_to_json(tracker.notification())).into_response()
}

pub async fn dismiss_notification(Extension(services): Extension<Arc<AppServices>>) -> Response {
    services.tracker().await.dismiss_notification();
    StatusCode::NO_CONTENT.into_response()
}
