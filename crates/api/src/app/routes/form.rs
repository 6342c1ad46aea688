use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use pantry_inventory::ItemDraft;

use crate::app::dto;
use crate::app::routes::{added, failure};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/form", get(get_form).put(put_form))
        .route("/form/submit", post(submit_form))
}

pub async fn get_form(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let tracker = services.tracker().await;
    Json(tracker.form().clone()).into_response()
}

pub async fn put_form(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ItemRequest>,
) -> Response {
    let draft = ItemDraft::from(body);
    let mut tracker = services.tracker().await;
    tracker.set_form(draft.clone());
    Json(draft).into_response()
}

/// Submit whatever the form currently holds. It is cleared only on success.
pub async fn submit_form(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let mut tracker = services.tracker().await;
    match tracker.submit().await {
        Ok(id) => added(&mut tracker, id),
        Err(e) => failure(&tracker, e),
    }
}
