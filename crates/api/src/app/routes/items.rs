use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post, put},
    Json, Router,
};

use crate::app::routes::{added, failure};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", post(add_item).get(list_items))
        .route("/items/:id", delete(delete_item))
        .route("/items/:id/increase", post(increase))
        .route("/items/:id/decrease", post(decrease))
        .route("/search", put(set_search))
}

/// Fill the form from the body and submit it.
pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ItemRequest>,
) -> Response {
    let mut tracker = services.tracker().await;
    match tracker.add(body.into()).await {
        Ok(id) => added(&mut tracker, id),
        Err(e) => failure(&tracker, e),
    }
}

/// Filtered view. `?search=` overrides the stored search string for this call.
pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ItemsQuery>,
) -> Response {
    let mut tracker = services.tracker().await;
    let search = query.search.unwrap_or_else(|| tracker.search().to_string());
    let view = tracker.view(&search);
    Json(dto::items_to_json(&search, &view)).into_response()
}

pub async fn set_search(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SearchRequest>,
) -> Response {
    let mut tracker = services.tracker().await;
    tracker.set_search(body.search.clone());
    let view = tracker.visible();
    Json(dto::items_to_json(&body.search, &view)).into_response()
}

pub async fn increase(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Option<Json<dto::AdjustRequest>>,
) -> Response {
    let id = match errors::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let rendered = rendered_quantity(body);

    let mut tracker = services.tracker().await;
    match tracker.increase(id, rendered.as_deref()).await {
        Ok(change) => Json(dto::change_to_json(change)).into_response(),
        Err(e) => failure(&tracker, e),
    }
}

pub async fn decrease(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Option<Json<dto::AdjustRequest>>,
) -> Response {
    let id = match errors::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let rendered = rendered_quantity(body);

    let mut tracker = services.tracker().await;
    match tracker.decrease(id, rendered.as_deref()).await {
        Ok(change) => Json(dto::change_to_json(change)).into_response(),
        Err(e) => failure(&tracker, e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id = match errors::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut tracker = services.tracker().await;
    match tracker.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => failure(&tracker, e),
    }
}

fn rendered_quantity(body: Option<Json<dto::AdjustRequest>>) -> Option<String> {
    body.and_then(|Json(req)| req.quantity).map(dto::QuantityInput::into_text)
}
