use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{sse::Event as SseEvent, IntoResponse},
    Json,
};

use pantry_infra::ItemFilter;

use crate::app::dto;
use crate::app::services::{self, AppServices};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn categories() -> impl IntoResponse {
    Json(dto::categories_to_json())
}

/// Live item list; `?category=` narrows it to one category.
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::StreamQuery>,
) -> axum::response::Sse<impl tokio_stream::Stream<Item = Result<SseEvent, std::convert::Infallible>>> {
    let filter = query.category.map(ItemFilter::Category).unwrap_or_default();
    services::items_sse_stream(services, filter)
}
