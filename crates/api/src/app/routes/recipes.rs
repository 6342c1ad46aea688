use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use pantry_infra::RecipeRecommender;

use crate::app::dto;
use crate::app::routes::failure;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/recipes", post(request_recipes).get(get_recipes))
}

pub async fn get_recipes(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let tracker = services.tracker().await;
    Json(dto::recipes_to_json(tracker.state())).into_response()
}

/// Ask the recommendation service about the current item names.
///
/// The tracker lock is released while the request is in flight. A response
/// to a request overtaken by a newer one is dropped.
pub async fn request_recipes(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let request = services.tracker().await.begin_recipe_request();
    let result = services.recommender().recommend(request.items).await;

    let mut tracker = services.tracker().await;
    match tracker.finish_recipe_request(request.ticket, result) {
        Ok(()) => Json(dto::recipes_to_json(tracker.state())).into_response(),
        Err(e) => failure(&tracker, e),
    }
}
