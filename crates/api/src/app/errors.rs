use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pantry_core::ItemId;
use pantry_infra::TrackerError;
use pantry_infra::tracker::MSG_RATE_LIMITED;

/// Map a tracker failure to a response.
///
/// `shown` is the banner the tracker raised for this failure; its text is
/// what the user sees, so it becomes the response message when present.
pub fn tracker_error_to_response(err: TrackerError, shown: Option<&str>) -> axum::response::Response {
    let message = |fallback: String| shown.map(str::to_string).unwrap_or(fallback);

    match err {
        TrackerError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        TrackerError::InvariantViolation(msg) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invariant_violation",
            message(msg),
        ),
        TrackerError::NotFound(id) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("item {id} not found"))
        }
        TrackerError::Storage(e) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_error",
            message(e.to_string()),
        ),
        TrackerError::RateLimited => {
            json_error(StatusCode::TOO_MANY_REQUESTS, "rate_limited", MSG_RATE_LIMITED)
        }
        TrackerError::Recommendation(e) => json_error(
            StatusCode::BAD_GATEWAY,
            "recommendation_error",
            message(e.to_string()),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_item_id(s: &str) -> Result<ItemId, axum::response::Response> {
    s.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id"))
}
