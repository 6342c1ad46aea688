//! Recipe recommendation collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod http;

pub use http::HttpRecipeRecommender;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendationError {
    /// The service answered 429.
    #[error("rate limited by recommendation service")]
    RateLimited,

    #[error("recommendation service returned status {0}")]
    Status(u16),

    #[error("recommendation request failed: {0}")]
    Network(String),

    #[error("malformed recommendation response: {0}")]
    Decode(String),
}

/// Request body: `{ "items": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub items: Vec<String>,
}

/// Response body: `{ "recipes": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recipes: String,
}

/// Turns a list of item names into free-text recipe suggestions.
#[async_trait]
pub trait RecipeRecommender: Send + Sync {
    async fn recommend(&self, items: Vec<String>) -> Result<String, RecommendationError>;
}

#[async_trait]
impl<R> RecipeRecommender for Arc<R>
where
    R: RecipeRecommender + ?Sized,
{
    async fn recommend(&self, items: Vec<String>) -> Result<String, RecommendationError> {
        (**self).recommend(items).await
    }
}
