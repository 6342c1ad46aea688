//! HTTP recommendation client.

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{RecipeRecommender, RecommendationError, RecommendationRequest, RecommendationResponse};

/// POSTs the item names as JSON to a fixed endpoint.
///
/// No timeout and no retry; one call per request.
#[derive(Debug, Clone)]
pub struct HttpRecipeRecommender {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRecipeRecommender {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecipeRecommender for HttpRecipeRecommender {
    async fn recommend(&self, items: Vec<String>) -> Result<String, RecommendationError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&RecommendationRequest { items })
            .send()
            .await
            .map_err(|e| RecommendationError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RecommendationError::RateLimited);
        }
        if !status.is_success() {
            return Err(RecommendationError::Status(status.as_u16()));
        }

        let body: RecommendationResponse = resp
            .json()
            .await
            .map_err(|e| RecommendationError::Decode(e.to_string()))?;

        Ok(body.recipes)
    }
}
