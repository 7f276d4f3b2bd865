use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::config::ServiceConfig;
use crate::model::RecipePair;
use crate::request::TransformRequest;
use crate::TransformError;

/// Remote service that rewrites a recipe according to a transform request
#[async_trait]
pub trait RecipeService: Send + Sync {
    async fn transform(&self, request: &TransformRequest) -> Result<RecipePair, TransformError>;
}

/// `RecipeService` backed by the HTTP `/fetchRecipe` endpoint
pub struct HttpRecipeService {
    client: Client,
    base_url: String,
}

impl HttpRecipeService {
    /// Create a service client from configuration
    pub fn new(config: &ServiceConfig) -> Result<Self, TransformError> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;

        Ok(HttpRecipeService {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        HttpRecipeService {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/fetchRecipe", self.base_url)
    }
}

#[async_trait]
impl RecipeService for HttpRecipeService {
    async fn transform(&self, request: &TransformRequest) -> Result<RecipePair, TransformError> {
        debug!("POST {} {:?}", self.endpoint(), request);

        let response = self
            .client
            .post(self.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Transformation service returned {} for {}", status, request.url);
            return Err(TransformError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let pair: RecipePair = serde_json::from_str(&body)?;
        debug!(
            "Received '{}' transformed from '{}'",
            pair.transformed.title, pair.original.title
        );
        Ok(pair)
    }
}
