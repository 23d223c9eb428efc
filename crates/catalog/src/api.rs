//! Transport layer for the remote catalog.
//!
//! `CatalogApi` is the seam between the retrying client and the wire: the
//! HTTP implementation lives here, tests script the trait directly.

use crate::types::{DetailResponse, SearchParams, SearchResponse};
use ladle_core::config::CatalogSettings;
use ladle_core::{AppError, AppResult};
use thiserror::Error;

/// Transport-level error from a single catalog call.
///
/// `RateLimited` is the only variant with its own retry policy semantics;
/// everything else is a transient transport failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 429 from the catalog
    #[error("catalog rate limit hit")]
    RateLimited,

    /// Connection/timeout/body errors
    #[error("catalog transport error: {0}")]
    Transport(String),

    /// Non-success, non-429 HTTP status
    #[error("catalog returned status {0}: {1}")]
    Status(u16, String),
}

/// Result alias for single catalog calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// One attempt against each of the catalog's two remote operations.
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// Call the complex-search endpoint once, returning hit ids.
    async fn search_ids(&self, params: &SearchParams) -> ApiResult<Vec<u64>>;

    /// Call the detail endpoint once.
    async fn get_detail(&self, id: u64) -> ApiResult<DetailResponse>;
}

/// Reqwest-backed catalog transport using RapidAPI-style key headers.
#[derive(Debug)]
pub struct HttpCatalogApi {
    base_url: String,
    host: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpCatalogApi {
    /// Create a transport from catalog settings.
    ///
    /// The API key is resolved from the configured environment variable
    /// up front; a missing key is a permanent configuration error.
    pub fn from_settings(settings: &CatalogSettings) -> AppResult<Self> {
        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            AppError::Config(format!(
                "Catalog API key not found in environment variable: {}",
                settings.api_key_env
            ))
        })?;

        Ok(Self::new(&settings.endpoint, api_key))
    }

    /// Create a transport with an explicit endpoint and key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let host = host_of(&base_url);

        Self {
            base_url,
            host,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
    }
}

/// Extract the host portion of a base URL for the host header.
fn host_of(base_url: &str) -> String {
    base_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Map a reqwest response into the transport error taxonomy.
async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ApiError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status(status.as_u16(), body));
    }

    Ok(response)
}

#[async_trait::async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn search_ids(&self, params: &SearchParams) -> ApiResult<Vec<u64>> {
        let url = format!("{}/recipes/complexSearch", self.base_url);

        let mut request = self
            .get(&url)
            .query(&[("number", params.number.to_string())])
            .query(&[("addRecipeInformation", "false")]);

        if let Some(ingredients) = params.include_ingredients() {
            request = request.query(&[("includeIngredients", ingredients)]);
        }
        if let Some(ref meal_type) = params.meal_type {
            request = request.query(&[("type", meal_type)]);
        }
        if let Some(ref diet) = params.diet {
            request = request.query(&[("diet", diet)]);
        }

        tracing::debug!("Catalog search: {:?}", params);

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let response = check_status(response).await?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to parse search response: {}", e)))?;

        Ok(body.results.into_iter().map(|hit| hit.id).collect())
    }

    async fn get_detail(&self, id: u64) -> ApiResult<DetailResponse> {
        let url = format!("{}/recipes/{}/information", self.base_url, id);

        tracing::debug!("Catalog detail fetch: id={}", id);

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to parse detail response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of_strips_scheme() {
        assert_eq!(
            host_of("https://spoonacular-recipe-food-nutrition-v1.p.rapidapi.com"),
            "spoonacular-recipe-food-nutrition-v1.p.rapidapi.com"
        );
        assert_eq!(host_of("http://localhost:8080/api"), "localhost:8080");
    }

    #[test]
    fn test_from_settings_missing_key_is_config_error() {
        let settings = CatalogSettings {
            endpoint: "https://catalog.example.com".to_string(),
            api_key_env: "LADLE_TEST_NO_SUCH_KEY".to_string(),
        };
        let err = HttpCatalogApi::from_settings(&settings).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
