//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::FavoritesApi;
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// HTTP client for the favorites server
///
/// Wraps `reqwest` and adds request correlation IDs, the optional session
/// cookie and uniform status handling. Every call is a single round trip.
#[derive(Clone)]
pub struct FavoritesClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl FavoritesClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static("favmap-api-client/0.1"));

        if let Some(ref cookie) = config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|_| ApiError::config("session cookie contains invalid header characters"))?;
            default_headers.insert(COOKIE, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Access the favorites endpoints
    #[must_use]
    pub fn favorites(&self) -> FavoritesApi {
        FavoritesApi::new(self.clone())
    }

    /// Resolve an endpoint path against the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build a request for `path` carrying a fresh correlation ID
    pub fn request_builder(&self, method: Method, path: &str) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();

        self.inner
            .request(method, self.url_for(path))
            .header(X_REQUEST_ID, request_id)
    }

    /// Perform a GET request with query parameters
    #[instrument(skip(self, query))]
    pub async fn get<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request_builder(Method::GET, path).query(query);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// Perform a POST request with a JSON body
    #[instrument(skip(self, body))]
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request_builder(Method::POST, path).json(body);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// Perform a DELETE request and return the response body as text
    #[instrument(skip(self, query))]
    pub async fn delete_text<Q>(&self, path: &str, query: &Q) -> ApiResult<String>
    where
        Q: Serialize + ?Sized,
    {
        let request = self.request_builder(Method::DELETE, path).query(query);
        let response = self.send(request).await?;
        Ok(response.text().await?)
    }

    /// Send a request and map non-success statuses to errors
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();

        debug!(
            url = %response.url(),
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "Request completed"
        );

        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "Session rejected by server");
            return Err(ApiError::Unauthorized);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::api_response(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
