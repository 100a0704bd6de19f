//! Error types for the API client

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server requires a logged-in session
    #[error("Unauthorized - login required")]
    Unauthorized,

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if the server rejected the session
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::ApiResponse { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }
}

impl From<ApiError> for favmap_core::Error {
    fn from(err: ApiError) -> Self {
        use favmap_core::{Error, ErrorCode};

        match err {
            ApiError::Unauthorized => Error::login_required(),
            ApiError::Config(_) => {
                Error::new(ErrorCode::ConfigError, err.to_string()).with_source(err)
            }
            ApiError::Json(_) => {
                Error::new(ErrorCode::UnexpectedResponse, err.to_string()).with_source(err)
            }
            ApiError::ApiResponse { .. } => {
                Error::new(ErrorCode::RequestFailed, err.to_string()).with_source(err)
            }
            ApiError::Request(_) => Error::network(err.to_string()).with_source(err),
        }
    }
}
