//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// No points were supplied to a fit
    #[error("Cannot fit a viewport to an empty point set")]
    EmptyInput,

    /// A fitter setting is out of range
    #[error("Invalid viewport parameter: {0}")]
    InvalidParameter(String),

    /// Page payload is not a JSON array of items
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
