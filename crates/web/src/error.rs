//! Error types for the view layer

use favmap_api_client::ApiError;
use favmap_geo::GeoError;
use thiserror::Error;

/// Result type alias for view operations
pub type ViewResult<T> = Result<T, ViewError>;

/// View layer errors
///
/// Network failures are not errors here: they become user notices. This type
/// covers programming and data problems that should surface to the caller.
#[derive(Error, Debug)]
pub enum ViewError {
    /// Viewport fitting failed
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// Backend call failed where no notice applies
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A card template did not compile
    #[error("Card template is invalid: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// A card template failed to render
    #[error("Card rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Page-injected favorites are not a JSON array of records
    #[error("Favorites data is malformed: {0}")]
    PageData(#[from] serde_json::Error),
}

impl From<ViewError> for favmap_core::Error {
    fn from(err: ViewError) -> Self {
        use favmap_core::{Error, ErrorCode};

        match err {
            ViewError::Geo(GeoError::EmptyInput) => Error::empty_point_set().with_source(err),
            ViewError::Geo(GeoError::InvalidParameter(_)) => {
                Error::new(ErrorCode::InvalidConfigValue, err.to_string())
                    .with_suggestion("Check the [viewport] section of favmap.toml")
                    .with_source(err)
            }
            ViewError::Geo(GeoError::JsonError(_)) | ViewError::PageData(_) => {
                Error::new(ErrorCode::InvalidInput, err.to_string())
                    .with_suggestion("Favorites must be a JSON array of objects with x and y")
                    .with_source(err)
            }
            ViewError::Api(api) => api.into(),
            ViewError::Template(_) | ViewError::Render(_) => {
                Error::new(ErrorCode::RenderFailed, err.to_string()).with_source(err)
            }
        }
    }
}
