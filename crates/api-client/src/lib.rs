//! HTTP client for the favorites server
//!
//! This crate provides a typed client for the five `/favorite` endpoints used
//! by the favorites map: nearby recommendations, keyword tour search, the
//! duplicate check, create and delete.
//!
//! # Features
//!
//! - **Environment-based configuration**: Load the server URL and session from environment variables
//! - **Request correlation**: Track requests with unique IDs for debugging
//! - **Login detection**: HTTP 401 surfaces as [`ApiError::Unauthorized`]
//!
//! Requests are single round trips; there is no retry or backoff.
//!
//! # Example
//!
//! ```rust,no_run
//! use favmap_api_client::{FavoritesClient, FavoriteKey};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FavoritesClient::new()?;
//!
//!     let tours = client.favorites().search_tour("순천만").await?;
//!     println!("Found {} spots", tours.len());
//!
//!     let key = FavoriteKey::new("theme", "순천만 국가정원", "전남 순천시");
//!     println!("Saved already: {}", client.favorites().check(&key).await?);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::FavoritesClient;
pub use config::ClientConfig;
pub use endpoints::{
    FavoriteKey, FavoriteRecord, FavoritesApi, NearbyQuery, NewFavorite, PlanRecord, TourRecord,
};
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::FavoritesClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{FavoriteKey, FavoriteRecord, FavoritesApi, NewFavorite};
    pub use crate::error::{ApiError, ApiResult};
}
