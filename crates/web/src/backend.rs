//! The server calls the view layer depends on
//!
//! [`FavoritesBackend`] is implemented by the HTTP client; tests and offline
//! tools provide their own.

use favmap_api_client::{
    ApiResult, FavoriteKey, FavoriteRecord, FavoritesApi, NearbyQuery, NewFavorite, PlanRecord,
    TourRecord,
};
use favmap_telemetry::{metrics, names};

/// Favorites server operations
#[allow(async_fn_in_trait)]
pub trait FavoritesBackend {
    async fn nearby(&self, query: &NearbyQuery) -> ApiResult<Vec<PlanRecord>>;

    async fn search_tour(&self, keyword: &str) -> ApiResult<Vec<TourRecord>>;

    async fn check(&self, key: &FavoriteKey) -> ApiResult<bool>;

    async fn create(&self, favorite: &NewFavorite) -> ApiResult<FavoriteRecord>;

    async fn delete(&self, key: &FavoriteKey) -> ApiResult<String>;
}

impl FavoritesBackend for FavoritesApi {
    async fn nearby(&self, query: &NearbyQuery) -> ApiResult<Vec<PlanRecord>> {
        track(FavoritesApi::nearby(self, query).await)
    }

    async fn search_tour(&self, keyword: &str) -> ApiResult<Vec<TourRecord>> {
        track(FavoritesApi::search_tour(self, keyword).await)
    }

    async fn check(&self, key: &FavoriteKey) -> ApiResult<bool> {
        track(FavoritesApi::check(self, key).await)
    }

    async fn create(&self, favorite: &NewFavorite) -> ApiResult<FavoriteRecord> {
        track(FavoritesApi::create(self, favorite).await)
    }

    async fn delete(&self, key: &FavoriteKey) -> ApiResult<String> {
        track(FavoritesApi::delete(self, key).await)
    }
}

/// Count a round trip and its failure, if any
fn track<T>(result: ApiResult<T>) -> ApiResult<T> {
    metrics().increment(names::REQUESTS);
    if result.is_err() {
        metrics().increment(names::REQUEST_FAILURES);
    }
    result
}
