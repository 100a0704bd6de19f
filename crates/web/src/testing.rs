//! In-memory backend for unit tests

use crate::backend::FavoritesBackend;
use favmap_api_client::{
    ApiError, ApiResult, FavoriteKey, FavoriteRecord, NearbyQuery, NewFavorite, PlanRecord,
    TourRecord,
};
use std::sync::Mutex;

/// Answers from canned data and records every call.
///
/// A configured failure is returned by the first matching call only.
#[derive(Default)]
pub struct FakeBackend {
    plans: Vec<PlanRecord>,
    tours: Vec<TourRecord>,
    existing: bool,
    delete_message: String,
    nearby_error: Mutex<Option<ApiError>>,
    search_error: Mutex<Option<ApiError>>,
    check_error: Mutex<Option<ApiError>>,
    create_error: Mutex<Option<ApiError>>,
    delete_error: Mutex<Option<ApiError>>,
    log: Mutex<CallLog>,
}

#[derive(Default)]
struct CallLog {
    calls: usize,
    nearby: Vec<NearbyQuery>,
    checked: Vec<FavoriteKey>,
    created: Vec<NewFavorite>,
    deleted: Vec<FavoriteKey>,
}

impl FakeBackend {
    pub fn with_plans(mut self, plans: Vec<PlanRecord>) -> Self {
        self.plans = plans;
        self
    }

    pub fn with_tours(mut self, tours: Vec<TourRecord>) -> Self {
        self.tours = tours;
        self
    }

    pub fn with_existing(mut self, existing: bool) -> Self {
        self.existing = existing;
        self
    }

    pub fn with_delete_message(mut self, message: &str) -> Self {
        self.delete_message = message.to_string();
        self
    }

    pub fn failing_nearby(self, err: ApiError) -> Self {
        *self.nearby_error.lock().unwrap() = Some(err);
        self
    }

    pub fn failing_search(self, err: ApiError) -> Self {
        *self.search_error.lock().unwrap() = Some(err);
        self
    }

    pub fn failing_check(self, err: ApiError) -> Self {
        *self.check_error.lock().unwrap() = Some(err);
        self
    }

    pub fn failing_create(self, err: ApiError) -> Self {
        *self.create_error.lock().unwrap() = Some(err);
        self
    }

    pub fn failing_delete(self, err: ApiError) -> Self {
        *self.delete_error.lock().unwrap() = Some(err);
        self
    }

    pub fn calls(&self) -> usize {
        self.log.lock().unwrap().calls
    }

    pub fn last_nearby(&self) -> Option<NearbyQuery> {
        self.log.lock().unwrap().nearby.last().copied()
    }

    pub fn checked(&self) -> Vec<FavoriteKey> {
        self.log.lock().unwrap().checked.clone()
    }

    pub fn created(&self) -> Vec<NewFavorite> {
        self.log.lock().unwrap().created.clone()
    }

    pub fn deleted(&self) -> Vec<FavoriteKey> {
        self.log.lock().unwrap().deleted.clone()
    }

    fn fail(slot: &Mutex<Option<ApiError>>) -> ApiResult<()> {
        match slot.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn record(&self, f: impl FnOnce(&mut CallLog)) {
        let mut log = self.log.lock().unwrap();
        log.calls += 1;
        f(&mut log);
    }
}

impl FavoritesBackend for FakeBackend {
    async fn nearby(&self, query: &NearbyQuery) -> ApiResult<Vec<PlanRecord>> {
        self.record(|log| log.nearby.push(*query));
        Self::fail(&self.nearby_error)?;
        Ok(self.plans.clone())
    }

    async fn search_tour(&self, _keyword: &str) -> ApiResult<Vec<TourRecord>> {
        self.record(|_| {});
        Self::fail(&self.search_error)?;
        Ok(self.tours.clone())
    }

    async fn check(&self, key: &FavoriteKey) -> ApiResult<bool> {
        self.record(|log| log.checked.push(key.clone()));
        Self::fail(&self.check_error)?;
        Ok(self.existing)
    }

    async fn create(&self, favorite: &NewFavorite) -> ApiResult<FavoriteRecord> {
        Self::fail(&self.create_error)?;
        self.record(|log| log.created.push(favorite.clone()));
        Ok(FavoriteRecord {
            id: Some("fav-1".to_string()),
            kind: favorite.kind.clone(),
            name: favorite.name.clone(),
            location: favorite.location.clone(),
            x: favorite.x.into(),
            y: favorite.y.into(),
            ..FavoriteRecord::default()
        })
    }

    async fn delete(&self, key: &FavoriteKey) -> ApiResult<String> {
        Self::fail(&self.delete_error)?;
        self.record(|log| log.deleted.push(key.clone()));
        Ok(self.delete_message.clone())
    }
}
