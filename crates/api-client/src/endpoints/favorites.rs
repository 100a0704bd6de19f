//! Favorites API endpoints
//!
//! Maps to the `/favorite` routes of the favorites server:
//! - List recommended plans inside a map rectangle
//! - Search tourist spots by keyword
//! - Check whether the logged-in user already saved an entry
//! - Create a favorite
//! - Delete a favorite

use crate::client::FavoritesClient;
use crate::error::ApiResult;
use favmap_geo::{parse_point, BoundingBox, Coordinate, Located};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Favorites API interface
#[derive(Clone)]
pub struct FavoritesApi {
    client: FavoritesClient,
}

impl FavoritesApi {
    /// Create a new favorites API interface
    pub(crate) fn new(client: FavoritesClient) -> Self {
        Self { client }
    }

    /// Recommended plans inside the given rectangle
    ///
    /// GET /favorite/nearby?latMin&latMax&lngMin&lngMax
    pub async fn nearby(&self, query: &NearbyQuery) -> ApiResult<Vec<PlanRecord>> {
        self.client.get("favorite/nearby", query).await
    }

    /// Keyword search over tourist spots
    ///
    /// POST /favorite/searchTour
    pub async fn search_tour(&self, keyword: &str) -> ApiResult<Vec<TourRecord>> {
        let body = SearchTourRequest { t_name: keyword };
        let response: SearchTourResponse = self.client.post("favorite/searchTour", &body).await?;
        let tours = response.into_tours();
        debug!(keyword, count = tours.len(), "Tour search returned");
        Ok(tours)
    }

    /// Whether the logged-in user already saved `key`
    ///
    /// GET /favorite/check?type&name&location&addr
    pub async fn check(&self, key: &FavoriteKey) -> ApiResult<bool> {
        self.client.get("favorite/check", &key.query_pairs()).await
    }

    /// Save a new favorite and return the stored record
    ///
    /// POST /favorite
    pub async fn create(&self, favorite: &NewFavorite) -> ApiResult<FavoriteRecord> {
        self.client.post("favorite", favorite).await
    }

    /// Delete a favorite, returning the server's confirmation text
    ///
    /// DELETE /favorite?type&name&location&addr
    pub async fn delete(&self, key: &FavoriteKey) -> ApiResult<String> {
        self.client.delete_text("favorite", &key.query_pairs()).await
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Map rectangle for the nearby query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    /// Southern edge
    pub lat_min: f64,
    /// Northern edge
    pub lat_max: f64,
    /// Western edge
    pub lng_min: f64,
    /// Eastern edge
    pub lng_max: f64,
}

impl From<BoundingBox> for NearbyQuery {
    fn from(bounds: BoundingBox) -> Self {
        Self {
            lat_min: bounds.south,
            lat_max: bounds.north,
            lng_min: bounds.west,
            lng_max: bounds.east,
        }
    }
}

#[derive(Serialize)]
struct SearchTourRequest<'a> {
    #[serde(rename = "tName")]
    t_name: &'a str,
}

/// The search endpoint answers with either a bare list or `{ "data": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchTourResponse {
    List(Vec<TourRecord>),
    Wrapped {
        #[serde(default)]
        data: Option<Vec<TourRecord>>,
    },
}

impl SearchTourResponse {
    fn into_tours(self) -> Vec<TourRecord> {
        match self {
            Self::List(tours) => tours,
            Self::Wrapped { data } => data.unwrap_or_default(),
        }
    }
}

/// Recommended course stop returned by the nearby query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanRecord {
    /// Course id
    pub plan_info_id: Option<String>,
    /// Stop name
    pub plan_name: Option<String>,
    /// Region
    pub plan_area: Option<String>,
    /// Street address
    pub plan_addr: Option<String>,
    /// Contact number
    pub plan_phone: Option<String>,
    /// Homepage URL
    pub plan_homepage: Option<String>,
    /// Parking notes
    pub plan_parking: Option<String>,
    /// Description
    pub plan_contents: Option<String>,
    /// Number or numeric text
    pub plan_latitude: Value,
    /// Number or numeric text
    pub plan_longitude: Value,
    /// Poster image
    pub poster_url: Option<String>,
    /// Gallery images
    pub image_urls: Option<Vec<String>>,
}

impl Located for PlanRecord {
    fn position(&self) -> Option<Coordinate> {
        parse_point(&self.plan_latitude, &self.plan_longitude)
    }
}

/// Tourist spot returned by the keyword search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TourRecord {
    /// Spot name
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Contact number
    pub phone: Option<String>,
    /// Homepage
    pub url: Option<String>,
    /// Longitude
    pub x: Value,
    /// Latitude
    pub y: Value,
    /// Description
    pub contents: Option<String>,
    /// Poster image
    pub poster_url: Option<String>,
}

impl Located for TourRecord {
    fn position(&self) -> Option<Coordinate> {
        parse_point(&self.y, &self.x)
    }
}

/// A saved favorite, as stored by the server or injected into the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FavoriteRecord {
    /// Server-assigned id
    pub id: Option<String>,
    /// Owner
    pub user_id: Option<String>,
    /// Open set: "media", "theme", "course", ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Place name
    pub name: String,
    /// Address the favorite was saved with
    pub location: String,
    /// Longitude, number or numeric text
    pub x: Value,
    /// Latitude, number or numeric text
    pub y: Value,
    /// Poster image
    pub poster_url: Option<String>,
    /// Contact number
    pub plan_phone: Option<String>,
    /// Homepage
    pub plan_homepage: Option<String>,
    /// Parking notes
    pub plan_parking: Option<String>,
    /// Description
    pub plan_contents: Option<String>,
}

impl FavoriteRecord {
    /// Key identifying this record for check/delete
    #[must_use]
    pub fn key(&self) -> FavoriteKey {
        FavoriteKey::new(&self.kind, &self.name, &self.location)
    }
}

impl Located for FavoriteRecord {
    fn position(&self) -> Option<Coordinate> {
        parse_point(&self.y, &self.x)
    }
}

/// Body of the create call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    /// Favorite type; "theme" when the card had none
    #[serde(rename = "type")]
    pub kind: String,
    /// Place name
    pub name: String,
    /// Address, also the duplicate-check key
    pub location: String,
    /// Same value as `location`
    pub addr: String,
    /// Poster image; may be empty
    pub poster_url: String,
    /// Longitude; `null` when the source text was not numeric
    pub x: Option<f64>,
    /// Latitude; `null` when the source text was not numeric
    pub y: Option<f64>,
    /// Contact number
    pub plan_phone: String,
    /// Homepage
    pub plan_homepage: String,
    /// Parking notes
    pub plan_parking: String,
    /// Description
    pub plan_contents: String,
}

impl NewFavorite {
    /// Key used for the duplicate check before creating
    #[must_use]
    pub fn key(&self) -> FavoriteKey {
        FavoriteKey::new(&self.kind, &self.name, &self.location)
    }
}

/// Identifies a saved favorite for the check and delete endpoints
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoriteKey {
    /// Favorite type
    #[serde(rename = "type")]
    pub kind: String,
    /// Place name
    pub name: String,
    /// Address the favorite was saved with
    pub location: String,
}

impl FavoriteKey {
    /// Create a key
    pub fn new(kind: impl Into<String>, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            location: location.into(),
        }
    }

    /// Query parameters for check/delete.
    ///
    /// The server reads `location`; `addr` carries the same value.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("type", self.kind.as_str()),
            ("name", self.name.as_str()),
            ("location", self.location.as_str()),
            ("addr", self.location.as_str()),
        ]
    }
}
