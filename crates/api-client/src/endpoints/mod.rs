//! Endpoint-specific API implementations
//!
//! | Module | Server route | Description |
//! |--------|--------------|-------------|
//! | `favorites` | `/favorite/*` | Nearby plans, tour search, duplicate check, create, delete |

pub mod favorites;

pub use favorites::{
    FavoriteKey, FavoriteRecord, FavoritesApi, NearbyQuery, NewFavorite, PlanRecord, TourRecord,
};
