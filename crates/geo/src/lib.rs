//! Geographic helpers for the favorites map.
//!
//! This crate provides:
//! - Bounding box accumulation over a set of points
//! - Viewport fitting with an inward real-world margin
//! - The one-shot minimum zoom floor policy
//! - Lenient coordinate parsing for page and API payloads
//! - Batch point collection with optional parallelism
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use favmap_geo::{Coordinate, ViewportFitter};
//!
//! let points = [
//!     Coordinate::new(34.0, 126.0),
//!     Coordinate::new(34.2, 126.3),
//!     Coordinate::new(33.9, 126.1),
//!     Coordinate::new(34.1, 126.5),
//! ];
//!
//! let fitted = ViewportFitter::default().fit(&points).unwrap();
//! assert!((fitted.raw.south - 33.9).abs() < 1e-9);
//! assert!((fitted.adjusted.south - 33.927).abs() < 1e-3);
//! ```

mod bounds;
mod error;
mod parse;
mod viewport;
pub mod batch;

#[cfg(feature = "wasm")]
mod wasm;

pub use batch::{collect_points, fit_json, fit_located, Located};
pub use bounds::BoundingBox;
pub use error::{GeoError, Result};
pub use parse::{parse_degrees, parse_point};
pub use viewport::{
    FittedViewport, InversionPolicy, ViewportFitter, ZoomFloor, DEFAULT_MARGIN_KM,
    KM_PER_DEGREE_LAT,
};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
