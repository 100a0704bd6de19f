//! Viewport fitting.
//!
//! A fit takes the minimal box around a set of points and pulls every edge
//! inward by a fixed real-world distance, using the flat approximation of
//! 111 km per degree of latitude and `111 * cos(latitude)` km per degree of
//! longitude. After the map settles on the fitted box, [`ZoomFloor`] decides
//! whether the resulting zoom level is too close and must be backed off once.

use crate::{BoundingBox, Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kilometres per degree of latitude used by the flat approximation.
pub const KM_PER_DEGREE_LAT: f64 = 111.0;

/// Default inward margin in kilometres.
pub const DEFAULT_MARGIN_KM: f64 = 3.0;

/// What to do when the inward margin crosses a box's edges.
///
/// Any axis spanning less than twice the margin inverts after the shrink,
/// a single point always does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InversionPolicy {
    /// Keep the crossed box exactly as computed.
    #[default]
    Allow,
    /// Collapse each crossed axis onto its midpoint.
    Collapse,
    /// Return the unshrunk box if any axis would cross.
    SkipShrink,
}

impl InversionPolicy {
    /// Parses a policy name as written in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "allow" => Some(Self::Allow),
            "collapse" | "clamp" => Some(Self::Collapse),
            "skip" | "skip_shrink" | "skip-shrink" => Some(Self::SkipShrink),
            _ => None,
        }
    }
}

/// Result of fitting a viewport to a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedViewport {
    /// Minimal box enclosing the input points
    pub raw: BoundingBox,
    /// Box after the inward margin and inversion policy
    pub adjusted: BoundingBox,
    /// Margin converted to degrees of latitude
    pub lat_offset: f64,
    /// Margin converted to degrees of longitude at the box's center latitude
    pub lng_offset: f64,
}

/// Computes a margin-adjusted viewport around a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportFitter {
    /// Inward margin in kilometres
    pub margin_km: f64,
    /// Kilometres per degree of latitude
    pub km_per_degree: f64,
    /// Handling of boxes narrower than twice the margin
    pub inversion: InversionPolicy,
}

impl Default for ViewportFitter {
    fn default() -> Self {
        Self {
            margin_km: DEFAULT_MARGIN_KM,
            km_per_degree: KM_PER_DEGREE_LAT,
            inversion: InversionPolicy::Allow,
        }
    }
}

impl ViewportFitter {
    /// Builder-style method to set the margin
    #[must_use]
    pub fn with_margin_km(mut self, margin_km: f64) -> Self {
        self.margin_km = margin_km;
        self
    }

    /// Builder-style method to set the km-per-degree constant
    #[must_use]
    pub fn with_km_per_degree(mut self, km_per_degree: f64) -> Self {
        self.km_per_degree = km_per_degree;
        self
    }

    /// Builder-style method to set the inversion policy
    #[must_use]
    pub fn with_inversion_policy(mut self, inversion: InversionPolicy) -> Self {
        self.inversion = inversion;
        self
    }

    /// Converts the margin into `(lat_offset, lng_offset)` degrees at `center_lat`.
    ///
    /// The longitude offset grows without bound towards the poles.
    #[inline]
    pub fn offsets(&self, center_lat: f64) -> (f64, f64) {
        let lat_offset = self.margin_km / self.km_per_degree;
        let lng_offset = self.margin_km / (self.km_per_degree * center_lat.to_radians().cos());
        (lat_offset, lng_offset)
    }

    /// Pulls every edge of `raw` inward by the margin, then applies the
    /// inversion policy.
    pub fn shrink(&self, raw: &BoundingBox) -> BoundingBox {
        let (lat_offset, lng_offset) = self.offsets(raw.center_latitude());
        self.shrink_by(raw, lat_offset, lng_offset)
    }

    fn shrink_by(&self, raw: &BoundingBox, lat_offset: f64, lng_offset: f64) -> BoundingBox {
        let shrunk = BoundingBox::new(
            raw.south + lat_offset,
            raw.west + lng_offset,
            raw.north - lat_offset,
            raw.east - lng_offset,
        );

        if !shrunk.is_inverted() {
            return shrunk;
        }

        match self.inversion {
            InversionPolicy::Allow => {
                debug!(
                    lat_span = raw.lat_span(),
                    lng_span = raw.lng_span(),
                    "Margin crosses the box edges, keeping inverted box"
                );
                shrunk
            }
            InversionPolicy::Collapse => {
                let mut collapsed = shrunk;
                if collapsed.south > collapsed.north {
                    let mid = raw.center_latitude();
                    collapsed.south = mid;
                    collapsed.north = mid;
                }
                if collapsed.west > collapsed.east {
                    let mid = (raw.west + raw.east) / 2.0;
                    collapsed.west = mid;
                    collapsed.east = mid;
                }
                collapsed
            }
            InversionPolicy::SkipShrink => *raw,
        }
    }

    /// Checks that the margin is finite and non-negative and that the
    /// km-per-degree constant is finite and positive.
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidParameter`] naming the offending setting.
    pub fn validate(&self) -> Result<()> {
        if !self.margin_km.is_finite() || self.margin_km < 0.0 {
            return Err(GeoError::InvalidParameter(format!("margin_km = {}", self.margin_km)));
        }
        if !self.km_per_degree.is_finite() || self.km_per_degree <= 0.0 {
            return Err(GeoError::InvalidParameter(format!(
                "km_per_degree = {}",
                self.km_per_degree
            )));
        }
        Ok(())
    }

    /// Fits a viewport to `points`.
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidParameter`] for an invalid fitter and
    /// [`GeoError::EmptyInput`] when `points` is empty.
    pub fn fit(&self, points: &[Coordinate]) -> Result<FittedViewport> {
        self.validate()?;
        let raw = BoundingBox::from_points(points.iter().copied()).ok_or(GeoError::EmptyInput)?;
        Ok(self.fit_bounds(raw))
    }

    /// Fits a viewport to an already accumulated box.
    ///
    /// Does not validate the fitter; see [`ViewportFitter::validate`].
    pub fn fit_bounds(&self, raw: BoundingBox) -> FittedViewport {
        let (lat_offset, lng_offset) = self.offsets(raw.center_latitude());
        let adjusted = self.shrink_by(&raw, lat_offset, lng_offset);

        FittedViewport {
            raw,
            adjusted,
            lat_offset,
            lng_offset,
        }
    }
}

/// Minimum zoom correction applied once after a fitted view settles.
///
/// Levels follow the widget's convention: a smaller level is closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomFloor {
    /// Levels below this are considered too close
    pub threshold: u8,
    /// Level used instead
    pub fallback: u8,
}

impl Default for ZoomFloor {
    fn default() -> Self {
        Self {
            threshold: 5,
            fallback: 6,
        }
    }
}

impl ZoomFloor {
    /// Returns the level to switch to, or `None` if `level` is acceptable.
    #[inline]
    pub fn correct(&self, level: u8) -> Option<u8> {
        (level < self.threshold).then_some(self.fallback)
    }

    /// Returns the corrected level.
    #[inline]
    pub fn apply(&self, level: u8) -> u8 {
        self.correct(level).unwrap_or(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn jeonnam() -> Vec<Coordinate> {
        vec![
            Coordinate::new(34.0, 126.0),
            Coordinate::new(34.2, 126.3),
            Coordinate::new(33.9, 126.1),
            Coordinate::new(34.1, 126.5),
        ]
    }

    #[test]
    fn test_fit_reference_points() {
        let fitted = ViewportFitter::default().fit(&jeonnam()).unwrap();

        assert!((fitted.raw.south - 33.9).abs() < EPS);
        assert!((fitted.raw.north - 34.2).abs() < EPS);
        assert!((fitted.raw.west - 126.0).abs() < EPS);
        assert!((fitted.raw.east - 126.5).abs() < EPS);

        assert!((fitted.lat_offset - 0.027).abs() < 1e-3, "{}", fitted.lat_offset);
        assert!((fitted.lng_offset - 0.0326).abs() < 1e-3, "{}", fitted.lng_offset);

        assert!((fitted.adjusted.south - 33.927).abs() < 1e-3);
        assert!((fitted.adjusted.north - 34.173).abs() < 1e-3);
        assert!((fitted.adjusted.west - 126.033).abs() < 1e-3);
        assert!((fitted.adjusted.east - 126.467).abs() < 1e-3);
        assert!(!fitted.adjusted.is_inverted());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let result = ViewportFitter::default().fit(&[]);
        assert!(matches!(result, Err(GeoError::EmptyInput)));
    }

    #[test]
    fn test_invalid_fitter_is_rejected() {
        let points = jeonnam();

        let result = ViewportFitter::default().with_margin_km(-1.0).fit(&points);
        assert!(matches!(result, Err(GeoError::InvalidParameter(ref m)) if m.contains("margin_km")));

        let result = ViewportFitter::default().with_margin_km(f64::NAN).fit(&points);
        assert!(matches!(result, Err(GeoError::InvalidParameter(_))));

        let result = ViewportFitter::default().with_km_per_degree(0.0).fit(&points);
        assert!(matches!(result, Err(GeoError::InvalidParameter(ref m)) if m.contains("km_per_degree")));

        assert!(ViewportFitter::default().with_margin_km(0.0).validate().is_ok());
    }

    #[test]
    fn test_equator_offsets_match() {
        let (lat_offset, lng_offset) = ViewportFitter::default().offsets(0.0);
        assert_eq!(lat_offset, lng_offset);
        assert!((lat_offset - 3.0 / 111.0).abs() < EPS);
    }

    #[test]
    fn test_longitude_offset_grows_towards_pole() {
        let fitter = ViewportFitter::default();
        let (_, at_40) = fitter.offsets(40.0);
        let (_, at_80) = fitter.offsets(80.0);
        let (_, at_89) = fitter.offsets(89.99);
        assert!(at_40 < at_80);
        assert!(at_80 < at_89);
        assert!(at_89 > 100.0);
    }

    #[test]
    fn test_single_point_inverts_when_allowed() {
        let point = Coordinate::new(34.8, 126.4);
        let fitted = ViewportFitter::default().fit(&[point]).unwrap();

        assert_eq!(fitted.raw.lat_span(), 0.0);
        assert!(fitted.adjusted.is_inverted());
        assert!(fitted.adjusted.south > fitted.adjusted.north);
        assert!(fitted.adjusted.west > fitted.adjusted.east);
        assert!((fitted.adjusted.lat_span() + 2.0 * fitted.lat_offset).abs() < EPS);
    }

    #[test]
    fn test_single_point_collapse_policy() {
        let point = Coordinate::new(34.8, 126.4);
        let fitted = ViewportFitter::default()
            .with_inversion_policy(InversionPolicy::Collapse)
            .fit(&[point])
            .unwrap();

        assert!(!fitted.adjusted.is_inverted());
        assert!((fitted.adjusted.south - 34.8).abs() < EPS);
        assert!((fitted.adjusted.north - 34.8).abs() < EPS);
        assert!((fitted.adjusted.west - 126.4).abs() < EPS);
    }

    #[test]
    fn test_skip_shrink_policy_returns_raw() {
        let points = [Coordinate::new(34.80, 126.40), Coordinate::new(34.81, 126.60)];
        let fitted = ViewportFitter::default()
            .with_inversion_policy(InversionPolicy::SkipShrink)
            .fit(&points)
            .unwrap();

        assert_eq!(fitted.adjusted, fitted.raw);
    }

    #[test]
    fn test_collapse_only_touches_crossed_axis() {
        // ~1 km tall, ~18 km wide: only latitude crosses.
        let points = [Coordinate::new(34.80, 126.40), Coordinate::new(34.81, 126.60)];
        let fitted = ViewportFitter::default()
            .with_inversion_policy(InversionPolicy::Collapse)
            .fit(&points)
            .unwrap();

        assert!((fitted.adjusted.south - 34.805).abs() < EPS);
        assert!((fitted.adjusted.north - 34.805).abs() < EPS);
        assert!((fitted.adjusted.west - (126.40 + fitted.lng_offset)).abs() < EPS);
        assert!((fitted.adjusted.east - (126.60 - fitted.lng_offset)).abs() < EPS);
    }

    #[test]
    fn test_near_pole_policies() {
        let points = [Coordinate::new(89.99, 10.0), Coordinate::new(89.999, 60.0)];

        let allowed = ViewportFitter::default().fit(&points).unwrap();
        assert!(allowed.adjusted.west > allowed.adjusted.east);

        let collapsed = ViewportFitter::default()
            .with_inversion_policy(InversionPolicy::Collapse)
            .fit(&points)
            .unwrap();
        assert!((collapsed.adjusted.west - 35.0).abs() < EPS);
        assert!((collapsed.adjusted.east - 35.0).abs() < EPS);

        let skipped = ViewportFitter::default()
            .with_inversion_policy(InversionPolicy::SkipShrink)
            .fit(&points)
            .unwrap();
        assert_eq!(skipped.adjusted, skipped.raw);
    }

    #[test]
    fn test_custom_margin() {
        let fitter = ViewportFitter::default().with_margin_km(11.1);
        let (lat_offset, _) = fitter.offsets(34.0);
        assert!((lat_offset - 0.1).abs() < EPS);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(InversionPolicy::from_name("allow"), Some(InversionPolicy::Allow));
        assert_eq!(InversionPolicy::from_name(" Collapse "), Some(InversionPolicy::Collapse));
        assert_eq!(InversionPolicy::from_name("skip"), Some(InversionPolicy::SkipShrink));
        assert_eq!(InversionPolicy::from_name("pad"), None);
    }

    #[test]
    fn test_zoom_floor() {
        let floor = ZoomFloor::default();
        assert_eq!(floor.correct(1), Some(6));
        assert_eq!(floor.correct(4), Some(6));
        assert_eq!(floor.correct(5), None);
        assert_eq!(floor.correct(10), None);
        assert_eq!(floor.apply(3), 6);
        assert_eq!(floor.apply(8), 8);
    }

    proptest! {
        #[test]
        fn prop_shrink_is_symmetric(
            south in -60.0f64..60.0,
            west in -170.0f64..170.0,
            lat_span in 0.0f64..10.0,
            lng_span in 0.0f64..10.0,
        ) {
            let raw = BoundingBox::new(south, west, south + lat_span, west + lng_span);
            let fitted = ViewportFitter::default().fit_bounds(raw);

            let expected_lat = raw.lat_span() - 2.0 * fitted.lat_offset;
            let expected_lng = raw.lng_span() - 2.0 * fitted.lng_offset;
            prop_assert!((fitted.adjusted.lat_span() - expected_lat).abs() < 1e-9);
            prop_assert!((fitted.adjusted.lng_span() - expected_lng).abs() < 1e-9);
        }
    }
}
