//! Marker classification
//!
//! One policy decides which artwork each favorite type gets and which types
//! count toward the fitted bounds.

use crate::map::{MarkerImage, MarkerSpec};
use favmap_api_client::{FavoriteRecord, PlanRecord, TourRecord};
use favmap_core::config::MarkersConfig;
use favmap_geo::Located;

/// Which favorite types contribute to the fitted bounds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoundsFilter {
    /// Every favorite with a position
    #[default]
    All,
    /// Only the listed types (e.g. only "media")
    Only(Vec<String>),
}

impl BoundsFilter {
    /// Empty list means no filtering
    pub fn from_types(types: &[String]) -> Self {
        if types.is_empty() {
            Self::All
        } else {
            Self::Only(types.to_vec())
        }
    }

    /// Whether markers of `kind` count toward the fitted bounds
    pub fn includes(&self, kind: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(types) => types.iter().any(|t| t == kind),
        }
    }
}

/// Marker artwork and bounds rules for the favorites map
#[derive(Debug, Clone)]
pub struct MarkerPolicy {
    bounds: BoundsFilter,
    images: Vec<(String, MarkerImage)>,
    default_image: MarkerImage,
    search_image: MarkerImage,
}

impl MarkerPolicy {
    /// Policy from the `[markers]` section
    pub fn from_config(config: &MarkersConfig) -> Self {
        Self {
            bounds: BoundsFilter::from_types(&config.bounds_types),
            images: config
                .images
                .iter()
                .map(|rule| (rule.kind.clone(), MarkerImage::from(&rule.image)))
                .collect(),
            default_image: MarkerImage::from(&config.default_image),
            search_image: MarkerImage::from(&config.search_image),
        }
    }

    /// Replace the bounds filter
    #[must_use]
    pub fn with_bounds_filter(mut self, bounds: BoundsFilter) -> Self {
        self.bounds = bounds;
        self
    }

    /// Which favorite types count toward the fit
    pub fn bounds_filter(&self) -> &BoundsFilter {
        &self.bounds
    }

    /// Artwork for a favorite type; types match exactly
    pub fn image_for(&self, kind: &str) -> &MarkerImage {
        self.images
            .iter()
            .find(|(k, _)| k == kind)
            .map_or(&self.default_image, |(_, image)| image)
    }

    /// Image used for search result markers
    pub fn search_image(&self) -> &MarkerImage {
        &self.search_image
    }

    /// Whether a favorite of `kind` counts toward the fit
    pub fn counts_toward_bounds(&self, kind: &str) -> bool {
        self.bounds.includes(kind)
    }

    /// Marker for a saved favorite, `None` when it has no usable position
    pub fn favorite_marker(&self, record: &FavoriteRecord) -> Option<MarkerSpec> {
        let position = record.position()?;
        Some(
            MarkerSpec::at(position)
                .with_title(&record.name)
                .with_image(self.image_for(&record.kind).clone()),
        )
    }

    /// Marker for a keyword search hit
    pub fn search_marker(&self, tour: &TourRecord) -> Option<MarkerSpec> {
        let position = tour.position()?;
        Some(
            MarkerSpec::at(position)
                .with_title(&tour.name)
                .with_image(self.search_image.clone()),
        )
    }

    /// Marker for a nearby recommendation; uses the widget's default pin
    pub fn nearby_marker(&self, plan: &PlanRecord) -> Option<MarkerSpec> {
        let position = plan.position()?;
        let mut marker = MarkerSpec::at(position);
        if let Some(name) = plan.plan_name.as_deref() {
            marker = marker.with_title(name);
        }
        Some(marker)
    }
}

impl Default for MarkerPolicy {
    fn default() -> Self {
        Self::from_config(&MarkersConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn favorite(kind: &str, x: serde_json::Value, y: serde_json::Value) -> FavoriteRecord {
        FavoriteRecord {
            kind: kind.to_string(),
            name: format!("{kind} spot"),
            x,
            y,
            ..FavoriteRecord::default()
        }
    }

    #[test]
    fn test_default_images() {
        let policy = MarkerPolicy::default();
        assert_eq!(policy.image_for("media"), &MarkerImage::new("/images/JN_marker1.png", 40, 60));
        assert_eq!(policy.image_for("theme"), &MarkerImage::new("/images/course_marker.png", 40, 40));
        assert_eq!(policy.image_for("Media").src, "/images/course_marker.png");
        assert_eq!(policy.search_image().src, "/images/themeSearchMarker.png");
    }

    #[test]
    fn test_bounds_filter() {
        let all = MarkerPolicy::default();
        assert!(all.counts_toward_bounds("course"));

        let media_only =
            MarkerPolicy::default().with_bounds_filter(BoundsFilter::Only(vec!["media".into()]));
        assert!(media_only.counts_toward_bounds("media"));
        assert!(!media_only.counts_toward_bounds("theme"));
        assert_eq!(BoundsFilter::from_types(&[]), BoundsFilter::All);
    }

    #[test]
    fn test_favorite_marker() {
        let policy = MarkerPolicy::default();
        let marker = policy
            .favorite_marker(&favorite("media", json!("126.5"), json!(34.1)))
            .unwrap();
        assert_eq!(marker.title.as_deref(), Some("media spot"));
        assert_eq!(marker.image.unwrap().height, 60);

        assert!(policy.favorite_marker(&favorite("theme", json!("abc"), json!(34.1))).is_none());
        assert!(policy.favorite_marker(&favorite("theme", json!(200.0), json!(34.1))).is_none());
    }

    #[test]
    fn test_nearby_marker_uses_default_pin() {
        let plan = PlanRecord {
            plan_name: Some("보성 녹차밭".into()),
            plan_latitude: json!(34.71),
            plan_longitude: json!(127.08),
            ..PlanRecord::default()
        };
        let marker = MarkerPolicy::default().nearby_marker(&plan).unwrap();
        assert!(marker.image.is_none());
        assert_eq!(marker.title.as_deref(), Some("보성 녹차밭"));
    }
}
