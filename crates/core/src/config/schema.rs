//! Configuration schema definitions
//!
//! Every section has defaults, so an empty file (or no file) is a valid
//! configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub viewport: ViewportConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub markers: MarkersConfig,
}

impl ConfigSchema {
    /// Reject values the fitter cannot work with
    pub fn validate(&self) -> Result<()> {
        self.viewport.validate()
    }
}

/// Favorites server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server origin, e.g. `http://localhost:8080`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Session cookie sent with every request (`JSESSIONID=...`)
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            session_cookie: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Viewport fitting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Inward margin in kilometres
    #[serde(default = "default_margin_km")]
    pub margin_km: f64,

    /// Kilometres per degree of latitude
    #[serde(default = "default_km_per_degree")]
    pub km_per_degree: f64,

    /// What to do when the margin crosses the box: allow, collapse or skip
    #[serde(default = "default_inversion")]
    pub inversion: String,

    /// Settled levels below this are backed off
    #[serde(default = "default_min_level")]
    pub min_level: u8,

    /// Level used when backing off
    #[serde(default = "default_fallback_level")]
    pub fallback_level: u8,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            margin_km: default_margin_km(),
            km_per_degree: default_km_per_degree(),
            inversion: default_inversion(),
            min_level: default_min_level(),
            fallback_level: default_fallback_level(),
        }
    }
}

/// Inversion policy names understood by the viewport fitter
const INVERSION_NAMES: [&str; 6] = ["allow", "collapse", "clamp", "skip", "skip_shrink", "skip-shrink"];

impl ViewportConfig {
    /// Check the margin, the degree constant, the policy name and the levels.
    ///
    /// A negative margin would turn the inward shrink into padding and a zero
    /// `km_per_degree` makes every offset infinite.
    pub fn validate(&self) -> Result<()> {
        if !self.margin_km.is_finite() || self.margin_km < 0.0 {
            return Err(Error::invalid_config_value("viewport.margin_km", self.margin_km)
                .with_suggestion("Use a finite margin of zero or more kilometres"));
        }

        if !self.km_per_degree.is_finite() || self.km_per_degree <= 0.0 {
            return Err(Error::invalid_config_value("viewport.km_per_degree", self.km_per_degree)
                .with_suggestion("Use a positive number of kilometres, e.g. 111"));
        }

        let inversion = self.inversion.trim().to_ascii_lowercase();
        if !INVERSION_NAMES.contains(&inversion.as_str()) {
            return Err(Error::invalid_config_value("viewport.inversion", &self.inversion)
                .with_suggestion("Use one of: allow, collapse, skip"));
        }

        if self.min_level == 0 || self.fallback_level == 0 {
            return Err(Error::invalid_config_value(
                "viewport.min_level/fallback_level",
                format!("{}/{}", self.min_level, self.fallback_level),
            )
            .with_suggestion("Map levels start at 1"));
        }

        Ok(())
    }
}

fn default_margin_km() -> f64 {
    3.0
}

fn default_km_per_degree() -> f64 {
    111.0
}

fn default_inversion() -> String {
    "allow".to_string()
}

fn default_min_level() -> u8 {
    5
}

fn default_fallback_level() -> u8 {
    6
}

/// Initial map state before any fit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// `[latitude, longitude]`
    #[serde(default = "default_initial_center")]
    pub initial_center: [f64; 2],

    #[serde(default = "default_initial_level")]
    pub initial_level: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_center: default_initial_center(),
            initial_level: default_initial_level(),
        }
    }
}

fn default_initial_center() -> [f64; 2] {
    [34.5, 126.9]
}

fn default_initial_level() -> u8 {
    10
}

/// Marker image for one favorite type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerImageConfig {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

impl MarkerImageConfig {
    fn new(src: &str, width: u32, height: u32) -> Self {
        Self {
            src: src.to_string(),
            width,
            height,
        }
    }
}

/// Marker rule: which image a favorite type gets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRuleConfig {
    /// Favorite type, e.g. "media"
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub image: MarkerImageConfig,
}

/// Marker classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersConfig {
    /// Favorite types counted toward the fitted bounds (empty means all)
    #[serde(default)]
    pub bounds_types: Vec<String>,

    /// Per-type images
    #[serde(default = "default_marker_rules")]
    pub images: Vec<MarkerRuleConfig>,

    /// Image for types without a rule
    #[serde(default = "default_marker_image")]
    pub default_image: MarkerImageConfig,

    /// Image for keyword search results
    #[serde(default = "default_search_image")]
    pub search_image: MarkerImageConfig,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            bounds_types: Vec::new(),
            images: default_marker_rules(),
            default_image: default_marker_image(),
            search_image: default_search_image(),
        }
    }
}

fn default_marker_rules() -> Vec<MarkerRuleConfig> {
    vec![MarkerRuleConfig {
        kind: "media".to_string(),
        image: MarkerImageConfig::new("/images/JN_marker1.png", 40, 60),
    }]
}

fn default_marker_image() -> MarkerImageConfig {
    MarkerImageConfig::new("/images/course_marker.png", 40, 40)
}

fn default_search_image() -> MarkerImageConfig {
    MarkerImageConfig::new("/images/themeSearchMarker.png", 40, 40)
}
