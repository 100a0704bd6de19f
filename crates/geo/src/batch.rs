//! Batch point collection with optional parallelism.
//!
//! Page payloads can carry a few thousand favorites; parsing their
//! coordinates is the only per-item work before a fit.

use crate::{parse_point, Coordinate, FittedViewport, GeoError, Result, ViewportFitter};
use serde::Deserialize;

/// Anything that may carry a position.
pub trait Located {
    /// The item's coordinate, or `None` if it is missing or malformed.
    fn position(&self) -> Option<Coordinate>;
}

impl Located for Coordinate {
    fn position(&self) -> Option<Coordinate> {
        self.is_valid().then_some(*self)
    }
}

/// Collect the valid positions of `items`, preserving input order.
///
/// Items without a usable position are skipped.
///
/// # Example
/// ```
/// use favmap_geo::{collect_points, Coordinate};
///
/// let items = vec![Coordinate::new(34.8, 126.4), Coordinate::new(123.0, 0.0)];
/// let points = collect_points(&items);
/// assert_eq!(points, vec![Coordinate::new(34.8, 126.4)]);
/// ```
pub fn collect_points<T>(items: &[T]) -> Vec<Coordinate>
where
    T: Located + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().filter_map(Located::position).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.iter().filter_map(Located::position).collect()
    }
}

/// Collect positions and fit a viewport around them.
///
/// # Errors
/// Returns [`GeoError::EmptyInput`] when no item has a usable position.
pub fn fit_located<T>(fitter: &ViewportFitter, items: &[T]) -> Result<FittedViewport>
where
    T: Located + Sync,
{
    let points = collect_points(items);
    if points.is_empty() {
        return Err(GeoError::EmptyInput);
    }
    fitter.fit(&points)
}

/// Page item shape: `x` is longitude, `y` is latitude, either may be text.
#[derive(Debug, Deserialize)]
struct PageItem {
    #[serde(default)]
    x: serde_json::Value,
    #[serde(default)]
    y: serde_json::Value,
}

impl Located for PageItem {
    fn position(&self) -> Option<Coordinate> {
        parse_point(&self.y, &self.x)
    }
}

/// Fit a viewport to a page-injected JSON array of `{x, y}` items.
///
/// Other fields on the items are ignored.
///
/// # Errors
/// Returns [`GeoError::JsonError`] when `items_json` is not an array of
/// objects, and the errors of [`fit_located`] otherwise.
pub fn fit_json(fitter: &ViewportFitter, items_json: &str) -> Result<FittedViewport> {
    let items: Vec<PageItem> = serde_json::from_str(items_json)?;
    fit_located(fitter, &items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    struct Spot {
        y: Value,
        x: Value,
    }

    impl Located for Spot {
        fn position(&self) -> Option<Coordinate> {
            parse_point(&self.y, &self.x)
        }
    }

    fn spots() -> Vec<Spot> {
        vec![
            Spot { y: json!("34.0"), x: json!("126.0") },
            Spot { y: json!(34.2), x: json!(126.3) },
            Spot { y: json!(null), x: json!(126.9) },
            Spot { y: json!("33.9"), x: json!("126.1") },
            Spot { y: json!("not a number"), x: json!("126.1") },
            Spot { y: json!(34.1), x: json!("126.5") },
        ]
    }

    #[test]
    fn test_collect_skips_malformed() {
        let points = collect_points(&spots());
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_collect_preserves_order() {
        let points = collect_points(&spots());
        assert_eq!(points[0], Coordinate::new(34.0, 126.0));
        assert_eq!(points[3], Coordinate::new(34.1, 126.5));
    }

    #[test]
    fn test_fit_located() {
        let fitted = fit_located(&ViewportFitter::default(), &spots()).unwrap();
        assert_eq!(fitted.raw.south, 33.9);
        assert_eq!(fitted.raw.east, 126.5);
    }

    #[test]
    fn test_fit_located_all_malformed() {
        let items = vec![Spot { y: json!("?"), x: json!("?") }];
        let result = fit_located(&ViewportFitter::default(), &items);
        assert!(matches!(result, Err(GeoError::EmptyInput)));
    }

    #[test]
    fn test_fit_json_page_items() {
        let json = r#"[
            {"type": "media", "name": "a", "x": "126.0", "y": "34.0"},
            {"type": "theme", "name": "b", "x": 126.5, "y": 34.2},
            {"type": "theme", "name": "c", "x": "", "y": null},
            {"name": "d"}
        ]"#;
        let fitted = fit_json(&ViewportFitter::default(), json).unwrap();
        assert_eq!(fitted.raw.south, 34.0);
        assert_eq!(fitted.raw.north, 34.2);
        assert_eq!(fitted.raw.east, 126.5);
    }

    #[test]
    fn test_fit_json_rejects_non_array() {
        let result = fit_json(&ViewportFitter::default(), r#"{"x": 126.0, "y": 34.0}"#);
        assert!(matches!(result, Err(GeoError::JsonError(_))));

        let result = fit_json(&ViewportFitter::default(), "[{");
        assert!(matches!(result, Err(GeoError::JsonError(_))));
    }

    #[test]
    fn test_fit_json_without_positions() {
        let result = fit_json(&ViewportFitter::default(), r#"[{"x": "", "y": ""}]"#);
        assert!(matches!(result, Err(GeoError::EmptyInput)));
    }
}
