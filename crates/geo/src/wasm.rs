//! WASM bindings for the geo crate.
//!
//! These bindings let the favorites page call the fitter directly from
//! JavaScript with the page-injected favorites array.

use crate::{fit_json, GeoError, InversionPolicy, ViewportFitter, ZoomFloor};
use wasm_bindgen::prelude::*;

fn to_js(err: GeoError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Fit a viewport to a JSON array of `{x, y}` items.
///
/// # Arguments
/// * `items_json` - JSON array of items with `x` (longitude) and `y` (latitude)
/// * `margin_km` - Inward margin in kilometres
/// * `policy` - Inversion policy name ("allow", "collapse", "skip")
///
/// # Returns
/// JSON string of the fitted viewport, or `null` when no item has a usable position
#[wasm_bindgen]
pub fn fit_viewport(items_json: &str, margin_km: f64, policy: &str) -> Result<String, JsValue> {
    let inversion = InversionPolicy::from_name(policy)
        .ok_or_else(|| to_js(GeoError::InvalidParameter(format!("unknown inversion policy {policy:?}"))))?;

    let fitter = ViewportFitter::default()
        .with_margin_km(margin_km)
        .with_inversion_policy(inversion);

    match fit_json(&fitter, items_json) {
        Ok(fitted) => serde_json::to_string(&fitted).map_err(|e| to_js(e.into())),
        Err(GeoError::EmptyInput) => Ok("null".to_string()),
        Err(e) => Err(to_js(e)),
    }
}

/// Level to switch to once the fitted view settles.
///
/// # Returns
/// The fallback level when `level` is below `threshold`, otherwise `level`
#[wasm_bindgen]
pub fn settled_level(level: u8, threshold: u8, fallback: u8) -> u8 {
    ZoomFloor { threshold, fallback }.apply(level)
}
