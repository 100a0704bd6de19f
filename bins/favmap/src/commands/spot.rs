//! Filming-location map command

use super::Context;
use anyhow::Result;
use favmap_cli::output::{format_position, print_json};
use favmap_cli::Status;
use favmap_core::Error;
use favmap_web::MapView;
use serde_json::{json, Value};

/// Open the map on one filming location and report the view
pub fn run(ctx: &Context, lat: &str, lng: &str) -> Result<()> {
    let mut view = ctx.controller()?;
    let latitude = Value::String(lat.to_string());
    let longitude = Value::String(lng.to_string());

    let Some(id) = view.show_spot(&latitude, &longitude) else {
        return Err(Error::validation("Filming location has no usable coordinates")
            .with_context(format!("lat {lat:?}, lng {lng:?}"))
            .into());
    };

    let map = view.map();
    let center = map.center();
    if ctx.format.is_json() {
        let marker = map.marker(id);
        print_json(&json!({ "center": center, "level": map.level(), "marker": marker }))?;
        return Ok(());
    }

    Status::header("Filming location");
    Status::field("Center", &format_position(center.latitude, center.longitude));
    Status::field("Level", &map.level().to_string());
    if let Some(title) = map.marker(id).and_then(|m| m.title.as_deref()) {
        Status::field("Marker", title);
    }
    Ok(())
}
