//! Fit command

use super::{read_favorites, Context};
use anyhow::Result;
use favmap_cli::output::{format_count, format_duration, format_position, print_json};
use favmap_cli::Status;
use favmap_core::Error;
use favmap_geo::{BoundingBox, Coordinate, FittedViewport};
use favmap_telemetry::{metrics, names};
use favmap_web::{partition, HeadlessMap, MapView};
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::time::Instant;

#[derive(Serialize)]
struct MarkerRow {
    id: u64,
    title: Option<String>,
    position: Coordinate,
    image: Option<String>,
}

#[derive(Serialize)]
struct FitReport {
    favorites: usize,
    media: usize,
    theme: usize,
    markers: usize,
    skipped: usize,
    fitted: Option<FittedViewport>,
    bounds: BoundingBox,
    center: Coordinate,
    level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    marker_list: Option<Vec<MarkerRow>>,
}

/// Place the favorites on a headless map, fit, let it settle and report the view
pub fn run(ctx: &Context, file: &Path, list_markers: bool) -> Result<()> {
    let started = Instant::now();
    let favorites = read_favorites(file)?;
    if favorites.is_empty() {
        return Err(Error::empty_point_set()
            .with_context(format!("{} holds no favorites", file.display()))
            .into());
    }

    let skipped_before = metrics().counter(names::POINTS_SKIPPED);
    let mut view = ctx.controller()?;
    let fitted = view.render_favorites(&favorites).map_err(Error::from)?;
    let skipped = metrics().counter(names::POINTS_SKIPPED).saturating_sub(skipped_before);
    let skipped = usize::try_from(skipped).unwrap_or(usize::MAX);
    let markers = view.favorite_markers().len();

    if markers == 0 {
        return Err(Error::empty_point_set()
            .with_context(format!("{} favorites, none with usable coordinates", favorites.len()))
            .into());
    }

    let map = view.map_mut();
    let callbacks = map.settle();
    tracing::debug!(callbacks, "Map settled");

    let tabs = partition(favorites);
    let report = FitReport {
        favorites: tabs.len(),
        media: tabs.media.len(),
        theme: tabs.theme.len(),
        markers,
        skipped,
        fitted,
        bounds: map.bounds(),
        center: map.center(),
        level: map.level(),
        marker_list: list_markers.then(|| marker_rows(map)),
    };

    if ctx.format.is_json() {
        print_json(&json!({ "fit": report, "metrics": metrics().export_json() }))?;
        return Ok(());
    }

    Status::header("Viewport fit");
    Status::field(
        "Favorites",
        &format!("{} ({} media, {} theme)", report.favorites, report.media, report.theme),
    );
    Status::field("Markers", &format_count(report.markers, "marker", "markers"));
    if report.skipped > 0 {
        Status::warning(&format!(
            "{} without usable coordinates",
            format_count(report.skipped, "favorite", "favorites")
        ));
    }

    match &report.fitted {
        Some(fitted) => {
            Status::field("Raw bounds", &format_bounds(&fitted.raw));
            Status::field("Adjusted bounds", &format_bounds(&fitted.adjusted));
            Status::field(
                "Margin",
                &format!("{:.4}° lat, {:.4}° lng", fitted.lat_offset, fitted.lng_offset),
            );
            if fitted.adjusted.is_inverted() {
                Status::warning("Margin is wider than the favorites' spread; the adjusted box is inverted");
            }
        }
        None => Status::info("No favorite counts toward the bounds; the view was left as is"),
    }

    Status::field("Center", &format_position(report.center.latitude, report.center.longitude));
    Status::field("Level", &report.level.to_string());

    if let Some(rows) = &report.marker_list {
        Status::header("Markers");
        for row in rows {
            Status::field(
                &format!("#{}", row.id),
                &format!(
                    "{} @ {} [{}]",
                    row.title.as_deref().unwrap_or("-"),
                    format_position(row.position.latitude, row.position.longitude),
                    row.image.as_deref().unwrap_or("default pin")
                ),
            );
        }
    }

    println!();
    Status::success(&format!("Fitted in {}", format_duration(started.elapsed())));
    Ok(())
}

fn marker_rows(map: &HeadlessMap) -> Vec<MarkerRow> {
    map.markers()
        .map(|(id, spec)| MarkerRow {
            id: id.0,
            title: spec.title.clone(),
            position: spec.position,
            image: spec.image.as_ref().map(|image| image.src.clone()),
        })
        .collect()
}

fn format_bounds(bounds: &BoundingBox) -> String {
    format!(
        "S {:.4}  W {:.4}  N {:.4}  E {:.4}",
        bounds.south, bounds.west, bounds.north, bounds.east
    )
}
