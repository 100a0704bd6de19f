//! Nearby recommendations command

use super::{read_favorites, Context};
use anyhow::{bail, Result};
use favmap_api_client::PlanRecord;
use favmap_cli::output::{format_count, print_json};
use favmap_cli::progress::{finish_error, finish_success, spinner};
use favmap_cli::Status;
use favmap_core::Error;
use favmap_geo::BoundingBox;
use favmap_web::cards::{NEARBY_EMPTY, NEARBY_FAILED};
use favmap_web::{MapView, Panel, PanelStatus};
use std::path::Path;

/// Query recommendations for a view.
///
/// The view is, in order of preference: the box given on the command line,
/// the settled fit of a favorites file, or the configured initial map.
pub async fn run(ctx: &Context, bounds: Option<&[f64]>, favorites: Option<&Path>, html: bool) -> Result<()> {
    let mut view = ctx.controller()?;

    if let Some(values) = bounds {
        let &[south, west, north, east] = values else {
            bail!(Error::validation("--bounds takes exactly four values"));
        };
        view.map_mut().set_bounds(BoundingBox::new(south, west, north, east));
    } else if let Some(path) = favorites {
        let items = read_favorites(path)?;
        view.render_favorites(&items).map_err(Error::from)?;
        view.map_mut().settle();
    }

    let api = ctx.api()?;
    let pb = spinner("Fetching nearby recommendations", ctx.format.is_json());
    let panel = view.show_nearby(&api).await.map_err(Error::from)?;
    match panel.status {
        PanelStatus::Failed => finish_error(&pb, "Request failed"),
        _ => finish_success(&pb, &format_count(panel.records.len(), "recommendation", "recommendations")),
    }

    let queried = view.map().bounds();
    if ctx.format.is_json() {
        print_json(&serde_json::json!({ "bounds": queried, "panel": panel }))?;
    } else {
        print_panel(&panel, html);
    }

    if panel.status == PanelStatus::Failed {
        return Err(Error::network("Nearby request failed").into());
    }
    Ok(())
}

fn print_panel(panel: &Panel<PlanRecord>, html: bool) {
    Status::header("Nearby recommendations");
    match panel.status {
        PanelStatus::Empty => Status::info(NEARBY_EMPTY),
        PanelStatus::Failed => Status::error(NEARBY_FAILED),
        PanelStatus::Results => {
            for plan in &panel.records {
                let name = plan.plan_name.as_deref().unwrap_or("-");
                Status::field(name, plan.plan_addr.as_deref().unwrap_or(""));
            }
            Status::field("Markers", &panel.markers.to_string());

            if html {
                println!();
                println!("{}", panel.html);
            }
        }
    }
}
