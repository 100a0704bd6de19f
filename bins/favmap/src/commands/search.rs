//! Keyword search command

use super::Context;
use anyhow::Result;
use favmap_cli::output::{format_count, print_json};
use favmap_cli::progress::{finish_error, finish_success, spinner};
use favmap_cli::Status;
use favmap_core::Error;
use favmap_web::cards::SEARCH_EMPTY;
use favmap_web::{Notice, PanelStatus, SaveButton};
use serde_json::json;

/// Search attractions and place their markers on a headless map
pub async fn run(ctx: &Context, keyword: &str, html: bool) -> Result<()> {
    let mut view = ctx.controller()?;
    let notifier = ctx.notifier();

    // A blank keyword never reaches the server.
    let api = ctx.api()?;
    let pb = spinner(&format!("Searching \"{}\"", keyword.trim()), ctx.format.is_json());
    let panel = view.search(&api, &notifier, keyword).await.map_err(Error::from)?;

    let Some(panel) = panel else {
        finish_error(&pb, "No search");
        if ctx.format.is_json() {
            print_json(&json!({ "keyword": keyword, "notices": notifier.notices() }))?;
        }
        return Err(match notifier.last() {
            Some(Notice::EmptyKeyword) => Error::validation("Search keyword is blank"),
            _ => Error::network("Tour search failed"),
        }
        .into());
    };
    finish_success(&pb, &format_count(panel.records.len(), "result", "results"));

    if ctx.format.is_json() {
        let buttons: Vec<SaveButton> = panel.records.iter().map(SaveButton::from_tour).collect();
        print_json(&json!({ "keyword": keyword, "panel": panel, "save_buttons": buttons }))?;
        return Ok(());
    }

    Status::header(&format!("Search: {}", keyword.trim()));
    if panel.status == PanelStatus::Empty {
        Status::info(SEARCH_EMPTY);
        return Ok(());
    }

    for tour in &panel.records {
        Status::field(&tour.name, tour.address.as_deref().unwrap_or(""));
    }
    Status::field("Markers", &panel.markers.to_string());

    if html {
        println!();
        println!("{}", panel.html);
    }
    Ok(())
}
