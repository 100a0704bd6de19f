//! Check, save and delete commands

use super::Context;
use anyhow::Result;
use clap::Args;
use favmap_api_client::FavoriteKey;
use favmap_cli::output::print_json;
use favmap_cli::progress::{finish_error, finish_success, spinner};
use favmap_cli::Status;
use favmap_core::Error;
use favmap_web::{DeleteOutcome, FavoriteActions, SaveButton, SaveOutcome};
use serde_json::json;

/// Identifies a saved favorite
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Favorite type (media, theme, ...)
    #[arg(short = 't', long = "type", default_value = "theme")]
    pub kind: String,

    /// Place name
    #[arg(short, long)]
    pub name: String,

    /// Address the favorite was saved with
    #[arg(short, long)]
    pub location: String,
}

impl KeyArgs {
    fn key(&self) -> FavoriteKey {
        FavoriteKey::new(&self.kind, &self.name, &self.location)
    }
}

/// The data a card's save button carries
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Favorite type; saved as "theme" when omitted
    #[arg(short = 't', long = "type", default_value = "")]
    pub kind: String,

    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub address: String,

    /// Longitude
    #[arg(short, long, allow_negative_numbers = true)]
    pub x: Option<String>,

    /// Latitude
    #[arg(short, long, allow_negative_numbers = true)]
    pub y: Option<String>,

    #[arg(long, default_value = "")]
    pub phone: String,

    /// Homepage
    #[arg(long, default_value = "")]
    pub url: String,

    #[arg(long, default_value = "")]
    pub poster_url: String,

    /// Description
    #[arg(long, default_value = "")]
    pub contents: String,

    #[arg(long, default_value = "")]
    pub parking: String,
}

impl SaveArgs {
    fn button(&self) -> SaveButton {
        SaveButton {
            kind: self.kind.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            url: self.url.clone(),
            x: self.x.clone().unwrap_or_default(),
            y: self.y.clone().unwrap_or_default(),
            poster_url: self.poster_url.clone(),
            contents: self.contents.clone(),
            plan_parking: self.parking.clone(),
        }
    }
}

/// Ask the server whether the favorite exists
pub async fn check(ctx: &Context, args: &KeyArgs) -> Result<()> {
    let api = ctx.api()?;
    let key = args.key();

    let pb = spinner("Checking favorites", ctx.format.is_json());
    let exists = match api.check(&key).await {
        Ok(exists) => {
            finish_success(&pb, "Checked");
            exists
        }
        Err(e) => {
            finish_error(&pb, "Check failed");
            return Err(Error::from(e).into());
        }
    };

    if ctx.format.is_json() {
        print_json(&json!({ "key": key, "exists": exists }))?;
    } else if exists {
        Status::success(&format!("{} is saved", key.name));
    } else {
        Status::info(&format!("{} is not saved", key.name));
    }
    Ok(())
}

/// Save unless the duplicate check finds the favorite
pub async fn save(ctx: &Context, args: &SaveArgs) -> Result<()> {
    let api = ctx.api()?;
    let notifier = ctx.notifier();
    let button = args.button();

    let outcome = FavoriteActions::new(&api, &notifier).save(&button).await;

    if ctx.format.is_json() {
        print_json(&json!({
            "favorite": button.to_new_favorite(),
            "outcome": outcome,
            "notices": notifier.notices(),
        }))?;
    } else if let SaveOutcome::Saved(record) = &outcome {
        if let Some(id) = &record.id {
            Status::field("Id", id);
        }
    }

    match outcome {
        SaveOutcome::Saved(_) | SaveOutcome::AlreadySaved => Ok(()),
        SaveOutcome::LoginRequired => Err(Error::login_required().into()),
        SaveOutcome::Failed => Err(Error::network("Saving the favorite failed").into()),
    }
}

/// Delete a saved favorite
pub async fn delete(ctx: &Context, args: &KeyArgs) -> Result<()> {
    let api = ctx.api()?;
    let notifier = ctx.notifier();
    let key = args.key();

    let outcome = FavoriteActions::new(&api, &notifier).delete(&key).await;

    if ctx.format.is_json() {
        print_json(&json!({ "key": key, "outcome": outcome, "notices": notifier.notices() }))?;
    }

    match outcome {
        DeleteOutcome::Deleted(_) => Ok(()),
        DeleteOutcome::LoginRequired => Err(Error::login_required().into()),
        DeleteOutcome::Failed => Err(Error::network("Deleting the favorite failed").into()),
    }
}
