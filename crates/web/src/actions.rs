//! Save and delete interactions
//!
//! Each interaction is a short sequence of round trips that ends in exactly
//! one user notice.

use crate::backend::FavoritesBackend;
use crate::cards::SaveButton;
use crate::notify::{Notice, Notifier};
use favmap_api_client::{FavoriteKey, FavoriteRecord};
use favmap_telemetry::Event;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, instrument, warn};

/// How a save attempt ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// The duplicate check found an existing entry; nothing was created
    AlreadySaved,
    /// The server wants a logged-in session
    LoginRequired,
    /// The check or the create failed
    Failed,
    /// Created; the page should reload to show it
    Saved(FavoriteRecord),
}

impl SaveOutcome {
    /// Whether the caller should reload the favorites list
    pub fn should_reload(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// How a delete attempt ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The server wants a login first
    LoginRequired,
    /// The request failed; a notice was sent
    Failed,
    /// Deleted; carries the server's confirmation text
    Deleted(String),
}

/// Save/delete interactions bound to a backend and a notice sink
pub struct FavoriteActions<'a, B, N: ?Sized> {
    backend: &'a B,
    notifier: &'a N,
}

impl<'a, B, N> FavoriteActions<'a, B, N>
where
    B: FavoritesBackend,
    N: Notifier + ?Sized,
{
    /// Actions over `backend`, reporting through `notifier`
    pub fn new(backend: &'a B, notifier: &'a N) -> Self {
        Self { backend, notifier }
    }

    /// Check for a duplicate, then create.
    ///
    /// The check and the create are separate round trips; an entry saved by
    /// someone else in between is not detected.
    #[instrument(skip_all, fields(name = %button.name))]
    pub async fn save(&self, button: &SaveButton) -> SaveOutcome {
        let favorite = button.to_new_favorite();
        let key = favorite.key();

        let outcome = match self.backend.check(&key).await {
            Ok(true) => SaveOutcome::AlreadySaved,
            Ok(false) => match self.backend.create(&favorite).await {
                Ok(record) => SaveOutcome::Saved(record),
                Err(e) if e.is_unauthorized() => SaveOutcome::LoginRequired,
                Err(e) => {
                    error!(error = %e, "Saving favorite failed");
                    SaveOutcome::Failed
                }
            },
            Err(e) => {
                error!(error = %e, "Duplicate check failed");
                SaveOutcome::Failed
            }
        };

        let notice = match &outcome {
            SaveOutcome::AlreadySaved => Notice::AlreadySaved,
            SaveOutcome::LoginRequired => Notice::SaveLoginRequired,
            SaveOutcome::Failed => Notice::SaveFailed,
            SaveOutcome::Saved(_) => {
                Event::new("favorite.saved", json!({ "type": key.kind, "name": key.name })).log();
                Notice::Saved
            }
        };
        self.notifier.notify(&notice);
        outcome
    }

    /// Delete a saved favorite
    #[instrument(skip_all, fields(name = %key.name))]
    pub async fn delete(&self, key: &FavoriteKey) -> DeleteOutcome {
        let outcome = match self.backend.delete(key).await {
            Ok(message) => {
                info!(message = %message, "Favorite deleted");
                DeleteOutcome::Deleted(message)
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Delete rejected without a session");
                DeleteOutcome::LoginRequired
            }
            Err(e) => {
                error!(error = %e, "Deleting favorite failed");
                DeleteOutcome::Failed
            }
        };

        let notice = match &outcome {
            DeleteOutcome::LoginRequired => Notice::DeleteLoginRequired,
            DeleteOutcome::Failed => Notice::DeleteFailed,
            DeleteOutcome::Deleted(message) => Notice::Deleted(message.clone()),
        };
        self.notifier.notify(&notice);
        outcome
    }
}
