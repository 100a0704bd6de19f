//! Favorites injected into the page
//!
//! The favorites page embeds the user's list as a JSON array and shows media
//! filming locations and themed attractions in separate tabs.

use crate::error::ViewResult;
use favmap_api_client::FavoriteRecord;
use serde::Serialize;

/// Favorites split the way the page's tabs show them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FavoriteTabs {
    /// Favorites shown on the media tab
    pub media: Vec<FavoriteRecord>,
    /// Everything that is not media
    pub theme: Vec<FavoriteRecord>,
}

impl FavoriteTabs {
    /// Favorites across both tabs
    pub fn len(&self) -> usize {
        self.media.len() + self.theme.len()
    }

    /// True when neither tab has favorites
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode the page-injected favorites array
pub fn load_favorites(json: &str) -> ViewResult<Vec<FavoriteRecord>> {
    let json = json.trim();
    if json.is_empty() || json == "null" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(json)?)
}

/// Split favorites into media and theme lists; the type match ignores case
pub fn partition(favorites: Vec<FavoriteRecord>) -> FavoriteTabs {
    let (media, theme) = favorites
        .into_iter()
        .partition(|f| f.kind.eq_ignore_ascii_case("media"));
    FavoriteTabs { media, theme }
}
