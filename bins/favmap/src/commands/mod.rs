//! CLI command implementations

pub mod favorite;
pub mod fit;
pub mod nearby;
pub mod search;
pub mod spot;

use crate::console::ConsoleNotifier;
use anyhow::Result;
use favmap_api_client::{ClientConfig, FavoritesApi, FavoritesClient};
use favmap_cli::OutputFormat;
use favmap_core::config::Config;
use favmap_core::Error;
use favmap_geo::Coordinate;
use favmap_web::{load_favorites, HeadlessMap, ViewController};
use std::path::Path;

/// What every command needs: configuration and the output format
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    pub fn load(path: Option<&str>, format: OutputFormat) -> Result<Self> {
        let config = Config::load(path)?;
        match &config.path {
            Some(p) => tracing::debug!(path = %p.display(), "Loaded configuration"),
            None => tracing::debug!("No configuration file, using defaults"),
        }
        Ok(Self { config, format })
    }

    /// Favorites endpoints configured from `[api]` and the environment
    pub fn api(&self) -> Result<FavoritesApi> {
        let config = ClientConfig::from_schema(&self.config.schema.api).map_err(Error::from)?;
        let client = FavoritesClient::with_config(config).map_err(Error::from)?;
        Ok(client.favorites())
    }

    /// Controller over a headless map in the configured initial state
    pub fn controller(&self) -> Result<ViewController<HeadlessMap>> {
        let map = &self.config.schema.map;
        let [latitude, longitude] = map.initial_center;
        let headless = HeadlessMap::new(Coordinate::new(latitude, longitude), map.initial_level);
        Ok(ViewController::from_config(headless, &self.config.schema).map_err(Error::from)?)
    }

    pub fn notifier(&self) -> ConsoleNotifier {
        ConsoleNotifier::new(!self.format.is_json())
    }
}

/// Read a favorites file in the page's JSON format
pub fn read_favorites(path: &Path) -> Result<Vec<favmap_api_client::FavoriteRecord>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::from(e).with_context(format!("reading {}", path.display())))?;
    Ok(load_favorites(&json).map_err(Error::from)?)
}
