//! View layer for the favorites map
//!
//! This crate drives a map widget for the favorites page:
//! - Fitting the view to saved favorites, with a one-shot zoom floor
//! - Nearby recommendations and keyword search panels with their markers
//! - Saving and deleting favorites with user notices
//! - A single filming-location map for detail pages
//! - Result cards rendered as escaped HTML
//!
//! The widget is reached only through [`map::MapView`]; [`map::HeadlessMap`]
//! implements it in memory for tools and tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use favmap_web::{load_favorites, HeadlessMap, ViewController};
//!
//! let favorites = load_favorites(r#"[{"type":"media","name":"a","x":"126.5","y":"34.1"}]"#)?;
//! let mut view = ViewController::new(HeadlessMap::default())?;
//! if let Some(fit) = view.render_favorites(&favorites)? {
//!     println!("fitted to {:?}", fit.adjusted);
//! }
//! view.map_mut().settle();
//! # Ok::<(), favmap_web::ViewError>(())
//! ```

#![warn(missing_docs)]

pub mod actions;
pub mod backend;
pub mod cards;
pub mod controller;
pub mod error;
pub mod map;
pub mod markers;
pub mod notify;
pub mod page;

#[cfg(test)]
mod testing;

pub use actions::{DeleteOutcome, FavoriteActions, SaveOutcome};
pub use backend::FavoritesBackend;
pub use cards::{CardRenderer, SaveButton};
pub use controller::{Panel, PanelStatus, ViewController, SPOT_LEVEL, SPOT_TITLE};
pub use error::{ViewError, ViewResult};
pub use map::{HeadlessMap, IdleCallback, IdleSubscription, MapView, MarkerId, MarkerImage, MarkerSpec};
pub use markers::{BoundsFilter, MarkerPolicy};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use page::{load_favorites, partition, FavoriteTabs};
