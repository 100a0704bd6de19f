//! Map widget abstraction
//!
//! [`MapView`] is the slice of the map SDK the favorites page touches. The
//! page code only ever talks to this trait, so it runs unchanged against the
//! browser widget binding or against [`HeadlessMap`], which records state and
//! lets callers decide when the view "settles".

use favmap_core::config::MarkerImageConfig;
use favmap_geo::{BoundingBox, Coordinate, KM_PER_DEGREE_LAT};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

/// Finest zoom level the widget supports
pub const MIN_LEVEL: u8 = 1;
/// Coarsest zoom level the widget supports
pub const MAX_LEVEL: u8 = 14;
/// Width in kilometres covered at level 1; each level up doubles it
const LEVEL_ONE_SPAN_KM: f64 = 0.5;

/// Handle to a marker placed on a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MarkerId(pub u64);

/// Custom marker artwork
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerImage {
    /// Image URL
    pub src: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl MarkerImage {
    /// Image of the given size
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            src: src.into(),
            width,
            height,
        }
    }
}

impl From<&MarkerImageConfig> for MarkerImage {
    fn from(config: &MarkerImageConfig) -> Self {
        Self::new(&config.src, config.width, config.height)
    }
}

/// Everything needed to place one marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    /// Where the marker stands
    pub position: Coordinate,
    /// Hover title
    pub title: Option<String>,
    /// `None` uses the widget's default pin
    pub image: Option<MarkerImage>,
}

impl MarkerSpec {
    /// Default pin at `position`, without a title
    pub fn at(position: Coordinate) -> Self {
        Self {
            position,
            title: None,
            image: None,
        }
    }

    /// Set the hover title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Use a custom image instead of the default pin
    #[must_use]
    pub fn with_image(mut self, image: MarkerImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Callback run the next time the view goes idle.
///
/// `FnOnce` makes "runs at most once" a property of the type rather than of
/// listener bookkeeping.
pub type IdleCallback = Box<dyn FnOnce(&mut dyn MapView)>;

/// Handle returned by [`MapView::once_idle`], used to cancel a pending callback
#[derive(Debug, PartialEq, Eq)]
pub struct IdleSubscription(u64);

impl IdleSubscription {
    /// Wrap a backend-assigned id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The backend-assigned id
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The map widget surface used by the favorites page
pub trait MapView {
    /// Currently visible rectangle
    fn bounds(&self) -> BoundingBox;

    /// Pan and zoom so `bounds` is visible
    fn set_bounds(&mut self, bounds: BoundingBox);

    /// Current zoom level (smaller is closer)
    fn level(&self) -> u8;

    /// Zoom in or out; clamped to the widget's range
    fn set_level(&mut self, level: u8);

    /// Center of the visible rectangle
    fn center(&self) -> Coordinate;

    /// Pan without changing the level
    fn set_center(&mut self, center: Coordinate);

    /// Place a marker and return its id
    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId;

    /// Remove a marker; returns false when it was not on the map
    fn remove_marker(&mut self, id: MarkerId) -> bool;

    /// Open an info window anchored at a marker
    fn open_info_window(&mut self, id: MarkerId, content: &str);

    /// Close the info window anchored at a marker, if open
    fn close_info_window(&mut self, id: MarkerId);

    /// Run `callback` once, the next time the view settles
    fn once_idle(&mut self, callback: IdleCallback) -> IdleSubscription;

    /// Drop a pending idle callback; returns false if it already ran
    fn cancel_idle(&mut self, subscription: IdleSubscription) -> bool;
}

/// Zoom level whose visible width just covers `bounds`.
///
/// Level 1 spans about half a kilometre and every level doubles the span,
/// capped to the widget's `1..=14` range.
pub fn level_for_bounds(bounds: &BoundingBox) -> u8 {
    let bounds = bounds.normalized();
    let lat_km = bounds.lat_span() * KM_PER_DEGREE_LAT;
    let lng_km = bounds.lng_span() * KM_PER_DEGREE_LAT * bounds.center_latitude().to_radians().cos();
    let span_km = lat_km.max(lng_km);

    if !span_km.is_finite() || span_km <= LEVEL_ONE_SPAN_KM {
        return MIN_LEVEL;
    }

    let steps = (span_km / LEVEL_ONE_SPAN_KM).log2().ceil();
    // steps is positive and finite here
    let level = steps.min(f64::from(MAX_LEVEL)) as u8 + 1;
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Rectangle visible around `center` at `level`
fn visible_bounds(center: Coordinate, level: u8) -> BoundingBox {
    let span_km = LEVEL_ONE_SPAN_KM * 2f64.powi(i32::from(level) - 1);
    let half_lat = span_km / 2.0 / KM_PER_DEGREE_LAT;
    let cos = center.latitude.to_radians().cos().max(f64::EPSILON);
    let half_lng = half_lat / cos;

    BoundingBox::new(
        center.latitude - half_lat,
        center.longitude - half_lng,
        center.latitude + half_lat,
        center.longitude + half_lng,
    )
}

/// A map that keeps its state in memory.
///
/// Idle callbacks queue up until [`HeadlessMap::settle`] is called, mirroring
/// the widget firing `idle` after a pan or zoom finishes.
pub struct HeadlessMap {
    center: Coordinate,
    level: u8,
    visible: BoundingBox,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    open_windows: BTreeMap<MarkerId, String>,
    idle: Vec<(u64, IdleCallback)>,
    applied_bounds: Vec<BoundingBox>,
    next_marker: u64,
    next_subscription: u64,
}

impl HeadlessMap {
    /// A map centred at `center` showing `level`
    pub fn new(center: Coordinate, level: u8) -> Self {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        Self {
            center,
            level,
            visible: visible_bounds(center, level),
            markers: BTreeMap::new(),
            open_windows: BTreeMap::new(),
            idle: Vec::new(),
            applied_bounds: Vec::new(),
            next_marker: 0,
            next_subscription: 0,
        }
    }

    /// Fire every pending idle callback; returns how many ran.
    ///
    /// Callbacks registered while settling wait for the next settle.
    pub fn settle(&mut self) -> usize {
        let pending = std::mem::take(&mut self.idle);
        let count = pending.len();
        for (id, callback) in pending {
            trace!(subscription = id, "Running idle callback");
            let view: &mut dyn MapView = &mut *self;
            callback(view);
        }
        count
    }

    /// Idle callbacks waiting for the next settle
    pub fn pending_idle(&self) -> usize {
        self.idle.len()
    }

    /// Markers currently on the map, in insertion order
    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &MarkerSpec)> {
        self.markers.iter().map(|(id, spec)| (*id, spec))
    }

    /// Spec of a marker still on the map
    pub fn marker(&self, id: MarkerId) -> Option<&MarkerSpec> {
        self.markers.get(&id)
    }

    /// Number of markers on the map
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Content of the info windows currently open
    pub fn open_info_windows(&self) -> impl Iterator<Item = (MarkerId, &str)> {
        self.open_windows.iter().map(|(id, html)| (*id, html.as_str()))
    }

    /// Every box passed to `set_bounds`, normalized, oldest first
    pub fn applied_bounds(&self) -> &[BoundingBox] {
        &self.applied_bounds
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(Coordinate::new(34.5, 126.9), 10)
    }
}

impl MapView for HeadlessMap {
    fn bounds(&self) -> BoundingBox {
        self.visible
    }

    fn set_bounds(&mut self, bounds: BoundingBox) {
        // The widget rebuilds the box from its corners, which reorders edges.
        let bounds = bounds.normalized();
        self.center = bounds.center();
        self.level = level_for_bounds(&bounds);
        self.visible = bounds;
        self.applied_bounds.push(bounds);
    }

    fn level(&self) -> u8 {
        self.level
    }

    fn set_level(&mut self, level: u8) {
        self.level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        self.visible = visible_bounds(self.center, self.level);
    }

    fn center(&self) -> Coordinate {
        self.center
    }

    fn set_center(&mut self, center: Coordinate) {
        self.center = center;
        self.visible = visible_bounds(center, self.level);
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        self.next_marker += 1;
        let id = MarkerId(self.next_marker);
        self.markers.insert(id, marker);
        id
    }

    fn remove_marker(&mut self, id: MarkerId) -> bool {
        self.open_windows.remove(&id);
        self.markers.remove(&id).is_some()
    }

    fn open_info_window(&mut self, id: MarkerId, content: &str) {
        if self.markers.contains_key(&id) {
            self.open_windows.insert(id, content.to_string());
        }
    }

    fn close_info_window(&mut self, id: MarkerId) {
        self.open_windows.remove(&id);
    }

    fn once_idle(&mut self, callback: IdleCallback) -> IdleSubscription {
        self.next_subscription += 1;
        self.idle.push((self.next_subscription, callback));
        IdleSubscription::new(self.next_subscription)
    }

    fn cancel_idle(&mut self, subscription: IdleSubscription) -> bool {
        let before = self.idle.len();
        self.idle.retain(|(id, _)| *id != subscription.id());
        self.idle.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_level_for_bounds() {
        let point = BoundingBox::from_point(Coordinate::new(34.0, 126.0));
        assert_eq!(level_for_bounds(&point), MIN_LEVEL);

        // Roughly 40 km wide at 34°N
        let region = BoundingBox::new(33.927, 126.033, 34.173, 126.467);
        assert_eq!(level_for_bounds(&region), 8);

        let world = BoundingBox::new(-80.0, -170.0, 80.0, 170.0);
        assert_eq!(level_for_bounds(&world), MAX_LEVEL);
    }

    #[test]
    fn test_level_grows_with_span() {
        let small = BoundingBox::new(34.0, 126.0, 34.01, 126.01);
        let large = BoundingBox::new(34.0, 126.0, 34.5, 126.5);
        assert!(level_for_bounds(&small) < level_for_bounds(&large));
    }

    #[test]
    fn test_set_bounds_normalizes() {
        let mut map = HeadlessMap::default();
        map.set_bounds(BoundingBox::new(34.2, 126.5, 34.0, 126.0));

        let applied = map.applied_bounds()[0];
        assert_eq!(applied, BoundingBox::new(34.0, 126.0, 34.2, 126.5));
        assert_eq!(map.bounds(), applied);
        assert!((map.center().latitude - 34.1).abs() < 1e-9);
    }

    #[test]
    fn test_markers_and_info_windows() {
        let mut map = HeadlessMap::default();
        let id = map.add_marker(MarkerSpec::at(Coordinate::new(34.0, 126.0)).with_title("a"));
        map.open_info_window(id, "<div>a</div>");
        assert_eq!(map.open_info_windows().count(), 1);

        assert!(map.remove_marker(id));
        assert!(!map.remove_marker(id));
        assert_eq!(map.open_info_windows().count(), 0);

        // Opening a window on a missing marker is a no-op
        map.open_info_window(MarkerId(99), "x");
        assert_eq!(map.open_info_windows().count(), 0);
    }

    #[test]
    fn test_idle_callback_runs_once() {
        let mut map = HeadlessMap::default();
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        map.once_idle(Box::new(move |view| {
            counter.set(counter.get() + 1);
            view.set_level(3);
        }));

        assert_eq!(map.settle(), 1);
        assert_eq!(map.settle(), 0);
        assert_eq!(runs.get(), 1);
        assert_eq!(map.level(), 3);
    }

    #[test]
    fn test_cancel_idle() {
        let mut map = HeadlessMap::default();
        let subscription = map.once_idle(Box::new(|view| view.set_level(1)));
        assert!(map.cancel_idle(subscription));
        assert_eq!(map.settle(), 0);
        assert_eq!(map.level(), 10);
    }

    #[test]
    fn test_callback_registered_while_settling_waits() {
        let mut map = HeadlessMap::default();
        map.once_idle(Box::new(|view| {
            view.once_idle(Box::new(|inner| inner.set_level(2)));
        }));

        assert_eq!(map.settle(), 1);
        assert_eq!(map.pending_idle(), 1);
        map.settle();
        assert_eq!(map.level(), 2);
    }
}
