//! View state for the favorites map
//!
//! [`ViewController`] owns the map together with everything the page used to
//! keep in globals: the favorite markers, the current search and nearby
//! markers, and which info window is open.

use crate::backend::FavoritesBackend;
use crate::cards::{CardRenderer, NEARBY_EMPTY, NEARBY_FAILED};
use crate::error::ViewResult;
use crate::map::{IdleSubscription, MapView, MarkerId, MarkerSpec};
use crate::markers::MarkerPolicy;
use crate::notify::{Notice, Notifier};
use favmap_api_client::{FavoriteRecord, NearbyQuery, PlanRecord, TourRecord};
use favmap_core::config::ConfigSchema;
use favmap_geo::{parse_point, FittedViewport, InversionPolicy, ViewportFitter, ZoomFloor};
use favmap_telemetry::{metrics, names, Timer};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

/// Level the filming-location map opens at
pub const SPOT_LEVEL: u8 = 4;

/// Title of the filming-location marker
pub const SPOT_TITLE: &str = "촬영지";

/// Whether a panel shows results, an empty message or an error message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    /// At least one card
    Results,
    /// The request succeeded with nothing to show
    Empty,
    /// The request failed
    Failed,
}

/// What a nearby/search interaction put in its panel
#[derive(Debug, Clone, Serialize)]
pub struct Panel<T> {
    /// What the panel shows
    pub status: PanelStatus,
    /// Rendered HTML for the panel
    pub html: String,
    /// Records behind the cards
    pub records: Vec<T>,
    /// Markers placed for those records
    pub markers: usize,
}

/// Owns the map and the markers placed on it
pub struct ViewController<M: MapView> {
    map: M,
    fitter: ViewportFitter,
    floor: ZoomFloor,
    policy: MarkerPolicy,
    cards: CardRenderer,
    favorite_markers: Vec<MarkerId>,
    nearby_markers: Vec<MarkerId>,
    search_markers: Vec<MarkerId>,
    spot_marker: Option<MarkerId>,
    info_windows: HashMap<MarkerId, String>,
    open_info: Option<MarkerId>,
    pending_floor: Option<IdleSubscription>,
}

impl<M: MapView> ViewController<M> {
    /// Controller with the default fitter, zoom floor and marker policy
    pub fn new(map: M) -> ViewResult<Self> {
        Ok(Self {
            map,
            fitter: ViewportFitter::default(),
            floor: ZoomFloor::default(),
            policy: MarkerPolicy::default(),
            cards: CardRenderer::new()?,
            favorite_markers: Vec::new(),
            nearby_markers: Vec::new(),
            search_markers: Vec::new(),
            spot_marker: None,
            info_windows: HashMap::new(),
            open_info: None,
            pending_floor: None,
        })
    }

    /// Controller configured from the `[viewport]` and `[markers]` sections
    pub fn from_config(map: M, config: &ConfigSchema) -> ViewResult<Self> {
        let viewport = &config.viewport;
        let inversion = InversionPolicy::from_name(&viewport.inversion).unwrap_or_else(|| {
            warn!(value = %viewport.inversion, "Unknown inversion policy, using allow");
            InversionPolicy::Allow
        });

        let fitter = ViewportFitter::default()
            .with_margin_km(viewport.margin_km)
            .with_km_per_degree(viewport.km_per_degree)
            .with_inversion_policy(inversion);
        fitter.validate()?;
        let floor = ZoomFloor {
            threshold: viewport.min_level,
            fallback: viewport.fallback_level,
        };

        Ok(Self::new(map)?
            .with_fitter(fitter)
            .with_zoom_floor(floor)
            .with_policy(MarkerPolicy::from_config(&config.markers)))
    }

    /// Replace the viewport fitter
    #[must_use]
    pub fn with_fitter(mut self, fitter: ViewportFitter) -> Self {
        self.fitter = fitter;
        self
    }

    /// Replace the one-shot zoom floor
    #[must_use]
    pub fn with_zoom_floor(mut self, floor: ZoomFloor) -> Self {
        self.floor = floor;
        self
    }

    /// Replace the marker policy
    #[must_use]
    pub fn with_policy(mut self, policy: MarkerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The map being driven
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Mutable access to the map, e.g. to let it settle
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Consume the controller and return the map
    pub fn into_map(self) -> M {
        self.map
    }

    /// Markers placed for the saved favorites
    pub fn favorite_markers(&self) -> &[MarkerId] {
        &self.favorite_markers
    }

    /// Markers placed by the last nearby query
    pub fn nearby_markers(&self) -> &[MarkerId] {
        &self.nearby_markers
    }

    /// Markers placed by the last search
    pub fn search_markers(&self) -> &[MarkerId] {
        &self.search_markers
    }

    /// Marker whose info window is open, if any
    pub fn open_info_window(&self) -> Option<MarkerId> {
        self.open_info
    }

    /// Place the saved favorites and fit the view to them.
    ///
    /// Applies the raw box, then the margin-adjusted box, then registers a
    /// one-shot idle callback that backs the zoom off when it settled too
    /// close. Returns `None` when there was nothing to fit.
    #[instrument(skip_all, fields(items = items.len()))]
    pub fn render_favorites(&mut self, items: &[FavoriteRecord]) -> ViewResult<Option<FittedViewport>> {
        if items.is_empty() {
            error!("Favorites list is empty");
            return Ok(None);
        }

        self.clear_favorites();

        let mut points = Vec::with_capacity(items.len());
        for item in items {
            let Some(marker) = self.policy.favorite_marker(item) else {
                debug!(name = %item.name, x = %item.x, y = %item.y, "Skipping favorite without usable coordinates");
                metrics().increment(names::POINTS_SKIPPED);
                continue;
            };

            if self.policy.counts_toward_bounds(&item.kind) {
                points.push(marker.position);
            }

            let id = self.place(marker, &item.name)?;
            self.favorite_markers.push(id);
        }

        if points.is_empty() {
            warn!(markers = self.favorite_markers.len(), "No favorite counts toward the bounds");
            return Ok(None);
        }

        let fitted = {
            let _timer = Timer::start(names::FIT_MS);
            self.fitter.fit(&points)?
        };

        if fitted.adjusted.is_inverted() {
            debug!(adjusted = ?fitted.adjusted, "Margin crossed the bounds");
        }

        self.map.set_bounds(fitted.raw);
        self.map.set_bounds(fitted.adjusted);

        let floor = self.floor;
        let subscription = self.map.once_idle(Box::new(move |map: &mut dyn MapView| {
            let settled = map.level();
            if let Some(level) = floor.correct(settled) {
                debug!(settled, level, "Backing off zoom after fit");
                map.set_level(level);
            }
        }));
        self.pending_floor = Some(subscription);

        info!(markers = self.favorite_markers.len(), points = points.len(), "Favorites rendered");
        Ok(Some(fitted))
    }

    /// Handle a marker click: close the open info window and open this one.
    ///
    /// Returns false for markers this controller did not place.
    pub fn click_marker(&mut self, id: MarkerId) -> bool {
        let Some(content) = self.info_windows.get(&id) else {
            return false;
        };

        if let Some(previous) = self.open_info.take() {
            self.map.close_info_window(previous);
        }
        self.map.open_info_window(id, content);
        self.open_info = Some(id);
        true
    }

    /// Fetch recommendations inside the current view and show them.
    ///
    /// Failures become the panel's error message; previous nearby markers are
    /// replaced either way.
    #[instrument(skip_all)]
    pub async fn show_nearby<B: FavoritesBackend>(&mut self, backend: &B) -> ViewResult<Panel<PlanRecord>> {
        let query = NearbyQuery::from(self.map.bounds());
        debug!(?query, "Requesting nearby plans");

        let plans = match backend.nearby(&query).await {
            Ok(plans) => plans,
            Err(e) => {
                error!(error = %e, "Nearby request failed");
                self.clear_markers(MarkerGroup::Nearby);
                return Ok(Panel {
                    status: PanelStatus::Failed,
                    html: self.cards.message(NEARBY_FAILED)?,
                    records: Vec::new(),
                    markers: 0,
                });
            }
        };

        self.clear_markers(MarkerGroup::Nearby);

        if plans.is_empty() {
            return Ok(Panel {
                status: PanelStatus::Empty,
                html: self.cards.message(NEARBY_EMPTY)?,
                records: plans,
                markers: 0,
            });
        }

        let html = self.cards.nearby_cards(&plans)?;
        for plan in &plans {
            if let Some(marker) = self.policy.nearby_marker(plan) {
                let title = plan.plan_name.clone().unwrap_or_default();
                let id = self.place(marker, &title)?;
                self.nearby_markers.push(id);
            }
        }

        Ok(Panel {
            status: PanelStatus::Results,
            html,
            markers: self.nearby_markers.len(),
            records: plans,
        })
    }

    /// Run a keyword search and show the hits.
    ///
    /// A blank keyword or a failed request only raises a notice and leaves the
    /// current search markers alone; `None` is returned in both cases.
    #[instrument(skip(self, backend, notifier))]
    pub async fn search<B, N>(
        &mut self,
        backend: &B,
        notifier: &N,
        keyword: &str,
    ) -> ViewResult<Option<Panel<TourRecord>>>
    where
        B: FavoritesBackend,
        N: Notifier + ?Sized,
    {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            notifier.notify(&Notice::EmptyKeyword);
            return Ok(None);
        }

        let tours = match backend.search_tour(keyword).await {
            Ok(tours) => tours,
            Err(e) => {
                error!(error = %e, "Tour search failed");
                notifier.notify(&Notice::SearchFailed);
                return Ok(None);
            }
        };

        self.clear_markers(MarkerGroup::Search);

        if tours.is_empty() {
            return Ok(Some(Panel {
                status: PanelStatus::Empty,
                html: self.cards.search_empty()?,
                records: tours,
                markers: 0,
            }));
        }

        let html = self.cards.search_cards(&tours)?;
        for tour in &tours {
            if let Some(marker) = self.policy.search_marker(tour) {
                let id = self.map.add_marker(marker);
                self.search_markers.push(id);
            }
        }
        metrics().increment_by(names::MARKERS_PLACED, self.search_markers.len() as u64);

        Ok(Some(Panel {
            status: PanelStatus::Results,
            html,
            markers: self.search_markers.len(),
            records: tours,
        }))
    }

    /// Recenter on a card's coordinates; values that do not parse are ignored
    pub fn move_to(&mut self, x: &Value, y: &Value) -> bool {
        match parse_point(y, x) {
            Some(center) => {
                self.map.set_center(center);
                true
            }
            None => {
                debug!(%x, %y, "Ignoring move to unusable coordinates");
                false
            }
        }
    }

    /// Show one filming location: center on it at [`SPOT_LEVEL`] under a
    /// single marker titled [`SPOT_TITLE`].
    ///
    /// The map is left alone when either coordinate does not parse.
    #[instrument(skip(self))]
    pub fn show_spot(&mut self, latitude: &Value, longitude: &Value) -> Option<MarkerId> {
        let Some(position) = parse_point(latitude, longitude) else {
            error!(%latitude, %longitude, "Spot map not shown: no usable coordinates");
            return None;
        };

        if let Some(previous) = self.spot_marker.take() {
            self.map.remove_marker(previous);
        }
        self.map.set_center(position);
        self.map.set_level(SPOT_LEVEL);

        let id = self.map.add_marker(MarkerSpec::at(position).with_title(SPOT_TITLE));
        self.spot_marker = Some(id);
        metrics().increment(names::MARKERS_PLACED);
        Some(id)
    }

    /// Marker placed by the last [`ViewController::show_spot`]
    pub fn spot_marker(&self) -> Option<MarkerId> {
        self.spot_marker
    }

    /// Add a marker with a clickable info window titled `title`
    fn place(&mut self, marker: MarkerSpec, title: &str) -> ViewResult<MarkerId> {
        let content = self.cards.info_window(title)?;
        let id = self.map.add_marker(marker);
        self.info_windows.insert(id, content);
        metrics().increment(names::MARKERS_PLACED);
        Ok(id)
    }

    fn clear_favorites(&mut self) {
        if let Some(subscription) = self.pending_floor.take() {
            self.map.cancel_idle(subscription);
        }
        self.clear_markers(MarkerGroup::Favorites);
    }

    fn clear_markers(&mut self, group: MarkerGroup) {
        let ids = std::mem::take(match group {
            MarkerGroup::Favorites => &mut self.favorite_markers,
            MarkerGroup::Nearby => &mut self.nearby_markers,
            MarkerGroup::Search => &mut self.search_markers,
        });

        for id in ids {
            self.info_windows.remove(&id);
            if self.open_info == Some(id) {
                self.map.close_info_window(id);
                self.open_info = None;
            }
            self.map.remove_marker(id);
        }
    }
}

#[derive(Clone, Copy)]
enum MarkerGroup {
    Favorites,
    Nearby,
    Search,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::HeadlessMap;
    use crate::notify::RecordingNotifier;
    use crate::testing::FakeBackend;
    use favmap_api_client::ApiError;
    use favmap_geo::{BoundingBox, Coordinate};
    use serde_json::json;
    use tokio_test::block_on;

    fn favorite(kind: &str, lat: f64, lng: f64) -> FavoriteRecord {
        FavoriteRecord {
            kind: kind.into(),
            name: format!("{kind} {lat}"),
            x: json!(lng),
            y: json!(lat),
            ..FavoriteRecord::default()
        }
    }

    fn controller() -> ViewController<HeadlessMap> {
        ViewController::new(HeadlessMap::default()).unwrap()
    }

    fn reference_favorites() -> Vec<FavoriteRecord> {
        vec![
            favorite("media", 34.0, 126.0),
            favorite("theme", 34.2, 126.3),
            favorite("media", 33.9, 126.1),
            favorite("course", 34.1, 126.5),
        ]
    }

    #[test]
    fn test_render_favorites_applies_raw_then_adjusted() {
        let mut view = controller();
        let fitted = view.render_favorites(&reference_favorites()).unwrap().unwrap();

        let applied = view.map().applied_bounds();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0], BoundingBox::new(33.9, 126.0, 34.2, 126.5));
        assert!((applied[1].south - 33.927).abs() < 1e-3);
        assert!((applied[1].east - 126.467).abs() < 1e-3);
        assert_eq!(fitted.raw, applied[0]);
        assert_eq!(view.favorite_markers().len(), 4);
        assert_eq!(view.map().pending_idle(), 1);
    }

    #[test]
    fn test_render_favorites_empty_and_invalid() {
        let mut view = controller();
        assert!(view.render_favorites(&[]).unwrap().is_none());
        assert!(view.map().applied_bounds().is_empty());

        let mut bad = favorite("theme", 34.0, 126.0);
        bad.x = json!("abc");
        let fitted = view
            .render_favorites(&[bad, favorite("theme", 34.2, 126.3)])
            .unwrap();
        assert!(fitted.is_some());
        assert_eq!(view.favorite_markers().len(), 1);
    }

    #[test]
    fn test_bounds_filter_limits_fit() {
        let policy = MarkerPolicy::default()
            .with_bounds_filter(crate::markers::BoundsFilter::Only(vec!["media".into()]));
        let mut view = controller().with_policy(policy);
        let fitted = view.render_favorites(&reference_favorites()).unwrap().unwrap();

        assert_eq!(fitted.raw, BoundingBox::new(33.9, 126.0, 34.0, 126.1));
        assert_eq!(view.favorite_markers().len(), 4);
    }

    #[test]
    fn test_zoom_floor_fires_once() {
        let mut view = controller()
            .with_fitter(ViewportFitter::default().with_inversion_policy(InversionPolicy::Collapse));
        view.render_favorites(&[favorite("media", 34.0, 126.0)]).unwrap();

        // A collapsed single point settles at the finest level
        assert_eq!(view.map().level(), 1);
        assert_eq!(view.map_mut().settle(), 1);
        assert_eq!(view.map().level(), 6);

        view.map_mut().set_level(2);
        assert_eq!(view.map_mut().settle(), 0);
        assert_eq!(view.map().level(), 2);
    }

    #[test]
    fn test_zoom_floor_leaves_wide_fits_alone() {
        let mut view = controller();
        view.render_favorites(&reference_favorites()).unwrap();
        let level = view.map().level();
        assert!(level >= 5);
        view.map_mut().settle();
        assert_eq!(view.map().level(), level);
    }

    #[test]
    fn test_rerender_replaces_markers_and_pending_floor() {
        let mut view = controller();
        view.render_favorites(&reference_favorites()).unwrap();
        view.render_favorites(&[favorite("theme", 34.0, 126.0)]).unwrap();

        assert_eq!(view.map().marker_count(), 1);
        assert_eq!(view.map().pending_idle(), 1);
    }

    #[test]
    fn test_click_marker_keeps_one_window_open() {
        let mut view = controller();
        view.render_favorites(&reference_favorites()).unwrap();
        let first = view.favorite_markers()[0];
        let second = view.favorite_markers()[1];

        assert!(view.click_marker(first));
        assert!(view.click_marker(second));

        let open: Vec<_> = view.map().open_info_windows().collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].0, second);
        assert!(open[0].1.contains("theme 34.2"));
        assert!(!view.click_marker(MarkerId(999)));
    }

    #[test]
    fn test_show_nearby_queries_current_bounds() {
        let backend = FakeBackend::default().with_plans(vec![PlanRecord {
            plan_name: Some("보성 녹차밭".into()),
            plan_latitude: json!(34.71),
            plan_longitude: json!(127.08),
            ..PlanRecord::default()
        }]);
        let mut view = controller();
        view.map_mut().set_bounds(BoundingBox::new(34.0, 126.0, 35.0, 127.5));

        let panel = block_on(view.show_nearby(&backend)).unwrap();
        assert_eq!(panel.status, PanelStatus::Results);
        assert_eq!(panel.markers, 1);
        assert!(panel.html.contains("보성 녹차밭"));

        let query = backend.last_nearby().unwrap();
        assert_eq!(query.lat_min, 34.0);
        assert_eq!(query.lng_max, 127.5);

        // Showing again replaces rather than accumulates
        block_on(view.show_nearby(&backend)).unwrap();
        assert_eq!(view.nearby_markers().len(), 1);
    }

    #[test]
    fn test_show_nearby_empty_and_failed() {
        let mut view = controller();
        let panel = block_on(view.show_nearby(&FakeBackend::default())).unwrap();
        assert_eq!(panel.status, PanelStatus::Empty);
        assert_eq!(panel.html, "<p>추천 관광지가 없습니다.</p>");

        let failing = FakeBackend::default().failing_nearby(ApiError::api_response(500, "boom"));
        let panel = block_on(view.show_nearby(&failing)).unwrap();
        assert_eq!(panel.status, PanelStatus::Failed);
        assert_eq!(panel.html, "<p>데이터를 불러오는 중 오류가 발생했습니다.</p>");
    }

    #[test]
    fn test_search_blank_keyword_skips_request() {
        let backend = FakeBackend::default();
        let notifier = RecordingNotifier::new();
        let mut view = controller();

        let panel = block_on(view.search(&backend, &notifier, "   ")).unwrap();
        assert!(panel.is_none());
        assert_eq!(notifier.notices(), vec![Notice::EmptyKeyword]);
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn test_search_replaces_markers() {
        let tours = vec![
            TourRecord {
                name: "낙안읍성".into(),
                x: json!(127.34),
                y: json!(34.9),
                ..TourRecord::default()
            },
            TourRecord {
                name: "좌표 없음".into(),
                ..TourRecord::default()
            },
        ];
        let backend = FakeBackend::default().with_tours(tours);
        let notifier = RecordingNotifier::new();
        let mut view = controller();

        let panel = block_on(view.search(&backend, &notifier, "순천")).unwrap().unwrap();
        assert_eq!(panel.records.len(), 2);
        assert_eq!(panel.markers, 1);
        block_on(view.search(&backend, &notifier, "순천")).unwrap();
        assert_eq!(view.search_markers().len(), 1);
        assert_eq!(view.map().marker_count(), 1);

        let marker = view.map().marker(view.search_markers()[0]).unwrap();
        assert_eq!(marker.image.as_ref().unwrap().src, "/images/themeSearchMarker.png");
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_search_empty_and_failed() {
        let notifier = RecordingNotifier::new();
        let mut view = controller();

        let panel = block_on(view.search(&FakeBackend::default(), &notifier, "없는곳"))
            .unwrap()
            .unwrap();
        assert_eq!(panel.status, PanelStatus::Empty);
        assert!(panel.html.contains("검색 결과가 없습니다."));

        let failing = FakeBackend::default().failing_search(ApiError::api_response(502, "bad"));
        assert!(block_on(view.search(&failing, &notifier, "목포")).unwrap().is_none());
        assert_eq!(notifier.last(), Some(Notice::SearchFailed));
    }

    #[test]
    fn test_move_to() {
        let mut view = controller();
        assert!(view.move_to(&json!("127.5"), &json!("34.8")));
        assert_eq!(view.map().center(), Coordinate::new(34.8, 127.5));

        assert!(!view.move_to(&json!("abc"), &json!(34.8)));
        assert_eq!(view.map().center(), Coordinate::new(34.8, 127.5));
    }

    #[test]
    fn test_show_spot_centers_at_level_four() {
        let mut view = controller();
        let id = view.show_spot(&json!("34.7604"), &json!(127.6622)).unwrap();

        assert_eq!(view.map().center(), Coordinate::new(34.7604, 127.6622));
        assert_eq!(view.map().level(), SPOT_LEVEL);
        assert_eq!(view.map().marker_count(), 1);

        let marker = view.map().marker(id).unwrap();
        assert_eq!(marker.title.as_deref(), Some("촬영지"));
        assert_eq!(marker.position, Coordinate::new(34.7604, 127.6622));

        // A second spot replaces the first marker
        let second = view.show_spot(&json!(34.8), &json!(126.4)).unwrap();
        assert_eq!(view.map().marker_count(), 1);
        assert_eq!(view.spot_marker(), Some(second));
    }

    #[test]
    fn test_show_spot_without_coordinates() {
        let mut view = controller();
        let center = view.map().center();
        let level = view.map().level();

        assert!(view.show_spot(&json!(""), &json!("127.66")).is_none());
        assert!(view.show_spot(&json!("34.76"), &Value::Null).is_none());

        assert_eq!(view.map().center(), center);
        assert_eq!(view.map().level(), level);
        assert_eq!(view.map().marker_count(), 0);
        assert!(view.spot_marker().is_none());
    }

    #[test]
    fn test_from_config_rejects_invalid_viewport() {
        let mut config = ConfigSchema::default();
        config.viewport.km_per_degree = 0.0;

        let err = ViewController::from_config(HeadlessMap::default(), &config).err().unwrap();
        let core: favmap_core::Error = err.into();
        assert_eq!(core.code, favmap_core::ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_from_config() {
        let mut config = ConfigSchema::default();
        config.viewport.inversion = "skip".into();
        config.viewport.min_level = 7;
        config.markers.bounds_types = vec!["media".into()];

        let mut view = ViewController::from_config(HeadlessMap::default(), &config).unwrap();
        let fitted = view
            .render_favorites(&[favorite("media", 34.0, 126.0), favorite("theme", 35.0, 127.0)])
            .unwrap()
            .unwrap();

        // Skip keeps a single point unshrunk
        assert_eq!(fitted.adjusted, fitted.raw);
        view.map_mut().settle();
        assert_eq!(view.map().level(), 6);
    }
}
