//! Result cards
//!
//! HTML fragments for the nearby and search panels, rendered through
//! handlebars so every record field is HTML-escaped.

use crate::error::ViewResult;
use favmap_api_client::{NewFavorite, PlanRecord, TourRecord};
use favmap_geo::parse_degrees;
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when the nearby query returns nothing
pub const NEARBY_EMPTY: &str = "추천 관광지가 없습니다.";
/// Shown when the nearby query fails
pub const NEARBY_FAILED: &str = "데이터를 불러오는 중 오류가 발생했습니다.";
/// Shown when a keyword search returns nothing
pub const SEARCH_EMPTY: &str = "검색 결과가 없습니다.";

const NO_TITLE: &str = "제목 없음";
const NO_INFO: &str = "정보 없음";
const NO_PHONE: &str = "전화번호 없음";

const SAVE_BUTTON: &str = r#"<button class="btn btn-sm btn-warning save-favorite-btn"{{#if kind}} data-type="{{kind}}"{{/if}} data-name="{{name}}" data-address="{{address}}" data-phone="{{phone}}" data-url="{{url}}" data-x="{{x}}" data-y="{{y}}" data-poster-url="{{poster_url}}" data-contents="{{contents}}" data-plan-parking="{{plan_parking}}">저장</button>"#;

const NEARBY_CARD: &str = r#"<div class="card shadow-sm mb-3">
  <div class="row no-gutters">
{{#if poster}}    <div class="col-md-4"><img src="{{poster}}" alt="{{title}}" class="img-fluid rounded-start"></div>
{{/if}}    <div class="{{#if poster}}col-md-8{{else}}col-12{{/if}}">
      <div class="card-body">
        <h5 class="card-title">{{title}}</h5>
        <p class="card-text">주소: {{address}}</p>
{{#if phone}}        <p class="card-text">전화: {{phone}}</p>
{{/if}}{{#if homepage}}        <p><a href="{{homepage}}" target="_blank">홈페이지 방문</a></p>
{{/if}}{{#if contents}}        <p class="card-text">{{contents}}</p>
{{/if}}        <div class="text-end">{{#with button}}{{> save_button}}{{/with}}</div>
      </div>
    </div>
  </div>
</div>
"#;

const SEARCH_CARD: &str = r#"<div class="card shadow-sm">
  <div class="card-body">
    <h5 class="card-title">{{name}}</h5>
    <p class="card-subtitle mb-2 text-muted">유형: 관광지</p>
    <p class="card-text">주소: {{address}}</p>
    <p class="card-text">전화: {{phone}}</p>
    <p class="card-text"><a href="{{url}}" target="_blank">홈페이지 방문</a></p>
    <div class="text-end">
      <button class="btn btn-sm btn-outline-secondary move-to-map-btn" data-x="{{x}}" data-y="{{y}}">지도이동</button>
      {{#with button}}{{> save_button}}{{/with}}
    </div>
  </div>
</div>
"#;

const SEARCH_EMPTY_CARD: &str = r#"<div class="card shadow-sm">
  <div class="card-body text-center">
    <p class="card-text text-muted mb-0">{{text}}</p>
  </div>
</div>
"#;

const MESSAGE: &str = "<p>{{text}}</p>";

const INFO_WINDOW: &str = r#"<div style="padding:5px;">{{title}}</div>"#;

/// Data carried by a card's save button
///
/// Every value is text, as it would be in an HTML `data-*` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveButton {
    /// Favorite type; blank means "theme"
    pub kind: String,
    /// Place name
    pub name: String,
    /// Street address
    pub address: String,
    /// Contact number; may be empty
    pub phone: String,
    /// Homepage
    pub url: String,
    /// Longitude text
    pub x: String,
    /// Latitude text
    pub y: String,
    /// Poster image URL
    pub poster_url: String,
    /// Description text
    pub contents: String,
    /// Parking notes
    pub plan_parking: String,
}

impl SaveButton {
    /// Button for a nearby recommendation; always typed "theme"
    pub fn from_plan(plan: &PlanRecord) -> Self {
        Self {
            kind: "theme".to_string(),
            name: plan.plan_name.clone().unwrap_or_default(),
            address: plan.plan_addr.clone().unwrap_or_default(),
            phone: plan.plan_phone.clone().unwrap_or_default(),
            url: plan.plan_homepage.clone().unwrap_or_default(),
            x: dataset_text(&plan.plan_longitude),
            y: dataset_text(&plan.plan_latitude),
            poster_url: plan.poster_url.clone().unwrap_or_default(),
            contents: plan.plan_contents.clone().unwrap_or_default(),
            plan_parking: plan.plan_parking.clone().unwrap_or_default(),
        }
    }

    /// Button for a search hit; untyped, so it saves as "theme"
    pub fn from_tour(tour: &TourRecord) -> Self {
        Self {
            kind: String::new(),
            name: tour.name.clone(),
            address: tour.address.clone().unwrap_or_default(),
            phone: tour.phone.clone().unwrap_or_default(),
            url: tour.url.clone().unwrap_or_default(),
            x: dataset_text(&tour.x),
            y: dataset_text(&tour.y),
            poster_url: tour.poster_url.clone().unwrap_or_default(),
            contents: tour.contents.clone().unwrap_or_default(),
            plan_parking: String::new(),
        }
    }

    /// Create body for this button. Coordinates that do not parse are sent as `null`.
    pub fn to_new_favorite(&self) -> NewFavorite {
        let kind = if self.kind.trim().is_empty() {
            "theme".to_string()
        } else {
            self.kind.clone()
        };

        NewFavorite {
            kind,
            name: self.name.clone(),
            location: self.address.clone(),
            addr: self.address.clone(),
            poster_url: self.poster_url.clone(),
            x: parse_degrees(&Value::String(self.x.clone())),
            y: parse_degrees(&Value::String(self.y.clone())),
            plan_phone: self.phone.clone(),
            plan_homepage: self.url.clone(),
            plan_parking: self.plan_parking.clone(),
            plan_contents: self.contents.clone(),
        }
    }
}

fn dataset_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Absent or empty text falls back; whitespace is still content.
fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// A poster made only of whitespace is no poster.
fn poster(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

#[derive(Serialize)]
struct NearbyCard<'a> {
    title: &'a str,
    address: &'a str,
    poster: Option<&'a str>,
    phone: Option<&'a str>,
    homepage: Option<&'a str>,
    contents: Option<&'a str>,
    button: SaveButton,
}

#[derive(Serialize)]
struct SearchCard<'a> {
    name: &'a str,
    address: &'a str,
    phone: &'a str,
    url: &'a str,
    x: String,
    y: String,
    button: SaveButton,
}

#[derive(Serialize)]
struct Text<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Title<'a> {
    title: &'a str,
}

/// Renders cards and info windows
pub struct CardRenderer {
    registry: Handlebars<'static>,
}

impl CardRenderer {
    /// Compile the card templates
    pub fn new() -> ViewResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_partial("save_button", SAVE_BUTTON).map_err(Box::new)?;
        registry.register_template_string("nearby", NEARBY_CARD).map_err(Box::new)?;
        registry.register_template_string("search", SEARCH_CARD).map_err(Box::new)?;
        registry
            .register_template_string("search_empty", SEARCH_EMPTY_CARD)
            .map_err(Box::new)?;
        registry.register_template_string("message", MESSAGE).map_err(Box::new)?;
        registry
            .register_template_string("info_window", INFO_WINDOW)
            .map_err(Box::new)?;
        Ok(Self { registry })
    }

    /// Cards for the nearby panel
    pub fn nearby_cards(&self, plans: &[PlanRecord]) -> ViewResult<String> {
        let mut html = String::new();
        for plan in plans {
            let card = NearbyCard {
                title: non_empty(plan.plan_name.as_ref()).unwrap_or(NO_TITLE),
                address: non_empty(plan.plan_addr.as_ref()).unwrap_or(NO_INFO),
                poster: poster(plan.poster_url.as_ref()),
                phone: non_empty(plan.plan_phone.as_ref()),
                homepage: non_empty(plan.plan_homepage.as_ref()),
                contents: non_empty(plan.plan_contents.as_ref()),
                button: SaveButton::from_plan(plan),
            };
            html.push_str(&self.registry.render("nearby", &card)?);
        }
        Ok(html)
    }

    /// Cards for the search panel
    pub fn search_cards(&self, tours: &[TourRecord]) -> ViewResult<String> {
        let mut html = String::new();
        for tour in tours {
            let card = SearchCard {
                name: &tour.name,
                address: tour.address.as_deref().unwrap_or_default(),
                phone: tour.phone.as_deref().unwrap_or(NO_PHONE),
                url: tour.url.as_deref().unwrap_or_default(),
                x: dataset_text(&tour.x),
                y: dataset_text(&tour.y),
                button: SaveButton::from_tour(tour),
            };
            html.push_str(&self.registry.render("search", &card)?);
        }
        Ok(html)
    }

    /// Placeholder card for a search with no hits
    pub fn search_empty(&self) -> ViewResult<String> {
        Ok(self.registry.render("search_empty", &Text { text: SEARCH_EMPTY })?)
    }

    /// A plain paragraph, used for panel-level messages
    pub fn message(&self, text: &str) -> ViewResult<String> {
        Ok(self.registry.render("message", &Text { text })?)
    }

    /// Info window body for a marker
    pub fn info_window(&self, title: &str) -> ViewResult<String> {
        Ok(self.registry.render("info_window", &Title { title })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer() -> CardRenderer {
        CardRenderer::new().unwrap()
    }

    fn plan() -> PlanRecord {
        PlanRecord {
            plan_name: Some("보성 녹차밭".into()),
            plan_addr: Some("전남 보성군".into()),
            plan_phone: Some("061-000-0000".into()),
            plan_latitude: json!(34.71),
            plan_longitude: json!("127.08"),
            plan_parking: Some("가능".into()),
            ..PlanRecord::default()
        }
    }

    #[test]
    fn test_nearby_card_fields() {
        let html = renderer().nearby_cards(&[plan()]).unwrap();
        assert!(html.contains("보성 녹차밭"));
        assert!(html.contains("전화: 061-000-0000"));
        assert!(html.contains(r#"data-type="theme""#));
        assert!(html.contains(r#"data-x="127.08""#));
        assert!(html.contains("col-12"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("홈페이지 방문"));
    }

    #[test]
    fn test_nearby_card_fallbacks_and_poster() {
        let sparse = PlanRecord {
            poster_url: Some("https://img.example/p.jpg".into()),
            ..PlanRecord::default()
        };
        let blank_poster = PlanRecord {
            poster_url: Some("   ".into()),
            ..PlanRecord::default()
        };

        let html = renderer().nearby_cards(&[sparse]).unwrap();
        assert!(html.contains("제목 없음"));
        assert!(html.contains("주소: 정보 없음"));
        assert!(html.contains("<img"));
        assert!(html.contains("col-md-8"));

        let html = renderer().nearby_cards(&[blank_poster]).unwrap();
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_whitespace_fields_are_not_fallbacks() {
        let spaced = PlanRecord {
            plan_name: Some(" ".into()),
            plan_addr: Some("  ".into()),
            plan_phone: Some(" ".into()),
            ..PlanRecord::default()
        };
        let empty = PlanRecord {
            plan_name: Some(String::new()),
            plan_phone: Some(String::new()),
            ..PlanRecord::default()
        };

        let html = renderer().nearby_cards(&[spaced]).unwrap();
        assert!(!html.contains("제목 없음"));
        assert!(!html.contains("정보 없음"));
        assert!(html.contains("전화: "));

        let html = renderer().nearby_cards(&[empty]).unwrap();
        assert!(html.contains("제목 없음"));
        assert!(!html.contains("전화:"));
    }

    #[test]
    fn test_cards_escape_html() {
        let tour = TourRecord {
            name: "<script>alert(1)</script>".into(),
            ..TourRecord::default()
        };
        let html = renderer().search_cards(&[tour]).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_search_card() {
        let tour = TourRecord {
            name: "낙안읍성".into(),
            address: Some("전남 순천시".into()),
            url: Some("https://nagan.example".into()),
            x: json!(127.34),
            y: json!(34.9),
            ..TourRecord::default()
        };
        let html = renderer().search_cards(&[tour]).unwrap();
        assert!(html.contains("전화: 전화번호 없음"));
        assert!(html.contains("move-to-map-btn"));
        assert!(html.contains(r#"data-y="34.9""#));
        assert!(!html.contains("data-type"));
    }

    #[test]
    fn test_messages() {
        let r = renderer();
        assert_eq!(r.message(NEARBY_EMPTY).unwrap(), "<p>추천 관광지가 없습니다.</p>");
        assert!(r.search_empty().unwrap().contains(SEARCH_EMPTY));
        assert_eq!(
            r.info_window("A & B").unwrap(),
            r#"<div style="padding:5px;">A &amp; B</div>"#
        );
    }

    #[test]
    fn test_save_button_to_new_favorite() {
        let favorite = SaveButton::from_plan(&plan()).to_new_favorite();
        assert_eq!(favorite.kind, "theme");
        assert_eq!(favorite.location, "전남 보성군");
        assert_eq!(favorite.addr, "전남 보성군");
        assert_eq!(favorite.x, Some(127.08));
        assert_eq!(favorite.y, Some(34.71));
        assert_eq!(favorite.plan_parking, "가능");

        let untyped = SaveButton {
            name: "n".into(),
            x: "not a number".into(),
            ..SaveButton::default()
        };
        let favorite = untyped.to_new_favorite();
        assert_eq!(favorite.kind, "theme");
        assert_eq!(favorite.x, None);
    }
}
