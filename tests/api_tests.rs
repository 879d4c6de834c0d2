use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::NaiveDateTime;
use serde_json::{json, Value};

use wardrobe_api::{
    api::{create_router, AppState},
    error::{AppError, AppResult},
    knowledge::KnowledgeBase,
    models::{Category, ClothingItem, Season, WeatherSnapshot},
    services::{
        providers::WeatherProvider, recommendations::RecommendationService,
        wardrobe::WardrobeStore,
    },
};

/// Wardrobes keyed by user id
#[derive(Default)]
struct InMemoryWardrobe {
    users: HashMap<i64, Vec<ClothingItem>>,
}

#[async_trait::async_trait]
impl WardrobeStore for InMemoryWardrobe {
    async fn items_for_user(&self, user_id: i64) -> AppResult<Vec<ClothingItem>> {
        Ok(self.users.get(&user_id).cloned().unwrap_or_default())
    }
}

/// Returns a fixed snapshot (or fails) and counts calls
struct FixedWeather {
    snapshot: Option<WeatherSnapshot>,
    calls: AtomicUsize,
}

impl FixedWeather {
    fn new(snapshot: Option<WeatherSnapshot>) -> Self {
        Self {
            snapshot,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl WeatherProvider for FixedWeather {
    async fn forecast_at(
        &self,
        _lat: f64,
        _lon: f64,
        _target_time: NaiveDateTime,
    ) -> AppResult<WeatherSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot
            .clone()
            .ok_or_else(|| AppError::ExternalApi("forecast unavailable".to_string()))
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

fn item(
    id: i64,
    category: Category,
    season: Season,
    rgb: Option<(u8, u8, u8)>,
    is_favorite: bool,
) -> ClothingItem {
    ClothingItem {
        id,
        name: format!("{} #{}", category, id),
        filename: format!("item_{}.png", id),
        category,
        season,
        red: rgb.map(|c| c.0),
        green: rgb.map(|c| c.1),
        blue: rgb.map(|c| c.2),
        is_favorite,
    }
}

fn sample_wardrobe() -> Vec<ClothingItem> {
    vec![
        item(1, Category::Blouse, Season::Spring, Some((250, 240, 230)), true),
        item(2, Category::Hoodie, Season::Autumn, Some((90, 90, 90)), false),
        item(3, Category::Pants, Season::Autumn, Some((20, 20, 60)), false),
        item(4, Category::Coat, Season::Winter, Some((60, 40, 20)), true),
        item(5, Category::Dress, Season::Summer, Some((200, 0, 0)), false),
        item(6, Category::Shoes, Season::Autumn, None, false),
        item(7, Category::Watch, Season::Summer, Some((200, 200, 200)), false),
    ]
}

fn clear_sky() -> WeatherSnapshot {
    WeatherSnapshot {
        temperature: 17.5,
        condition: "clear sky".to_string(),
        icon: "01d".to_string(),
        condition_code: 800,
    }
}

fn create_test_server(weather: Arc<FixedWeather>) -> TestServer {
    let mut wardrobe = InMemoryWardrobe::default();
    wardrobe.users.insert(1, sample_wardrobe());

    let service = RecommendationService::new(
        Arc::new(KnowledgeBase::embedded().unwrap()),
        Arc::new(wardrobe),
        weather,
        "http://localhost:3000/uploads".to_string(),
        4,
    );

    TestServer::new(create_router(AppState::new(service))).unwrap()
}

fn all_items(body: &Value) -> Vec<&Value> {
    body["outfits"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|outfit| outfit["items"].as_array().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Arc::new(FixedWeather::new(None)));
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(Arc::new(FixedWeather::new(None)));
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("client-abc-123"),
        )
        .await;
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "client-abc-123"
    );

    let response = server.get("/health").await;
    let generated = response.headers().get("x-request-id").unwrap();
    assert!(!generated.is_empty());
}

#[tokio::test]
async fn test_empty_wardrobe() {
    let server = create_test_server(Arc::new(FixedWeather::new(None)));
    let response = server
        .post("/api/v1/users/42/recommendations")
        .json(&json!({ "event": "party" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["detail"], "No clothing items found for user.");
    assert_eq!(body["outfits"], json!([]));
}

#[tokio::test]
async fn test_event_only_request_uses_event_match() {
    let server = create_test_server(Arc::new(FixedWeather::new(Some(clear_sky()))));
    let response = server
        .post("/api/v1/users/1/recommendations")
        .json(&json!({ "event": "formal_event" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["detail"],
        "Recommendations computed successfully for each palette type."
    );
    assert_eq!(body["weather"], Value::Null);

    let items = all_items(&body);
    assert!(!items.is_empty());
    for item in items {
        assert_eq!(item["final_match"]["type"], "event_match");
        assert!(item["image"]
            .as_str()
            .unwrap()
            .starts_with("http://localhost:3000/uploads/item_"));
    }

    let scores: Vec<f64> = body["outfits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["score_avg"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_outfit_shapes() {
    let server = create_test_server(Arc::new(FixedWeather::new(None)));
    let response = server
        .post("/api/v1/users/1/recommendations")
        .json(&json!({ "event": "casual_walk" }))
        .await;

    let body: Value = response.json();
    let outfits = body["outfits"].as_array().unwrap();

    let count = |kind: &str| outfits.iter().filter(|o| o["type"] == kind).count();
    // 2 tops × 1 bottom, 1 outerwear × 1 bottom, 1 dress
    assert_eq!(count("tops_bottoms"), 2);
    assert_eq!(count("outerwear_bottoms"), 1);
    assert_eq!(count("one_piece"), 1);

    for outfit in outfits {
        let groups: Vec<&str> = outfit["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["group"].as_str().unwrap())
            .collect();
        assert!(groups.contains(&"footwear"));
        assert!(groups.contains(&"accessories"));
        assert_eq!(outfit["palette_type"], "");
    }
}

#[tokio::test]
async fn test_unsupported_palette_is_bad_request() {
    let server = create_test_server(Arc::new(FixedWeather::new(None)));
    let response = server
        .post("/api/v1/users/1/recommendations")
        .json(&json!({
            "target_color": { "red": 10, "green": 20, "blue": 30 },
            "palette_types": ["monochromatic", "pastel"]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("pastel"));
}

#[tokio::test]
async fn test_bad_target_time_is_bad_request() {
    let server = create_test_server(Arc::new(FixedWeather::new(Some(clear_sky()))));
    let response = server
        .post("/api/v1/users/1/recommendations")
        .json(&json!({
            "location": { "lat": 50.45, "lon": 30.52 },
            "target_time": "tomorrow at noon"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_weather_is_reported_and_used() {
    let weather = Arc::new(FixedWeather::new(Some(clear_sky())));
    let server = create_test_server(Arc::clone(&weather));
    let response = server
        .post("/api/v1/users/1/recommendations")
        .json(&json!({
            "lat": 50.45,
            "lon": 30.52,
            "target_time": "2025-05-26 12:00:00",
            "event": "casual_walk",
            "red": "255", "green": 0, "blue": "0",
            "palette_types": ["complementary", "triadic"]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["weather"]["condition"], "clear sky");
    assert_eq!(body["weather"]["temp"], 17.5);
    assert_eq!(weather.calls.load(Ordering::SeqCst), 1);

    for item in all_items(&body) {
        assert_eq!(item["final_match"]["type"], "average_match");
    }
}

#[tokio::test]
async fn test_weather_failure_degrades() {
    let weather = Arc::new(FixedWeather::new(None));
    let server = create_test_server(Arc::clone(&weather));
    let response = server
        .post("/api/v1/users/1/recommendations")
        .json(&json!({
            "location": { "lat": 50.45, "lon": 30.52 },
            "target_time": "2025-05-26 12:00:00",
            "event": "business"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["weather"], Value::Null);
    assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    for item in all_items(&body) {
        assert_eq!(item["final_match"]["type"], "event_match");
    }
}

#[tokio::test]
async fn test_favorites_weighting() {
    let server = create_test_server(Arc::new(FixedWeather::new(None)));
    let request = |include_favorites: bool| {
        json!({ "event": "date", "include_favorites": include_favorites })
    };

    let plain: Value = server
        .post("/api/v1/users/1/recommendations")
        .json(&request(false))
        .await
        .json();
    let weighted: Value = server
        .post("/api/v1/users/1/recommendations")
        .json(&request(true))
        .await
        .json();

    let scores = |body: &Value| -> HashMap<i64, (bool, f64)> {
        all_items(body)
            .into_iter()
            .map(|i| {
                (
                    i["id"].as_i64().unwrap(),
                    (
                        i["is_favorite"].as_bool().unwrap(),
                        i["final_match"]["result"].as_f64().unwrap(),
                    ),
                )
            })
            .collect()
    };

    let plain = scores(&plain);
    let weighted = scores(&weighted);
    for (id, (is_favorite, score)) in &weighted {
        let (_, base) = plain[id];
        if *is_favorite {
            assert!((score - base).abs() < 1e-9);
        } else {
            assert!((score - base * 0.8).abs() < 1e-9);
        }
    }
}
