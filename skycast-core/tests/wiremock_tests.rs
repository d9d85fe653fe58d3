//! Integration tests for the OpenWeather client and the application shell
//! against a mock HTTP server.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Timelike, Utc};
use skycast_core::{
    App, Config, FileStore, InputEvent, Key, OpenWeatherClient, PreferenceStore, SearchMode, View,
    WeatherApi, WeatherError, fetch::fetch_weather, suggest::fetch_suggestions,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const API_KEY: &str = "test-key";

fn create_test_client(mock_server: &MockServer) -> OpenWeatherClient {
    let config = Config {
        api_key: Some(API_KEY.to_string()),
        api_base: format!("{}/data/2.5", mock_server.uri()),
        geo_base: format!("{}/geo/1.0", mock_server.uri()),
        timeout_secs: 5,
    };
    #[allow(clippy::expect_used)]
    OpenWeatherClient::from_config(&config).expect("Failed to create client")
}

fn geocode_response() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "London",
            "local_names": { "en": "London" },
            "lat": 51.5073219,
            "lon": -0.1276474,
            "country": "GB",
            "state": "England"
        },
        {
            "name": "London",
            "lat": 42.9832406,
            "lon": -81.243372,
            "country": "CA",
            "state": "Ontario"
        }
    ])
}

fn current_response(city: &str) -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{
            "id": 804,
            "main": "Clouds",
            "description": "overcast clouds",
            "icon": "04d"
        }],
        "main": { "temp": 12.34, "feels_like": 11.52, "humidity": 80, "pressure": 1012 },
        "wind": { "speed": 5.14, "deg": 240 },
        "dt": 1705320000,
        "sys": { "country": "GB" },
        "name": city,
        "cod": 200
    })
}

/// Five days of 3-hour entries starting at midnight UTC.
fn forecast_response() -> serde_json::Value {
    let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let list: Vec<_> = (0..40)
        .map(|i| {
            let ts = start + Duration::hours(3 * i);
            serde_json::json!({
                "dt": ts.timestamp(),
                "main": { "temp": 5.0 + i as f64, "feels_like": 3.0, "humidity": 70 },
                "weather": [{
                    "id": 500,
                    "main": "Rain",
                    "description": "light rain",
                    "icon": "10d"
                }],
                "wind": { "speed": 3.3 },
                "dt_txt": ts.format("%Y-%m-%d %H:%M:%S").to_string()
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "cnt": 40,
        "list": list,
        "city": { "name": "London", "country": "GB" }
    })
}

async fn mount_weather(mock_server: &MockServer, city: &str) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", city))
        .and(query_param("units", "metric"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_response(city)))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", city))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response()))
        .mount(mock_server)
        .await;
}

// ============================================================================
// Geocoding
// ============================================================================

#[tokio::test]
async fn test_geocode_sends_query_limit_and_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Lond"))
        .and(query_param("limit", "5"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let suggestions = fetch_suggestions(&client, "Lond").await;

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].display_name(), "London, GB");
    assert_eq!(suggestions[1].label(), "London, Ontario, CA");
}

#[tokio::test]
async fn test_suggestions_swallow_server_errors() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    assert!(client.geocode("London", 5).await.is_err());
    assert!(fetch_suggestions(&client, "London").await.is_empty());
}

#[tokio::test]
async fn test_suggestions_swallow_malformed_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    assert!(fetch_suggestions(&client, "London").await.is_empty());
}

#[tokio::test]
async fn test_short_query_makes_no_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    assert!(fetch_suggestions(&client, " L ").await.is_empty());
}

// ============================================================================
// Weather
// ============================================================================

#[tokio::test]
async fn test_fetch_weather_success() {
    let mock_server = MockServer::start().await;
    mount_weather(&mock_server, "London").await;

    let client = create_test_client(&mock_server);
    let report = fetch_weather(&client, "London").await.expect("report");

    assert_eq!(report.current.city, "London");
    assert_eq!(report.current.country, "GB");
    assert_eq!(report.current.humidity, 80);
    assert_eq!(report.current.condition.description, "overcast clouds");
    assert_eq!(report.forecast.len(), 5);
    assert!(report.forecast.iter().all(|d| d.timestamp.hour() == 12));
}

#[tokio::test]
async fn test_unknown_city_skips_forecast() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = fetch_weather(&client, "Atlantis").await.unwrap_err();

    assert!(matches!(err, WeatherError::CityNotFound));
}

#[tokio::test]
async fn test_forecast_failure_surfaces_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_response("Oslo")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = fetch_weather(&client, "Oslo").await.unwrap_err();

    assert!(matches!(err, WeatherError::Status { endpoint: "forecast", .. }));
}

// ============================================================================
// Application shell
// ============================================================================

#[tokio::test]
async fn test_search_select_and_persist_end_to_end() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Lond"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "London", "lat": 51.5, "lon": -0.12, "country": "GB" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_weather(&mock_server, "London, GB").await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(FileStore::new(dir.path().join("state.toml")));
    let mut app = App::new(Arc::new(create_test_client(&mock_server)), store.clone());
    app.start();
    assert_eq!(app.view(), View::Empty);

    app.input(InputEvent::Focus);
    for text in ["L", "Lo", "Lon", "Lond"] {
        app.input(InputEvent::TextChanged(text.to_string()));
    }
    app.next_event().await;
    assert_eq!(app.search_state().mode(), SearchMode::SuggestionsVisible);

    app.input(InputEvent::Key(Key::Down));
    app.input(InputEvent::Key(Key::Enter));
    assert_eq!(app.search_state().query(), "London, GB");
    assert_eq!(app.view(), View::Loading);

    app.wait_idle().await;

    match app.view() {
        View::Result(report) => assert_eq!(report.forecast.len(), 5),
        other => panic!("expected result view, got {other:?}"),
    }
    assert_eq!(store.last_city().expect("read").as_deref(), Some("London, GB"));
}

#[tokio::test]
async fn test_restart_searches_persisted_city() {
    let mock_server = MockServer::start().await;
    mount_weather(&mock_server, "Paris").await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(FileStore::new(dir.path().join("state.toml")));
    store.set_last_city("Paris").expect("seed");

    let mut app = App::new(Arc::new(create_test_client(&mock_server)), store);
    app.start();
    assert_eq!(app.search_state().query(), "Paris");
    app.wait_idle().await;

    let requests = mock_server.received_requests().await.expect("recording enabled");
    let weather_calls = requests
        .iter()
        .filter(|r| r.url.path() == "/data/2.5/weather")
        .count();
    assert_eq!(weather_calls, 1);
    assert!(matches!(app.view(), View::Result(_)));
}
