//! OpenWeather provider against a mock HTTP server.

use std::time::Duration;

use weather_core::{
    Coordinates, Location, OpenWeatherProvider, ProviderError, Units, WeatherProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn sample_current_response() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.12, "lat": 51.5 },
        "weather": [
            { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
        ],
        "base": "stations",
        "main": {
            "temp": 15.2,
            "feels_like": 14.6,
            "temp_min": 13.9,
            "temp_max": 16.4,
            "pressure": 1012,
            "humidity": 80
        },
        "visibility": 10000,
        "wind": { "speed": 4.12, "deg": 250 },
        "clouds": { "all": 75 },
        "dt": 1_700_000_000,
        "sys": { "country": "GB", "sunrise": 1_699_990_000, "sunset": 1_700_020_000 },
        "timezone": 0,
        "id": 2_643_743,
        "name": "London",
        "cod": 200
    })
}

fn create_test_provider(mock_server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_settings("TEST_KEY".into(), mock_server.uri(), Duration::from_secs(2))
        .expect("Failed to create provider")
}

#[tokio::test]
async fn current_conditions_by_city() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let result = provider
        .current_conditions(&Location::City("London".into()), Units::Metric)
        .await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    let conditions = result.unwrap();
    assert_eq!(conditions.name, "London");
    assert_eq!(conditions.country.as_deref(), Some("GB"));
    assert_eq!(conditions.coordinates, Coordinates { lat: 51.5, lon: -0.12 });
    assert!((conditions.temperature - 15.2).abs() < 1e-9);
    assert_eq!(conditions.humidity, 80);
    assert_eq!(conditions.visibility, Some(10_000));
    assert_eq!(conditions.wind_deg, Some(serde_json::Number::from(250)));
    assert_eq!(conditions.pressure, serde_json::Number::from(1012));
}

#[tokio::test]
async fn current_conditions_by_coordinates_with_imperial_units() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let location = Location::Coordinates(Coordinates { lat: 51.5, lon: -0.12 });
    let result = provider.current_conditions(&location, Units::Imperial).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn city_with_spaces_is_url_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "São Paulo, BR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let result = provider
        .current_conditions(&Location::City("São Paulo, BR".into()), Units::Metric)
        .await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn not_found_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let err = provider
        .current_conditions(&Location::City("Atlantis".into()), Units::Metric)
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::NotFound);
}

#[tokio::test]
async fn other_statuses_are_propagated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let err = provider
        .current_conditions(&Location::City("London".into()), Units::Metric)
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::Status(401));
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let err = provider
        .current_conditions(&Location::City("London".into()), Units::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Decode(_)), "Expected decode error, got: {err:?}");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_current_response())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let provider = OpenWeatherProvider::with_settings(
        "TEST_KEY".into(),
        mock_server.uri(),
        Duration::from_millis(200),
    )
    .expect("Failed to create provider");

    let err = provider
        .current_conditions(&Location::City("London".into()), Units::Metric)
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::Timeout);
}

#[tokio::test]
async fn air_quality_reads_first_index() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "coord": { "lon": -0.12, "lat": 51.5 },
            "list": [{ "main": { "aqi": 2 }, "components": { "pm2_5": 8.1 }, "dt": 1_700_000_000 }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let air = provider
        .air_quality(Coordinates { lat: 51.5, lon: -0.12 })
        .await
        .expect("air quality should succeed");

    assert_eq!(air.index, Some(2));
}

#[tokio::test]
async fn air_quality_outside_scale_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "list": [{ "main": { "aqi": 300 } }] })),
        )
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let air = provider.air_quality(Coordinates { lat: 0.0, lon: 0.0 }).await.unwrap();

    assert_eq!(air.index, Some(300));
}

#[tokio::test]
async fn air_quality_with_empty_list_has_no_index() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": [] })))
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let air = provider.air_quality(Coordinates { lat: 0.0, lon: 0.0 }).await.unwrap();

    assert_eq!(air.index, None);
}
