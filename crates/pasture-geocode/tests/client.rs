//! Integration tests for `GoogleGeocoder` using wiremock HTTP mocks.

use pasture_core::{GeoPoint, Geocoder};
use pasture_geocode::{GeocodeError, GoogleGeocoder};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GoogleGeocoder {
    GoogleGeocoder::with_base_url("test-key", 5, "pasture-test", base_url)
        .expect("client construction should not fail")
}

fn austin_body() -> serde_json::Value {
    serde_json::json!({
        "status": "OK",
        "results": [
            {
                "formatted_address": "100 Congress Ave, Austin, TX 78701, USA",
                "geometry": { "location": { "lat": 30.2638, "lng": -97.7446 } },
                "address_components": [
                    { "long_name": "100", "short_name": "100", "types": ["street_number"] },
                    { "long_name": "Austin", "short_name": "Austin", "types": ["locality", "political"] },
                    { "long_name": "Travis County", "short_name": "Travis County", "types": ["administrative_area_level_2", "political"] },
                    { "long_name": "Texas", "short_name": "TX", "types": ["administrative_area_level_1", "political"] },
                    { "long_name": "United States", "short_name": "US", "types": ["country", "political"] }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn geocode_returns_location_and_components() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .and(query_param("address", "100 Congress Ave, Austin"))
        .and(query_param("components", "country:US"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(austin_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let found = client
        .geocode("100 Congress Ave, Austin")
        .await
        .expect("request should succeed")
        .expect("address should resolve");

    assert!((found.latitude - 30.2638).abs() < 1e-9);
    assert!((found.longitude + 97.7446).abs() < 1e-9);
    assert_eq!(found.formatted_address, "100 Congress Ave, Austin, TX 78701, USA");
    assert_eq!(found.city.as_deref(), Some("Austin"));
    assert_eq!(found.state.as_deref(), Some("Texas"));
    assert_eq!(found.state_code.as_deref(), Some("TX"));
    assert_eq!(found.country.as_deref(), Some("United States"));
}

#[tokio::test]
async fn zero_results_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let found = client.lookup_address("nowhere at all").await.expect("ok");
    assert!(found.is_none());
}

#[tokio::test]
async fn request_denied_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "results": [],
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.lookup_address("100 Congress Ave").await.unwrap_err();
    match err {
        GeocodeError::Api { status, message } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert!(message.contains("invalid"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_an_http_error_without_the_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.lookup_address("100 Congress Ave").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Http { .. }), "got {err:?}");

    let rendered = format!("{err} {err:?}");
    assert!(rendered.contains("503"), "got {rendered}");
    assert!(!rendered.contains("test-key"), "key leaked: {rendered}");
}

#[tokio::test]
async fn connection_failure_does_not_leak_the_key() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = test_client(&uri);
    let err = client.lookup_address("100 Congress Ave").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Http { .. }), "got {err:?}");
    assert!(!format!("{err} {err:?}").contains("test-key"));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error_without_the_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.lookup_address("100 Congress Ave").await.unwrap_err();
    match err {
        GeocodeError::Deserialize { context, .. } => assert!(!context.contains("test-key")),
        other => panic!("expected Deserialize error, got {other:?}"),
    }
}

#[tokio::test]
async fn reverse_geocode_echoes_input_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .and(query_param("latlng", "30.27,-97.74"))
        .respond_with(ResponseTemplate::new(200).set_body_json(austin_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let found = client
        .reverse_geocode(GeoPoint::new(30.27, -97.74))
        .await
        .expect("request should succeed")
        .expect("point should resolve");

    assert!((found.latitude - 30.27).abs() < f64::EPSILON);
    assert!((found.longitude + 97.74).abs() < f64::EPSILON);
    assert_eq!(found.state_code.as_deref(), Some("TX"));
}
