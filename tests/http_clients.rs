//! Integration tests for the geocoding and directions adapters using
//! wiremock HTTP mocks.
//!
//! The adapters are blocking, so the mock server runs on an explicitly held
//! multi-thread runtime and the clients are driven from the test thread.

use store_locator::directions::{DirectionsClient, DirectionsConfig, DirectionsError};
use store_locator::geocode::{GeocodeClient, GeocodeConfig, GeocodeError};
use store_locator::traits::{DirectionsProvider, Geocoder};

use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("build runtime")
}

fn geocode_client(base_url: &str) -> GeocodeClient {
    GeocodeClient::new(GeocodeConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        timeout_secs: 5,
    })
    .expect("client construction should not fail")
}

fn directions_client(base_url: &str) -> DirectionsClient {
    DirectionsClient::new(DirectionsConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        timeout_secs: 5,
    })
    .expect("client construction should not fail")
}

#[test]
fn geocode_returns_coordinates_on_ok() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "status": "OK",
            "results": [
                { "geometry": { "location": { "lat": 25.1972, "lng": 55.2744 } } }
            ]
        });
        Mock::given(method("GET"))
            .and(query_param("address", "Burj Khalifa, Dubai"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;
        server
    });

    let client = geocode_client(&server.uri());
    let point = client
        .geocode("Burj Khalifa, Dubai")
        .expect("request succeeds")
        .expect("address resolves");

    assert!((point.lat() - 25.1972).abs() < 1e-9);
    assert!((point.lon() - 55.2744).abs() < 1e-9);
}

#[test]
fn geocode_maps_zero_results_to_none() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "ZERO_RESULTS" })),
            )
            .mount(&server)
            .await;
        server
    });

    let client = geocode_client(&server.uri());
    let outcome = client
        .geocode("nowhere in particular")
        .expect("request succeeds");
    assert!(outcome.is_none());
}

#[test]
fn geocode_surfaces_provider_errors() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        });
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;
        server
    });

    let client = geocode_client(&server.uri());
    let err = client
        .geocode("Burj Khalifa, Dubai")
        .expect_err("provider error surfaces");
    assert!(matches!(
        err,
        GeocodeError::Api { status, message }
            if status == "REQUEST_DENIED" && message.contains("invalid")
    ));
}

#[test]
fn geocode_surfaces_transport_errors() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        server
    });

    let client = geocode_client(&server.uri());
    let err = client
        .geocode("Burj Khalifa, Dubai")
        .expect_err("server error surfaces");
    assert!(matches!(err, GeocodeError::Http(_)));
}

#[test]
fn directions_decode_route_and_duration() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "status": "OK",
            "routes": [
                {
                    "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
                    "legs": [ { "duration": { "text": "25 mins" } } ]
                }
            ]
        });
        Mock::given(method("GET"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;
        server
    });

    let client = directions_client(&server.uri());
    let origin = store_locator::geo::Point::new(25.1972, 55.2744).expect("valid coordinate");
    let dest = store_locator::geo::Point::new(25.2048, 55.2708).expect("valid coordinate");

    let route = client
        .route(origin, dest)
        .expect("request succeeds")
        .expect("route exists");

    assert_eq!(route.duration_text, "25 mins");
    assert_eq!(route.path.points().len(), 3);
    assert!((route.path.points()[0].0 - 38.5).abs() < 1e-9);
}

#[test]
fn directions_map_zero_results_to_none() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "ZERO_RESULTS" })),
            )
            .mount(&server)
            .await;
        server
    });

    let client = directions_client(&server.uri());
    let origin = store_locator::geo::Point::new(25.1972, 55.2744).expect("valid coordinate");

    let outcome = client.route(origin, origin).expect("request succeeds");
    assert!(outcome.is_none());
}

#[test]
fn directions_reject_undecodable_geometry() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "status": "OK",
            "routes": [
                {
                    "overview_polyline": { "points": "not a polyline!" },
                    "legs": [ { "duration": { "text": "5 mins" } } ]
                }
            ]
        });
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;
        server
    });

    let client = directions_client(&server.uri());
    let origin = store_locator::geo::Point::new(25.1972, 55.2744).expect("valid coordinate");
    let dest = store_locator::geo::Point::new(25.2048, 55.2708).expect("valid coordinate");

    let err = client.route(origin, dest).expect_err("bad geometry surfaces");
    assert!(matches!(err, DirectionsError::BadGeometry(_)));
}
