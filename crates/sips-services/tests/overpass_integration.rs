//! Integration tests for CafeFetcher using wiremock.

use std::time::Duration;

use sips_core::{CafeSearchError, NetworkError};
use sips_location::Coordinates;
use sips_services::{CafeFetcher, SearchError, UNNAMED_CAFE};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY: &str = "[out:json];node[\"amenity\"=\"cafe\"](around:2000,12.97,77.59);out;";

fn fetcher(server: &MockServer) -> CafeFetcher {
    CafeFetcher::new(
        &format!("{}/api/interpreter", server.uri()),
        2000,
        Duration::from_secs(5),
    )
    .unwrap()
}

fn here() -> Coordinates {
    Coordinates::new(12.97, 77.59)
}

#[tokio::test]
async fn test_nearby_maps_elements() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .and(query_param("data", QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 101, "lat": 12.971, "lon": 77.591,
                 "tags": {"amenity": "cafe", "name": "Third Wave Coffee"}},
                {"type": "node", "id": 102, "lat": 12.972, "lon": 77.592,
                 "tags": {"amenity": "cafe"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cafes = fetcher(&server).nearby(&here()).await.unwrap();

    assert_eq!(cafes.len(), 2);
    assert_eq!(cafes[0].id, 101);
    assert_eq!(cafes[0].name, "Third Wave Coffee");
    assert_eq!(cafes[0].latitude, 12.971);
    assert_eq!(cafes[0].longitude, 77.591);
    assert_eq!(cafes[1].id, 102);
    assert_eq!(cafes[1].name, UNNAMED_CAFE);
}

#[tokio::test]
async fn test_empty_elements_is_no_cafes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "elements": []
        })))
        .mount(&server)
        .await;

    let result = fetcher(&server).nearby(&here()).await;
    assert!(matches!(result, Err(SearchError::NoCafesFound)));
}

#[tokio::test]
async fn test_missing_elements_is_no_cafes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let result = fetcher(&server).nearby(&here()).await;
    assert!(matches!(result, Err(SearchError::NoCafesFound)));
}

#[tokio::test]
async fn test_server_error_is_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(504))
        .mount(&server)
        .await;

    let result = fetcher(&server).nearby(&here()).await;
    assert!(matches!(result, Err(SearchError::Status(504))));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_string("runtime error: out of memory"))
        .mount(&server)
        .await;

    let result = fetcher(&server).nearby(&here()).await;
    assert!(matches!(result, Err(SearchError::Parse(_))));
}

#[tokio::test]
async fn test_slow_search_maps_to_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/interpreter"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"elements": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let fetcher = CafeFetcher::new(
        &format!("{}/api/interpreter", server.uri()),
        2000,
        Duration::from_millis(100),
    )
    .unwrap();
    let err = fetcher.nearby(&here()).await.unwrap_err();

    assert!(matches!(err, SearchError::Network(_)));
    let mapped: CafeSearchError = err.into();
    assert!(matches!(mapped, CafeSearchError::Failed(NetworkError::Timeout)));
}

#[tokio::test]
async fn test_unreachable_server_maps_to_connection_failure() {
    // Bind then drop a listener so the port is known to be closed
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let fetcher = CafeFetcher::new(
        &format!("http://127.0.0.1:{}/api/interpreter", port),
        2000,
        Duration::from_secs(2),
    )
    .unwrap();

    let err = fetcher.nearby(&here()).await.unwrap_err();
    let mapped: CafeSearchError = err.into();
    assert!(matches!(
        mapped,
        CafeSearchError::Failed(NetworkError::ConnectionFailed(_))
    ));
}
