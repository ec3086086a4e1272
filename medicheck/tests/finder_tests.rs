//! Integration tests for the geocoder, places client and finder against a
//! local fake of the upstream APIs.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use medicheck::{ConfigBuilder, Coordinate, HospitalFinder, MedicheckError, PlacesClient};
use serde_json::{json, Value};

#[derive(Default)]
struct Upstream {
    geocode_calls: AtomicUsize,
    places_calls: AtomicUsize,
    geocode_status: Mutex<Option<StatusCode>>,
    geocode_body: Mutex<Value>,
    places_status: Mutex<Option<StatusCode>>,
    places_body: Mutex<Value>,
    places_delay: Mutex<Option<Duration>>,
    last_address: Mutex<Option<String>>,
    last_places_request: Mutex<Option<(HeaderMap, Value)>>,
}

async fn geocode(
    State(upstream): State<Arc<Upstream>>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    upstream.geocode_calls.fetch_add(1, Ordering::SeqCst);
    *upstream.last_address.lock().unwrap() = params.get("address").cloned();
    let status = upstream.geocode_status.lock().unwrap().unwrap_or(StatusCode::OK);
    (status, Json(upstream.geocode_body.lock().unwrap().clone()))
}

async fn search_nearby(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    upstream.places_calls.fetch_add(1, Ordering::SeqCst);
    *upstream.last_places_request.lock().unwrap() = Some((headers, body));
    let delay = *upstream.places_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let status = upstream.places_status.lock().unwrap().unwrap_or(StatusCode::OK);
    (status, Json(upstream.places_body.lock().unwrap().clone()))
}

/// Start the fake upstream on an ephemeral port.
async fn spawn_upstream(upstream: Arc<Upstream>) -> SocketAddr {
    let app = Router::new()
        .route("/geocode/json", get(geocode))
        .route("/v1/places/searchNearby", post(search_nearby))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn boston_geocode() -> Value {
    json!({
        "status": "OK",
        "results": [{
            "formatted_address": "Boston, MA, USA",
            "geometry": {"location": {"lat": 42.36, "lng": -71.06}}
        }]
    })
}

fn hospital(name: &str, lat: f64, lng: f64) -> Value {
    json!({
        "id": name.to_lowercase(),
        "displayName": {"text": name, "languageCode": "en"},
        "formattedAddress": format!("{} address", name),
        "location": {"latitude": lat, "longitude": lng}
    })
}

fn config_for(addr: SocketAddr) -> ConfigBuilder {
    ConfigBuilder::new()
        .api_key("test-key")
        .geocode_url(format!("http://{}/geocode/json", addr))
        .places_url(format!("http://{}/v1/places/searchNearby", addr))
}

#[tokio::test]
async fn test_find_nearby_ranks_results() {
    let upstream = Arc::new(Upstream::default());
    *upstream.geocode_body.lock().unwrap() = boston_geocode();
    *upstream.places_body.lock().unwrap() = json!({
        "places": [
            hospital("Far", 42.40, -71.06),
            hospital("Near", 42.365, -71.06),
            {"id": "broken", "displayName": {"text": "No Location"}},
            hospital("Middle", 42.38, -71.06),
        ]
    });
    let addr = spawn_upstream(upstream.clone()).await;

    let finder = HospitalFinder::new(&config_for(addr).build().unwrap()).unwrap();
    let results = finder.find_nearby("Boston", 2, 30_000).await.unwrap();

    assert_eq!(results.origin.formatted_address.as_deref(), Some("Boston, MA, USA"));
    let names: Vec<_> = results.hospitals.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Near", "Middle"]);
    assert_eq!(upstream.geocode_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.places_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.last_address.lock().unwrap().as_deref(), Some("Boston"));
}

#[tokio::test]
async fn test_places_request_shape() {
    let upstream = Arc::new(Upstream::default());
    *upstream.geocode_body.lock().unwrap() = boston_geocode();
    *upstream.places_body.lock().unwrap() = json!({});
    let addr = spawn_upstream(upstream.clone()).await;

    let finder = HospitalFinder::new(&config_for(addr).build().unwrap()).unwrap();
    let results = finder.find_nearby("Boston", 100, 12_000).await.unwrap();
    assert!(results.hospitals.is_empty());

    let (headers, body) = upstream.last_places_request.lock().unwrap().clone().unwrap();
    assert_eq!(headers["x-goog-api-key"], "test-key");
    assert_eq!(
        headers["x-goog-fieldmask"],
        "places.id,places.displayName,places.formattedAddress,places.location"
    );
    assert_eq!(body["includedTypes"], json!(["hospital"]));
    assert_eq!(body["maxResultCount"], 20);
    assert_eq!(body["locationRestriction"]["circle"]["radius"], 12_000);
    assert_eq!(body["locationRestriction"]["circle"]["center"]["latitude"], 42.36);
    assert_eq!(body["locationRestriction"]["circle"]["center"]["longitude"], -71.06);
}

#[tokio::test]
async fn test_zero_matches_skips_places() {
    let upstream = Arc::new(Upstream::default());
    *upstream.geocode_body.lock().unwrap() = json!({"status": "ZERO_RESULTS", "results": []});
    let addr = spawn_upstream(upstream.clone()).await;

    let finder = HospitalFinder::new(&config_for(addr).build().unwrap()).unwrap();
    let result = finder.find_nearby("Nowhere", 5, 30_000).await;

    assert!(matches!(result, Err(MedicheckError::LocationNotFound { .. })));
    assert_eq!(upstream.geocode_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.places_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_key_makes_no_calls() {
    let upstream = Arc::new(Upstream::default());
    let addr = spawn_upstream(upstream.clone()).await;

    let config = config_for(addr).without_api_key().build().unwrap();
    let finder = HospitalFinder::new(&config).unwrap();
    let result = finder.find_nearby("Boston", 5, 30_000).await;

    assert!(matches!(result, Err(MedicheckError::MissingApiKey)));
    assert_eq!(upstream.geocode_calls.load(Ordering::SeqCst), 0);
    assert_eq!(upstream.places_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_places_error_carries_payload() {
    let upstream = Arc::new(Upstream::default());
    *upstream.geocode_body.lock().unwrap() = boston_geocode();
    *upstream.places_status.lock().unwrap() = Some(StatusCode::FORBIDDEN);
    *upstream.places_body.lock().unwrap() = json!({
        "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
    });
    let addr = spawn_upstream(upstream.clone()).await;

    let finder = HospitalFinder::new(&config_for(addr).build().unwrap()).unwrap();
    match finder.find_nearby("Boston", 5, 30_000).await {
        Err(MedicheckError::Places { status, detail }) => {
            assert_eq!(status, 403);
            assert!(detail.contains("PERMISSION_DENIED"));
            assert!(detail.contains("API key not valid"));
        }
        other => panic!("expected places error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_geocode_http_error_propagates() {
    let upstream = Arc::new(Upstream::default());
    *upstream.geocode_status.lock().unwrap() = Some(StatusCode::SERVICE_UNAVAILABLE);
    *upstream.geocode_body.lock().unwrap() = json!({"error": "down"});
    let addr = spawn_upstream(upstream.clone()).await;

    let finder = HospitalFinder::new(&config_for(addr).build().unwrap()).unwrap();
    let result = finder.find_nearby("Boston", 5, 30_000).await;

    match result {
        Err(MedicheckError::UpstreamStatus { service, status, .. }) => {
            assert_eq!(service, "geocoding");
            assert_eq!(status, "503");
        }
        other => panic!("expected upstream status error, got {:?}", other),
    }
    assert_eq!(upstream.places_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_places_timeout_is_error() {
    let upstream = Arc::new(Upstream::default());
    *upstream.places_body.lock().unwrap() = json!({"places": []});
    *upstream.places_delay.lock().unwrap() = Some(Duration::from_millis(500));
    let addr = spawn_upstream(upstream.clone()).await;

    let config = config_for(addr)
        .places_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let client = PlacesClient::new(&config).unwrap();
    let result = client
        .search_nearby(Coordinate::new(42.36, -71.06), 30_000, 20)
        .await;

    match result {
        Err(MedicheckError::Http(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
}
