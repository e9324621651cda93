use crate::helpers::{spawn_app, MockTimeSeriesStore, MockWeatherApi};
use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use hyper::{Method, StatusCode};
use serde_json::{from_slice, Value};
use server::{influx, LocationSuggestion};
use std::sync::Arc;
use tower::ServiceExt;

fn paris_suggestion() -> LocationSuggestion {
    LocationSuggestion {
        id: Some(803),
        name: "Paris".to_string(),
        region: "Ile-de-France".to_string(),
        country: "France".to_string(),
        lat: 48.87,
        lon: 2.33,
        url: Some("paris-ile-de-france-france".to_string()),
    }
}

#[tokio::test]
async fn toggling_collection_flips_the_state() {
    let test_app = spawn_app(
        Arc::new(MockWeatherApi::new()),
        Arc::new(MockTimeSeriesStore::new()),
        false,
    )
    .await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/collection")
        .body(Body::empty())
        .unwrap();
    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: Value = from_slice(&body).unwrap();
    assert_eq!(res["collect_data"], false);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/collection/toggle")
        .body(Body::empty())
        .unwrap();
    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: Value = from_slice(&body).unwrap();
    assert_eq!(res["collect_data"], true);

    // the flip sticks for later reads
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/collection")
        .body(Body::empty())
        .unwrap();
    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: Value = from_slice(&body).unwrap();
    assert_eq!(res["collect_data"], true);
}

#[tokio::test]
async fn repeated_searches_are_served_from_the_cache() {
    let mut weather_data = MockWeatherApi::new();
    weather_data
        .expect_search()
        .times(1)
        .withf(|query| query == "Paris")
        .returning(|_| Ok(vec![paris_suggestion()]));

    let test_app = spawn_app(
        Arc::new(weather_data),
        Arc::new(MockTimeSeriesStore::new()),
        false,
    )
    .await;

    for _ in 0..2 {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/search?q=Paris")
            .body(Body::empty())
            .unwrap();
        let response = test_app
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");
        assert!(response.status().is_success());

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let matches: Vec<LocationSuggestion> = from_slice(&body).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Paris");
    }
}

#[tokio::test]
async fn blank_search_queries_are_rejected() {
    let test_app = spawn_app(
        Arc::new(MockWeatherApi::new()),
        Arc::new(MockTimeSeriesStore::new()),
        false,
    )
    .await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/search?q=%20")
        .body(Body::empty())
        .unwrap();
    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_health_reflects_the_probe() {
    let mut store = MockTimeSeriesStore::new();
    store.expect_is_connected().times(1).returning(|| false);

    let test_app = spawn_app(Arc::new(MockWeatherApi::new()), Arc::new(store), false).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/store/health")
        .body(Body::empty())
        .unwrap();
    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: Value = from_slice(&body).unwrap();
    assert_eq!(res["connected"], false);
}

#[tokio::test]
async fn reset_deletes_the_weather_measurement() {
    let mut store = MockTimeSeriesStore::new();
    store
        .expect_delete_measurement()
        .times(1)
        .withf(|measurement| measurement == "weather_data")
        .returning(|_| Ok(()));

    let test_app = spawn_app(Arc::new(MockWeatherApi::new()), Arc::new(store), false).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/store/reset")
        .body(Body::empty())
        .unwrap();
    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: Value = from_slice(&body).unwrap();
    assert_eq!(res["success"], true);
    assert_eq!(res["message"], "All stored weather data deleted.");
}

#[tokio::test]
async fn reset_failures_surface_as_server_errors() {
    let mut store = MockTimeSeriesStore::new();
    store.expect_delete_measurement().times(1).returning(|_| {
        Err(influx::Error::Status {
            status: StatusCode::FORBIDDEN,
            body: "insufficient permissions".to_string(),
        })
    });

    let test_app = spawn_app(Arc::new(MockWeatherApi::new()), Arc::new(store), false).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/store/reset")
        .body(Body::empty())
        .unwrap();
    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
