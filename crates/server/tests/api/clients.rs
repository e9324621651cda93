use reqwest::StatusCode;
use serde_json::json;
use server::{
    influx::{self, InfluxClient},
    weather::{FieldValue, Point, MEASUREMENT},
    weather_api::{self, WeatherApiClient},
    TimeSeriesStore, WeatherApi,
};
use wiremock::{
    matchers::{body_json, body_string, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn influx_client(mock_server: &MockServer) -> InfluxClient {
    InfluxClient::new(
        mock_server.uri(),
        "test-token".to_string(),
        "test-org".to_string(),
        "weather".to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn forecast_requests_carry_the_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("key", "test-key"))
        .and(query_param("q", "Paris"))
        .and(query_param("days", "3"))
        .and(query_param("aqi", "yes"))
        .and(query_param("alerts", "yes"))
        .and(query_param("marine", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": {"name": "Paris", "country": "France"},
            "current": {"temp_c": 18.5}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::new(mock_server.uri(), "test-key".to_string()).unwrap();
    let raw = client.forecast("Paris", 3).await.unwrap();

    assert_eq!(raw["current"]["temp_c"], 18.5);
}

#[tokio::test]
async fn forecast_surfaces_upstream_error_statuses() {
    let mock_server = MockServer::start().await;

    // 404 is not retried, unlike transient upstream statuses
    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::new(mock_server.uri(), "test-key".to_string()).unwrap();
    let err = client.forecast("Nowhere", 3).await.unwrap_err();

    match err {
        weather_api::Error::Status(status) => assert_eq!(status, StatusCode::NOT_FOUND),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn search_decodes_location_suggestions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search.json"))
        .and(query_param("key", "test-key"))
        .and(query_param("q", "Par"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 803,
            "name": "Paris",
            "region": "Ile-de-France",
            "country": "France",
            "lat": 48.87,
            "lon": 2.33,
            "url": "paris-ile-de-france-france"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::new(mock_server.uri(), "test-key".to_string()).unwrap();
    let matches = client.search("Par").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, Some(803));
    assert_eq!(matches[0].name, "Paris");
    assert_eq!(matches[0].country, "France");
}

#[tokio::test]
async fn writes_send_line_protocol_with_token_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/write"))
        .and(query_param("org", "test-org"))
        .and(query_param("bucket", "weather"))
        .and(header("Authorization", "Token test-token"))
        .and(header("Content-Type", "text/plain; charset=utf-8"))
        .and(body_string(
            "weather_data,location=Paris\\,\\ France temp_c=18.5",
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let point = Point {
        measurement: MEASUREMENT,
        location: "Paris, France".to_string(),
        fields: vec![("temp_c".to_string(), FieldValue::Float(18.5))],
    };
    influx_client(&mock_server).write_point(&point).await.unwrap();
}

#[tokio::test]
async fn write_rejections_surface_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/write"))
        .respond_with(ResponseTemplate::new(400).set_body_string("partial write"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let point = Point {
        measurement: MEASUREMENT,
        location: "Paris".to_string(),
        fields: vec![("temp_c".to_string(), FieldValue::Float(18.5))],
    };
    let err = influx_client(&mock_server)
        .write_point(&point)
        .await
        .unwrap_err();

    match err {
        influx::Error::Status { status, body } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, "partial write");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn verification_reads_annotated_csv() {
    let mock_server = MockServer::start().await;

    let csv = "#datatype,string,long,dateTime:RFC3339\n\
               ,result,table,_time\n\
               ,_result,0,2025-08-22T10:00:00Z\n";
    Mock::given(method("POST"))
        .and(path("/api/v2/query"))
        .and(query_param("org", "test-org"))
        .and(header("Authorization", "Token test-token"))
        .and(header("Content-Type", "application/vnd.flux"))
        .and(header("Accept", "application/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .expect(1)
        .mount(&mock_server)
        .await;

    let found = influx_client(&mock_server)
        .verify_write("Paris, France")
        .await
        .unwrap();
    assert!(found);
}

#[tokio::test]
async fn verification_with_no_rows_reports_false() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let found = influx_client(&mock_server)
        .verify_write("Paris, France")
        .await
        .unwrap();
    assert!(!found);
}

#[tokio::test]
async fn reset_deletes_across_all_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/delete"))
        .and(query_param("org", "test-org"))
        .and(query_param("bucket", "weather"))
        .and(header("Authorization", "Token test-token"))
        .and(body_json(json!({
            "start": "1970-01-01T00:00:00Z",
            "stop": "2099-12-31T23:59:59Z",
            "predicate": "_measurement=\"weather_data\"",
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    influx_client(&mock_server)
        .delete_measurement(MEASUREMENT)
        .await
        .unwrap();
}

#[tokio::test]
async fn health_probe_reflects_reachability() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    assert!(influx_client(&mock_server).is_connected().await);

    // a server with no routes answers 404
    let empty_server = MockServer::start().await;
    assert!(!influx_client(&empty_server).is_connected().await);
}
