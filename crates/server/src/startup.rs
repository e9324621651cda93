use crate::{
    fetch_weather, get_collection, health, reset_store, routes, search_locations, store_health,
    toggle_collection,
    influx::{InfluxClient, TimeSeriesStore},
    utils::Cli,
    weather_api::{LocationSuggestion, WeatherApi, WeatherApiClient},
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::{info, warn};
use std::{
    collections::HashMap,
    sync::{atomic::AtomicBool, Arc},
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub struct AppState {
    pub weather_api: Arc<dyn WeatherApi>,
    pub store: Arc<dyn TimeSeriesStore>,
    /// Collection toggle, the single piece of mutable service state
    pub collect_data: AtomicBool,
    /// Location search responses keyed by the raw query string
    pub search_cache: Mutex<HashMap<String, Vec<LocationSuggestion>>>,
    pub forecast_days: u8,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::weather::fetch_weather,
        routes::search::search_locations,
        routes::collection::get_collection,
        routes::collection::toggle_collection,
        routes::store::store_health,
        routes::store::reset_store,
        routes::health::health,
    ),
    components(
        schemas(
                routes::weather::WeatherRequest,
                routes::weather::WeatherResponse,
                routes::weather::PersistNotice,
                routes::collection::CollectionState,
                routes::store::StoreHealth,
                routes::store::ResetOutcome,
                crate::weather_api::LocationSuggestion
            )
    ),
    tags(
        (name = "weather sink api", description = "a RESTful api that fetches weather data on demand and records it into InfluxDB")
    )
)]
struct ApiDoc;

pub async fn build_app_state(cli: &Cli) -> Result<AppState, anyhow::Error> {
    if cli.weather_api_key().is_empty() {
        warn!("weather API key is not set, forecast requests will be rejected upstream");
    }
    let weather_api = Arc::new(
        WeatherApiClient::new(cli.weather_api_url(), cli.weather_api_key())
            .map_err(|e| anyhow!("error building weather API client: {}", e))?,
    );

    if cli.influx_token().is_empty() {
        warn!("InfluxDB token is not set, writes will be rejected by the store");
    }
    let store = Arc::new(
        InfluxClient::new(
            cli.influx_url(),
            cli.influx_token(),
            cli.influx_org(),
            cli.influx_bucket(),
        )
        .map_err(|e| anyhow!("error building InfluxDB client: {}", e))?,
    );

    // An unreachable store is not fatal; writes report failure until it
    // comes back
    if store.is_connected().await {
        info!("connected to InfluxDB at {}", cli.influx_url());
    } else {
        warn!("InfluxDB at {} is unreachable", cli.influx_url());
    }

    Ok(AppState {
        weather_api,
        store,
        collect_data: AtomicBool::new(cli.collect_data()),
        search_cache: Mutex::new(HashMap::new()),
        forecast_days: cli.forecast_days(),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/weather", post(fetch_weather))
        .route("/api/search", get(search_locations))
        .route("/api/collection", get(get_collection))
        .route("/api/collection/toggle", post(toggle_collection))
        .route("/api/store/health", get(store_health))
        .route("/api/store/reset", post(reset_store))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
