use axum::{extract::State, http::StatusCode, Json};
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::{atomic::Ordering, Arc};
use utoipa::ToSchema;

use crate::{
    weather::{extract, persist, FlatWeatherRecord, PersistOutcome},
    AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct WeatherRequest {
    /// Free-form location query: city name, postal code, coordinates or IP
    pub location: String,
}

/// How the fetched record fared against the store.
#[derive(Debug, Serialize, ToSchema)]
pub struct PersistNotice {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    pub message: String,
}

impl PersistNotice {
    fn from_outcome(outcome: PersistOutcome, location: &str) -> Self {
        match outcome {
            PersistOutcome::Disabled => PersistNotice {
                status: "disabled".to_string(),
                verified: None,
                message: "Weather data displayed but not saved (data collection is disabled)."
                    .to_string(),
            },
            PersistOutcome::Unavailable => PersistNotice {
                status: "unavailable".to_string(),
                verified: None,
                message: "Weather data displayed but the store is unreachable, nothing was saved."
                    .to_string(),
            },
            PersistOutcome::Failed => PersistNotice {
                status: "failed".to_string(),
                verified: None,
                message: format!("Failed to save weather data for {}.", location),
            },
            PersistOutcome::Stored { verified } => PersistNotice {
                status: "saved".to_string(),
                verified: Some(verified),
                message: format!("Weather data for {} saved.", location),
            },
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct WeatherResponse {
    /// Flattened weather record, every schema key present
    #[schema(value_type = Object)]
    pub record: FlatWeatherRecord,
    pub collection_enabled: bool,
    pub persistence: PersistNotice,
}

#[utoipa::path(
    post,
    path = "/api/weather",
    request_body = WeatherRequest,
    responses(
        (status = OK, description = "Weather data retrieved, persistence outcome attached", body = WeatherResponse),
        (status = BAD_REQUEST, description = "Empty location query"),
        (status = BAD_GATEWAY, description = "Weather API did not return data")
    ))]
pub async fn fetch_weather(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Result<Json<WeatherResponse>, (StatusCode, String)> {
    let location = request.location.trim();
    if location.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please enter a location".to_string(),
        ));
    }

    let raw = state
        .weather_api
        .forecast(location, state.forecast_days)
        .await
        .map_err(|e| {
            error!("error fetching weather data for {}: {}", location, e);
            (
                StatusCode::BAD_GATEWAY,
                "Unable to retrieve weather data for the specified location. Please try again."
                    .to_string(),
            )
        })?;

    let record = extract(&raw);
    let collect = state.collect_data.load(Ordering::SeqCst);
    let outcome = persist(state.store.as_ref(), &record, collect).await;
    let persistence = PersistNotice::from_outcome(outcome, &record.formatted_location);

    Ok(Json(WeatherResponse {
        collection_enabled: collect,
        persistence,
        record,
    }))
}
