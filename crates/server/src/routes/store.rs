use axum::{extract::State, http::StatusCode, Json};
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{weather::MEASUREMENT, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreHealth {
    pub connected: bool,
}

#[utoipa::path(
    get,
    path = "/api/store/health",
    responses(
        (status = OK, description = "Whether the time-series store answers its health probe", body = StoreHealth)
    ))]
pub async fn store_health(State(state): State<Arc<AppState>>) -> Json<StoreHealth> {
    Json(StoreHealth {
        connected: state.store.is_connected().await,
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetOutcome {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/store/reset",
    responses(
        (status = OK, description = "All stored weather points deleted", body = ResetOutcome),
        (status = INTERNAL_SERVER_ERROR, description = "The store rejected the delete")
    ))]
pub async fn reset_store(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ResetOutcome>, (StatusCode, String)> {
    state
        .store
        .delete_measurement(MEASUREMENT)
        .await
        .map_err(|e| {
            error!("error resetting measurement '{}': {}", MEASUREMENT, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to reset stored weather data: {}", e),
            )
        })?;
    info!("measurement '{}' deleted", MEASUREMENT);

    Ok(Json(ResetOutcome {
        success: true,
        message: "All stored weather data deleted.".to_string(),
    }))
}
