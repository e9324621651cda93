use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use log::{debug, error};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{weather_api::LocationSuggestion, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Partial location to match against
    pub q: String,
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchParams),
    responses(
        (status = OK, description = "Matching locations", body = Vec<LocationSuggestion>),
        (status = BAD_REQUEST, description = "Empty search query"),
        (status = BAD_GATEWAY, description = "Weather API did not return data")
    ))]
pub async fn search_locations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<LocationSuggestion>>, (StatusCode, String)> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please enter a search query".to_string(),
        ));
    }

    // Identical queries are served from memory for the life of the process
    {
        let cache = state.search_cache.lock().await;
        if let Some(matches) = cache.get(&query) {
            debug!("location search cache hit for '{}'", query);
            return Ok(Json(matches.clone()));
        }
    }

    let matches = state.weather_api.search(&query).await.map_err(|e| {
        error!("error searching locations for '{}': {}", query, e);
        (
            StatusCode::BAD_GATEWAY,
            "Unable to search locations right now. Please try again.".to_string(),
        )
    })?;

    state
        .search_cache
        .lock()
        .await
        .insert(query, matches.clone());

    Ok(Json(matches))
}
