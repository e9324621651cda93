use axum::{extract::State, Json};
use log::info;
use serde::Serialize;
use std::sync::{atomic::Ordering, Arc};
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionState {
    pub collect_data: bool,
}

#[utoipa::path(
    get,
    path = "/api/collection",
    responses(
        (status = OK, description = "Current collection toggle", body = CollectionState)
    ))]
pub async fn get_collection(State(state): State<Arc<AppState>>) -> Json<CollectionState> {
    Json(CollectionState {
        collect_data: state.collect_data.load(Ordering::SeqCst),
    })
}

#[utoipa::path(
    post,
    path = "/api/collection/toggle",
    responses(
        (status = OK, description = "Collection toggle flipped, new value returned", body = CollectionState)
    ))]
pub async fn toggle_collection(State(state): State<Arc<AppState>>) -> Json<CollectionState> {
    let was_enabled = state.collect_data.fetch_xor(true, Ordering::SeqCst);
    info!(
        "data collection toggled {}",
        if was_enabled { "off" } else { "on" }
    );

    Json(CollectionState {
        collect_data: !was_enabled,
    })
}
