use axum::http::StatusCode;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Service is up")
    ))]
pub async fn health() -> StatusCode {
    StatusCode::OK
}
