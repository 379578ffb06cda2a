use axum::Json;
use axum::extract::State;
use common_services::api::error::ApiError;
use common_services::api::interfaces::MessageResponse;
use common_services::database::DataStore;
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    get,
    path = "/api",
    tag = "System",
    responses(
        (status = 200, description = "Root message", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Photo sharing API is running"))
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "System",
    responses(
        (status = 200, description = "API is healthy and ready to accept traffic", body = String),
        (status = 503, description = "API is not healthy, likely due to a database issue.")
    )
)]
pub async fn health_check(
    State(store): State<Arc<dyn DataStore>>,
) -> Result<Json<&'static str>, ApiError> {
    store.ping().await.map_err(|e| {
        error!("Health check failed: database connection error: {}", e);
        ApiError::Unavailable(e)
    })?;
    Ok(Json("OK"))
}
