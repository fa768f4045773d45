use std::sync::atomic::Ordering;

use axum::{Json, extract::State};
use bookrec_common::api::{HealthResponse, ServiceStatus};

use crate::SharedState;
use crate::error::ApiError;

pub async fn livez() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: ServiceStatus::Ok,
        application: None,
    })
}

pub async fn readyz(State(state): State<SharedState>) -> Result<Json<HealthResponse>, ApiError> {
    if !state.readiness.load(Ordering::SeqCst) {
        return Err(ApiError::ServiceUnavailable(
            ServiceStatus::ShuttingDown.as_ref().to_string(),
        ));
    }

    Ok(Json(HealthResponse {
        status: ServiceStatus::Ok,
        application: Some(env!("CARGO_PKG_NAME").to_string()),
    }))
}
