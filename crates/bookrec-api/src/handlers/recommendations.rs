use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use bookrec_common::api::RecommendationResponse;
use bookrec_common::recommend;
use serde::Deserialize;
use tracing::info;

use crate::SharedState;
use crate::error::ApiError;

const DEFAULT_COUNT: i64 = 3;
const MAX_COUNT: i64 = 50;

#[derive(Debug, Deserialize, Default)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub n: Option<i64>,
}

/// `n <= 0` は「推薦なし」として空配列を返す
fn effective_count(n: Option<i64>) -> usize {
    n.unwrap_or(DEFAULT_COUNT).clamp(0, MAX_COUNT) as usize
}

pub async fn recommendations_for_user(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<Vec<RecommendationResponse>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let count = effective_count(query.n);
    let recommendations = recommend(state.provider.ratings(), &user_id, count);

    info!(
        user_id = %user_id,
        requested = ?query.n,
        returned = recommendations.len(),
        "recommendations served"
    );

    Ok(Json(RecommendationResponse::from_recommendations(
        &recommendations,
        state.provider.catalog(),
    )))
}
