use axum::{
    Json,
    extract::{Path, State},
};
use bookrec_common::api::{RatedBookResponse, UserListResponse};

use crate::SharedState;
use crate::error::ApiError;

pub async fn list_users(State(state): State<SharedState>) -> Json<UserListResponse> {
    Json(UserListResponse {
        users: state.provider.users(),
    })
}

/// 指定ユーザーが評価済みの本（タイトル順）
pub async fn user_ratings(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<RatedBookResponse>>, ApiError> {
    if !state.provider.has_user(&user_id) {
        return Err(ApiError::NotFound(format!("user {user_id} not found")));
    }

    let rated = state
        .provider
        .catalog()
        .rated_books(state.provider.ratings(), &user_id);

    Ok(Json(rated.iter().map(RatedBookResponse::from).collect()))
}
