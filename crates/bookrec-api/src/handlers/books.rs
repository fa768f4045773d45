use axum::{Json, extract::State};
use bookrec_common::api::BookResponse;

use crate::SharedState;

pub async fn list_books(State(state): State<SharedState>) -> Json<Vec<BookResponse>> {
    Json(
        state
            .provider
            .catalog()
            .iter()
            .map(BookResponse::from)
            .collect(),
    )
}
