use axum::{Json, extract::State};
use bookrec_common::RatingSummary;
use bookrec_common::api::StatsResponse;

use crate::SharedState;

pub async fn summary(State(state): State<SharedState>) -> Json<StatsResponse> {
    let summary = RatingSummary::from_table(state.provider.ratings());
    Json(StatsResponse::from(&summary))
}
