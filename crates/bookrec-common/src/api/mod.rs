pub mod book_response;
pub mod health;
pub mod recommendation_response;
pub mod stats_response;

pub use book_response::{BookResponse, RatedBookResponse, UserListResponse};
pub use health::{HealthResponse, ServiceStatus};
pub use recommendation_response::RecommendationResponse;
pub use stats_response::{ScoreCountResponse, StatsResponse};

/// 表示用に小数点以下 `digits` 桁へ丸める
pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
