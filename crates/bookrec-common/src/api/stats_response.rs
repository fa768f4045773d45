use serde::{Deserialize, Serialize};

use super::round_to;
use crate::stats::RatingSummary;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreCountResponse {
    pub score: u8,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsResponse {
    pub user_count: usize,
    pub book_count: usize,
    pub rating_count: usize,
    /// Rounded to two decimal places; `None` when there are no ratings.
    pub mean_rating: Option<f64>,
    pub distribution: Vec<ScoreCountResponse>,
}

impl From<&RatingSummary> for StatsResponse {
    fn from(summary: &RatingSummary) -> Self {
        Self {
            user_count: summary.user_count,
            book_count: summary.book_count,
            rating_count: summary.rating_count,
            mean_rating: summary.mean_rating.map(|mean| round_to(mean, 2)),
            distribution: summary
                .distribution
                .iter()
                .map(|(score, count)| ScoreCountResponse {
                    score: score.value(),
                    count: *count,
                })
                .collect(),
        }
    }
}
