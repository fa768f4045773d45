//! User-based collaborative filtering over a [`RatingTable`](crate::rating::RatingTable).
//!
//! A neighbor is any other user who rated at least one item the target user
//! rated. Every neighbor counts the same; the predicted score of a candidate
//! item is the plain mean of the neighbors' scores for it.

pub mod co_rating;

pub use co_rating::recommend;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item_id: String,
    pub predicted_score: f64,
    /// Number of neighbor scores averaged into `predicted_score`.
    pub support: usize,
}
