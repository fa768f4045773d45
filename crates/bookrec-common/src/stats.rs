use std::collections::{BTreeMap, HashSet};

use crate::rating::{RatingTable, Score};

#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary {
    pub user_count: usize,
    pub book_count: usize,
    pub rating_count: usize,
    /// `None` for an empty table.
    pub mean_rating: Option<f64>,
    /// Occurring scores with their counts, ascending by score.
    pub distribution: Vec<(Score, usize)>,
}

impl RatingSummary {
    pub fn from_table(table: &RatingTable) -> Self {
        let mut users = HashSet::new();
        let mut books = HashSet::new();
        let mut distribution: BTreeMap<Score, usize> = BTreeMap::new();
        let mut total: u64 = 0;

        for rating in table.iter() {
            users.insert(rating.user_id.as_str());
            books.insert(rating.item_id.as_str());
            *distribution.entry(rating.score).or_default() += 1;
            total += u64::from(rating.score.value());
        }

        let rating_count = table.len();
        let mean_rating = (rating_count > 0).then(|| total as f64 / rating_count as f64);

        Self {
            user_count: users.len(),
            book_count: books.len(),
            rating_count,
            mean_rating,
            distribution: distribution.into_iter().collect(),
        }
    }
}
