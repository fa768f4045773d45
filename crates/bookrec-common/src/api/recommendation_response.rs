use serde::{Deserialize, Serialize};

use super::round_to;
use crate::catalog::Catalog;
use crate::recommend::Recommendation;

/// 推薦結果に書籍メタデータを結合したレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub title: String,
    pub author: Option<String>,
    pub genre: Option<String>,
    /// Rounded to one decimal place.
    pub predicted_score: f64,
    pub support: usize,
}

impl RecommendationResponse {
    pub fn from_recommendation(recommendation: &Recommendation, catalog: &Catalog) -> Self {
        let book = catalog.get(&recommendation.item_id);
        Self {
            title: recommendation.item_id.clone(),
            author: book.map(|b| b.author.clone()),
            genre: book.map(|b| b.genre.clone()),
            predicted_score: round_to(recommendation.predicted_score, 1),
            support: recommendation.support,
        }
    }

    pub fn from_recommendations(
        recommendations: &[Recommendation],
        catalog: &Catalog,
    ) -> Vec<Self> {
        recommendations
            .iter()
            .map(|r| Self::from_recommendation(r, catalog))
            .collect()
    }
}
