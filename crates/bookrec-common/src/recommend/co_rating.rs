use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashSet},
};

use tracing::debug;

use super::Recommendation;
use crate::rating::RatingTable;

#[derive(Debug, Default)]
struct ScoreAccumulator {
    sum: u32,
    count: usize,
}

impl ScoreAccumulator {
    fn add(&mut self, score: u8) {
        self.sum += u32::from(score);
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| f64::from(self.sum) / self.count as f64)
    }
}

/// 対象ユーザーと共通の本を評価したユーザーを近傍とし、未評価の本を平均スコア順に返す
///
/// Unknown users, `n == 0` and empty tables all produce an empty list.
/// Equal scores are ordered by `item_id` ascending.
pub fn recommend(table: &RatingTable, target_user: &str, n: usize) -> Vec<Recommendation> {
    if n == 0 {
        return Vec::new();
    }

    let seen_items: HashSet<&str> = table
        .ratings_for_user(target_user)
        .map(|r| r.item_id.as_str())
        .collect();

    if seen_items.is_empty() {
        debug!(target_user, "target user has no ratings");
        return Vec::new();
    }

    let neighbor_users: HashSet<&str> = table
        .iter()
        .filter(|r| r.user_id != target_user && seen_items.contains(r.item_id.as_str()))
        .map(|r| r.user_id.as_str())
        .collect();

    // 重複評価はそのまま二重に数える
    let mut candidates: BTreeMap<&str, ScoreAccumulator> = BTreeMap::new();
    for rating in table.iter() {
        if !neighbor_users.contains(rating.user_id.as_str())
            || seen_items.contains(rating.item_id.as_str())
        {
            continue;
        }
        candidates
            .entry(rating.item_id.as_str())
            .or_default()
            .add(rating.score.value());
    }

    let mut ranked: Vec<Recommendation> = candidates
        .into_iter()
        .filter_map(|(item_id, acc)| {
            acc.mean().map(|predicted_score| Recommendation {
                item_id: item_id.to_string(),
                predicted_score,
                support: acc.count,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.predicted_score
            .partial_cmp(&a.predicted_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
    ranked.truncate(n);

    debug!(
        target_user,
        seen = seen_items.len(),
        neighbors = neighbor_users.len(),
        returned = ranked.len(),
        "co-rating recommendations computed"
    );

    ranked
}
