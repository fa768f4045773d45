use std::collections::{HashMap, HashSet};

use bookrec_common::{Catalog, DataProvider, DatasetConfig, RatingTable, recommend};

fn provider() -> DataProvider {
    DataProvider::generate(&DatasetConfig::default(), Catalog::classics()).unwrap()
}

fn neighbor_score_range(table: &RatingTable, user: &str, item: &str) -> (u8, u8) {
    let seen: HashSet<&str> = table
        .ratings_for_user(user)
        .map(|r| r.item_id.as_str())
        .collect();
    let neighbors: HashSet<&str> = table
        .iter()
        .filter(|r| r.user_id != user && seen.contains(r.item_id.as_str()))
        .map(|r| r.user_id.as_str())
        .collect();

    table
        .iter()
        .filter(|r| r.item_id == item && neighbors.contains(r.user_id.as_str()))
        .map(|r| r.score.value())
        .fold((u8::MAX, u8::MIN), |(lo, hi), s| (lo.min(s), hi.max(s)))
}

#[test]
fn generated_dataset_satisfies_recommendation_properties() {
    let provider = provider();
    let table = provider.ratings();

    for user in provider.users() {
        let seen: HashSet<&str> = table
            .ratings_for_user(&user)
            .map(|r| r.item_id.as_str())
            .collect();

        for n in [1, 3, 5, 20] {
            let result = recommend(table, &user, n);

            assert_eq!(result, recommend(table, &user, n), "non-deterministic for {user}");
            assert!(result.len() <= n);
            assert!(
                result.iter().all(|r| !seen.contains(r.item_id.as_str())),
                "{user} was recommended an item they already rated"
            );
            assert!(
                result
                    .windows(2)
                    .all(|w| w[0].predicted_score >= w[1].predicted_score)
            );

            for r in &result {
                let (lo, hi) = neighbor_score_range(table, &user, &r.item_id);
                assert!(f64::from(lo) <= r.predicted_score && r.predicted_score <= f64::from(hi));
                assert!(r.support >= 1);
            }
        }
    }
}

#[test]
fn larger_count_extends_smaller_result() {
    let provider = provider();
    let table = provider.ratings();

    for user in provider.users() {
        let short = recommend(table, &user, 2);
        let long = recommend(table, &user, 10);
        assert_eq!(short[..], long[..short.len()]);
    }
}

#[test]
fn every_recommended_title_exists_in_catalog() {
    let provider = provider();
    let mut recommended: HashMap<String, usize> = HashMap::new();

    for user in provider.users() {
        for r in recommend(provider.ratings(), &user, 5) {
            *recommended.entry(r.item_id).or_default() += 1;
        }
    }

    assert!(!recommended.is_empty());
    assert!(recommended.keys().all(|title| provider.catalog().get(title).is_some()));
}

#[test]
fn user_absent_from_dataset_gets_nothing() {
    let provider = provider();
    assert!(recommend(provider.ratings(), "user_99", 5).is_empty());
}
