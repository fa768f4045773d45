//! Seeded synthetic rating data.
//!
//! A [`DataProvider`] is built once at startup and shared by reference; there
//! is no process-wide cache.

use std::env;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use thiserror::Error;
use tracing::info;

use crate::catalog::Catalog;
use crate::rating::{MAX_SCORE, MIN_SCORE, Rating, RatingError, RatingTable};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid ratings-per-user range {min}..={max}")]
    InvalidRange { min: usize, max: usize },
    #[error("catalog is empty")]
    EmptyCatalog,
    #[error(transparent)]
    Rating(#[from] RatingError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    pub seed: u64,
    pub user_count: usize,
    pub min_ratings_per_user: usize,
    pub max_ratings_per_user: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            user_count: 30,
            min_ratings_per_user: 2,
            max_ratings_per_user: 6,
        }
    }
}

impl DatasetConfig {
    fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
        env::var(name)
            .ok()
            .and_then(|value| value.trim().parse::<T>().ok())
    }

    fn parse_env_count(name: &str) -> Option<usize> {
        Self::parse_env::<usize>(name).filter(|count| *count > 0)
    }

    /// `BOOKREC_SEED` / `BOOKREC_USER_COUNT` / `BOOKREC_MIN_RATINGS` / `BOOKREC_MAX_RATINGS`
    /// で既定値を上書きする（不正値と 0 件指定は既定値のまま、シード 0 は有効）
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            seed: Self::parse_env("BOOKREC_SEED").unwrap_or(defaults.seed),
            user_count: Self::parse_env_count("BOOKREC_USER_COUNT")
                .unwrap_or(defaults.user_count),
            min_ratings_per_user: Self::parse_env_count("BOOKREC_MIN_RATINGS")
                .unwrap_or(defaults.min_ratings_per_user),
            max_ratings_per_user: Self::parse_env_count("BOOKREC_MAX_RATINGS")
                .unwrap_or(defaults.max_ratings_per_user),
        }
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.min_ratings_per_user == 0 || self.min_ratings_per_user > self.max_ratings_per_user
        {
            return Err(DatasetError::InvalidRange {
                min: self.min_ratings_per_user,
                max: self.max_ratings_per_user,
            });
        }
        Ok(())
    }
}

pub fn user_id(index: usize) -> String {
    format!("user_{index:02}")
}

#[derive(Debug, Clone)]
pub struct DataProvider {
    catalog: Catalog,
    ratings: RatingTable,
}

impl DataProvider {
    /// Each user rates between `min` and `max` distinct books (capped at the
    /// catalog size) with uniform scores in 1..=5.
    pub fn generate(config: &DatasetConfig, catalog: Catalog) -> Result<Self, DatasetError> {
        config.validate()?;
        if catalog.is_empty() {
            return Err(DatasetError::EmptyCatalog);
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let titles = catalog.titles();
        let max = config.max_ratings_per_user.min(titles.len());
        let min = config.min_ratings_per_user.min(max);

        let mut ratings = RatingTable::new();
        for index in 1..=config.user_count {
            let user = user_id(index);
            let count = rng.gen_range(min..=max);
            let picked: Vec<&str> = titles.choose_multiple(&mut rng, count).copied().collect();
            for title in picked {
                let score = rng.gen_range(MIN_SCORE..=MAX_SCORE);
                ratings.push(Rating::new(user.as_str(), title, i64::from(score))?);
            }
        }

        info!(
            seed = config.seed,
            users = config.user_count,
            books = catalog.len(),
            ratings = ratings.len(),
            "synthetic rating dataset generated"
        );

        Ok(Self { catalog, ratings })
    }

    pub fn from_parts(catalog: Catalog, ratings: RatingTable) -> Self {
        Self { catalog, ratings }
    }

    pub fn ratings(&self) -> &RatingTable {
        &self.ratings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn users(&self) -> Vec<String> {
        self.ratings.users()
    }

    pub fn has_user(&self, user_id: &str) -> bool {
        self.ratings.has_user(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    fn generate(config: &DatasetConfig) -> DataProvider {
        DataProvider::generate(config, Catalog::classics()).unwrap()
    }

    #[test]
    fn same_seed_yields_same_table() {
        let config = DatasetConfig::default();
        assert_eq!(generate(&config).ratings(), generate(&config).ratings());
    }

    #[test]
    fn each_user_rates_distinct_books_within_bounds() {
        let config = DatasetConfig::default();
        let provider = generate(&config);

        assert_eq!(provider.users().len(), config.user_count);
        for user in provider.users() {
            let titles: Vec<_> = provider
                .ratings()
                .ratings_for_user(&user)
                .map(|r| r.item_id.as_str())
                .collect();
            let unique: HashSet<_> = titles.iter().collect();

            assert_eq!(titles.len(), unique.len(), "duplicate rating for {user}");
            assert!((2..=6).contains(&titles.len()));
            assert!(titles.iter().all(|t| provider.catalog().get(t).is_some()));
        }
    }

    #[test]
    fn ratings_per_user_are_capped_at_catalog_size() {
        let config = DatasetConfig {
            user_count: 3,
            min_ratings_per_user: 20,
            max_ratings_per_user: 40,
            ..DatasetConfig::default()
        };
        let provider = generate(&config);

        for user in provider.users() {
            assert_eq!(provider.ratings().ratings_for_user(&user).count(), 10);
        }
    }

    #[test]
    fn rejects_inverted_range() {
        let config = DatasetConfig {
            min_ratings_per_user: 5,
            max_ratings_per_user: 2,
            ..DatasetConfig::default()
        };
        assert!(matches!(
            DataProvider::generate(&config, Catalog::classics()),
            Err(DatasetError::InvalidRange { min: 5, max: 2 })
        ));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(
            DataProvider::generate(&DatasetConfig::default(), Catalog::default()),
            Err(DatasetError::EmptyCatalog)
        ));
    }

    #[test]
    fn from_env_overrides_and_ignores_garbage() {
        let _guard = ENV_GUARD.lock().unwrap();
        unsafe {
            env::set_var("BOOKREC_SEED", "7");
            env::set_var("BOOKREC_USER_COUNT", "not-a-number");
            env::set_var("BOOKREC_MAX_RATINGS", "0");
        }

        let config = DatasetConfig::from_env();

        unsafe {
            env::remove_var("BOOKREC_SEED");
            env::remove_var("BOOKREC_USER_COUNT");
            env::remove_var("BOOKREC_MAX_RATINGS");
        }

        assert_eq!(config.seed, 7);
        assert_eq!(config.user_count, 30);
        assert_eq!(config.max_ratings_per_user, 6);
    }

    #[test]
    fn from_env_accepts_zero_seed() {
        let _guard = ENV_GUARD.lock().unwrap();
        unsafe { env::set_var("BOOKREC_SEED", "0") };

        let config = DatasetConfig::from_env();

        unsafe { env::remove_var("BOOKREC_SEED") };

        assert_eq!(config.seed, 0);
        assert!(DataProvider::generate(&config, Catalog::classics()).is_ok());
    }
}
