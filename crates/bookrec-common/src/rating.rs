use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("score {0} is outside {MIN_SCORE}..={MAX_SCORE}")]
    ScoreOutOfRange(i64),
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),
}

/// 1〜5 の整数評価
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub fn new(value: i64) -> Result<Self, RatingError> {
        if (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RatingError::ScoreOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRating")]
pub struct Rating {
    pub user_id: String,
    pub item_id: String,
    pub score: Score,
}

impl Rating {
    pub fn new(
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        score: i64,
    ) -> Result<Self, RatingError> {
        let user_id = user_id.into();
        let item_id = item_id.into();

        if user_id.trim().is_empty() {
            return Err(RatingError::EmptyIdentifier("user_id"));
        }
        if item_id.trim().is_empty() {
            return Err(RatingError::EmptyIdentifier("item_id"));
        }

        Ok(Self {
            user_id,
            item_id,
            score: Score::new(score)?,
        })
    }
}

/// Wire form of [`Rating`]; deserialization goes through [`Rating::new`].
#[derive(Deserialize)]
struct RawRating {
    user_id: String,
    item_id: String,
    score: i64,
}

impl TryFrom<RawRating> for Rating {
    type Error = RatingError;

    fn try_from(raw: RawRating) -> Result<Self, Self::Error> {
        Self::new(raw.user_id, raw.item_id, raw.score)
    }
}

/// Insertion-ordered collection of ratings.
///
/// Uniqueness of `(user_id, item_id)` is not enforced; the generator never
/// emits duplicates and hand-built tables are taken as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingTable {
    ratings: Vec<Rating>,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rating: Rating) {
        self.ratings.push(rating);
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rating> {
        self.ratings.iter()
    }

    pub fn ratings_for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Rating> {
        self.ratings.iter().filter(move |r| r.user_id == user_id)
    }

    pub fn has_user(&self, user_id: &str) -> bool {
        self.ratings.iter().any(|r| r.user_id == user_id)
    }

    /// Distinct user ids in ascending order.
    pub fn users(&self) -> Vec<String> {
        self.ratings
            .iter()
            .map(|r| r.user_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl FromIterator<Rating> for RatingTable {
    fn from_iter<I: IntoIterator<Item = Rating>>(iter: I) -> Self {
        Self {
            ratings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rejects_values_outside_range() {
        assert_eq!(Score::new(0), Err(RatingError::ScoreOutOfRange(0)));
        assert_eq!(Score::new(6), Err(RatingError::ScoreOutOfRange(6)));
        assert_eq!(Score::new(5).unwrap().value(), 5);
    }

    #[test]
    fn rating_rejects_blank_identifiers() {
        assert_eq!(
            Rating::new(" ", "book", 3),
            Err(RatingError::EmptyIdentifier("user_id"))
        );
        assert_eq!(
            Rating::new("user", "", 3),
            Err(RatingError::EmptyIdentifier("item_id"))
        );
    }

    #[test]
    fn users_are_distinct_and_sorted() {
        let table: RatingTable = [("b", "Y", 2), ("a", "X", 5), ("b", "X", 4)]
            .into_iter()
            .map(|(u, i, s)| Rating::new(u, i, s).unwrap())
            .collect();

        assert_eq!(table.users(), vec!["a", "b"]);
        assert_eq!(table.ratings_for_user("b").count(), 2);
        assert!(!table.has_user("c"));
    }

    #[test]
    fn score_deserialization_validates_range() {
        let ok: Score = serde_json::from_str("4").unwrap();
        assert_eq!(ok.value(), 4);
        assert!(serde_json::from_str::<Score>("9").is_err());
    }

    #[test]
    fn rating_deserialization_rejects_blank_identifiers() {
        let blank = serde_json::from_str::<Rating>(r#"{"user_id":"","item_id":"  ","score":3}"#);
        assert!(blank.is_err());

        let table = serde_json::from_str::<RatingTable>(
            r#"{"ratings":[{"user_id":"a","item_id":" ","score":4}]}"#,
        );
        assert!(table.is_err());
    }

    #[test]
    fn rating_deserialization_accepts_valid_rows() {
        let rating: Rating =
            serde_json::from_str(r#"{"user_id":"a","item_id":"X","score":5}"#).unwrap();
        assert_eq!(rating, Rating::new("a", "X", 5).unwrap());
    }
}
