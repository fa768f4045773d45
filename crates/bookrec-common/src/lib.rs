pub mod api;
pub mod catalog;
pub mod dataset;
pub mod logging;
pub mod rating;
pub mod recommend;
pub mod stats;

pub use catalog::{Book, Catalog, RatedBook};
pub use dataset::{DataProvider, DatasetConfig, DatasetError};
pub use rating::{Rating, RatingError, RatingTable, Score};
pub use recommend::{Recommendation, recommend};
pub use stats::RatingSummary;
