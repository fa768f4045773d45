use serde::{Deserialize, Serialize};

use crate::catalog::{Book, RatedBook};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookResponse {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.year,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatedBookResponse {
    #[serde(flatten)]
    pub book: BookResponse,
    pub rating: u8,
}

impl From<&RatedBook<'_>> for RatedBookResponse {
    fn from(rated: &RatedBook<'_>) -> Self {
        Self {
            book: BookResponse::from(rated.book),
            rating: rated.score.value(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserListResponse {
    pub users: Vec<String>,
}
