use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rating::{RatingTable, Score};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Also used as the item id in ratings.
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            year,
        }
    }
}

/// A user's rating joined with the book's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedBook<'a> {
    pub book: &'a Book,
    pub score: Score,
}

/// タイトルをキーにした書籍メタデータ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    books: BTreeMap<String, Book>,
}

const CLASSICS: &[(&str, &str, &str, i32)] = &[
    ("Тіні забутих предків", "Михайло Коцюбинський", "Повість", 1911),
    ("Лісова пісня", "Леся Українка", "Драма", 1911),
    ("Кайдашева сім'я", "Іван Нечуй-Левицький", "Повість", 1879),
    ("Чорна рада", "Пантелеймон Куліш", "Історичний роман", 1857),
    ("Захар Беркут", "Іван Франко", "Історична повість", 1883),
    ("Земля", "Ольга Кобилянська", "Роман", 1902),
    ("Тигролови", "Іван Багряний", "Роман", 1944),
    ("Записки українського самашедшого", "Ліна Костенко", "Роман", 2010),
    ("Солодка Даруся", "Марія Матіос", "Роман", 2004),
    ("Місто", "Валер'ян Підмогильний", "Роман", 1928),
];

impl Catalog {
    pub fn new(books: impl IntoIterator<Item = Book>) -> Self {
        Self {
            books: books
                .into_iter()
                .map(|book| (book.title.clone(), book))
                .collect(),
        }
    }

    /// Ten works of Ukrainian literature used by the demo dataset.
    pub fn classics() -> Self {
        Self::new(
            CLASSICS
                .iter()
                .map(|(title, author, genre, year)| Book::new(*title, *author, *genre, *year)),
        )
    }

    pub fn get(&self, title: &str) -> Option<&Book> {
        self.books.get(title)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Books ordered by title.
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.books.keys().map(String::as_str).collect()
    }

    /// Ratings of `user_id` joined with metadata, ordered by title.
    pub fn rated_books<'a>(&'a self, table: &RatingTable, user_id: &str) -> Vec<RatedBook<'a>> {
        let mut rated: Vec<RatedBook<'a>> = table
            .ratings_for_user(user_id)
            .filter_map(|rating| match self.get(&rating.item_id) {
                Some(book) => Some(RatedBook {
                    book,
                    score: rating.score,
                }),
                None => {
                    debug!(
                        user_id,
                        item_id = %rating.item_id,
                        "rated item missing from catalog; skipping"
                    );
                    None
                }
            })
            .collect();

        rated.sort_by(|a, b| a.book.title.cmp(&b.book.title));
        rated
    }
}
