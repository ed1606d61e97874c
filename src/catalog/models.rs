// Data models: the records that flow through the recommender.
//
// A `Book` is built once from a table row (with missing text fields coerced)
// and never changes afterwards. The corpus index of a book is its position in
// the `Vec<Book>` handed to the engine.

use serde::{Deserialize, Serialize};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// ISBN-like identifier. Not needed for similarity; used to join ratings.
    pub isbn: Option<String>,
    pub title: String,
    pub author: String,
    pub publisher: String,
    /// Publication year as written in the catalog (display only)
    pub year: Option<String>,
    /// Cover image URL (display only)
    pub image_url: Option<String>,
}

impl Book {
    /// Build a book from already-clean strings. Mostly useful in tests and
    /// for callers that don't go through a `Table`.
    pub fn new(title: &str, author: &str, publisher: &str) -> Self {
        Self {
            isbn: None,
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.to_string(),
            year: None,
            image_url: None,
        }
    }

    pub fn with_isbn(mut self, isbn: &str) -> Self {
        self.isbn = Some(isbn.to_string());
        self
    }
}

/// A single user rating of a book, as found in the ratings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: String,
    pub isbn: String,
    /// 0 (implicit interaction) through 10
    pub rating: u8,
}

/// A book ranked by how many ratings it has and how high they are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularBook {
    pub book: Book,
    pub num_ratings: u32,
    pub avg_rating: f64,
}
