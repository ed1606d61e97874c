// Text normalization: the composite feature text each book is vectorized
// from.
//
// Missing text fields are replaced with the literal "nan" before
// concatenation. That token does end up in the vocabulary, but it keeps a
// book with no author comparable to everything else instead of failing.

use crate::catalog::models::Book;

/// Placeholder for a missing title, author or publisher.
pub const MISSING: &str = "nan";

/// Coerce an optional field to a string. Never fails.
pub fn coerce(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

/// Title, author and publisher joined by single spaces, lowercased.
pub fn composite_text(book: &Book) -> String {
    format!("{} {} {}", book.title, book.author, book.publisher).to_lowercase()
}

/// One composite text per book, in corpus order.
pub fn composite_texts(books: &[Book]) -> Vec<String> {
    books.iter().map(composite_text).collect()
}
