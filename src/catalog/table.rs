// Loosely-typed tabular input and the typed boundary in front of the engine.
//
// A `Table` is whatever the loader (or any other caller) managed to read:
// named columns and rows of optional strings. `Table::books` is the only place
// where column names are checked, so a missing column fails here, before any
// model work starts.

use crate::catalog::models::Book;
use crate::error::BuildError;
use crate::features::normalize::coerce;

pub const ISBN: &str = "ISBN";
pub const TITLE: &str = "Book-Title";
pub const AUTHOR: &str = "Book-Author";
pub const YEAR: &str = "Year-Of-Publication";
pub const PUBLISHER: &str = "Publisher";
pub const IMAGE_URL: &str = "Image-URL-M";

/// Columns a books table must carry.
pub const BOOK_COLUMNS: [&str; 6] = [ISBN, TITLE, AUTHOR, YEAR, PUBLISHER, IMAGE_URL];

pub const USER_ID: &str = "User-ID";
pub const RATING: &str = "Book-Rating";

/// Columns a ratings table must carry.
pub const RATING_COLUMNS: [&str; 3] = [USER_ID, ISBN, RATING];

/// Named columns plus rows of optional cells. Rows shorter than the header
/// read as missing values in the trailing columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve every name in `names` to a column position, or report all the
    /// ones that are missing at once.
    pub fn require(&self, names: &[&str]) -> Result<Vec<usize>, BuildError> {
        let mut positions = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column(name) {
                Some(pos) => positions.push(pos),
                None => missing.push(name.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(positions)
        } else {
            Err(BuildError::MissingColumns { missing })
        }
    }

    /// Convert every row into a `Book`, in row order.
    ///
    /// Title, author and publisher are coerced so they are never missing;
    /// identifier, year and image stay optional.
    pub fn books(&self) -> Result<Vec<Book>, BuildError> {
        let cols = self.require(&BOOK_COLUMNS)?;
        let (isbn, title, author, year, publisher, image) =
            (cols[0], cols[1], cols[2], cols[3], cols[4], cols[5]);

        Ok(self
            .rows
            .iter()
            .map(|row| Book {
                isbn: cell(row, isbn).map(str::to_string),
                title: coerce(cell(row, title)),
                author: coerce(cell(row, author)),
                publisher: coerce(cell(row, publisher)),
                year: cell(row, year).map(str::to_string),
                image_url: cell(row, image).map(str::to_string),
            })
            .collect())
    }
}

/// Read a cell, treating out-of-range positions as missing.
pub(crate) fn cell(row: &[Option<String>], pos: usize) -> Option<&str> {
    row.get(pos).and_then(|c| c.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        BOOK_COLUMNS.iter().map(|s| s.to_string()).collect()
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_books_coerces_missing_text_fields() {
        let table = Table::new(
            headers(),
            vec![vec![some("0001"), None, some("Tolkien"), some("1954"), None, None]],
        );
        let books = table.books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "nan");
        assert_eq!(books[0].author, "Tolkien");
        assert_eq!(books[0].publisher, "nan");
        assert_eq!(books[0].isbn.as_deref(), Some("0001"));
        assert!(books[0].image_url.is_none());
    }

    #[test]
    fn test_short_rows_read_as_missing() {
        let table = Table::new(headers(), vec![vec![some("0001"), some("Dune")]]);
        let books = table.books().unwrap();
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].author, "nan");
        assert!(books[0].year.is_none());
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let table = Table::new(vec![ISBN.to_string(), TITLE.to_string()], vec![]);
        match table.books() {
            Err(BuildError::MissingColumns { missing }) => {
                assert_eq!(missing, vec![AUTHOR, YEAR, PUBLISHER, IMAGE_URL]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let mut hdrs = headers();
        hdrs.reverse();
        let row: Vec<Option<String>> = vec![
            some("http://img"),
            some("Ace"),
            some("1965"),
            some("Herbert"),
            some("Dune"),
            some("0441"),
        ];
        let books = Table::new(hdrs, vec![row]).books().unwrap();
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].publisher, "Ace");
        assert_eq!(books[0].isbn.as_deref(), Some("0441"));
    }
}
