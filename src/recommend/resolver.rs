// Title -> corpus index lookup.
//
// Titles are not unique in real catalogs (reprints, different editions).
// The first book carrying a title owns it; later books with the same title
// can't be reached by title lookup at all. That's the accepted policy, not
// something to paper over with fuzzy matching.

use std::collections::HashMap;

use crate::catalog::models::Book;

#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    positions: HashMap<String, usize>,
    /// Unique titles in the order they first appear
    ordered: Vec<String>,
}

impl TitleIndex {
    pub fn build(books: &[Book]) -> Self {
        let mut positions = HashMap::with_capacity(books.len());
        let mut ordered = Vec::new();
        for (i, book) in books.iter().enumerate() {
            if !positions.contains_key(&book.title) {
                positions.insert(book.title.clone(), i);
                ordered.push(book.title.clone());
            }
        }
        Self { positions, ordered }
    }

    /// Exact, case-sensitive lookup.
    pub fn resolve(&self, title: &str) -> Option<usize> {
        self.positions.get(title).copied()
    }

    pub fn titles(&self) -> &[String] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
