// Popular books: the community "Top 50" list from the ratings table.
//
// Every rating counts toward a book's average, including the 0 ratings that
// mark implicit interactions. Books with fewer than `min_ratings` ratings are
// left out so a single 10 can't top the list.

use std::collections::HashMap;

use tracing::info;

use crate::catalog::models::{Book, PopularBook, Rating};

/// Default minimum number of ratings for a book to be ranked.
pub const DEFAULT_MIN_RATINGS: u32 = 50;

/// Default length of the popular list.
pub const DEFAULT_LIMIT: usize = 50;

/// Rank books by average rating among those with at least `min_ratings`
/// ratings, keeping the top `limit`.
///
/// Ratings are joined to books by ISBN; the first book with a given ISBN is
/// used, and ratings for ISBNs with no book are ignored. Equal averages are
/// ordered by rating count (more first), then ISBN.
pub fn top_books(
    books: &[Book],
    ratings: &[Rating],
    min_ratings: u32,
    limit: usize,
) -> Vec<PopularBook> {
    // isbn -> (count, sum)
    let mut totals: HashMap<&str, (u32, u64)> = HashMap::new();
    for r in ratings {
        let entry = totals.entry(r.isbn.as_str()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += r.rating as u64;
    }

    let mut by_isbn: HashMap<&str, &Book> = HashMap::with_capacity(books.len());
    for book in books {
        if let Some(isbn) = book.isbn.as_deref() {
            by_isbn.entry(isbn).or_insert(book);
        }
    }

    let mut ranked: Vec<(&str, PopularBook)> = totals
        .into_iter()
        .filter(|(_, (count, _))| *count >= min_ratings)
        .filter_map(|(isbn, (count, sum))| {
            by_isbn.get(isbn).map(|book| {
                (
                    isbn,
                    PopularBook {
                        book: (*book).clone(),
                        num_ratings: count,
                        avg_rating: sum as f64 / count as f64,
                    },
                )
            })
        })
        .collect();

    ranked.sort_by(|(isbn_a, a), (isbn_b, b)| {
        b.avg_rating
            .total_cmp(&a.avg_rating)
            .then(b.num_ratings.cmp(&a.num_ratings))
            .then(isbn_a.cmp(isbn_b))
    });

    let eligible = ranked.len();
    ranked.truncate(limit);

    info!(
        ratings = ratings.len(),
        eligible,
        min_ratings,
        returned = ranked.len(),
        "Ranked popular books"
    );

    ranked.into_iter().map(|(_, p)| p).collect()
}
