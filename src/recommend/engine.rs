// Recommendation engine: owns the corpus and everything derived from it.
//
// Construction runs the whole pipeline once: composite texts, TF-IDF,
// similarity matrix, title index. Either all of it succeeds or there is no
// engine. After that every query is a read of immutable data, so an `Engine`
// can sit behind an `Arc` and be queried from any number of threads. The only
// randomness (genre sampling) comes from an RNG the caller passes in.
//
// The similarity matrix is N² f64s. The engine doesn't cap N; callers decide
// how much of a catalog to load (see `Config::max_books`).

use std::time::Instant;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::models::Book;
use crate::catalog::table::Table;
use crate::error::BuildError;
use crate::features::normalize::composite_texts;
use crate::features::similarity::SimilarityMatrix;
use crate::features::tfidf::{TfIdf, TermMatrix, Vocabulary};
use crate::recommend::genre::Genre;
use crate::recommend::resolver::TitleIndex;

/// One ranked result of a similarity query.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<'a> {
    /// Corpus position of the recommended book
    pub index: usize,
    /// Cosine similarity to the query book, 0.0 to 1.0
    pub score: f64,
    pub book: &'a Book,
}

/// Size figures for a built engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub books: usize,
    pub unique_titles: usize,
    pub vocabulary: usize,
    pub nonzero_weights: usize,
    /// Books whose composite text had no terms left after stop-word removal
    pub empty_documents: usize,
    pub similarity_bytes: usize,
}

pub struct Engine {
    books: Vec<Book>,
    features: Vec<String>,
    vocabulary: Vocabulary,
    terms: TermMatrix,
    similarity: SimilarityMatrix,
    titles: TitleIndex,
}

impl Engine {
    /// Build an engine over `books` using the English stop-word list.
    pub fn build(books: Vec<Book>) -> Result<Self, BuildError> {
        Self::build_with(books, &TfIdf::english())
    }

    /// Build an engine with a specific vectorizer.
    pub fn build_with(books: Vec<Book>, vectorizer: &TfIdf) -> Result<Self, BuildError> {
        if books.is_empty() {
            return Err(BuildError::EmptyCorpus);
        }
        let started = Instant::now();

        let features = composite_texts(&books);
        let (vocabulary, terms) = vectorizer.fit_transform(&features)?;
        let similarity = SimilarityMatrix::from_terms(&terms);
        let titles = TitleIndex::build(&books);

        info!(
            books = books.len(),
            unique_titles = titles.len(),
            vocabulary = vocabulary.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recommendation engine ready"
        );

        Ok(Self {
            books,
            features,
            vocabulary,
            terms,
            similarity,
            titles,
        })
    }

    /// Validate and convert a table, keep at most `limit` leading rows, and
    /// build over them.
    pub fn from_table(table: &Table, limit: Option<usize>) -> Result<Self, BuildError> {
        let mut books = table.books()?;
        if let Some(limit) = limit {
            if books.len() > limit {
                debug!(total = books.len(), limit, "Truncating corpus");
                books.truncate(limit);
            }
        }
        Self::build(books)
    }

    /// The `top_n` books most similar to the book titled `title`.
    ///
    /// Unknown titles give an empty list. The query book itself is never in
    /// the result, even when another book ties it at 1.0.
    pub fn recommend(&self, title: &str, top_n: usize) -> Vec<Recommendation<'_>> {
        match self.titles.resolve(title) {
            Some(idx) => self.similar_to(idx, top_n),
            None => {
                debug!(title, "Title not in index");
                Vec::new()
            }
        }
    }

    /// The `top_n` books most similar to the book at corpus position `idx`.
    ///
    /// Ordered by score descending; equal scores keep corpus order.
    pub fn similar_to(&self, idx: usize, top_n: usize) -> Vec<Recommendation<'_>> {
        if idx >= self.books.len() {
            return Vec::new();
        }

        let mut ranked: Vec<(usize, f64)> =
            self.similarity.row(idx).iter().copied().enumerate().collect();
        // sort_by is stable, so ties stay in ascending index order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .filter(|&(j, _)| j != idx)
            .take(top_n)
            .map(|(index, score)| Recommendation {
                index,
                score,
                book: &self.books[index],
            })
            .collect()
    }

    /// Books whose titles match the named category, sampled down to `top_n`.
    ///
    /// Unknown category names give an empty list.
    pub fn by_category<R: Rng + ?Sized>(
        &self,
        category: &str,
        top_n: usize,
        rng: &mut R,
    ) -> Vec<&Book> {
        match Genre::from_name(category) {
            Some(genre) => self.by_genre(genre, top_n, rng),
            None => {
                debug!(category, "Unknown category");
                Vec::new()
            }
        }
    }

    /// Books whose titles contain any keyword of `genre`.
    ///
    /// With more than `top_n` matches, returns a uniform sample of `top_n`
    /// of them (in sample order); otherwise all matches in corpus order.
    pub fn by_genre<R: Rng + ?Sized>(&self, genre: Genre, top_n: usize, rng: &mut R) -> Vec<&Book> {
        let matches: Vec<usize> = self
            .books
            .iter()
            .enumerate()
            .filter(|(_, b)| genre.matches(&b.title))
            .map(|(i, _)| i)
            .collect();

        debug!(genre = %genre, matches = matches.len(), top_n, "Genre filter");

        if matches.len() > top_n {
            rand::seq::index::sample(rng, matches.len(), top_n)
                .into_iter()
                .map(|k| &self.books[matches[k]])
                .collect()
        } else {
            matches.into_iter().map(|i| &self.books[i]).collect()
        }
    }

    /// Unique titles containing `query` (case-insensitive), in corpus order.
    /// An empty query matches every title.
    pub fn search_titles(&self, query: &str, limit: usize) -> Vec<&str> {
        let needle = query.to_lowercase();
        self.titles
            .titles()
            .iter()
            .filter(|t| needle.is_empty() || t.to_lowercase().contains(&needle))
            .take(limit)
            .map(String::as_str)
            .collect()
    }

    pub fn resolve(&self, title: &str) -> Option<usize> {
        self.titles.resolve(title)
    }

    pub fn titles(&self) -> &[String] {
        self.titles.titles()
    }

    pub fn book(&self, idx: usize) -> Option<&Book> {
        self.books.get(idx)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Composite feature text of the book at `idx`.
    pub fn feature_text(&self, idx: usize) -> Option<&str> {
        self.features.get(idx).map(String::as_str)
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            books: self.books.len(),
            unique_titles: self.titles.len(),
            vocabulary: self.vocabulary.len(),
            nonzero_weights: self.terms.nnz(),
            empty_documents: (0..self.terms.n_rows())
                .filter(|&i| self.terms.is_zero_row(i))
                .count(),
            similarity_bytes: self.similarity.memory_bytes(),
        }
    }
}
