use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::popularity::DEFAULT_MIN_RATINGS;

/// Default corpus cap. The similarity matrix is N² f64s, so 5000 books is
/// about 200 MB.
pub const DEFAULT_MAX_BOOKS: usize = 5000;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every value
/// has a default, so an empty environment works against the standard
/// `data/` layout.
#[derive(Debug, Clone)]
pub struct Config {
    /// Books table (FOLIO_BOOKS_CSV)
    pub books_path: PathBuf,
    /// Ratings table, only needed for `popular` (FOLIO_RATINGS_CSV)
    pub ratings_path: PathBuf,
    /// Leading books kept for the model; `None` means the whole file
    /// (FOLIO_MAX_BOOKS, where 0 disables the cap)
    pub max_books: Option<usize>,
    /// Minimum ratings for the popular list (FOLIO_MIN_RATINGS)
    pub min_ratings: u32,
    /// Seed for genre sampling; unset means a fresh random seed per run
    /// (FOLIO_SEED)
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let max_books = match parse_var::<usize>("FOLIO_MAX_BOOKS")? {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(DEFAULT_MAX_BOOKS),
        };

        Ok(Self {
            books_path: env::var("FOLIO_BOOKS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/BX-Books.csv")),
            ratings_path: env::var("FOLIO_RATINGS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/BX-Book-Ratings-Subset.csv")),
            max_books,
            min_ratings: parse_var("FOLIO_MIN_RATINGS")?.unwrap_or(DEFAULT_MIN_RATINGS),
            seed: parse_var("FOLIO_SEED")?,
        })
    }

    /// Check that the books file exists.
    pub fn require_books(&self) -> Result<()> {
        require_file(&self.books_path, "FOLIO_BOOKS_CSV")
    }

    /// Check that the ratings file exists. Only `popular` needs it.
    pub fn require_ratings(&self) -> Result<()> {
        require_file(&self.ratings_path, "FOLIO_RATINGS_CSV")
    }
}

fn require_file(path: &Path, var: &str) -> Result<()> {
    if !path.exists() {
        anyhow::bail!(
            "Data file not found: {}\n\
             Put it there or point {var} at it (see .env.example).",
            path.display()
        );
    }
    Ok(())
}

/// Parse an optional numeric env var. Unset or empty is `None`; anything
/// else must parse.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{name} must be a number, got {raw:?}")),
        _ => Ok(None),
    }
}
