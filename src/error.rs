// Construction errors.
//
// Only building things can fail: reading a catalog, validating its columns,
// fitting the vector space. Queries never return these; a title or category
// that isn't known is an empty result, not an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// The input table is missing one or more required columns.
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// There are no books to build a model over.
    #[error("cannot build a model from an empty corpus")]
    EmptyCorpus,

    /// Every document was empty or made only of stop words.
    #[error("empty vocabulary: all {documents} documents contain only stop words")]
    EmptyVocabulary { documents: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
