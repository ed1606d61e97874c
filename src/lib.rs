// Folio: content-based book recommendations
//
// This is the library root. Each module corresponds to one stage of the
// recommender: catalog ingestion, feature extraction, the query engine, and
// the popularity list, plus config and terminal output for the CLI.

pub mod catalog;
pub mod config;
pub mod error;
pub mod features;
pub mod output;
pub mod popularity;
pub mod recommend;

pub use catalog::models::Book;
pub use error::BuildError;
pub use recommend::engine::{Engine, Recommendation};
pub use recommend::genre::Genre;
