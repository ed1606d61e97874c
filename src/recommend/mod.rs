// Recommendation: title resolution, genre keywords and the query engine
// that ties the feature pipeline together.

pub mod engine;
pub mod genre;
pub mod resolver;
