// Feature extraction: composite text, TF-IDF weighting and pairwise
// similarity over a fixed corpus.

pub mod normalize;
pub mod similarity;
pub mod tfidf;
