// Dense all-pairs similarity matrix.
//
// Rows of the term matrix are unit length, so the dot product of two rows is
// their cosine similarity, in [0, 1] because every weight is non-negative.
// The full N × N matrix is materialized once so that every query is a row
// lookup; memory is O(N²) f64s, which is why callers cap the corpus (a few
// thousand books is the intended range). Nothing here enforces that cap.
//
// Only the upper triangle is computed. Each value is written to both (i, j)
// and (j, i), so the matrix is exactly symmetric, and the summation order for
// a pair is fixed by column order, so rebuilding from the same corpus gives
// bit-identical scores.

use std::time::Instant;

use tracing::info;

use super::tfidf::TermMatrix;

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute every pairwise dot product of `terms`' rows.
    ///
    /// Walks an inverted index (column -> rows containing it) so each row only
    /// touches the rows it shares a term with.
    pub fn from_terms(terms: &TermMatrix) -> Self {
        let started = Instant::now();
        let n = terms.n_rows();

        // Postings are appended in row order, so each list is sorted by row
        let mut postings: Vec<Vec<(usize, f64)>> = vec![Vec::new(); terms.n_terms()];
        for i in 0..n {
            for &(col, w) in terms.row(i) {
                postings[col].push((i, w));
            }
        }

        let mut scores = vec![0.0f64; n * n];
        let mut acc = vec![0.0f64; n];

        for i in 0..n {
            acc[i..].iter_mut().for_each(|a| *a = 0.0);

            for &(col, w) in terms.row(i) {
                let list = &postings[col];
                let start = list.partition_point(|&(j, _)| j < i);
                for &(j, wj) in &list[start..] {
                    acc[j] += w * wj;
                }
            }

            for j in i..n {
                let s = acc[j].clamp(0.0, 1.0);
                scores[i * n + j] = s;
                scores[j * n + i] = s;
            }
        }

        info!(
            items = n,
            bytes = n * n * std::mem::size_of::<f64>(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Built similarity matrix"
        );

        Self { n, scores }
    }

    /// Number of items (the matrix is `len() × len()`).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarities of item `i` to every item, itself included.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.scores[i * self.n..(i + 1) * self.n]
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.n + j]
    }

    /// Heap size of the score buffer.
    pub fn memory_bytes(&self) -> usize {
        self.scores.len() * std::mem::size_of::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tfidf::TfIdf;

    fn build(texts: &[&str]) -> (TermMatrix, SimilarityMatrix) {
        let docs: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let (_, terms) = TfIdf::with_stop_words(["the"]).fit_transform(&docs).unwrap();
        let sim = SimilarityMatrix::from_terms(&terms);
        (terms, sim)
    }

    #[test]
    fn test_matches_sparse_dot_products() {
        let (terms, sim) = build(&[
            "dragon magic wizard",
            "dragon space",
            "space robot galaxy",
            "wizard wizard school",
        ]);
        for i in 0..4 {
            for j in 0..4 {
                let expected = terms.dot(i, j).clamp(0.0, 1.0);
                assert!(
                    (sim.get(i, j) - expected).abs() < 1e-12,
                    "({i}, {j}): {} vs {expected}",
                    sim.get(i, j)
                );
            }
        }
    }

    #[test]
    fn test_disjoint_documents_score_zero() {
        let (_, sim) = build(&["dragon magic", "space robot"]);
        assert_eq!(sim.get(0, 1), 0.0);
        assert_eq!(sim.get(1, 0), 0.0);
    }

    #[test]
    fn test_zero_row_is_similar_to_nothing() {
        let (_, sim) = build(&["the", "dragon"]);
        assert_eq!(sim.row(0), &[0.0, 0.0]);
        assert!((sim.get(1, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_memory_is_quadratic() {
        let (_, sim) = build(&["a1 b1", "b1 c1", "c1 d1"]);
        assert_eq!(sim.len(), 3);
        assert_eq!(sim.memory_bytes(), 9 * 8);
    }
}
