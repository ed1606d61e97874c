// TF-IDF vector space over the corpus' composite texts.
//
// Every composite text is one document. Tokens are runs of two or more word
// characters; English stop words (the nltk function-word list) are dropped
// before counting. Weights are raw term counts times smoothed IDF:
//
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1
//
// and each row is scaled to unit L2 length, so a plain dot product between
// two rows is their cosine similarity. A document with no surviving tokens
// is the zero vector.
//
// The vocabulary comes entirely from the corpus and is sorted, so column
// numbers (and therefore every downstream score) depend only on the input
// texts.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use regex::Regex;
use stop_words::{get, LANGUAGE};
use tracing::info;

use crate::error::BuildError;

/// Terms and their IDF weights, in column order.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn idf(&self, column: usize) -> Option<f64> {
        self.idf.get(column).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Sparse N × V matrix. Each row holds `(column, weight)` pairs sorted by
/// column, with no explicit zeros.
#[derive(Debug, Clone)]
pub struct TermMatrix {
    rows: Vec<Vec<(usize, f64)>>,
    n_terms: usize,
}

impl TermMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.n_terms
    }

    pub fn row(&self, i: usize) -> &[(usize, f64)] {
        &self.rows[i]
    }

    /// Total stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_zero_row(&self, i: usize) -> bool {
        self.rows[i].is_empty()
    }

    /// Dot product of two rows, merging their sorted entries.
    pub fn dot(&self, i: usize, j: usize) -> f64 {
        let (a, b) = (&self.rows[i], &self.rows[j]);
        let (mut x, mut y) = (0, 0);
        let mut sum = 0.0;
        while x < a.len() && y < b.len() {
            match a[x].0.cmp(&b[y].0) {
                std::cmp::Ordering::Less => x += 1,
                std::cmp::Ordering::Greater => y += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[x].1 * b[y].1;
                    x += 1;
                    y += 1;
                }
            }
        }
        sum
    }
}

/// TF-IDF vectorizer: a tokenizer plus a stop-word list.
pub struct TfIdf {
    stop_words: HashSet<String>,
    token_pattern: Regex,
}

impl Default for TfIdf {
    fn default() -> Self {
        Self::english()
    }
}

impl TfIdf {
    /// Vectorizer using the nltk English list from the `stop-words` crate.
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::with_stop_words(words)
    }

    /// Vectorizer with a caller-supplied stop-word list (matched lowercase).
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            token_pattern: Regex::new(r"\b\w\w+\b").expect("valid token pattern"),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Lowercase, split into tokens, drop stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.token_pattern
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }

    /// Fit the vocabulary and IDF weights on `documents` and return their
    /// weighted, normalized rows.
    ///
    /// Fails on an empty corpus, or when no document has a single token left
    /// after stop-word removal.
    pub fn fit_transform(
        &self,
        documents: &[String],
    ) -> Result<(Vocabulary, TermMatrix), BuildError> {
        if documents.is_empty() {
            return Err(BuildError::EmptyCorpus);
        }

        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| self.tokenize(d)).collect();

        let mut all_terms = BTreeSet::new();
        for tokens in &tokenized {
            all_terms.extend(tokens.iter().map(String::as_str));
        }
        if all_terms.is_empty() {
            return Err(BuildError::EmptyVocabulary {
                documents: documents.len(),
            });
        }

        let terms: Vec<String> = all_terms.into_iter().map(str::to_string).collect();
        let index: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        // Per-document term counts, keyed by column so rows come out sorted
        let counts: Vec<BTreeMap<usize, u32>> = tokenized
            .iter()
            .map(|tokens| {
                let mut tf = BTreeMap::new();
                for token in tokens {
                    *tf.entry(index[token]).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut df = vec![0u32; terms.len()];
        for tf in &counts {
            for &col in tf.keys() {
                df[col] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<Vec<(usize, f64)>> = counts
            .iter()
            .map(|tf| {
                let mut row: Vec<(usize, f64)> = tf
                    .iter()
                    .map(|(&col, &count)| (col, count as f64 * idf[col]))
                    .collect();
                let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in &mut row {
                        *w /= norm;
                    }
                }
                row
            })
            .collect();

        let zero_rows = rows.iter().filter(|r| r.is_empty()).count();
        info!(
            documents = documents.len(),
            vocabulary = terms.len(),
            zero_rows,
            "Fitted TF-IDF vector space"
        );

        let n_terms = terms.len();
        Ok((
            Vocabulary { terms, index, idf },
            TermMatrix { rows, n_terms },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_vectorizer() -> TfIdf {
        TfIdf::with_stop_words(["the", "of", "and", "a"])
    }

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tfidf = small_vectorizer();
        assert_eq!(
            tfidf.tokenize("The Lord of the Rings: a J.R.R. Tolkien"),
            vec!["lord", "rings", "tolkien"]
        );
    }

    #[test]
    fn test_english_list_keeps_title_words() {
        let tfidf = TfIdf::english();
        assert!(tfidf.is_stop_word("the"));
        assert!(tfidf.is_stop_word("of"));
        for word in ["ring", "world", "new", "first", "home", "little", "great", "one"] {
            assert!(!tfidf.is_stop_word(word), "{word} treated as a stop word");
        }
        assert_eq!(tfidf.tokenize("The Ring"), vec!["ring"]);
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let (vocab, _) = small_vectorizer()
            .fit_transform(&docs(&["zebra apple", "mango apple"]))
            .unwrap();
        assert_eq!(vocab.terms(), &["apple", "mango", "zebra"]);
        assert_eq!(vocab.column("mango"), Some(1));
        assert_eq!(vocab.term(2), Some("zebra"));
        assert_eq!(vocab.term(3), None);
    }

    #[test]
    fn test_smoothed_idf() {
        let (vocab, _) = small_vectorizer()
            .fit_transform(&docs(&["apple pear", "apple"]))
            .unwrap();
        // apple in both docs: ln(3/3) + 1 = 1
        let apple = vocab.idf(vocab.column("apple").unwrap()).unwrap();
        assert!((apple - 1.0).abs() < 1e-12);
        // pear in one doc: ln(3/2) + 1
        let pear = vocab.idf(vocab.column("pear").unwrap()).unwrap();
        assert!((pear - (1.5f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let (_, matrix) = small_vectorizer()
            .fit_transform(&docs(&["dragon magic magic", "space robot", "dragon space"]))
            .unwrap();
        for i in 0..matrix.n_rows() {
            let norm: f64 = matrix.row(i).iter().map(|(_, w)| w * w).sum();
            assert!((norm - 1.0).abs() < 1e-12, "row {i} has squared norm {norm}");
        }
    }

    #[test]
    fn test_stop_word_only_document_is_zero_row() {
        let (_, matrix) = small_vectorizer()
            .fit_transform(&docs(&["the of and", "dragon"]))
            .unwrap();
        assert!(matrix.is_zero_row(0));
        assert_eq!(matrix.dot(0, 1), 0.0);
        assert_eq!(matrix.dot(0, 0), 0.0);
    }

    #[test]
    fn test_empty_inputs_fail() {
        let tfidf = small_vectorizer();
        assert!(matches!(tfidf.fit_transform(&[]), Err(BuildError::EmptyCorpus)));
        assert!(matches!(
            tfidf.fit_transform(&docs(&["the", "a of"])),
            Err(BuildError::EmptyVocabulary { documents: 2 })
        ));
    }
}
