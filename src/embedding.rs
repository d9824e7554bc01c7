//! Immutable startup inputs: the embedding matrix and the word-frequency table.
//!
//! Both values are produced once by external collaborators (an embedding
//! trainer and a corpus-preparation step) and never mutated afterwards.
//! Sessions share them by reference; every derived artifact in this crate is
//! recomputed fresh from these two values.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A dense word-embedding matrix: one fixed-dimension vector per vocabulary word.
///
/// Row order is significant: it is the canonical word order used by cluster
/// assignments, projections, and stable tie-breaking downstream.
#[derive(Debug, Clone)]
pub struct EmbeddingMatrix {
    words: Vec<String>,
    vectors: Vec<Vec<f32>>,
    index: HashMap<String, usize>,
    dim: usize,
}

impl EmbeddingMatrix {
    /// Build a matrix from `(word, vector)` rows.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `rows` is empty.
    /// - [`Error::DimensionMismatch`] if vectors differ in length (or a vector
    ///   is empty).
    /// - [`Error::DuplicateWord`] if a word appears twice.
    pub fn new(rows: Vec<(String, Vec<f32>)>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }

        let dim = rows[0].1.len();
        if dim == 0 {
            return Err(Error::DimensionMismatch {
                expected: 1,
                found: 0,
            });
        }

        let mut words = Vec::with_capacity(rows.len());
        let mut vectors = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());

        for (i, (word, vector)) in rows.into_iter().enumerate() {
            if vector.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: vector.len(),
                });
            }
            if index.insert(word.clone(), i).is_some() {
                return Err(Error::DuplicateWord(word));
            }
            words.push(word);
            vectors.push(vector);
        }

        Ok(Self {
            words,
            vectors,
            index,
            dim,
        })
    }

    /// Number of vocabulary words (rows).
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if the matrix has no rows.
    ///
    /// Unreachable through [`EmbeddingMatrix::new`], which rejects empty input,
    /// but kept for the conventional `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Embedding dimensionality D.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Vocabulary words in row order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Embedding vectors in row order.
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Row index of `word`, if present.
    pub fn row_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    /// Embedding vector of `word`, if present.
    pub fn vector_of(&self, word: &str) -> Option<&[f32]> {
        self.row_of(word).map(|i| self.vectors[i].as_slice())
    }
}

/// Word occurrence counts from the cleaned corpus.
///
/// Insertion order is preserved and serves as the stable tie-break when
/// ranking words of equal frequency.
#[derive(Debug, Clone, Default)]
pub struct WordFrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl WordFrequencyTable {
    /// Build a table from `(word, count)` pairs.
    ///
    /// A word listed more than once keeps its first position and sums its counts.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (word, count) in counts {
            let word = word.into();
            match table.index.get(&word).copied() {
                Some(i) => table.entries[i].1 += count,
                None => {
                    table.index.insert(word.clone(), table.entries.len());
                    table.entries.push((word, count));
                }
            }
        }
        table
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Occurrence count of `word`, if present.
    pub fn count_of(&self, word: &str) -> Option<u64> {
        self.index.get(word).map(|&i| self.entries[i].1)
    }

    /// `(word, count)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(w, c)| (w.as_str(), *c))
    }
}
