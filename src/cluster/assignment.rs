//! Word-to-cluster assignments over an embedding matrix.

use std::collections::HashMap;

use tracing::debug;

use super::kmeans::{Kmeans, KmeansFit};
use crate::embedding::EmbeddingMatrix;
use crate::error::{Error, Result};

/// A partition of the vocabulary into `k` clusters.
///
/// Cluster ids are a contiguous `1..=k` range; every vocabulary word carries
/// exactly one id. Id values are arbitrary between runs with different seeds
/// or `k` — callers must not read semantic continuity into an id.
#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    k: usize,
    words: Vec<String>,
    ids: Vec<usize>,
    index: HashMap<String, usize>,
}

impl ClusterAssignment {
    /// Build an assignment from a k-means fit over `matrix`.
    ///
    /// The fit's 0-based labels become 1-based cluster ids, in matrix row order.
    pub fn from_fit(matrix: &EmbeddingMatrix, k: usize, fit: &KmeansFit) -> Self {
        debug_assert_eq!(fit.labels.len(), matrix.len());
        let words = matrix.words().to_vec();
        let ids: Vec<usize> = fit.labels.iter().map(|&l| l + 1).collect();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        Self {
            k,
            words,
            ids,
            index,
        }
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of assigned words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if no words are assigned.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True if `id` is a valid cluster id for this assignment.
    pub fn contains_id(&self, id: usize) -> bool {
        (1..=self.k).contains(&id)
    }

    /// Cluster id of `word`, if the word is in the vocabulary.
    pub fn id_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).map(|&i| self.ids[i])
    }

    /// `(word, cluster id)` pairs in matrix row order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.words
            .iter()
            .map(String::as_str)
            .zip(self.ids.iter().copied())
    }

    /// Words assigned to cluster `id`, in matrix row order.
    pub fn members(&self, id: usize) -> Vec<&str> {
        self.iter()
            .filter(|&(_, c)| c == id)
            .map(|(w, _)| w)
            .collect()
    }
}

/// Partition the vocabulary into `k` clusters with a fixed seed.
///
/// # Errors
///
/// [`Error::InvalidClusterCount`] when `k` is zero or exceeds the vocabulary
/// size (k-means cannot form more non-empty clusters than points).
pub fn cluster(matrix: &EmbeddingMatrix, k: usize, seed: u64) -> Result<ClusterAssignment> {
    if k == 0 || k > matrix.len() {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_words: matrix.len(),
        });
    }

    let fit = Kmeans::new(k).with_seed(seed).fit(matrix.vectors())?;
    debug!(k, n_words = matrix.len(), inertia = fit.inertia, "clustered vocabulary");
    Ok(ClusterAssignment::from_fit(matrix, k, &fit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_matrix() -> EmbeddingMatrix {
        EmbeddingMatrix::new(vec![
            ("links".to_string(), vec![0.0, 0.0]),
            ("linksaf".to_string(), vec![0.1, 0.1]),
            ("rechts".to_string(), vec![10.0, 10.0]),
            ("rechtsaf".to_string(), vec![10.1, 10.1]),
        ])
        .unwrap()
    }

    #[test]
    fn test_cluster_ids_contiguous_from_one() {
        let assignment = cluster(&pair_matrix(), 2, 42).unwrap();

        assert_eq!(assignment.k(), 2);
        assert_eq!(assignment.len(), 4);
        for (_, id) in assignment.iter() {
            assert!((1..=2).contains(&id));
        }
        assert!(!assignment.members(1).is_empty());
        assert!(!assignment.members(2).is_empty());
    }

    #[test]
    fn test_cluster_groups_pairs() {
        let assignment = cluster(&pair_matrix(), 2, 42).unwrap();

        assert_eq!(assignment.id_of("links"), assignment.id_of("linksaf"));
        assert_eq!(assignment.id_of("rechts"), assignment.id_of("rechtsaf"));
        assert_ne!(assignment.id_of("links"), assignment.id_of("rechts"));
    }

    #[test]
    fn test_cluster_invalid_k() {
        let matrix = pair_matrix();
        assert!(matches!(
            cluster(&matrix, 0, 42),
            Err(Error::InvalidClusterCount { requested: 0, n_words: 4 })
        ));
        assert!(matches!(
            cluster(&matrix, 5, 42),
            Err(Error::InvalidClusterCount { requested: 5, n_words: 4 })
        ));
    }

    #[test]
    fn test_unknown_word_has_no_id() {
        let assignment = cluster(&pair_matrix(), 2, 42).unwrap();
        assert_eq!(assignment.id_of("rechtdoor"), None);
    }
}
