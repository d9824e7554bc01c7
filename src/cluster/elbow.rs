//! Elbow curve: the k-means objective swept over a range of cluster counts.
//!
//! The curve is what the user reads to pick a "good enough" k: total
//! within-cluster sum of squares falls as k grows, and the bend where the
//! marginal improvement drops off marks the candidate cluster count.

use serde::Serialize;
use tracing::debug;

use super::kmeans::Kmeans;
use crate::embedding::EmbeddingMatrix;
use crate::error::{Error, Result};

/// One point of an elbow curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElbowPoint {
    /// Cluster count.
    pub k: usize,
    /// Best-of-restarts total within-cluster sum of squares at this `k`.
    pub total_within_ss: f64,
}

/// The k-means objective for k = 1..=k_max, in ascending k order.
///
/// Expected (not guaranteed) to be non-increasing in `k`; best-of-restarts
/// with a shared seed keeps repeated computations bit-identical, so the
/// rendered chart is stable across re-renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElbowCurve {
    points: Vec<ElbowPoint>,
}

impl ElbowCurve {
    /// Curve points in ascending k order.
    pub fn points(&self) -> &[ElbowPoint] {
        &self.points
    }

    /// Largest k on the curve.
    pub fn k_max(&self) -> usize {
        self.points.last().map_or(0, |p| p.k)
    }

    /// The objective value at `k`, if `k` is on the curve.
    pub fn value_at(&self, k: usize) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.k == k)
            .map(|p| p.total_within_ss)
    }
}

/// Sweep k-means over `k = 1..=k_max` and record the objective at each k.
///
/// Every k uses the same seed and restart policy, so two calls with identical
/// inputs produce bit-identical curves. A `k_max` beyond the vocabulary size
/// is truncated to it (k-means cannot form more non-empty clusters than
/// points).
///
/// # Errors
///
/// [`Error::InvalidParameter`] when `k_max` is zero.
pub fn compute_elbow_curve(
    matrix: &EmbeddingMatrix,
    k_max: usize,
    seed: u64,
) -> Result<ElbowCurve> {
    if k_max == 0 {
        return Err(Error::InvalidParameter {
            name: "k_max",
            message: "must be at least 1",
        });
    }

    let k_cap = k_max.min(matrix.len());
    let mut points = Vec::with_capacity(k_cap);
    for k in 1..=k_cap {
        let fit = Kmeans::new(k).with_seed(seed).fit(matrix.vectors())?;
        points.push(ElbowPoint {
            k,
            total_within_ss: fit.inertia,
        });
    }

    debug!(k_max = k_cap, n_words = matrix.len(), "computed elbow curve");
    Ok(ElbowCurve { points })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_matrix() -> EmbeddingMatrix {
        EmbeddingMatrix::new(vec![
            ("a".to_string(), vec![0.0, 0.0]),
            ("b".to_string(), vec![0.1, 0.1]),
            ("c".to_string(), vec![10.0, 10.0]),
            ("d".to_string(), vec![10.1, 10.1]),
        ])
        .unwrap()
    }

    #[test]
    fn test_elbow_domain_and_order() {
        let curve = compute_elbow_curve(&pair_matrix(), 4, 42).unwrap();

        let ks: Vec<usize> = curve.points().iter().map(|p| p.k).collect();
        assert_eq!(ks, vec![1, 2, 3, 4]);
        assert_eq!(curve.k_max(), 4);
    }

    #[test]
    fn test_elbow_bit_identical() {
        let matrix = pair_matrix();
        let a = compute_elbow_curve(&matrix, 4, 42).unwrap();
        let b = compute_elbow_curve(&matrix, 4, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_elbow_steepest_drop_at_two_for_two_groups() {
        // Two well-separated pairs: the big objective drop is k=1 -> k=2.
        let curve = compute_elbow_curve(&pair_matrix(), 4, 42).unwrap();
        let values: Vec<f64> = curve.points().iter().map(|p| p.total_within_ss).collect();

        let drop_12 = values[0] - values[1];
        for w in values.windows(2).skip(1) {
            assert!(drop_12 > w[0] - w[1]);
        }
    }

    #[test]
    fn test_elbow_truncates_to_vocabulary() {
        let curve = compute_elbow_curve(&pair_matrix(), 10, 42).unwrap();
        assert_eq!(curve.k_max(), 4);
        // At k = n the objective is exactly zero.
        assert_eq!(curve.value_at(4), Some(0.0));
    }

    #[test]
    fn test_elbow_zero_kmax() {
        assert!(matches!(
            compute_elbow_curve(&pair_matrix(), 0, 42),
            Err(Error::InvalidParameter { name: "k_max", .. })
        ));
    }
}
