//! K-means clustering (k-means++ seeding, Lloyd iterations).
//!
//! # The Algorithm
//!
//! 1. **Seeding (k-means++)**: pick the first centroid uniformly at random,
//!    then pick each further centroid with probability proportional to its
//!    squared distance from the nearest centroid chosen so far
//!    (Arthur & Vassilvitskii, 2007).
//! 2. **Lloyd iterations**: assign each point to its nearest centroid by
//!    Euclidean distance, recompute centroids as cluster means, repeat until
//!    assignments stop changing, centroids stop moving, or the iteration cap
//!    is reached.
//! 3. **Restarts**: repeat the whole procedure N times and keep the run with
//!    the lowest total within-cluster sum of squares (inertia).
//!
//! # Determinism
//!
//! Interactive exploration re-runs clustering on every parameter change, so
//! the result for a fixed input and seed must be bit-identical across calls:
//!
//! - restart `r` draws from an RNG seeded with `seed + r`;
//! - nearest-centroid ties break toward the lowest centroid index;
//! - empty clusters are repaired by donating the point farthest from its
//!   current centroid (lowest index on ties), never by random re-seeding.
//!
//! Cluster label values are arbitrary: the labeling of an optimal partition
//! depends on seeding order, so callers must not assume a label means the
//! same group across different `k` or seeds.

use rand::prelude::*;

use super::traits::Clustering;
use crate::error::{Error, Result};

/// Default number of restarts. High enough that the best-of-restarts objective
/// is stable for vocabulary-sized inputs.
pub const DEFAULT_RESTARTS: usize = 25;

/// Default Lloyd iteration cap per restart.
pub const DEFAULT_MAX_ITER: usize = 100;

/// K-means clusterer.
#[derive(Debug, Clone)]
pub struct Kmeans {
    n_clusters: usize,
    restarts: usize,
    max_iter: usize,
    tol: f32,
    seed: Option<u64>,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// One label per input point, in `0..n_clusters`.
    pub labels: Vec<usize>,
    /// Final centroids, `n_clusters` rows.
    pub centroids: Vec<Vec<f32>>,
    /// Total within-cluster sum of squared distances (the k-means objective).
    pub inertia: f64,
}

impl Kmeans {
    /// Create a k-means clusterer with `n_clusters` centers.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            restarts: DEFAULT_RESTARTS,
            max_iter: DEFAULT_MAX_ITER,
            tol: 1e-6,
            seed: None,
        }
    }

    /// Set the RNG seed. Fits with the same seed and input are bit-identical.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of restarts (best-of-N by inertia).
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the Lloyd iteration cap per restart.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the centroid-movement tolerance used as a convergence criterion.
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Fit the model, returning labels, centroids, and the objective value.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.n_clusters == 0 || self.n_clusters > n {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_words: n,
            });
        }
        if self.restarts == 0 {
            return Err(Error::InvalidParameter {
                name: "restarts",
                message: "must be at least 1",
            });
        }

        let dim = data[0].len();
        for point in data {
            if point.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: point.len(),
                });
            }
        }

        // An unseeded fit is still reproducible within itself: draw one base
        // seed, then derive every restart from it.
        let base_seed = self.seed.unwrap_or_else(|| rand::rng().random());

        let mut best: Option<KmeansFit> = None;
        for restart in 0..self.restarts {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(restart as u64));
            let fit = self.run_once(data, &mut rng);
            let improved = match &best {
                Some(b) => fit.inertia < b.inertia,
                None => true,
            };
            if improved {
                best = Some(fit);
            }
        }

        // restarts >= 1, so at least one run happened.
        Ok(best.unwrap())
    }

    /// One seeded k-means++ / Lloyd run.
    fn run_once(&self, data: &[Vec<f32>], rng: &mut StdRng) -> KmeansFit {
        let n = data.len();
        let k = self.n_clusters;
        let dim = data[0].len();

        let mut centroids = self.init_plus_plus(data, rng);
        let mut labels = vec![0usize; n];

        for _ in 0..self.max_iter {
            // Assignment step. Strict `<` keeps the lowest centroid index on ties.
            let mut changed = false;
            for (i, point) in data.iter().enumerate() {
                let mut best_dist = f32::INFINITY;
                let mut best_cluster = 0;
                for (c, centroid) in centroids.iter().enumerate() {
                    let d = squared_euclidean(point, centroid);
                    if d < best_dist {
                        best_dist = d;
                        best_cluster = c;
                    }
                }
                if labels[i] != best_cluster {
                    labels[i] = best_cluster;
                    changed = true;
                }
            }

            // Update step.
            let mut sums = vec![vec![0.0f32; dim]; k];
            let mut counts = vec![0usize; k];
            for (point, &label) in data.iter().zip(labels.iter()) {
                for (s, &v) in sums[label].iter_mut().zip(point.iter()) {
                    *s += v;
                }
                counts[label] += 1;
            }

            repair_empty_clusters(data, &centroids, &mut labels, &mut sums, &mut counts);

            let mut max_shift = 0.0f32;
            for c in 0..k {
                let count = counts[c] as f32;
                let new_centroid: Vec<f32> = sums[c].iter().map(|s| s / count).collect();
                let shift = squared_euclidean(&new_centroid, &centroids[c]);
                if shift > max_shift {
                    max_shift = shift;
                }
                centroids[c] = new_centroid;
            }

            if !changed || max_shift < self.tol {
                break;
            }
        }

        // Final assignment against the last centroid update, plus the objective.
        let mut inertia = 0.0f64;
        for (i, point) in data.iter().enumerate() {
            let mut best_dist = f32::INFINITY;
            let mut best_cluster = 0;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = squared_euclidean(point, centroid);
                if d < best_dist {
                    best_dist = d;
                    best_cluster = c;
                }
            }
            labels[i] = best_cluster;
            inertia += f64::from(best_dist);
        }

        KmeansFit {
            labels,
            centroids,
            inertia,
        }
    }

    /// K-means++ seeding.
    fn init_plus_plus(&self, data: &[Vec<f32>], rng: &mut StdRng) -> Vec<Vec<f32>> {
        let n = data.len();
        let k = self.n_clusters;

        let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(k);
        let mut chosen = vec![false; n];

        let first = rng.random_range(0..n);
        chosen[first] = true;
        centroids.push(data[first].clone());

        // Squared distance from each point to its nearest chosen centroid.
        let mut min_dist: Vec<f64> = data
            .iter()
            .map(|p| f64::from(squared_euclidean(p, &data[first])))
            .collect();

        while centroids.len() < k {
            let total: f64 = min_dist.iter().sum();

            let next = if total > 0.0 {
                // Sample proportional to squared distance.
                let target = rng.random::<f64>() * total;
                let mut acc = 0.0;
                let mut pick = n - 1;
                for (i, &d) in min_dist.iter().enumerate() {
                    acc += d;
                    if acc >= target && !chosen[i] {
                        pick = i;
                        break;
                    }
                }
                if chosen[pick] {
                    // Cumulative walk landed on an already-chosen duplicate;
                    // fall back to the first free point.
                    (0..n).find(|&i| !chosen[i]).unwrap_or(pick)
                } else {
                    pick
                }
            } else {
                // All remaining points coincide with a centroid.
                (0..n).find(|&i| !chosen[i]).unwrap_or(0)
            };

            chosen[next] = true;
            centroids.push(data[next].clone());

            for (i, point) in data.iter().enumerate() {
                let d = f64::from(squared_euclidean(point, &data[next]));
                if d < min_dist[i] {
                    min_dist[i] = d;
                }
            }
        }

        centroids
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

/// Reassign one point into each empty cluster so every label stays populated.
///
/// The donated point is the one farthest from its current centroid, among
/// clusters with more than one member; ties pick the lowest point index.
fn repair_empty_clusters(
    data: &[Vec<f32>],
    centroids: &[Vec<f32>],
    labels: &mut [usize],
    sums: &mut [Vec<f32>],
    counts: &mut [usize],
) {
    let k = counts.len();
    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }

        let mut donor: Option<usize> = None;
        let mut donor_dist = -1.0f32;
        for (i, point) in data.iter().enumerate() {
            let label = labels[i];
            if counts[label] <= 1 {
                continue;
            }
            let d = squared_euclidean(point, &centroids[label]);
            if d > donor_dist {
                donor_dist = d;
                donor = Some(i);
            }
        }

        // With k <= n and every point assigned, some cluster has > 1 member
        // whenever another is empty, so a donor always exists.
        if let Some(i) = donor {
            let from = labels[i];
            for (d, &v) in sums[from].iter_mut().zip(data[i].iter()) {
                *d -= v;
            }
            counts[from] -= 1;
            for (d, &v) in sums[empty].iter_mut().zip(data[i].iter()) {
                *d += v;
            }
            counts[empty] += 1;
            labels[i] = empty;
        }
    }
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
