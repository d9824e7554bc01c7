//! Clustering engine: k-means over the embedding matrix.
//!
//! Two entry points feed the exploration loop:
//!
//! - [`cluster`] partitions the vocabulary at a user-chosen `k`, producing a
//!   [`ClusterAssignment`] (word -> cluster id in `1..=k`).
//! - [`compute_elbow_curve`] sweeps `k = 1..=k_max` and records the k-means
//!   objective at each count, producing the [`ElbowCurve`] the user reads to
//!   pick `k`.
//!
//! Both are deterministic for a fixed seed: the restart policy, tie-breaking,
//! and empty-cluster repair are all seeded or index-ordered (see [`Kmeans`]).
//! The assignment is recomputed from scratch whenever `k` changes; nothing is
//! incrementally updated.
//!
//! ## Usage
//!
//! ```rust
//! use wordscope::cluster::{cluster, compute_elbow_curve};
//! use wordscope::EmbeddingMatrix;
//!
//! let matrix = EmbeddingMatrix::new(vec![
//!     ("cold".to_string(), vec![0.0, 0.0]),
//!     ("icy".to_string(), vec![0.1, 0.1]),
//!     ("hot".to_string(), vec![10.0, 10.0]),
//!     ("warm".to_string(), vec![10.1, 10.1]),
//! ])
//! .unwrap();
//!
//! let assignment = cluster(&matrix, 2, 42).unwrap();
//! assert_eq!(assignment.id_of("cold"), assignment.id_of("icy"));
//!
//! let curve = compute_elbow_curve(&matrix, 4, 42).unwrap();
//! assert_eq!(curve.points().len(), 4);
//! ```

mod assignment;
mod elbow;
mod kmeans;
mod traits;

pub use assignment::{cluster, ClusterAssignment};
pub use elbow::{compute_elbow_curve, ElbowCurve, ElbowPoint};
pub use kmeans::{Kmeans, KmeansFit, DEFAULT_MAX_ITER, DEFAULT_RESTARTS};
pub use traits::Clustering;
