//! Word-embedding cluster exploration core.
//!
//! `wordscope` is the functional core of an interactive tool for exploring a
//! trained word-embedding space: cluster the vocabulary, read an elbow curve
//! to pick a cluster count, spotlight one cluster in a 3D projection, and
//! drill into its word frequencies.
//!
//! The pipeline over an immutable [`EmbeddingMatrix`]:
//!
//! - [`cluster`]: seeded k-means ([`cluster::cluster`]) and the elbow sweep
//!   ([`cluster::compute_elbow_curve`])
//! - [`project`]: deterministic 3-component principal-axis projection
//! - [`view`]: scatter records with highlight/dim semantics, elbow
//!   annotation, and per-cluster top-word tables
//! - [`session`]: the event loop gluing the stages to user parameter changes
//!
//! Corpus cleaning and embedding training happen upstream; rendering happens
//! downstream. This crate only computes.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod embedding;
pub mod error;
pub mod project;
pub mod session;
pub mod view;

pub use cluster::{ClusterAssignment, Clustering, ElbowCurve, ElbowPoint, Kmeans, KmeansFit};
pub use embedding::{EmbeddingMatrix, WordFrequencyTable};
pub use error::{Error, Result};
pub use project::ProjectedPoint;
pub use session::{Session, SessionEvent, SessionParams, SessionState, ViewUpdate};
pub use view::{DrillTarget, Highlight, TopWordsRow, ViewRecord};
