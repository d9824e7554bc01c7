use thiserror::Error;

/// Errors returned by the exploration core.
#[derive(Debug, Error)]
pub enum Error {
    /// Input collection is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the vocabulary.
    #[error("invalid cluster count: requested {requested}, but vocabulary has {n_words} words")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of words in the vocabulary.
        n_words: usize,
    },

    /// Vectors in an embedding matrix have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A vocabulary word appears more than once.
    #[error("duplicate word in vocabulary: {0:?}")]
    DuplicateWord(String),

    /// Matrix is too small or too low-variance for a 3-component projection.
    #[error("degenerate input: {reason}")]
    DegenerateInput {
        /// What made the matrix unusable.
        reason: &'static str,
    },

    /// A drill-down selection matched no words.
    ///
    /// Non-fatal by contract: callers render an empty table, not an error dialog.
    #[error("selection matched no words")]
    EmptySelection,
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
